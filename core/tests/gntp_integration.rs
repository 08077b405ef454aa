/*
 * gntp_integration.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Integration tests for the GNTP client. A scripted TCP server on the
 * loopback interface plays the notification daemon, so the full stack
 * (session -> request builder -> transport -> parser -> retry) runs
 * hermetically.
 *
 * Run with:
 *   cargo test -p ringhio_core --test gntp_integration
 */

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ringhio_core::protocol::gntp::{
    send_with_retry, transport, RequestBuilder, RequestKind, ResponseState, RetryPolicy,
};
use ringhio_core::{CallbackAction, GntpConfig, GrowlSession, NotifyOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const OK_REGISTER: &[u8] = b"GNTP/1.0 -OK NONE\r\nResponse-Action: REGISTER\r\n\r\n";
const OK_NOTIFY: &[u8] = b"GNTP/1.0 -OK NONE\r\nResponse-Action: NOTIFY\r\n\r\n";
const CALLBACK_CLICK: &[u8] =
    b"GNTP/1.0 -CALLBACK NONE\r\nNotification-ID: 1\r\nNotification-Callback-Result: CLICK\r\n\r\n";

fn error_frame(code: &str) -> Vec<u8> {
    format!(
        "GNTP/1.0 -ERROR NONE\r\nError-Code: {}\r\nError-Description: scripted\r\n\r\n",
        code
    )
    .into_bytes()
}

fn count_blank_lines(buf: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i + 4 <= buf.len() {
        if &buf[i..i + 4] == b"\r\n\r\n" {
            count += 1;
            i += 4;
        } else {
            i += 1;
        }
    }
    count
}

/// Read until `sections` blank-line separators have arrived.
async fn read_sections(stream: &mut TcpStream, buf: &mut Vec<u8>, sections: usize) {
    let mut chunk = [0u8; 1024];
    while count_blank_lines(buf) < sections {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "peer closed mid-request");
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Answer one connection by verb: REGISTER gets an OK; NOTIFY gets an OK
/// followed by a deferred CALLBACK.
async fn serve_register_or_notify(mut stream: TcpStream) {
    let mut buf = Vec::new();
    read_sections(&mut stream, &mut buf, 1).await;
    let head = String::from_utf8_lossy(&buf).to_string();
    if head.starts_with("GNTP/1.0 REGISTER NONE\r\n") {
        // Application section read; the default registration carries one
        // notification-type section after it.
        read_sections(&mut stream, &mut buf, 2).await;
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Application-Name: Growly\r\n"));
        assert!(text.contains("Notification-Name: default\r\n"));
        stream.write_all(OK_REGISTER).await.unwrap();
    } else {
        assert!(head.starts_with("GNTP/1.0 NOTIFY NONE\r\n"));
        assert!(head.contains("Notification-Callback-Context: context\r\n"));
        stream.write_all(OK_NOTIFY).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stream.write_all(CALLBACK_CLICK).await.unwrap();
    }
}

#[tokio::test]
async fn notify_with_callback_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        // One connection for the session's automatic registration, one for
        // the notification; order on the wire is not guaranteed.
        for _ in 0..2 {
            let (stream, _) = listener.accept().await.unwrap();
            serve_register_or_notify(stream).await;
        }
    });

    let session = GrowlSession::new(GntpConfig::new("127.0.0.1", port));
    let (id, rx) = session.notify_with_callback("The loaf is ready", &NotifyOptions::default());
    assert_eq!(id, 1);
    let action = rx.await.unwrap().unwrap();
    assert_eq!(action, CallbackAction::Click);
    server.await.unwrap();
}

fn plain_notify_request() -> ringhio_core::protocol::gntp::GntpRequest {
    let mut b = RequestBuilder::new(RequestKind::Notify);
    b.required_header("Application-Name", "Test");
    b.required_header("Notification-Name", "default");
    b.header("Notification-Text", Some("hello".to_string()));
    b.end_section();
    b.build()
}

/// Shortened delay so the suite stays fast; the exact 750 ms pacing is
/// covered by the paused-clock tests in the retry module.
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        delay: Duration::from_millis(50),
        ..RetryPolicy::default()
    }
}

#[tokio::test]
async fn retryable_rejections_are_resent_until_success() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let served = Arc::new(AtomicU32::new(0));

    let count = served.clone();
    let server = tokio::spawn(async move {
        for i in 0..3u32 {
            let (mut stream, _) = listener.accept().await.unwrap();
            count.fetch_add(1, Ordering::SeqCst);
            let mut buf = Vec::new();
            read_sections(&mut stream, &mut buf, 1).await;
            if i < 2 {
                stream.write_all(&error_frame("402")).await.unwrap();
            } else {
                stream.write_all(OK_NOTIFY).await.unwrap();
            }
        }
    });

    let request = plain_notify_request();
    let outcome = send_with_retry(&request, &fast_policy(), || {
        transport::connect("127.0.0.1", port)
    })
    .await
    .unwrap();
    assert_eq!(outcome.state, ResponseState::Ok);
    server.await.unwrap();
    assert_eq!(served.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_deliver_final_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let served = Arc::new(AtomicU32::new(0));

    let count = served.clone();
    let server = tokio::spawn(async move {
        for _ in 0..5 {
            let (mut stream, _) = listener.accept().await.unwrap();
            count.fetch_add(1, Ordering::SeqCst);
            let mut buf = Vec::new();
            read_sections(&mut stream, &mut buf, 1).await;
            stream.write_all(&error_frame("401")).await.unwrap();
        }
    });

    let request = plain_notify_request();
    let outcome = send_with_retry(&request, &fast_policy(), || {
        transport::connect("127.0.0.1", port)
    })
    .await
    .unwrap();
    assert_eq!(outcome.state, ResponseState::Error);
    assert_eq!(outcome.error_code(), Some("401"));
    // The server loop accepted exactly five connections and exited; a sixth
    // attempt would have hung the test.
    server.await.unwrap();
    assert_eq!(served.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn terminal_error_is_not_retried() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        read_sections(&mut stream, &mut buf, 1).await;
        stream.write_all(&error_frame("500")).await.unwrap();
    });

    let request = plain_notify_request();
    let outcome = send_with_retry(&request, &fast_policy(), || {
        transport::connect("127.0.0.1", port)
    })
    .await
    .unwrap();
    assert_eq!(outcome.state, ResponseState::Error);
    assert_eq!(outcome.error_code(), Some("500"));
    server.await.unwrap();
}
