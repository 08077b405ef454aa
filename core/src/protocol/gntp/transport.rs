/*
 * transport.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Ringhio, a GNTP desktop notification client.
 *
 * Ringhio is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Ringhio is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Ringhio.  If not, see <http://www.gnu.org/licenses/>.
 */

//! One GNTP exchange over one connection: write the whole request, then
//! accumulate inbound bytes until a frame terminator and dispatch on the
//! parsed state. OK keeps the connection open (the daemon may follow up
//! with a deferred CALLBACK); ERROR and CALLBACK end the exchange and the
//! connection is shut down from this side.

use super::request::GntpRequest;
use super::response::{self, GntpResponse, ResponseState};
use super::GntpError;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Connect to the daemon. Each exchange gets its own connection.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, GntpError> {
    TcpStream::connect((host, port))
        .await
        .map_err(|e| GntpError::Transport(format!("connect to {}:{}: {}", host, port, e)))
}

/// Run one request/response exchange on `stream`.
///
/// The accumulated buffer is handed to the parser the moment it ends with
/// the CRLF CRLF terminator, then cleared. A peer close after a parsed OK
/// finalizes with that OK; a close with nothing parsed is a transport
/// failure. Socket errors surface as `GntpError::Transport` with no
/// response produced.
pub async fn exchange<S>(mut stream: S, request: &GntpRequest) -> Result<GntpResponse, GntpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let wire = request.to_wire();
    stream.write_all(&wire).await?;
    stream.flush().await?;

    let mut buf = BytesMut::with_capacity(1024);
    let mut last_ok: Option<GntpResponse> = None;
    loop {
        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            return match last_ok.take() {
                Some(resp) => Ok(resp),
                None => Err(GntpError::Transport(
                    "connection closed before a complete response".to_string(),
                )),
            };
        }
        if !buf.ends_with(b"\r\n\r\n") {
            continue;
        }
        let resp = response::parse(&buf)?;
        buf.clear();
        match resp.state {
            ResponseState::Ok => {
                last_ok = Some(resp);
            }
            ResponseState::Error | ResponseState::Callback => {
                let _ = stream.shutdown().await;
                return Ok(resp);
            }
        }
    }
}
