/*
 * retry.rs
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

//! Transient-error retry. Some daemon rejections fix themselves: 200 (the
//! daemon timed the request out), 401 (unknown application) and 402
//! (unknown notification type) commonly mean a REGISTER is still in
//! flight, so the identical request is resent after a fixed delay. All
//! other outcomes are final on the first attempt.

use super::request::GntpRequest;
use super::response::{GntpResponse, ResponseState};
use super::transport;
use super::GntpError;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time;

/// Error codes worth a resend: daemon timeout, unknown application,
/// unknown notification type.
const RETRYABLE_ERROR_CODES: &[&str] = &["200", "401", "402"];

/// Total attempt budget, counting the first send.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(750);

/// How often and how fast to resend retryable rejections.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, counting the first send. The last attempt's outcome
    /// is delivered as-is.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Optional cap on the duration of a single attempt (connect through
    /// final frame). `None` imposes no local timeout: the client then relies
    /// entirely on the daemon reporting Error-Code 200.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            attempt_timeout: None,
        }
    }
}

/// Whether an attempt outcome calls for resending the identical request.
fn wants_resend(outcome: &Result<GntpResponse, GntpError>) -> bool {
    match outcome {
        Ok(resp) => {
            resp.state == ResponseState::Error
                && resp
                    .error_code()
                    .map_or(false, |code| RETRYABLE_ERROR_CODES.contains(&code))
        }
        Err(_) => false,
    }
}

/// Drive a request to a final outcome. `connect` supplies a fresh stream
/// per attempt; the request bytes are reused verbatim across attempts,
/// including any embedded resources.
pub async fn send_with_retry<S, F, Fut>(
    request: &GntpRequest,
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<GntpResponse, GntpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, GntpError>>,
{
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let attempt = async {
            let stream = connect().await?;
            transport::exchange(stream, request).await
        };
        let outcome = match policy.attempt_timeout {
            Some(limit) => match time::timeout(limit, attempt).await {
                Ok(outcome) => outcome,
                Err(_) => Err(GntpError::Transport(format!(
                    "attempt timed out after {:?}",
                    limit
                ))),
            },
            None => attempt.await,
        };
        if wants_resend(&outcome) && attempts < policy.max_attempts {
            time::sleep(policy.delay).await;
            continue;
        }
        return outcome;
    }
}
