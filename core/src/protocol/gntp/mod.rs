/*
 * mod.rs
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

//! GNTP protocol engine: request construction, inline resources, frame
//! parsing, the per-exchange transport session, and transient-error retry.
//! One `register`/`notify` call maps to one request, one TCP connection
//! per attempt, and one final outcome.

pub mod request;
pub mod resource;
pub mod response;
pub mod retry;
pub mod transport;

pub use request::{GntpRequest, Icon, RequestBuilder, RequestKind};
pub use resource::Resource;
pub use response::{GntpResponse, ResponseState};
pub use retry::{send_with_retry, RetryPolicy};

use std::fmt;
use std::io;

/// GNTP client error.
///
/// A well-formed `ERROR` frame from the daemon is not an error here: it is
/// delivered as a `GntpResponse` so the retry controller can inspect its
/// `Error-Code`. This type covers the failures that never produce a response.
#[derive(Debug)]
pub enum GntpError {
    /// Socket-level connect/write/read failure; terminal for the attempt.
    Transport(String),
    /// A received frame does not match the response grammar. Never retried.
    Protocol(String),
    /// An icon file could not be read while building a request.
    Icon(String),
}

impl fmt::Display for GntpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GntpError::Transport(m) => write!(f, "transport error: {}", m),
            GntpError::Protocol(m) => write!(f, "protocol error: {}", m),
            GntpError::Icon(m) => write!(f, "icon error: {}", m),
        }
    }
}

impl std::error::Error for GntpError {}

impl From<io::Error> for GntpError {
    fn from(e: io::Error) -> Self {
        GntpError::Transport(e.to_string())
    }
}
