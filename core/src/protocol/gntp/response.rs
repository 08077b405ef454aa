/*
 * response.rs
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

//! GNTP response frame parsing. A frame is a status line plus header lines,
//! terminated by a blank line:
//!
//! ```text
//! GNTP/1.0 -OK NONE\r\n
//! Response-Action: REGISTER\r\n
//! \r\n
//! ```

use super::GntpError;
use std::collections::HashMap;

/// Status token of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// Request accepted; a deferred CALLBACK frame may still follow.
    Ok,
    /// Daemon rejected the request; `Error-Code` says why.
    Error,
    /// User interacted with a notification (click, close, timeout).
    Callback,
}

impl ResponseState {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "OK" => Some(ResponseState::Ok),
            "ERROR" => Some(ResponseState::Error),
            "CALLBACK" => Some(ResponseState::Callback),
            _ => None,
        }
    }
}

/// A parsed response frame: state plus headers. Header insertion order is
/// not significant; duplicate names keep the last value seen.
#[derive(Debug, Clone)]
pub struct GntpResponse {
    pub state: ResponseState,
    headers: HashMap<String, String>,
}

impl GntpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// `Error-Code` of an ERROR frame (string numeric, e.g. "402").
    pub fn error_code(&self) -> Option<&str> {
        self.header("Error-Code")
    }

    pub fn error_description(&self) -> Option<&str> {
        self.header("Error-Description")
    }

    /// Lower-cased `Notification-Callback-Result` of a CALLBACK frame.
    pub fn callback_result(&self) -> Option<String> {
        self.header("Notification-Callback-Result")
            .map(|v| v.to_lowercase())
    }
}

/// Parse one complete frame. `frame` must contain the blank-line terminator;
/// anything after the first terminator is ignored. A status line that does
/// not match the grammar is a protocol error, not a response.
pub fn parse(frame: &[u8]) -> Result<GntpResponse, GntpError> {
    let text = String::from_utf8_lossy(frame);
    let body = match text.find("\r\n\r\n") {
        Some(end) => &text[..end],
        None => {
            return Err(GntpError::Protocol(
                "response frame is missing its terminator".to_string(),
            ))
        }
    };
    let mut lines = body.split("\r\n");
    let status_line = lines.next().unwrap_or("");
    let state = status_line
        .strip_prefix("GNTP/1.0 -")
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(ResponseState::from_token)
        .ok_or_else(|| GntpError::Protocol(format!("bad status line: {:?}", status_line)))?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(": ") {
            headers.insert(name.to_string(), value.to_string());
        }
    }
    Ok(GntpResponse { state, headers })
}
