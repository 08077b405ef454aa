/*
 * config.rs
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

//! Daemon endpoint and retry configuration. Constructed by the caller and
//! handed to `GrowlSession`; there is no process-wide default instance.

use crate::protocol::gntp::RetryPolicy;

/// Default daemon host. GNTP daemons listen on the loopback interface.
pub const DEFAULT_HOST: &str = "localhost";

/// Default GNTP port.
pub const DEFAULT_PORT: u16 = 23053;

/// Where the daemon lives and how stubbornly to resend transient failures.
#[derive(Debug, Clone)]
pub struct GntpConfig {
    pub host: String,
    pub port: u16,
    pub retry: RetryPolicy,
}

impl Default for GntpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            retry: RetryPolicy::default(),
        }
    }
}

impl GntpConfig {
    /// Config for a daemon at `host:port` with the default retry policy.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            retry: RetryPolicy::default(),
        }
    }
}
