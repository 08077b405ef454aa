/*
 * lib.rs
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

//! Ringhio core: client for the Growl Network Transfer Protocol (GNTP).
//! Registers an application with a local notification daemon and sends
//! notifications with inline icon resources, transient-error retry, and
//! click/close/timeout callbacks.

pub mod config;
pub mod protocol;
pub mod session;

pub use config::GntpConfig;
pub use protocol::gntp::{GntpError, GntpResponse, ResponseState, RetryPolicy};
pub use session::{CallbackAction, GrowlSession, Icon, NotificationType, NotifyOptions};
