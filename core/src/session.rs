/*
 * session.rs
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

//! Session facade: holds the registered application (name, notification
//! types, derived labels), assigns notification IDs, and drives REGISTER
//! and NOTIFY exchanges. One session per application; independent sessions
//! do not share state. Sends run as spawned tasks so callers never block;
//! register is fire-and-forget, notify optionally reports the user's
//! interaction through a one-shot channel.

use crate::config::GntpConfig;
use crate::protocol::gntp::request::{GntpRequest, RequestBuilder, RequestKind};
use crate::protocol::gntp::response::ResponseState;
use crate::protocol::gntp::retry::send_with_retry;
use crate::protocol::gntp::{transport, GntpError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub use crate::protocol::gntp::request::Icon;

/// Application name used when the caller never registers explicitly.
pub const DEFAULT_APP_NAME: &str = "Growly";

/// One kind of notification an application can send. The label is the
/// unique key; the display name is what the daemon's preference panel
/// shows.
#[derive(Debug, Clone)]
pub struct NotificationType {
    pub label: String,
    pub display_name: Option<String>,
    pub enabled: bool,
    pub icon: Option<Icon>,
}

impl NotificationType {
    /// A type with the given label, enabled, with no display name or icon.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            display_name: None,
            enabled: true,
            icon: None,
        }
    }
}

/// Per-notification options. `replace` carries the coalescing ID: a new
/// notification with the same value replaces the one still on screen.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    /// Notification type label; defaults to the first registered type.
    pub label: Option<String>,
    pub title: Option<String>,
    pub sticky: bool,
    /// -2 (lowest) through 2 (highest).
    pub priority: Option<i8>,
    pub icon: Option<Icon>,
    pub replace: Option<String>,
}

/// What the user did with a notification, from the daemon's CALLBACK frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Click,
    Close,
    TimedOut,
    /// A result value outside the three documented ones, lower-cased.
    Other(String),
}

impl CallbackAction {
    fn parse(lowercased: &str) -> Self {
        match lowercased {
            "click" => CallbackAction::Click,
            "close" => CallbackAction::Close,
            "timedout" => CallbackAction::TimedOut,
            other => CallbackAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallbackAction::Click => "click",
            CallbackAction::Close => "close",
            CallbackAction::TimedOut => "timedout",
            CallbackAction::Other(s) => s,
        }
    }
}

/// Registered application state. `labels` is derived from `types` and is
/// never empty: registration substitutes the default type for an empty
/// list.
struct AppState {
    name: String,
    types: Vec<NotificationType>,
    labels: Vec<String>,
}

fn default_types() -> Vec<NotificationType> {
    vec![NotificationType {
        label: "default".to_string(),
        display_name: Some("Default Notification".to_string()),
        enabled: true,
        icon: None,
    }]
}

/// GNTP client session. Must be created inside a tokio runtime: sends are
/// spawned tasks.
///
/// A fresh session auto-registers the default application, so `notify`
/// works without an explicit `register`. Notification IDs are unique and
/// strictly increasing across concurrent callers.
pub struct GrowlSession {
    config: GntpConfig,
    state: Mutex<AppState>,
    counter: AtomicU32,
}

impl GrowlSession {
    pub fn new(config: GntpConfig) -> Self {
        let session = Self {
            config,
            state: Mutex::new(AppState {
                name: DEFAULT_APP_NAME.to_string(),
                types: default_types(),
                labels: vec!["default".to_string()],
            }),
            counter: AtomicU32::new(0),
        };
        session.register(DEFAULT_APP_NAME, None, Vec::new());
        session
    }

    /// Register the application with the daemon, replacing any previous
    /// registration in this session. An empty `types` list registers the
    /// single default type. Fire-and-forget: outcome errors are logged,
    /// never raised.
    pub fn register(&self, app_name: &str, app_icon: Option<Icon>, types: Vec<NotificationType>) {
        let types = if types.is_empty() { default_types() } else { types };
        {
            let mut state = self.state.lock().unwrap();
            state.name = app_name.to_string();
            state.labels = types.iter().map(|t| t.label.clone()).collect();
            state.types = types.clone();
        }
        match register_request(app_name, app_icon.as_ref(), &types) {
            Ok(request) => self.spawn_send(format!("register {}", app_name), request, None),
            Err(e) => eprintln!("[gntp] register {}: {}", app_name, e),
        }
    }

    /// Send a notification. Returns its ID immediately; the exchange runs
    /// in the background and failures are logged.
    pub fn notify(&self, text: &str, opts: &NotifyOptions) -> u32 {
        self.notify_inner(text, opts, None)
    }

    /// Send a notification and ask the daemon to report the user's
    /// interaction. The receiver yields at most one value: the action on a
    /// CALLBACK frame, or the error that ended the exchange. It closes with
    /// no value when the daemon never reports an interaction.
    pub fn notify_with_callback(
        &self,
        text: &str,
        opts: &NotifyOptions,
    ) -> (u32, oneshot::Receiver<Result<CallbackAction, GntpError>>) {
        let (tx, rx) = oneshot::channel();
        let id = self.notify_inner(text, opts, Some(tx));
        (id, rx)
    }

    fn notify_inner(
        &self,
        text: &str,
        opts: &NotifyOptions,
        reply: Option<oneshot::Sender<Result<CallbackAction, GntpError>>>,
    ) -> u32 {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let (app_name, label) = {
            let state = self.state.lock().unwrap();
            let label = opts
                .label
                .clone()
                .unwrap_or_else(|| state.labels[0].clone());
            (state.name.clone(), label)
        };
        match notify_request(&app_name, &label, id, text, opts, reply.is_some()) {
            Ok(request) => self.spawn_send(format!("notify {}", id), request, reply),
            Err(e) => {
                eprintln!("[gntp] notify {}: {}", id, e);
                if let Some(tx) = reply {
                    let _ = tx.send(Err(e));
                }
            }
        }
        id
    }

    /// Run the exchange to its final outcome on a spawned task and route
    /// that outcome: CALLBACK to the reply channel, errors to the log (and
    /// the channel, if one is waiting). A final OK closes the channel
    /// without a value.
    fn spawn_send(
        &self,
        what: String,
        request: GntpRequest,
        reply: Option<oneshot::Sender<Result<CallbackAction, GntpError>>>,
    ) {
        let host = self.config.host.clone();
        let port = self.config.port;
        let policy = self.config.retry.clone();
        tokio::spawn(async move {
            let connect = || {
                let host = host.clone();
                async move { transport::connect(&host, port).await }
            };
            match send_with_retry(&request, &policy, connect).await {
                Err(e) => {
                    eprintln!("[gntp] {} failed: {}", what, e);
                    if let Some(tx) = reply {
                        let _ = tx.send(Err(e));
                    }
                }
                Ok(resp) => match resp.state {
                    ResponseState::Callback => {
                        if let Some(tx) = reply {
                            let result = match resp.callback_result() {
                                Some(raw) => Ok(CallbackAction::parse(&raw)),
                                None => Err(GntpError::Protocol(
                                    "CALLBACK frame without Notification-Callback-Result"
                                        .to_string(),
                                )),
                            };
                            let _ = tx.send(result);
                        }
                    }
                    ResponseState::Error => {
                        eprintln!(
                            "[gntp] {} rejected: {} {}",
                            what,
                            resp.error_code().unwrap_or("?"),
                            resp.error_description().unwrap_or("")
                        );
                    }
                    ResponseState::Ok => {}
                },
            }
        });
    }
}

fn bool_header(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// REGISTER: one application section, then one section per notification
/// type, in input order.
fn register_request(
    app_name: &str,
    icon: Option<&Icon>,
    types: &[NotificationType],
) -> Result<GntpRequest, GntpError> {
    let mut b = RequestBuilder::new(RequestKind::Register);
    b.required_header("Application-Name", app_name);
    b.icon_header("Application-Icon", icon)?;
    b.required_header("Notifications-Count", &types.len().to_string());
    b.end_section();
    for t in types {
        b.required_header("Notification-Name", &t.label);
        b.header("Notification-Display-Name", t.display_name.clone());
        b.header("Notification-Enabled", Some(bool_header(t.enabled)));
        b.icon_header("Notification-Icon", t.icon.as_ref())?;
        b.end_section();
    }
    Ok(b.build())
}

/// NOTIFY: a single section. Callback context headers are present exactly
/// when the caller asked for an interaction report; the coalescing ID
/// exactly when `replace` is set.
fn notify_request(
    app_name: &str,
    label: &str,
    id: u32,
    text: &str,
    opts: &NotifyOptions,
    with_callback: bool,
) -> Result<GntpRequest, GntpError> {
    let mut b = RequestBuilder::new(RequestKind::Notify);
    b.required_header("Application-Name", app_name);
    b.required_header("Notification-Name", label);
    b.header("Notification-ID", Some(id.to_string()));
    b.header("Notification-Title", opts.title.clone());
    b.header("Notification-Text", Some(text.to_string()));
    b.header("Notification-Sticky", Some(bool_header(opts.sticky)));
    b.header("Notification-Priority", opts.priority.map(|p| p.to_string()));
    b.icon_header("Notification-Icon", opts.icon.as_ref())?;
    b.header("Notification-Coalescing-ID", opts.replace.clone());
    b.header(
        "Notification-Callback-Context",
        with_callback.then(|| "context".to_string()),
    );
    b.header(
        "Notification-Callback-Context-Type",
        with_callback.then(|| "string".to_string()),
    );
    b.end_section();
    Ok(b.build())
}
