/*
 * request.rs
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

//! GNTP request construction: ordered header sections, blank-line
//! separators, icon routing into inline resources, wire encoding.
//! Header order is significant and reproduced verbatim on the wire.

use super::resource::Resource;
use super::GntpError;
use bytes::{BufMut, Bytes, BytesMut};
use std::path::{Path, PathBuf};

/// Request verb: REGISTER announces the application and its notification
/// types; NOTIFY pushes one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Register,
    Notify,
}

impl RequestKind {
    pub fn verb(&self) -> &'static str {
        match self {
            RequestKind::Register => "REGISTER",
            RequestKind::Notify => "NOTIFY",
        }
    }
}

/// An icon value: a URL the daemon fetches itself, a local file, or raw
/// image bytes shipped inline with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Url(String),
    File(PathBuf),
    Data(Vec<u8>),
}

impl From<&str> for Icon {
    /// `http://`/`https://` values are URLs, anything else a file path.
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Icon::Url(value.to_string())
        } else {
            Icon::File(PathBuf::from(value))
        }
    }
}

impl From<String> for Icon {
    fn from(value: String) -> Self {
        Icon::from(value.as_str())
    }
}

impl From<&Path> for Icon {
    fn from(value: &Path) -> Self {
        Icon::File(value.to_path_buf())
    }
}

impl From<PathBuf> for Icon {
    fn from(value: PathBuf) -> Self {
        Icon::File(value)
    }
}

impl From<Vec<u8>> for Icon {
    fn from(value: Vec<u8>) -> Self {
        Icon::Data(value)
    }
}

/// Whether a path looks like an image file the daemon cannot load itself.
fn has_image_extension(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ["png", "gif", "jpg", "jpeg"]
            .iter()
            .any(|i| ext.eq_ignore_ascii_case(i)),
        None => false,
    }
}

/// One header line. Rendered only when a value is present or the header is
/// required for its request kind.
#[derive(Debug, Clone)]
struct Header {
    name: String,
    value: Option<String>,
    required: bool,
}

/// A fully built request: verb, header sections in insertion order, and the
/// inline resources referenced from them. Immutable once built; retries
/// resend the same wire bytes without rebuilding.
#[derive(Debug, Clone)]
pub struct GntpRequest {
    kind: RequestKind,
    sections: Vec<Vec<Header>>,
    resources: Vec<Resource>,
}

impl GntpRequest {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Encode the complete wire form: request line, each section's header
    /// lines followed by a blank line, then one block per resource.
    pub fn to_wire(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(256);
        out.put_slice(b"GNTP/1.0 ");
        out.put_slice(self.kind.verb().as_bytes());
        out.put_slice(b" NONE\r\n");
        for section in &self.sections {
            for h in section {
                match &h.value {
                    Some(v) => {
                        out.put_slice(h.name.as_bytes());
                        out.put_slice(b": ");
                        out.put_slice(v.as_bytes());
                        out.put_slice(b"\r\n");
                    }
                    None if h.required => {
                        out.put_slice(h.name.as_bytes());
                        out.put_slice(b": \r\n");
                    }
                    None => {}
                }
            }
            out.put_slice(b"\r\n");
        }
        for r in &self.resources {
            out.put_slice(format!("Identifier: {}\r\nLength: {}\r\n\r\n", r.identifier(), r.len()).as_bytes());
            out.put_slice(r.data());
            out.put_slice(b"\r\n\r\n");
        }
        out.freeze()
    }
}

/// Incremental request builder. Add headers, close each block with
/// `end_section`, then `build`.
pub struct RequestBuilder {
    kind: RequestKind,
    sections: Vec<Vec<Header>>,
    current: Vec<Header>,
    resources: Vec<Resource>,
}

impl RequestBuilder {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            sections: Vec::new(),
            current: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Add an optional header. A `None` value leaves the header out of the
    /// wire form entirely.
    pub fn header(&mut self, name: &str, value: Option<String>) {
        self.current.push(Header {
            name: name.to_string(),
            value,
            required: false,
        });
    }

    /// Add a header that is mandatory for this request kind.
    pub fn required_header(&mut self, name: &str, value: &str) {
        self.current.push(Header {
            name: name.to_string(),
            value: Some(value.to_string()),
            required: true,
        });
    }

    /// Add an icon-bearing header. URLs and non-image paths pass through as
    /// plain values; image files are read here (before the request is sent)
    /// and raw bytes are embedded as inline resources.
    pub fn icon_header(&mut self, name: &str, icon: Option<&Icon>) -> Result<(), GntpError> {
        let value = match icon {
            None => None,
            Some(Icon::Url(url)) => Some(url.clone()),
            Some(Icon::File(path)) => {
                if has_image_extension(path) {
                    let data = std::fs::read(path)
                        .map_err(|e| GntpError::Icon(format!("{}: {}", path.display(), e)))?;
                    Some(self.embed(data))
                } else {
                    Some(path.display().to_string())
                }
            }
            Some(Icon::Data(data)) => Some(self.embed(data.clone())),
        };
        self.header(name, value);
        Ok(())
    }

    /// Close the current header block with a blank-line separator.
    pub fn end_section(&mut self) {
        self.sections.push(std::mem::take(&mut self.current));
    }

    /// Finish building. An unterminated trailing block is closed implicitly.
    pub fn build(mut self) -> GntpRequest {
        if !self.current.is_empty() {
            self.end_section();
        }
        GntpRequest {
            kind: self.kind,
            sections: self.sections,
            resources: self.resources,
        }
    }

    /// Record `data` as an inline resource and return its reference URI.
    /// Resources with identical bytes are sent once per request.
    fn embed(&mut self, data: Vec<u8>) -> String {
        let resource = Resource::from_bytes(data);
        let uri = resource.uri();
        if !self
            .resources
            .iter()
            .any(|r| r.identifier() == resource.identifier())
        {
            self.resources.push(resource);
        }
        uri
    }
}
