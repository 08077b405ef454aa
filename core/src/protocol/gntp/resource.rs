/*
 * resource.rs
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

//! Inline binary resources (icons). A resource is content-addressed: its
//! identifier is the MD5 of its bytes, and headers reference it through an
//! `x-growl-resource://` URI while the bytes travel in a trailing block.

use md5::{Digest, Md5};

/// URI scheme that ties an icon header to an inline resource block.
pub const RESOURCE_SCHEME: &str = "x-growl-resource://";

/// One inline resource: identifier (MD5 hex of the bytes) plus the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    identifier: String,
    data: Vec<u8>,
}

impl Resource {
    /// Build a resource from raw bytes. Identical bytes always produce the
    /// same identifier.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let identifier = md5_hex(&data);
        Self { identifier, data }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Value for the `Length` header of the resource block.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reference URI used as the header value: `x-growl-resource://<hash>`.
    pub fn uri(&self) -> String {
        format!("{}{}", RESOURCE_SCHEME, self.identifier)
    }
}

fn md5_hex(data: &[u8]) -> String {
    let digest = Md5::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_md5_vector() {
        let r = Resource::from_bytes(b"abc".to_vec());
        assert_eq!(r.identifier(), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn identical_bytes_identical_identifier() {
        let a = Resource::from_bytes(vec![1, 2, 3, 4]);
        let b = Resource::from_bytes(vec![1, 2, 3, 4]);
        assert_eq!(a.identifier(), b.identifier());
        assert_eq!(a.uri(), b.uri());
    }

    #[test]
    fn uri_uses_resource_scheme() {
        let r = Resource::from_bytes(b"icon".to_vec());
        assert!(r.uri().starts_with("x-growl-resource://"));
        assert_eq!(r.uri().len(), RESOURCE_SCHEME.len() + 32);
    }
}
