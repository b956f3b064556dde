// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::BlobId;
use bytes::Bytes;
use std::ops::Deref;

/// A thread-safe, reference-counted handle to a decoded resource.
///
/// Cloning a handle is cheap: it shares the underlying buffer. The bytes are
/// freed when the last clone is dropped, so ownership passes entirely to the
/// caller once the loader returns.
#[derive(Debug, Clone)]
pub struct BlobHandle {
    id: BlobId,
    name: String,
    mime_type: String,
    bytes: Bytes,
}

impl BlobHandle {
    /// Wraps decoded bytes into a new handle with a fresh [`BlobId`].
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            id: BlobId::new(),
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The unique identity of this blob.
    pub fn id(&self) -> BlobId {
        self.id
    }

    /// A `blob:<uuid>` reference string, stable for the handle's lifetime.
    pub fn url(&self) -> String {
        self.id.to_url()
    }

    /// Name of the resource this blob was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type declared in the manifest.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// A shared view of the bytes.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Deref for BlobHandle {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl AsRef<[u8]> for BlobHandle {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity_and_bytes() {
        let handle = BlobHandle::new("framework", "application/javascript", b"var a;".to_vec());
        let clone = handle.clone();

        assert_eq!(handle.id(), clone.id());
        assert_eq!(&*clone, b"var a;");
        assert!(handle.url().starts_with("blob:"));
    }

    #[test]
    fn distinct_handles_get_distinct_urls() {
        let a = BlobHandle::new("a", "application/octet-stream", Vec::new());
        let b = BlobHandle::new("a", "application/octet-stream", Vec::new());
        assert_ne!(a.url(), b.url());
        assert!(a.is_empty());
    }
}
