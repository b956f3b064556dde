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

//! Decoded resources handed to the downstream consumer.
//!
//! A [`BlobHandle`] is the in-process counterpart of a browser object URL: an
//! opaque, cheaply clonable reference to immutable bytes tagged with a MIME
//! type. The set of handles produced by one load is a [`LoadResult`].

mod handle;
mod id;

pub use handle::BlobHandle;
pub use id::BlobId;

use std::collections::HashMap;

/// The decoded resources of one successful load, keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    handles: HashMap<String, BlobHandle>,
}

impl LoadResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle under its resource name, replacing any previous one.
    pub fn insert(&mut self, handle: BlobHandle) {
        self.handles.insert(handle.name().to_string(), handle);
    }

    /// Returns the handle of a resource.
    pub fn get(&self, name: &str) -> Option<&BlobHandle> {
        self.handles.get(name)
    }

    /// Iterates over `(name, handle)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlobHandle)> {
        self.handles.iter().map(|(name, handle)| (name.as_str(), handle))
    }

    /// Number of handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true` when no handle has been added.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Total size of all decoded payloads, in bytes.
    pub fn total_bytes(&self) -> usize {
        self.handles.values().map(BlobHandle::len).sum()
    }

    /// Consumes the result into its underlying map.
    pub fn into_inner(self) -> HashMap<String, BlobHandle> {
        self.handles
    }
}

impl IntoIterator for LoadResult {
    type Item = (String, BlobHandle);
    type IntoIter = std::collections::hash_map::IntoIter<String, BlobHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_handles_by_resource_name() {
        let mut result = LoadResult::new();
        result.insert(BlobHandle::new("data", "application/octet-stream", vec![1, 2, 3]));
        result.insert(BlobHandle::new("code", "application/wasm", vec![0, 97, 115, 109]));

        assert_eq!(result.len(), 2);
        assert_eq!(result.total_bytes(), 7);
        assert_eq!(result.get("code").unwrap().mime_type(), "application/wasm");
        assert!(result.get("framework").is_none());
    }
}
