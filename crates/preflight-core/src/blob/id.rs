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

use std::fmt;
use uuid::Uuid;

/// A unique identifier for a decoded blob.
///
/// Every handle produced by a load gets a fresh random (version 4) id, so two
/// loads of the same URL never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId(Uuid);

impl BlobId {
    /// Creates a new, random (version 4) `BlobId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Formats the id as a `blob:` reference.
    pub fn to_url(self) -> String {
        format!("blob:{}", self.0.hyphenated())
    }
}

impl Default for BlobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
