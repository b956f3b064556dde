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

//! # Preflight Core
//!
//! Foundational crate containing the manifest types, handles, error taxonomy,
//! and interface contracts shared by every part of the preloader.
//!
//! Nothing in here performs I/O. The HTTP transport and the progress surface
//! are traits implemented in `preflight-infra` (or by the embedding
//! application), and the loading logic lives in `preflight-agents`.

#![warn(missing_docs)]

pub mod blob;
pub mod config;
pub mod error;
pub mod event;
pub mod manifest;
pub mod surface;
pub mod transport;

pub use blob::{BlobHandle, BlobId, LoadResult};
pub use config::{Choreography, ChoreographyStep, LoaderConfig, ManifestConfig};
pub use error::{ConfigError, DecodeError, FetchError, LoadError, TransportError};
pub use manifest::{CompressionFormat, Manifest, ManifestEntry, ResourceSpec};
