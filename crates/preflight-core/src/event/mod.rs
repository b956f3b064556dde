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

//! Message types and the channel primitive used to move progress between tasks.
//!
//! Fetch tasks never touch shared progress state. They publish
//! [`ProgressEvent`]s on an [`EventBus`], and the orchestrator task that owns
//! the aggregator drains it. Observers outside the loader can receive the
//! higher-level [`LoadEvent`] stream.

mod bus;

pub use self::bus::EventBus;

/// The latest byte-progress fraction of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Resource name from the manifest.
    pub name: String,
    /// Fraction of the body received, in `[0, 1]`. A `0.0` after a non-zero
    /// value means a retry restarted the stream.
    pub fraction: f64,
}

/// A notable step of a load, published to an optional subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A resource reported new byte progress.
    ResourceProgress {
        /// Resource name.
        name: String,
        /// Fraction in `[0, 1]`.
        fraction: f64,
    },
    /// The composite download progress changed; value in `[0, 70]`.
    Composite(f64),
    /// A resource finished downloading and decoding.
    Downloaded {
        /// Resource name.
        name: String,
        /// Decoded size in bytes.
        bytes: usize,
    },
    /// The post-download schedule moved the target to this value.
    ChoreographyStep(f64),
    /// Loading finished and the surface was hidden.
    Completed,
    /// Loading failed permanently.
    Failed {
        /// URL of the resource that failed, when known.
        url: Option<String>,
        /// Human readable description.
        message: String,
    },
}
