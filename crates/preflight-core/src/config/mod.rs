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

//! Loader tuning and the on-disk manifest format.
//!
//! The defaults are three attempts per resource two seconds apart, a ~60 Hz
//! animation, and the 90/92/94/97/100 closing schedule.

mod choreography;

pub use choreography::{Choreography, ChoreographyStep};

use crate::error::ConfigError;
use crate::manifest::{CompressionFormat, Manifest, ManifestEntry, ResourceSpec};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables of one loader instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Total attempts per resource before the load fails.
    pub max_retries: u32,
    /// Fixed pause between two attempts of the same resource.
    pub retry_delay_ms: u64,
    /// Period of the progress animation's frame loop.
    pub frame_interval_ms: u64,
    /// Cosmetic steps run once every resource is downloaded.
    pub choreography: Choreography,
}

impl LoaderConfig {
    /// Pause between attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Animation frame period, never shorter than one millisecond.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Checks the values that cannot be represented by the types alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.choreography.validate()
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
            frame_interval_ms: 16,
            choreography: Choreography::default(),
        }
    }
}

/// One resource as written in a manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Unique resource name.
    pub name: String,
    /// URL to download.
    pub url: String,
    /// MIME type of the decoded payload.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Compression format name; inferred from the URL when absent.
    #[serde(default)]
    pub compression: Option<String>,
    /// Share of the download progress band.
    pub weight: f64,
}

fn default_mime_type() -> String {
    Manifest::DATA_MIME.to_string()
}

/// The JSON manifest file read by the runtime.
///
/// ```json
/// {
///   "resources": [
///     { "name": "data", "url": "https://cdn.example.com/Build/game.data.gz", "weight": 0.6 },
///     { "name": "framework", "url": "https://cdn.example.com/Build/game.framework.js.gz",
///       "mime_type": "application/javascript", "weight": 0.2 },
///     { "name": "code", "url": "https://cdn.example.com/Build/game.wasm.gz",
///       "mime_type": "application/wasm", "weight": 0.2 }
///   ],
///   "loader": { "max_retries": 3, "retry_delay_ms": 2000 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// The resources to load.
    pub resources: Vec<ResourceConfig>,
    /// Loader tuning; defaults apply to anything omitted.
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl ManifestConfig {
    /// Parses a manifest from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file '{}'", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse manifest file '{}'", path.display()))
    }

    /// Validates the file and splits it into a [`Manifest`] and its [`LoaderConfig`].
    pub fn into_parts(self) -> Result<(Manifest, LoaderConfig), ConfigError> {
        let entries = self
            .resources
            .into_iter()
            .map(|resource| {
                let compression = match resource.compression.as_deref() {
                    Some(name) => name.parse::<CompressionFormat>()?,
                    None => CompressionFormat::infer_from_url(&resource.url),
                };
                Ok(ManifestEntry {
                    spec: ResourceSpec::new(resource.name, resource.url, resource.mime_type)
                        .with_compression(compression),
                    weight: resource.weight,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        self.loader.validate()?;
        Ok((Manifest::new(entries)?, self.loader))
    }
}
