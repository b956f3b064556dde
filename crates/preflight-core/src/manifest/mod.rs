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

//! The resource manifest: which resources to download, from where, and how much
//! each one counts towards the download progress band.
//!
//! The set of resources is fixed for the lifetime of a loader. A [`Manifest`]
//! is validated once when it is built, so downstream code can rely on names
//! being unique and non-empty.

mod compression;

pub use compression::CompressionFormat;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One downloadable, named binary asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Unique key of the resource within its manifest (e.g. `"data"`).
    pub name: String,
    /// Absolute URL to GET.
    pub url: String,
    /// MIME type attached to the decoded blob handle.
    pub mime_type: String,
    /// How the payload is compressed on the server.
    pub compression: CompressionFormat,
}

impl ResourceSpec {
    /// Creates a spec, inferring the compression format from the URL suffix.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let compression = CompressionFormat::infer_from_url(&url);
        Self {
            name: name.into(),
            url,
            mime_type: mime_type.into(),
            compression,
        }
    }

    /// Overrides the compression format.
    pub fn with_compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = compression;
        self
    }
}

/// A resource together with its share of the download progress band.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// The resource to load.
    pub spec: ResourceSpec,
    /// Relative weight; all weights of a manifest sum to one.
    pub weight: f64,
}

/// A validated, ordered set of resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// MIME type of the data segment in the three-resource layout.
    pub const DATA_MIME: &'static str = "application/octet-stream";
    /// MIME type of the runtime framework script.
    pub const FRAMEWORK_MIME: &'static str = "application/javascript";
    /// MIME type of the compiled code module.
    pub const CODE_MIME: &'static str = "application/wasm";

    /// Builds a manifest from `(spec, weight)` entries.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyManifest`] for an empty list,
    /// [`ConfigError::EmptyName`] for a nameless resource, and
    /// [`ConfigError::DuplicateResource`] when a name repeats. Weights are
    /// checked by the progress aggregator, not here.
    pub fn new(entries: Vec<ManifestEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyManifest);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.spec.name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if !seen.insert(entry.spec.name.as_str()) {
                return Err(ConfigError::DuplicateResource(entry.spec.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The three-resource layout of a compressed web build: a data segment
    /// (weight 0.6), the runtime framework (0.2), and the compiled code (0.2).
    ///
    /// `base_url` is the directory holding the build output, `build_name` the
    /// common file stem, e.g. `Build/` and `game` for `Build/game.data.gz`.
    pub fn web_build(base_url: &str, build_name: &str) -> Result<Self, ConfigError> {
        let base = base_url.trim_end_matches('/');
        let url = |suffix: &str| format!("{base}/{build_name}.{suffix}");

        Self::new(vec![
            ManifestEntry {
                spec: ResourceSpec::new("data", url("data.gz"), Self::DATA_MIME),
                weight: 0.6,
            },
            ManifestEntry {
                spec: ResourceSpec::new("framework", url("framework.js.gz"), Self::FRAMEWORK_MIME),
                weight: 0.2,
            },
            ManifestEntry {
                spec: ResourceSpec::new("code", url("wasm.gz"), Self::CODE_MIME),
                weight: 0.2,
            },
        ])
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Iterates over the resource specs, in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &ResourceSpec> {
        self.entries.iter().map(|entry| &entry.spec)
    }

    /// The `(name, weight)` table used to build a progress aggregator.
    pub fn weights(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.spec.name.clone(), entry.weight))
            .collect()
    }

    /// Looks up a resource by name.
    pub fn get(&self, name: &str) -> Option<&ResourceSpec> {
        self.specs().find(|spec| spec.name == name)
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a validated manifest.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, weight: f64) -> ManifestEntry {
        ManifestEntry {
            spec: ResourceSpec::new(name, format!("https://cdn.test/{name}.gz"), "application/octet-stream"),
            weight,
        }
    }

    #[test]
    fn web_build_has_three_weighted_resources() {
        let manifest = Manifest::web_build("https://cdn.test/Build/", "game").unwrap();

        assert_eq!(manifest.len(), 3);
        let names: Vec<_> = manifest.specs().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["data", "framework", "code"]);

        let code = manifest.get("code").unwrap();
        assert_eq!(code.url, "https://cdn.test/Build/game.wasm.gz");
        assert_eq!(code.mime_type, "application/wasm");
        assert_eq!(code.compression, CompressionFormat::Gzip);

        let total: f64 = manifest.weights().iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_empty_manifest() {
        assert_eq!(Manifest::new(vec![]), Err(ConfigError::EmptyManifest));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Manifest::new(vec![entry("data", 0.5), entry("data", 0.5)]);
        assert_eq!(result, Err(ConfigError::DuplicateResource("data".into())));
    }

    #[test]
    fn rejects_blank_names() {
        let result = Manifest::new(vec![entry("  ", 1.0)]);
        assert_eq!(result, Err(ConfigError::EmptyName));
    }
}
