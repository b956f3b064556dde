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

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The compression applied to a resource payload on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    /// RFC 1952 gzip, possibly multi-member.
    #[default]
    Gzip,
    /// RFC 1950 zlib stream.
    Zlib,
    /// Raw RFC 1951 deflate stream, no header.
    Deflate,
    /// The payload is stored as-is.
    None,
}

impl CompressionFormat {
    /// Guesses the format from a URL's file suffix. Query strings and
    /// fragments are ignored. Unknown suffixes default to gzip, the format
    /// web builds ship in.
    pub fn infer_from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();

        if file.ends_with(".zz") || file.ends_with(".zlib") {
            CompressionFormat::Zlib
        } else if file.ends_with(".deflate") {
            CompressionFormat::Deflate
        } else {
            CompressionFormat::Gzip
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionFormat::Gzip => "gzip",
            CompressionFormat::Zlib => "zlib",
            CompressionFormat::Deflate => "deflate",
            CompressionFormat::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for CompressionFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(CompressionFormat::Gzip),
            "zlib" => Ok(CompressionFormat::Zlib),
            "deflate" => Ok(CompressionFormat::Deflate),
            "none" | "identity" => Ok(CompressionFormat::None),
            other => Err(ConfigError::UnknownCompression(other.to_string())),
        }
    }
}
