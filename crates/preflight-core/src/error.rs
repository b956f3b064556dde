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

//! Defines the hierarchy of error types for resource loading.
//!
//! Attempt-level failures ([`FetchError`]) are retried by the fetcher and never
//! reach the caller directly. Once the retry budget is spent they are wrapped
//! into [`LoadError::ResourceLoad`], which is what `load_all` propagates.

use crate::manifest::CompressionFormat;
use thiserror::Error;

/// A compressed payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode {format} payload of resource '{resource}': {message}")]
pub struct DecodeError {
    /// Name of the resource whose payload was malformed.
    pub resource: String,
    /// The format the payload was expected to be in.
    pub format: CompressionFormat,
    /// Decoder diagnostic.
    pub message: String,
}

/// A failure reported by an [`HttpTransport`](crate::transport::HttpTransport)
/// (connection refused, reset mid-body, TLS failure, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    /// Creates a transport error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The reason a single download attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },
    /// The response carried no `Content-Length`, so progress cannot be computed.
    #[error("response has no content length; byte progress cannot be computed")]
    LengthUnknown,
    /// The body arrived but could not be decompressed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The transport failed before or while streaming the body.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

/// Invalid manifest or loader configuration, detected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The manifest lists no resources.
    #[error("manifest contains no resources")]
    EmptyManifest,
    /// A resource has an empty name.
    #[error("resource names must not be empty")]
    EmptyName,
    /// Two resources share a name.
    #[error("resource '{0}' is declared more than once")]
    DuplicateResource(String),
    /// A weight is negative, NaN or infinite.
    #[error("weight {weight} of resource '{name}' is not a finite, non-negative number")]
    InvalidWeight {
        /// Resource the weight belongs to.
        name: String,
        /// The offending weight.
        weight: f64,
    },
    /// The weights do not add up to one.
    #[error("resource weights sum to {sum}, expected 1.0")]
    WeightSum {
        /// The actual sum.
        sum: f64,
    },
    /// A compression format name was not recognised.
    #[error("unknown compression format '{0}'")]
    UnknownCompression(String),
    /// The post-download schedule is not an ascending list of targets in [0, 100].
    #[error("invalid choreography: {0}")]
    Choreography(String),
}

/// The error returned by the orchestrator and the fetcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// A resource failed on every attempt.
    #[error("failed to load resource '{name}' from {url} after {attempts} attempt(s): {source}")]
    ResourceLoad {
        /// Resource name.
        name: String,
        /// URL that was requested.
        url: String,
        /// How many attempts were made.
        attempts: u32,
        /// The failure of the last attempt.
        #[source]
        source: FetchError,
    },
    /// The loader was built from an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A download task panicked or was cancelled by the runtime.
    #[error("download task ended abnormally: {0}")]
    Join(String),
}

impl LoadError {
    /// The URL of the failed resource, if this error is about one.
    pub fn url(&self) -> Option<&str> {
        match self {
            LoadError::ResourceLoad { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_load_error_names_the_url() {
        let err = LoadError::ResourceLoad {
            name: "data".to_string(),
            url: "https://cdn.example.com/build.data.gz".to_string(),
            attempts: 3,
            source: FetchError::HttpStatus { status: 503 },
        };

        let message = err.to_string();
        assert!(message.contains("https://cdn.example.com/build.data.gz"));
        assert!(message.contains("503"));
        assert_eq!(err.url(), Some("https://cdn.example.com/build.data.gz"));
    }

    #[test]
    fn decode_error_converts_into_fetch_error() {
        let decode = DecodeError {
            resource: "code".to_string(),
            format: CompressionFormat::Gzip,
            message: "invalid gzip header".to_string(),
        };
        let fetch: FetchError = decode.clone().into();
        assert_eq!(fetch, FetchError::Decode(decode));
    }
}
