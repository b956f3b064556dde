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

//! `reqwest` implementation of the loader's HTTP seam.

use async_trait::async_trait;
use bytes::Bytes;
use preflight_core::error::TransportError;
use preflight_core::manifest::CompressionFormat;
use preflight_core::transport::{BufferedResponse, HttpResponse, HttpTransport};
use preflight_lanes::DecompressionLane;
use reqwest::header::CONTENT_ENCODING;
use std::time::Duration;

/// Client settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Limit for a whole request, body included. `None` lets large downloads
    /// take as long as they need.
    pub timeout: Option<Duration>,
    /// Limit for establishing the connection.
    pub connect_timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("preflight/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// How the server encoded the body on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyEncoding {
    Identity,
    Decode(CompressionFormat),
    Unsupported(String),
}

impl BodyEncoding {
    fn from_header(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return Self::Identity;
        };
        match value.to_ascii_lowercase().as_str() {
            "" | "identity" => Self::Identity,
            "gzip" | "x-gzip" => Self::Decode(CompressionFormat::Gzip),
            // HTTP "deflate" is a zlib stream.
            "deflate" => Self::Decode(CompressionFormat::Zlib),
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// An [`HttpTransport`] backed by a shared `reqwest` client.
///
/// Bodies are streamed chunk by chunk. When the server applied a
/// `Content-Encoding`, the body is read in full and decoded here instead, and
/// the response is flagged as transport-decoded without a length, since the
/// wire length says nothing about the bytes handed out.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with [`TransportConfig::default`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates a transport with explicit client settings.
    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::new(format!("failed to build HTTP client: {e}")))?;
        log::debug!("HTTP client ready ({config:?})");
        Ok(Self { client })
    }

    /// Wraps an existing client.
    ///
    /// The client must not decompress bodies on its own, or byte progress and
    /// the decoding of compressed resources will both be off.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>, TransportError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();

        let encoding = BodyEncoding::from_header(
            response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|value| value.to_str().ok()),
        );

        match encoding {
            BodyEncoding::Decode(format) if status.is_success() => {
                log::debug!("{url}: Content-Encoding {format}, decoding in the transport");
                let body = response.bytes().await.map_err(transport_error)?;
                let decoded = DecompressionLane::decompress(url, format, body.to_vec(), false)
                    .map_err(|e| TransportError::new(e.to_string()))?;
                Ok(Box::new(BufferedResponse::decoded(
                    status.as_u16(),
                    Bytes::from(decoded),
                )))
            }
            BodyEncoding::Unsupported(name) if status.is_success() => Err(TransportError::new(
                format!("unsupported Content-Encoding '{name}' for {url}"),
            )),
            _ => Ok(Box::new(StreamingResponse {
                status: status.as_u16(),
                content_length: response.content_length(),
                response,
            })),
        }
    }
}

struct StreamingResponse {
    status: u16,
    content_length: Option<u64>,
    response: reqwest::Response,
}

#[async_trait]
impl HttpResponse for StreamingResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn transport_decoded(&self) -> bool {
        false
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        self.response.chunk().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_body() || err.is_decode() {
        "body read failed"
    } else {
        "request failed"
    };
    TransportError::new(format!("{kind}: {err}"))
}
