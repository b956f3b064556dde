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

//! The HTTP seam of the loader.
//!
//! The fetcher only needs a GET that yields a status, an optional length, a
//! "the transport already decompressed this" flag, and a stream of body
//! chunks. Keeping that behind a trait lets the concrete client live in
//! `preflight-infra` and lets tests script responses byte by byte.

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;

/// An in-flight HTTP response whose body is read chunk by chunk.
#[async_trait]
pub trait HttpResponse: Send {
    /// The HTTP status code.
    fn status(&self) -> u16;

    /// The body length announced by the server, when known.
    ///
    /// This is the length of the bytes [`next_chunk`](Self::next_chunk) will
    /// yield, so it must be `None` when the transport decodes the body.
    fn content_length(&self) -> Option<u64>;

    /// `true` when the transport layer performed content decoding itself, in
    /// which case the yielded bytes are already decompressed.
    fn transport_decoded(&self) -> bool;

    /// Reads the next chunk of the body, `None` at the end of the stream.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// Something that can issue a GET request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a GET for `url` and returns once the response headers arrived.
    async fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>, TransportError>;
}

/// A fully buffered response, handy for transports that must read the whole
/// body up front (for instance to undo a `Content-Encoding`) and for tests.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: u16,
    content_length: Option<u64>,
    transport_decoded: bool,
    chunks: std::collections::VecDeque<Bytes>,
}

impl BufferedResponse {
    /// A response whose body is the given chunks, with an accurate
    /// `Content-Length`.
    pub fn new(status: u16, chunks: Vec<Bytes>) -> Self {
        let length = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            status,
            content_length: Some(length),
            transport_decoded: false,
            chunks: chunks.into(),
        }
    }

    /// A body the transport already decoded; the length is unknown.
    pub fn decoded(status: u16, body: Bytes) -> Self {
        Self {
            status,
            content_length: None,
            transport_decoded: true,
            chunks: std::iter::once(body).collect(),
        }
    }

    /// Overrides the announced length (`None` drops the header).
    pub fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }
}

#[async_trait]
impl HttpResponse for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn transport_decoded(&self) -> bool {
        self.transport_decoded
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        Ok(self.chunks.pop_front())
    }
}
