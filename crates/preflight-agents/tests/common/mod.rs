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

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use preflight_core::error::TransportError;
use preflight_core::surface::ProgressSurface;
use preflight_core::transport::{HttpResponse, HttpTransport};
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Deterministic, poorly compressible test payload.
pub fn payload(len: usize, seed: u8) -> Vec<u8> {
    let mut state = seed as u32 + 1;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// One scripted answer to a GET.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    chunks: Vec<Bytes>,
    content_length: Option<u64>,
    transport_decoded: bool,
    chunk_delay: Duration,
    reset_after: Option<usize>,
    refuse: Option<String>,
}

impl Reply {
    /// A 200 whose body is `body` split into `chunk_size` pieces.
    pub fn ok(body: &[u8], chunk_size: usize) -> Self {
        let chunks: Vec<Bytes> = body
            .chunks(chunk_size.max(1))
            .map(Bytes::copy_from_slice)
            .collect();
        Self {
            status: 200,
            content_length: Some(body.len() as u64),
            chunks,
            transport_decoded: false,
            chunk_delay: Duration::ZERO,
            reset_after: None,
            refuse: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok(b"error page", 64)
        }
    }

    /// The connection fails before any response arrives.
    pub fn refused(message: &str) -> Self {
        Self {
            refuse: Some(message.to_string()),
            ..Self::ok(b"", 1)
        }
    }

    /// A body the transport already decompressed.
    pub fn decoded(body: &[u8]) -> Self {
        Self {
            content_length: None,
            transport_decoded: true,
            ..Self::ok(body, body.len())
        }
    }

    pub fn without_length(mut self) -> Self {
        self.content_length = None;
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// The stream breaks after `chunks` chunks were delivered.
    pub fn reset_after(mut self, chunks: usize) -> Self {
        self.reset_after = Some(chunks);
        self
    }
}

struct ScriptedResponse {
    reply: Reply,
    chunks: VecDeque<Bytes>,
    delivered: usize,
}

#[async_trait]
impl HttpResponse for ScriptedResponse {
    fn status(&self) -> u16 {
        self.reply.status
    }

    fn content_length(&self) -> Option<u64> {
        self.reply.content_length
    }

    fn transport_decoded(&self) -> bool {
        self.reply.transport_decoded
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        if !self.reply.chunk_delay.is_zero() {
            tokio::time::sleep(self.reply.chunk_delay).await;
        }
        if self.reply.reset_after == Some(self.delivered) {
            return Err(TransportError::new("connection reset by peer"));
        }
        self.delivered += 1;
        Ok(self.chunks.pop_front())
    }
}

/// Answers GETs from per-URL scripts. The last reply of a script repeats.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
        self
    }

    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>, TransportError> {
        *self.attempts.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let script = routes
                .get_mut(url)
                .ok_or_else(|| TransportError::new(format!("no route to {url}")))?;
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        }
        .ok_or_else(|| TransportError::new("empty script"))?;

        if let Some(message) = &reply.refuse {
            return Err(TransportError::new(message.clone()));
        }

        Ok(Box::new(ScriptedResponse {
            chunks: reply.chunks.clone().into(),
            reply,
            delivered: 0,
        }))
    }
}

/// A surface that records every call.
#[derive(Default)]
pub struct RecordingSurface {
    pub percents: Mutex<Vec<u8>>,
    pub texts: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub hides: Mutex<u32>,
}

impl RecordingSurface {
    pub fn percents(&self) -> Vec<u8> {
        self.percents.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn hide_count(&self) -> u32 {
        *self.hides.lock().unwrap()
    }
}

impl ProgressSurface for RecordingSurface {
    fn set_percent(&self, percent: u8) {
        self.percents.lock().unwrap().push(percent);
    }

    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }

    fn set_error_state(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn hide(&self) {
        *self.hides.lock().unwrap() += 1;
    }
}
