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

//! Downloads one resource, with byte progress and bounded retries.

use bytes::Bytes;
use preflight_core::config::LoaderConfig;
use preflight_core::error::{FetchError, LoadError};
use preflight_core::manifest::ResourceSpec;
use preflight_core::transport::HttpTransport;
use preflight_lanes::DecompressionLane;
use std::sync::Arc;
use std::time::Duration;

/// How often and how patiently a resource is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts before giving up (at least one is always made).
    pub max_retries: u32,
    /// Fixed pause between two attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&LoaderConfig> for RetryPolicy {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Performs one logical resource download.
///
/// Each attempt issues a GET, streams the body while reporting the received
/// fraction, and decodes it. Any failure restarts the whole attempt after a
/// fixed delay until [`RetryPolicy::max_retries`] attempts were made.
pub struct RetryingFetcher {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// Creates a fetcher on top of `transport`.
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The retry policy in use.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Downloads and decodes `spec`, calling `on_progress` with the received
    /// fraction of the body.
    ///
    /// Within an attempt the reported fractions strictly increase. When an
    /// attempt fails and another one follows, `on_progress(0.0)` is reported
    /// first so no stale progress survives the restart. A successful download
    /// always ends on `1.0`.
    ///
    /// # Errors
    /// [`LoadError::ResourceLoad`] with the URL and the last attempt's cause
    /// once every attempt failed.
    pub async fn fetch<F>(&self, spec: &ResourceSpec, mut on_progress: F) -> Result<Vec<u8>, LoadError>
    where
        F: FnMut(f64) + Send,
    {
        let mut attempts: u32 = 0;

        loop {
            match self.attempt(spec, &mut on_progress).await {
                Ok(bytes) => {
                    if attempts > 0 {
                        log::info!(
                            "'{}' loaded on attempt {} of {}",
                            spec.name,
                            attempts + 1,
                            self.policy.max_retries
                        );
                    }
                    return Ok(bytes);
                }
                Err(cause) => {
                    attempts += 1;
                    if attempts >= self.policy.max_retries {
                        log::error!(
                            "Giving up on '{}' ({}) after {attempts} attempt(s): {cause}",
                            spec.name,
                            spec.url
                        );
                        return Err(LoadError::ResourceLoad {
                            name: spec.name.clone(),
                            url: spec.url.clone(),
                            attempts,
                            source: cause,
                        });
                    }

                    log::warn!(
                        "Attempt {attempts}/{} for '{}' failed: {cause}. Retrying in {:?}",
                        self.policy.max_retries,
                        spec.name,
                        self.policy.retry_delay
                    );
                    on_progress(0.0);
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
            }
        }
    }

    async fn attempt<F>(&self, spec: &ResourceSpec, on_progress: &mut F) -> Result<Vec<u8>, FetchError>
    where
        F: FnMut(f64) + Send,
    {
        log::debug!("GET {}", spec.url);
        let mut response = self.transport.get(&spec.url).await?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(FetchError::HttpStatus { status });
        }

        if response.transport_decoded() {
            // No byte progress is available here: the bar jumps straight to
            // done for this resource.
            let mut body = Vec::new();
            while let Some(chunk) = response.next_chunk().await? {
                body.extend_from_slice(&chunk);
            }
            on_progress(1.0);
            return Ok(DecompressionLane::decompress(
                &spec.name,
                spec.compression,
                body,
                true,
            )?);
        }

        let total = response.content_length().ok_or(FetchError::LengthUnknown)?;

        let mut chunks: Vec<Bytes> = Vec::new();
        let mut received: u64 = 0;
        let mut reported: f64 = 0.0;

        while let Some(chunk) = response.next_chunk().await? {
            if chunk.is_empty() {
                continue;
            }
            received += chunk.len() as u64;
            chunks.push(chunk);

            if total > 0 {
                let fraction = (received as f64 / total as f64).min(1.0);
                if fraction > reported {
                    reported = fraction;
                    on_progress(fraction);
                }
            }
        }

        if received != total {
            log::warn!(
                "'{}': received {received} bytes but Content-Length announced {total}",
                spec.name
            );
        }

        let mut body = Vec::with_capacity(received as usize);
        for chunk in &chunks {
            body.extend_from_slice(chunk);
        }
        drop(chunks);

        let decoded = DecompressionLane::decompress(&spec.name, spec.compression, body, false)?;
        if reported < 1.0 {
            on_progress(1.0);
        }
        Ok(decoded)
    }
}
