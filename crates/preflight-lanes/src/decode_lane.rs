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

//! Turns a downloaded payload into the bytes the consumer mounts.

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use preflight_core::error::DecodeError;
use preflight_core::manifest::CompressionFormat;
use std::io::Read;

/// A "Lane" responsible for decompressing downloaded resource bodies.
///
/// The lane is stateless. Bodies that the transport already decoded pass
/// through untouched; everything else is decoded according to the
/// resource's [`CompressionFormat`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DecompressionLane;

impl DecompressionLane {
    /// Decodes `bytes` of `resource`.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] naming `resource` when the payload is not a
    /// valid stream of the expected format (bad header, truncated body,
    /// corrupt checksum).
    pub fn decompress(
        resource: &str,
        format: CompressionFormat,
        bytes: Vec<u8>,
        already_decoded: bool,
    ) -> Result<Vec<u8>, DecodeError> {
        if already_decoded {
            log::debug!("'{resource}': body decoded by the transport, skipping {format} decoding");
            return Ok(bytes);
        }

        let mut output = Vec::with_capacity(bytes.len().saturating_mul(2));
        let result = match format {
            CompressionFormat::None => return Ok(bytes),
            CompressionFormat::Gzip => MultiGzDecoder::new(bytes.as_slice()).read_to_end(&mut output),
            CompressionFormat::Zlib => ZlibDecoder::new(bytes.as_slice()).read_to_end(&mut output),
            CompressionFormat::Deflate => {
                DeflateDecoder::new(bytes.as_slice()).read_to_end(&mut output)
            }
        };

        match result {
            Ok(_) => {
                log::debug!(
                    "'{resource}': {format} {} bytes -> {} bytes",
                    bytes.len(),
                    output.len()
                );
                Ok(output)
            }
            Err(e) => Err(DecodeError {
                resource: resource.to_string(),
                format,
                message: e.to_string(),
            }),
        }
    }
}
