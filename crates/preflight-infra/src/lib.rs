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

//! Concrete implementations of the interfaces defined in `preflight-core`.
//!
//! - [`http`]: the `reqwest` backed [`HttpTransport`](preflight_core::transport::HttpTransport).
//! - [`surface`]: a [`ProgressSurface`](preflight_core::surface::ProgressSurface)
//!   drawing a text progress bar.

#![warn(missing_docs)]

pub mod http;
pub mod surface;

pub use http::{ReqwestTransport, TransportConfig};
pub use surface::TerminalSurface;
