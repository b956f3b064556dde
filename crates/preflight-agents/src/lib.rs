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

//! Agents driving the preloader lanes.
//!
//! - [`fetch_agent`]: one resource download with progress and retries.
//! - [`progress_agent`]: the eased, frame-paced progress display.
//! - [`load_agent`]: the orchestrator tying both to a manifest.

#![warn(missing_docs)]

pub mod fetch_agent;
pub mod load_agent;
pub mod progress_agent;

pub use fetch_agent::{RetryPolicy, RetryingFetcher};
pub use load_agent::LoadOrchestrator;
pub use progress_agent::ProgressAnimator;
