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

//! The top-level coordinator of a load.
//!
//! The [`LoadOrchestrator`] owns the manifest, fans out one
//! [`RetryingFetcher`] task per resource, folds their progress into the
//! composite value, and drives the animator through the closing schedule.
//!
//! Progress flows by message passing: fetch tasks publish
//! [`ProgressEvent`]s on an [`EventBus`], and the task running
//! [`download_all`](LoadOrchestrator::download_all) is the only one that
//! reads them and touches the aggregator.

use crate::fetch_agent::{RetryPolicy, RetryingFetcher};
use crate::progress_agent::ProgressAnimator;
use preflight_core::blob::{BlobHandle, LoadResult};
use preflight_core::config::LoaderConfig;
use preflight_core::error::LoadError;
use preflight_core::event::{EventBus, LoadEvent, ProgressEvent};
use preflight_core::manifest::Manifest;
use preflight_core::surface::ProgressSurface;
use preflight_core::transport::HttpTransport;
use preflight_lanes::progress_lane::{external_to_display, ProgressAggregator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Loads every resource of a manifest and reports progress on a surface.
pub struct LoadOrchestrator {
    manifest: Manifest,
    config: LoaderConfig,
    fetcher: Arc<RetryingFetcher>,
    surface: Arc<dyn ProgressSurface>,
    animator: ProgressAnimator,
    hidden: AtomicBool,
    event_sender: Option<flume::Sender<LoadEvent>>,
}

impl LoadOrchestrator {
    /// Creates an orchestrator.
    ///
    /// # Errors
    /// Fails fast with [`LoadError::Config`] when the manifest weights do not
    /// sum to one or the choreography is not ascending.
    pub fn new(
        manifest: Manifest,
        config: LoaderConfig,
        transport: Arc<dyn HttpTransport>,
        surface: Arc<dyn ProgressSurface>,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        ProgressAggregator::new(manifest.weights())?;

        let fetcher = RetryingFetcher::new(transport, RetryPolicy::from(&config));
        let animator = ProgressAnimator::new(surface.clone(), config.frame_interval());

        log::info!(
            "LoadOrchestrator ready: {} resource(s), {} attempt(s) each",
            manifest.len(),
            config.max_retries
        );

        Ok(Self {
            manifest,
            config,
            fetcher: Arc::new(fetcher),
            surface,
            animator,
            hidden: AtomicBool::new(false),
            event_sender: None,
        })
    }

    /// Attaches a subscriber for [`LoadEvent`]s.
    pub fn with_event_sender(mut self, sender: flume::Sender<LoadEvent>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// The manifest being loaded.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The animator rendering onto the surface.
    pub fn animator(&self) -> &ProgressAnimator {
        &self.animator
    }

    /// Downloads everything, runs the closing schedule, hides the surface, and
    /// returns the decoded handles.
    ///
    /// # Errors
    /// The first resource to fail permanently fails the whole load; no
    /// partial result is returned and the surface is left in its error state.
    pub async fn load_all(&self) -> Result<LoadResult, LoadError> {
        let result = self.download_all().await?;
        self.finish().await;
        Ok(result)
    }

    /// Downloads and decodes every resource concurrently.
    ///
    /// This is the first half of [`load_all`](Self::load_all). Call
    /// [`finish`](Self::finish) afterwards, optionally reporting the
    /// consumer's startup through [`on_external_progress`] in between.
    ///
    /// [`on_external_progress`]: Self::on_external_progress
    pub async fn download_all(&self) -> Result<LoadResult, LoadError> {
        let started = Instant::now();
        let mut aggregator = ProgressAggregator::new(self.manifest.weights())?;
        self.animator.jump_to(0.0);

        let bus = EventBus::<ProgressEvent>::new();
        let mut tasks = JoinSet::new();

        for spec in self.manifest.specs() {
            let fetcher = Arc::clone(&self.fetcher);
            let spec = spec.clone();
            let progress = bus.sender();

            tasks.spawn(async move {
                let name = spec.name.clone();
                let bytes = fetcher
                    .fetch(&spec, |fraction| {
                        let _ = progress.send(ProgressEvent {
                            name: name.clone(),
                            fraction,
                        });
                    })
                    .await?;
                Ok::<_, LoadError>((spec, bytes))
            });
        }

        let receiver = bus.receiver().clone();
        let mut result = LoadResult::new();

        loop {
            tokio::select! {
                biased;
                Ok(event) = receiver.recv_async() => self.apply_progress(&mut aggregator, event),
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok((spec, bytes)))) => {
                        log::info!("'{}' ready: {} bytes ({})", spec.name, bytes.len(), spec.mime_type);
                        self.publish(LoadEvent::Downloaded {
                            name: spec.name.clone(),
                            bytes: bytes.len(),
                        });
                        result.insert(BlobHandle::new(spec.name, spec.mime_type, bytes));
                    }
                    Some(Ok(Err(err))) => {
                        tasks.abort_all();
                        return Err(self.fail(err));
                    }
                    Some(Err(join_error)) => {
                        tasks.abort_all();
                        return Err(self.fail(LoadError::Join(join_error.to_string())));
                    }
                },
            }
        }

        for event in bus.drain() {
            self.apply_progress(&mut aggregator, event);
        }

        log::info!(
            "Downloaded {} resource(s), {} bytes decoded, in {:.2?}",
            result.len(),
            result.total_bytes(),
            started.elapsed()
        );
        Ok(result)
    }

    /// Runs the closing schedule, waits for the bar to settle, and hides it.
    pub async fn finish(&self) {
        for step in self.config.choreography.steps() {
            self.animator.set_target(step.target);
            self.publish(LoadEvent::ChoreographyStep(step.target));
            tokio::time::sleep(step.delay()).await;
        }

        self.animator.settled().await;
        self.hide();
        self.publish(LoadEvent::Completed);
    }

    /// Maps the consumer's own startup progress (`0..=1`) onto the 70–90
    /// band of the bar.
    pub fn on_external_progress(&self, fraction: f64) {
        self.animator.set_target(external_to_display(fraction));
    }

    /// Hides the surface. Only the first call reaches the surface.
    pub fn hide(&self) {
        if self.hidden.swap(true, Ordering::AcqRel) {
            return;
        }
        log::debug!("Hiding loading surface");
        self.surface.hide();
    }

    fn apply_progress(&self, aggregator: &mut ProgressAggregator, event: ProgressEvent) {
        let composite = aggregator.update(&event.name, event.fraction);
        self.animator.set_target(composite);

        self.publish(LoadEvent::ResourceProgress {
            name: event.name,
            fraction: event.fraction,
        });
        self.publish(LoadEvent::Composite(composite));
    }

    fn fail(&self, err: LoadError) -> LoadError {
        let message = err.to_string();
        log::error!("Loading failed: {message}");
        self.surface.set_error_state(&message);
        self.publish(LoadEvent::Failed {
            url: err.url().map(str::to_string),
            message,
        });
        err
    }

    fn publish(&self, event: LoadEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}
