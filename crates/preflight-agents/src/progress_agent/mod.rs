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

//! Smooth, frame-paced rendering of the displayed progress value.
//!
//! Progress targets arrive in bursts, sometimes hundreds per second, and
//! sometimes not at all for a while. The [`ProgressAnimator`] decouples the
//! bar from that: targets are only recorded, and a frame loop eases the
//! displayed value towards the latest one.
//!
//! ```text
//!            set_target (idle)            gap < 0.1 (snap)
//!   Idle ───────────────────────▶ Animating ─────────────────▶ Idle
//!                                   │   ▲
//!                                   └───┘ gap ≥ 0.1
//! ```

use preflight_core::surface::{render_progress, ProgressSurface};
use preflight_lanes::progress_lane::{ease_step, DISPLAY_MAX};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

#[derive(Debug)]
struct AnimatorState {
    displayed: f64,
    target: f64,
    running: bool,
}

struct Inner {
    state: Mutex<AnimatorState>,
    surface: Arc<dyn ProgressSurface>,
    frame_interval: Duration,
    frames: AtomicU64,
    // `true` while no frame loop is running. Only written with `state` held.
    idle: watch::Sender<bool>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, AnimatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Eases the displayed progress towards the latest target, one frame at a time.
///
/// Cloning yields another handle to the same animator. At most one frame
/// loop runs per animator; it starts on the first [`set_target`] while idle,
/// stops once the value has snapped onto the target, and starts again on the
/// next target change.
///
/// [`set_target`]: ProgressAnimator::set_target
#[derive(Clone)]
pub struct ProgressAnimator {
    inner: Arc<Inner>,
}

impl ProgressAnimator {
    /// Creates an idle animator displaying 0.
    pub fn new(surface: Arc<dyn ProgressSurface>, frame_interval: Duration) -> Self {
        let (idle, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(AnimatorState {
                    displayed: 0.0,
                    target: 0.0,
                    running: false,
                }),
                surface,
                frame_interval: frame_interval.max(Duration::from_millis(1)),
                frames: AtomicU64::new(0),
                idle,
            }),
        }
    }

    /// Records a new target in `[0, 100]`. Never blocks.
    ///
    /// Without a tokio runtime to run frames on, the value is applied
    /// immediately instead of eased.
    pub fn set_target(&self, value: f64) {
        if value.is_nan() {
            log::warn!("Ignoring NaN progress target");
            return;
        }
        let value = value.clamp(0.0, DISPLAY_MAX);

        let mut state = self.inner.state();
        state.target = value;
        if state.running {
            return;
        }

        match Handle::try_current() {
            Ok(handle) => {
                state.running = true;
                self.inner.idle.send_replace(false);
                drop(state);
                handle.spawn(run_frames(self.inner.clone()));
            }
            Err(_) => {
                log::trace!("No async runtime; applying progress target {value} directly");
                state.displayed = value;
                render_progress(self.inner.surface.as_ref(), value);
            }
        }
    }

    /// Sets both the target and the displayed value, skipping the easing.
    pub fn jump_to(&self, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, DISPLAY_MAX) };
        let mut state = self.inner.state();
        state.target = value;
        state.displayed = value;
        render_progress(self.inner.surface.as_ref(), value);
    }

    /// The value currently shown.
    pub fn displayed(&self) -> f64 {
        self.inner.state().displayed
    }

    /// The latest target.
    pub fn target(&self) -> f64 {
        self.inner.state().target
    }

    /// `true` while a frame loop is running.
    pub fn is_animating(&self) -> bool {
        self.inner.state().running
    }

    /// Number of frames rendered so far, across every loop run.
    pub fn frames_rendered(&self) -> u64 {
        self.inner.frames.load(Ordering::Relaxed)
    }

    /// Resolves once no frame loop is running, i.e. the displayed value sits
    /// on the target.
    pub async fn settled(&self) {
        let mut idle = self.inner.idle.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = idle.wait_for(|idle| *idle).await;
    }
}

async fn run_frames(inner: Arc<Inner>) {
    let mut ticker = tokio::time::interval(inner.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut state = inner.state();
        let step = ease_step(state.displayed, state.target);
        state.displayed = step.value;
        render_progress(inner.surface.as_ref(), step.value);
        inner.frames.fetch_add(1, Ordering::Relaxed);

        if step.converged {
            state.running = false;
            inner.idle.send_replace(true);
            log::trace!("Progress animation settled at {}", step.value);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Percentages(StdMutex<Vec<u8>>);

    impl ProgressSurface for Percentages {
        fn set_percent(&self, percent: u8) {
            self.0.lock().unwrap().push(percent);
        }
        fn set_text(&self, _text: &str) {}
        fn set_error_state(&self, _message: &str) {}
        fn hide(&self) {}
    }

    fn animator() -> (ProgressAnimator, Arc<Percentages>) {
        let surface = Arc::new(Percentages::default());
        (
            ProgressAnimator::new(surface.clone(), Duration::from_millis(16)),
            surface,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn converges_onto_the_target_and_stops() {
        let (animator, surface) = animator();
        animator.set_target(70.0);
        assert!(animator.is_animating());

        animator.settled().await;

        assert_eq!(animator.displayed(), 70.0);
        assert!(!animator.is_animating());
        assert_eq!(surface.0.lock().unwrap().last(), Some(&70));

        // Converged: no more frames are consumed.
        let frames = animator.frames_rendered();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(animator.frames_rendered(), frames);
    }

    #[tokio::test(start_paused = true)]
    async fn displayed_value_never_jumps_past_the_target() {
        let (animator, surface) = animator();
        animator.set_target(50.0);
        animator.settled().await;

        let shown = surface.0.lock().unwrap().clone();
        assert!(shown.windows(2).all(|w| w[0] <= w[1]), "non-monotonic: {shown:?}");
        assert!(shown.iter().all(|p| *p <= 50));
        // Eased, not a single jump.
        assert!(shown.len() > 10);
    }

    #[tokio::test(start_paused = true)]
    async fn restarts_after_convergence() {
        let (animator, _) = animator();
        animator.set_target(20.0);
        animator.settled().await;
        let first_run = animator.frames_rendered();

        animator.set_target(90.0);
        assert!(animator.is_animating());
        animator.settled().await;

        assert_eq!(animator.displayed(), 90.0);
        assert!(animator.frames_rendered() > first_run);
    }

    #[tokio::test(start_paused = true)]
    async fn retargeting_mid_flight_keeps_a_single_loop() {
        let (animator, _) = animator();
        let started = tokio::time::Instant::now();
        animator.set_target(40.0);
        tokio::time::sleep(Duration::from_millis(48)).await;
        animator.set_target(60.0);
        animator.set_target(80.0);

        animator.settled().await;

        // A single loop needs about 65 frames of 16 ms to close a gap of 80;
        // two loops stepping side by side would get there in half the time.
        assert!(
            started.elapsed() >= Duration::from_millis(900),
            "settled after only {:?}",
            started.elapsed()
        );
        assert_eq!(animator.displayed(), 80.0);
    }

    #[tokio::test(start_paused = true)]
    async fn clamps_targets_to_display_range() {
        let (animator, _) = animator();
        animator.set_target(250.0);
        assert_eq!(animator.target(), 100.0);
        animator.set_target(-4.0);
        assert_eq!(animator.target(), 0.0);
        animator.set_target(f64::NAN);
        assert_eq!(animator.target(), 0.0);
    }

    #[test]
    fn applies_directly_without_a_runtime() {
        let (animator, surface) = animator();
        animator.set_target(33.3);
        assert_eq!(animator.displayed(), 33.3);
        assert!(!animator.is_animating());
        assert_eq!(*surface.0.lock().unwrap(), vec![33]);
    }

    #[test]
    fn jump_to_renders_immediately() {
        let (animator, surface) = animator();
        animator.jump_to(12.0);
        assert_eq!(animator.displayed(), 12.0);
        assert_eq!(animator.target(), 12.0);
        assert_eq!(*surface.0.lock().unwrap(), vec![12]);
    }
}
