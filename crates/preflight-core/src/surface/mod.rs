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

//! The contract for the user-facing loading indicator.
//!
//! The loader never holds a rendering surface directly; it talks to an
//! injected [`ProgressSurface`]. That keeps the orchestration headless and
//! lets the embedding application draw the bar however it likes.

/// A loading indicator: a bar, a percentage label, an error slot.
///
/// Methods take `&self` because the animator's frame task and the
/// orchestrator both render; implementations use interior mutability.
pub trait ProgressSurface: Send + Sync {
    /// Sets the filled width of the bar, in whole percent (`0..=100`).
    fn set_percent(&self, percent: u8);

    /// Sets the label next to the bar.
    fn set_text(&self, text: &str);

    /// Switches the indicator to its alert styling and shows `message`.
    fn set_error_state(&self, message: &str);

    /// Removes the indicator. Hiding an already hidden surface is a no-op.
    fn hide(&self);
}

/// Renders a displayed progress value the way the loading screen shows it:
/// rounded to a whole percent for both the bar and the label.
pub fn render_progress(surface: &dyn ProgressSurface, displayed: f64) {
    let percent = displayed.clamp(0.0, 100.0).round() as u8;
    surface.set_percent(percent);
    surface.set_text(&format!("{percent}%"));
}

/// A surface that draws nothing. Useful for batch tools and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl ProgressSurface for NullSurface {
    fn set_percent(&self, _percent: u8) {}
    fn set_text(&self, _text: &str) {}
    fn set_error_state(&self, message: &str) {
        log::error!("{message}");
    }
    fn hide(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured {
        percent: Mutex<Vec<u8>>,
        text: Mutex<Vec<String>>,
    }

    impl ProgressSurface for Captured {
        fn set_percent(&self, percent: u8) {
            self.percent.lock().unwrap().push(percent);
        }
        fn set_text(&self, text: &str) {
            self.text.lock().unwrap().push(text.to_string());
        }
        fn set_error_state(&self, _message: &str) {}
        fn hide(&self) {}
    }

    #[test]
    fn rounds_to_whole_percent() {
        let surface = Captured::default();
        render_progress(&surface, 41.6);
        render_progress(&surface, 0.4);
        render_progress(&surface, 130.0);

        assert_eq!(*surface.percent.lock().unwrap(), vec![42, 0, 100]);
        assert_eq!(*surface.text.lock().unwrap(), vec!["42%", "0%", "100%"]);
    }
}
