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

//! A progress bar drawn on a terminal line.

use preflight_core::surface::ProgressSurface;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

const BAR_WIDTH: usize = 40;

/// Renders `[#####.....]` with `percent` of `width` cells filled.
pub fn render_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[derive(Debug)]
struct TerminalState<W> {
    out: W,
    percent: u8,
    text: String,
    last_line: Option<String>,
    failed: bool,
    hidden: bool,
}

/// A [`ProgressSurface`] that redraws one line in place with `\r`.
///
/// Once the error state is shown or the surface is hidden, further progress
/// updates are ignored so the final line stays readable.
#[derive(Debug)]
pub struct TerminalSurface<W: Write + Send = io::Stderr> {
    state: Mutex<TerminalState<W>>,
}

impl TerminalSurface<io::Stderr> {
    /// A surface drawing on standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    /// A surface drawing on `out`.
    pub fn new(out: W) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                out,
                percent: 0,
                text: String::new(),
                last_line: None,
                failed: false,
                hidden: false,
            }),
        }
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner).out
    }

    fn update(&self, apply: impl FnOnce(&mut TerminalState<W>)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.failed || state.hidden {
            return;
        }
        apply(&mut state);

        let line = format!("{} {}", render_bar(state.percent, BAR_WIDTH), state.text);
        if state.last_line.as_deref() == Some(line.as_str()) {
            return;
        }
        if let Err(e) = write!(state.out, "\r{line}").and_then(|_| state.out.flush()) {
            log::warn!("Failed to draw progress bar: {e}");
        }
        state.last_line = Some(line);
    }
}

impl<W: Write + Send> ProgressSurface for TerminalSurface<W> {
    fn set_percent(&self, percent: u8) {
        self.update(|state| state.percent = percent.min(100));
    }

    fn set_text(&self, text: &str) {
        self.update(|state| {
            if state.text != text {
                state.text = text.to_string();
            }
        });
    }

    fn set_error_state(&self, message: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.failed {
            return;
        }
        state.failed = true;
        let prefix = if state.last_line.is_some() { "\n" } else { "" };
        if let Err(e) = writeln!(state.out, "{prefix}error: {message}") {
            log::warn!("Failed to draw error state: {e}");
        }
    }

    fn hide(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.hidden {
            return;
        }
        state.hidden = true;
        if state.last_line.is_some() && !state.failed {
            let _ = writeln!(state.out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_core::surface::render_progress;

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(render_bar(0, 10), "[..........]");
        assert_eq!(render_bar(50, 10), "[#####.....]");
        assert_eq!(render_bar(100, 10), "[##########]");
        assert_eq!(render_bar(250, 4), "[####]");
    }

    #[test]
    fn redraws_the_same_line() {
        let surface = TerminalSurface::new(Vec::new());
        render_progress(&surface, 42.4);
        render_progress(&surface, 42.4);

        let out = output(surface);
        assert!(out.starts_with('\r'));
        assert!(out.ends_with("42%"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn error_state_freezes_the_bar() {
        let surface = TerminalSurface::new(Vec::new());
        render_progress(&surface, 10.0);
        surface.set_error_state("Failed to load https://cdn.test/a.gz");
        render_progress(&surface, 90.0);
        surface.hide();

        let out = output(surface);
        assert!(out.contains("\nerror: Failed to load https://cdn.test/a.gz\n"));
        assert!(!out.contains("90%"));
    }

    #[test]
    fn hide_ends_the_line_once() {
        let surface = TerminalSurface::new(Vec::new());
        render_progress(&surface, 100.0);
        surface.hide();
        surface.hide();
        render_progress(&surface, 50.0);

        let out = output(surface);
        assert!(out.ends_with("100%\n"));
        assert_eq!(out.matches('\n').count(), 1);
    }
}
