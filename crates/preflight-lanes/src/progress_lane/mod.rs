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

//! Progress math: how raw per-resource fractions become the percentage shown
//! on the loading screen.
//!
//! The 0–100 display range is split into three bands:
//!
//! | Band | Driven by |
//! |---|---|
//! | `0..=70` | weighted download progress ([`ProgressAggregator`]) |
//! | `70..=90` | the consumer's own startup ([`external_to_display`]) |
//! | `90..=100` | the closing choreography |

mod aggregator;
mod easing;

pub use aggregator::ProgressAggregator;
pub use easing::{ease_step, EaseStep, EASING_FACTOR, SNAP_THRESHOLD};

/// Upper bound of the download band.
pub const DOWNLOAD_BAND_MAX: f64 = 70.0;

/// Lower bound of the band reserved for the consumer's startup progress.
pub const EXTERNAL_BAND_MIN: f64 = 70.0;

/// Upper bound of the band reserved for the consumer's startup progress.
pub const EXTERNAL_BAND_MAX: f64 = 90.0;

/// Upper bound of the whole display range.
pub const DISPLAY_MAX: f64 = 100.0;

/// Maps the consumer's startup progress (`0..=1`) onto `70..=90`.
///
/// Out-of-range input is clamped; NaN counts as zero.
pub fn external_to_display(fraction: f64) -> f64 {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    EXTERNAL_BAND_MIN + fraction * (EXTERNAL_BAND_MAX - EXTERNAL_BAND_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn external_progress_fills_the_middle_band() {
        assert_relative_eq!(external_to_display(0.0), 70.0);
        assert_relative_eq!(external_to_display(0.5), 80.0);
        assert_relative_eq!(external_to_display(1.0), 90.0);
    }

    #[test]
    fn external_progress_is_clamped() {
        assert_relative_eq!(external_to_display(-3.0), 70.0);
        assert_relative_eq!(external_to_display(7.0), 90.0);
        assert_relative_eq!(external_to_display(f64::NAN), 70.0);
    }
}
