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

/// Share of the remaining gap covered by one frame.
pub const EASING_FACTOR: f64 = 0.1;

/// Gap below which the displayed value snaps onto the target.
pub const SNAP_THRESHOLD: f64 = 0.1;

/// The outcome of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaseStep {
    /// Displayed value after the frame.
    pub value: f64,
    /// `true` when the value snapped onto the target; the loop should stop.
    pub converged: bool,
}

/// Advances `displayed` one frame towards `target`.
///
/// The value moves by [`EASING_FACTOR`] of the remaining gap, so motion is
/// fast right after a jump in the target and slows down as it closes in.
/// Once the gap is under [`SNAP_THRESHOLD`] the value lands exactly on the
/// target.
pub fn ease_step(displayed: f64, target: f64) -> EaseStep {
    let gap = target - displayed;
    if gap.abs() < SNAP_THRESHOLD {
        return EaseStep {
            value: target,
            converged: true,
        };
    }

    EaseStep {
        value: displayed + gap * EASING_FACTOR,
        converged: false,
    }
}
