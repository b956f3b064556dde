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

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One step of the closing progress schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoreographyStep {
    /// Displayed-progress target, in percent.
    pub target: f64,
    /// Pause after setting the target.
    pub delay_ms: u64,
}

impl ChoreographyStep {
    /// Creates a step.
    pub const fn new(target: f64, delay_ms: u64) -> Self {
        Self { target, delay_ms }
    }

    /// The pause as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// The time-based progress steps that run after the downloads finish.
///
/// They do not measure work. They cover the downstream consumer's own startup
/// so the bar keeps moving from 90 to 100 instead of stalling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choreography {
    steps: Vec<ChoreographyStep>,
}

impl Choreography {
    /// The default closing schedule: 90, 92, 94, 97, then 100.
    pub const DEFAULT_STEPS: [ChoreographyStep; 5] = [
        ChoreographyStep::new(90.0, 300),
        ChoreographyStep::new(92.0, 300),
        ChoreographyStep::new(94.0, 400),
        ChoreographyStep::new(97.0, 500),
        ChoreographyStep::new(100.0, 500),
    ];

    /// Builds and validates a schedule.
    pub fn new(steps: Vec<ChoreographyStep>) -> Result<Self, ConfigError> {
        let choreography = Self { steps };
        choreography.validate()?;
        Ok(choreography)
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> &[ChoreographyStep] {
        &self.steps
    }

    /// Sum of every pause.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(ChoreographyStep::delay).sum()
    }

    /// Targets must lie in `[0, 100]` and never go down.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut previous = f64::NEG_INFINITY;
        for step in &self.steps {
            if !(0.0..=100.0).contains(&step.target) {
                return Err(ConfigError::Choreography(format!(
                    "target {} is outside 0..=100",
                    step.target
                )));
            }
            if step.target < previous {
                return Err(ConfigError::Choreography(format!(
                    "target {} follows the larger target {previous}",
                    step.target
                )));
            }
            previous = step.target;
        }
        Ok(())
    }
}

impl Default for Choreography {
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS.to_vec(),
        }
    }
}
