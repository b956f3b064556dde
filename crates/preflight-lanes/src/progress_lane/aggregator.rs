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

use super::DOWNLOAD_BAND_MAX;
use preflight_core::error::ConfigError;
use std::collections::HashSet;

/// Combines per-resource fractions into one weighted value in `[0, 70]`.
///
/// The weight table is fixed at construction. The only state is the latest
/// fraction of every resource; [`update`](Self::update) overwrites it rather
/// than accumulating.
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    names: Vec<String>,
    weights: Vec<f64>,
    fractions: Vec<f64>,
}

impl ProgressAggregator {
    /// Tolerance on the sum of the weights.
    pub const WEIGHT_EPSILON: f64 = 1e-6;

    /// Builds an aggregator with every resource at 0.
    ///
    /// # Errors
    /// Fails fast when a weight is negative or not finite, when a name
    /// repeats, or when the weights do not sum to one within
    /// [`WEIGHT_EPSILON`](Self::WEIGHT_EPSILON).
    pub fn new<I, S>(weights: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut table = Vec::new();
        let mut seen = HashSet::new();

        for (name, weight) in weights {
            let name = name.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight { name, weight });
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateResource(name));
            }
            names.push(name);
            table.push(weight);
        }

        if names.is_empty() {
            return Err(ConfigError::EmptyManifest);
        }

        let sum: f64 = table.iter().sum();
        if (sum - 1.0).abs() > Self::WEIGHT_EPSILON {
            return Err(ConfigError::WeightSum { sum });
        }

        let fractions = vec![0.0; names.len()];
        Ok(Self {
            names,
            weights: table,
            fractions,
        })
    }

    /// The default three-resource table: one primary payload at 0.6 and two
    /// secondary ones at 0.2, reflecting their expected relative sizes.
    pub fn with_default_weights(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        tertiary: impl Into<String>,
    ) -> Self {
        Self {
            names: vec![primary.into(), secondary.into(), tertiary.into()],
            weights: vec![0.6, 0.2, 0.2],
            fractions: vec![0.0; 3],
        }
    }

    /// Records the latest fraction of `name` and returns the new composite.
    ///
    /// Fractions are clamped to `[0, 1]`. An unknown name leaves the state
    /// untouched.
    pub fn update(&mut self, name: &str, fraction: f64) -> f64 {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.fractions[index] = if fraction.is_nan() {
                    0.0
                } else {
                    fraction.clamp(0.0, 1.0)
                };
            }
            None => log::warn!("Progress reported for unknown resource '{name}'"),
        }
        self.composite()
    }

    /// The weighted download progress, in `[0, 70]`.
    pub fn composite(&self) -> f64 {
        // Pinned so float rounding in the weights cannot leave a finished
        // download short of the band ceiling.
        if self.fractions.iter().all(|f| *f >= 1.0) {
            return DOWNLOAD_BAND_MAX;
        }

        let weighted: f64 = self
            .weights
            .iter()
            .zip(&self.fractions)
            .map(|(weight, fraction)| weight * fraction)
            .sum();
        (weighted * DOWNLOAD_BAND_MAX).clamp(0.0, DOWNLOAD_BAND_MAX)
    }

    /// The last recorded fraction of a resource.
    pub fn fraction(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.fractions[index])
    }

    /// The weight of a resource.
    pub fn weight(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.weights[index])
    }

    /// Puts every resource back to 0.
    pub fn reset(&mut self) {
        self.fractions.iter_mut().for_each(|f| *f = 0.0);
    }

    /// Upper bound of [`composite`](Self::composite).
    pub fn band_max(&self) -> f64 {
        DOWNLOAD_BAND_MAX
    }
}
