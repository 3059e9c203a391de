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

//! Quality levels, the presets bound to them, and the ladder that orders them.
//!
//! A [`QualityLadder`] is the device-specific set of five [`QualityPreset`]s the
//! adaptive controller walks. The ladder itself is pure data; the controller only
//! ever moves between its rungs.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordered set of discrete rendering tiers, from cheapest to most expensive.
///
/// The declaration order defines the total order used for ladder traversal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Last-resort tier for devices that cannot hold the target otherwise.
    Potato,
    /// Reduced resolution and splat budget.
    Low,
    /// Balanced tier.
    Medium,
    /// Default starting tier.
    #[default]
    High,
    /// Maximum quality the device class allows.
    Ultra,
}

impl QualityLevel {
    /// All levels in ascending order.
    pub const ALL: [QualityLevel; 5] = [
        QualityLevel::Potato,
        QualityLevel::Low,
        QualityLevel::Medium,
        QualityLevel::High,
        QualityLevel::Ultra,
    ];

    /// The cheapest level.
    pub const LOWEST: QualityLevel = QualityLevel::Potato;
    /// The most expensive level.
    pub const HIGHEST: QualityLevel = QualityLevel::Ultra;

    /// Position of the level on the ladder (0 = potato, 4 = ultra).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the level at `index`, or `None` if it is out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Moves `steps` rungs down, clamping at [`QualityLevel::LOWEST`].
    pub fn step_down(self, steps: usize) -> Self {
        Self::ALL[self.index().saturating_sub(steps)]
    }

    /// Moves `steps` rungs up, clamping at [`QualityLevel::HIGHEST`].
    pub fn step_up(self, steps: usize) -> Self {
        Self::ALL[(self.index() + steps).min(Self::ALL.len() - 1)]
    }

    /// Lowercase identifier, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            QualityLevel::Potato => "potato",
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::Ultra => "ultra",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownQualityLevel(s.to_string()))
    }
}

/// The concrete resource limits bound to one [`QualityLevel`] for a device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityPreset {
    /// Upper bound for the renderer's device-pixel-ratio multiplier.
    pub max_pixel_ratio: f32,
    /// Upper bound for the number of splats submitted per frame.
    pub max_splats: u32,
    /// Whether multisample antialiasing is requested for the surface.
    pub antialias: bool,
    /// Whether shadow rendering is enabled.
    pub shadows: bool,
}

impl QualityPreset {
    /// Creates a preset without any feature flags enabled.
    pub const fn new(max_pixel_ratio: f32, max_splats: u32) -> Self {
        Self {
            max_pixel_ratio,
            max_splats,
            antialias: false,
            shadows: false,
        }
    }

    /// Returns a copy with antialiasing set to `enabled`.
    pub fn with_antialias(mut self, enabled: bool) -> Self {
        self.antialias = enabled;
        self
    }

    /// Returns a copy with shadows set to `enabled`.
    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.shadows = enabled;
        self
    }

    /// Render resolution this preset implies for a viewport of `width`×`height`
    /// logical pixels.
    pub fn scaled_resolution(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| (v as f32 * self.max_pixel_ratio).round().max(0.0) as u32;
        (scale(width), scale(height))
    }
}

/// A monotonicity violation found in a [`QualityLadder`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LadderError {
    /// A level's limit is lower than the limit of the level beneath it.
    #[error("ladder not monotonic at '{level}': {field} {value} is below previous {previous}")]
    NonMonotonic {
        /// The offending level.
        level: QualityLevel,
        /// Which limit regressed (`max_pixel_ratio` or `max_splats`).
        field: &'static str,
        /// Value at `level`.
        value: f64,
        /// Value at the level beneath.
        previous: f64,
    },
}

/// Device-specific mapping from every [`QualityLevel`] to its [`QualityPreset`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualityLadder {
    presets: [QualityPreset; 5],
}

impl QualityLadder {
    /// Builds a ladder from presets listed in ascending level order
    /// (`potato` first). No validation is performed.
    pub const fn from_presets(presets: [QualityPreset; 5]) -> Self {
        Self { presets }
    }

    /// Returns the preset bound to `level`.
    pub fn get(&self, level: QualityLevel) -> &QualityPreset {
        &self.presets[level.index()]
    }

    /// Iterates over `(level, preset)` pairs from `potato` to `ultra`.
    pub fn iter(&self) -> impl Iterator<Item = (QualityLevel, &QualityPreset)> {
        QualityLevel::ALL.iter().copied().zip(self.presets.iter())
    }

    /// Checks that splat budgets and pixel-ratio caps never decrease as the
    /// level increases.
    pub fn validate(&self) -> Result<(), LadderError> {
        for (lower, upper) in QualityLevel::ALL.iter().zip(QualityLevel::ALL.iter().skip(1)) {
            let prev = self.get(*lower);
            let next = self.get(*upper);
            if next.max_pixel_ratio < prev.max_pixel_ratio {
                return Err(LadderError::NonMonotonic {
                    level: *upper,
                    field: "max_pixel_ratio",
                    value: next.max_pixel_ratio as f64,
                    previous: prev.max_pixel_ratio as f64,
                });
            }
            if next.max_splats < prev.max_splats {
                return Err(LadderError::NonMonotonic {
                    level: *upper,
                    field: "max_splats",
                    value: next.max_splats as f64,
                    previous: prev.max_splats as f64,
                });
            }
        }
        Ok(())
    }

    /// Raises every limit to at least the limit of the level beneath it.
    ///
    /// Returns the number of presets that had to be adjusted.
    pub fn enforce_monotonic(&mut self) -> usize {
        let mut repaired = 0;
        for i in 1..self.presets.len() {
            let prev = self.presets[i - 1];
            let preset = &mut self.presets[i];
            let mut touched = false;
            if preset.max_pixel_ratio < prev.max_pixel_ratio {
                preset.max_pixel_ratio = prev.max_pixel_ratio;
                touched = true;
            }
            if preset.max_splats < prev.max_splats {
                preset.max_splats = prev.max_splats;
                touched = true;
            }
            if touched {
                repaired += 1;
            }
        }
        repaired
    }
}

/// Receiver of the active preset, typically the renderer's configuration stage.
///
/// Called before the next frame whenever the active level changes.
pub trait PresetSink {
    /// Applies `preset` as the renderer configuration for `level`.
    fn apply_preset(&mut self, level: QualityLevel, preset: &QualityPreset);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(ratios: [f32; 5], splats: [u32; 5]) -> QualityLadder {
        let mut presets = [QualityPreset::new(0.0, 0); 5];
        for i in 0..5 {
            presets[i] = QualityPreset::new(ratios[i], splats[i]);
        }
        QualityLadder::from_presets(presets)
    }

    #[test]
    fn test_level_order_and_index() {
        assert!(QualityLevel::Potato < QualityLevel::Low);
        assert!(QualityLevel::High < QualityLevel::Ultra);
        for (i, level) in QualityLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
            assert_eq!(QualityLevel::from_index(i), Some(*level));
        }
        assert_eq!(QualityLevel::from_index(5), None);
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        assert_eq!(QualityLevel::High.step_down(1), QualityLevel::Medium);
        assert_eq!(QualityLevel::High.step_down(2), QualityLevel::Low);
        assert_eq!(QualityLevel::Low.step_down(2), QualityLevel::Potato);
        assert_eq!(QualityLevel::Potato.step_down(1), QualityLevel::Potato);
        assert_eq!(QualityLevel::High.step_up(1), QualityLevel::Ultra);
        assert_eq!(QualityLevel::Ultra.step_up(2), QualityLevel::Ultra);
    }

    #[test]
    fn test_level_parse_and_display() {
        assert_eq!("ultra".parse::<QualityLevel>().unwrap(), QualityLevel::Ultra);
        assert_eq!(" Potato ".parse::<QualityLevel>().unwrap(), QualityLevel::Potato);
        assert!("extreme".parse::<QualityLevel>().is_err());
        assert_eq!(QualityLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_level_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&QualityLevel::Low).unwrap();
        assert_eq!(json, "\"low\"");
        let level: QualityLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(level, QualityLevel::High);
    }

    #[test]
    fn test_scaled_resolution() {
        let preset = QualityPreset::new(0.5, 1_000_000);
        assert_eq!(preset.scaled_resolution(1920, 1080), (960, 540));
    }

    #[test]
    fn test_validate_accepts_monotonic_ladder() {
        let l = ladder([0.3, 0.4, 0.6, 0.8, 1.0], [1, 2, 3, 4, 5]);
        assert!(l.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_violation() {
        let l = ladder([0.3, 0.4, 0.6, 0.5, 1.0], [1, 2, 3, 4, 5]);
        match l.validate() {
            Err(LadderError::NonMonotonic { level, field, .. }) => {
                assert_eq!(level, QualityLevel::High);
                assert_eq!(field, "max_pixel_ratio");
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn test_enforce_monotonic_repairs_with_running_max() {
        let mut l = ladder([0.6, 0.8, 1.0, 0.7, 0.9], [5, 10, 20, 15, 50]);
        let repaired = l.enforce_monotonic();
        assert_eq!(repaired, 2);
        assert!(l.validate().is_ok());
        assert_eq!(l.get(QualityLevel::High).max_pixel_ratio, 1.0);
        assert_eq!(l.get(QualityLevel::Ultra).max_pixel_ratio, 1.0);
        assert_eq!(l.get(QualityLevel::High).max_splats, 20);
    }
}
