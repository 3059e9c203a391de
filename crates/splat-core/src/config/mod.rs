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

//! The configuration boundary.
//!
//! Everything an external control panel can set lives in [`QualitySettings`].
//! Values are validated here so the controller can assume sane input.

use crate::platform::DeviceClass;
use crate::quality::QualityLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scene loaded when no asset URL is configured.
pub const DEFAULT_ASSET_URL: &str =
    "https://virtual-homes.s3.ap-south-1.amazonaws.com/VirtualHomes/SOGS_compression/Sattvasplat.splat";

/// Rejected configuration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Target frame rate outside the accepted range.
    #[error("target fps {value} outside accepted range {min}..={max}")]
    TargetFpsOutOfRange {
        /// The rejected value.
        value: u32,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },
    /// A quality level name that does not exist.
    #[error("unknown quality level '{0}' (expected potato, low, medium, high or ultra)")]
    UnknownQualityLevel(String),
    /// The asset URL is empty.
    #[error("asset url must not be empty")]
    EmptyAssetUrl,
}

/// A target frame rate within the accepted 15–120 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TargetFps(u32);

impl TargetFps {
    /// Lowest accepted target.
    pub const MIN: u32 = 15;
    /// Highest accepted target.
    pub const MAX: u32 = 120;
    /// Default target on mobile devices.
    pub const MOBILE_DEFAULT: TargetFps = TargetFps(30);
    /// Default target everywhere else.
    pub const DESKTOP_DEFAULT: TargetFps = TargetFps(60);

    /// Validates `fps` against the accepted range.
    pub fn new(fps: u32) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&fps) {
            Ok(Self(fps))
        } else {
            Err(ConfigError::TargetFpsOutOfRange {
                value: fps,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// The default target for a device class.
    pub fn default_for(class: DeviceClass) -> Self {
        if class.is_mobile() {
            Self::MOBILE_DEFAULT
        } else {
            Self::DESKTOP_DEFAULT
        }
    }

    /// The target as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The target as a float, for comparisons against averages.
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }

    /// Frame budget in milliseconds.
    pub fn frame_budget_ms(self) -> f32 {
        1000.0 / self.as_f32()
    }
}

impl Default for TargetFps {
    fn default() -> Self {
        Self::DESKTOP_DEFAULT
    }
}

impl TryFrom<u32> for TargetFps {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TargetFps::new(value)
    }
}

impl From<TargetFps> for u32 {
    fn from(value: TargetFps) -> Self {
        value.0
    }
}

impl fmt::Display for TargetFps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The externally controlled settings of a viewing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    /// Scene to load.
    pub asset_url: String,
    /// Level used when adaptive mode is off, and the starting level otherwise.
    pub manual_level: QualityLevel,
    /// Whether the controller may change the level on its own.
    pub adaptive: bool,
    /// Frame rate the controller steers towards.
    pub target_fps: TargetFps,
    /// Whether the diagnostics overlay is shown.
    pub debug_overlay: bool,
    /// Shorter cooldown and double steps on severe shortfalls.
    pub aggressive: bool,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self::for_device(DeviceClass::Desktop)
    }
}

impl QualitySettings {
    /// Settings tuned for a device class: mobile targets 30 fps and optimizes
    /// aggressively, everything else targets 60 fps.
    pub fn for_device(class: DeviceClass) -> Self {
        Self {
            asset_url: DEFAULT_ASSET_URL.to_string(),
            manual_level: QualityLevel::High,
            adaptive: true,
            target_fps: TargetFps::default_for(class),
            debug_overlay: true,
            aggressive: class.is_mobile(),
        }
    }

    /// Checks the fields the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset_url.trim().is_empty() {
            return Err(ConfigError::EmptyAssetUrl);
        }
        // Re-check in case the struct was built by hand with a raw value.
        TargetFps::new(self.target_fps.get())?;
        Ok(())
    }
}
