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

//! # Splat Core
//!
//! Foundational crate containing the value types and interface contracts shared
//! by the adaptive quality system: quality levels and presets, device profiles,
//! capability probes, performance telemetry, and the configuration boundary.

#![warn(missing_docs)]

pub mod config;
pub mod platform;
pub mod quality;
pub mod telemetry;

pub use config::{ConfigError, QualitySettings, TargetFps};
pub use platform::{DeviceClass, DeviceProfile, GpuTier};
pub use quality::{QualityLadder, QualityLevel, QualityPreset};
pub use telemetry::{PerformanceEvent, PerformanceSample, QualityTransition};
