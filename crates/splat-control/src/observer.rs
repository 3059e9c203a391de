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

//! Read-only diagnostics view of the controller.

use crate::controller::ControllerState;
use crate::metrics::PerformanceSnapshot;
use splat_core::platform::{DeviceClass, DeviceProfile, GpuTier};
use splat_core::quality::{QualityLevel, QualityPreset};
use std::fmt;

/// Coarse frame-rate health relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRateHealth {
    /// At or above 90% of the target.
    Good,
    /// At or above 70% of the target.
    Fair,
    /// Below 70% of the target.
    Poor,
}

impl FrameRateHealth {
    /// Classifies `fps` against `target_fps`.
    pub fn classify(fps: f32, target_fps: u32) -> Self {
        let target = target_fps as f32;
        if fps >= target * 0.9 {
            Self::Good
        } else if fps >= target * 0.7 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for FrameRateHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// Point-in-time copy of everything a debug overlay shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSnapshot {
    /// Active level.
    pub level: QualityLevel,
    /// `false` when the level is fixed manually.
    pub adaptive: bool,
    /// Rolling average frame rate.
    pub avg_fps: f32,
    /// Most recent frame rate.
    pub latest_fps: f32,
    /// Rolling average frame time in milliseconds.
    pub avg_frame_time_ms: f32,
    /// Frame rate the controller steers towards.
    pub target_fps: u32,
    /// Preset of the active level.
    pub preset: QualityPreset,
    /// Device class from the profile.
    pub device_class: DeviceClass,
    /// GPU tier from the profile.
    pub gpu_tier: GpuTier,
    /// Consecutive stable evaluations.
    pub stability_counter: u32,
    /// Health of the average frame rate.
    pub health: FrameRateHealth,
}

impl ControllerSnapshot {
    /// Assembles a snapshot from the controller's parts.
    pub fn capture(
        state: &ControllerState,
        performance: &PerformanceSnapshot,
        preset: &QualityPreset,
        profile: &DeviceProfile,
    ) -> Self {
        let target_fps = state.target_fps.get();
        Self {
            level: state.level,
            adaptive: state.adaptive,
            avg_fps: performance.avg_fps,
            latest_fps: performance.latest_fps,
            avg_frame_time_ms: performance.avg_frame_time_ms,
            target_fps,
            preset: *preset,
            device_class: profile.class,
            gpu_tier: profile.gpu_tier,
            stability_counter: state.stability_counter,
            health: FrameRateHealth::classify(performance.avg_fps, target_fps),
        }
    }

    /// Render resolution for a `width` x `height` viewport under the active preset.
    pub fn resolution(&self, width: u32, height: u32) -> (u32, u32) {
        self.preset.scaled_resolution(width, height)
    }
}

impl fmt::Display for ControllerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {:.1}/{} fps ({}), {:.1} ms, dpr {:.2}, {} splats, {} / {} gpu",
            self.level,
            if self.adaptive { "auto" } else { "manual" },
            self.avg_fps,
            self.target_fps,
            self.health,
            self.avg_frame_time_ms,
            self.preset.max_pixel_ratio,
            self.preset.max_splats,
            self.device_class,
            self.gpu_tier
        )
    }
}
