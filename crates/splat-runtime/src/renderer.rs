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

//! A renderer stand-in with a simple cost model.
//!
//! Frame time grows linearly with the splats drawn and the pixels shaded.
//! Antialiasing makes shading 15% more expensive and shadows add 20% to the
//! whole frame.

use crate::config::SimulationConfig;
use splat_core::quality::{PresetSink, QualityLevel, QualityPreset};
use splat_core::telemetry::{PerformanceEvent, PerformanceTag};
use std::time::Duration;

const ANTIALIAS_SHADING_FACTOR: f32 = 1.15;
const SHADOW_FRAME_FACTOR: f32 = 1.2;
/// Frame-rate changes smaller than this are reported as plain changes.
const TREND_EPSILON_FPS: f32 = 1.0;

/// Simulated splat renderer receiving presets from the quality service.
pub struct SimulatedRenderer {
    config: SimulationConfig,
    preset: Option<QualityPreset>,
    last_fps: Option<f32>,
    preset_changes: usize,
}

impl SimulatedRenderer {
    /// Creates a renderer for the given workload. No preset is active yet.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            preset: None,
            last_fps: None,
            preset_changes: 0,
        }
    }

    /// How many presets have been applied.
    pub fn preset_changes(&self) -> usize {
        self.preset_changes
    }

    /// Replaces the scene size, e.g. once the real scene has been downloaded.
    pub fn set_scene_splats(&mut self, splats: u32) {
        self.config.scene_splats = splats;
    }

    /// Frame time in milliseconds under the active preset, without wobble.
    pub fn frame_time_ms(&self) -> f32 {
        let Some(preset) = self.preset else {
            return self.config.base_frame_ms;
        };

        let splats = self.config.scene_splats.min(preset.max_splats) as f32;
        let (w, h) = preset.scaled_resolution(self.config.viewport_width, self.config.viewport_height);
        let mut shading_ms = (w as f32 * h as f32) / self.config.pixels_per_ms;
        if preset.antialias {
            shading_ms *= ANTIALIAS_SHADING_FACTOR;
        }

        let mut frame_ms =
            self.config.base_frame_ms + splats / self.config.splats_per_ms + shading_ms;
        if preset.shadows {
            frame_ms *= SHADOW_FRAME_FACTOR;
        }
        frame_ms
    }

    /// Renders "a frame" at session time `at` and reports it the way the
    /// renderer's performance monitor would.
    pub fn measure(&mut self, at: Duration) -> PerformanceEvent {
        let t = at.as_secs_f32();
        let wobble = ((t * 1.7).sin() * 0.6 + (t * 0.37).sin() * 0.4) * self.config.jitter;
        let frame_ms = (self.frame_time_ms() * (1.0 + wobble)).max(0.1);
        let fps = 1000.0 / frame_ms;

        let tag = match self.last_fps {
            Some(last) if fps < last - TREND_EPSILON_FPS => PerformanceTag::Decline,
            Some(last) if fps > last + TREND_EPSILON_FPS => PerformanceTag::Incline,
            _ => PerformanceTag::Change,
        };
        self.last_fps = Some(fps);
        PerformanceEvent::new(fps, tag)
    }
}

impl PresetSink for SimulatedRenderer {
    fn apply_preset(&mut self, level: QualityLevel, preset: &QualityPreset) {
        let (w, h) = preset.scaled_resolution(self.config.viewport_width, self.config.viewport_height);
        log::info!(
            "Renderer: {} preset -> {}x{} @ dpr {:.2}, up to {} splats{}{}",
            level,
            w,
            h,
            preset.max_pixel_ratio,
            preset.max_splats,
            if preset.antialias { ", antialias" } else { "" },
            if preset.shadows { ", shadows" } else { "" }
        );
        self.preset = Some(*preset);
        self.preset_changes += 1;
    }
}
