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

//! Central service for adaptive quality control.

use crate::controller::{AdaptiveController, ControllerState};
use crate::ladder::build_ladder;
use crate::metrics::PerformanceSampler;
use crate::observer::ControllerSnapshot;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use splat_core::config::{ConfigError, QualitySettings, TargetFps};
use splat_core::platform::DeviceProfile;
use splat_core::quality::{PresetSink, QualityLadder, QualityLevel, QualityPreset};
use splat_core::telemetry::{PerformanceEvent, PerformanceSample, QualityTransition};
use std::time::Duration;

/// Configuration for the quality service.
#[derive(Debug, Clone)]
pub struct QualityServiceConfig {
    /// Maximum number of transitions buffered per subscriber.
    /// If a subscriber's buffer is full, new transitions are dropped for it.
    pub transition_buffer_size: usize,
}

impl Default for QualityServiceConfig {
    fn default() -> Self {
        Self {
            transition_buffer_size: 64,
        }
    }
}

/// The adaptive quality service.
///
/// Owns the sampler, the controller and the device ladder, and drives them
/// from the renderer's performance callback. Runs on the caller's thread.
pub struct QualityService<S: PresetSink> {
    config: QualityServiceConfig,
    profile: DeviceProfile,
    ladder: QualityLadder,
    settings: QualitySettings,
    sampler: PerformanceSampler,
    controller: AdaptiveController,
    sink: S,
    subscribers: Vec<Sender<QualityTransition>>,
}

impl<S: PresetSink> QualityService<S> {
    /// Creates the service and applies the starting preset to `sink`.
    pub fn new(
        profile: DeviceProfile,
        settings: QualitySettings,
        sink: S,
        config: QualityServiceConfig,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        let ladder = build_ladder(&profile);
        let controller = AdaptiveController::new(
            settings.manual_level,
            settings.target_fps,
            settings.adaptive,
            settings.aggressive,
        );
        let sampler = PerformanceSampler::new(settings.target_fps);

        let mut service = Self {
            config,
            profile,
            ladder,
            settings,
            sampler,
            controller,
            sink,
            subscribers: Vec::new(),
        };

        log::info!(
            "Quality service started: level={}, target={} fps, adaptive={}, aggressive={}",
            service.controller.level(),
            service.settings.target_fps,
            service.settings.adaptive,
            service.settings.aggressive
        );
        service.push_active_preset();
        Ok(service)
    }

    /// Renderer performance callback. Every tag takes the same path.
    ///
    /// Events with a non-finite or non-positive frame rate are ignored.
    pub fn on_performance_event(
        &mut self,
        event: PerformanceEvent,
        now: Duration,
    ) -> Option<QualityTransition> {
        if !event.is_valid() {
            log::warn!(
                "Quality service: ignoring {:?} event with fps {}.",
                event.tag,
                event.current_fps
            );
            return None;
        }
        self.record_sample(event.into(), now)
    }

    /// Records a sample and lets the controller react to it.
    pub fn record_sample(
        &mut self,
        sample: PerformanceSample,
        now: Duration,
    ) -> Option<QualityTransition> {
        self.sampler.record(sample);
        let transition = self.controller.adapt(&self.sampler, now)?;
        self.push_active_preset();
        self.broadcast(transition);
        Some(transition)
    }

    /// Replaces the settings, applying only what changed.
    pub fn apply_settings(&mut self, settings: QualitySettings) -> Result<(), ConfigError> {
        settings.validate()?;
        let previous = std::mem::replace(&mut self.settings, settings);

        if previous.asset_url != self.settings.asset_url {
            log::info!("Scene changed to {}.", self.settings.asset_url);
            self.sampler.reset(self.settings.target_fps);
        }
        if previous.target_fps != self.settings.target_fps {
            self.controller.set_target_fps(self.settings.target_fps);
            self.sampler.reseed(self.settings.target_fps);
        }
        if previous.aggressive != self.settings.aggressive {
            self.controller.set_aggressive(self.settings.aggressive);
        }
        if previous.adaptive != self.settings.adaptive {
            self.controller.set_adaptive(self.settings.adaptive);
        }
        let entered_manual = previous.adaptive && !self.settings.adaptive;
        if entered_manual || previous.manual_level != self.settings.manual_level {
            self.force_level(self.settings.manual_level);
        }
        Ok(())
    }

    /// Forces a level, as the manual quality selector does.
    pub fn set_level(&mut self, level: QualityLevel) {
        self.settings.manual_level = level;
        self.force_level(level);
    }

    /// Switches between adaptive and manual mode.
    ///
    /// Leaving adaptive mode restores the manual level.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        let entered_manual = self.settings.adaptive && !adaptive;
        self.settings.adaptive = adaptive;
        self.controller.set_adaptive(adaptive);
        if entered_manual {
            self.force_level(self.settings.manual_level);
        }
    }

    /// Toggles aggressive optimization.
    pub fn set_aggressive(&mut self, aggressive: bool) {
        self.settings.aggressive = aggressive;
        self.controller.set_aggressive(aggressive);
    }

    /// Changes the target frame rate. Out-of-range values are rejected.
    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), ConfigError> {
        let target = TargetFps::new(fps)?;
        self.settings.target_fps = target;
        self.controller.set_target_fps(target);
        self.sampler.reseed(target);
        Ok(())
    }

    /// Opens a new transition feed.
    ///
    /// Each subscriber gets its own bounded buffer; a subscriber that stops
    /// reading only loses its own events. Dropped receivers are pruned on the
    /// next transition.
    pub fn subscribe(&mut self) -> Receiver<QualityTransition> {
        let (tx, rx) = crossbeam_channel::bounded(self.config.transition_buffer_size);
        self.subscribers.push(tx);
        rx
    }

    /// Point-in-time diagnostics.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot::capture(
            &self.controller.state(),
            &self.sampler.snapshot(),
            self.active_preset(),
            &self.profile,
        )
    }

    /// Preset of the active level.
    pub fn active_preset(&self) -> &QualityPreset {
        self.ladder.get(self.controller.level())
    }

    /// The active level.
    pub fn level(&self) -> QualityLevel {
        self.controller.level()
    }

    /// A copy of the controller state.
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    /// The device profile the ladder was built from.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// The device ladder.
    pub fn ladder(&self) -> &QualityLadder {
        &self.ladder
    }

    /// Current settings.
    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }

    /// The rolling frame statistics.
    pub fn sampler(&self) -> &PerformanceSampler {
        &self.sampler
    }

    /// The preset receiver.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the preset receiver.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Writes `level` to the controller, which always resets its regime.
    /// The sink only hears about it when the level actually moves.
    fn force_level(&mut self, level: QualityLevel) {
        let changed = level != self.controller.level();
        self.controller.set_level(level);
        if changed {
            self.push_active_preset();
        }
    }

    fn push_active_preset(&mut self) {
        let level = self.controller.level();
        let preset = *self.ladder.get(level);
        log::debug!(
            "Applying preset {}: dpr {:.2}, {} splats, aa={}, shadows={}",
            level,
            preset.max_pixel_ratio,
            preset.max_splats,
            preset.antialias,
            preset.shadows
        );
        self.sink.apply_preset(level, &preset);
    }

    fn broadcast(&mut self, transition: QualityTransition) {
        self.subscribers.retain(|tx| match tx.try_send(transition) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::debug!("Quality service: subscriber buffer full, dropping {transition}.");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}
