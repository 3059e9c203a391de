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

//! The adaptive quality state machine.
//!
//! On every call to [`AdaptiveController::adapt`] the controller evaluates, in
//! order:
//! 1. **Mode**: nothing happens while adaptive mode is off.
//! 2. **Cooldown**: at least 2 s (1 s when aggressive) between committed changes.
//! 3. **Stability**: once the frame rate has sat within ±5 fps of the target with
//!    a deviation below 3 for more than five consecutive evaluations, changes are
//!    suppressed until it leaves that band.
//! 4. **Direction**: severe shortfall, then moderate shortfall, then headroom.
//!    Only one branch fires per call.

use crate::metrics::PerformanceSampler;
use splat_core::config::TargetFps;
use splat_core::quality::QualityLevel;
use splat_core::telemetry::QualityTransition;
use std::time::Duration;

/// Minimum time between two committed changes.
pub const NORMAL_COOLDOWN: Duration = Duration::from_millis(2000);
/// Minimum time between two committed changes in aggressive mode.
pub const AGGRESSIVE_COOLDOWN: Duration = Duration::from_millis(1000);
/// Fewer samples than this and the frame-rate deviation is treated as zero.
pub const MIN_DEVIATION_SAMPLES: usize = 11;
/// Half-width (fps) of the band around the target considered on-target.
const STABLE_BAND_FPS: f32 = 5.0;
/// Deviation below which on-target performance counts as stable.
const STABLE_MAX_DEVIATION: f32 = 3.0;
/// Stable evaluations tolerated before changes are suppressed.
const STABLE_STREAK_LIMIT: u32 = 5;
/// Below `target * SEVERE_RATIO` the shortfall is severe.
const SEVERE_RATIO: f32 = 0.7;
/// Below `target * MODERATE_RATIO` the shortfall is moderate.
const MODERATE_RATIO: f32 = 0.85;
/// Above `target * HEADROOM_RATIO` there is room to climb.
const HEADROOM_RATIO: f32 = 1.1;
/// Climbing additionally requires a deviation below this.
const HEADROOM_MAX_DEVIATION: f32 = 5.0;

/// Controller state. Only [`AdaptiveController`] mutates it; everybody else
/// receives copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// The active level.
    pub level: QualityLevel,
    /// Whether the controller may change the level on its own.
    pub adaptive: bool,
    /// Shorter cooldown and double steps on severe shortfalls.
    pub aggressive: bool,
    /// Frame rate the controller steers towards.
    pub target_fps: TargetFps,
    /// Session time of the last committed change (or of the last manual reset).
    pub last_adjustment: Duration,
    /// Consecutive on-target, low-deviation evaluations.
    pub stability_counter: u32,
}

/// Which rule produced a level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepReason {
    SevereShortfall,
    ModerateShortfall,
    Headroom,
}

/// Walks the quality ladder in response to rolling frame statistics.
#[derive(Debug, Clone)]
pub struct AdaptiveController {
    state: ControllerState,
}

impl AdaptiveController {
    /// Creates a controller starting at `level`.
    pub fn new(level: QualityLevel, target_fps: TargetFps, adaptive: bool, aggressive: bool) -> Self {
        Self {
            state: ControllerState {
                level,
                adaptive,
                aggressive,
                target_fps,
                last_adjustment: Duration::ZERO,
                stability_counter: 0,
            },
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The active level.
    pub fn level(&self) -> QualityLevel {
        self.state.level
    }

    /// The cooldown currently in force.
    pub fn cooldown(&self) -> Duration {
        if self.state.aggressive {
            AGGRESSIVE_COOLDOWN
        } else {
            NORMAL_COOLDOWN
        }
    }

    /// Evaluates the latest statistics at session time `now` and commits at
    /// most one level change.
    pub fn adapt(&mut self, sampler: &PerformanceSampler, now: Duration) -> Option<QualityTransition> {
        if !self.state.adaptive {
            return None;
        }

        let since_last = now.saturating_sub(self.state.last_adjustment);
        if since_last < self.cooldown() {
            return None;
        }

        let avg_fps = sampler.snapshot().avg_fps;
        let target = self.state.target_fps.as_f32();
        let deviation = if sampler.sample_count() >= MIN_DEVIATION_SAMPLES {
            sampler.fps_std_dev()
        } else {
            0.0
        };

        if (avg_fps - target).abs() < STABLE_BAND_FPS && deviation < STABLE_MAX_DEVIATION {
            self.state.stability_counter += 1;
            if self.state.stability_counter > STABLE_STREAK_LIMIT {
                log::trace!(
                    "Controller: stable at {} ({:.1} fps, streak {}).",
                    self.state.level,
                    avg_fps,
                    self.state.stability_counter
                );
                return None;
            }
        } else {
            self.state.stability_counter = 0;
        }

        let (next, reason) = self.decide(avg_fps, target, deviation)?;
        if next == self.state.level {
            log::debug!(
                "Controller: {:?} at {:.1} fps but already at {}.",
                reason,
                avg_fps,
                next
            );
            return None;
        }

        let transition = QualityTransition {
            from: self.state.level,
            to: next,
            avg_fps,
            target_fps: self.state.target_fps.get(),
            at: now,
        };
        self.state.level = next;
        self.state.last_adjustment = now;
        log::info!("Quality adjusted: {transition} [{reason:?}]");
        Some(transition)
    }

    fn decide(&self, avg_fps: f32, target: f32, deviation: f32) -> Option<(QualityLevel, StepReason)> {
        let level = self.state.level;
        if avg_fps < target * SEVERE_RATIO {
            let steps = if self.state.aggressive { 2 } else { 1 };
            Some((level.step_down(steps), StepReason::SevereShortfall))
        } else if avg_fps < target * MODERATE_RATIO {
            Some((level.step_down(1), StepReason::ModerateShortfall))
        } else if avg_fps > target * HEADROOM_RATIO && deviation < HEADROOM_MAX_DEVIATION {
            Some((level.step_up(1), StepReason::Headroom))
        } else {
            None
        }
    }

    /// Forces the active level. Resets the stability streak and the cooldown.
    pub fn set_level(&mut self, level: QualityLevel) {
        if level != self.state.level {
            log::info!("Quality set manually: {} -> {}", self.state.level, level);
        }
        self.state.level = level;
        self.reset_regime();
    }

    /// Switches between adaptive and manual mode.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        if adaptive == self.state.adaptive {
            return;
        }
        log::info!(
            "Quality control switched to {} mode.",
            if adaptive { "adaptive" } else { "manual" }
        );
        self.state.adaptive = adaptive;
        self.reset_regime();
    }

    /// Changes the target frame rate. Resets the stability streak and the cooldown.
    pub fn set_target_fps(&mut self, target_fps: TargetFps) {
        if target_fps == self.state.target_fps {
            return;
        }
        log::info!(
            "Target fps changed: {} -> {}",
            self.state.target_fps,
            target_fps
        );
        self.state.target_fps = target_fps;
        self.reset_regime();
    }

    /// Toggles aggressive optimization.
    pub fn set_aggressive(&mut self, aggressive: bool) {
        self.state.aggressive = aggressive;
    }

    fn reset_regime(&mut self) {
        self.state.stability_counter = 0;
        self.state.last_adjustment = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splat_core::telemetry::PerformanceSample;

    const fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn target(fps: u32) -> TargetFps {
        TargetFps::new(fps).unwrap()
    }

    fn sampler_at(fps: f32, samples: usize) -> PerformanceSampler {
        let mut sampler = PerformanceSampler::new(target(60));
        for _ in 0..samples {
            sampler.record(PerformanceSample::from_fps(fps));
        }
        sampler
    }

    fn controller(level: QualityLevel, aggressive: bool) -> AdaptiveController {
        AdaptiveController::new(level, target(60), true, aggressive)
    }

    #[test]
    fn test_severe_shortfall_steps_down_one() {
        let mut c = controller(QualityLevel::High, false);
        let t = c.adapt(&sampler_at(30.0, 30), secs(3)).unwrap();
        assert_eq!(t.from, QualityLevel::High);
        assert_eq!(t.to, QualityLevel::Medium);
        assert_eq!(t.target_fps, 60);
        assert_eq!(c.state().last_adjustment, secs(3));
    }

    #[test]
    fn test_aggressive_severe_shortfall_steps_down_two() {
        let mut c = controller(QualityLevel::High, true);
        let t = c.adapt(&sampler_at(30.0, 30), secs(3)).unwrap();
        assert_eq!(t.to, QualityLevel::Low);

        let mut c = controller(QualityLevel::Low, true);
        let t = c.adapt(&sampler_at(30.0, 30), secs(3)).unwrap();
        assert_eq!(t.to, QualityLevel::Potato);
    }

    #[test]
    fn test_moderate_shortfall_steps_down_one_even_when_aggressive() {
        // 48 / 60 = 0.8: below 0.85, above 0.7.
        let mut c = controller(QualityLevel::High, true);
        let t = c.adapt(&sampler_at(48.0, 30), secs(3)).unwrap();
        assert_eq!(t.to, QualityLevel::Medium);
    }

    #[test]
    fn test_headroom_steps_up() {
        let mut c = controller(QualityLevel::Medium, false);
        let t = c.adapt(&sampler_at(70.0, 30), secs(3)).unwrap();
        assert_eq!(t.to, QualityLevel::High);
    }

    #[test]
    fn test_headroom_requires_low_deviation() {
        // Alternating 60/90 averages 75 but deviates by 15.
        let mut sampler = PerformanceSampler::new(target(60));
        for i in 0..30 {
            sampler.record(PerformanceSample::from_fps(if i % 2 == 0 { 60.0 } else { 90.0 }));
        }
        let mut c = controller(QualityLevel::Medium, false);
        assert!(c.adapt(&sampler, secs(3)).is_none());
        assert_eq!(c.level(), QualityLevel::Medium);
    }

    #[test]
    fn test_deviation_ignored_with_few_samples() {
        // Ten noisy samples: deviation is treated as zero, so headroom fires.
        let mut sampler = PerformanceSampler::new(target(60));
        for i in 0..10 {
            sampler.record(PerformanceSample::from_fps(if i % 2 == 0 { 60.0 } else { 90.0 }));
        }
        let mut c = controller(QualityLevel::Medium, false);
        assert_eq!(c.adapt(&sampler, secs(3)).unwrap().to, QualityLevel::High);
    }

    #[test]
    fn test_in_band_without_streak_holds() {
        let mut c = controller(QualityLevel::High, false);
        assert!(c.adapt(&sampler_at(58.0, 30), secs(3)).is_none());
        assert_eq!(c.state().stability_counter, 1);
    }

    #[test]
    fn test_stable_streak_suppresses_changes() {
        // At a 15 fps target the ±5 band overlaps the headroom threshold (16.5).
        let mut c = AdaptiveController::new(QualityLevel::High, target(15), true, false);
        for i in 1..=6 {
            assert!(c.adapt(&sampler_at(15.0, 30), secs(2 * i)).is_none());
        }
        assert_eq!(c.state().stability_counter, 6);

        // Would climb, but the streak is over the limit.
        assert!(c.adapt(&sampler_at(17.0, 30), secs(14)).is_none());
        assert_eq!(c.level(), QualityLevel::High);
        assert_eq!(c.state().stability_counter, 7);

        // Leaving the band clears the streak and the climb goes through.
        let t = c.adapt(&sampler_at(30.0, 30), secs(16)).unwrap();
        assert_eq!(t.to, QualityLevel::Ultra);
        assert_eq!(c.state().stability_counter, 0);
    }

    #[test]
    fn test_cooldown_blocks_early_calls() {
        let mut c = controller(QualityLevel::High, false);
        // Session start counts as the last adjustment.
        assert!(c.adapt(&sampler_at(30.0, 30), Duration::from_millis(1999)).is_none());
        assert!(c.adapt(&sampler_at(30.0, 30), secs(2)).is_some());
        // Immediately after a change nothing happens...
        assert!(c.adapt(&sampler_at(30.0, 30), Duration::from_millis(3999)).is_none());
        // ...until the cooldown elapsed again.
        assert!(c.adapt(&sampler_at(30.0, 30), secs(4)).is_some());
        assert_eq!(c.level(), QualityLevel::Low);
    }

    #[test]
    fn test_aggressive_cooldown_is_shorter() {
        let mut c = controller(QualityLevel::Ultra, true);
        assert_eq!(c.cooldown(), AGGRESSIVE_COOLDOWN);
        assert!(c.adapt(&sampler_at(48.0, 30), secs(1)).is_some());
        assert!(c.adapt(&sampler_at(48.0, 30), Duration::from_millis(1500)).is_none());
        assert!(c.adapt(&sampler_at(48.0, 30), secs(2)).is_some());
    }

    #[test]
    fn test_boundary_clamps() {
        let mut top = controller(QualityLevel::Ultra, false);
        for i in 1..20 {
            assert!(top.adapt(&sampler_at(120.0, 30), secs(3 * i)).is_none());
        }
        assert_eq!(top.level(), QualityLevel::Ultra);

        let mut bottom = controller(QualityLevel::Potato, true);
        for i in 1..20 {
            assert!(bottom.adapt(&sampler_at(10.0, 30), secs(3 * i)).is_none());
        }
        assert_eq!(bottom.level(), QualityLevel::Potato);
    }

    #[test]
    fn test_manual_mode_never_changes_level() {
        let mut c = AdaptiveController::new(QualityLevel::Medium, target(60), false, true);
        for i in 1..20 {
            assert!(c.adapt(&sampler_at(10.0, 30), secs(3 * i)).is_none());
            assert!(c.adapt(&sampler_at(120.0, 30), secs(3 * i + 1)).is_none());
        }
        assert_eq!(c.level(), QualityLevel::Medium);

        c.set_level(QualityLevel::Ultra);
        assert_eq!(c.level(), QualityLevel::Ultra);
    }

    #[test]
    fn test_manual_writes_reset_regime() {
        let mut c = controller(QualityLevel::High, false);
        c.adapt(&sampler_at(30.0, 30), secs(10)).unwrap();
        assert_eq!(c.state().last_adjustment, secs(10));

        c.set_target_fps(target(30));
        assert_eq!(c.state().last_adjustment, Duration::ZERO);
        assert_eq!(c.state().stability_counter, 0);
        assert_eq!(c.state().target_fps.get(), 30);

        // The cooldown no longer blocks, so 30 fps on a 30 target starts a streak.
        assert!(c.adapt(&sampler_at(30.0, 30), Duration::from_millis(10_500)).is_none());
        assert_eq!(c.state().stability_counter, 1);

        c.set_level(QualityLevel::Low);
        assert_eq!(c.state().stability_counter, 0);
    }

    #[test]
    fn test_aggressive_toggle_keeps_regime() {
        let mut c = controller(QualityLevel::High, false);
        c.adapt(&sampler_at(30.0, 30), secs(10)).unwrap();
        c.set_aggressive(true);
        assert_eq!(c.state().last_adjustment, secs(10));
        assert_eq!(c.cooldown(), AGGRESSIVE_COOLDOWN);
    }
}
