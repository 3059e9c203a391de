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

//! Performance telemetry exchanged between the renderer and the controller.
//!
//! The renderer reports [`PerformanceEvent`]s; the sampler stores them as
//! [`PerformanceSample`]s; the controller answers with [`QualityTransition`]s.

use crate::quality::QualityLevel;
use std::fmt;
use std::time::Duration;

/// Why the renderer's performance monitor fired.
///
/// The controller treats all tags identically; they are kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceTag {
    /// Frame rate dropped below the monitor's lower bound.
    Decline,
    /// Frame rate rose above the monitor's upper bound.
    Incline,
    /// Frame rate changed without crossing a bound.
    Change,
}

/// A frame-rate report from the renderer's monitoring callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceEvent {
    /// Instantaneous frames per second.
    pub current_fps: f32,
    /// What triggered the report.
    pub tag: PerformanceTag,
}

impl PerformanceEvent {
    /// Creates a new event.
    pub fn new(current_fps: f32, tag: PerformanceTag) -> Self {
        Self { current_fps, tag }
    }

    /// Returns `true` if the reported frame rate is usable (finite and positive).
    pub fn is_valid(&self) -> bool {
        self.current_fps.is_finite() && self.current_fps > 0.0
    }
}

/// One measurement stored in the rolling windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSample {
    /// Frames per second.
    pub fps: f32,
    /// Frame duration in milliseconds, if measured.
    pub frame_time_ms: Option<f32>,
}

impl PerformanceSample {
    /// A sample carrying only a frame rate.
    pub fn fps(fps: f32) -> Self {
        Self {
            fps,
            frame_time_ms: None,
        }
    }

    /// A sample whose frame duration is derived from the frame rate.
    pub fn from_fps(fps: f32) -> Self {
        Self {
            fps,
            frame_time_ms: Some(1000.0 / fps),
        }
    }
}

impl From<PerformanceEvent> for PerformanceSample {
    fn from(event: PerformanceEvent) -> Self {
        PerformanceSample::from_fps(event.current_fps)
    }
}

/// A committed quality-level change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityTransition {
    /// Level before the change.
    pub from: QualityLevel,
    /// Level after the change.
    pub to: QualityLevel,
    /// Rolling average frame rate that motivated the change.
    pub avg_fps: f32,
    /// Target frame rate at the time of the change.
    pub target_fps: u32,
    /// Session time at which the change was committed.
    pub at: Duration,
}

impl QualityTransition {
    /// Returns `true` if the change lowered the quality.
    pub fn is_downgrade(&self) -> bool {
        self.to < self.from
    }
}

impl fmt::Display for QualityTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (FPS: {:.1}, Target: {})",
            self.from, self.to, self.avg_fps, self.target_fps
        )
    }
}
