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

//! # Splat Control
//!
//! The closed-loop quality controller. Data flows one way:
//!
//! 1. [`profiler::CapabilityProfiler`] inspects the device once.
//! 2. [`ladder::build_ladder`] derives the five presets for that device.
//! 3. [`metrics::PerformanceSampler`] keeps rolling frame statistics.
//! 4. [`controller::AdaptiveController`] walks the ladder from those statistics.
//! 5. [`observer::ControllerSnapshot`] exposes a read-only view for diagnostics.
//!
//! [`service::QualityService`] wires these together behind the renderer's
//! performance callback.

#![warn(missing_docs)]

pub mod classifier;
pub mod controller;
pub mod ladder;
pub mod metrics;
pub mod observer;
pub mod profiler;
pub mod service;

pub use classifier::HeuristicGpuClassifier;
pub use controller::{AdaptiveController, ControllerState};
pub use ladder::build_ladder;
pub use metrics::{PerformanceSampler, PerformanceSnapshot, RingBuffer};
pub use observer::{ControllerSnapshot, FrameRateHealth};
pub use profiler::CapabilityProfiler;
pub use service::{QualityService, QualityServiceConfig};
