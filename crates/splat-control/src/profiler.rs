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

//! One-shot device capability profiling.
//!
//! The profiler never fails. Every signal the [`CapabilitySource`] cannot
//! provide is replaced by a conservative default and logged.

use crate::classifier::HeuristicGpuClassifier;
use splat_core::platform::{
    CapabilitySource, DeviceClass, DeviceProfile, GpuClassifier, DEFAULT_LOGICAL_CORES,
    DEFAULT_MAX_TEXTURE_SIZE, DEFAULT_PIXEL_DENSITY,
};

/// Identifier fragments that denote a tablet. Checked before the mobile ones.
const TABLET_MARKERS: &[&str] = &["ipad", "tablet"];
/// Identifier fragments that denote a phone-class device.
const MOBILE_MARKERS: &[&str] = &["iphone", "ipod", "android", "ios"];

/// Derives a [`DeviceClass`] from a user-agent-like platform identifier.
///
/// Matching is case-insensitive. `"tablet"` only counts together with
/// `"android"`.
pub fn classify_device(identifier: &str) -> DeviceClass {
    let id = identifier.to_ascii_lowercase();

    let is_tablet = TABLET_MARKERS.iter().any(|marker| match *marker {
        "tablet" => id.contains("android") && id.contains("tablet"),
        other => id.contains(other),
    });
    if is_tablet {
        return DeviceClass::Tablet;
    }

    if MOBILE_MARKERS.iter().any(|marker| id.contains(marker)) {
        return DeviceClass::Mobile;
    }

    DeviceClass::Desktop
}

/// Builds a [`DeviceProfile`] from a [`CapabilitySource`].
pub struct CapabilityProfiler<S: CapabilitySource> {
    source: S,
    classifier: Box<dyn GpuClassifier>,
}

impl<S: CapabilitySource> CapabilityProfiler<S> {
    /// Creates a profiler using the [`HeuristicGpuClassifier`].
    pub fn new(source: S) -> Self {
        Self::with_classifier(source, HeuristicGpuClassifier)
    }

    /// Creates a profiler with a custom GPU classifier.
    pub fn with_classifier(source: S, classifier: impl GpuClassifier + 'static) -> Self {
        Self {
            source,
            classifier: Box::new(classifier),
        }
    }

    /// Inspects the device. Intended to run once per session.
    pub fn profile(&self) -> DeviceProfile {
        let class = match self.source.platform_identifier() {
            Ok(id) => classify_device(&id),
            Err(e) => {
                log::warn!("Profiler: {e}. Assuming desktop.");
                DeviceClass::Desktop
            }
        };

        let pixel_density = match self.source.pixel_density() {
            Ok(density) if density.is_finite() && density > 0.0 => density,
            Ok(density) => {
                log::warn!("Profiler: ignoring invalid pixel density {density}.");
                DEFAULT_PIXEL_DENSITY
            }
            Err(e) => {
                log::warn!("Profiler: {e}. Using pixel density {DEFAULT_PIXEL_DENSITY}.");
                DEFAULT_PIXEL_DENSITY
            }
        };

        let logical_cores = match self.source.logical_cores() {
            Ok(cores) if cores > 0 => cores,
            Ok(_) => DEFAULT_LOGICAL_CORES,
            Err(e) => {
                log::warn!("Profiler: {e}. Assuming {DEFAULT_LOGICAL_CORES} cores.");
                DEFAULT_LOGICAL_CORES
            }
        };

        let memory_budget_bytes = match self.source.memory_budget_bytes() {
            Ok(bytes) if bytes > 0 => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Profiler: {e}. No memory budget.");
                None
            }
        };

        let graphics = match self.source.graphics_info() {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Profiler: {e}. GPU tier falls back to low.");
                None
            }
        };

        let gpu_tier = self.classifier.classify(graphics.as_ref());
        let max_texture_size = graphics
            .as_ref()
            .map(|g| g.max_texture_size)
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_MAX_TEXTURE_SIZE);

        let profile = DeviceProfile {
            class,
            gpu_tier,
            pixel_density,
            logical_cores,
            memory_budget_bytes,
            max_texture_size,
            graphics,
        };

        log::info!(
            "Device profile: class={}, gpu_tier={}, dpr={:.2}, cores={}, max_texture={}",
            profile.class,
            profile.gpu_tier,
            profile.pixel_density,
            profile.logical_cores,
            profile.max_texture_size
        );

        profile
    }
}
