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

//! Provides abstractions over device introspection.
//!
//! This module contains the traits and types that describe what the host device
//! can do. Concrete probes live in `splat-infra`; the profiler in `splat-control`
//! turns their (possibly missing) answers into a [`DeviceProfile`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pixel density assumed when the display cannot be queried.
pub const DEFAULT_PIXEL_DENSITY: f32 = 1.0;
/// Maximum texture size assumed when no graphics context is available.
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 2048;
/// Logical core count assumed when the platform does not report one.
pub const DEFAULT_LOGICAL_CORES: usize = 4;

/// Broad form factor of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Phones and other small handheld devices.
    Mobile,
    /// Tablets.
    Tablet,
    /// Laptops and desktops.
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Returns `true` for [`DeviceClass::Mobile`].
    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        })
    }
}

/// Coarse classification of the GPU's rendering headroom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GpuTier {
    /// Integrated or unknown GPUs. Also the fallback when detection fails.
    #[default]
    Low,
    /// Mid-range discrete or recent integrated GPUs.
    Medium,
    /// High-end discrete GPUs and Apple silicon.
    High,
}

impl fmt::Display for GpuTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpuTier::Low => "low",
            GpuTier::Medium => "medium",
            GpuTier::High => "high",
        })
    }
}

/// Identification and limits reported by a graphics adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphicsInfo {
    /// Renderer identifier, e.g. `"NVIDIA GeForce RTX 3080"`.
    pub renderer: String,
    /// Vendor identifier, e.g. `"NVIDIA"`.
    pub vendor: String,
    /// Largest supported 2D texture dimension.
    pub max_texture_size: u32,
}

/// Immutable description of the host device, computed once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Device form factor.
    pub class: DeviceClass,
    /// GPU headroom tier.
    pub gpu_tier: GpuTier,
    /// Display pixel density (device pixels per logical pixel).
    pub pixel_density: f32,
    /// Number of logical CPU cores.
    pub logical_cores: usize,
    /// Total memory available to the process, in bytes, if known.
    pub memory_budget_bytes: Option<u64>,
    /// Largest supported 2D texture dimension.
    pub max_texture_size: u32,
    /// Adapter identification, if a graphics context was available.
    pub graphics: Option<GraphicsInfo>,
}

impl Default for DeviceProfile {
    /// The conservative profile used when nothing can be introspected.
    fn default() -> Self {
        Self {
            class: DeviceClass::Desktop,
            gpu_tier: GpuTier::Low,
            pixel_density: DEFAULT_PIXEL_DENSITY,
            logical_cores: DEFAULT_LOGICAL_CORES,
            memory_budget_bytes: None,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            graphics: None,
        }
    }
}

/// A capability signal could not be read from the platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The signal is not exposed by this platform or backend.
    #[error("capability '{signal}' unavailable: {reason}")]
    Unavailable {
        /// Name of the missing signal (e.g. `"graphics"`).
        signal: &'static str,
        /// Why it could not be read.
        reason: String,
    },
}

impl CapabilityError {
    /// Shorthand for [`CapabilityError::Unavailable`].
    pub fn unavailable(signal: &'static str, reason: impl Into<String>) -> Self {
        CapabilityError::Unavailable {
            signal,
            reason: reason.into(),
        }
    }
}

/// Read-only access to the raw signals a [`DeviceProfile`] is derived from.
///
/// Every method may fail independently; callers are expected to substitute
/// conservative defaults instead of propagating the error.
pub trait CapabilitySource {
    /// A user-agent-like string identifying the OS and device model.
    fn platform_identifier(&self) -> Result<String, CapabilityError>;
    /// Device pixels per logical pixel of the primary display.
    fn pixel_density(&self) -> Result<f32, CapabilityError>;
    /// Number of logical CPU cores.
    fn logical_cores(&self) -> Result<usize, CapabilityError>;
    /// Memory available to the process, in bytes.
    fn memory_budget_bytes(&self) -> Result<u64, CapabilityError>;
    /// Identification and limits of the graphics adapter.
    fn graphics_info(&self) -> Result<GraphicsInfo, CapabilityError>;
}

/// Maps adapter information to a [`GpuTier`].
///
/// Implementations are best-effort; `None` means no graphics context exists.
pub trait GpuClassifier {
    /// Classifies the adapter described by `info`.
    fn classify(&self, info: Option<&GraphicsInfo>) -> GpuTier;
}

impl<F> GpuClassifier for F
where
    F: Fn(Option<&GraphicsInfo>) -> GpuTier,
{
    fn classify(&self, info: Option<&GraphicsInfo>) -> GpuTier {
        self(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_conservative() {
        let profile = DeviceProfile::default();
        assert_eq!(profile.class, DeviceClass::Desktop);
        assert_eq!(profile.gpu_tier, GpuTier::Low);
        assert_eq!(profile.pixel_density, 1.0);
        assert_eq!(profile.max_texture_size, 2048);
        assert!(profile.graphics.is_none());
    }

    #[test]
    fn test_closure_as_classifier() {
        let always_high = |_: Option<&GraphicsInfo>| GpuTier::High;
        assert_eq!(always_high.classify(None), GpuTier::High);
    }

    #[test]
    fn test_capability_error_message() {
        let err = CapabilityError::unavailable("graphics", "no adapter");
        assert_eq!(err.to_string(), "capability 'graphics' unavailable: no adapter");
    }
}
