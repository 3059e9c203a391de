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

//! The native [`CapabilitySource`].

use crate::platform::sysinfo_impl::SysinfoProbe;
use splat_core::platform::{CapabilityError, CapabilitySource, GraphicsInfo};

/// Capability source for native hosts.
///
/// Signals with no native equivalent (the display pixel density, which depends
/// on the window the renderer eventually opens) are only available through
/// overrides. Overrides also let embedders report a browser-style platform
/// identifier.
pub struct NativeCapabilitySource {
    system: SysinfoProbe,
    identifier_override: Option<String>,
    pixel_density_override: Option<f32>,
    probe_graphics: bool,
}

impl NativeCapabilitySource {
    /// Creates a source that probes the host.
    pub fn new() -> Self {
        Self {
            system: SysinfoProbe::new(),
            identifier_override: None,
            pixel_density_override: None,
            probe_graphics: true,
        }
    }

    /// Reports `identifier` instead of the host's OS description.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier_override = Some(identifier.into());
        self
    }

    /// Reports `density` as the display pixel density.
    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.pixel_density_override = Some(density);
        self
    }

    /// Skips the GPU adapter probe, e.g. on headless machines.
    pub fn without_graphics(mut self) -> Self {
        self.probe_graphics = false;
        self
    }
}

impl Default for NativeCapabilitySource {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilitySource for NativeCapabilitySource {
    fn platform_identifier(&self) -> Result<String, CapabilityError> {
        Ok(self
            .identifier_override
            .clone()
            .unwrap_or_else(|| self.system.platform_identifier()))
    }

    fn pixel_density(&self) -> Result<f32, CapabilityError> {
        self.pixel_density_override.ok_or_else(|| {
            CapabilityError::unavailable("pixel_density", "no display attached to the probe")
        })
    }

    fn logical_cores(&self) -> Result<usize, CapabilityError> {
        self.system
            .logical_cores()
            .map_err(|e| CapabilityError::unavailable("logical_cores", e.to_string()))
    }

    fn memory_budget_bytes(&self) -> Result<u64, CapabilityError> {
        self.system
            .total_memory_bytes()
            .map_err(|e| CapabilityError::unavailable("memory", e.to_string()))
    }

    fn graphics_info(&self) -> Result<GraphicsInfo, CapabilityError> {
        if !self.probe_graphics {
            return Err(CapabilityError::unavailable("graphics", "probing disabled"));
        }
        probe_graphics()
    }
}

#[cfg(feature = "graphics")]
fn probe_graphics() -> Result<GraphicsInfo, CapabilityError> {
    crate::graphics::wgpu::probe_adapter()
        .map_err(|e| CapabilityError::unavailable("graphics", e.to_string()))
}

#[cfg(not(feature = "graphics"))]
fn probe_graphics() -> Result<GraphicsInfo, CapabilityError> {
    Err(CapabilityError::unavailable(
        "graphics",
        "built without the `graphics` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let source = NativeCapabilitySource::new()
            .with_identifier("Mozilla/5.0 (iPad; CPU OS 17_0)")
            .with_pixel_density(2.0)
            .without_graphics();
        assert_eq!(
            source.platform_identifier().unwrap(),
            "Mozilla/5.0 (iPad; CPU OS 17_0)"
        );
        assert_eq!(source.pixel_density().unwrap(), 2.0);
        assert!(source.graphics_info().is_err());
    }

    #[test]
    fn test_pixel_density_unavailable_without_override() {
        let source = NativeCapabilitySource::new().without_graphics();
        assert!(matches!(
            source.pixel_density(),
            Err(CapabilityError::Unavailable { signal: "pixel_density", .. })
        ));
    }
}
