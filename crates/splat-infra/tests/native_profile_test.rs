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

//! Profiles the host through the native source.

use splat_control::{build_ladder, CapabilityProfiler};
use splat_core::platform::{DeviceClass, GpuTier, DEFAULT_PIXEL_DENSITY};
use splat_infra::NativeCapabilitySource;

#[test]
fn test_headless_host_profile() {
    let source = NativeCapabilitySource::new().without_graphics();
    let profile = CapabilityProfiler::new(source).profile();

    // No graphics context: conservative tier and texture size.
    assert_eq!(profile.gpu_tier, GpuTier::Low);
    assert!(profile.graphics.is_none());
    assert_eq!(profile.pixel_density, DEFAULT_PIXEL_DENSITY);
    assert!(profile.logical_cores > 0);
    assert!(build_ladder(&profile).validate().is_ok());
}

#[test]
fn test_identifier_override_drives_device_class() {
    let source = NativeCapabilitySource::new()
        .with_identifier("Mozilla/5.0 (Linux; Android 14; Pixel 8)")
        .with_pixel_density(2.75)
        .without_graphics();
    let profile = CapabilityProfiler::new(source).profile();
    assert_eq!(profile.class, DeviceClass::Mobile);
    assert_eq!(profile.pixel_density, 2.75);
}
