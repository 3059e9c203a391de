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

//! wgpu-based adapter probing.

use super::vendor_name;
use anyhow::{anyhow, Result};
use splat_core::platform::GraphicsInfo;

/// Requests the default high-performance adapter and reads its identity and
/// texture limit. No device is created.
pub fn probe_adapter() -> Result<GraphicsInfo> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|e| anyhow!("Failed to find a suitable adapter: {}", e))?;

    let info = adapter.get_info();
    let limits = adapter.limits();

    log::debug!(
        "Adapter \"{}\" ({:?}, {:?}), max texture {}",
        info.name,
        info.backend,
        info.device_type,
        limits.max_texture_dimension_2d
    );

    Ok(GraphicsInfo {
        renderer: info.name,
        vendor: vendor_name(info.vendor).to_string(),
        max_texture_size: limits.max_texture_dimension_2d,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_adapter_if_available() {
        // Headless CI machines may have no adapter at all.
        let Ok(info) = probe_adapter() else {
            return;
        };
        assert!(info.max_texture_size > 0);
    }
}
