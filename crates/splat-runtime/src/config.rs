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

//! Session configuration, loaded from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use splat_core::config::{ConfigError, TargetFps};
use splat_core::platform::DeviceClass;
use splat_core::{QualityLevel, QualitySettings};
use std::path::{Path, PathBuf};

/// Top-level runtime configuration. Every field is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Quality settings laid over the device defaults.
    pub settings: SettingsOverrides,
    /// Device overrides applied before profiling.
    pub device: DeviceOverrides,
    /// Asset download and caching.
    pub assets: AssetConfig,
    /// The synthetic frame loop.
    pub simulation: SimulationConfig,
}

impl RuntimeConfig {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

/// The settings block of the file. Missing fields take the device class
/// defaults, not the desktop ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverrides {
    pub asset_url: Option<String>,
    pub manual_level: Option<QualityLevel>,
    pub adaptive: Option<bool>,
    pub target_fps: Option<TargetFps>,
    pub debug_overlay: Option<bool>,
    pub aggressive: Option<bool>,
}

impl SettingsOverrides {
    /// Starts from [`QualitySettings::for_device`] and applies every field set
    /// in the file.
    pub fn resolve(&self, class: DeviceClass) -> Result<QualitySettings, ConfigError> {
        let mut settings = QualitySettings::for_device(class);
        if let Some(url) = &self.asset_url {
            settings.asset_url = url.clone();
        }
        if let Some(level) = self.manual_level {
            settings.manual_level = level;
        }
        if let Some(adaptive) = self.adaptive {
            settings.adaptive = adaptive;
        }
        if let Some(target) = self.target_fps {
            settings.target_fps = target;
        }
        if let Some(overlay) = self.debug_overlay {
            settings.debug_overlay = overlay;
        }
        if let Some(aggressive) = self.aggressive {
            settings.aggressive = aggressive;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Values reported instead of (or in the absence of) probed ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceOverrides {
    /// User-agent-like platform string.
    pub identifier: Option<String>,
    /// Display pixel density.
    pub pixel_density: Option<f32>,
    /// Skip the GPU adapter probe.
    pub skip_gpu_probe: bool,
}

/// Asset download and caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Download the scene before the session starts.
    pub fetch: bool,
    /// Cache root directory.
    pub cache_dir: PathBuf,
    /// URLs stored ahead of time.
    pub precache: Vec<String>,
    /// Network timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            fetch: false,
            cache_dir: PathBuf::from(".splat-cache"),
            precache: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Synthetic renderer and frame loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Session length in seconds.
    pub duration_secs: u64,
    /// Interval between performance callbacks.
    pub event_interval_ms: u64,
    /// Logical viewport width.
    pub viewport_width: u32,
    /// Logical viewport height.
    pub viewport_height: u32,
    /// Splats in the scene. Replaced by the downloaded scene's size when fetched.
    pub scene_splats: u32,
    /// Splats the simulated GPU sorts and blends per millisecond.
    pub splats_per_ms: f32,
    /// Pixels the simulated GPU shades per millisecond.
    pub pixels_per_ms: f32,
    /// Fixed per-frame overhead in milliseconds.
    pub base_frame_ms: f32,
    /// Relative amplitude of the frame-time wobble (0.1 = ±10%).
    pub jitter: f32,
    /// Seconds between diagnostics lines when the overlay is on.
    pub overlay_interval_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            event_interval_ms: 250,
            viewport_width: 1920,
            viewport_height: 1080,
            scene_splats: 12_000_000,
            splats_per_ms: 1_000_000.0,
            pixels_per_ms: 800_000.0,
            base_frame_ms: 2.0,
            jitter: 0.08,
            overlay_interval_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.settings, SettingsOverrides::default());
        assert!(!config.assets.fetch);
        assert_eq!(config.simulation.event_interval_ms, 250);
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let json = r#"{
            "settings": { "target_fps": 30, "manual_level": "low" },
            "device": { "identifier": "iPad", "pixel_density": 2.0 },
            "simulation": { "duration_secs": 10 }
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        let settings = config.settings.resolve(DeviceClass::Desktop).unwrap();
        assert_eq!(settings.target_fps.get(), 30);
        assert_eq!(settings.manual_level, QualityLevel::Low);
        assert!(settings.adaptive);
        assert!(!settings.aggressive);
        assert_eq!(config.device.identifier.as_deref(), Some("iPad"));
        assert_eq!(config.simulation.duration_secs, 10);
        assert_eq!(config.simulation.viewport_width, 1920);
    }

    #[test]
    fn test_partial_settings_keep_mobile_defaults() {
        let json = r#"{ "settings": { "manual_level": "medium" } }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        let settings = config.settings.resolve(DeviceClass::Mobile).unwrap();
        assert_eq!(settings.manual_level, QualityLevel::Medium);
        assert_eq!(settings.target_fps.get(), 30);
        assert!(settings.aggressive);

        let untouched = RuntimeConfig::default().settings.resolve(DeviceClass::Tablet).unwrap();
        assert_eq!(untouched, QualitySettings::for_device(DeviceClass::Tablet));
    }

    #[test]
    fn test_empty_asset_url_is_rejected_on_resolve() {
        let json = r#"{ "settings": { "asset_url": "" } }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.settings.resolve(DeviceClass::Desktop),
            Err(ConfigError::EmptyAssetUrl)
        );
    }

    #[test]
    fn test_out_of_range_target_is_rejected() {
        let json = r#"{ "settings": { "target_fps": 500 } }"#;
        assert!(serde_json::from_str::<RuntimeConfig>(json).is_err());
    }
}
