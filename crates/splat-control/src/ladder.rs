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

//! Device-specific preset ladders.
//!
//! | Profile | potato | low | medium | high | ultra |
//! |---|---|---|---|---|---|
//! | Mobile | 0.3 / 0.5M | 0.4 / 1M | ≤0.6 / 1.5M | ≤0.8 / 2M | ≤1.0 / 3M |
//! | Tablet | 0.6 / 1M | 0.8 / 2M | 1.0 / 4M | ≤1.2 / 6M AA | ≤1.5 / 8M AA |
//! | Desktop, high GPU | 0.6 / 5M | 0.8 / 10M | 1.0 / 20M AA | ≤1.5 / 30M AA+S | ≤2.0 / 50M AA+S |
//! | Desktop, medium GPU | 0.4 / 2M | 0.6 / 5M | 0.8 / 10M | 1.0 / 15M AA | ≤1.5 / 20M AA |
//! | Desktop, low GPU | 0.3 / 1M | 0.4 / 3M | 0.6 / 5M | 0.8 / 8M | 1.0 / 10M |
//!
//! `≤x` caps are additionally clamped to the display's pixel density.

use splat_core::platform::{DeviceClass, DeviceProfile, GpuTier};
use splat_core::quality::{QualityLadder, QualityPreset};

const M: u32 = 1_000_000;

/// Builds the five presets for `profile`.
///
/// Pure and deterministic. Clamping pixel-ratio caps to the display density
/// can push a rung below the one beneath it on low-density displays; such
/// rungs are raised to the previous rung's limits so the ladder stays
/// monotonic.
pub fn build_ladder(profile: &DeviceProfile) -> QualityLadder {
    let dpr = profile.pixel_density;
    let cap = |max: f32| max.min(dpr);

    let presets = match (profile.class, profile.gpu_tier) {
        (DeviceClass::Mobile, _) => [
            QualityPreset::new(0.3, M / 2),
            QualityPreset::new(0.4, M),
            QualityPreset::new(cap(0.6), 3 * M / 2),
            QualityPreset::new(cap(0.8), 2 * M),
            QualityPreset::new(cap(1.0), 3 * M),
        ],
        (DeviceClass::Tablet, _) => [
            QualityPreset::new(0.6, M),
            QualityPreset::new(0.8, 2 * M),
            QualityPreset::new(1.0, 4 * M),
            QualityPreset::new(cap(1.2), 6 * M).with_antialias(true),
            QualityPreset::new(cap(1.5), 8 * M).with_antialias(true),
        ],
        (DeviceClass::Desktop, GpuTier::High) => [
            QualityPreset::new(0.6, 5 * M),
            QualityPreset::new(0.8, 10 * M),
            QualityPreset::new(1.0, 20 * M).with_antialias(true),
            QualityPreset::new(cap(1.5), 30 * M)
                .with_antialias(true)
                .with_shadows(true),
            QualityPreset::new(cap(2.0), 50 * M)
                .with_antialias(true)
                .with_shadows(true),
        ],
        (DeviceClass::Desktop, GpuTier::Medium) => [
            QualityPreset::new(0.4, 2 * M),
            QualityPreset::new(0.6, 5 * M),
            QualityPreset::new(0.8, 10 * M),
            QualityPreset::new(1.0, 15 * M).with_antialias(true),
            QualityPreset::new(cap(1.5), 20 * M).with_antialias(true),
        ],
        (DeviceClass::Desktop, GpuTier::Low) => [
            QualityPreset::new(0.3, M),
            QualityPreset::new(0.4, 3 * M),
            QualityPreset::new(0.6, 5 * M),
            QualityPreset::new(0.8, 8 * M),
            QualityPreset::new(1.0, 10 * M),
        ],
    };

    let mut ladder = QualityLadder::from_presets(presets);
    if let Err(violation) = ladder.validate() {
        let repaired = ladder.enforce_monotonic();
        log::warn!("Ladder: {violation}. Raised {repaired} preset(s) to keep it monotonic.");
    }
    ladder
}

#[cfg(test)]
mod tests {
    use super::*;
    use splat_core::quality::QualityLevel;

    fn profile(class: DeviceClass, gpu_tier: GpuTier, pixel_density: f32) -> DeviceProfile {
        DeviceProfile {
            class,
            gpu_tier,
            pixel_density,
            ..Default::default()
        }
    }

    fn all_profiles() -> Vec<DeviceProfile> {
        let mut out = Vec::new();
        for class in [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop] {
            for tier in [GpuTier::Low, GpuTier::Medium, GpuTier::High] {
                for dpr in [0.25, 0.5, 0.75, 1.0, 1.25, 2.0, 3.0] {
                    out.push(profile(class, tier, dpr));
                }
            }
        }
        out
    }

    #[test]
    fn test_every_ladder_is_monotonic() {
        for p in all_profiles() {
            let ladder = build_ladder(&p);
            assert!(
                ladder.validate().is_ok(),
                "ladder for {:?}/{:?} at dpr {} is not monotonic",
                p.class,
                p.gpu_tier,
                p.pixel_density
            );
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let p = profile(DeviceClass::Desktop, GpuTier::Medium, 2.0);
        assert_eq!(build_ladder(&p), build_ladder(&p));
    }

    #[test]
    fn test_desktop_high_values() {
        let ladder = build_ladder(&profile(DeviceClass::Desktop, GpuTier::High, 2.0));
        let ultra = ladder.get(QualityLevel::Ultra);
        assert_eq!(ultra.max_pixel_ratio, 2.0);
        assert_eq!(ultra.max_splats, 50_000_000);
        assert!(ultra.antialias && ultra.shadows);

        let medium = ladder.get(QualityLevel::Medium);
        assert!(medium.antialias);
        assert!(!medium.shadows);

        let potato = ladder.get(QualityLevel::Potato);
        assert_eq!(potato.max_splats, 5_000_000);
        assert!(!potato.antialias);
    }

    #[test]
    fn test_dpr_caps_follow_display_density() {
        let ladder = build_ladder(&profile(DeviceClass::Desktop, GpuTier::High, 1.0));
        assert_eq!(ladder.get(QualityLevel::High).max_pixel_ratio, 1.0);
        assert_eq!(ladder.get(QualityLevel::Ultra).max_pixel_ratio, 1.0);

        let mobile = build_ladder(&profile(DeviceClass::Mobile, GpuTier::High, 3.0));
        assert_eq!(mobile.get(QualityLevel::Ultra).max_pixel_ratio, 1.0);
        assert_eq!(mobile.get(QualityLevel::Medium).max_pixel_ratio, 0.6);
    }

    #[test]
    fn test_low_density_display_is_repaired() {
        // Tablet high/ultra caps fall to 0.5, below the fixed 1.0 medium rung.
        let ladder = build_ladder(&profile(DeviceClass::Tablet, GpuTier::Low, 0.5));
        assert_eq!(ladder.get(QualityLevel::High).max_pixel_ratio, 1.0);
        assert_eq!(ladder.get(QualityLevel::Ultra).max_pixel_ratio, 1.0);
        assert_eq!(ladder.get(QualityLevel::Ultra).max_splats, 8_000_000);
    }

    #[test]
    fn test_feature_flags_by_class() {
        let mobile = build_ladder(&profile(DeviceClass::Mobile, GpuTier::High, 3.0));
        assert!(mobile.iter().all(|(_, p)| !p.antialias && !p.shadows));

        let tablet = build_ladder(&profile(DeviceClass::Tablet, GpuTier::High, 2.0));
        assert!(tablet.get(QualityLevel::Ultra).antialias);
        assert!(!tablet.get(QualityLevel::Medium).antialias);
        assert!(tablet.iter().all(|(_, p)| !p.shadows));

        let low = build_ladder(&profile(DeviceClass::Desktop, GpuTier::Low, 2.0));
        assert!(low.iter().all(|(_, p)| !p.antialias && !p.shadows));
    }

    #[test]
    fn test_mobile_ignores_gpu_tier() {
        let a = build_ladder(&profile(DeviceClass::Mobile, GpuTier::Low, 2.0));
        let b = build_ladder(&profile(DeviceClass::Mobile, GpuTier::High, 2.0));
        assert_eq!(a, b);
    }
}
