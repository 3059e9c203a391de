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

//! Heuristic GPU tier classification.
//!
//! The classification is best-effort: it pattern-matches the adapter's renderer
//! string and looks at the maximum texture size. A false negative only costs
//! visual quality, since the controller will climb the ladder if there is
//! headroom.

use splat_core::platform::{GpuClassifier, GpuTier, GraphicsInfo};

/// Renderer substrings that indicate a high-end GPU.
const HIGH_END_MARKERS: &[&str] = &["RTX", "GTX 16", "GTX 20", "RX 6", "RX 7", "M1", "M2"];
/// Renderer substrings that indicate a mid-range GPU.
const MID_RANGE_MARKERS: &[&str] = &["GTX", "RX", "Iris"];
/// Texture size at or above which an adapter is considered high-end.
const HIGH_END_TEXTURE_SIZE: u32 = 16384;
/// Texture size at or above which an adapter is considered mid-range.
const MID_RANGE_TEXTURE_SIZE: u32 = 8192;

/// Default [`GpuClassifier`] based on renderer markers and texture limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGpuClassifier;

impl HeuristicGpuClassifier {
    fn matches_any(renderer: &str, markers: &[&str]) -> bool {
        markers.iter().any(|marker| renderer.contains(marker))
    }
}

impl GpuClassifier for HeuristicGpuClassifier {
    fn classify(&self, info: Option<&GraphicsInfo>) -> GpuTier {
        let Some(info) = info else {
            return GpuTier::Low;
        };

        if Self::matches_any(&info.renderer, HIGH_END_MARKERS)
            || info.max_texture_size >= HIGH_END_TEXTURE_SIZE
        {
            return GpuTier::High;
        }

        if Self::matches_any(&info.renderer, MID_RANGE_MARKERS)
            || info.max_texture_size >= MID_RANGE_TEXTURE_SIZE
        {
            return GpuTier::Medium;
        }

        GpuTier::Low
    }
}
