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

// Splat Runtime
// Headless viewer session: profiles the host, optionally downloads the scene,
// then drives the quality controller from a simulated renderer.
//
// Usage: splat-runtime [config.json]

mod config;
mod renderer;

use anyhow::{Context, Result};
use config::{AssetConfig, RuntimeConfig};
use renderer::SimulatedRenderer;
use splat_control::{CapabilityProfiler, QualityService, QualityServiceConfig};
use splat_infra::NativeCapabilitySource;
use splat_io::{AssetRequest, CacheFirstFetcher, DiskCache, ReqwestClient};
use std::path::PathBuf;
use std::time::Duration;

/// Size of one record in the `.splat` scene format.
const SPLAT_RECORD_BYTES: usize = 32;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => RuntimeConfig::load(&path)?,
        None => RuntimeConfig::default(),
    };

    let mut source = NativeCapabilitySource::new();
    if let Some(identifier) = &config.device.identifier {
        source = source.with_identifier(identifier.clone());
    }
    if let Some(density) = config.device.pixel_density {
        source = source.with_pixel_density(density);
    }
    if config.device.skip_gpu_probe {
        source = source.without_graphics();
    }
    let profile = CapabilityProfiler::new(source).profile();

    let settings = config.settings.resolve(profile.class)?;

    let mut renderer = SimulatedRenderer::new(config.simulation.clone());
    if config.assets.fetch {
        if let Some(splats) = fetch_scene(&config.assets, &settings.asset_url)? {
            renderer.set_scene_splats(splats);
        }
    }

    let mut service =
        QualityService::new(profile, settings, renderer, QualityServiceConfig::default())?;
    run_session(&mut service, &config)
}

/// Prepares the cache and downloads the scene. Returns its splat count when
/// the download succeeded.
fn fetch_scene(assets: &AssetConfig, url: &str) -> Result<Option<u32>> {
    let client = ReqwestClient::with_timeout(Duration::from_secs(assets.timeout_secs))?;
    let cache = DiskCache::open(assets.cache_dir.clone())
        .with_context(|| format!("Failed to open cache at {}", assets.cache_dir.display()))?;
    let fetcher = CacheFirstFetcher::new(client, cache);

    fetcher.activate();
    if !assets.precache.is_empty() {
        fetcher.install(assets.precache.as_slice());
    }

    let response = fetcher.fetch(&AssetRequest::get(url))?;
    if response.status != 200 {
        log::warn!(
            "Scene unavailable ({} {}), using the configured scene size.",
            response.status,
            response.status_text
        );
        return Ok(None);
    }

    let splats = u32::try_from(response.body.len() / SPLAT_RECORD_BYTES).unwrap_or(u32::MAX);
    log::info!(
        "Scene loaded from {:?}: {} bytes, {} splats.",
        response.source,
        response.body.len(),
        splats
    );
    Ok(Some(splats))
}

/// Runs the frame loop on a virtual clock and logs the outcome.
fn run_session(service: &mut QualityService<SimulatedRenderer>, config: &RuntimeConfig) -> Result<()> {
    let sim = &config.simulation;
    let interval = Duration::from_millis(sim.event_interval_ms.max(1));
    let duration = Duration::from_secs(sim.duration_secs);
    let overlay_interval = Duration::from_secs(sim.overlay_interval_secs.max(1));
    let transitions = service.subscribe();

    let mut now = Duration::ZERO;
    let mut next_overlay = overlay_interval;
    while now <= duration {
        let event = service.sink_mut().measure(now);
        service.on_performance_event(event, now);

        if service.settings().debug_overlay && now >= next_overlay {
            let snapshot = service.snapshot();
            let (w, h) = snapshot.resolution(sim.viewport_width, sim.viewport_height);
            log::info!("[{:>6.2}s] {} -> {}x{}", now.as_secs_f32(), snapshot, w, h);
            next_overlay += overlay_interval;
        }
        now += interval;
    }

    let events: Vec<_> = transitions.try_iter().collect();
    let downgrades = events.iter().filter(|t| t.is_downgrade()).count();
    for transition in &events {
        log::debug!("[{:>6.2}s] {}", transition.at.as_secs_f32(), transition);
    }

    let snapshot = service.snapshot();
    log::info!(
        "Session finished after {}s: {} transition(s) ({} down, {} up), {} preset(s) applied.",
        sim.duration_secs,
        events.len(),
        downgrades,
        events.len() - downgrades,
        service.sink().preset_changes()
    );
    log::info!("Final state: {}", snapshot);
    Ok(())
}
