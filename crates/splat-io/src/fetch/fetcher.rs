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

//! Cache-first fetch strategy with generation-based retirement.

use super::{AssetRequest, AssetResponse, HttpClient, ResponseSource};
use crate::cache::{request_key, ResponseCache};
use crate::error::FetchError;

/// The cache generation current builds read and write.
pub const CACHE_GENERATION: &str = "splat-cache-v1";

/// Serves GET requests from the cache when possible, otherwise from the
/// network, storing successful responses for later offline use.
pub struct CacheFirstFetcher<H: HttpClient, C: ResponseCache> {
    client: H,
    cache: C,
    generation: String,
}

impl<H: HttpClient, C: ResponseCache> CacheFirstFetcher<H, C> {
    /// Creates a fetcher on the [`CACHE_GENERATION`] generation.
    pub fn new(client: H, cache: C) -> Self {
        Self::with_generation(client, cache, CACHE_GENERATION)
    }

    /// Creates a fetcher on a custom generation.
    pub fn with_generation(client: H, cache: C, generation: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            generation: generation.into(),
        }
    }

    /// The generation this fetcher reads and writes.
    pub fn generation(&self) -> &str {
        &self.generation
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &H {
        &self.client
    }

    /// The underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Downloads and stores every URL ahead of time.
    ///
    /// Failures are logged and skipped. Returns how many URLs were stored.
    pub fn install<S: AsRef<str>>(&self, urls: &[S]) -> usize {
        let mut stored = 0;
        for url in urls {
            let request = AssetRequest::get(url.as_ref());
            match self.client.send(&request) {
                Ok(response) if response.is_cacheable() => {
                    if self.store(&request, &response) {
                        stored += 1;
                    }
                }
                Ok(response) => log::error!(
                    "Precache of {} failed: HTTP {} {}",
                    request.url,
                    response.status,
                    response.status_text
                ),
                Err(e) => log::error!("Precache of {} failed: {}", request.url, e),
            }
        }
        log::info!("Precached {}/{} asset(s).", stored, urls.len());
        stored
    }

    /// Deletes every cache generation other than the current one.
    ///
    /// Returns the names of the deleted generations.
    pub fn activate(&self) -> Vec<String> {
        let generations = match self.cache.generations() {
            Ok(generations) => generations,
            Err(e) => {
                log::error!("Failed to list cache generations: {}", e);
                return Vec::new();
            }
        };

        let mut deleted = Vec::new();
        for generation in generations.into_iter().filter(|g| *g != self.generation) {
            match self.cache.delete_generation(&generation) {
                Ok(_) => {
                    log::info!("Deleting old cache: {}", generation);
                    deleted.push(generation);
                }
                Err(e) => log::error!("Failed to delete cache {}: {}", generation, e),
            }
        }
        deleted
    }

    /// Fetches `request`.
    ///
    /// GET requests never fail: if neither the cache nor the network can
    /// serve them, a synthetic `503` is returned. Other methods go straight
    /// to the network and any transport error is handed back unchanged.
    pub fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        if !request.is_get() {
            return self.client.send(request);
        }

        let key = request_key(&request.method, &request.url);
        match self.cache.get(&self.generation, &key) {
            Ok(Some(body)) => {
                log::info!("Serving from cache: {}", request.url);
                return Ok(AssetResponse {
                    source: ResponseSource::Cache,
                    ..AssetResponse::ok(body)
                });
            }
            Ok(None) => {}
            Err(e) => log::warn!("Cache lookup for {} failed: {}", request.url, e),
        }

        let response = match self.client.send(request) {
            Ok(response) => response,
            Err(e) => {
                log::error!("Fetch failed: {}", e);
                return Ok(AssetResponse::offline());
            }
        };
        if response.is_cacheable() {
            self.store(request, &response);
        }
        Ok(response)
    }

    fn store(&self, request: &AssetRequest, response: &AssetResponse) -> bool {
        let key = request_key(&request.method, &request.url);
        match self.cache.put(&self.generation, &key, &response.body) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to cache {}: {}", request.url, e);
                false
            }
        }
    }
}
