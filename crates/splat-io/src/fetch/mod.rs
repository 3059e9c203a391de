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

//! Asset requests, responses and the cache-first fetcher.

mod fetcher;
mod http;

pub use fetcher::{CacheFirstFetcher, CACHE_GENERATION};
pub use http::{HttpClient, ReqwestClient};

/// A request for a scene asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Absolute URL.
    pub url: String,
}

impl AssetRequest {
    /// A request with an arbitrary method. The method is upper-cased.
    pub fn new(method: &str, url: impl Into<String>) -> Self {
        Self {
            method: method.trim().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    /// A GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// `true` for GET requests, the only ones the cache handles.
    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from the cache without touching the network.
    Cache,
    /// Fetched from the network.
    Network,
    /// Synthesized because the network was unreachable.
    Offline,
}

/// A response handed back to the asset loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase.
    pub status_text: String,
    /// Response body.
    pub body: Vec<u8>,
    /// Where the response came from.
    pub source: ResponseSource,
}

impl AssetResponse {
    /// A `200 OK` network response.
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body,
            source: ResponseSource::Network,
        }
    }

    /// The response returned when neither cache nor network can serve a request.
    pub fn offline() -> Self {
        Self {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: b"Offline or file not available".to_vec(),
            source: ResponseSource::Offline,
        }
    }

    /// `true` for status 200, the only status that is cached.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }
}
