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

//! # Splat IO
//!
//! Offline-capable scene fetching. [`fetch::CacheFirstFetcher`] serves assets
//! from a generation-scoped [`cache::ResponseCache`] and falls back to the
//! network through an [`fetch::HttpClient`].

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod fetch;

pub use cache::{DiskCache, MemoryCache, ResponseCache};
pub use error::FetchError;
pub use fetch::{
    AssetRequest, AssetResponse, CacheFirstFetcher, HttpClient, ReqwestClient, ResponseSource,
    CACHE_GENERATION,
};
