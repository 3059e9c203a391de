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

//! Generation-scoped response storage.
//!
//! A cache holds any number of named generations. Each generation maps a
//! request key to the body of a successful response. Bumping the generation
//! name and purging the others is how stale assets are retired.

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

use crate::error::FetchError;

/// Storage for successful responses, grouped by generation.
///
/// Implementations must be `Send + Sync`; all methods take `&self`.
pub trait ResponseCache: Send + Sync {
    /// Looks up the body stored under `key`.
    fn get(&self, generation: &str, key: &str) -> Result<Option<Vec<u8>>, FetchError>;

    /// Stores `body` under `key`, replacing any previous entry.
    fn put(&self, generation: &str, key: &str, body: &[u8]) -> Result<(), FetchError>;

    /// Names of all generations currently present.
    fn generations(&self) -> Result<Vec<String>, FetchError>;

    /// Deletes a generation and everything in it.
    ///
    /// Returns `Ok(false)` if it did not exist.
    fn delete_generation(&self, generation: &str) -> Result<bool, FetchError>;
}

/// Derives the cache key of a request: the BLAKE3 hex digest of its
/// method and URL.
pub fn request_key(method: &str, url: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(method.as_bytes());
    hasher.update(b" ");
    hasher.update(url.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_is_stable_and_distinct() {
        let a = request_key("GET", "https://example.com/scene.splat");
        assert_eq!(a, request_key("GET", "https://example.com/scene.splat"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, request_key("HEAD", "https://example.com/scene.splat"));
        assert_ne!(a, request_key("GET", "https://example.com/other.splat"));
    }
}
