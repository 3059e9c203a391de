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

use super::ResponseCache;
use crate::error::FetchError;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

type Generations = BTreeMap<String, HashMap<String, Vec<u8>>>;

/// In-process cache for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    generations: Mutex<Generations>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all generations.
    pub fn len(&self) -> usize {
        self.lock()
            .map(|g| g.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Generations>, FetchError> {
        self.generations
            .lock()
            .map_err(|e| FetchError::CacheUnavailable(e.to_string()))
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, generation: &str, key: &str) -> Result<Option<Vec<u8>>, FetchError> {
        Ok(self
            .lock()?
            .get(generation)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn put(&self, generation: &str, key: &str, body: &[u8]) -> Result<(), FetchError> {
        self.lock()?
            .entry(generation.to_string())
            .or_default()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }

    fn generations(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn delete_generation(&self, generation: &str) -> Result<bool, FetchError> {
        Ok(self.lock()?.remove(generation).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_are_isolated() {
        let cache = MemoryCache::new();
        cache.put("v1", "k", b"old").unwrap();
        cache.put("v2", "k", b"new").unwrap();

        assert_eq!(cache.get("v1", "k").unwrap(), Some(b"old".to_vec()));
        assert_eq!(cache.get("v2", "k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(cache.get("v3", "k").unwrap(), None);
        assert_eq!(cache.len(), 2);

        assert!(cache.delete_generation("v1").unwrap());
        assert_eq!(cache.generations().unwrap(), vec!["v2"]);
        assert_eq!(cache.len(), 1);
    }
}
