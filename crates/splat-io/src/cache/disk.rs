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
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk cache laid out as `<root>/<generation>/<key>`.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    /// Opens (and creates if needed) a cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, generation: &str, key: &str) -> Result<PathBuf, FetchError> {
        Ok(self.generation_dir(generation)?.join(checked(key)?))
    }

    fn generation_dir(&self, generation: &str) -> Result<PathBuf, FetchError> {
        Ok(self.root.join(checked(generation)?))
    }
}

/// Rejects names that would escape or alias the cache directory.
fn checked(name: &str) -> Result<&str, FetchError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.ends_with(".tmp");
    if invalid {
        return Err(FetchError::InvalidName(name.to_string()));
    }
    Ok(name)
}

impl ResponseCache for DiskCache {
    fn get(&self, generation: &str, key: &str) -> Result<Option<Vec<u8>>, FetchError> {
        match fs::read(self.entry_path(generation, key)?) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, generation: &str, key: &str, body: &[u8]) -> Result<(), FetchError> {
        let path = self.entry_path(generation, key)?;
        fs::create_dir_all(self.generation_dir(generation)?)?;

        // Write-then-rename so readers never see a partial body.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        log::trace!("Cached {} bytes at {}", body.len(), path.display());
        Ok(())
    }

    fn generations(&self) -> Result<Vec<String>, FetchError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_generation(&self, generation: &str) -> Result<bool, FetchError> {
        match fs::remove_dir_all(self.generation_dir(generation)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_roundtrip_on_disk() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        assert_eq!(cache.get("v1", "abc").unwrap(), None);
        cache.put("v1", "abc", b"splats").unwrap();
        assert_eq!(cache.get("v1", "abc").unwrap(), Some(b"splats".to_vec()));
        assert!(dir.path().join("v1").join("abc").is_file());
        assert!(!dir.path().join("v1").join("abc.tmp").exists());
    }

    #[test]
    fn test_generations_are_listed_and_deleted() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();
        cache.put("v1", "a", b"1").unwrap();
        cache.put("v2", "a", b"2").unwrap();
        // Stray files in the root are not generations.
        fs::write(dir.path().join("README"), b"x").unwrap();

        assert_eq!(cache.generations().unwrap(), vec!["v1", "v2"]);
        assert!(cache.delete_generation("v1").unwrap());
        assert!(!cache.delete_generation("v1").unwrap());
        assert_eq!(cache.generations().unwrap(), vec!["v2"]);
        assert_eq!(cache.get("v2", "a").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_path_escapes_are_rejected() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path().join("cache")).unwrap();
        assert!(matches!(
            cache.put("..", "a", b"x"),
            Err(FetchError::InvalidName(_))
        ));
        assert!(matches!(
            cache.get("v1", "../../etc"),
            Err(FetchError::InvalidName(_))
        ));
        assert!(cache.delete_generation("").is_err());
    }
}
