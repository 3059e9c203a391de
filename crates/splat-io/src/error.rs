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

//! Errors of the fetch layer.

use thiserror::Error;

/// Errors that can occur while fetching or caching assets.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Request to {url} failed: {reason}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying failure.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// I/O error in a disk cache.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generation or key that cannot be used as a storage location.
    #[error("Invalid cache name: {0:?}")]
    InvalidName(String),

    /// The cache is unusable, e.g. after a panic while it was locked.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl FetchError {
    /// Shorthand for [`FetchError::Transport`].
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
