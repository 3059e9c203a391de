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

//! HTTP client abstraction.

use super::{AssetRequest, AssetResponse, ResponseSource};
use crate::error::FetchError;
use std::time::Duration;

/// Trait for HTTP client operations.
///
/// Any status code is a successful exchange; only failures to obtain a
/// response at all are errors.
pub trait HttpClient: Send + Sync {
    /// Performs `request` and returns the response, whatever its status.
    fn send(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError>;
}

/// Blocking HTTP client backed by reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with a 30 second timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| FetchError::transport(&request.url, e))?;

        let response = self
            .client
            .request(method, &request.url)
            .send()
            .map_err(|e| FetchError::transport(&request.url, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| FetchError::transport(&request.url, e))?;

        Ok(AssetResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
            source: ResponseSource::Network,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(ReqwestClient::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_invalid_method_is_a_transport_error() {
        let client = ReqwestClient::new().unwrap();
        let request = AssetRequest::new("BAD METHOD", "http://127.0.0.1:9/");
        assert!(matches!(
            client.send(&request),
            Err(FetchError::Transport { .. })
        ));
    }
}
