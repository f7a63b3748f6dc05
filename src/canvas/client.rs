//! HTTP client for the Canvas REST API.

use super::CanvasApi;
use crate::config::CanvasSettings;
use crate::error::{PuggError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Per-request timeout for Canvas calls (30 seconds).
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum characters of a POST body included in log lines.
const BODY_PREVIEW_LEN: usize = 200;

/// Canvas REST API client with bearer authentication and a fixed timeout.
pub struct CanvasClient {
    http: reqwest::Client,
    base_url: String,
}

impl CanvasClient {
    /// Create a new client from Canvas settings.
    ///
    /// The access token is attached to every request as a default header.
    pub fn new(settings: &CanvasSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|e| PuggError::Config(format!("Invalid Canvas token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CanvasApi for CanvasClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} | params={:?}", url, query);

        let t0 = Instant::now();
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PuggError::CanvasRequest {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        info!("GET {} ({:.2}s)", url, t0.elapsed().as_secs_f64());
        Ok(response.json().await?)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        let preview: String = body.to_string().chars().take(BODY_PREVIEW_LEN).collect();
        debug!("POST {} | payload={}...", url, preview);

        let t0 = Instant::now();
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PuggError::CanvasRequest {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        info!("POST {} ({:.2}s)", url, t0.elapsed().as_secs_f64());
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let settings = CanvasSettings {
            base_url: "https://school.instructure.com/".to_string(),
            token: "abc123".to_string(),
        };
        let client = CanvasClient::new(&settings).unwrap();
        assert_eq!(
            client.url("/api/v1/users/self"),
            "https://school.instructure.com/api/v1/users/self"
        );
    }
}
