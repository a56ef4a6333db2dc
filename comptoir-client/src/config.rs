//! Client configuration

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Configuration for the hosted backend
///
/// # Environment variables
///
/// All values can be supplied through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BACKEND_URL | http://localhost:54321 | Backend project base URL |
/// | BACKEND_ANON_KEY | (empty) | Public API key |
/// | STORAGE_BUCKET | boutique-images | Object-storage bucket |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP request timeout |
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL (e.g. "https://xyz.example.co")
    pub base_url: String,
    /// Public API key, sent as `apikey` and as the bearer fallback
    pub api_key: String,
    /// Object-storage bucket for catalog images
    pub bucket: String,
    /// Schema served by the query API
    pub schema: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: "boutique-images".to_string(),
            schema: "public".to_string(),
            timeout: 30,
        }
    }

    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:54321".into());
        let api_key = std::env::var("BACKEND_ANON_KEY").unwrap_or_default();
        let mut config = Self::new(base_url, api_key);
        if let Ok(bucket) = std::env::var("STORAGE_BUCKET") {
            config.bucket = bucket;
        }
        if let Some(timeout) = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        config
    }

    /// Set the storage bucket
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Query API endpoint for a table.
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Object endpoint for a storage path.
    pub fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Public download URL for a stored object.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Auth service endpoint.
    pub fn auth_url(&self, action: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, action)
    }

    /// Websocket endpoint of the realtime feed, derived from the base URL.
    pub fn realtime_url(&self) -> ClientResult<String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidResponse(format!("invalid base URL: {e}")))?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::InvalidResponse("invalid base URL scheme".into()))?;
        url.set_path("/realtime/v1/websocket");
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("vsn", "1.0.0");
        Ok(url.to_string())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new("http://localhost:54321", "")
    }
}
