use std::time::Duration;

use crate::error::{Result, StoreError};

pub const URL_ENV: &str = "REMOTE_FILES_URL";
pub const TOKEN_ENV: &str = "REMOTE_FILES_TOKEN";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpDataApi`](crate::http::HttpDataApi)
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server root, e.g. `https://example.org`; `/api/data` is appended
    pub base_url: String,
    /// Bearer token sent with every request when present
    pub token: Option<String>,
    pub user_agent: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            user_agent: format!("remote-file-cache/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from `REMOTE_FILES_URL` and the optional `REMOTE_FILES_TOKEN`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(URL_ENV).map_err(|_| StoreError::InvalidConfig {
            message: format!("{} is not set", URL_ENV),
        })?;

        let mut config = Self::new(base_url);
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(StoreError::InvalidConfig {
                message: format!("base url must be http(s): {}", self.base_url),
            });
        }
        Ok(())
    }

    /// Root of the data API endpoints
    pub(crate) fn api_root(&self) -> String {
        format!("{}/api/data", self.base_url.trim_end_matches('/'))
    }
}
