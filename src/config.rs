//! Backend origin configuration
//!
//! The client talks to a single fixed backend origin. `TARASUL_API_URL` may
//! override it for staging and local development.

use url::Url;

use crate::error::{AppError, AppResult};

/// Production backend origin used when no override is set.
pub const DEFAULT_API_URL: &str = "https://api.tarasul.example.org";

/// Environment variable consulted by [`Config::from_env`].
pub const API_URL_ENV: &str = "TARASUL_API_URL";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend REST origin. All endpoint paths are joined onto this.
    pub api_url: Url,
}

impl Config {
    /// Read configuration from the environment, falling back to the fixed
    /// production origin.
    pub fn from_env() -> AppResult<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(raw) => Self::with_api_url(&raw),
            Err(_) => Self::with_api_url(DEFAULT_API_URL),
        }
    }

    /// Build a configuration for an explicit backend origin.
    pub fn with_api_url(raw: &str) -> AppResult<Self> {
        let api_url = Url::parse(raw)
            .map_err(|e| AppError::Config(format!("invalid API URL {:?}: {}", raw, e)))?;
        Ok(Self { api_url })
    }

    /// Endpoint of the push notification stream, derived from the REST
    /// origin. There is no separate push host.
    pub fn push_url(&self) -> Url {
        let mut url = self.api_url.clone();
        url.set_path("/api/notifications/stream");
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_origin_is_parsed() {
        let config = Config::with_api_url("http://127.0.0.1:9090").unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9090/");
    }

    #[test]
    fn invalid_origin_is_a_config_error() {
        let err = Config::with_api_url("not a url").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn push_url_lives_on_the_api_origin() {
        let config = Config::with_api_url("https://backend.example.org").unwrap();
        assert_eq!(
            config.push_url().as_str(),
            "https://backend.example.org/api/notifications/stream"
        );
    }
}
