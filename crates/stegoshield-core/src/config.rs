//! Configuration module
//!
//! Settings for reaching the classification service. Values come from the
//! environment (optionally via a `.env` file) with defaults that match a local
//! development backend.

use std::env;
use std::time::Duration;

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_PREDICT_PATH: &str = "/api/predict";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Classification service client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub predict_path: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load from STEGOSHIELD_API_URL (or API_URL), STEGOSHIELD_PREDICT_PATH and
    /// STEGOSHIELD_TIMEOUT_SECS, falling back to defaults for unset values.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("STEGOSHIELD_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let predict_path = env::var("STEGOSHIELD_PREDICT_PATH")
            .unwrap_or_else(|_| DEFAULT_PREDICT_PATH.to_string());

        let timeout_secs = env::var("STEGOSHIELD_TIMEOUT_SECS")
            .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("STEGOSHIELD_TIMEOUT_SECS must be a valid number"))?;

        let config = Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            predict_path: predict_path.trim().to_string(),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "STEGOSHIELD_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }

        if !self.predict_path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "STEGOSHIELD_PREDICT_PATH must start with '/', got '{}'",
                self.predict_path
            ));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "STEGOSHIELD_TIMEOUT_SECS must be greater than zero"
            ));
        }

        Ok(())
    }

    /// Full URL of the classification endpoint.
    pub fn predict_url(&self) -> String {
        format!(
            "{}{}",
            self.api_url.trim_end_matches('/'),
            self.predict_path
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
