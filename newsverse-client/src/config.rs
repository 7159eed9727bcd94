//! Client configuration.
//!
//! Environment-driven with sensible local defaults, so an unconfigured
//! client talks to a NewsVerse backend on localhost.

use std::env;
use std::time::Duration;

use newsverse_core::ConfigError;

// ============================================================================
// Defaults
// ============================================================================

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_LOGIN_URL: &str = "http://localhost:8000/login/google";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// ClientConfig
// ============================================================================

/// Connection settings for the remote gateway and the login redirect.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all gateway paths are joined onto. No trailing slash.
    pub api_base_url: String,
    /// External login page users are redirected to when unauthenticated.
    pub login_url: String,
    /// Per-request timeout for gateway calls.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset.
    ///
    /// Recognized variables:
    /// - `NEWSVERSE_API_BASE_URL`
    /// - `NEWSVERSE_LOGIN_URL`
    /// - `NEWSVERSE_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();

        if let Ok(url) = env::var("NEWSVERSE_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = env::var("NEWSVERSE_LOGIN_URL") {
            config.login_url = url;
        }
        if let Ok(secs) = env::var("NEWSVERSE_REQUEST_TIMEOUT_SECS") {
            let secs: u64 =
                secs.parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: "NEWSVERSE_REQUEST_TIMEOUT_SECS".to_string(),
                        value: secs.clone(),
                        reason: "must be a whole number of seconds".to_string(),
                    })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "NEWSVERSE_REQUEST_TIMEOUT_SECS".to_string(),
                    value: secs.to_string(),
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.login_url, "http://localhost:8000/login/google");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
