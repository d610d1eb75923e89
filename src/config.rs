//! Client configuration
//!
//! Where the analysis service lives and how to authenticate against it.
//! Values come from the environment (optionally a `.env` file) and can be
//! overridden by command-line flags.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "SHADOWSYNC_API_URL";
pub const ENV_TOKEN: &str = "SHADOWSYNC_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "SHADOWSYNC_TIMEOUT_SECS";

/// Analysis client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the analysis service
    pub api_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout; `None` waits as long as the service takes
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read(ENV_API_URL) {
            config.api_url = url.trim().to_string();
        }
        config.token = read(ENV_TOKEN).map(|t| t.trim().to_string());
        config.request_timeout_secs = match read(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}: {}", ENV_TIMEOUT_SECS, raw);
                    None
                }
            },
            None => None,
        };

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn test_reads_values() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://api.example.com/"),
            (ENV_TOKEN, " abc "),
            (ENV_TIMEOUT_SECS, "90"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_url, "https://api.example.com/");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, Some(90));
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = ClientConfig::from_lookup(|k| {
            (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"apiUrl":"http://10.0.0.2:8000"}"#).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
        assert_eq!(config.token, None);
    }
}
