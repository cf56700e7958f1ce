//! Startup configuration read from the environment (and `.env`)

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CHART_DIR: &str = "charts";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Market-data API settings, fixed for the whole session
#[derive(Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Send the key as the `x_cg_demo_api_key` query parameter instead of a header
    pub use_demo_key: bool,
}

// Keeps the key out of logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("use_demo_key", &self.use_demo_key)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chart_output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("COINGECKO_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "COINGECKO_BASE_URL",
                reason: format!("must start with http:// or https://, got '{}'", base_url),
            });
        }

        let api_key = lookup("COINGECKO_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("COINGECKO_API_KEY"))?;

        let use_demo_key = match lookup("COINGECKO_USE_DEMO_KEY") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "COINGECKO_USE_DEMO_KEY",
                reason: format!("expected true/false, got '{}'", raw),
            })?,
            None => true,
        };

        let chart_output_dir = lookup("CHART_OUTPUT_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_DIR));

        Ok(AppConfig {
            api: ApiConfig {
                base_url,
                api_key,
                use_demo_key,
            },
            chart_output_dir,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
