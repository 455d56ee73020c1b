//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PLANNER_API_URL` - Task store base URL (default: `http://localhost:5000`)
//! - `PLANNER_SNAPSHOT_PATH` - Snapshot file (default: `<data dir>/daily-planner/snapshot.json`)
//! - `PLANNER_CACHE_MAX_AGE_SECS` - Age after which the snapshot is refetched (default: 300)
//! - `PLANNER_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Planner client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task store service
    pub api_url: Url,
    /// Where the last fetched task set is mirrored
    pub snapshot_path: PathBuf,
    /// Snapshots older than this are refetched on open
    pub cache_max_age: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            snapshot_path: default_snapshot_path(),
            cache_max_age: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match var("PLANNER_API_URL").filter(|raw| !raw.trim().is_empty()) {
            None => defaults.api_url,
            Some(raw) => Url::parse(raw.trim()).map_err(|e| {
                ConfigError::InvalidEnvVar("PLANNER_API_URL".to_string(), e.to_string())
            })?,
        };

        let snapshot_path = var("PLANNER_SNAPSHOT_PATH")
            .filter(|raw| !raw.trim().is_empty())
            .map_or(defaults.snapshot_path, PathBuf::from);

        Ok(Self {
            api_url,
            snapshot_path,
            cache_max_age: secs_or(&var, "PLANNER_CACHE_MAX_AGE_SECS", defaults.cache_max_age)?,
            request_timeout: secs_or(
                &var,
                "PLANNER_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            )?,
        })
    }
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

/// `<data dir>/daily-planner/snapshot.json`, or the working directory when
/// the platform has no data directory.
fn default_snapshot_path() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from("daily-planner-snapshot.json"),
        |dirs| dirs.data_dir().join("daily-planner").join("snapshot.json"),
    )
}

fn secs_or(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/");
        assert!(config.snapshot_path.ends_with("snapshot.json"));
        assert_eq!(config.cache_max_age, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PLANNER_API_URL", "https://plan.example.org/api"),
            ("PLANNER_SNAPSHOT_PATH", "/tmp/planner.json"),
            ("PLANNER_CACHE_MAX_AGE_SECS", "0"),
            ("PLANNER_REQUEST_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://plan.example.org/api");
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/planner.json"));
        assert_eq!(config.cache_max_age, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PLANNER_API_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "PLANNER_API_URL"
        ));
        assert!(load(&[("PLANNER_CACHE_MAX_AGE_SECS", "-1")]).is_err());
    }
}
