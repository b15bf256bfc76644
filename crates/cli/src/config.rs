//! Runtime settings loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `APIZZA_CONFIG_DIR` - Directory for `config.json`, the cache and logs
//!   (default: the platform config directory, e.g. `~/.config/apizza`)
//! - `APIZZA_VENDOR_URL` - Base URL of the ordering API; a path prefix is kept
//!   (default: `https://order.dominos.com`)
//! - `APIZZA_TIMEOUT_SECS` - Per-request timeout in seconds (default: 60)
//! - `APIZZA_LOG` - `tracing` filter directive (default: `warn`)

use std::path::PathBuf;
use std::time::Duration;

use apizza_vendor::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use directories::ProjectDirs;
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";
const CACHE_FILE: &str = "apizza.db";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("could not determine a config directory; set APIZZA_CONFIG_DIR")]
    NoConfigDir,
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid config JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot find {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("no variable given")]
    NoVariable,
    #[error("use '<key>=<value>' format (no spaces), use <key>='-' to set as empty")]
    BadAssignment,
}

/// Where apizza keeps its files and how it reaches the vendor.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub vendor_url: String,
    pub timeout: Duration,
    pub log_filter: String,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or no config directory
    /// can be found.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config_dir = match get_optional_env("APIZZA_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("", "", "apizza")
                .ok_or(ConfigError::NoConfigDir)?
                .config_dir()
                .to_path_buf(),
        };

        let mut settings = Self::in_dir(config_dir);
        if let Some(raw) = get_optional_env("APIZZA_TIMEOUT_SECS") {
            settings.timeout = parse_timeout(&raw)?;
        }
        settings.vendor_url = get_env_or_default("APIZZA_VENDOR_URL", DEFAULT_BASE_URL);
        settings.log_filter = get_env_or_default("APIZZA_LOG", DEFAULT_LOG_FILTER);
        Ok(settings)
    }

    /// Settings rooted at `dir` with every other value defaulted.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: dir.into(),
            vendor_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn cache_file(&self) -> PathBuf {
        self.config_dir.join("cache").join(CACHE_FILE)
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            "APIZZA_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "APIZZA_TIMEOUT_SECS".to_string(),
            e.to_string(),
        )),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_config_dir() {
        let settings = Settings::in_dir("/tmp/apizza-test");
        assert_eq!(settings.config_file(), PathBuf::from("/tmp/apizza-test/config.json"));
        assert_eq!(settings.cache_file(), PathBuf::from("/tmp/apizza-test/cache/apizza.db"));
        assert_eq!(settings.log_dir(), PathBuf::from("/tmp/apizza-test/logs"));
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("5").unwrap(), Duration::from_secs(5));
        assert!(matches!(parse_timeout("0"), Err(ConfigError::InvalidEnvVar(..))));
        assert!(matches!(parse_timeout("soon"), Err(ConfigError::InvalidEnvVar(..))));
    }

    #[test]
    fn test_assignment_error_message() {
        assert_eq!(
            ConfigError::BadAssignment.to_string(),
            "use '<key>=<value>' format (no spaces), use <key>='-' to set as empty"
        );
        assert_eq!(
            ConfigError::UnknownKey("nonExistantKey".to_string()).to_string(),
            "cannot find nonExistantKey"
        );
    }
}
