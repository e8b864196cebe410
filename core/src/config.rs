//! Layered configuration loader.
//!
//! Three layers with precedence, later overriding earlier:
//! 1. hardcoded defaults
//! 2. `$TRACKER_HOME/config.toml`
//! 3. `TRACKER_*` environment variables

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Overrides the tracker home directory (default `~/.tracker`).
pub const HOME_ENV: &str = "TRACKER_HOME";
/// Overrides the backend origin.
pub const BACKEND_URL_ENV: &str = "TRACKER_BACKEND_URL";

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_FITNESS_RANGE_DAYS: u32 = 90;
const DEFAULT_TRIP_HISTORY_LIMIT: u32 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error loading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("could not determine a home directory")]
    NoHome,
}

/// Raw shape of `config.toml`. Every field is optional so the file can set
/// only what it wants to override.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigToml {
    backend_url: Option<String>,
    fitness_range_days: Option<u32>,
    trip_history_limit: Option<u32>,
}

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Home directory holding `config.toml`, `auth.json`, and logs.
    pub tracker_home: PathBuf,
    /// Explicit backend origin; `None` falls back to the default local
    /// origin at client construction.
    pub backend_url: Option<String>,
    /// Trailing window for the initial fitness range.
    pub fitness_range_days: u32,
    /// Page size for the trip history fetch.
    pub trip_history_limit: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads with an injectable environment, so the layering is testable
    /// without mutating process globals.
    pub fn load_with_env(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tracker_home = match env(HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => dirs::home_dir().ok_or(ConfigError::NoHome)?.join(".tracker"),
        };

        let file = Self::read_config_file(&tracker_home)?;

        let backend_url = env(BACKEND_URL_ENV)
            .filter(|v| !v.is_empty())
            .or(file.backend_url);

        Ok(Self {
            tracker_home,
            backend_url,
            fitness_range_days: file
                .fitness_range_days
                .unwrap_or(DEFAULT_FITNESS_RANGE_DAYS),
            trip_history_limit: file
                .trip_history_limit
                .unwrap_or(DEFAULT_TRIP_HISTORY_LIMIT),
        })
    }

    fn read_config_file(home: &std::path::Path) -> Result<ConfigToml, ConfigError> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ConfigToml::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn env_with_home(home: &TempDir) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| (key == HOME_ENV).then(|| home.path().to_string_lossy().into_owned())
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn defaults_apply_without_config_file() {
        let home = TempDir::new().unwrap();
        let config = Config::load_with_env(env_with_home(&home)).unwrap();
        assert_eq!(config.backend_url, None);
        assert_eq!(config.fitness_range_days, 90);
        assert_eq!(config.trip_history_limit, 25);
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn config_file_overrides_defaults() {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "backend_url = \"http://10.0.0.2:8000\"\nfitness_range_days = 30\n",
        )
        .unwrap();
        let config = Config::load_with_env(env_with_home(&home)).unwrap();
        assert_eq!(
            config.backend_url.as_deref(),
            Some("http://10.0.0.2:8000")
        );
        assert_eq!(config.fitness_range_days, 30);
        assert_eq!(config.trip_history_limit, 25);
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn env_overrides_config_file() {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "backend_url = \"http://10.0.0.2:8000\"\n",
        )
        .unwrap();
        let home_path = home.path().to_string_lossy().into_owned();
        let config = Config::load_with_env(|key| match key {
            HOME_ENV => Some(home_path.clone()),
            BACKEND_URL_ENV => Some("http://10.0.0.3:9000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config.backend_url.as_deref(),
            Some("http://10.0.0.3:9000")
        );
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn malformed_config_file_is_an_error() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "backend_url = [").unwrap();
        assert!(Config::load_with_env(env_with_home(&home)).is_err());
    }
}
