//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Seconds between waves when `configure` omits `--interval`.
    pub default_interval_seconds: i64,

    /// Number of lanes when `configure` omits `--lanes`.
    pub default_lane_count: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("default_interval_seconds", &self.default_interval_seconds)
            .field("default_lane_count", &self.default_lane_count)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("startlist.db"),
            default_interval_seconds: 60,
            default_lane_count: 1,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (STARTLIST_*)
        figment = figment.merge(Env::prefixed("STARTLIST_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for startlist.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("startlist"))
}

/// Returns the platform-specific data directory for startlist.
///
/// On Linux: `~/.local/share/startlist`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("startlist"))
}
