mod config;

pub use config::{ChartsConfig, Config, DisplayConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/trimtrack[-dev]/` based on TRIMTRACK_ENV.
///
/// Set TRIMTRACK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?.join(".config");

    let env = std::env::var("TRIMTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("trimtrack-dev")
    } else {
        base_dir.join("trimtrack")
    };

    Ok(dir)
}
