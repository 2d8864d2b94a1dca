//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Display units (metric or imperial)
//! - The UTC offset that defines calendar days for charts and streaks
//! - The default chart view
//!
//! Configuration is stored at `~/.config/trimtrack/config.toml`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::context::CalcContext;
use crate::error::{ConfigError, ValidationError};
use crate::units::UnitSystem;
use crate::window::ReportView;

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub units: UnitSystem,
    /// Minutes east of UTC used for local calendar boundaries.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsConfig {
    #[serde(default)]
    pub default_view: ReportView,
    #[serde(default = "default_true")]
    pub show_projection: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/trimtrack/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            utc_offset_minutes: 0,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            default_view: ReportView::Week,
            show_projection: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.to_string()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or return defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or return defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };

        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.context(Utc::now()).map_err(|e| invalid(e.to_string()))?;

        *self = updated;
        Ok(())
    }

    /// Calculation context at `now` using the configured UTC offset.
    ///
    /// # Errors
    /// Returns an error if the configured offset is out of range.
    pub fn context(&self, now: DateTime<Utc>) -> Result<CalcContext, ValidationError> {
        CalcContext::with_offset_minutes(now, self.display.utc_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.display.units, UnitSystem::Metric);
        assert_eq!(parsed.charts.default_view, ReportView::Week);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[display]\nunits = \"imperial\"\n").unwrap();
        assert_eq!(parsed.display.units, UnitSystem::Imperial);
        assert_eq!(parsed.display.utc_offset_minutes, 0);
        assert!(parsed.charts.show_projection);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.units").as_deref(), Some("metric"));
        assert_eq!(cfg.get("display.utc_offset_minutes").as_deref(), Some("0"));
        assert_eq!(cfg.get("charts.show_projection").as_deref(), Some("true"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_fields() {
        let mut cfg = Config::default();
        cfg.set("display.units", "imperial").unwrap();
        cfg.set("display.utc_offset_minutes", "-300").unwrap();
        cfg.set("charts.default_view", "month").unwrap();
        cfg.set("charts.show_projection", "false").unwrap();

        assert_eq!(cfg.display.units, UnitSystem::Imperial);
        assert_eq!(cfg.display.utc_offset_minutes, -300);
        assert_eq!(cfg.charts.default_view, ReportView::Month);
        assert!(!cfg.charts.show_projection);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("display.nonexistent", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("display", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(cfg.set("display.units", "stone").is_err());
        assert!(cfg.set("charts.show_projection", "maybe").is_err());
        assert!(cfg.set("display.utc_offset_minutes", "2000").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let missing = Config::load_from(&path).unwrap();
        assert_eq!(missing, Config::default());

        let mut cfg = Config::default();
        cfg.set("display.units", "imperial").unwrap();
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "display = 3").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
    }
}
