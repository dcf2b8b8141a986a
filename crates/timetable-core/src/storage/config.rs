//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Catalog service location and refresh interval
//! - Default filter switches
//! - Timetable grid palette
//!
//! Configuration is stored at `~/.config/timetable/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::filter::FilterCriteria;

/// Where the catalog comes from and how long a fetched copy stays fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minutes before a cached catalog is considered stale.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_min: u32,
}

/// Switches applied when the filter command is run without flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub exclude_conflicting: bool,
    #[serde(default)]
    pub exclude_same_subject: bool,
}

/// Timetable grid rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Colour names handed out to selected offerings by id rank.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_true")]
    pub show_empty: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timetable/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:5000/api".into()
}
fn default_refresh_interval() -> u32 {
    30
}
fn default_true() -> bool {
    true
}
fn default_palette() -> Vec<String> {
    [
        "blue", "purple", "green", "orange", "pink", "indigo", "teal", "rose", "cyan", "amber",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_interval_min: default_refresh_interval(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            show_empty: true,
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
    ) -> std::result::Result<(), ConfigError> {
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Array(_) => {
                        if value.trim_start().starts_with('[') {
                            serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                        } else {
                            // comma-separated shorthand for string lists
                            serde_json::Value::Array(
                                value
                                    .split(',')
                                    .map(|s| serde_json::Value::String(s.trim().to_string()))
                                    .filter(|v| v.as_str().map_or(false, |s| !s.is_empty()))
                                    .collect(),
                            )
                        }
                    }
                    serde_json::Value::Object(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Overwrite the config file with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be saved.
    pub fn reset() -> Result<Self> {
        let cfg = Self::default();
        cfg.save()?;
        Ok(cfg)
    }

    /// Starting criteria for a filter run: no free periods, configured switches.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .excluding_conflicts(self.filter.exclude_conflicting)
            .excluding_same_subject(self.filter.exclude_same_subject)
    }

    /// Palette colour for a rank from [`crate::Selection::color_index`].
    pub fn color_for(&self, rank: usize) -> Option<&str> {
        if self.grid.palette.is_empty() {
            return None;
        }
        Some(self.grid.palette[rank % self.grid.palette.len()].as_str())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
