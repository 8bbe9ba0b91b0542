//! TOML-based application configuration.
//!
//! Stores learner preferences including:
//! - Review interval table and fallback delay
//! - Card order seed for reproducible sessions
//! - Reference offset for the daily counter and the heatmap window
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::progress::{
    ReferenceZone, DEFAULT_HEATMAP_DAYS, DEFAULT_REFERENCE_OFFSET_HOURS, MAX_HEATMAP_DAYS,
};
use crate::schedule::{IntervalTable, ReviewClock, DEFAULT_FALLBACK_DAYS, DEFAULT_INTERVAL_DAYS};
use crate::session::QueueBuilder;

/// Review interval configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_days")]
    pub interval_days: Vec<u32>,
    #[serde(default = "default_fallback_days")]
    pub fallback_days: u32,
}

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed shuffle seed. Unset means a fresh random order every session.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

/// Progress tracking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Hours east of UTC where the daily counter rolls over.
    #[serde(default = "default_reference_offset_hours")]
    pub reference_offset_hours: i32,
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

// Default functions
fn default_interval_days() -> Vec<u32> {
    DEFAULT_INTERVAL_DAYS.to_vec()
}
fn default_fallback_days() -> u32 {
    DEFAULT_FALLBACK_DAYS
}
fn default_reference_offset_hours() -> i32 {
    DEFAULT_REFERENCE_OFFSET_HOURS
}
fn default_heatmap_days() -> u32 {
    DEFAULT_HEATMAP_DAYS
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_days: default_interval_days(),
            fallback_days: default_fallback_days(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            reference_offset_hours: default_reference_offset_hours(),
            heatmap_days: default_heatmap_days(),
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
        if key.is_empty() {
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
                    serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                        invalid(format!("cannot parse '{value}' as number"))
                    })?,
                    // Optional fields: "none" clears, anything else must be a number.
                    serde_json::Value::Null => match value {
                        "none" | "null" | "" => serde_json::Value::Null,
                        _ => parse_number(value).ok_or_else(|| {
                            invalid(format!("cannot parse '{value}' as number"))
                        })?,
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value and save to the data directory.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.interval_table()?;
        self.reference_zone()?;
        if !(1..=MAX_HEATMAP_DAYS).contains(&self.progress.heatmap_days) {
            return Err(ConfigError::InvalidValue {
                key: "progress.heatmap_days".into(),
                message: format!("must be between 1 and {MAX_HEATMAP_DAYS}"),
            }
            .into());
        }
        Ok(())
    }

    pub fn interval_table(&self) -> Result<IntervalTable> {
        Ok(IntervalTable::new(
            self.schedule.interval_days.clone(),
            self.schedule.fallback_days,
        )?)
    }

    pub fn review_clock(&self) -> Result<ReviewClock> {
        Ok(ReviewClock::new(self.interval_table()?))
    }

    pub fn queue_builder(&self) -> Result<QueueBuilder> {
        Ok(QueueBuilder::new(self.review_clock()?).with_seed(self.session.shuffle_seed))
    }

    pub fn reference_zone(&self) -> Result<ReferenceZone> {
        Ok(ReferenceZone::new(self.progress.reference_offset_hours)?)
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<i64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        None
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
        assert_eq!(parsed.schedule.interval_days, vec![1, 2, 4, 7, 15]);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[progress]\nreference_offset_hours = 0\n").unwrap();
        assert_eq!(parsed.progress.reference_offset_hours, 0);
        assert_eq!(parsed.progress.heatmap_days, 365);
        assert_eq!(parsed.schedule.fallback_days, 30);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.fallback_days").as_deref(), Some("30"));
        assert_eq!(cfg.get("schedule.interval_days").as_deref(), Some("[1,2,4,7,15]"));
        assert_eq!(cfg.get("session.shuffle_seed").as_deref(), Some("null"));
        assert!(cfg.get("schedule.missing_key").is_none());
    }

    #[test]
    fn apply_updates_numbers_and_arrays() {
        let mut cfg = Config::default();
        cfg.apply("progress.reference_offset_hours", "-5").unwrap();
        cfg.apply("schedule.interval_days", "[1,3,7]").unwrap();
        assert_eq!(cfg.progress.reference_offset_hours, -5);
        assert_eq!(cfg.schedule.interval_days, vec![1, 3, 7]);
    }

    #[test]
    fn apply_sets_and_clears_optional_seed() {
        let mut cfg = Config::default();
        cfg.apply("session.shuffle_seed", "42").unwrap();
        assert_eq!(cfg.session.shuffle_seed, Some(42));
        cfg.apply("session.shuffle_seed", "none").unwrap();
        assert_eq!(cfg.session.shuffle_seed, None);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("schedule.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.apply("", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_table_and_leaves_config_untouched() {
        let mut cfg = Config::default();
        assert!(cfg.apply("schedule.interval_days", "[5,1]").is_err());
        assert!(cfg.apply("schedule.fallback_days", "3").is_err());
        assert!(cfg.apply("progress.reference_offset_hours", "20").is_err());
        assert!(cfg.apply("progress.heatmap_days", "abc").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn heatmap_days_is_capped() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("progress.heatmap_days", "100000000"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(cfg.apply("progress.heatmap_days", "0").is_err());
        assert_eq!(cfg.progress.heatmap_days, DEFAULT_HEATMAP_DAYS);

        cfg.apply("progress.heatmap_days", &MAX_HEATMAP_DAYS.to_string())
            .unwrap();
        assert_eq!(cfg.progress.heatmap_days, MAX_HEATMAP_DAYS);
    }

    #[test]
    fn load_from_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("session.shuffle_seed", "7").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().session.shuffle_seed, Some(7));
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "schedule = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
