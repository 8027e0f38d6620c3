//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default session settings (phase durations, extreme rounds)
//! - Composer target size
//! - Streak and points rules
//! - Live cue phrases and timing
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::session::SessionSettings;

/// Composer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    #[serde(default = "default_target_exercise_count")]
    pub target_exercise_count: usize,
}

/// Streak and points rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRules {
    /// Largest gap between two sessions that still continues a streak.
    #[serde(default = "default_max_gap_days")]
    pub max_gap_days: i64,
    #[serde(default = "default_points_per_session")]
    pub points_per_session: u32,
    /// Awarded for every session that continues a streak.
    #[serde(default = "default_streak_bonus")]
    pub streak_bonus: u32,
}

/// Spoken phrases. Defaults match the German-language app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrases {
    #[serde(default = "default_extreme_phrase")]
    pub extreme: String,
    /// Prepended to the upcoming exercise name during rest.
    #[serde(default = "default_next_prefix")]
    pub next_prefix: String,
    #[serde(default = "default_finished_phrase")]
    pub finished: String,
}

/// Live engine cue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    /// Gap between "Extreme!" and the exercise name.
    #[serde(default = "default_extreme_name_delay_ms")]
    pub extreme_name_delay_ms: u64,
    #[serde(default)]
    pub phrases: Phrases,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store owner all documents are filed under.
    #[serde(default = "default_owner_id")]
    pub owner_id: String,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub composer: ComposerConfig,
    #[serde(default)]
    pub streaks: StreakRules,
    #[serde(default)]
    pub cues: CueConfig,
}

// Default functions
fn default_owner_id() -> String {
    "local".into()
}
fn default_target_exercise_count() -> usize {
    25
}
fn default_max_gap_days() -> i64 {
    7
}
fn default_points_per_session() -> u32 {
    10
}
fn default_streak_bonus() -> u32 {
    5
}
fn default_countdown_secs() -> u32 {
    3
}
fn default_extreme_name_delay_ms() -> u64 {
    1200
}
fn default_extreme_phrase() -> String {
    "Extreme!".into()
}
fn default_next_prefix() -> String {
    "Nächste Übung: ".into()
}
fn default_finished_phrase() -> String {
    "Fertig! Gute Arbeit!".into()
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            target_exercise_count: default_target_exercise_count(),
        }
    }
}

impl Default for StreakRules {
    fn default() -> Self {
        Self {
            max_gap_days: default_max_gap_days(),
            points_per_session: default_points_per_session(),
            streak_bonus: default_streak_bonus(),
        }
    }
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            extreme: default_extreme_phrase(),
            next_prefix: default_next_prefix(),
            finished: default_finished_phrase(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            countdown_secs: default_countdown_secs(),
            extreme_name_delay_ms: default_extreme_name_delay_ms(),
            phrases: Phrases::default(),
        }
    }
}

fn check_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("{value} is outside {min}..={max}"),
        });
    }
    Ok(())
}

impl ComposerConfig {
    pub const TARGET_RANGE: (usize, usize) = (1, 100);

    pub fn validate(&self) -> Result<(), ValidationError> {
        let (min, max) = Self::TARGET_RANGE;
        check_range("composer.target_exercise_count", self.target_exercise_count, min, max)
    }
}

impl StreakRules {
    pub const MAX_GAP_DAYS_RANGE: (i64, i64) = (1, 365);

    pub fn validate(&self) -> Result<(), ValidationError> {
        let (min, max) = Self::MAX_GAP_DAYS_RANGE;
        check_range("streaks.max_gap_days", self.max_gap_days, min, max)
    }
}

impl CueConfig {
    pub const COUNTDOWN_RANGE: (u32, u32) = (0, 10);
    pub const NAME_DELAY_RANGE: (u64, u64) = (0, 10_000);

    pub fn validate(&self) -> Result<(), ValidationError> {
        let (min, max) = Self::COUNTDOWN_RANGE;
        check_range("cues.countdown_secs", self.countdown_secs, min, max)?;
        let (min, max) = Self::NAME_DELAY_RANGE;
        check_range("cues.extreme_name_delay_ms", self.extreme_name_delay_ms, min, max)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner_id: default_owner_id(),
            session: SessionSettings::default(),
            composer: ComposerConfig::default(),
            streaks: StreakRules::default(),
            cues: CueConfig::default(),
        }
    }
}

impl Config {
    /// Range-check every section that feeds the engines.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.session.validate()?;
        self.composer.validate()?;
        self.streaks.validate()?;
        self.cues.validate()
    }

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
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
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

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the default there when absent.
    /// A file with out-of-range values is rejected.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate().map_err(|e| load_failed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a value by dot-separated key without persisting.
    ///
    /// The updated config is range-checked as a whole; on any error it is
    /// left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(|e| invalid(e.to_string()))?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            Self::default()
        })
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
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[streaks]\nmax_gap_days = 3\n").unwrap();
        assert_eq!(parsed.streaks.max_gap_days, 3);
        assert_eq!(parsed.streaks.points_per_session, 10);
        assert_eq!(parsed.session.exercise_duration_sec, 40);
        assert_eq!(parsed.cues.extreme_name_delay_ms, 1200);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.restDurationSec").as_deref(), Some("5"));
        assert_eq!(cfg.get("cues.phrases.extreme").as_deref(), Some("Extreme!"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("session.extremeCount", "4").unwrap();
        assert_eq!(cfg.session.extreme_count, 4);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("session.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_out_of_range_setting() {
        let mut cfg = Config::default();
        let result = cfg.apply("session.restDurationSec", "99");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.session.rest_duration_sec, 5);
    }

    #[test]
    fn apply_rejects_oversized_streak_gap() {
        let mut cfg = Config::default();
        let result = cfg.apply("streaks.max_gap_days", "200000000000");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert!(cfg.apply("streaks.max_gap_days", "0").is_err());
        assert_eq!(cfg.streaks.max_gap_days, 7);
        cfg.apply("streaks.max_gap_days", "14").unwrap();
        assert_eq!(cfg.streaks.max_gap_days, 14);
    }

    #[test]
    fn apply_rejects_unbounded_cue_timing() {
        let mut cfg = Config::default();
        assert!(cfg
            .apply("cues.extreme_name_delay_ms", &u64::MAX.to_string())
            .is_err());
        assert!(cfg.apply("cues.countdown_secs", "600").is_err());
        assert_eq!(cfg.cues, CueConfig::default());
        cfg.apply("cues.extreme_name_delay_ms", "800").unwrap();
        assert_eq!(cfg.cues.extreme_name_delay_ms, 800);
    }

    #[test]
    fn load_from_rejects_hand_edited_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nexerciseDurationSec = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));

        std::fs::write(&path, "[streaks]\nmax_gap_days = 99999999999\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("composer.target_exercise_count", "lots").is_err());
    }

    #[test]
    fn load_from_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("owner_id", "gym").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().owner_id, "gym");
    }
}
