use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use facetrack_core::shared::constants::{DEFAULT_API_URL, VISIBILITY_LOOKAHEAD_MS};
use facetrack_core::tracking::domain::box_interpolator::TailPolicy;
use facetrack_core::tracking::domain::face_tracker::TrackerConfig;
use facetrack_core::tracking::domain::track_validator::ValidationMode;

/// Persisted defaults; command-line flags override them per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_lookahead_ms")]
    pub lookahead_ms: i64,
    #[serde(default)]
    pub tail: TailPolicy,
    #[serde(default)]
    pub validation: ValidationMode,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_lookahead_ms() -> i64 {
    VISIBILITY_LOOKAHEAD_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            lookahead_ms: default_lookahead_ms(),
            tail: TailPolicy::default(),
            validation: ValidationMode::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceTrack").join("settings.json"))
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Rejects values that a hand-edited settings file can carry but the
    /// tracker cannot use.
    pub fn validate(&self) -> Result<(), String> {
        if self.lookahead_ms < 0 {
            return Err(format!(
                "Lookahead must be non-negative, got {}",
                self.lookahead_ms
            ));
        }
        Ok(())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            lookahead_ms: self.lookahead_ms,
            tail_policy: self.tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"tail": "wrap"}"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.tail, TailPolicy::Wrap);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.lookahead_ms, VISIBILITY_LOOKAHEAD_MS);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{{{").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            api_url: "http://archive.example/api".into(),
            lookahead_ms: 5000,
            tail: TailPolicy::Wrap,
            validation: ValidationMode::Strict,
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_negative_lookahead_from_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"lookahead_ms": -200}"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.lookahead_ms, -200);
        let err = settings.validate().unwrap_err();
        assert!(err.contains("non-negative"));
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_tracker_config_mirrors_settings() {
        let settings = Settings {
            lookahead_ms: 2500,
            tail: TailPolicy::Wrap,
            ..Settings::default()
        };
        let config = settings.tracker_config();
        assert_eq!(config.lookahead_ms, 2500);
        assert_eq!(config.tail_policy, TailPolicy::Wrap);
    }
}
