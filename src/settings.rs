//! Start-menu selections
//!
//! Loaded from an optional JSON file by native hosts. Missing fields fall
//! back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board backdrop picked on the start menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Light,
    Dark,
    Mars,
    Ocean,
}

impl Background {
    pub const ALL: [Background; 4] = [
        Background::Light,
        Background::Dark,
        Background::Mars,
        Background::Ocean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Light => "light",
            Background::Dark => "dark",
            Background::Mars => "mars",
            Background::Ocean => "ocean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Background::Light),
            "dark" => Some(Background::Dark),
            "mars" => Some(Background::Mars),
            "ocean" | "sea" => Some(Background::Ocean),
            _ => None,
        }
    }
}

/// Failure to read a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub background: Background,
    /// Fixed run seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Whether weapons fire on their own from the first step
    pub auto_attack: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: Background::Light,
            seed: None,
            auto_attack: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings (background: {})", settings.background.as_str());
        Ok(settings)
    }

    /// Read settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_names() {
        for bg in Background::ALL {
            assert_eq!(Background::from_str(bg.as_str()), Some(bg));
        }
        assert_eq!(Background::from_str("MARS"), Some(Background::Mars));
        assert_eq!(Background::from_str("jungle"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"background":"ocean"}"#).expect("valid");
        assert_eq!(settings.background, Background::Ocean);
        assert_eq!(settings.seed, None);
        assert!(settings.auto_attack);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            background: Background::Dark,
            seed: Some(7),
            auto_attack: false,
        };
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json(r#"{"background":"jungle"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/snake-settings.json");
        assert_eq!(settings, Settings::default());
    }
}
