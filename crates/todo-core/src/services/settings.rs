//! Persisted user preferences.
//!
//! Settings live in a small JSON file under the platform config directory.
//! Unreadable or unrecognized values fall back to defaults instead of failing,
//! so a corrupt file never blocks startup.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::{Settings, ThemeMode};
use crate::{Error, Result};

const SETTINGS_FILE_NAME: &str = "settings.json";

/// `<config dir>/todo-reminders/settings.json`
pub fn default_settings_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("todo-reminders").join(SETTINGS_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))
}

/// Loads and saves [`Settings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service rooted at [`default_settings_path`]
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_settings_path()?))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Settings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Settings::default();
            }
            Err(error) => {
                tracing::warn!(path = %self.path.display(), "Failed to read settings: {}", error);
                return Settings::default();
            }
        };

        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), "Ignoring malformed settings: {}", error);
                return Settings::default();
            }
        };

        let theme = value
            .get("theme")
            .and_then(Value::as_str)
            .and_then(ThemeMode::parse)
            .unwrap_or_default();
        Settings { theme }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, serialized)?;
        tracing::debug!(path = %self.path.display(), theme = settings.theme.as_str(), "Saved settings");
        Ok(())
    }

    /// Flip the theme and persist it; returns the new mode.
    pub fn toggle_theme(&self) -> Result<ThemeMode> {
        let mut settings = self.load();
        settings.theme = settings.theme.toggle();
        self.save(&settings)?;
        Ok(settings.theme)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn service(dir: &TempDir) -> SettingsService {
        SettingsService::new(dir.path().join("nested").join(SETTINGS_FILE_NAME))
    }

    #[test]
    fn missing_file_defaults_to_light() {
        let dir = TempDir::new().unwrap();
        assert_eq!(service(&dir).load().theme, ThemeMode::Light);
    }

    #[test]
    fn toggle_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        assert_eq!(service(&dir).toggle_theme().unwrap(), ThemeMode::Dark);
        assert_eq!(service(&dir).load().theme, ThemeMode::Dark);
        assert_eq!(service(&dir).toggle_theme().unwrap(), ThemeMode::Light);
    }

    #[test]
    fn unknown_theme_value_falls_back() {
        let dir = TempDir::new().unwrap();
        let settings = service(&dir);
        std::fs::create_dir_all(settings.path().parent().unwrap()).unwrap();
        std::fs::write(settings.path(), r#"{"theme":"system"}"#).unwrap();
        assert_eq!(settings.load().theme, ThemeMode::Light);

        std::fs::write(settings.path(), "not json").unwrap();
        assert_eq!(settings.load(), Settings::default());
    }
}
