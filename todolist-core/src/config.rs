//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "locale": "en-US", "emailDomain": "example.com", ... }
//! }
//! ```
//! Keys this crate doesn't manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::files::write_atomic;
use crate::i18n::Locale;

/// Domain appended to usernames to form identity emails
pub const DEFAULT_EMAIL_DOMAIN: &str = "example.com";

/// Environment variable overriding the configured locale
pub const LOCALE_ENV: &str = "TODOLIST_LOCALE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<Locale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email_domain: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Todolist configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub locale: Locale,
    pub email_domain: String,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The locale can be overridden with the TODOLIST_LOCALE environment
    /// variable. An unreadable settings file falls back to defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let env_locale = std::env::var(LOCALE_ENV)
            .ok()
            .and_then(|v| v.parse::<Locale>().ok());
        let locale = env_locale.or(raw.app.locale).unwrap_or_default();

        let email_domain = raw
            .app
            .email_domain
            .clone()
            .map(|d| d.trim().trim_start_matches('@').to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string());

        Ok(Self {
            locale,
            email_domain,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.locale = Some(self.locale);
        settings.app.email_domain = Some(self.email_domain.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        write_atomic(&settings_path, content.as_bytes())?;
        Ok(())
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// The synthetic identity email for `username`
    pub fn email_for(&self, username: &str) -> String {
        format!("{}@{}", username, self.email_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.email_domain, DEFAULT_EMAIL_DOMAIN);
        assert_eq!(config.email_for("alice"), "alice@example.com");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"app":{"emailDomain":"@todo.test","theme":"ocean"},"extra":{"keep":true}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.email_domain, "todo.test");

        config.set_locale(Locale::EnUs);
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["app"]["locale"], "en-US");
        assert_eq!(saved["app"]["theme"], "ocean");
        assert_eq!(saved["extra"]["keep"], true);
    }

    #[test]
    fn test_save_creates_data_dir_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("fresh");

        let mut config = Config::default();
        config.set_locale(Locale::EnUs);
        config.save(&data_dir).unwrap();

        let names: Vec<_> = std::fs::read_dir(&data_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["settings.json"]);
        assert_eq!(Config::load(&data_dir).unwrap().locale, Locale::EnUs);
    }

    #[test]
    fn test_garbage_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{{{").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.email_domain, DEFAULT_EMAIL_DOMAIN);
    }
}
