//! Settings persistence and small text helpers.

use shared::settings::AppSettings;
use std::fs;
use std::path::PathBuf;

pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = directories::ProjectDirs::from("com.local", "Quill", "Quill") {
        let _ = fs::create_dir_all(proj.config_dir());
        Some(proj.config_dir().join("settings.json"))
    } else {
        None
    }
}

pub fn load_settings_or_default() -> AppSettings {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(bytes) = fs::read(&path) {
                if let Ok(settings) = serde_json::from_slice::<AppSettings>(&bytes) {
                    return settings;
                }
                tracing::warn!(path = %path.display(), "settings file unreadable, using defaults");
            }
        }
    }
    AppSettings::default()
}

pub fn save_settings(settings: &AppSettings) {
    if let Some(path) = config_path() {
        match serde_json::to_vec_pretty(settings) {
            Ok(bytes) => {
                if let Err(e) = fs::write(&path, bytes) {
                    tracing::warn!(error = %e, "failed to save settings");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize settings"),
        }
    }
}

/// Slice a string by char offsets (the editor reports selections in chars).
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
