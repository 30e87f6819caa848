use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analytics::demographics::NOT_SPECIFIED;
use crate::analytics::text::{DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_WORDS};
use crate::error::Result;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSettings {
    #[serde(default = "default_top_words")]
    pub top_words: usize,
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
    #[serde(default = "default_not_specified")]
    pub not_specified_label: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub template_dir: Option<String>,
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default = "default_backend_key_env")]
    pub backend_key_env: String,
}

fn default_top_words() -> usize {
    DEFAULT_TOP_WORDS
}

fn default_min_token_length() -> usize {
    DEFAULT_MIN_TOKEN_LENGTH
}

fn default_not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend_key_env() -> String {
    "SURVEY_BACKEND_KEY".to_string()
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            top_words: default_top_words(),
            min_token_length: default_min_token_length(),
            not_specified_label: default_not_specified(),
            log_level: default_log_level(),
            template_dir: None,
            backend_url: None,
            backend_key_env: default_backend_key_env(),
        }
    }
}

/// Reads settings from `path`, writing defaults there first if the file is missing or blank.
pub fn load_settings(path: &Path) -> Result<InsightsSettings> {
    if !path.exists() {
        let defaults = InsightsSettings::default();
        save_settings(path, &defaults)?;
        return Ok(defaults);
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        let defaults = InsightsSettings::default();
        save_settings(path, &defaults)?;
        return Ok(defaults);
    }
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_settings(path: &Path, settings: &InsightsSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(settings)?;
    fs::write(path, payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_settings, save_settings, InsightsSettings};
    use uuid::Uuid;

    #[test]
    fn missing_file_writes_defaults() {
        let tmp = std::env::temp_dir().join(format!("insights-settings-{}", Uuid::new_v4()));
        let path = tmp.join("settings").join("insights.json");
        let loaded = load_settings(&path).expect("load defaults");
        assert_eq!(loaded, InsightsSettings::default());
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(tmp);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let tmp = std::env::temp_dir().join(format!("insights-settings-{}", Uuid::new_v4()));
        let path = tmp.join("insights.json");
        std::fs::create_dir_all(&tmp).expect("tmp");
        std::fs::write(&path, r#"{"topWords": 10, "notSpecifiedLabel": "Unknown"}"#).expect("write");
        let loaded = load_settings(&path).expect("load");
        assert_eq!(loaded.top_words, 10);
        assert_eq!(loaded.not_specified_label, "Unknown");
        assert_eq!(loaded.min_token_length, 3);

        let mut changed = loaded.clone();
        changed.log_level = "debug".to_string();
        save_settings(&path, &changed).expect("save");
        assert_eq!(load_settings(&path).expect("reload").log_level, "debug");
        let _ = std::fs::remove_dir_all(tmp);
    }
}
