//! Runtime configuration.
//!
//! Loads settings from config.json next to the executable at startup.
//! Provides the locale selection, the OCR endpoint index, and scoring
//! weight overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::stats::StatKey;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<RaterConfig> = OnceLock::new();

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RaterConfig {
    /// Built-in locale to use: "en" or "ja".
    #[serde(default = "default_language")]
    pub language: String,
    /// Numbered ocr.space pro endpoint to hit.
    #[serde(default = "default_endpoint")]
    pub ocr_endpoint: u32,
    /// Weight overrides merged over the built-in defaults at scoring
    /// time. Keys are snake_case stat buckets, e.g. "crit_rate".
    #[serde(default)]
    pub weights: HashMap<StatKey, f64>,
    /// Optional path to a custom locale pack JSON; takes precedence
    /// over `language`.
    #[serde(default)]
    pub locale_file: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_endpoint() -> u32 {
    1
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            ocr_endpoint: default_endpoint(),
            weights: HashMap::new(),
            locale_file: None,
        }
    }
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> RaterConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    }

    RaterConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static RaterConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: RaterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.ocr_endpoint, 1);
        assert!(config.weights.is_empty());
        assert!(config.locale_file.is_none());
    }

    #[test]
    fn test_weight_keys_deserialize_as_snake_case() {
        let config: RaterConfig = serde_json::from_str(
            r#"{"language": "ja", "weights": {"crit_rate": 1.0, "elemental_dmg": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.language, "ja");
        assert_eq!(config.weights.get(&StatKey::CritRate), Some(&1.0));
        assert_eq!(config.weights.get(&StatKey::ElementalDmg), Some(&0.5));
    }
}
