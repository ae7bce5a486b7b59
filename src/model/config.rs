use serde::{Deserialize, Serialize};

use super::weekday::Language;

/// Configuration from habits/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitsConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Language for weekday names and completion counters
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Allow marking days after today as completed
    #[serde(default)]
    pub allow_future: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store document, relative to the habits/ directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

/// Default: see CONFIG_TEMPLATE in cli/handlers/init.rs
fn default_store_file() -> String {
    "store.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: HabitsConfig = toml::from_str("").unwrap();
        assert_eq!(config.ui.language, Language::En);
        assert!(!config.completion.allow_future);
        assert_eq!(config.store.file, "store.json");
    }

    #[test]
    fn parses_all_sections() {
        let config: HabitsConfig = toml::from_str(
            r#"
[ui]
language = "ru"

[completion]
allow_future = true

[store]
file = "data/habits.json"
"#,
        )
        .unwrap();
        assert_eq!(config.ui.language, Language::Ru);
        assert!(config.completion.allow_future);
        assert_eq!(config.store.file, "data/habits.json");
    }
}
