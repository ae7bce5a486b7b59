use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::HabitsConfig;
use crate::model::weekday::Language;

pub const CONFIG_FILE: &str = "config.toml";

/// Error type for config reads and edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for comment-preserving edits.
pub fn read_config(habits_dir: &Path) -> Result<(HabitsConfig, toml_edit::DocumentMut), ConfigError> {
    let path = habits_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: HabitsConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(habits_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = habits_dir.join(CONFIG_FILE);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Set a dotted key (`ui.language`, `completion.allow_future`, `store.file`)
/// after validating the value.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let (table, field) = key
        .split_once('.')
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let item = match (table, field) {
        ("ui", "language") => {
            let language = Language::parse(value).ok_or_else(invalid)?;
            toml_edit::value(language.code())
        }
        ("completion", "allow_future") => {
            let flag: bool = value.trim().parse().map_err(|_| invalid())?;
            toml_edit::value(flag)
        }
        ("store", "file") => {
            if value.trim().is_empty() {
                return Err(invalid());
            }
            toml_edit::value(value.trim())
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };

    if !doc.contains_key(table) {
        doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[table][field] = item;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# habits configuration

[ui]
# weekday names and counters
language = "en"

[completion]
allow_future = false
"#
    }

    #[test]
    fn test_read_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), sample_config()).unwrap();
        let (config, _doc) = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.language, Language::En);
        assert_eq!(config.store.file, "store.json");
    }

    #[test]
    fn test_set_value_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), sample_config()).unwrap();
        let (_, mut doc) = read_config(tmp.path()).unwrap();

        set_value(&mut doc, "ui.language", "ru").unwrap();
        set_value(&mut doc, "completion.allow_future", "true").unwrap();
        write_config(tmp.path(), &doc).unwrap();

        let text = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(text.contains("# weekday names and counters"));
        assert!(text.contains("language = \"ru\""));

        let (config, _) = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.language, Language::Ru);
        assert!(config.completion.allow_future);
    }

    #[test]
    fn test_set_value_creates_missing_table() {
        let mut doc: toml_edit::DocumentMut = "".parse().unwrap();
        set_value(&mut doc, "store.file", "other.json").unwrap();
        let config: HabitsConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.store.file, "other.json");
    }

    #[test]
    fn test_write_failure_is_a_write_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("no-such-dir");
        let doc: toml_edit::DocumentMut = "".parse().unwrap();
        let err = write_config(&missing, &doc).unwrap_err();
        assert!(matches!(err, ConfigError::WriteError { .. }));
        assert!(err.to_string().starts_with("could not write"));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut doc: toml_edit::DocumentMut = "".parse().unwrap();
        assert!(matches!(
            set_value(&mut doc, "ui.theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_value(&mut doc, "language", "en"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_value(&mut doc, "ui.language", "fr"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "completion.allow_future", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
