//! Widget configuration values.
//!
//! Values are resolved outside the widget; a resolver hands over a complete
//! [`WidgetValues`]. Keys absent from a source keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetValues {
    /// Regular-expression source tested against the host textbox value.
    pub validation_pattern: String,
    /// Human-readable description of the rule; display only.
    pub validation_message: String,
}

impl Default for WidgetValues {
    fn default() -> Self {
        Self {
            validation_pattern: r"^ABC-\d+-DEF$".to_string(),
            validation_message: "Field must match the pattern ABC-<number>-DEF".to_string(),
        }
    }
}

impl WidgetValues {
    /// `(key, value)` pairs under their serialized names, as rendered into
    /// `values.<key>` elements.
    pub fn entries(&self) -> [(&'static str, &str); 2] {
        [
            ("validationPattern", self.validation_pattern.as_str()),
            ("validationMessage", self.validation_message.as_str()),
        ]
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait ValuesResolver {
    fn resolve(&self) -> Result<WidgetValues, ConfigError>;
}

/// Built-in defaults only.
pub struct Defaults;

impl ValuesResolver for Defaults {
    fn resolve(&self) -> Result<WidgetValues, ConfigError> {
        Ok(WidgetValues::default())
    }
}

pub struct TomlValues {
    src: String,
}

impl TomlValues {
    pub fn from_source(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_source(read(path)?))
    }
}

impl ValuesResolver for TomlValues {
    fn resolve(&self) -> Result<WidgetValues, ConfigError> {
        Ok(toml::from_str(&self.src)?)
    }
}

pub struct JsonValues {
    src: String,
}

impl JsonValues {
    pub fn from_source(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_source(read(path)?))
    }
}

impl ValuesResolver for JsonValues {
    fn resolve(&self) -> Result<WidgetValues, ConfigError> {
        Ok(serde_json::from_str(&self.src)?)
    }
}

/// Pick a resolver by file extension: `.json` is JSON, anything else TOML.
pub fn resolver_for_path(path: &Path) -> Result<Box<dyn ValuesResolver>, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Box::new(JsonValues::from_path(path)?)),
        _ => Ok(Box::new(TomlValues::from_path(path)?)),
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_rule() {
        let values = Defaults.resolve().unwrap();
        assert_eq!(values.validation_pattern, r"^ABC-\d+-DEF$");
        assert!(values.validation_message.contains("ABC-<number>-DEF"));
    }

    #[test]
    fn toml_overrides_only_present_keys() {
        let values = TomlValues::from_source(r#"validationPattern = "^[0-9]{4}$""#)
            .resolve()
            .unwrap();
        assert_eq!(values.validation_pattern, "^[0-9]{4}$");
        assert_eq!(
            values.validation_message,
            WidgetValues::default().validation_message
        );
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let values = JsonValues::from_source(
            r#"{ "validationPattern": "x", "validationMessage": "must be x" }"#,
        )
        .resolve()
        .unwrap();
        assert_eq!(
            values,
            WidgetValues {
                validation_pattern: "x".to_string(),
                validation_message: "must be x".to_string(),
            }
        );
    }

    #[test]
    fn malformed_sources_are_reported() {
        assert!(matches!(
            TomlValues::from_source("validationPattern = ").resolve(),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            JsonValues::from_source("{").resolve(),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let err = resolver_for_path(Path::new("/definitely/not/here.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn entries_use_serialized_keys() {
        let values = WidgetValues::default();
        let keys: Vec<_> = values.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["validationPattern", "validationMessage"]);
    }
}
