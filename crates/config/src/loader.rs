use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Top-level configuration document: string keys to arbitrary JSON values.
pub type ConfigMap = Map<String, Value>;

/// Read and parse the JSON document at `path`.
///
/// Relative paths resolve against the current working directory.
pub fn read_json_config(path: impl AsRef<Path>) -> Result<ConfigMap, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading config");

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Deserialize the required section `key`.
pub fn section<T: DeserializeOwned>(config: &ConfigMap, key: &str) -> Result<T, ConfigError> {
    optional_section(config, key)?.ok_or_else(|| ConfigError::MissingSection(key.to_string()))
}

/// Deserialize section `key` if present. `null` counts as absent.
pub fn optional_section<T: DeserializeOwned>(
    config: &ConfigMap,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| ConfigError::InvalidSection {
                key: key.to_string(),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Logging {
        format: String,
    }

    fn config(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test config must be an object"),
        }
    }

    #[test]
    fn section_deserializes_typed_value() {
        let cfg = config(json!({ "logging": { "format": "json" } }));
        let logging: Logging = section(&cfg, "logging").unwrap();
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn missing_and_null_sections() {
        let cfg = config(json!({ "logging": null }));
        assert!(matches!(
            section::<Logging>(&cfg, "bank"),
            Err(ConfigError::MissingSection(key)) if key == "bank"
        ));
        assert_eq!(optional_section::<Logging>(&cfg, "logging").unwrap(), None);
    }

    #[test]
    fn wrongly_shaped_section_is_invalid() {
        let cfg = config(json!({ "logging": { "format": 7 } }));
        let err = section::<Logging>(&cfg, "logging").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSection { ref key, .. } if key == "logging"));
        assert!(err.to_string().starts_with("config section `logging` is invalid"));
    }
}
