use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but the top level is not an object.
    #[error("config {} must contain a JSON object at the top level", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("config section `{0}` is missing")]
    MissingSection(String),

    #[error("config section `{key}` is invalid: {source}")]
    InvalidSection {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
