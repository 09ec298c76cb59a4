//! JSON configuration loading.
//!
//! The loader knows nothing about ledgers: it reads a JSON object from disk and
//! hands out typed sections on request.

pub mod error;
pub mod loader;

pub use error::ConfigError;
pub use loader::{ConfigMap, optional_section, read_json_config, section};
