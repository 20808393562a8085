//! # Omega Core Configuration Errors
//!
//! Defines [`ConfigError`], raised while locating, reading or parsing a
//! configuration file.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported configuration format for path: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Deserialization from '{format}' failed for '{path}': {source}")]
    Deserialization {
        format: String,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Configuration key '{key}' in '{path}' has an unexpected shape: {message}")]
    InvalidValue {
        path: PathBuf,
        key: String,
        message: String,
    },
}

impl ConfigError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        ConfigError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
