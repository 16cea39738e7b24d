// src/utils/error.rs
use thiserror::Error;

use crate::extractors::ExtractionMethod;

// Errors raised while building or loading configuration. All of these are fatal
// at construction time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Lexicon is empty")]
    EmptyLexicon,

    #[error("Category '{0}' is not in the category weight table")]
    UnknownCategory(String),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),

    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Strategy '{method}' failed: {message}")]
    StrategyFailure {
        method: ExtractionMethod,
        message: String,
    },

    #[error("Language model error: {0}")]
    Model(String),

    #[error("Embedding backend error: {0}")]
    Embedding(String),

    #[error("Regular expression error: {0}")]
    RegexError(String),
}

impl ExtractError {
    pub fn strategy(method: ExtractionMethod, message: impl Into<String>) -> Self {
        ExtractError::StrategyFailure {
            method,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
