//! Error types shared by the engine, configuration loader and CLI.

use thiserror::Error;

/// Errors raised while constructing an engine or folding values.
#[derive(Debug, Error)]
pub enum AccumulatorError {
    #[error("configuration error: {0}")]
    /// Hash algorithm, bit count or another setting is missing or invalid.
    Configuration(String),
    #[error("dependency error: {0}")]
    /// A primitive the configuration asks for was compiled out of this build.
    Dependency(String),
    #[error("invalid accumulator value: {0}")]
    /// An accumulator value is not a non-negative decimal integer.
    InvalidValue(String),
    #[error("prime search failed: {0}")]
    /// The next-prime search produced no candidate.
    PrimeSearch(String),
    #[error("io error: {0}")]
    /// Reading a configuration file failed.
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    /// A configuration document could not be decoded.
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AccumulatorError>;
