//! Error types for datainsights-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the datainsights-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Source file discovery failed
    #[error("discovery error: {0}")]
    Discovery(String),

    /// A source file could not be decoded into session records
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Email rendering or delivery error
    #[error("email error: {0}")]
    Email(String),
}

/// Result type alias for datainsights-core
pub type Result<T> = std::result::Result<T, Error>;
