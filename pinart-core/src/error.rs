//! Error types for pinart

use thiserror::Error;

/// Main error type for pinart operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("depth buffer shape mismatch: {width}x{height} needs {expected} samples, got {actual}")]
    Shape {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Task error: {0}")]
    Task(String),
}

/// Result type alias for pinart operations
pub type Result<T> = std::result::Result<T, Error>;
