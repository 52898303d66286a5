//! Error types for the interception layer.
//!
//! Dispatch itself never fails: invocation errors are captured into the
//! call context and boundary functions report with `bool`. These errors
//! cover the surfaces that can fail loudly: pattern compilation, position
//! parsing, configuration loading and logging setup.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AopError {
    #[error("Invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Rule pattern '{pattern}' does not compile: {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown hook position: {0}")]
    UnknownPosition(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install logging subscriber: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AopError>;
