//! Configuration for proxies and logging
//!
//! Both structs deserialize from JSON with every field optional, and offer
//! builder-style setters for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Dispatch behavior of a proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Cache declared signatures per type and method
    pub cache_signatures: bool,
    /// Emit an info-level summary for every dispatched call
    pub trace_calls: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            cache_signatures: true,
            trace_calls: false,
        }
    }
}

impl ProxyConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the signature cache
    pub fn with_signature_cache(mut self, enabled: bool) -> Self {
        self.cache_signatures = enabled;
        self
    }

    /// Enable or disable per-call summaries
    pub fn with_call_tracing(mut self, enabled: bool) -> Self {
        self.trace_calls = enabled;
        self
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Where and how logs are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rolling log files
    pub directory: PathBuf,
    /// Base file name; a date suffix is appended daily
    pub file_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Also log to stdout
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "aop.log".to_string(),
            default_filter: "info".to_string(),
            console: false,
        }
    }
}

impl LoggingConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log directory
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = dir.into();
        self
    }

    /// Set the log file name
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Set the default filter directive
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Also write to stdout
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
