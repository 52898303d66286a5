//! Lifecycle positions around an intercepted call

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AopError;

/// The phase of the call lifecycle at which a hook or aspect method runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Before the mandator's method is invoked
    Before,
    /// After the method returned successfully
    After,
    /// After the method failed
    Exception,
    /// After either `After` or `Exception`, on every invoked call
    Always,
}

impl Position {
    /// All positions in lifecycle order
    pub const ALL: [Position; 4] = [
        Position::Before,
        Position::After,
        Position::Exception,
        Position::Always,
    ];

    /// Lower-case name used for raw hook registration (`before`, `after`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Before => "before",
            Position::After => "after",
            Position::Exception => "exception",
            Position::Always => "always",
        }
    }

    /// Capitalised suffix appended to a target method name to form an
    /// aspect's lifecycle method (`foo` + `Before` = `fooBefore`)
    pub fn suffix(&self) -> &'static str {
        match self {
            Position::Before => "Before",
            Position::After => "After",
            Position::Exception => "Exception",
            Position::Always => "Always",
        }
    }

    /// Compose the aspect lifecycle method name for `method`
    pub fn advice_name(&self, method: &str) -> String {
        format!("{}{}", method, self.suffix())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = AopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            "exception" => Ok(Position::Exception),
            "always" => Ok(Position::Always),
            other => Err(AopError::UnknownPosition(other.to_string())),
        }
    }
}
