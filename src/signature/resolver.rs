//! Binds positional arguments to declared parameter names

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::Args;

/// One declared parameter of a method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared parameter name
    pub name: String,
    /// Declared default value, if the parameter has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    /// A parameter without a default
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a declared default
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Whether a default is declared
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Build the name→value mapping for a call.
///
/// Position `i` takes `positional[i]` when supplied, else the declared
/// default, else `Null`. Missing required arguments are not an error.
/// Extra positional arguments beyond the signature are not named.
pub fn resolve(signature: &[Parameter], positional: &[Value]) -> Args {
    let mut args = Args::new();
    for (i, param) in signature.iter().enumerate() {
        let value = match positional.get(i) {
            // An explicit null counts as "not set" and falls back to the default
            Some(Value::Null) | None => param.default.clone().unwrap_or(Value::Null),
            Some(v) => v.clone(),
        };
        args.insert(param.name.clone(), value);
    }
    args
}
