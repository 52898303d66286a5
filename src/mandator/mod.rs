//! Mandators: the objects being instrumented
//!
//! A mandator exposes the capabilities the dispatcher needs in place of
//! language reflection: a type identifier, per-method visibility, declared
//! signatures, invocation by name with positional arguments, and optional
//! property access.

mod object;

pub use object::{DynamicObject, MethodFn};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::signature::Parameter;

/// Visibility of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Whether callers outside the object may invoke it
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Trait for objects that can be wrapped in a proxy
pub trait Mandator: Send + Sync {
    /// Stable type identifier (class name)
    fn type_name(&self) -> &str;

    /// Visibility of `method`, or `None` if no such method exists
    fn visibility(&self, method: &str) -> Option<Visibility>;

    /// Declared parameters of `method`, in order.
    ///
    /// Proxies cache the result per type and method, so it must not change
    /// for the lifetime of the process.
    fn signature(&self, method: &str) -> Vec<Parameter>;

    /// Invoke `method` with raw positional arguments
    fn invoke(&self, method: &str, args: &[Value]) -> anyhow::Result<Value>;

    /// Read a property; `None` if the object has no such property
    fn get_property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Write a property; returns whether the write was accepted
    fn set_property(&self, _name: &str, _value: Value) -> bool {
        false
    }
}
