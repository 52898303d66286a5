//! Per-invocation call context
//!
//! A `CallContext` is created fresh for each dispatched call and handed as
//! `&mut` to every aspect and hook that runs during that call, in order.
//! Changes made by one hook (for example rewriting `return_value`) are seen
//! by the hooks that run after it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Resolved call arguments, keyed by declared parameter name
pub type Args = Map<String, Value>;

/// The mutable record shared across all hooks of one dispatch
pub struct CallContext {
    /// Unique id of this invocation
    pub call_id: Uuid,
    /// When dispatch started
    pub started_at: DateTime<Utc>,
    /// Type identifier of the mandator
    pub class: String,
    /// Name of the intercepted method
    pub method: String,
    /// Arguments resolved against the method's declared signature
    pub args: Args,
    /// Value returned by the mandator, once invoked successfully
    pub return_value: Option<Value>,
    /// Error raised by the mandator, if the invocation failed
    pub exception: Option<anyhow::Error>,
}

impl CallContext {
    /// Create a context for a call that has not been invoked yet
    pub fn new(class: impl Into<String>, method: impl Into<String>, args: Args) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            started_at: Utc::now(),
            class: class.into(),
            method: method.into(),
            args,
            return_value: None,
            exception: None,
        }
    }

    /// Look up a resolved argument by name
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Whether the underlying invocation failed
    pub fn failed(&self) -> bool {
        self.exception.is_some()
    }

    /// `Class::method`
    pub fn signature(&self) -> String {
        format!("{}::{}", self.class, self.method)
    }

    /// Milliseconds elapsed since dispatch started
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("call_id", &self.call_id)
            .field("class", &self.class)
            .field("method", &self.method)
            .field("args", &self.args)
            .field("return_value", &self.return_value)
            .field("exception", &self.exception.as_ref().map(|e| e.to_string()))
            .finish()
    }
}
