//! Raw hook values

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::CallContext;

/// A raw callable run at a lifecycle position
pub type HookFn = Arc<dyn Fn(&mut CallContext) + Send + Sync>;

/// A value offered for hook registration.
///
/// Registration accepts loosely-typed input; only `Callable` entries are
/// kept, anything else is dropped without an error.
#[derive(Clone)]
pub enum HookArg {
    /// A callable hook
    Callable(HookFn),
    /// A non-callable value
    Value(Value),
}

impl HookArg {
    /// Wrap a closure
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut CallContext) + Send + Sync + 'static,
    {
        HookArg::Callable(Arc::new(f))
    }

    /// Whether this entry can be registered
    pub fn is_callable(&self) -> bool {
        matches!(self, HookArg::Callable(_))
    }

    /// The callable, if any
    pub fn into_callable(self) -> Option<HookFn> {
        match self {
            HookArg::Callable(f) => Some(f),
            HookArg::Value(_) => None,
        }
    }
}

impl From<HookFn> for HookArg {
    fn from(f: HookFn) -> Self {
        HookArg::Callable(f)
    }
}

impl From<Value> for HookArg {
    fn from(v: Value) -> Self {
        HookArg::Value(v)
    }
}

impl fmt::Debug for HookArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookArg::Callable(_) => f.write_str("HookArg::Callable(..)"),
            HookArg::Value(v) => f.debug_tuple("HookArg::Value").field(v).finish(),
        }
    }
}
