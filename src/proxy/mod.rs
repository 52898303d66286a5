//! Proxy and invocation dispatch
//!
//! [`Proxy`] wraps a mandator and routes every call through the dispatcher:
//!
//! | Phase | Runs |
//! |-------|------|
//! | Before | `<method>Before` aspects, then `before` hooks |
//! | Invoke | the mandator's method, with the raw positional arguments |
//! | After | `<method>After` aspects, then `after` hooks (success only) |
//! | Exception | `<method>Exception` aspects, then `exception` hooks (failure only) |
//! | Always | `<method>Always` aspects, then `always` hooks |
//!
//! The [`bind`], [`unbind`], [`bind_hooks`] and [`unbind_hooks`] functions
//! operate on a [`Target`] slot and wrap objects in a proxy on first bind.

mod binding;
#[allow(clippy::module_inception)]
mod proxy;

pub use binding::{bind, bind_hooks, unbind, unbind_hooks, Binder, Target};
pub use proxy::Proxy;
