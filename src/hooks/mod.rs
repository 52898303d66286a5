//! Hooks Module
//!
//! Raw callables bound to a rule pattern and a lifecycle position,
//! independent of the aspect object model.
//!
//! # Example
//!
//! ```ignore
//! use aop_proxy::hooks::{HookArg, HookRegistry};
//! use aop_proxy::Position;
//!
//! let mut hooks = HookRegistry::new();
//!
//! // Exact method name
//! hooks.add("save", Position::Before, [HookArg::func(|ctx| {
//!     tracing::info!("saving with {:?}", ctx.args);
//! })]);
//!
//! // Delimited regex: every getter
//! hooks.add("/^get[A-Z]/", Position::After, [HookArg::func(|ctx| {
//!     tracing::info!("{} returned {:?}", ctx.method, ctx.return_value);
//! })]);
//! ```
//!
//! # Positions
//!
//! | Position | When |
//! |----------|------|
//! | `before` | Before the mandator's method is invoked |
//! | `after` | After the method returned |
//! | `exception` | After the method failed |
//! | `always` | After `after` or `exception`, on every invoked call |
//!
//! Within a phase, aspects run before raw hooks, and all matching hooks run
//! to completion in registration order.

mod registry;
mod types;

pub use registry::HookRegistry;
pub use types::{HookArg, HookFn};
