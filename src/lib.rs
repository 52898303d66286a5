//! Aspect-oriented interception for dynamically dispatched objects.
//!
//! Wrap any [`Mandator`] in a [`Proxy`] and attach side-behaviors that run
//! around its public methods, without touching the mandator itself:
//!
//! - **Aspects**: objects exposing `<method>Before`, `<method>After`,
//!   `<method>Exception` and `<method>Always` lifecycle methods
//! - **Hooks**: raw callables matched against method names by rule pattern
//!
//! # Example
//!
//! ```ignore
//! use aop_proxy::{bind, bind_hooks, DynamicObject, FnAspect, HookArg, Position, Target};
//! use serde_json::json;
//!
//! let mut target = Target::object(
//!     DynamicObject::new("Answer")
//!         .method("foo", vec![], |_, _| Ok(json!(42)))
//!         .into_arc(),
//! );
//!
//! bind(&mut target, [FnAspect::new("Audit")
//!     .on("foo", Position::After, |ctx| println!("foo returned {:?}", ctx.return_value))
//!     .into()]);
//! bind_hooks(&mut target, "/^f/", Position::Before, [HookArg::func(|ctx| {
//!     println!("calling {}", ctx.method);
//! })]);
//!
//! assert_eq!(target.call("foo", &[]), json!(42));
//! ```

pub mod aspects;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod mandator;
pub mod proxy;
pub mod rules;
pub mod signature;

pub use aspects::{Aspect, AspectCatalog, AspectFactory, AspectRef, AspectRegistry, FnAspect};
pub use config::{LoggingConfig, ProxyConfig};
pub use context::{Args, CallContext, Position};
pub use error::{AopError, Result};
pub use hooks::{HookArg, HookFn, HookRegistry};
pub use mandator::{DynamicObject, Mandator, Visibility};
pub use proxy::{bind, bind_hooks, unbind, unbind_hooks, Binder, Proxy, Target};
pub use signature::{resolve, Parameter, SignatureCache};
