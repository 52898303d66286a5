//! Aspects
//!
//! Objects providing lifecycle callbacks named by convention
//! (`<method>Before`, `<method>After`, `<method>Exception`,
//! `<method>Always`), registered under their type identifier.

mod aspect;
mod registry;

pub use aspect::{Aspect, AspectCatalog, AspectFactory, AspectRef, FnAspect};
pub use registry::AspectRegistry;
