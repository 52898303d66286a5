//! Parameter resolution
//!
//! Turns the caller's positional arguments into a name→value mapping using
//! the method's declared signature, and caches those signatures per
//! mandator type so the signature provider is consulted once per method.

mod cache;
mod resolver;

pub use cache::{Signature, SignatureCache};
pub use resolver::{resolve, Parameter};
