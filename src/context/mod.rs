//! Call context shared by the hooks of one invocation
//!
//! This module provides:
//! - `Position`, the four lifecycle phases (before, after, exception, always)
//! - `CallContext`, the mutable record handed to every hook and aspect

mod call;
mod position;

pub use call::{Args, CallContext};
pub use position::Position;
