//! Method-name rules
//!
//! A rule pattern selects which calls trigger a hook: either a plain method
//! name, anchored to match it exactly, or a delimited regular expression.

mod matcher;
mod pattern;

pub use matcher::{match_rules, ByPosition, Rule};
pub use pattern::{compile, is_plain_name, normalize, RulePattern};
