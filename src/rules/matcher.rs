//! Rule table and matching
//!
//! Rules are kept in registration order. Matching visits every rule, and
//! for each one whose pattern matches the method name, appends that rule's
//! per-position lists to the result.

use std::collections::BTreeMap;

use super::pattern::RulePattern;
use crate::context::Position;

/// Entries grouped by lifecycle position
pub type ByPosition<T> = BTreeMap<Position, Vec<T>>;

/// One registered pattern and its entries
#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub pattern: RulePattern,
    pub positions: ByPosition<T>,
}

impl<T> Rule<T> {
    /// A rule with no entries yet
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: RulePattern::new(pattern),
            positions: BTreeMap::new(),
        }
    }

    /// Number of entries across all positions
    pub fn len(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }

    /// Whether the rule holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge the entries of every rule matching `method`, per position.
///
/// Returns an empty map when there are no rules or nothing matches.
pub fn match_rules<T: Clone>(rules: &[Rule<T>], method: &str) -> ByPosition<T> {
    let mut result: ByPosition<T> = BTreeMap::new();
    for rule in rules {
        if !rule.pattern.is_match(method) {
            continue;
        }
        tracing::trace!("Rule '{}' matches {}", rule.pattern.as_str(), method);
        for (position, entries) in &rule.positions {
            result
                .entry(*position)
                .or_default()
                .extend(entries.iter().cloned());
        }
    }
    result
}
