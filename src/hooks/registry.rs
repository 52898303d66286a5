//! Hook registry keyed by (rule pattern, position)

use super::types::{HookArg, HookFn};
use crate::context::Position;
use crate::rules::{match_rules, ByPosition, Rule};

/// Registry of raw hooks.
///
/// Patterns keep their registration order; hooks under one
/// (pattern, position) key keep their insertion order.
#[derive(Default)]
pub struct HookRegistry {
    rules: Vec<Rule<HookFn>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append hooks under `(pattern, position)`.
    ///
    /// Non-callable entries are dropped. Returns how many hooks were kept.
    pub fn add<I>(&mut self, pattern: &str, position: Position, hooks: I) -> usize
    where
        I: IntoIterator<Item = HookArg>,
    {
        let idx = match self.rules.iter().position(|r| r.pattern.as_str() == pattern) {
            Some(idx) => idx,
            None => {
                self.rules.push(Rule::new(pattern));
                self.rules.len() - 1
            }
        };

        let list = self.rules[idx].positions.entry(position).or_default();
        let mut kept = 0;
        for hook in hooks {
            match hook.into_callable() {
                Some(f) => {
                    list.push(f);
                    kept += 1;
                }
                None => tracing::debug!("Dropping non-callable hook for '{}'", pattern),
            }
        }

        tracing::debug!(
            "Registered {} hook(s) for '{}' at {}",
            kept,
            pattern,
            position
        );
        kept
    }

    /// Remove hooks under `pattern`; all positions when `position` is `None`.
    ///
    /// Returns whether anything was removed. Absent keys are a no-op.
    pub fn remove(&mut self, pattern: &str, position: Option<Position>) -> bool {
        let Some(idx) = self.rules.iter().position(|r| r.pattern.as_str() == pattern) else {
            return false;
        };

        match position {
            None => {
                self.rules.remove(idx);
                tracing::debug!("Removed all hooks for '{}'", pattern);
                true
            }
            Some(position) => {
                let removed = self.rules[idx].positions.remove(&position).is_some();
                if removed {
                    tracing::debug!("Removed {} hooks for '{}'", position, pattern);
                }
                removed
            }
        }
    }

    /// Hooks applicable to `method`, per position
    pub fn matching(&self, method: &str) -> ByPosition<HookFn> {
        match_rules(&self.rules, method)
    }

    /// Registered patterns in registration order
    pub fn patterns(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.pattern.as_str()).collect()
    }

    /// Number of hooks stored under `(pattern, position)`
    pub fn count(&self, pattern: &str, position: Position) -> usize {
        self.rules
            .iter()
            .find(|r| r.pattern.as_str() == pattern)
            .and_then(|r| r.positions.get(&position))
            .map_or(0, Vec::len)
    }

    /// Total number of hooks
    pub fn len(&self) -> usize {
        self.rules.iter().map(Rule::len).sum()
    }

    /// Whether no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Args, CallContext};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> HookArg {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        HookArg::func(move |_ctx| log.lock().unwrap().push(tag.clone()))
    }

    #[test]
    fn test_non_callables_are_dropped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();

        let kept = registry.add(
            "foo",
            Position::Before,
            vec![
                json!("not a function").into(),
                recorder(&log, "a"),
                json!(42).into(),
            ],
        );

        assert_eq!(kept, 1);
        assert_eq!(registry.count("foo", Position::Before), 1);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.add("foo", Position::After, vec![recorder(&log, "1")]);
        registry.add("foo", Position::After, vec![recorder(&log, "2"), recorder(&log, "3")]);

        let matched = registry.matching("foo");
        let mut ctx = CallContext::new("T", "foo", Args::new());
        for hook in &matched[&Position::After] {
            hook(&mut ctx);
        }
        assert_eq!(*log.lock().unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_remove_single_position() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.add("foo", Position::Before, vec![recorder(&log, "b")]);
        registry.add("foo", Position::After, vec![recorder(&log, "a")]);

        assert!(registry.remove("foo", Some(Position::Before)));
        assert_eq!(registry.count("foo", Position::Before), 0);
        assert_eq!(registry.count("foo", Position::After), 1);

        // Idempotent
        assert!(!registry.remove("foo", Some(Position::Before)));
    }

    #[test]
    fn test_remove_all_positions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.add("foo", Position::Before, vec![recorder(&log, "b")]);
        registry.add("foo", Position::Always, vec![recorder(&log, "z")]);
        registry.add("bar", Position::Always, vec![recorder(&log, "y")]);

        assert!(registry.remove("foo", None));
        assert_eq!(registry.patterns(), vec!["bar"]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.remove("foo", None));
        assert!(!registry.remove("missing", Some(Position::After)));
    }

    #[test]
    fn test_readded_pattern_moves_to_end() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.add("a", Position::Before, vec![recorder(&log, "a")]);
        registry.add("b", Position::Before, vec![recorder(&log, "b")]);
        registry.remove("a", None);
        registry.add("a", Position::Before, vec![recorder(&log, "a")]);

        assert_eq!(registry.patterns(), vec!["b", "a"]);
    }
}
