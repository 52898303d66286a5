//! Aspect registry
//!
//! Holds at most one aspect per type identifier, in registration order,
//! and indexes each one under every method name it exposes.

use std::collections::HashMap;
use std::sync::Arc;

use super::aspect::Aspect;

/// Ordered collection of named aspects with a per-method index
#[derive(Default)]
pub struct AspectRegistry {
    /// Registered identifiers, in order
    names: Vec<String>,
    /// Method name → (identifier, aspect), in registration order
    index: HashMap<String, Vec<(String, Arc<dyn Aspect>)>>,
}

impl AspectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `aspect` under `name`.
    ///
    /// No-op if `name` is already registered. Returns whether it was added.
    pub fn add(&mut self, name: &str, aspect: Arc<dyn Aspect>) -> bool {
        if self.contains(name) {
            tracing::debug!("Aspect '{}' already bound, skipping", name);
            return false;
        }

        self.names.push(name.to_string());
        let methods = aspect.methods();
        for method in &methods {
            self.index
                .entry(method.clone())
                .or_default()
                .push((name.to_string(), Arc::clone(&aspect)));
        }

        tracing::debug!("Added aspect '{}' exposing {} method(s)", name, methods.len());
        true
    }

    /// Remove `name` and purge it from every method index.
    ///
    /// Unknown names are ignored. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(pos) = self.names.iter().position(|n| n == name) else {
            return false;
        };
        self.names.remove(pos);

        self.index.retain(|_, entries| {
            entries.retain(|(n, _)| n != name);
            !entries.is_empty()
        });

        tracing::debug!("Removed aspect '{}'", name);
        true
    }

    /// Aspects exposing exactly `method`, in registration order
    pub fn methods_for(&self, method: &str) -> Vec<Arc<dyn Aspect>> {
        self.index
            .get(method)
            .map(|entries| entries.iter().map(|(_, a)| Arc::clone(a)).collect())
            .unwrap_or_default()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Registered identifiers, in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Indexed method names (unordered)
    pub fn indexed_methods(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Number of registered aspects
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no aspects are registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::FnAspect;
    use crate::context::Position;

    fn aspect(name: &str, targets: &[(&str, Position)]) -> Arc<dyn Aspect> {
        let mut a = FnAspect::new(name);
        for (target, position) in targets {
            a = a.on(target, *position, |_| {});
        }
        a.into_arc()
    }

    fn sorted_methods(registry: &AspectRegistry) -> Vec<String> {
        let mut methods: Vec<String> = registry
            .indexed_methods()
            .into_iter()
            .map(String::from)
            .collect();
        methods.sort_unstable();
        methods
    }

    #[test]
    fn test_add_indexes_exposed_methods() {
        let mut registry = AspectRegistry::new();
        registry.add("Audit", aspect("Audit", &[("save", Position::Before), ("save", Position::After)]));

        assert_eq!(registry.methods_for("saveBefore").len(), 1);
        assert_eq!(registry.methods_for("saveAfter").len(), 1);
        assert!(registry.methods_for("saveAlways").is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = AspectRegistry::new();
        assert!(registry.add("Audit", aspect("Audit", &[("save", Position::Before)])));
        let before = sorted_methods(&registry);

        // Second instance under the same identifier exposes more, but is ignored
        assert!(!registry.add(
            "Audit",
            aspect("Audit", &[("save", Position::Before), ("load", Position::After)])
        ));

        assert_eq!(sorted_methods(&registry), before);
        assert_eq!(registry.methods_for("saveBefore").len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_methods_for_preserves_registration_order() {
        let mut registry = AspectRegistry::new();
        registry.add("First", aspect("First", &[("run", Position::Before)]));
        registry.add("Second", aspect("Second", &[("run", Position::Before)]));

        let names: Vec<String> = registry
            .methods_for("runBefore")
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_remove_purges_index() {
        let mut registry = AspectRegistry::new();
        registry.add("A", aspect("A", &[("run", Position::Before), ("stop", Position::After)]));
        registry.add("B", aspect("B", &[("run", Position::Before)]));

        assert!(registry.remove("A"));
        assert_eq!(registry.methods_for("runBefore").len(), 1);
        // Entry with no remaining aspects is deleted entirely
        assert!(!registry.indexed_methods().contains(&"stopAfter"));
        assert_eq!(registry.names(), &["B".to_string()]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = AspectRegistry::new();
        registry.add("A", aspect("A", &[("run", Position::Before)]));

        assert!(!registry.remove("Ghost"));
        assert!(registry.contains("A"));
        assert_eq!(registry.methods_for("runBefore").len(), 1);
    }
}
