//! Per-type, per-method cache of declared signatures
//!
//! Entries are computed lazily on first lookup and never expire. Two
//! threads racing to populate the same entry both compute it; the first
//! insert wins and the results are identical anyway.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::resolver::Parameter;

/// Shared, immutable signature of one method
pub type Signature = Arc<[Parameter]>;

/// Append-only signature cache keyed by mandator type then method name
#[derive(Default)]
pub struct SignatureCache {
    entries: RwLock<HashMap<String, HashMap<String, Signature>>>,
}

impl SignatureCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached signature, if present
    pub fn get(&self, type_name: &str, method: &str) -> Option<Signature> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(type_name)?.get(method).cloned()
    }

    /// Get the cached signature or compute and store it
    pub fn get_or_insert_with<F>(&self, type_name: &str, method: &str, compute: F) -> Signature
    where
        F: FnOnce() -> Vec<Parameter>,
    {
        if let Some(sig) = self.get(type_name, method) {
            return sig;
        }

        // Computed outside the write lock; the provider may be slow
        let computed: Signature = compute().into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(type_name.to_string())
            .or_default()
            .entry(method.to_string())
            .or_insert_with(|| {
                tracing::trace!("Caching signature for {}::{}", type_name, method);
                computed
            })
            .clone()
    }

    /// Number of cached method signatures across all types
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().map(HashMap::len).sum()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_computes_once() {
        let cache = SignatureCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![Parameter::required("a")]
        };

        let first = cache.get_or_insert_with("Calc", "add", compute);
        let second = cache.get_or_insert_with("Calc", "add", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_keys_are_per_type_and_method() {
        let cache = SignatureCache::new();
        cache.get_or_insert_with("A", "run", || vec![Parameter::required("x")]);
        cache.get_or_insert_with("B", "run", Vec::new);
        cache.get_or_insert_with("A", "stop", Vec::new);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("A", "run").map(|s| s.len()), Some(1));
        assert_eq!(cache.get("B", "run").map(|s| s.len()), Some(0));
        assert!(cache.get("B", "stop").is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(SignatureCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.get_or_insert_with("T", "m", || vec![Parameter::optional("n", 1)])
                })
            })
            .collect();

        for handle in handles {
            let sig = handle.join().unwrap();
            assert_eq!(sig[0].name, "n");
        }
        assert_eq!(cache.len(), 1);
    }
}
