//! Central registry for hash algorithm implementations

use super::Algorithm;
use super::traits::HashAlgorithmImpl;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Central registry for all hash algorithms
///
/// Adapters are kept in engine order regardless of registration order.
pub struct AlgorithmRegistry {
    algorithms: Vec<Arc<dyn HashAlgorithmImpl>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    fn new() -> Self {
        Self {
            algorithms: Vec::with_capacity(Algorithm::ALL.len()),
        }
    }

    /// Get the global registry instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceCell<AlgorithmRegistry> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let mut registry = Self::new();
            super::algorithms::register_all(&mut registry);
            log::debug!(
                "Registered {} hash algorithms",
                registry.algorithms.len()
            );
            registry
        })
    }

    /// Register an algorithm, replacing any adapter for the same bank entry
    pub fn register(&mut self, algorithm: impl HashAlgorithmImpl + 'static) {
        let id = algorithm.algorithm();
        self.algorithms.retain(|existing| existing.algorithm() != id);
        self.algorithms.push(Arc::new(algorithm));
        self.algorithms.sort_by_key(|existing| existing.algorithm());
    }

    /// Get the adapter for an algorithm
    pub fn get(&self, algorithm: Algorithm) -> Option<Arc<dyn HashAlgorithmImpl>> {
        self.algorithms
            .iter()
            .find(|existing| existing.algorithm() == algorithm)
            .cloned()
    }

    /// Get the adapter by algorithm ID
    pub fn get_by_id(&self, id: &str) -> Option<Arc<dyn HashAlgorithmImpl>> {
        self.algorithms
            .iter()
            .find(|existing| existing.id() == id)
            .cloned()
    }

    /// List all registered algorithm IDs in engine order
    pub fn list(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.id()).collect()
    }

    /// Iterate over the registered adapters in engine order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn HashAlgorithmImpl>> {
        self.algorithms.iter()
    }
}
