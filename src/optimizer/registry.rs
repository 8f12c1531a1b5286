//! Strategy registry.
//!
//! Maps strategy names to factories. The registry is an ordinary value
//! handed to the facade; there is no global registration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{BestFitOptimizer, PassthroughOptimizer, ReservationOptimizer, BEST_FIT, PASSTHROUGH};
use crate::config::PlacementConfig;
use crate::error::OptimizerError;

/// Creates a fresh strategy instance for one run.
pub type OptimizerFactory = Arc<dyn Fn() -> Box<dyn ReservationOptimizer> + Send + Sync>;

/// Name → factory mapping.
///
/// # Example
/// ```
/// use room_allocation::config::PlacementConfig;
/// use room_allocation::optimizer::{OptimizerRegistry, PassthroughOptimizer, BEST_FIT};
///
/// let registry = OptimizerRegistry::with_builtin_strategies(PlacementConfig::default())
///     .with_optimizer("noop", || Box::new(PassthroughOptimizer));
///
/// assert!(registry.contains(BEST_FIT));
/// assert!(registry.contains("noop"));
/// ```
#[derive(Clone, Default)]
pub struct OptimizerRegistry {
    factories: BTreeMap<String, OptimizerFactory>,
}

impl OptimizerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in strategies.
    pub fn with_builtin_strategies(placement: PlacementConfig) -> Self {
        Self::new()
            .with_optimizer(PASSTHROUGH, || Box::new(PassthroughOptimizer))
            .with_optimizer(BEST_FIT, move || {
                Box::new(BestFitOptimizer::from_config(&placement))
            })
    }

    /// Registers a factory, replacing any previous one with that name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn ReservationOptimizer> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_optimizer<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ReservationOptimizer> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Whether a strategy is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no strategy is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiates the strategy registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn ReservationOptimizer>, OptimizerError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| OptimizerError::UnknownStrategy(name.to_owned()))
    }
}

impl fmt::Debug for OptimizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizerRegistry")
            .field("strategies", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
