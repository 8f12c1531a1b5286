//! Validating entry point for optimizer runs.
//!
//! Every run passes two gates:
//! 1. **Before dispatch** the input must pass
//!    [`check_data`](crate::validation::check_data); a failure is returned
//!    synchronously and no strategy is created.
//! 2. **After dispatch** every candidate must pass `check_data` against the
//!    property and [`check_all_have_a_room`]. The first candidate that fails
//!    ends the stream with that error and is never forwarded.
//!
//! Strategy errors are forwarded as-is; nothing is retried.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{spawn_strategy, OptimizerData, OptimizerRegistry, OptimizerResult};
use crate::config::AllocatorConfig;
use crate::error::OptimizerError;
use crate::models::Property;
use crate::stream::ResultStream;
use crate::validation::{check_all_have_a_room, check_data, ValidationError};

/// Runs a named strategy between validation gates.
#[derive(Debug, Clone)]
pub struct OptimizerFacade {
    registry: OptimizerRegistry,
    strategy: String,
}

impl OptimizerFacade {
    /// Creates a facade running `strategy` from `registry`.
    ///
    /// Fails with [`OptimizerError::UnknownStrategy`] if the name is not
    /// registered.
    pub fn new(registry: OptimizerRegistry, strategy: impl Into<String>) -> Result<Self, OptimizerError> {
        let strategy = strategy.into();
        if !registry.contains(&strategy) {
            return Err(OptimizerError::UnknownStrategy(strategy));
        }
        Ok(Self { registry, strategy })
    }

    /// Creates a facade over the built-in strategies, configured by `config`.
    pub fn from_config(config: &AllocatorConfig) -> Result<Self, OptimizerError> {
        let registry = OptimizerRegistry::with_builtin_strategies(config.placement);
        Self::new(registry, config.optimizer.strategy.as_str())
    }

    /// Switches to another registered strategy.
    pub fn select(&mut self, strategy: &str) -> Result<(), OptimizerError> {
        if !self.registry.contains(strategy) {
            return Err(OptimizerError::UnknownStrategy(strategy.to_owned()));
        }
        self.strategy = strategy.to_owned();
        Ok(())
    }

    /// Name of the selected strategy.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// The registry strategies are resolved from.
    pub fn registry(&self) -> &OptimizerRegistry {
        &self.registry
    }

    /// Starts a run and returns its validated result stream.
    ///
    /// The strategy receives a snapshot of `data`; later changes to `data`
    /// do not reach it. Must be called within a tokio runtime.
    pub fn optimize(&self, data: &OptimizerData) -> Result<ResultStream<OptimizerResult>, OptimizerError> {
        if let Err(err) = check_data(&data.reservations, &data.property) {
            warn!(
                event = "input_rejected",
                strategy = self.strategy.as_str(),
                kind = ?err.kind,
                error = %err,
            );
            return Err(err.into());
        }

        let strategy = self.registry.create(&self.strategy)?;
        info!(
            event = "optimize_start",
            strategy = self.strategy.as_str(),
            reservation_count = data.reservations.len(),
        );

        let property = Arc::clone(&data.property);
        let name = self.strategy.clone();
        let mut forwarded = 0usize;

        spawn_strategy(strategy, data.snapshot())?.and_then(move |result| {
            if let Err(err) = check_candidate(&result, &property) {
                warn!(
                    event = "result_rejected",
                    strategy = name.as_str(),
                    kind = ?err.kind,
                    error = %err,
                );
                return Err(err.into());
            }
            forwarded += 1;
            debug!(
                event = "result_forwarded",
                strategy = name.as_str(),
                index = forwarded,
                successful = result.successful_reservations.len(),
                problematic = result.problematic().len(),
                full = result.is_full_solution,
            );
            Ok(result)
        })
    }
}

fn check_candidate(result: &OptimizerResult, property: &Property) -> Result<(), ValidationError> {
    check_data(&result.successful_reservations, property)?;
    check_all_have_a_room(&result.successful_reservations)
}
