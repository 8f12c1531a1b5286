//! Pluggable room allocation strategies.
//!
//! A strategy ([`ReservationOptimizer`]) turns a snapshot of the input into a
//! stream of candidate assignments. It may emit zero, one or several
//! progressively refined [`OptimizerResult`]s before it completes or fails.
//!
//! The [`OptimizerFacade`] is the entry point: it validates the input,
//! resolves a strategy by name from an [`OptimizerRegistry`], runs it on the
//! blocking pool and re-validates every candidate before forwarding it.
//!
//! # Built-in strategies
//!
//! | Name | Behaviour |
//! |------|-----------|
//! | [`PASSTHROUGH`] | Emits the input unchanged |
//! | [`BEST_FIT`] | Keeps assigned stays, places the rest by tightest fit |

mod best_fit;
mod facade;
mod passthrough;
mod registry;

pub use best_fit::BestFitOptimizer;
pub use facade::OptimizerFacade;
pub use passthrough::PassthroughOptimizer;
pub use registry::{OptimizerFactory, OptimizerRegistry};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::error::OptimizerError;
use crate::models::{Property, Reservation};
use crate::stream::{self, ResultSink, ResultStream};

/// Registered name of [`PassthroughOptimizer`].
pub const PASSTHROUGH: &str = "passthrough";

/// Registered name of [`BestFitOptimizer`].
pub const BEST_FIT: &str = "best-fit";

/// Input of one optimizer run.
///
/// The property is shared; the reservation list is owned by the run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerData {
    /// Rooms available to the run.
    pub property: Arc<Property>,
    /// Reservations to allocate.
    pub reservations: Vec<Reservation>,
}

impl OptimizerData {
    /// Bundles a property and a reservation list.
    pub fn new(property: impl Into<Arc<Property>>, reservations: Vec<Reservation>) -> Self {
        Self {
            property: property.into(),
            reservations,
        }
    }

    /// Copy handed to a strategy: same property, fresh reservation list.
    pub fn snapshot(&self) -> Self {
        Self {
            property: Arc::clone(&self.property),
            reservations: self.reservations.clone(),
        }
    }
}

/// One candidate assignment produced by a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerResult {
    /// Reservations placed in a room.
    pub successful_reservations: Vec<Reservation>,
    /// Reservations the strategy could not place, if any were reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problematic_reservations: Option<Vec<Reservation>>,
    /// Whether every input reservation is placed.
    pub is_full_solution: bool,
}

impl OptimizerResult {
    /// A complete solution.
    pub fn full(successful_reservations: Vec<Reservation>) -> Self {
        Self {
            successful_reservations,
            problematic_reservations: None,
            is_full_solution: true,
        }
    }

    /// An intermediate or incomplete solution.
    pub fn partial(
        successful_reservations: Vec<Reservation>,
        problematic_reservations: Vec<Reservation>,
    ) -> Self {
        Self {
            successful_reservations,
            problematic_reservations: Some(problematic_reservations),
            is_full_solution: false,
        }
    }

    /// Reported problematic reservations; empty if none were reported.
    pub fn problematic(&self) -> &[Reservation] {
        self.problematic_reservations.as_deref().unwrap_or_default()
    }
}

/// A room allocation strategy.
///
/// `optimize` runs on a blocking thread. It writes results into `sink` and
/// completes by returning (dropping the sink) or fails with
/// [`ResultSink::fail`]. Long-running strategies should check
/// [`ResultSink::is_cancelled`] between steps; nothing stops them otherwise.
pub trait ReservationOptimizer: Send + Sync {
    /// Registered name, used in logs.
    fn name(&self) -> &'static str;

    /// Produces candidate assignments for `data`.
    fn optimize(&self, data: OptimizerData, sink: ResultSink<OptimizerResult>);
}

/// Runs a strategy on the blocking pool and returns its raw result stream.
///
/// A strategy that panics terminates its stream with
/// [`OptimizerError::Strategy`].
pub(crate) fn spawn_strategy(
    strategy: Box<dyn ReservationOptimizer>,
    data: OptimizerData,
) -> Result<ResultStream<OptimizerResult>, OptimizerError> {
    let runtime = Handle::try_current().map_err(|_| OptimizerError::NoRuntime)?;
    let (sink, stream) = stream::channel();
    let guard = sink.clone();
    let name = strategy.name();

    let handle = runtime.spawn_blocking(move || strategy.optimize(data, sink));
    runtime.spawn(async move {
        if let Err(err) = handle.await {
            let reason = if err.is_panic() { "panicked" } else { "was aborted" };
            guard.fail(OptimizerError::Strategy(format!("strategy '{name}' {reason}")));
        }
    });

    Ok(stream)
}
