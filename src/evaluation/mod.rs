//! Scoring of optimizer results.
//!
//! An evaluator is bound to one run (its property and original reservations)
//! and turns each [`OptimizerResult`] into an [`EvaluationResult`]: a score
//! plus a log explaining how it was computed.
//!
//! [`evaluate_stream`] scores a whole result stream, one evaluation per
//! result, in arrival order. The evaluation stream ends or fails exactly when
//! the result stream does.

mod weighted;

pub use weighted::WeightedEvaluator;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;
use crate::optimizer::OptimizerResult;
use crate::stream::ResultStream;

/// A scored explanation of one optimizer result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Higher is better.
    pub score: f64,
    /// Factor definitions, values, penalties and the formula, in order.
    pub log: Vec<String>,
}

/// Scores optimizer results.
///
/// Implementations hold only state fixed at construction, so evaluating the
/// same result twice yields the same evaluation.
pub trait ResultEvaluator: Send + Sync {
    /// Scores one result.
    fn evaluate(&self, result: &OptimizerResult) -> EvaluationResult;
}

/// Scores every result of `results`, preserving order.
pub fn evaluate_stream<E>(
    evaluator: Arc<E>,
    results: ResultStream<OptimizerResult>,
) -> Result<ResultStream<EvaluationResult>, OptimizerError>
where
    E: ResultEvaluator + ?Sized + 'static,
{
    results.and_then(move |result| Ok(evaluator.evaluate(&result)))
}
