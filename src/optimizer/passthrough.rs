//! Strategy that changes nothing.

use super::{OptimizerData, OptimizerResult, ReservationOptimizer, PASSTHROUGH};
use crate::stream::ResultSink;

/// Emits the input reservations unchanged as one full solution.
///
/// Useful as a baseline and to re-validate an existing allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughOptimizer;

impl ReservationOptimizer for PassthroughOptimizer {
    fn name(&self) -> &'static str {
        PASSTHROUGH
    }

    fn optimize(&self, data: OptimizerData, sink: ResultSink<OptimizerResult>) {
        sink.emit(OptimizerResult::full(data.reservations));
    }
}
