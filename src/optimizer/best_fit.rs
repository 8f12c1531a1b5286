//! Greedy tightest-fit allocation.
//!
//! # Algorithm
//!
//! 1. Keep every reservation that already has a room where it is.
//! 2. For each category in property order, take its unassigned reservations
//!    by start (ties by id).
//! 3. Put each one into [`RoomPlacer::best_room_for`]'s room, or report it
//!    as problematic if no room of its category is free.
//! 4. Emit a progress result after each category and a final result.
//!
//! Reservations of a category the property does not have are problematic
//! from the start.
//!
//! # Complexity
//! O(n · (r + n log n)) for n reservations and r rooms per category.

use tracing::debug;

use super::{OptimizerData, OptimizerResult, ReservationOptimizer, BEST_FIT};
use crate::config::PlacementConfig;
use crate::interval::RoomPlacer;
use crate::models::Reservation;
use crate::stream::ResultSink;

/// Greedy tightest-fit strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFitOptimizer {
    placer: RoomPlacer,
}

impl BestFitOptimizer {
    /// Creates a strategy with the given placer.
    pub fn new(placer: RoomPlacer) -> Self {
        Self { placer }
    }

    /// Creates a strategy from configuration.
    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(RoomPlacer::from_config(config))
    }
}

impl ReservationOptimizer for BestFitOptimizer {
    fn name(&self) -> &'static str {
        BEST_FIT
    }

    fn optimize(&self, data: OptimizerData, sink: ResultSink<OptimizerResult>) {
        let OptimizerData {
            property,
            reservations,
        } = data;

        let (mut placed, pending): (Vec<Reservation>, Vec<Reservation>) = reservations
            .into_iter()
            .partition(|r| r.room().is_assigned());

        let mut problematic: Vec<Reservation> = pending
            .iter()
            .filter(|r| property.rooms_of_category(r.category_id()).next().is_none())
            .cloned()
            .collect();

        for category in property.categories() {
            let mut queue: Vec<&Reservation> = pending
                .iter()
                .filter(|r| r.category_id() == category)
                .collect();
            if queue.is_empty() {
                continue;
            }
            queue.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.id().cmp(b.id())));

            for reservation in queue {
                if sink.is_cancelled() {
                    debug!(event = "placement_cancelled", strategy = BEST_FIT, category);
                    return;
                }
                match self.placer.best_room_for(&property, &placed, reservation) {
                    Some(room_id) => placed.push(reservation.with_room(room_id)),
                    None => problematic.push(reservation.clone()),
                }
            }

            debug!(
                event = "category_placed",
                category,
                placed = placed.len(),
                problematic = problematic.len(),
            );
            if !sink.emit(OptimizerResult::partial(placed.clone(), problematic.clone())) {
                return;
            }
        }

        let result = if problematic.is_empty() {
            OptimizerResult::full(placed)
        } else {
            OptimizerResult::partial(placed, problematic)
        };
        sink.emit(result);
    }
}
