//! Weighted-sum evaluator.
//!
//! # Factors
//!
//! | Factor | Definition |
//! |--------|-----------|
//! | totalDays | Whole days of all original reservations |
//! | successful | Days of successful reservations / totalDays |
//! | changed | Days of reservations moved out of their original room / totalDays |
//! | spaces | Idle gaps of a day or more between stays in one room / (originals − 1) |
//!
//! ```text
//! score = totalDays · successful · w_successful
//!       + totalDays · changed · w_changed
//!       + spaces · w_spaces
//! ```
//!
//! Default weights are `+1`, `−1` and `−2`. Only reservations whose original
//! already had a room count as changed.

use std::collections::HashMap;
use std::sync::Arc;

use super::{EvaluationResult, ResultEvaluator};
use crate::config::EvaluationWeights;
use crate::error::EvaluationError;
use crate::interval::{group_by_room, total_days};
use crate::models::{Property, Reservation};
use crate::optimizer::OptimizerResult;
use crate::validation::reservations_by_id;

/// Scores results against the original reservations of one run.
#[derive(Debug, Clone)]
pub struct WeightedEvaluator {
    property: Arc<Property>,
    originals: HashMap<String, Reservation>,
    total_days: i64,
    weights: EvaluationWeights,
}

impl WeightedEvaluator {
    /// Binds an evaluator to a run.
    ///
    /// Fails if `originals` is empty or holds an id twice.
    pub fn new(
        property: impl Into<Arc<Property>>,
        originals: Vec<Reservation>,
    ) -> Result<Self, EvaluationError> {
        if originals.is_empty() {
            return Err(EvaluationError::NoOriginalReservations);
        }
        let total_days = total_days(&originals);
        let originals = reservations_by_id(&originals)?
            .into_iter()
            .map(|(id, r)| (id.to_owned(), r.clone()))
            .collect();

        Ok(Self {
            property: property.into(),
            originals,
            total_days,
            weights: EvaluationWeights::default(),
        })
    }

    /// Sets the factor weights.
    pub fn with_weights(mut self, weights: EvaluationWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Property of the run.
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Whole days of all original reservations.
    pub fn total_days(&self) -> i64 {
        self.total_days
    }

    /// Factor weights in use.
    pub fn weights(&self) -> EvaluationWeights {
        self.weights
    }

    fn ratio(&self, days: i64) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            days as f64 / self.total_days as f64
        }
    }

    /// Days of reservations moved away from their original room.
    fn changed_days(&self, successful: &[Reservation], log: &mut Vec<String>) -> i64 {
        let mut changed = 0;
        for r in successful {
            let Some(original) = self.originals.get(r.id()) else {
                log.push(format!(
                    "No original reservation with id '{}', its room is not compared",
                    r.id()
                ));
                continue;
            };
            let Some(original_room) = original.room_id() else {
                continue;
            };
            if r.room_id() != Some(original_room) {
                let days = r.length_in_days();
                log.push(format!(
                    "Penalty ({days} days) for the reservation with id '{}' because its room changed from '{original_room}' to '{}'",
                    r.id(),
                    r.room(),
                ));
                changed += days;
            }
        }
        changed
    }

    /// Gaps of at least one whole day between consecutive stays of a room,
    /// relative to the most gaps the original set could have.
    fn spaces_ratio(&self, successful: &[Reservation]) -> f64 {
        if self.originals.len() <= 1 {
            return 0.0;
        }
        let spaces: usize = group_by_room(successful)
            .into_iter()
            .filter(|(room, _)| room.is_assigned())
            .map(|(_, mut stays)| {
                stays.sort_by_key(|r| r.start());
                stays
                    .windows(2)
                    .filter(|pair| (pair[1].start() - pair[0].end()).num_days() >= 1)
                    .count()
            })
            .sum();
        spaces as f64 / (self.originals.len() - 1) as f64
    }
}

impl ResultEvaluator for WeightedEvaluator {
    fn evaluate(&self, result: &OptimizerResult) -> EvaluationResult {
        let mut log = Vec::new();
        let w = self.weights;
        let total = self.total_days as f64;

        let successful = self.ratio(total_days(&result.successful_reservations));
        let changed = self.ratio(self.changed_days(&result.successful_reservations, &mut log));
        let spaces = self.spaces_ratio(&result.successful_reservations);

        let score = total * successful * w.successful + total * changed * w.changed + spaces * w.spaces;

        log.push("-".to_owned());
        log.push("Score:".to_owned());
        log.push(format!(
            "totalDays = total days of all reservations summed up ({})",
            self.total_days
        ));
        log.push(format!(
            "factorSuccessfulDays = days of successful reservations summed up / totalDays ({successful})"
        ));
        log.push(format!(
            "factorChangedDays = days of reservations that changed their room / totalDays ({changed})"
        ));
        log.push(format!(
            "factorSpaces = number of spaces between reservations / (number of reservations - 1) ({spaces})"
        ));
        log.push(
            "totalDays * factorSuccessfulDays * WEIGHT_SUCCESSFUL + totalDays * factorChangedDays * WEIGHT_CHANGED + factorSpaces * WEIGHT_SPACES"
                .to_owned(),
        );
        log.push("-".to_owned());
        log.push(format!(
            "({total} * {successful} * {}) + ({total} * {changed} * {}) + ({spaces} * {}) = {score}",
            w.successful, w.changed, w.spaces
        ));

        EvaluationResult { score, log }
    }
}
