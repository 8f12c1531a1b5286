//! Error types for room allocation.
//!
//! Validation errors live in [`crate::validation`]; this module holds the
//! construction, pipeline and evaluation errors that wrap them.

use thiserror::Error;

use crate::validation::ValidationError;

/// A domain value could not be constructed.
///
/// Values are never observably invalid: every constructor that can violate an
/// invariant returns this error instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A property needs at least one room.
    #[error("a property needs at least one room")]
    EmptyProperty,

    /// Two rooms of one property share an id.
    #[error("can't add two rooms with the same id '{0}' to one property")]
    DuplicateRoom(String),

    /// A reservation ends at or before its start.
    #[error("reservation '{0}': end has to be after start")]
    InvalidInterval(String),

    /// A reservation has no category.
    #[error("reservation '{0}' needs a category")]
    MissingCategory(String),
}

/// Failure of an optimizer run.
///
/// Carried on result streams, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Input or a produced candidate broke a structural invariant.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No strategy is registered under the requested name.
    #[error("no optimizer registered under '{0}'")]
    UnknownStrategy(String),

    /// The strategy itself reported a failure (or panicked).
    #[error("strategy failed: {0}")]
    Strategy(String),

    /// Streams need an ambient tokio runtime to spawn their producers.
    #[error("no tokio runtime available to run the optimizer")]
    NoRuntime,

    /// The evaluator could not be set up for this run.
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// An evaluator could not be bound to its run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The evaluator scores against the original set, which may not be empty.
    #[error("evaluator needs original reservations")]
    NoOriginalReservations,

    /// The original set is not a valid id-keyed set.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result alias for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;
