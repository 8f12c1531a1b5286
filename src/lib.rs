//! Hotel room allocation.
//!
//! Assigns reservations to physical rooms within fixed room categories,
//! checks that an assignment is structurally legal and scores how good it is
//! relative to the original input.
//!
//! # Modules
//!
//! - **`models`**: Domain values: `Room`, `Property`, `Reservation`,
//!   `RoomAssignment`
//! - **`validation`**: Structural invariants (duplicate ids, unknown rooms,
//!   category mismatches, overlaps, missing rooms)
//! - **`interval`**: Grouping, sweep-line timeslots, point queries and
//!   tightest-fit room placement
//! - **`optimizer`**: Strategy contract, registry and the validating facade
//! - **`evaluation`**: Weighted scoring of optimizer results
//! - **`stream`**: Producer/consumer result channels with cooperative
//!   cancellation
//! - **`config`**: TOML configuration
//! - **`generator`**: Random demo data
//!
//! # Pipeline
//!
//! ```text
//! OptimizerData ─▶ check_data ─▶ strategy ─▶ check_data + check_all_have_a_room ─▶ results
//!                                                                     └─ fork ─▶ evaluator ─▶ scores
//! ```
//!
//! # References
//!
//! - de Berg et al. (2008), "Computational Geometry", Ch. 2
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod error;
pub mod evaluation;
pub mod generator;
pub mod interval;
pub mod models;
pub mod optimizer;
pub mod stream;
pub mod validation;

pub use config::AllocatorConfig;
pub use error::{DomainError, EvaluationError, OptimizerError};
pub use evaluation::{EvaluationResult, ResultEvaluator, WeightedEvaluator};
pub use models::{Property, Reservation, ReservationData, Room, RoomAssignment};
pub use optimizer::{OptimizerData, OptimizerFacade, OptimizerResult};
