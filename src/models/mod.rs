//! Room allocation domain models.
//!
//! Immutable value types describing a hotel: rooms grouped by category
//! ([`Property`]) and the stays booked against them ([`Reservation`]).
//!
//! # Domain Mappings
//!
//! | room-allocation | Hotel | Meeting rooms | Parking |
//! |-----------------|-------|---------------|---------|
//! | Category | Room type | Room size | Spot class |
//! | Room | Room | Meeting room | Spot |
//! | Reservation | Booking | Meeting | Permit |

mod reservation;
mod room;

pub use reservation::{Reservation, ReservationData, RoomAssignment};
pub use room::{Property, Room};
