//! Reservation model.
//!
//! A reservation books one room of a category for the half-open interval
//! `[start, end)`. It may already be assigned to a physical room or still be
//! waiting for one.
//!
//! # Time Representation
//! Instants are local date-times without a zone. Day lengths are whole days
//! (truncated), so a 36 hour stay counts as one day.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Room assignment of a reservation.
///
/// Keeps "no room yet" apart from every real room id, so grouping by room can
/// never confuse the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum RoomAssignment {
    /// Not yet placed in a physical room.
    #[default]
    Unassigned,
    /// Placed in the room with this id.
    Assigned(String),
}

impl RoomAssignment {
    /// The room id, if assigned.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::Unassigned => None,
            Self::Assigned(id) => Some(id),
        }
    }

    /// Whether a real room is set.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl From<Option<String>> for RoomAssignment {
    fn from(room: Option<String>) -> Self {
        match room {
            Some(id) if !id.is_empty() => Self::Assigned(id),
            _ => Self::Unassigned,
        }
    }
}

impl From<RoomAssignment> for Option<String> {
    fn from(room: RoomAssignment) -> Self {
        match room {
            RoomAssignment::Unassigned => None,
            RoomAssignment::Assigned(id) => Some(id),
        }
    }
}

impl fmt::Display for RoomAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("<no room>"),
            Self::Assigned(id) => f.write_str(id),
        }
    }
}

/// Field bundle a [`Reservation`] is built from.
///
/// Carries no invariants of its own; [`Reservation::new`] checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationData {
    /// Unique reservation identifier.
    pub id: String,
    /// Check-in instant.
    pub start: NaiveDateTime,
    /// Check-out instant (exclusive).
    pub end: NaiveDateTime,
    /// If set, strategies must not move this reservation
    /// (e.g. a guest who has already checked in).
    #[serde(default)]
    pub fixed: bool,
    /// Requested room category.
    pub category_id: String,
    /// Assigned room. Must belong to `category_id` within the property.
    #[serde(default)]
    pub room: RoomAssignment,
}

impl ReservationData {
    /// Creates an unassigned, movable reservation draft.
    pub fn new(
        id: impl Into<String>,
        category_id: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            fixed: false,
            category_id: category_id.into(),
            room: RoomAssignment::Unassigned,
        }
    }

    /// Assigns a room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room = RoomAssignment::Assigned(room_id.into());
        self
    }

    /// Marks the reservation as fixed.
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Validates and builds the reservation.
    pub fn build(self) -> Result<Reservation, DomainError> {
        Reservation::new(self)
    }
}

/// An immutable reservation.
///
/// # Invariants
/// - `end > start`
/// - `category_id` is not empty
///
/// Reassigning a room yields a new value via [`Reservation::with_room`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ReservationData", into = "ReservationData")]
pub struct Reservation {
    id: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    fixed: bool,
    category_id: String,
    room: RoomAssignment,
}

impl Reservation {
    /// Builds a reservation, enforcing its invariants.
    pub fn new(data: ReservationData) -> Result<Self, DomainError> {
        if data.end <= data.start {
            return Err(DomainError::InvalidInterval(data.id));
        }
        if data.category_id.is_empty() {
            return Err(DomainError::MissingCategory(data.id));
        }
        Ok(Self {
            id: data.id,
            start: data.start,
            end: data.end,
            fixed: data.fixed,
            category_id: data.category_id,
            room: data.room,
        })
    }

    /// Reservation id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Check-in instant.
    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Check-out instant (exclusive).
    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether strategies must leave this reservation where it is.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Requested category.
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Room assignment.
    pub fn room(&self) -> &RoomAssignment {
        &self.room
    }

    /// Assigned room id, if any.
    pub fn room_id(&self) -> Option<&str> {
        self.room.room_id()
    }

    /// Copy of this reservation placed in another room.
    pub fn with_room(&self, room_id: impl Into<String>) -> Self {
        Self {
            room: RoomAssignment::Assigned(room_id.into()),
            ..self.clone()
        }
    }

    /// Copy of this reservation with the room cleared.
    pub fn without_room(&self) -> Self {
        Self {
            room: RoomAssignment::Unassigned,
            ..self.clone()
        }
    }

    /// Length of the stay.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of the stay in whole days (truncated).
    #[inline]
    pub fn length_in_days(&self) -> i64 {
        self.duration().num_days()
    }

    /// Whether the two `[start, end)` intervals intersect.
    ///
    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl TryFrom<ReservationData> for Reservation {
    type Error = DomainError;

    fn try_from(data: ReservationData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<Reservation> for ReservationData {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            start: r.start,
            end: r.end,
            fixed: r.fixed,
            category_id: r.category_id,
            room: r.room,
        }
    }
}
