//! Interval reasoning over reservation sets.
//!
//! Answers "who occupies what, when":
//! - **Grouping**: reservations per room or per category
//! - **Timeslots**: sweep-line decomposition into maximal sub-intervals with a
//!   constant set of active reservations ([`compute_timeslots`])
//! - **Point queries**: reservations present at an instant ([`reservations_at`])
//! - **Placement**: tightest-fit room for an unassigned reservation
//!   ([`best_room_for`])
//!
//! All functions are pure and never mutate their input.
//!
//! # Reference
//! de Berg et al. (2008), "Computational Geometry", Ch. 2 (plane sweep)

mod placement;
mod timeslot;

pub use placement::{best_room_for, RoomFit, RoomPlacer, DEFAULT_EMPTY_ROOM_GAP_DAYS};
pub use timeslot::{compute_timeslots, reservations_at, ReservationsTimeslot};

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Reservation, RoomAssignment};

/// Groups reservations by room assignment.
///
/// Unassigned reservations share the [`RoomAssignment::Unassigned`] group.
/// Groups keep input order.
pub fn group_by_room(reservations: &[Reservation]) -> BTreeMap<&RoomAssignment, Vec<&Reservation>> {
    let mut groups: BTreeMap<&RoomAssignment, Vec<&Reservation>> = BTreeMap::new();
    for r in reservations {
        groups.entry(r.room()).or_default().push(r);
    }
    groups
}

/// Groups the reservations of one category by room assignment.
pub fn group_by_room_in_category<'a>(
    reservations: &'a [Reservation],
    category_id: &str,
) -> BTreeMap<&'a RoomAssignment, Vec<&'a Reservation>> {
    let mut groups: BTreeMap<&RoomAssignment, Vec<&Reservation>> = BTreeMap::new();
    for r in reservations.iter().filter(|r| r.category_id() == category_id) {
        groups.entry(r.room()).or_default().push(r);
    }
    groups
}

/// Groups reservations by category.
pub fn group_by_category(reservations: &[Reservation]) -> HashMap<&str, Vec<&Reservation>> {
    let mut groups: HashMap<&str, Vec<&Reservation>> = HashMap::new();
    for r in reservations {
        groups.entry(r.category_id()).or_default().push(r);
    }
    groups
}

/// Sorts by start, ascending (stable).
pub fn sort_by_start(reservations: &mut [Reservation]) {
    reservations.sort_by_key(Reservation::start);
}

/// Sorts by end, ascending (stable).
pub fn sort_by_end(reservations: &mut [Reservation]) {
    reservations.sort_by_key(Reservation::end);
}

/// Earliest start and latest end of a reservation set.
///
/// `None` for an empty set.
pub fn time_span(reservations: &[Reservation]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = reservations.iter().map(Reservation::start).min()?;
    let end = reservations.iter().map(Reservation::end).max()?;
    Some((start, end))
}

/// Sum of whole-day lengths.
pub fn total_days<'a>(reservations: impl IntoIterator<Item = &'a Reservation>) -> i64 {
    reservations.into_iter().map(Reservation::length_in_days).sum()
}
