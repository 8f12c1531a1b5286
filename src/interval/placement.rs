//! Tightest-fit room placement.
//!
//! # Algorithm
//! For every room of the reservation's category, in property order:
//! 1. Reject the room if the reservation would overlap one of its stays.
//! 2. Measure the idle time left before the stay (since the nearest earlier
//!    departure) and after it (until the nearest later arrival). A missing
//!    neighbour counts as the empty-room gap, one month by default.
//! 3. Score = gap before + gap after.
//!
//! The room with the lowest score wins; ties go to the earlier room. Empty
//! rooms score twice the empty-room gap, so stays are packed into rooms that
//! are already in use and whole rooms are kept free.
//!
//! # Complexity
//! O(r + n log n) for r candidate rooms and n assigned reservations.

use chrono::TimeDelta;
use std::iter;
use tracing::trace;

use super::group_by_room_in_category;
use crate::config::PlacementConfig;
use crate::models::{Property, Reservation, RoomAssignment};
use crate::validation::check_no_overlaps_regardless_of_rooms;

/// Default idle time assumed when a room has no neighbouring stay.
pub const DEFAULT_EMPTY_ROOM_GAP_DAYS: i64 = 30;

/// A room that can take the reservation, with the idle time around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomFit<'p> {
    /// Candidate room.
    pub room_id: &'p str,
    /// Idle time between the previous departure and the check-in.
    pub gap_before: TimeDelta,
    /// Idle time between the check-out and the next arrival.
    pub gap_after: TimeDelta,
}

impl RoomFit<'_> {
    /// Total idle time around the stay; lower is a tighter fit.
    #[inline]
    pub fn score(&self) -> TimeDelta {
        self.gap_before + self.gap_after
    }
}

/// Places unassigned reservations into rooms by tightest fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPlacer {
    empty_room_gap: TimeDelta,
}

impl Default for RoomPlacer {
    fn default() -> Self {
        Self::new(TimeDelta::days(DEFAULT_EMPTY_ROOM_GAP_DAYS))
    }
}

impl RoomPlacer {
    /// Creates a placer with the given empty-room gap.
    pub fn new(empty_room_gap: TimeDelta) -> Self {
        Self { empty_room_gap }
    }

    /// Creates a placer from configuration.
    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(TimeDelta::days(config.empty_room_gap_days))
    }

    /// Idle time assumed when a side has no neighbouring stay.
    pub fn empty_room_gap(&self) -> TimeDelta {
        self.empty_room_gap
    }

    /// All rooms that can take `unassigned`, in property order.
    ///
    /// Only `assigned` reservations of the same category count as occupants.
    pub fn room_fits<'p>(
        &self,
        property: &'p Property,
        assigned: &[Reservation],
        unassigned: &Reservation,
    ) -> Vec<RoomFit<'p>> {
        let by_room = group_by_room_in_category(assigned, unassigned.category_id());

        property
            .rooms_of_category(unassigned.category_id())
            .filter_map(|room| {
                let key = RoomAssignment::Assigned(room.id.clone());
                let occupants = by_room.get(&key).map(Vec::as_slice).unwrap_or_default();

                if occupants.is_empty() {
                    return Some(RoomFit {
                        room_id: room.id.as_str(),
                        gap_before: self.empty_room_gap,
                        gap_after: self.empty_room_gap,
                    });
                }

                let with_candidate = occupants.iter().copied().chain(iter::once(unassigned));
                if check_no_overlaps_regardless_of_rooms(with_candidate).is_err() {
                    trace!(
                        event = "room_rejected",
                        reservation = unassigned.id(),
                        room = room.id.as_str(),
                    );
                    return None;
                }

                let gap_before = occupants
                    .iter()
                    .filter(|r| r.end() <= unassigned.start())
                    .map(|r| unassigned.start() - r.end())
                    .min()
                    .unwrap_or(self.empty_room_gap);
                let gap_after = occupants
                    .iter()
                    .filter(|r| r.start() >= unassigned.end())
                    .map(|r| r.start() - unassigned.end())
                    .min()
                    .unwrap_or(self.empty_room_gap);

                Some(RoomFit {
                    room_id: room.id.as_str(),
                    gap_before,
                    gap_after,
                })
            })
            .collect()
    }

    /// The tightest-fitting room for `unassigned`, or `None` if every room of
    /// its category is taken at that time.
    pub fn best_room_for<'p>(
        &self,
        property: &'p Property,
        assigned: &[Reservation],
        unassigned: &Reservation,
    ) -> Option<&'p str> {
        let best = self
            .room_fits(property, assigned, unassigned)
            .into_iter()
            .min_by_key(RoomFit::score)?;

        trace!(
            event = "room_chosen",
            reservation = unassigned.id(),
            room = best.room_id,
            idle_hours = best.score().num_hours(),
        );
        Some(best.room_id)
    }
}

/// [`RoomPlacer::best_room_for`] with the default one-month empty-room gap.
pub fn best_room_for<'p>(
    property: &'p Property,
    assigned: &[Reservation],
    unassigned: &Reservation,
) -> Option<&'p str> {
    RoomPlacer::default().best_room_for(property, assigned, unassigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::test_support::res;
    use crate::models::Room;
    use crate::validation::check_no_overlaps;

    fn property() -> Property {
        Property::new(vec![
            Room::new("R1", "K"),
            Room::new("R2", "K"),
            Room::new("R3", "K"),
            Room::new("S1", "S"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_property_rooms_pick_first() {
        let guest = res("g", "K", 5, 7, None);
        assert_eq!(best_room_for(&property(), &[], &guest), Some("R1"));
    }

    #[test]
    fn test_prefers_tightest_gap() {
        let assigned = vec![
            res("a", "K", 1, 4, Some("R1")),  // 1 day before the guest
            res("b", "K", 1, 5, Some("R2")),  // touches the guest
            res("c", "K", 7, 9, Some("R2")),  // touches the guest
        ];
        let guest = res("g", "K", 5, 7, None);
        assert_eq!(best_room_for(&property(), &assigned, &guest), Some("R2"));
    }

    #[test]
    fn test_used_room_beats_empty_room() {
        let assigned = vec![res("a", "K", 1, 3, Some("R2"))];
        let guest = res("g", "K", 10, 12, None);
        // R2: 7 days before + 30 days default after < 60 days for empty R1
        assert_eq!(best_room_for(&property(), &assigned, &guest), Some("R2"));
    }

    #[test]
    fn test_rejects_overlapping_rooms() {
        let assigned = vec![
            res("a", "K", 4, 6, Some("R1")),
            res("b", "K", 1, 10, Some("R2")),
            res("c", "K", 5, 8, Some("R3")),
        ];
        let guest = res("g", "K", 5, 7, None);
        assert_eq!(best_room_for(&property(), &assigned, &guest), None);
    }

    #[test]
    fn test_only_same_category_rooms() {
        let guest = res("g", "S", 5, 7, None);
        assert_eq!(best_room_for(&property(), &[], &guest), Some("S1"));

        let unknown = res("u", "X", 5, 7, None);
        assert_eq!(best_room_for(&property(), &[], &unknown), None);
    }

    #[test]
    fn test_room_fits_gaps() {
        let assigned = vec![
            res("a", "K", 1, 3, Some("R1")),
            res("b", "K", 9, 10, Some("R1")),
            res("far", "K", 20, 21, Some("R1")),
        ];
        let guest = res("g", "K", 5, 7, None);
        let prop = property();
        let fits = RoomPlacer::default().room_fits(&prop, &assigned, &guest);

        assert_eq!(fits.len(), 3);
        assert_eq!(fits[0].room_id, "R1");
        assert_eq!(fits[0].gap_before, TimeDelta::days(2));
        assert_eq!(fits[0].gap_after, TimeDelta::days(2));
        assert_eq!(fits[1].score(), TimeDelta::days(60));
    }

    #[test]
    fn test_tie_goes_to_property_order() {
        let assigned = vec![
            res("a", "K", 1, 5, Some("R2")),
            res("b", "K", 1, 5, Some("R3")),
        ];
        let guest = res("g", "K", 5, 6, None);
        assert_eq!(best_room_for(&property(), &assigned, &guest), Some("R2"));
    }

    #[test]
    fn test_custom_empty_room_gap() {
        let placer = RoomPlacer::new(TimeDelta::days(1));
        let assigned = vec![res("a", "K", 1, 2, Some("R2"))];
        let guest = res("g", "K", 10, 12, None);
        // R2: 8 days before + 1 day default; empty R1: 2 days
        assert_eq!(placer.best_room_for(&property(), &assigned, &guest), Some("R1"));
    }

    #[test]
    fn test_never_creates_overlap() {
        let mut assigned = vec![
            res("a", "K", 1, 5, Some("R1")),
            res("b", "K", 3, 8, Some("R2")),
            res("c", "K", 6, 9, Some("R1")),
        ];
        let guests = [
            res("g1", "K", 2, 4, None),
            res("g2", "K", 4, 7, None),
            res("g3", "K", 8, 12, None),
            res("g4", "K", 1, 3, None),
            res("g5", "K", 5, 6, None),
        ];
        for guest in &guests {
            if let Some(room) = best_room_for(&property(), &assigned, guest) {
                assigned.push(guest.with_room(room));
                assert!(check_no_overlaps(&assigned).is_ok());
            }
        }
    }
}
