//! Sweep-line timeslot decomposition.
//!
//! # Algorithm
//! 1. Sort reservations by start.
//! 2. Keep the active reservations ordered by end, soonest-ending last.
//! 3. Before admitting a reservation, drain every active one that ends at or
//!    before its start; each distinct end closes the open timeslot there.
//! 4. Admit the reservation; open a timeslot at its start, or widen the open
//!    one if it starts at the same instant.
//! 5. Drain what is left, one boundary per distinct end.
//!
//! The result is ordered, contiguous and non-overlapping, and covers
//! `[min start, max end]` exactly. Gaps between stays appear as timeslots
//! with no reservations.
//!
//! # Complexity
//! O(n log n + n·k) where k is the peak number of concurrent reservations.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::Reservation;

/// A maximal interval during which the set of active reservations is constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationsTimeslot {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
    /// Reservations whose stay covers the whole interval.
    pub reservations: Vec<Reservation>,
}

impl ReservationsTimeslot {
    /// Length of the timeslot.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether an instant falls within `[start, end)`.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }
}

/// A timeslot whose end is not known yet.
struct OpenSlot {
    start: NaiveDateTime,
    reservations: Vec<Reservation>,
}

impl OpenSlot {
    fn new(start: NaiveDateTime, active: &[&Reservation]) -> Self {
        Self {
            start,
            reservations: snapshot(active),
        }
    }

    fn close(self, end: NaiveDateTime) -> ReservationsTimeslot {
        ReservationsTimeslot {
            start: self.start,
            end,
            reservations: self.reservations,
        }
    }
}

#[derive(Default)]
struct Sweep {
    closed: Vec<ReservationsTimeslot>,
    open: Option<OpenSlot>,
}

impl Sweep {
    /// The active set changed at `at`: close the open slot there and open a
    /// new one, or refresh the open slot if it already starts at `at`.
    fn advance(&mut self, at: NaiveDateTime, active: &[&Reservation]) {
        match self.open.take() {
            Some(mut open) if open.start == at => {
                open.reservations = snapshot(active);
                self.open = Some(open);
            }
            Some(open) => {
                self.closed.push(open.close(at));
                self.open = Some(OpenSlot::new(at, active));
            }
            None => self.open = Some(OpenSlot::new(at, active)),
        }
    }

    fn finish(mut self, at: NaiveDateTime) -> Vec<ReservationsTimeslot> {
        if let Some(open) = self.open.take() {
            self.closed.push(open.close(at));
        }
        self.closed
    }
}

/// Active set ordered by start, then id, independent of input order.
fn snapshot(active: &[&Reservation]) -> Vec<Reservation> {
    let mut reservations: Vec<Reservation> = active.iter().map(|&r| r.clone()).collect();
    reservations.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.id().cmp(b.id())));
    reservations
}

/// Decomposes a reservation set into timeslots.
///
/// Each timeslot holds exactly the reservations whose `[start, end)` contains
/// it. An empty input yields no timeslots.
pub fn compute_timeslots(reservations: &[Reservation]) -> Vec<ReservationsTimeslot> {
    let mut ordered: Vec<&Reservation> = reservations.iter().collect();
    ordered.sort_by_key(|r| r.start());

    // Ordered by end descending: the soonest-ending reservation is last.
    let mut active: Vec<&Reservation> = Vec::new();
    let mut sweep = Sweep::default();

    for res in ordered {
        while let Some(ending) = active.last().copied() {
            if ending.end() > res.start() {
                break;
            }
            active.pop();
            sweep.advance(ending.end(), &active);
        }

        let pos = active.partition_point(|a| a.end() > res.end());
        active.insert(pos, res);
        sweep.advance(res.start(), &active);
    }

    let mut last_end = None;
    while let Some(ending) = active.pop() {
        let end = ending.end();
        while active.last().is_some_and(|r| r.end() == end) {
            active.pop();
        }
        if !active.is_empty() {
            sweep.advance(end, &active);
        }
        last_end = Some(end);
    }

    match last_end {
        Some(end) => sweep.finish(end),
        None => Vec::new(),
    }
}

/// Reservations present at an instant.
///
/// - Before the first timeslot or after the last: empty.
/// - Strictly inside a timeslot: that timeslot's reservations.
/// - On a boundary shared by two timeslots: the union of both, since the
///   departing and the arriving guest are both present at that instant.
/// - At the very end of the last timeslot: the last timeslot's reservations.
pub fn reservations_at(timeslots: &[ReservationsTimeslot], at: NaiveDateTime) -> Vec<Reservation> {
    let (Some(first), Some(last)) = (timeslots.first(), timeslots.last()) else {
        return Vec::new();
    };
    if at < first.start || at > last.end {
        return Vec::new();
    }

    for (idx, slot) in timeslots.iter().enumerate() {
        if at < slot.end {
            return slot.reservations.clone();
        }
        if at == slot.end {
            return match timeslots.get(idx + 1) {
                Some(next) => union(&slot.reservations, &next.reservations),
                None => slot.reservations.clone(),
            };
        }
    }
    Vec::new()
}

fn union(a: &[Reservation], b: &[Reservation]) -> Vec<Reservation> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(a.len() + b.len());
    a.iter()
        .chain(b)
        .filter(|r| seen.insert(r.id()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::test_support::{day, res};

    fn ids(reservations: &[Reservation]) -> Vec<&str> {
        let mut ids: Vec<&str> = reservations.iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids
    }

    fn assert_contiguous(slots: &[ReservationsTimeslot]) {
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for slot in slots {
            assert!(slot.start < slot.end, "zero-length timeslot {slot:?}");
        }
    }

    /// Each timeslot holds exactly the reservations covering it.
    fn assert_exact_sets(input: &[Reservation], slots: &[ReservationsTimeslot]) {
        for slot in slots {
            let mut expected: Vec<&str> = input
                .iter()
                .filter(|r| r.start() <= slot.start && r.end() >= slot.end)
                .map(|r| r.id())
                .collect();
            expected.sort_unstable();
            assert_eq!(ids(&slot.reservations), expected, "slot {slot:?}");
        }
    }

    fn sample() -> Vec<Reservation> {
        vec![
            res("a", "K", 1, 4, None),
            res("b", "K", 2, 6, None),
            res("c", "K", 2, 3, None),
            res("d", "K", 6, 8, None),
            res("e", "K", 10, 12, None),
            res("f", "K", 10, 12, None),
        ]
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_timeslots(&[]).is_empty());
        assert!(reservations_at(&[], day(1)).is_empty());
    }

    #[test]
    fn test_single_reservation() {
        let input = vec![res("a", "K", 1, 3, None)];
        let slots = compute_timeslots(&input);
        assert_eq!(slots.len(), 1);
        assert_eq!((slots[0].start, slots[0].end), (day(1), day(3)));
        assert_eq!(ids(&slots[0].reservations), vec!["a"]);
    }

    #[test]
    fn test_back_to_back() {
        let input = vec![res("a", "K", 1, 3, None), res("b", "K", 3, 5, None)];
        let slots = compute_timeslots(&input);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].end, day(3));
        assert_eq!(ids(&slots[1].reservations), vec!["b"]);
    }

    #[test]
    fn test_gap_becomes_empty_timeslot() {
        let input = vec![res("a", "K", 1, 2, None), res("b", "K", 3, 4, None)];
        let slots = compute_timeslots(&input);
        assert_eq!(slots.len(), 3);
        assert_eq!((slots[1].start, slots[1].end), (day(2), day(3)));
        assert!(slots[1].reservations.is_empty());
    }

    #[test]
    fn test_decomposition_covers_span() {
        let input = sample();
        let slots = compute_timeslots(&input);

        assert_eq!(slots.first().unwrap().start, day(1));
        assert_eq!(slots.last().unwrap().end, day(12));
        assert_contiguous(&slots);
        assert_exact_sets(&input, &slots);

        let boundaries: Vec<NaiveDateTime> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            boundaries,
            vec![day(1), day(2), day(3), day(4), day(6), day(8), day(10)]
        );
    }

    #[test]
    fn test_simultaneous_ends_collapse() {
        let input = vec![
            res("a", "K", 1, 5, None),
            res("b", "K", 2, 5, None),
            res("c", "K", 3, 5, None),
            res("d", "K", 7, 8, None),
        ];
        let slots = compute_timeslots(&input);
        assert_contiguous(&slots);
        assert_exact_sets(&input, &slots);
        // [1,2) [2,3) [3,5) [5,7) [7,8)
        assert_eq!(slots.len(), 5);
    }

    #[test]
    fn test_simultaneous_starts_merge() {
        let input = vec![res("a", "K", 1, 3, None), res("b", "K", 1, 4, None)];
        let slots = compute_timeslots(&input);
        assert_eq!(slots.len(), 2);
        assert_eq!(ids(&slots[0].reservations), vec!["a", "b"]);
        assert_eq!(ids(&slots[1].reservations), vec!["b"]);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let mut input = sample();
        input.reverse();
        let slots = compute_timeslots(&input);
        assert_eq!(slots, compute_timeslots(&sample()));
    }

    #[test]
    fn test_reservations_at_inside() {
        let slots = compute_timeslots(&sample());
        let at = day(2) + TimeDelta::hours(12);
        assert_eq!(ids(&reservations_at(&slots, at)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reservations_at_boundary_is_union() {
        let slots = compute_timeslots(&sample());
        // c leaves at day 3; a and b stay
        assert_eq!(ids(&reservations_at(&slots, day(3))), vec!["a", "b", "c"]);
        // b leaves and d arrives at day 6
        assert_eq!(ids(&reservations_at(&slots, day(6))), vec!["b", "d"]);
    }

    #[test]
    fn test_reservations_at_outside() {
        let slots = compute_timeslots(&sample());
        assert!(reservations_at(&slots, day(1) - TimeDelta::seconds(1)).is_empty());
        assert!(reservations_at(&slots, day(13)).is_empty());
        // Inside the empty gap timeslot
        assert!(reservations_at(&slots, day(9)).is_empty());
    }

    #[test]
    fn test_reservations_at_final_end() {
        let slots = compute_timeslots(&sample());
        assert_eq!(ids(&reservations_at(&slots, day(12))), vec!["e", "f"]);
    }

    #[test]
    fn test_timeslot_contains() {
        let slot = ReservationsTimeslot {
            start: day(1),
            end: day(3),
            reservations: Vec::new(),
        };
        assert!(slot.contains(day(1)));
        assert!(slot.contains(day(2)));
        assert!(!slot.contains(day(3)));
        assert_eq!(slot.duration(), TimeDelta::days(2));
    }
}
