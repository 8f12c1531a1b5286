//! Structural validation of reservation sets.
//!
//! Checks that a reservation set is internally consistent and fits a
//! property before and after an optimizer touches it. Detects:
//! - Duplicate reservation IDs
//! - Rooms unknown to the property
//! - Rooms whose category differs from the reservation's category
//! - Overlapping stays in one room
//! - Reservations left without a room
//!
//! The `check_*` functions fail fast on the first violation.
//! [`validate_all`] collects every violation instead.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::interval::group_by_room;
use crate::models::{Property, Reservation, RoomAssignment};

/// Validation result.
pub type ValidationResult = Result<(), ValidationError>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Reservations involved in the violation.
    pub reservation_ids: Vec<String>,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Two reservations share the same ID.
    DuplicateId,
    /// A reservation references a room that doesn't exist.
    UnknownRoom,
    /// A reservation's room belongs to another category.
    CategoryMismatch,
    /// Two reservations occupy one room at the same time.
    OverlapDetected,
    /// Reservations without a room where one is required.
    MissingRoom,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        message: impl Into<String>,
        reservation_ids: Vec<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            reservation_ids,
        }
    }

    fn duplicate_id(id: &str) -> Self {
        Self::new(
            ValidationErrorKind::DuplicateId,
            format!("At least two reservations with id '{id}' detected"),
            vec![id.to_owned()],
        )
    }
}

/// Runs all fail-fast checks in order: unique ids, property fit, no overlaps.
///
/// Empty input is valid.
pub fn check_data(reservations: &[Reservation], property: &Property) -> ValidationResult {
    check_no_id_twice(reservations)?;
    check_reservations_against_property(reservations, property)?;
    check_no_overlaps(reservations)
}

/// Fails with `DuplicateId` on the first id seen twice.
pub fn check_no_id_twice(reservations: &[Reservation]) -> ValidationResult {
    match duplicate_ids(reservations).next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Indexes reservations by id.
///
/// Fails with `DuplicateId` under the same contract as [`check_no_id_twice`].
pub fn reservations_by_id(
    reservations: &[Reservation],
) -> Result<HashMap<&str, &Reservation>, ValidationError> {
    let mut by_id = HashMap::with_capacity(reservations.len());
    for r in reservations {
        if by_id.insert(r.id(), r).is_some() {
            return Err(ValidationError::duplicate_id(r.id()));
        }
    }
    Ok(by_id)
}

/// Calls [`check_reservation_against_property`] on each reservation.
pub fn check_reservations_against_property(
    reservations: &[Reservation],
    property: &Property,
) -> ValidationResult {
    reservations
        .iter()
        .try_for_each(|r| check_reservation_against_property(r, property))
}

/// Checks that an assigned room exists and belongs to the reservation's category.
///
/// Reservations without a room are exempt.
pub fn check_reservation_against_property(
    reservation: &Reservation,
    property: &Property,
) -> ValidationResult {
    let Some(room_id) = reservation.room_id() else {
        return Ok(());
    };

    match property.category_of_room(room_id) {
        None => Err(ValidationError::new(
            ValidationErrorKind::UnknownRoom,
            format!(
                "Reservation '{}': there is no room with id '{room_id}' in this property",
                reservation.id()
            ),
            vec![reservation.id().to_owned()],
        )),
        Some(category) if category != reservation.category_id() => Err(ValidationError::new(
            ValidationErrorKind::CategoryMismatch,
            format!(
                "Reservation '{}': category '{}' and room '{room_id}' (category '{category}') do not fit",
                reservation.id(),
                reservation.category_id()
            ),
            vec![reservation.id().to_owned()],
        )),
        Some(_) => Ok(()),
    }
}

/// Fails with `OverlapDetected` if two reservations share a room at the same time.
///
/// Unassigned reservations cannot conflict and are skipped. Touching stays
/// (check-out and check-in at the same instant) are legal.
pub fn check_no_overlaps(reservations: &[Reservation]) -> ValidationResult {
    for (room, group) in group_by_room(reservations) {
        if room.is_assigned() {
            check_no_overlaps_regardless_of_rooms(group)?;
        }
    }
    Ok(())
}

/// Fails with `OverlapDetected` if any two of the given reservations intersect,
/// whatever rooms they carry.
pub fn check_no_overlaps_regardless_of_rooms<'a>(
    reservations: impl IntoIterator<Item = &'a Reservation>,
) -> ValidationResult {
    match overlap_errors(reservations).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Fails with `MissingRoom` listing every reservation without a room.
pub fn check_all_have_a_room(reservations: &[Reservation]) -> ValidationResult {
    let missing: Vec<String> = reservations
        .iter()
        .filter(|r| !r.room().is_assigned())
        .map(|r| r.id().to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::MissingRoom,
            format!("The following reservations have no room set: {missing:?}"),
            missing,
        ))
    }
}

/// Validates a reservation set against a property, reporting every violation.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_all(
    reservations: &[Reservation],
    property: &Property,
) -> Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = duplicate_ids(reservations).collect();

    errors.extend(
        reservations
            .iter()
            .filter_map(|r| check_reservation_against_property(r, property).err()),
    );

    for (room, group) in group_by_room(reservations) {
        if room.is_assigned() {
            errors.extend(overlap_errors(group));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn duplicate_ids(reservations: &[Reservation]) -> impl Iterator<Item = ValidationError> + '_ {
    let mut seen = HashSet::new();
    reservations
        .iter()
        .filter(move |r| !seen.insert(r.id()))
        .map(|r| ValidationError::duplicate_id(r.id()))
}

/// Walks the reservations in start order and reports every stay that begins
/// before its predecessor ends.
fn overlap_errors<'a>(reservations: impl IntoIterator<Item = &'a Reservation>) -> Vec<ValidationError> {
    let mut ordered: Vec<&Reservation> = reservations.into_iter().collect();
    ordered.sort_by_key(|r| r.start());

    ordered
        .windows(2)
        .filter(|pair| pair[1].start() < pair[0].end())
        .map(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            let room = match next.room() {
                RoomAssignment::Assigned(id) => id.as_str(),
                RoomAssignment::Unassigned => "<none>",
            };
            ValidationError::new(
                ValidationErrorKind::OverlapDetected,
                format!(
                    "Reservation overlap found for room '{room}': '{}' [{} - {}) and '{}' [{} - {})",
                    prev.id(),
                    prev.start(),
                    prev.end(),
                    next.id(),
                    next.start(),
                    next.end()
                ),
                vec![prev.id().to_owned(), next.id().to_owned()],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReservationData, Room};
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn res(id: &str, from: u32, to: u32, room: Option<&str>) -> Reservation {
        let data = ReservationData::new(id, "K", day(from), day(to));
        let data = match room {
            Some(room) => data.with_room(room),
            None => data,
        };
        data.build().unwrap()
    }

    fn sample_property() -> Property {
        Property::new(vec![
            Room::new("R1", "K"),
            Room::new("R2", "K"),
            Room::new("S1", "suite"),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_input() {
        let reservations = vec![
            res("a", 1, 3, Some("R1")),
            res("b", 3, 5, Some("R1")),
            res("c", 2, 4, Some("R2")),
            res("d", 1, 9, None),
        ];
        assert!(check_data(&reservations, &sample_property()).is_ok());
        assert!(validate_all(&reservations, &sample_property()).is_ok());
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(check_data(&[], &sample_property()).is_ok());
        assert!(check_all_have_a_room(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let reservations = vec![res("res0", 1, 2, None), res("res0", 5, 6, None)];
        let err = check_data(&reservations, &sample_property()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicateId);
        assert_eq!(err.reservation_ids, vec!["res0".to_string()]);
    }

    #[test]
    fn test_reservations_by_id() {
        let reservations = vec![res("a", 1, 2, None), res("b", 2, 3, None)];
        let by_id = reservations_by_id(&reservations).unwrap();
        assert_eq!(by_id["b"].start(), day(2));

        let dup = vec![res("a", 1, 2, None), res("a", 2, 3, None)];
        assert_eq!(
            reservations_by_id(&dup).unwrap_err().kind,
            ValidationErrorKind::DuplicateId
        );
    }

    #[test]
    fn test_unknown_room() {
        let reservations = vec![res("a", 1, 2, Some("R9"))];
        let err = check_reservations_against_property(&reservations, &sample_property())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownRoom);
        assert!(err.message.contains("R9"));
    }

    #[test]
    fn test_category_mismatch() {
        let reservations = vec![res("a", 1, 2, Some("S1"))];
        let err = check_reservations_against_property(&reservations, &sample_property())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CategoryMismatch);
    }

    #[test]
    fn test_unassigned_exempt_from_property_check() {
        let reservations = vec![res("a", 1, 2, None)];
        assert!(check_reservations_against_property(&reservations, &sample_property()).is_ok());
    }

    #[test]
    fn test_overlap_detected() {
        let reservations = vec![res("a", 1, 4, Some("R1")), res("b", 3, 6, Some("R1"))];
        let err = check_no_overlaps(&reservations).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OverlapDetected);
        assert_eq!(err.reservation_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_overlap_detected_regardless_of_input_order() {
        // Long stay swallows a short one; input not sorted
        let reservations = vec![res("short", 3, 4, Some("R1")), res("long", 1, 10, Some("R1"))];
        assert!(check_no_overlaps(&reservations).is_err());
    }

    #[test]
    fn test_touching_is_legal() {
        let reservations = vec![res("a", 1, 3, Some("R1")), res("b", 3, 5, Some("R1"))];
        assert!(check_no_overlaps(&reservations).is_ok());
    }

    #[test]
    fn test_different_rooms_do_not_conflict() {
        let reservations = vec![res("a", 1, 4, Some("R1")), res("b", 2, 5, Some("R2"))];
        assert!(check_no_overlaps(&reservations).is_ok());
    }

    #[test]
    fn test_unassigned_never_conflict() {
        let reservations = vec![res("a", 1, 4, None), res("b", 1, 4, None)];
        assert!(check_no_overlaps(&reservations).is_ok());
        assert!(check_no_overlaps_regardless_of_rooms(&reservations).is_err());
    }

    #[test]
    fn test_missing_room_lists_all() {
        let reservations = vec![
            res("a", 1, 2, None),
            res("b", 1, 2, Some("R1")),
            res("c", 3, 4, None),
        ];
        let err = check_all_have_a_room(&reservations).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingRoom);
        assert_eq!(err.reservation_ids, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_check_data_order() {
        // Duplicate id and unknown room: the duplicate is reported first
        let reservations = vec![res("x", 1, 2, Some("R9")), res("x", 3, 4, None)];
        let err = check_data(&reservations, &sample_property()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_multiple_errors() {
        let reservations = vec![
            res("a", 1, 2, None),
            res("a", 1, 2, None),
            res("b", 1, 2, Some("R9")),
            res("c", 1, 5, Some("R1")),
            res("d", 2, 3, Some("R1")),
        ];
        let errors = validate_all(&reservations, &sample_property()).unwrap_err();
        let kinds: Vec<ValidationErrorKind> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateId));
        assert!(kinds.contains(&ValidationErrorKind::UnknownRoom));
        assert!(kinds.contains(&ValidationErrorKind::OverlapDetected));
        assert_eq!(errors.len(), 3);
    }

    /// Pairwise definition of overlap, compared with the sweep.
    #[test]
    fn test_overlap_check_matches_pairwise_definition() {
        let spans = [(1, 3), (3, 5), (2, 4), (6, 8), (5, 6), (7, 9), (1, 2)];
        for i in 0..spans.len() {
            for j in 0..spans.len() {
                if i == j {
                    continue;
                }
                let a = res("a", spans[i].0, spans[i].1, Some("R1"));
                let b = res("b", spans[j].0, spans[j].1, Some("R1"));
                let pairwise = a.start() < b.end() && b.start() < a.end();
                let reservations = vec![a, b];
                assert_eq!(check_no_overlaps(&reservations).is_err(), pairwise);
            }
        }
    }
}
