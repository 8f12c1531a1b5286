//! Random demo data.
//!
//! Builds a single-category property and a batch of unassigned reservations
//! scattered over one month, for trying out strategies and evaluators.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::Rng;

use crate::error::DomainError;
use crate::models::{Property, Reservation, ReservationData, Room};

/// Random reservation set generator.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use room_allocation::generator::ReservationGenerator;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let (property, reservations) = ReservationGenerator::new()
///     .with_room_count(5)
///     .with_reservation_count(12)
///     .generate(&mut rng)
///     .unwrap();
///
/// assert_eq!(property.room_count(), 5);
/// assert_eq!(reservations.len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationGenerator {
    room_count: usize,
    reservation_count: usize,
    category_id: String,
    first_day: NaiveDateTime,
    max_start_offset_days: i64,
    max_length_days: i64,
}

impl Default for ReservationGenerator {
    fn default() -> Self {
        Self {
            room_count: 35,
            reservation_count: 100,
            category_id: "kat1".to_owned(),
            first_day: NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            max_start_offset_days: 30,
            max_length_days: 15,
        }
    }
}

impl ReservationGenerator {
    /// Generator with 35 rooms and 100 reservations in January 2020.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of rooms.
    pub fn with_room_count(mut self, room_count: usize) -> Self {
        self.room_count = room_count;
        self
    }

    /// Sets the number of reservations.
    pub fn with_reservation_count(mut self, reservation_count: usize) -> Self {
        self.reservation_count = reservation_count;
        self
    }

    /// Sets the category shared by all rooms and reservations.
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    /// Sets the earliest possible check-in.
    pub fn with_first_day(mut self, first_day: NaiveDateTime) -> Self {
        self.first_day = first_day;
        self
    }

    /// Sets the window check-ins are spread over, in days after the first day.
    pub fn with_max_start_offset_days(mut self, days: i64) -> Self {
        self.max_start_offset_days = days.max(0);
        self
    }

    /// Sets the longest stay in days (at least one).
    pub fn with_max_length_days(mut self, days: i64) -> Self {
        self.max_length_days = days.max(1);
        self
    }

    /// Generates a property and unassigned reservations `res0..`.
    ///
    /// Fails if the room count is zero or the category is empty.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<(Property, Vec<Reservation>), DomainError> {
        let rooms = (1..=self.room_count)
            .map(|i| Room::new(format!("room{i}"), self.category_id.as_str()))
            .collect();
        let property = Property::new(rooms)?;

        let reservations = (0..self.reservation_count)
            .map(|i| {
                let start = self.first_day
                    + TimeDelta::days(rng.random_range(0..=self.max_start_offset_days));
                let end = start + TimeDelta::days(rng.random_range(1..=self.max_length_days));
                ReservationData::new(format!("res{i}"), self.category_id.as_str(), start, end).build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((property, reservations))
    }
}
