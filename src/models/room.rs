//! Room and property model.
//!
//! A property is the immutable set of physical rooms reservations can be
//! assigned to. Rooms are grouped into categories of interchangeable rooms.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::DomainError;

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Category the room belongs to.
    pub category_id: String,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
        }
    }
}

/// An immutable collection of rooms with category indices.
///
/// Built once from a room list and never mutated afterwards; share it by
/// reference (or `Arc`) wherever it is needed.
///
/// # Invariants
/// - At least one room.
/// - Room ids are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Room>", into = "Vec<Room>")]
pub struct Property {
    rooms: Vec<Room>,
    /// Categories in first-seen order.
    categories: Vec<String>,
    /// Category → indices into `rooms`, in declaration order.
    rooms_by_category: HashMap<String, Vec<usize>>,
    /// Room id → category id.
    category_by_room: HashMap<String, String>,
}

impl Property {
    /// Builds a property and its indices.
    ///
    /// Fails if `rooms` is empty or two rooms share an id.
    pub fn new(rooms: Vec<Room>) -> Result<Self, DomainError> {
        if rooms.is_empty() {
            return Err(DomainError::EmptyProperty);
        }

        let mut categories = Vec::new();
        let mut rooms_by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut category_by_room = HashMap::with_capacity(rooms.len());

        for (idx, room) in rooms.iter().enumerate() {
            if category_by_room
                .insert(room.id.clone(), room.category_id.clone())
                .is_some()
            {
                return Err(DomainError::DuplicateRoom(room.id.clone()));
            }
            match rooms_by_category.get_mut(&room.category_id) {
                Some(indices) => indices.push(idx),
                None => {
                    categories.push(room.category_id.clone());
                    rooms_by_category.insert(room.category_id.clone(), vec![idx]);
                }
            }
        }

        Ok(Self {
            rooms,
            categories,
            rooms_by_category,
            category_by_room,
        })
    }

    /// All rooms in declaration order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Category ids in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Rooms of a category in declaration order.
    ///
    /// Empty for an unknown category.
    pub fn rooms_of_category<'a>(&'a self, category_id: &str) -> impl Iterator<Item = &'a Room> {
        self.rooms_by_category
            .get(category_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.rooms[idx])
    }

    /// Category of a room, if the room exists.
    pub fn category_of_room(&self, room_id: &str) -> Option<&str> {
        self.category_by_room.get(room_id).map(String::as_str)
    }

    /// Whether the property has a room with this id.
    pub fn contains_room(&self, room_id: &str) -> bool {
        self.category_by_room.contains_key(room_id)
    }
}

impl TryFrom<Vec<Room>> for Property {
    type Error = DomainError;

    fn try_from(rooms: Vec<Room>) -> Result<Self, Self::Error> {
        Self::new(rooms)
    }
}

impl From<Property> for Vec<Room> {
    fn from(property: Property) -> Self {
        property.rooms
    }
}
