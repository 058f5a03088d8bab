//! Room model.
//!
//! Rooms are the physical resources exams are seated in. Capacity is fixed
//! for the run; per-slot remaining capacity lives in the room allocator.

use serde::{Deserialize, Serialize};

/// An exam room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier from the rooms table.
    pub id: String,
    /// Room name. Allocation and duty bookkeeping are keyed on this.
    pub name: String,
    /// Seats (always >= 1 after ingestion).
    pub capacity: u32,
    /// Free-form room type (e.g. "Lecture Hall", "Lab").
    pub room_type: String,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            room_type: String::new(),
        }
    }

    /// Sets the room type.
    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    /// Largest single allocation this room accepts: `capacity / 2`, floored.
    #[inline]
    pub fn half_capacity(&self) -> u32 {
        self.capacity / 2
    }
}
