//! Waldo targets.

use chrono::{DateTime, Utc};

use super::Coordinate;

/// A target whose last known position a rider can plan a trip to.
#[derive(Debug, Clone, PartialEq)]
pub struct Waldo {
    pub name: String,
    pub last_updated: DateTime<Utc>,
    pub last_location: Coordinate,
}

impl Waldo {
    /// Create a Waldo sighting.
    pub fn new(name: impl Into<String>, last_updated: DateTime<Utc>, last_location: Coordinate) -> Self {
        Self {
            name: name.into(),
            last_updated,
            last_location,
        }
    }

    /// Whether `name` refers to this Waldo (case-insensitive, trimmed).
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}
