//! Bus stops.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Coordinate, RouteNumber};

/// The public number of a bus stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical stop where riders board or leave a bus.
///
/// Equality and hashing use the stop number only, so copies returned by
/// separate proximity queries deduplicate in sets.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub location: Coordinate,
    routes: BTreeSet<RouteNumber>,
    caption: Option<String>,
}

impl Stop {
    /// Create a stop served by the given routes.
    pub fn new(
        id: StopId,
        name: impl Into<String>,
        location: Coordinate,
        routes: impl IntoIterator<Item = RouteNumber>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            routes: routes.into_iter().collect(),
            caption: None,
        }
    }

    /// Routes serving this stop.
    pub fn routes(&self) -> &BTreeSet<RouteNumber> {
        &self.routes
    }

    /// Whether `route` calls at this stop.
    pub fn serves(&self, route: &RouteNumber) -> bool {
        self.routes.contains(route)
    }

    /// Display caption attached when the stop becomes part of a trip.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Attach a display caption.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
