//! Real-time bus estimates.

use super::{Direction, RouteNumber, StopId, TravelDirections};

/// A bus currently serving a route at a stop.
///
/// Built from a raw estimate: the direction label is normalised once here
/// and negative departure estimates are recorded as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    pub route: RouteNumber,
    pub stop: StopId,
    /// `None` when the published label is not a compass word.
    pub direction: Option<Direction>,
    /// `None` when the estimate is negative or missing.
    pub minutes_to_departure: Option<u32>,
}

impl Bus {
    /// Create a bus from a raw estimate.
    pub fn from_estimate(
        route: RouteNumber,
        stop: StopId,
        direction_label: &str,
        minutes_to_departure: i32,
    ) -> Self {
        Self {
            route,
            stop,
            direction: Direction::parse_normalized(direction_label).ok(),
            minutes_to_departure: u32::try_from(minutes_to_departure).ok(),
        }
    }

    /// Whether this bus is heading in one of the given directions.
    pub fn heads_towards(&self, directions: &TravelDirections) -> bool {
        self.direction.is_some_and(|d| directions.contains(d))
    }
}

/// Earliest known departure among `buses`, ignoring unknown estimates.
pub fn earliest_departure<'a>(buses: impl IntoIterator<Item = &'a Bus>) -> Option<u32> {
    buses
        .into_iter()
        .filter_map(|b| b.minutes_to_departure)
        .min()
}
