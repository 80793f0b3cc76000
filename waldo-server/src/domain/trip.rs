//! Trip types.
//!
//! A `Trip` is a single-route transit plan: board one bus near the rider
//! and ride it to a stop near the target.

use super::{Direction, RouteNumber, Segment, Stop};

/// A planned transit trip.
#[derive(Debug, Clone)]
pub struct Trip {
    /// Where to get on, with its boarding caption attached.
    pub board: Stop,
    /// Where to get off, with its disembarking caption attached.
    pub disembark: Stop,
    /// Direction of the bus to catch.
    pub direction: Direction,
    /// Route to ride.
    pub route: RouteNumber,
    /// Earliest known departure from the boarding stop, in minutes.
    pub departs_in: Option<u32>,
    /// The part of the route's path between rider and target, one entry
    /// per source segment that contributed points.
    pub path: Vec<Segment>,
}

impl Trip {
    /// Total number of path points across all segments.
    pub fn path_len(&self) -> usize {
        self.path.iter().map(Segment::len).sum()
    }
}
