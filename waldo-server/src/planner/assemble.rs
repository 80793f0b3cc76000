//! Trip assembly.

use crate::domain::{Coordinate, RouteNumber, Segment, Trip};

use super::plan::{NoTripReason, PlanOutcome};
use super::resolve::Resolution;
use super::select::Selection;

/// Decide the request without riding anything, if possible.
///
/// A stop near both ends means the ends are close; if they are also
/// within `radius_m` of each other the rider can walk. A shared stop with
/// the ends further apart than that yields no trip at all.
pub fn short_circuit(
    resolution: &Resolution,
    start: &Coordinate,
    end: &Coordinate,
    radius_m: f64,
) -> Option<PlanOutcome> {
    if !resolution.has_common_stops() {
        return None;
    }
    if start.distance_to(end) <= radius_m {
        Some(PlanOutcome::WalkingDistance)
    } else {
        Some(PlanOutcome::NoTrip(NoTripReason::SharedStopOutOfReach))
    }
}

/// Clip a route's geometry to the rectangle spanned by `start` and `end`.
///
/// Segments keep their original order; a segment with no point in range
/// is dropped.
pub fn clip_path(geometry: &[Segment], start: &Coordinate, end: &Coordinate) -> Vec<Segment> {
    geometry
        .iter()
        .filter_map(|segment| segment.clip_to(start, end))
        .collect()
}

/// Caption for the boarding stop.
pub fn board_caption(route: &RouteNumber, stop_name: &str, departs_in: Option<u32>) -> String {
    match departs_in {
        Some(minutes) => {
            format!("Board route {route} at {stop_name}, departs in {minutes} minutes")
        }
        None => format!("Board route {route} at {stop_name}, departure time unknown"),
    }
}

/// Caption for the disembarking stop.
pub fn disembark_caption(stop_name: &str) -> String {
    format!("Disembark at: {stop_name}")
}

/// Build the trip for `selection`, attaching captions to copies of the
/// chosen stops. Returns `None` if either stop is missing from
/// `resolution`.
pub fn assemble(
    resolution: &Resolution,
    selection: Selection,
    geometry: &[Segment],
    start: &Coordinate,
    end: &Coordinate,
) -> Option<Trip> {
    let mut board = resolution.stop(&selection.board)?.clone();
    let mut disembark = resolution.stop(&selection.disembark)?.clone();

    let caption = board_caption(&selection.route, &board.name, selection.departs_in);
    board.set_caption(caption);
    let caption = disembark_caption(&disembark.name);
    disembark.set_caption(caption);

    Some(Trip {
        board,
        disembark,
        direction: selection.direction,
        route: selection.route,
        departs_in: selection.departs_in,
        path: clip_path(geometry, start, end),
    })
}
