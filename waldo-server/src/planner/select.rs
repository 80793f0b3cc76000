//! Candidate selection.
//!
//! Picks the route to ride from the buses currently at the boarding
//! candidates, then the stops to board and leave at.

use std::cmp::Ordering;

use crate::domain::{
    Bus, Coordinate, Direction, RouteNumber, StopId, TravelDirections, earliest_departure,
};

use super::config::RoutingPolicy;
use super::plan::NoTripReason;
use super::resolve::Resolution;

/// The chosen route and stop pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub route: RouteNumber,
    pub direction: Direction,
    pub board: StopId,
    pub disembark: StopId,
    /// Earliest known departure of the chosen route from `board`.
    pub departs_in: Option<u32>,
}

/// Buses on a common route heading one of `directions`.
///
/// A bus on a route that does not also serve the target's side can never
/// produce a disembarking stop, so it is dropped here.
pub fn eligible_buses<'a>(
    buses: &'a [Bus],
    directions: &TravelDirections,
    resolution: &Resolution,
) -> Vec<&'a Bus> {
    buses
        .iter()
        .filter(|bus| bus.heads_towards(directions))
        .filter(|bus| resolution.common_routes.contains(&bus.route))
        .filter(|bus| resolution.candidates_near_start.contains(&bus.stop))
        .collect()
}

/// The bus whose stop is nearest `to`.
///
/// Ties on distance go to the lower route number, then the lower stop
/// number, then the sooner known departure.
pub fn closest_bus<'a>(
    buses: &[&'a Bus],
    resolution: &Resolution,
    to: &Coordinate,
) -> Option<&'a Bus> {
    buses
        .iter()
        .filter_map(|bus| {
            let stop = resolution.stop(&bus.stop)?;
            Some((stop.location.distance_to(to), *bus))
        })
        .min_by(|(da, a), (db, b)| {
            da.total_cmp(db)
                .then_with(|| a.route.cmp(&b.route))
                .then_with(|| a.stop.cmp(&b.stop))
                .then_with(|| departure_order(a.minutes_to_departure, b.minutes_to_departure))
        })
        .map(|(_, bus)| bus)
}

/// Known departures first, soonest first.
fn departure_order(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Nearest stop to `to` among `ids`, ties to the lower stop number.
fn nearest_stop<'a>(
    ids: impl IntoIterator<Item = &'a StopId>,
    resolution: &Resolution,
    to: &Coordinate,
) -> Option<StopId> {
    ids.into_iter()
        .filter_map(|id| resolution.stop(id))
        .map(|stop| (stop.location.distance_to(to), stop.id))
        .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.cmp(b)))
        .map(|(_, id)| id)
}

/// Choose a route, direction and stop pair for travelling `start` to `end`.
pub fn select(
    resolution: &Resolution,
    buses: &[Bus],
    start: &Coordinate,
    end: &Coordinate,
    policy: &RoutingPolicy,
) -> Result<Selection, NoTripReason> {
    let directions = TravelDirections::between(start, end);
    let eligible = eligible_buses(buses, &directions, resolution);

    let closest_to_start = closest_bus(&eligible, resolution, start);
    let closest_to_end = closest_bus(&eligible, resolution, end);
    let (Some(closest_to_start), Some(closest_to_end)) = (closest_to_start, closest_to_end) else {
        return Err(NoTripReason::NoEligibleBus);
    };

    let anchor = match policy {
        RoutingPolicy::ClosestToRider => closest_to_start,
        RoutingPolicy::ClosestToTarget => closest_to_end,
        RoutingPolicy::Unrecognised(_) => return Err(NoTripReason::InvalidConfiguration),
    };
    let Some(direction) = anchor.direction else {
        return Err(NoTripReason::NoEligibleBus);
    };
    let route = anchor.route.clone();

    let on_route: Vec<&Bus> = eligible
        .iter()
        .copied()
        .filter(|bus| bus.route == route)
        .collect();

    let board = nearest_stop(on_route.iter().map(|bus| &bus.stop), resolution, start)
        .ok_or(NoTripReason::NoEligibleBus)?;

    let disembark = nearest_stop(
        resolution
            .candidates_near_end
            .iter()
            .filter(|id| resolution.stop(id).is_some_and(|s| s.serves(&route))),
        resolution,
        end,
    )
    .ok_or(NoTripReason::NoServingStop)?;

    let departs_in = earliest_departure(on_route.into_iter().filter(|bus| bus.stop == board));

    Ok(Selection {
        route,
        direction,
        board,
        disembark,
        departs_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stop;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn route(s: &str) -> RouteNumber {
        RouteNumber::parse(s).unwrap()
    }

    fn stop(id: u32, at: Coordinate, routes: &[&str]) -> Stop {
        Stop::new(StopId(id), format!("Stop {id}"), at, routes.iter().map(|r| route(r)))
    }

    fn bus(stop: u32, r: &str, direction: &str, minutes: i32) -> Bus {
        Bus::from_estimate(route(r), StopId(stop), direction, minutes)
    }

    fn start() -> Coordinate {
        coord(49.2606, -123.2460)
    }

    fn end() -> Coordinate {
        coord(49.2827, -123.1207)
    }

    /// Two boarding stops, A nearer the rider and B nearer the target.
    fn resolution() -> Resolution {
        Resolution::resolve(
            vec![
                stop(1, coord(49.2610, -123.2455), &["99", "25"]),
                stop(2, coord(49.2630, -123.2420), &["99", "25", "14"]),
            ],
            vec![
                stop(10, coord(49.2825, -123.1215), &["99"]),
                stop(11, coord(49.2830, -123.1200), &["25"]),
            ],
        )
    }

    #[test]
    fn eligibility_filters_direction_and_route() {
        let r = resolution();
        let buses = vec![
            bus(1, "99", "EAST", 3),
            bus(1, "99", "WEST", 3),
            bus(2, "14", "NORTH", 1),
            bus(2, "25", "north", 2),
            bus(2, "25", "OUTBOUND", 2),
        ];
        let dirs = TravelDirections::between(&start(), &end());

        let eligible = eligible_buses(&buses, &dirs, &r);

        assert_eq!(eligible.len(), 2);
        assert!(eligible.iter().all(|b| b.heads_towards(&dirs)));
        assert!(eligible.iter().all(|b| b.route != route("14")));
    }

    #[test]
    fn rider_policy_anchors_on_nearest_rider_stop() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", 7), bus(2, "25", "NORTH", 2)];

        let selection = select(&r, &buses, &start(), &end(), &RoutingPolicy::ClosestToRider).unwrap();

        assert_eq!(selection.route, route("99"));
        assert_eq!(selection.direction, Direction::East);
        assert_eq!(selection.board, StopId(1));
        assert_eq!(selection.disembark, StopId(10));
        assert_eq!(selection.departs_in, Some(7));
    }

    #[test]
    fn target_policy_anchors_on_nearest_target_stop() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", 7), bus(2, "25", "NORTH", 2)];

        let selection = select(&r, &buses, &start(), &end(), &RoutingPolicy::ClosestToTarget).unwrap();

        assert_eq!(selection.route, route("25"));
        assert_eq!(selection.direction, Direction::North);
        assert_eq!(selection.board, StopId(2));
        assert_eq!(selection.disembark, StopId(11));
        assert_eq!(selection.departs_in, Some(2));
    }

    #[test]
    fn board_stop_is_nearest_with_anchor_route() {
        let r = resolution();
        // The 99 calls at both; departures come from the boarding stop only.
        let buses = vec![
            bus(2, "99", "EAST", 1),
            bus(1, "99", "EAST", 12),
            bus(1, "99", "EAST", -3),
        ];

        let selection = select(&r, &buses, &start(), &end(), &RoutingPolicy::ClosestToTarget).unwrap();

        assert_eq!(selection.board, StopId(1));
        assert_eq!(selection.departs_in, Some(12));
    }

    #[test]
    fn unknown_departure_is_none() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", -1)];

        let selection = select(&r, &buses, &start(), &end(), &RoutingPolicy::ClosestToRider).unwrap();
        assert_eq!(selection.departs_in, None);
    }

    #[test]
    fn tie_goes_to_lower_route_number() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", 1), bus(1, "25", "EAST", 9)];
        let dirs = TravelDirections::between(&start(), &end());
        let eligible = eligible_buses(&buses, &dirs, &r);

        let closest = closest_bus(&eligible, &r, &start()).unwrap();
        assert_eq!(closest.route, route("25"));
    }

    #[test]
    fn tie_on_route_goes_to_known_departure() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", -1), bus(1, "99", "EAST", 5)];
        let dirs = TravelDirections::between(&start(), &end());
        let eligible = eligible_buses(&buses, &dirs, &r);

        let closest = closest_bus(&eligible, &r, &start()).unwrap();
        assert_eq!(closest.minutes_to_departure, Some(5));
    }

    #[test]
    fn no_eligible_bus() {
        let r = resolution();
        let buses = vec![bus(1, "99", "WEST", 1)];

        assert_eq!(
            select(&r, &buses, &start(), &end(), &RoutingPolicy::ClosestToRider),
            Err(NoTripReason::NoEligibleBus)
        );
        assert_eq!(
            select(&r, &[], &start(), &end(), &RoutingPolicy::ClosestToRider),
            Err(NoTripReason::NoEligibleBus)
        );
    }

    #[test]
    fn unrecognised_policy() {
        let r = resolution();
        let buses = vec![bus(1, "99", "EAST", 1)];

        assert_eq!(
            select(&r, &buses, &start(), &end(), &RoutingPolicy::parse("scenic")),
            Err(NoTripReason::InvalidConfiguration)
        );
    }
}
