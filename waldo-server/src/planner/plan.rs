//! Trip planning driver.
//!
//! Runs one planning request against a [`TransitProvider`]: fetch stops
//! near both ends, resolve common routes, short-circuit when walking will
//! do, select a bus, then resolve and clip the route's geometry.
//!
//! The call is blocking and cooperative: the caller passes a stop flag,
//! checked between phases. A raised flag discards all partial work.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::domain::{Bus, Coordinate, RouteNumber, Segment, Stop, StopId, Trip};

use super::assemble::{assemble, short_circuit};
use super::config::PlannerConfig;
use super::resolve::Resolution;
use super::select::select;

/// Error from a transit-data collaborator call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The data source could not be reached or answered garbage
    #[error("transit data unavailable: {0}")]
    Unavailable(String),

    /// No geometry is known for the route
    #[error("no geometry for route {0}")]
    GeometryNotFound(RouteNumber),

    /// The stop is not part of the network
    #[error("unknown stop {0}")]
    UnknownStop(StopId),
}

/// Trait for the transit network the planner queries.
///
/// This abstraction allows the planner to be tested with mock data.
/// Implementations may block on I/O and must be safe to share between
/// concurrent planning requests.
pub trait TransitProvider {
    /// Stops within `radius_m` metres of `at`.
    fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Result<Vec<Stop>, ProviderError>;

    /// Current buses for the routes serving `stop`.
    fn buses_at(&self, stop: &Stop) -> Result<Vec<Bus>, ProviderError>;

    /// Full path geometry of `route`.
    fn resolve_geometry(&self, route: &RouteNumber) -> Result<Vec<Segment>, ProviderError>;
}

/// Why no transit plan was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTripReason {
    /// No route serves stops near both ends.
    NoCommonRoutes,
    /// A stop is near both ends but the ends are too far apart to walk.
    SharedStopOutOfReach,
    /// No bus at a boarding candidate heads the right way.
    NoEligibleBus,
    /// No stop near the target is served by the chosen route.
    NoServingStop,
    /// The routing policy setting is not understood.
    InvalidConfiguration,
}

impl fmt::Display for NoTripReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoTripReason::NoCommonRoutes => "no route serves both the start and the end",
            NoTripReason::SharedStopOutOfReach => {
                "a stop is shared by both ends but they are too far apart to walk"
            }
            NoTripReason::NoEligibleBus => "no bus nearby is heading the right way",
            NoTripReason::NoServingStop => "no stop near the end is served by the chosen route",
            NoTripReason::InvalidConfiguration => "routing policy is not recognised",
        };
        f.write_str(s)
    }
}

/// Result of a planning request.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    /// Ride a bus.
    Transit(Trip),
    /// Start and end are close enough to walk.
    WalkingDistance,
    /// No plan could be found.
    NoTrip(NoTripReason),
}

impl PlanOutcome {
    /// The transit trip, if one was planned.
    pub fn trip(&self) -> Option<&Trip> {
        match self {
            PlanOutcome::Transit(trip) => Some(trip),
            _ => None,
        }
    }

    /// Returns true for the walking-distance verdict.
    pub fn is_walking_distance(&self) -> bool {
        matches!(self, PlanOutcome::WalkingDistance)
    }
}

/// Error from planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The caller raised the stop flag
    #[error("planning was cancelled")]
    Cancelled,
}

/// Request for a trip plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    /// The rider's position.
    pub start: Coordinate,

    /// The target's position.
    pub end: Coordinate,
}

impl PlanRequest {
    /// Create a new request.
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self { start, end }
    }
}

/// Single-route trip planner.
pub struct Planner<'a, P: TransitProvider> {
    provider: &'a P,
    config: &'a PlannerConfig,
}

impl<'a, P: TransitProvider> Planner<'a, P> {
    /// Create a new planner.
    pub fn new(provider: &'a P, config: &'a PlannerConfig) -> Self {
        Self { provider, config }
    }

    /// Plan a trip from `request.start` to `request.end`.
    ///
    /// Collaborator failures are logged and treated as empty results, so
    /// the only error is cancellation through `stopper`.
    pub fn plan(&self, request: &PlanRequest, stopper: &AtomicBool) -> Result<PlanOutcome, PlanError> {
        let PlanRequest { start, end } = *request;
        let radius_m = self.config.radius_m;

        check_stop(stopper)?;
        let near_start = self.stops_near(&start, radius_m);
        check_stop(stopper)?;
        let near_end = self.stops_near(&end, radius_m);
        check_stop(stopper)?;

        let resolution = Resolution::resolve(near_start, near_end);
        debug!(
            near_start = resolution.near_start.len(),
            near_end = resolution.near_end.len(),
            common_routes = ?resolution.common_routes,
            common_stops = resolution.common_stops.len(),
            "resolved stops"
        );

        if let Some(outcome) = short_circuit(&resolution, &start, &end, radius_m) {
            debug!(?outcome, "short-circuited");
            return Ok(outcome);
        }

        if !self.config.policy.is_recognised() {
            warn!(policy = %self.config.policy, "refusing to plan with unrecognised routing policy");
            return Ok(PlanOutcome::NoTrip(NoTripReason::InvalidConfiguration));
        }

        if !resolution.has_common_routes() {
            return Ok(PlanOutcome::NoTrip(NoTripReason::NoCommonRoutes));
        }

        let mut buses = Vec::new();
        for stop in resolution.start_candidates() {
            check_stop(stopper)?;
            buses.extend(self.buses_at(stop));
        }
        check_stop(stopper)?;

        let selection = match select(&resolution, &buses, &start, &end, &self.config.policy) {
            Ok(selection) => selection,
            Err(reason) => {
                debug!(%reason, buses = buses.len(), "no selection");
                return Ok(PlanOutcome::NoTrip(reason));
            }
        };
        debug!(
            route = %selection.route,
            direction = %selection.direction,
            board = %selection.board,
            disembark = %selection.disembark,
            "selected route"
        );

        let geometry = match self.provider.resolve_geometry(&selection.route) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!(route = %selection.route, error = %e, "geometry unavailable, planning without path");
                Vec::new()
            }
        };
        check_stop(stopper)?;

        match assemble(&resolution, selection, &geometry, &start, &end) {
            Some(trip) => {
                info!(
                    route = %trip.route,
                    board = %trip.board.id,
                    disembark = %trip.disembark.id,
                    "planned trip"
                );
                Ok(PlanOutcome::Transit(trip))
            }
            None => Ok(PlanOutcome::NoTrip(NoTripReason::NoServingStop)),
        }
    }

    fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Vec<Stop> {
        self.provider.stops_near(at, radius_m).unwrap_or_else(|e| {
            warn!(%at, error = %e, "stop lookup failed");
            Vec::new()
        })
    }

    fn buses_at(&self, stop: &Stop) -> Vec<Bus> {
        self.provider.buses_at(stop).unwrap_or_else(|e| {
            warn!(stop = %stop.id, error = %e, "bus lookup failed");
            Vec::new()
        })
    }
}

fn check_stop(stopper: &AtomicBool) -> Result<(), PlanError> {
    if stopper.load(Ordering::Relaxed) {
        Err(PlanError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::domain::Direction;
    use crate::planner::RoutingPolicy;

    const UBC: (f64, f64) = (49.2606, -123.2460);
    const DOWNTOWN: (f64, f64) = (49.2827, -123.1207);

    fn coord((lat, lon): (f64, f64)) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn route(s: &str) -> RouteNumber {
        RouteNumber::parse(s).unwrap()
    }

    /// Mock provider with fixed stops, buses and geometry.
    #[derive(Default)]
    struct MockProvider {
        stops: Vec<Stop>,
        buses: HashMap<StopId, Vec<Bus>>,
        geometry: HashMap<RouteNumber, Vec<Segment>>,
        fail_stops: bool,
        fail_buses: bool,
        stops_calls: Cell<usize>,
        bus_calls: Cell<usize>,
        geometry_calls: Cell<usize>,
    }

    impl MockProvider {
        fn add_stop(&mut self, id: u32, at: (f64, f64), routes: &[&str]) {
            self.stops.push(Stop::new(
                StopId(id),
                format!("Stop {id}"),
                coord(at),
                routes.iter().map(|r| route(r)),
            ));
        }

        fn add_bus(&mut self, stop: u32, r: &str, direction: &str, minutes: i32) {
            self.buses
                .entry(StopId(stop))
                .or_default()
                .push(Bus::from_estimate(route(r), StopId(stop), direction, minutes));
        }
    }

    impl TransitProvider for MockProvider {
        fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Result<Vec<Stop>, ProviderError> {
            self.stops_calls.set(self.stops_calls.get() + 1);
            if self.fail_stops {
                return Err(ProviderError::Unavailable("connection refused".into()));
            }
            Ok(self
                .stops
                .iter()
                .filter(|s| s.location.distance_to(at) <= radius_m)
                .cloned()
                .collect())
        }

        fn buses_at(&self, stop: &Stop) -> Result<Vec<Bus>, ProviderError> {
            self.bus_calls.set(self.bus_calls.get() + 1);
            if self.fail_buses {
                return Err(ProviderError::Unavailable("timed out".into()));
            }
            Ok(self.buses.get(&stop.id).cloned().unwrap_or_default())
        }

        fn resolve_geometry(&self, r: &RouteNumber) -> Result<Vec<Segment>, ProviderError> {
            self.geometry_calls.set(self.geometry_calls.get() + 1);
            self.geometry
                .get(r)
                .cloned()
                .ok_or_else(|| ProviderError::GeometryNotFound(r.clone()))
        }
    }

    /// Two stops near UBC and one near downtown, all on the 99.
    fn ubc_to_downtown() -> MockProvider {
        let mut provider = MockProvider::default();
        provider.add_stop(50_913, (49.2610, -123.2450), &["99", "14"]);
        provider.add_stop(50_914, (49.2620, -123.2440), &["99"]);
        provider.add_stop(50_001, (49.2820, -123.1210), &["99"]);
        provider.add_bus(50_913, "99", "EAST", 4);
        provider.add_bus(50_914, "99", " east ", 9);
        provider.add_bus(50_913, "14", "NORTH", 2);
        provider.geometry.insert(
            route("99"),
            vec![Segment::new(vec![
                coord((49.2500, -123.2600)),
                coord((49.2620, -123.2000)),
                coord((49.2700, -123.1500)),
                coord((49.2900, -123.1000)),
            ])],
        );
        provider
    }

    fn plan(provider: &MockProvider, config: &PlannerConfig) -> PlanOutcome {
        let stopper = AtomicBool::new(false);
        Planner::new(provider, config)
            .plan(&PlanRequest::new(coord(UBC), coord(DOWNTOWN)), &stopper)
            .unwrap()
    }

    #[test]
    fn plans_route_99_from_ubc() {
        let provider = ubc_to_downtown();
        let outcome = plan(&provider, &PlannerConfig::default());

        let trip = outcome.trip().expect("expected a transit trip");
        assert_eq!(trip.route, route("99"));
        assert_eq!(trip.direction, Direction::East);
        assert_eq!(trip.board.id, StopId(50_913));
        assert_eq!(trip.disembark.id, StopId(50_001));
        assert_eq!(trip.departs_in, Some(4));
        assert!(trip.board.caption().unwrap().contains("4 minutes"));
        assert_eq!(trip.disembark.caption(), Some("Disembark at: Stop 50001"));
        assert!(!outcome.is_walking_distance());

        // Only the two inner points of the geometry lie between the ends.
        assert_eq!(trip.path_len(), 2);
        assert_eq!(provider.geometry_calls.get(), 1);
    }

    #[test]
    fn closest_to_target_policy() {
        let mut provider = ubc_to_downtown();
        // The 84 leaves from the stop furthest east, tying with the 99
        // there; the lower route number wins the tie.
        provider.stops[1] = Stop::new(
            StopId(50_914),
            "Stop 50914",
            coord((49.2620, -123.2440)),
            [route("99"), route("84")],
        );
        provider.add_stop(50_002, (49.2830, -123.1190), &["84"]);
        provider.add_bus(50_914, "84", "EAST", 6);

        let outcome = plan(&provider, &PlannerConfig::default());
        assert_eq!(outcome.trip().unwrap().route, route("99"));

        let config = PlannerConfig::default().with_policy(RoutingPolicy::ClosestToTarget);
        let outcome = plan(&provider, &config);
        let trip = outcome.trip().unwrap();
        assert_eq!(trip.route, route("84"));
        assert_eq!(trip.board.id, StopId(50_914));
        assert_eq!(trip.disembark.id, StopId(50_002));
        assert_eq!(trip.departs_in, Some(6));
        assert!(trip.path.is_empty());
    }

    #[test]
    fn walking_distance_short_circuits() {
        let mut provider = MockProvider::default();
        // About 50 m apart, with one stop between them.
        let start = (49.2827, -123.1207);
        let end = (49.28315, -123.1207);
        provider.add_stop(1, (49.2829, -123.1207), &["5"]);

        let stopper = AtomicBool::new(false);
        let config = PlannerConfig::default();
        let outcome = Planner::new(&provider, &config)
            .plan(&PlanRequest::new(coord(start), coord(end)), &stopper)
            .unwrap();

        assert!(outcome.is_walking_distance());
        assert!(outcome.trip().is_none());
        assert_eq!(provider.bus_calls.get(), 0);
    }

    #[test]
    fn shared_stop_out_of_reach() {
        let mut provider = MockProvider::default();
        // Ends about 800 m apart; one stop within 500 m of both.
        let start = (49.2800, -123.1200);
        let end = (49.2872, -123.1200);
        provider.add_stop(1, (49.2836, -123.1200), &["5"]);

        let stopper = AtomicBool::new(false);
        let config = PlannerConfig::default();
        let outcome = Planner::new(&provider, &config)
            .plan(&PlanRequest::new(coord(start), coord(end)), &stopper)
            .unwrap();

        assert!(matches!(
            outcome,
            PlanOutcome::NoTrip(NoTripReason::SharedStopOutOfReach)
        ));
    }

    #[test]
    fn no_common_routes() {
        let mut provider = MockProvider::default();
        provider.add_stop(1, (49.2610, -123.2450), &["99"]);
        provider.add_stop(2, (49.2820, -123.1210), &["4"]);
        provider.add_bus(1, "99", "EAST", 3);

        let outcome = plan(&provider, &PlannerConfig::default());

        assert!(matches!(outcome, PlanOutcome::NoTrip(NoTripReason::NoCommonRoutes)));
        assert_eq!(provider.bus_calls.get(), 0);
    }

    #[test]
    fn wrong_direction_buses_are_ignored() {
        let mut provider = MockProvider::default();
        provider.add_stop(1, (49.2610, -123.2450), &["99"]);
        provider.add_stop(2, (49.2820, -123.1210), &["99"]);
        provider.add_bus(1, "99", "WEST", 3);
        provider.add_bus(1, "99", "SOUTH", 5);

        let outcome = plan(&provider, &PlannerConfig::default());
        assert!(matches!(outcome, PlanOutcome::NoTrip(NoTripReason::NoEligibleBus)));
    }

    #[test]
    fn provider_failure_degrades_to_no_trip() {
        let mut provider = ubc_to_downtown();
        provider.fail_stops = true;
        let outcome = plan(&provider, &PlannerConfig::default());
        assert!(matches!(outcome, PlanOutcome::NoTrip(NoTripReason::NoCommonRoutes)));

        let mut provider = ubc_to_downtown();
        provider.fail_buses = true;
        let outcome = plan(&provider, &PlannerConfig::default());
        assert!(matches!(outcome, PlanOutcome::NoTrip(NoTripReason::NoEligibleBus)));
    }

    #[test]
    fn missing_geometry_still_plans() {
        let mut provider = ubc_to_downtown();
        provider.geometry.clear();

        let outcome = plan(&provider, &PlannerConfig::default());
        let trip = outcome.trip().unwrap();
        assert!(trip.path.is_empty());
    }

    #[test]
    fn unrecognised_policy_fails_closed() {
        let provider = ubc_to_downtown();
        let config = PlannerConfig::default().with_policy(RoutingPolicy::parse("fastest"));

        let outcome = plan(&provider, &config);

        assert!(matches!(
            outcome,
            PlanOutcome::NoTrip(NoTripReason::InvalidConfiguration)
        ));
        assert_eq!(provider.bus_calls.get(), 0);
    }

    #[test]
    fn raised_stopper_cancels_before_any_call() {
        let provider = ubc_to_downtown();
        let config = PlannerConfig::default();
        let stopper = AtomicBool::new(true);

        let result = Planner::new(&provider, &config)
            .plan(&PlanRequest::new(coord(UBC), coord(DOWNTOWN)), &stopper);

        assert_eq!(result.unwrap_err(), PlanError::Cancelled);
        assert_eq!(provider.stops_calls.get(), 0);
    }

    #[test]
    fn no_trip_reason_display() {
        assert_eq!(
            NoTripReason::InvalidConfiguration.to_string(),
            "routing policy is not recognised"
        );
    }
}
