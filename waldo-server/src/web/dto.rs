//! Request and response DTOs for the web API.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, InvalidCoordinate, Segment, Stop, Trip, Waldo};
use crate::planner::{NoTripReason, PlanOutcome};

/// Message shown when the rider can walk.
pub const WALKING_DISTANCE_MESSAGE: &str = "You are in walking distance!";

/// Message shown when no transit plan was found.
pub const NO_TRIP_MESSAGE: &str = "Unable to retrieve bus location info...";

/// A position in a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Validate into a domain coordinate.
    pub fn to_coordinate(self) -> Result<Coordinate, InvalidCoordinate> {
        Coordinate::new(self.lat, self.lon)
    }
}

impl From<&Coordinate> for LatLon {
    fn from(c: &Coordinate) -> Self {
        Self {
            lat: c.latitude(),
            lon: c.longitude(),
        }
    }
}

/// Request to plan a trip between two positions.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    /// The rider's position
    pub start: LatLon,

    /// The target's position
    pub end: LatLon,

    /// Override of the configured stop radius, in metres
    pub radius_m: Option<f64>,

    /// Override of the configured routing policy
    pub policy: Option<String>,
}

/// Request to plan a trip to a named Waldo.
#[derive(Debug, Deserialize)]
pub struct WaldoTripRequest {
    /// The rider's position
    pub start: LatLon,

    pub radius_m: Option<f64>,

    pub policy: Option<String>,
}

/// Query for listing Waldos.
#[derive(Debug, Deserialize)]
pub struct WaldosQuery {
    /// Fetch this many more Waldos before listing
    pub count: Option<u32>,
}

/// Outcome of a planning request.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    /// One of `transit`, `walking_distance` or `no_trip`
    pub outcome: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripResult>,

    /// Why no trip was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Text to show the rider
    pub message: String,
}

/// A planned transit trip.
#[derive(Debug, Serialize)]
pub struct TripResult {
    pub route: String,

    /// Direction of the bus to catch
    pub direction: String,

    pub board: StopResult,

    pub disembark: StopResult,

    /// Earliest known departure from the boarding stop
    pub departs_in_mins: Option<u32>,

    /// Route path between the ends, one polyline per piece
    pub path: Vec<Vec<LatLon>>,
}

/// A stop in a trip.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub number: u32,

    pub name: String,

    pub location: LatLon,

    pub caption: Option<String>,
}

/// A Waldo sighting.
#[derive(Debug, Serialize)]
pub struct WaldoResult {
    pub name: String,

    pub location: LatLon,

    /// RFC 3339 timestamp of the sighting
    pub last_updated: String,
}

/// Response for listing Waldos.
#[derive(Debug, Serialize)]
pub struct WaldosResponse {
    pub waldos: Vec<WaldoResult>,
}

/// Response for listing messages.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl PlanTripResponse {
    /// Create from a planner outcome.
    pub fn from_outcome(outcome: &PlanOutcome) -> Self {
        match outcome {
            PlanOutcome::Transit(trip) => Self {
                outcome: "transit",
                message: trip
                    .board
                    .caption()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Take route {}", trip.route)),
                trip: Some(TripResult::from_trip(trip)),
                reason: None,
            },
            PlanOutcome::WalkingDistance => Self {
                outcome: "walking_distance",
                trip: None,
                reason: None,
                message: WALKING_DISTANCE_MESSAGE.to_string(),
            },
            PlanOutcome::NoTrip(reason) => Self {
                outcome: "no_trip",
                trip: None,
                reason: Some(reason_code(reason).to_string()),
                message: NO_TRIP_MESSAGE.to_string(),
            },
        }
    }
}

/// Machine-readable code for a no-trip reason.
pub fn reason_code(reason: &NoTripReason) -> &'static str {
    match reason {
        NoTripReason::NoCommonRoutes => "no_common_routes",
        NoTripReason::SharedStopOutOfReach => "shared_stop_out_of_reach",
        NoTripReason::NoEligibleBus => "no_eligible_bus",
        NoTripReason::NoServingStop => "no_serving_stop",
        NoTripReason::InvalidConfiguration => "invalid_configuration",
    }
}

impl TripResult {
    /// Create from a domain Trip.
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            route: trip.route.to_string(),
            direction: trip.direction.to_string(),
            board: StopResult::from_stop(&trip.board),
            disembark: StopResult::from_stop(&trip.disembark),
            departs_in_mins: trip.departs_in,
            path: trip.path.iter().map(polyline).collect(),
        }
    }
}

fn polyline(segment: &Segment) -> Vec<LatLon> {
    segment.points().iter().map(LatLon::from).collect()
}

impl StopResult {
    /// Create from a domain Stop.
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            number: stop.id.0,
            name: stop.name.clone(),
            location: LatLon::from(&stop.location),
            caption: stop.caption().map(str::to_string),
        }
    }
}

impl WaldoResult {
    /// Create from a domain Waldo.
    pub fn from_waldo(waldo: &Waldo) -> Self {
        Self {
            name: waldo.name.clone(),
            location: LatLon::from(&waldo.last_location),
            last_updated: waldo.last_updated.to_rfc3339(),
        }
    }
}
