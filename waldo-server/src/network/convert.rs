//! Conversion from snapshot DTOs to domain types.
//!
//! Invalid entries are logged and skipped rather than failing the whole
//! snapshot: one bad stop should not take the planner offline.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::domain::{Bus, Coordinate, RouteNumber, Segment, Stop, StopId};

use super::types::{BusDto, NetworkFile, RouteDto, StopDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Stop position out of range
    #[error("stop {stop}: {message}")]
    InvalidStopLocation { stop: u32, message: String },

    /// Route number could not be parsed
    #[error("invalid route number {0:?}")]
    InvalidRoute(String),

    /// Bus estimate for a stop the snapshot does not contain
    #[error("bus on route {route} refers to unknown stop {stop}")]
    UnknownStop { route: String, stop: u32 },

    /// Route geometry point out of range
    #[error("route {route}: {message}")]
    InvalidPoint { route: String, message: String },
}

/// A validated, read-only view of the transit network.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    stops: BTreeMap<StopId, Stop>,
    buses: HashMap<StopId, Vec<Bus>>,
    geometry: HashMap<RouteNumber, Vec<Segment>>,
}

impl NetworkSnapshot {
    /// Stops within `radius_m` metres of `at`, in stop-number order.
    pub fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Vec<Stop> {
        self.stops
            .values()
            .filter(|stop| stop.location.distance_to(at) <= radius_m)
            .cloned()
            .collect()
    }

    /// Look up a stop by number.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Current estimates at a stop.
    pub fn buses_at(&self, id: &StopId) -> &[Bus] {
        self.buses.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Geometry of a route, if the snapshot has any.
    pub fn geometry(&self, route: &RouteNumber) -> Option<&[Segment]> {
        self.geometry.get(route).map(Vec::as_slice)
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of routes with geometry.
    pub fn route_count(&self) -> usize {
        self.geometry.len()
    }
}

/// Convert a snapshot file, skipping invalid entries.
pub fn convert_network(file: &NetworkFile) -> NetworkSnapshot {
    let mut snapshot = NetworkSnapshot::default();

    for dto in &file.stops {
        match convert_stop(dto) {
            Ok(stop) => {
                snapshot.stops.insert(stop.id, stop);
            }
            Err(e) => warn!(error = %e, "skipping stop"),
        }
    }

    for dto in &file.buses {
        match convert_bus(dto, &snapshot.stops) {
            Ok(bus) => snapshot.buses.entry(bus.stop).or_default().push(bus),
            Err(e) => warn!(error = %e, "skipping bus estimate"),
        }
    }

    for dto in &file.routes {
        match convert_route(dto) {
            Ok((route, segments)) => {
                snapshot.geometry.insert(route, segments);
            }
            Err(e) => warn!(error = %e, "skipping route geometry"),
        }
    }

    snapshot
}

/// Convert a single stop. Unparseable route numbers are dropped from the
/// stop's route set.
pub fn convert_stop(dto: &StopDto) -> Result<Stop, ConversionError> {
    let location =
        Coordinate::new(dto.lat, dto.lon).map_err(|e| ConversionError::InvalidStopLocation {
            stop: dto.number,
            message: e.to_string(),
        })?;

    let routes = dto.routes.iter().filter_map(|raw| match RouteNumber::parse(raw) {
        Ok(route) => Some(route),
        Err(_) => {
            warn!(stop = dto.number, route = %raw, "ignoring invalid route number");
            None
        }
    });

    Ok(Stop::new(
        StopId(dto.number),
        dto.name.trim(),
        location,
        routes,
    ))
}

/// Convert a single estimate. The direction label is normalised here and a
/// negative estimate becomes unknown.
pub fn convert_bus(
    dto: &BusDto,
    stops: &BTreeMap<StopId, Stop>,
) -> Result<Bus, ConversionError> {
    let route =
        RouteNumber::parse(&dto.route).map_err(|_| ConversionError::InvalidRoute(dto.route.clone()))?;

    let stop = StopId(dto.stop);
    if !stops.contains_key(&stop) {
        return Err(ConversionError::UnknownStop {
            route: dto.route.clone(),
            stop: dto.stop,
        });
    }

    Ok(Bus::from_estimate(route, stop, &dto.direction, dto.minutes))
}

/// Convert a route's geometry.
pub fn convert_route(dto: &RouteDto) -> Result<(RouteNumber, Vec<Segment>), ConversionError> {
    let route =
        RouteNumber::parse(&dto.number).map_err(|_| ConversionError::InvalidRoute(dto.number.clone()))?;

    let segments = dto
        .segments
        .iter()
        .map(|points| {
            points
                .iter()
                .map(|[lat, lon]| {
                    Coordinate::new(*lat, *lon).map_err(|e| ConversionError::InvalidPoint {
                        route: dto.number.clone(),
                        message: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Segment::new)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((route, segments))
}
