//! Proximity and intersection resolution.
//!
//! Given the stops found near the rider and near the target, works out
//! which routes serve both ends and which stops are worth boarding or
//! leaving at. Stops are held in one arena keyed by stop number; every
//! derived collection is an ordered set of keys, so results do not depend
//! on the order the collaborator returned stops in.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{RouteNumber, Stop, StopId};

/// Stop and route sets for one planning request.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    stops: HashMap<StopId, Stop>,

    /// Stops within the radius of the rider.
    pub near_start: BTreeSet<StopId>,

    /// Stops within the radius of the target.
    pub near_end: BTreeSet<StopId>,

    /// Every route serving a stop near the rider.
    pub routes_at_start: BTreeSet<RouteNumber>,

    /// Every route serving a stop near the target.
    pub routes_at_end: BTreeSet<RouteNumber>,

    /// Routes serving both ends.
    pub common_routes: BTreeSet<RouteNumber>,

    /// Stops within the radius of both rider and target.
    pub common_stops: BTreeSet<StopId>,

    /// Stops near the rider served by at least one common route.
    pub candidates_near_start: BTreeSet<StopId>,

    /// Stops near the target served by at least one common route.
    pub candidates_near_end: BTreeSet<StopId>,
}

impl Resolution {
    /// Build the sets from the two proximity query results.
    pub fn resolve(
        near_start: impl IntoIterator<Item = Stop>,
        near_end: impl IntoIterator<Item = Stop>,
    ) -> Self {
        let mut stops = HashMap::new();
        let near_start = collect_into_arena(&mut stops, near_start);
        let near_end = collect_into_arena(&mut stops, near_end);

        let routes_at_start = routes_of(&stops, &near_start);
        let routes_at_end = routes_of(&stops, &near_end);

        let common_routes: BTreeSet<RouteNumber> = routes_at_start
            .intersection(&routes_at_end)
            .cloned()
            .collect();

        let common_stops: BTreeSet<StopId> = near_start.intersection(&near_end).copied().collect();

        let candidates_near_start = served_by_any(&stops, &near_start, &common_routes);
        let candidates_near_end = served_by_any(&stops, &near_end, &common_routes);

        Self {
            stops,
            near_start,
            near_end,
            routes_at_start,
            routes_at_end,
            common_routes,
            common_stops,
            candidates_near_start,
            candidates_near_end,
        }
    }

    /// Look up a stop seen by either proximity query.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Candidate stops near the rider, in stop-number order.
    pub fn start_candidates(&self) -> impl Iterator<Item = &Stop> {
        self.candidates_near_start
            .iter()
            .filter_map(|id| self.stops.get(id))
    }

    /// Candidate stops near the target, in stop-number order.
    pub fn end_candidates(&self) -> impl Iterator<Item = &Stop> {
        self.candidates_near_end
            .iter()
            .filter_map(|id| self.stops.get(id))
    }

    /// Returns true if some route serves both ends.
    pub fn has_common_routes(&self) -> bool {
        !self.common_routes.is_empty()
    }

    /// Returns true if some stop is near both ends.
    pub fn has_common_stops(&self) -> bool {
        !self.common_stops.is_empty()
    }
}

/// Insert stops into the arena, returning their keys. A stop already
/// present keeps its first copy.
fn collect_into_arena(
    arena: &mut HashMap<StopId, Stop>,
    stops: impl IntoIterator<Item = Stop>,
) -> BTreeSet<StopId> {
    stops
        .into_iter()
        .map(|stop| {
            let id = stop.id;
            arena.entry(id).or_insert(stop);
            id
        })
        .collect()
}

fn routes_of(arena: &HashMap<StopId, Stop>, ids: &BTreeSet<StopId>) -> BTreeSet<RouteNumber> {
    ids.iter()
        .filter_map(|id| arena.get(id))
        .flat_map(|stop| stop.routes().iter().cloned())
        .collect()
}

fn served_by_any(
    arena: &HashMap<StopId, Stop>,
    ids: &BTreeSet<StopId>,
    routes: &BTreeSet<RouteNumber>,
) -> BTreeSet<StopId> {
    ids.iter()
        .filter(|id| {
            arena
                .get(id)
                .is_some_and(|stop| !stop.routes().is_disjoint(routes))
        })
        .copied()
        .collect()
}
