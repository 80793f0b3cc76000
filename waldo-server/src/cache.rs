//! Caching layer for transit provider queries.
//!
//! Route geometry rarely changes, so it is cached per route number for a
//! long time. Bus estimates go stale within a minute and are cached per
//! stop for a short time only, which still saves repeated lookups when
//! several planning requests start from the same place.
//!
//! Errors are never cached; a failed lookup is retried on the next call.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Bus, Coordinate, RouteNumber, Segment, Stop, StopId};
use crate::planner::{ProviderError, TransitProvider};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for route geometry.
    pub geometry_ttl: Duration,

    /// TTL for bus estimates.
    pub buses_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Create a new config with the given TTLs.
    pub fn new(geometry_ttl: Duration, buses_ttl: Duration) -> Self {
        Self {
            geometry_ttl,
            buses_ttl,
            ..Self::default()
        }
    }

    /// Set the maximum number of entries per cache.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = n;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geometry_ttl: Duration::from_secs(60 * 60),
            buses_ttl: Duration::from_secs(30),
            max_capacity: 1000,
        }
    }
}

/// Transit provider with caching.
///
/// Wraps any `TransitProvider` and caches geometry and bus lookups.
/// Proximity queries pass straight through.
pub struct CachedProvider<P> {
    inner: P,
    geometry: MokaCache<RouteNumber, Arc<Vec<Segment>>>,
    buses: MokaCache<StopId, Arc<Vec<Bus>>>,
}

impl<P: TransitProvider> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let geometry = MokaCache::builder()
            .time_to_live(config.geometry_ttl)
            .max_capacity(config.max_capacity)
            .build();
        let buses = MokaCache::builder()
            .time_to_live(config.buses_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            geometry,
            buses,
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics (for monitoring): geometry and bus entry counts.
    pub fn entry_counts(&self) -> (u64, u64) {
        self.geometry.run_pending_tasks();
        self.buses.run_pending_tasks();
        (self.geometry.entry_count(), self.buses.entry_count())
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.geometry.invalidate_all();
        self.buses.invalidate_all();
    }
}

impl<P: TransitProvider> TransitProvider for CachedProvider<P> {
    fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Result<Vec<Stop>, ProviderError> {
        self.inner.stops_near(at, radius_m)
    }

    fn buses_at(&self, stop: &Stop) -> Result<Vec<Bus>, ProviderError> {
        if let Some(cached) = self.buses.get(&stop.id) {
            trace!(stop = %stop.id, "bus cache hit");
            return Ok(cached.as_ref().clone());
        }

        let buses = self.inner.buses_at(stop)?;
        self.buses.insert(stop.id, Arc::new(buses.clone()));
        Ok(buses)
    }

    fn resolve_geometry(&self, route: &RouteNumber) -> Result<Vec<Segment>, ProviderError> {
        if let Some(cached) = self.geometry.get(route) {
            trace!(%route, "geometry cache hit");
            return Ok(cached.as_ref().clone());
        }

        let segments = self.inner.resolve_geometry(route)?;
        self.geometry
            .insert(route.clone(), Arc::new(segments.clone()));
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn route(s: &str) -> RouteNumber {
        RouteNumber::parse(s).unwrap()
    }

    /// Provider that counts calls and fails for route "X".
    #[derive(Default)]
    struct CountingProvider {
        stops: AtomicUsize,
        buses: AtomicUsize,
        geometry: AtomicUsize,
    }

    impl TransitProvider for CountingProvider {
        fn stops_near(&self, _at: &Coordinate, _radius_m: f64) -> Result<Vec<Stop>, ProviderError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn buses_at(&self, stop: &Stop) -> Result<Vec<Bus>, ProviderError> {
            self.buses.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Bus::from_estimate(route("99"), stop.id, "EAST", 4)])
        }

        fn resolve_geometry(&self, r: &RouteNumber) -> Result<Vec<Segment>, ProviderError> {
            self.geometry.fetch_add(1, Ordering::SeqCst);
            if r.as_str() == "X" {
                return Err(ProviderError::GeometryNotFound(r.clone()));
            }
            Ok(vec![Segment::new(vec![coord(49.0, -123.0)])])
        }
    }

    #[test]
    fn geometry_is_cached_per_route() {
        let cached = CachedProvider::new(CountingProvider::default(), &CacheConfig::default());

        let first = cached.resolve_geometry(&route("99")).unwrap();
        let second = cached.resolve_geometry(&route(" 99 ")).unwrap();
        cached.resolve_geometry(&route("14")).unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().geometry.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cached = CachedProvider::new(CountingProvider::default(), &CacheConfig::default());

        assert!(cached.resolve_geometry(&route("X")).is_err());
        assert!(cached.resolve_geometry(&route("X")).is_err());

        assert_eq!(cached.inner().geometry.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn buses_are_cached_per_stop() {
        let cached = CachedProvider::new(CountingProvider::default(), &CacheConfig::default());
        let stop = Stop::new(StopId(1), "A", coord(49.0, -123.0), [route("99")]);
        let other = Stop::new(StopId(2), "B", coord(49.0, -123.0), [route("99")]);

        assert_eq!(cached.buses_at(&stop).unwrap().len(), 1);
        assert_eq!(cached.buses_at(&stop).unwrap().len(), 1);
        cached.buses_at(&other).unwrap();

        assert_eq!(cached.inner().buses.load(Ordering::SeqCst), 2);
        assert_eq!(cached.entry_counts(), (0, 2));
    }

    #[test]
    fn stops_pass_through() {
        let cached = CachedProvider::new(CountingProvider::default(), &CacheConfig::default());

        cached.stops_near(&coord(49.0, -123.0), 500.0).unwrap();
        cached.stops_near(&coord(49.0, -123.0), 500.0).unwrap();

        assert_eq!(cached.inner().stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let cached = CachedProvider::new(CountingProvider::default(), &CacheConfig::default());

        cached.resolve_geometry(&route("99")).unwrap();
        cached.invalidate_all();
        cached.resolve_geometry(&route("99")).unwrap();

        assert_eq!(cached.inner().geometry.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::new(Duration::from_secs(10), Duration::from_secs(5))
            .with_max_capacity(50);
        assert_eq!(config.geometry_ttl, Duration::from_secs(10));
        assert_eq!(config.buses_ttl, Duration::from_secs(5));
        assert_eq!(config.max_capacity, 50);
    }
}
