//! Snapshot-backed transit provider.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::domain::{Bus, Coordinate, RouteNumber, Segment, Stop};
use crate::planner::{ProviderError, TransitProvider};

use super::convert::{NetworkSnapshot, convert_network};
use super::error::NetworkError;
use super::types::NetworkFile;

/// Answers planner queries from a network snapshot held in memory.
///
/// The snapshot can be swapped with [`SnapshotProvider::reload`] while
/// planning requests are in flight; each query sees one consistent
/// snapshot.
#[derive(Debug)]
pub struct SnapshotProvider {
    inner: RwLock<Arc<NetworkSnapshot>>,
    source: Option<PathBuf>,
}

impl SnapshotProvider {
    /// Create a provider over an already converted snapshot.
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            inner: RwLock::new(Arc::new(snapshot)),
            source: None,
        }
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(Self::new(parse_snapshot(json)?))
    }

    /// Load a snapshot file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let snapshot = read_snapshot(path)?;
        info!(
            path = %path.display(),
            stops = snapshot.stop_count(),
            routes = snapshot.route_count(),
            "loaded network snapshot"
        );

        Ok(Self {
            inner: RwLock::new(Arc::new(snapshot)),
            source: Some(path.to_path_buf()),
        })
    }

    /// Re-read the file this provider was loaded from.
    ///
    /// On failure the current snapshot is kept and the error returned.
    /// Returns the number of stops in the new snapshot.
    pub fn reload(&self) -> Result<usize, NetworkError> {
        let Some(path) = &self.source else {
            return Ok(self.snapshot().stop_count());
        };
        let snapshot = read_snapshot(path)?;
        let count = snapshot.stop_count();

        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
        info!(path = %path.display(), stops = count, "reloaded network snapshot");

        Ok(count)
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<NetworkSnapshot> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

fn read_snapshot(path: &Path) -> Result<NetworkSnapshot, NetworkError> {
    let json = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&json)
}

fn parse_snapshot(json: &str) -> Result<NetworkSnapshot, NetworkError> {
    let file: NetworkFile = serde_json::from_str(json).map_err(|e| NetworkError::Json {
        message: e.to_string(),
    })?;
    Ok(convert_network(&file))
}

impl TransitProvider for SnapshotProvider {
    fn stops_near(&self, at: &Coordinate, radius_m: f64) -> Result<Vec<Stop>, ProviderError> {
        Ok(self.snapshot().stops_near(at, radius_m))
    }

    fn buses_at(&self, stop: &Stop) -> Result<Vec<Bus>, ProviderError> {
        let snapshot = self.snapshot();
        if snapshot.stop(&stop.id).is_none() {
            return Err(ProviderError::UnknownStop(stop.id));
        }
        Ok(snapshot.buses_at(&stop.id).to_vec())
    }

    fn resolve_geometry(&self, route: &RouteNumber) -> Result<Vec<Segment>, ProviderError> {
        self.snapshot()
            .geometry(route)
            .map(<[Segment]>::to_vec)
            .ok_or_else(|| ProviderError::GeometryNotFound(route.clone()))
    }
}
