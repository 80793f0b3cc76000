//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CachedProvider;
use crate::network::SnapshotProvider;
use crate::planner::PlannerConfig;
use crate::waldo::WaldoRoster;

/// Transit provider shared by all planning requests.
pub type SharedProvider = CachedProvider<SnapshotProvider>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached transit data
    pub provider: Arc<SharedProvider>,

    /// Waldos fetched from the Waldo web service
    pub roster: WaldoRoster,

    /// Default planner configuration
    pub config: Arc<PlannerConfig>,

    /// How long a planning request may run
    pub plan_timeout: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        provider: SharedProvider,
        roster: WaldoRoster,
        config: PlannerConfig,
        plan_timeout: Duration,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            roster,
            config: Arc::new(config),
            plan_timeout,
        }
    }
}
