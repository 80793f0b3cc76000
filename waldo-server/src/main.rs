use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use waldo_server::cache::{CacheConfig, CachedProvider};
use waldo_server::network::SnapshotProvider;
use waldo_server::planner::{DEFAULT_RADIUS_M, PlannerConfig};
use waldo_server::waldo::{WaldoClient, WaldoClientConfig, WaldoRoster};
use waldo_server::web::{AppState, create_router};

const DEFAULT_NETWORK_FILE: &str = "data/network.json";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_PLAN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RELOAD_SECS: u64 = 5 * 60;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_secs(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(%name, %raw, default, "not a number of seconds, using default");
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("waldo_server=info")),
        )
        .init();

    // Planner settings, in the same form the preferences screen stored them
    let stop_distance = env_or("WALDO_STOP_DISTANCE", &DEFAULT_RADIUS_M.to_string());
    let routing_option = env_or("WALDO_ROUTING_OPTION", "closest_stop_me");
    let planner_config = PlannerConfig::from_settings(&stop_distance, &routing_option)
        .expect("Invalid planner settings");
    if !planner_config.policy.is_recognised() {
        warn!(policy = %planner_config.policy, "routing option not recognised; every trip will fail");
    }

    // Load the network snapshot (fail fast if unavailable)
    let network_file = env_or("WALDO_NETWORK_FILE", DEFAULT_NETWORK_FILE);
    let snapshot = SnapshotProvider::from_file(&network_file).expect("Failed to load network snapshot");
    let provider = CachedProvider::new(snapshot, &CacheConfig::default());

    // Waldo web service
    let mut waldo_config = WaldoClientConfig::new();
    if let Ok(url) = std::env::var("WALDO_SERVICE_URL") {
        waldo_config = waldo_config.with_base_url(url);
    }
    let waldo_client = WaldoClient::new(waldo_config).expect("Failed to create Waldo client");
    let roster = WaldoRoster::new(waldo_client, std::env::var("WALDO_NAME").ok());

    let plan_timeout = Duration::from_secs(env_secs(
        "WALDO_PLAN_TIMEOUT_SECS",
        DEFAULT_PLAN_TIMEOUT_SECS,
    ));

    // Build app state
    let state = AppState::new(provider, roster, planner_config, plan_timeout);

    // Spawn background task to reload the snapshot
    let reload_every = Duration::from_secs(env_secs("WALDO_RELOAD_SECS", DEFAULT_RELOAD_SECS));
    let reload_provider = Arc::clone(&state.provider);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(reload_every);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            let provider = Arc::clone(&reload_provider);
            let result = tokio::task::spawn_blocking(move || {
                let result = provider.inner().reload();
                if result.is_ok() {
                    provider.invalidate_all();
                }
                result
            })
            .await;
            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "failed to reload network snapshot"),
                Err(e) => error!(error = %e, "snapshot reload task failed"),
            }
        }
    });

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = env_or("WALDO_BIND", DEFAULT_BIND)
        .parse()
        .expect("WALDO_BIND is not a socket address");
    info!("Waldo trip planner listening on http://{addr}");
    info!("  GET    /health              - Health check");
    info!("  POST   /trip/plan           - Plan a trip between two points");
    info!("  GET    /waldos?count=N      - Fetch and list Waldos");
    info!("  DELETE /waldos              - Forget fetched Waldos");
    info!("  POST   /waldos/:name/trip   - Plan a trip to a Waldo");
    info!("  GET    /messages            - Messages for this session");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
