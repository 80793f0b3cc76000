//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::domain::Coordinate;
use crate::planner::{PlanOutcome, PlanRequest, Planner, PlannerConfig, RoutingPolicy};
use crate::waldo::WaldoError;

use super::dto::*;
use super::state::AppState;
use super::task::{StoppableOutcome, run_with_deadline};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trip/plan", post(plan_trip))
        .route("/waldos", get(list_waldos).delete(clear_waldos))
        .route("/waldos/:name/trip", post(plan_trip_to_waldo))
        .route("/messages", get(list_messages))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a trip between two positions.
async fn plan_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanTripResponse>, AppError> {
    let req: PlanTripRequest = parse_body(&body)?;

    let start = req.start.to_coordinate().map_err(|e| AppError::BadRequest {
        message: format!("Invalid start: {e}"),
    })?;
    let end = req.end.to_coordinate().map_err(|e| AppError::BadRequest {
        message: format!("Invalid end: {e}"),
    })?;
    let config = request_config(&state.config, req.radius_m, req.policy.as_deref())?;

    let outcome = run_plan(&state, start, end, config).await?;
    Ok(Json(PlanTripResponse::from_outcome(&outcome)))
}

/// Plan a trip to a Waldo's last known position.
async fn plan_trip_to_waldo(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<PlanTripResponse>, AppError> {
    let req: WaldoTripRequest = parse_body(&body)?;

    let start = req.start.to_coordinate().map_err(|e| AppError::BadRequest {
        message: format!("Invalid start: {e}"),
    })?;
    let config = request_config(&state.config, req.radius_m, req.policy.as_deref())?;

    let waldo = state
        .roster
        .find(&name)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("No Waldo named {name}"),
        })?;
    info!(waldo = %waldo.name, last_seen = %waldo.last_updated, "planning trip to Waldo");

    let outcome = run_plan(&state, start, waldo.last_location, config).await?;
    Ok(Json(PlanTripResponse::from_outcome(&outcome)))
}

/// List Waldos, fetching `count` more first if asked.
async fn list_waldos(
    State(state): State<AppState>,
    Query(query): Query<WaldosQuery>,
) -> Result<Json<WaldosResponse>, AppError> {
    let waldos = match query.count {
        Some(count) => state.roster.fetch(count).await?,
        None => state.roster.waldos().await,
    };

    Ok(Json(WaldosResponse {
        waldos: waldos.iter().map(WaldoResult::from_waldo).collect(),
    }))
}

/// Forget all fetched Waldos.
async fn clear_waldos(State(state): State<AppState>) -> StatusCode {
    state.roster.clear().await;
    StatusCode::NO_CONTENT
}

/// Messages left for this session.
async fn list_messages(State(state): State<AppState>) -> Result<Json<MessagesResponse>, AppError> {
    state.roster.ensure_session().await?;
    let messages = state.roster.messages().await?;
    Ok(Json(MessagesResponse { messages }))
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "rejecting request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Apply per-request overrides to the configured planner settings.
fn request_config(
    base: &PlannerConfig,
    radius_m: Option<f64>,
    policy: Option<&str>,
) -> Result<PlannerConfig, AppError> {
    let mut config = base.clone();

    if let Some(radius_m) = radius_m {
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(AppError::BadRequest {
                message: format!("Invalid radius: {radius_m}"),
            });
        }
        config = config.with_radius(radius_m);
    }

    // An unknown policy is passed through; the planner refuses it.
    if let Some(policy) = policy {
        config = config.with_policy(RoutingPolicy::parse(policy));
    }

    Ok(config)
}

/// Run the planner on the blocking pool under the configured deadline.
async fn run_plan(
    state: &AppState,
    start: Coordinate,
    end: Coordinate,
    config: PlannerConfig,
) -> Result<PlanOutcome, AppError> {
    let provider = Arc::clone(&state.provider);
    let request = PlanRequest::new(start, end);

    let outcome = run_with_deadline(state.plan_timeout, move |stopper| {
        Planner::new(provider.as_ref(), &config)
            .plan(&request, stopper)
            .ok()
    })
    .await;

    match outcome {
        StoppableOutcome::Completed(outcome) => Ok(outcome),
        StoppableOutcome::TimedOut => Err(AppError::Timeout {
            message: format!("Planning took longer than {:?}", state.plan_timeout),
        }),
        StoppableOutcome::Panicked(e) => Err(AppError::Internal {
            message: format!("Planner failed: {e}"),
        }),
        StoppableOutcome::ChannelBreakdown => Err(AppError::Internal {
            message: "Planner ended without a result".to_string(),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<WaldoError> for AppError {
    fn from(e: WaldoError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Timeout { message }
            | AppError::Internal { message } => message,
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
