//! Web layer for the Waldo trip planner.
//!
//! Provides JSON endpoints for planning trips and fetching Waldos.

mod dto;
mod routes;
mod state;
mod task;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, SharedProvider};
pub use task::{StoppableOutcome, run_with_deadline};
