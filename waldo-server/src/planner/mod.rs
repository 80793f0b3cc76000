//! Single-route trip planner.
//!
//! This module implements the core planning algorithm that answers:
//! "I'm standing here and Waldo was last seen there - which bus do I
//! catch, where do I get on, and where do I get off?"
//!
//! Stops near each end are gathered from a [`TransitProvider`], reduced
//! to the routes serving both ends, and a single bus heading the right
//! way is chosen by the configured [`RoutingPolicy`]. Ends close enough
//! together short-circuit to a walking-distance verdict.

mod assemble;
mod config;
mod plan;
mod resolve;
mod select;

pub use assemble::{board_caption, clip_path, disembark_caption};
pub use config::{ConfigError, DEFAULT_RADIUS_M, PlannerConfig, RoutingPolicy, parse_radius};
pub use plan::{
    NoTripReason, PlanError, PlanOutcome, PlanRequest, Planner, ProviderError, TransitProvider,
};
pub use resolve::Resolution;
pub use select::Selection;
