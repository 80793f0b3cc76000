//! Transit network data.
//!
//! This module provides the planner's transit-data collaborator: a
//! snapshot of stops, real-time bus estimates and route geometry loaded
//! from a JSON file and answered in memory.
//!
//! Key characteristics of the snapshot format:
//! - Route numbers and direction labels arrive unnormalised and are
//!   cleaned up during conversion
//! - Negative departure estimates mean "unknown"
//! - Route geometry is a list of polyline pieces of `[lat, lon]` pairs

mod convert;
mod error;
mod snapshot;
mod types;

pub use convert::{ConversionError, NetworkSnapshot, convert_network};
pub use error::NetworkError;
pub use snapshot::SnapshotProvider;
pub use types::{BusDto, NetworkFile, RouteDto, StopDto};
