//! Domain types for the Waldo trip planner.
//!
//! This module contains the core domain model types that represent
//! validated transit data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod bus;
mod coordinate;
mod direction;
mod route;
mod segment;
mod stop;
mod trip;
mod waldo;

pub use bus::{Bus, earliest_departure};
pub use coordinate::{Coordinate, InvalidCoordinate};
pub use direction::{Direction, InvalidDirection, TravelDirections};
pub use route::{InvalidRouteNumber, RouteNumber};
pub use segment::Segment;
pub use stop::{Stop, StopId};
pub use trip::Trip;
pub use waldo::Waldo;
