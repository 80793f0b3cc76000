//! Waldo web service client and roster.
//!
//! Waldos are the targets a rider can plan a trip to. The service hands
//! out a session key, then reports Waldos' last known positions and any
//! messages left for the session.

mod client;
mod error;
mod roster;
mod types;

pub use client::{Session, WaldoClient, WaldoClientConfig, parse_messages, parse_session, parse_waldos};
pub use error::WaldoError;
pub use roster::WaldoRoster;
pub use types::{LocationDto, MessageDto, MessagesDto, SessionDto, WaldoDto};
