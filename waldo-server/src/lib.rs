//! Waldo trip planner server.
//!
//! A web application that answers: "Waldo was last seen over there -
//! which bus gets me to them?"

pub mod cache;
pub mod domain;
pub mod network;
pub mod planner;
pub mod waldo;
pub mod web;
