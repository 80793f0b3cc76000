//! Network snapshot DTOs.
//!
//! These types map directly to the JSON snapshot file. Fields are kept as
//! raw strings and numbers; validation happens during conversion.

use serde::Deserialize;

/// A whole snapshot file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFile {
    /// When the snapshot was taken (free text, informational only).
    pub generated_at: Option<String>,

    #[serde(default)]
    pub stops: Vec<StopDto>,

    #[serde(default)]
    pub buses: Vec<BusDto>,

    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// A stop as published by the transit agency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    /// Public stop number.
    pub number: u32,

    pub name: String,

    pub lat: f64,

    pub lon: f64,

    /// Route numbers calling here, possibly with padding or lower case.
    #[serde(default)]
    pub routes: Vec<String>,
}

/// A real-time departure estimate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusDto {
    pub route: String,

    /// Stop number the estimate is for.
    pub stop: u32,

    /// Compass word, e.g. "EAST". Case and whitespace vary.
    #[serde(default)]
    pub direction: String,

    /// Minutes until departure. Negative means the estimate is unusable.
    #[serde(default = "unknown_minutes")]
    pub minutes: i32,
}

fn unknown_minutes() -> i32 {
    -1
}

/// Path geometry of a route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub number: String,

    /// Polyline pieces, each a list of `[lat, lon]` pairs.
    #[serde(default)]
    pub segments: Vec<Vec<[f64; 2]>>,
}
