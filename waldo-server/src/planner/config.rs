//! Planner configuration.

use std::fmt;

/// Default proximity radius for stop searches (metres).
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Which end of the trip anchors the route choice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoutingPolicy {
    /// Ride the route of the eligible bus whose stop is nearest the rider.
    #[default]
    ClosestToRider,
    /// Ride the route of the eligible bus whose stop is nearest the target.
    ClosestToTarget,
    /// A setting the planner does not understand. Planning with it fails
    /// closed instead of falling back to a default.
    Unrecognised(String),
}

impl RoutingPolicy {
    /// Interpret a routing setting.
    ///
    /// Accepts the stored preference values `closest_stop_me` and
    /// `closest_stop_dest` as well as `closest_to_rider` and
    /// `closest_to_target`, case-insensitively.
    pub fn parse(setting: &str) -> Self {
        match setting.trim().to_ascii_lowercase().as_str() {
            "closest_stop_me" | "closest_to_rider" => RoutingPolicy::ClosestToRider,
            "closest_stop_dest" | "closest_to_target" => RoutingPolicy::ClosestToTarget,
            _ => RoutingPolicy::Unrecognised(setting.to_string()),
        }
    }

    /// Returns false for `Unrecognised`.
    pub fn is_recognised(&self) -> bool {
        !matches!(self, RoutingPolicy::Unrecognised(_))
    }
}

impl fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingPolicy::ClosestToRider => f.write_str("closest_to_rider"),
            RoutingPolicy::ClosestToTarget => f.write_str("closest_to_target"),
            RoutingPolicy::Unrecognised(s) => write!(f, "unrecognised({s:?})"),
        }
    }
}

/// Error from reading planner settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Stop distance is not a positive number of metres
    #[error("invalid stop distance {0:?}: must be a positive number of metres")]
    InvalidRadius(String),
}

/// Configuration parameters for trip planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Radius around rider and target within which stops are considered.
    /// Also the walking-distance threshold.
    pub radius_m: f64,

    /// How to choose between the candidate routes.
    pub policy: RoutingPolicy,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(radius_m: f64, policy: RoutingPolicy) -> Self {
        Self { radius_m, policy }
    }

    /// Build a configuration from string-typed settings, as stored by
    /// preference screens and environment variables.
    pub fn from_settings(stop_distance: &str, routing_option: &str) -> Result<Self, ConfigError> {
        let radius_m = parse_radius(stop_distance)?;
        Ok(Self::new(radius_m, RoutingPolicy::parse(routing_option)))
    }

    /// Replace the radius.
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Replace the routing policy.
    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            policy: RoutingPolicy::default(),
        }
    }
}

/// Parse a stop distance setting in metres.
pub fn parse_radius(s: &str) -> Result<f64, ConfigError> {
    match s.trim().parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 => Ok(r),
        _ => Err(ConfigError::InvalidRadius(s.to_string())),
    }
}
