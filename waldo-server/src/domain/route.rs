//! Route number type.

use std::fmt;

/// Error returned when parsing an invalid route number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route number: {reason}")]
pub struct InvalidRouteNumber {
    reason: &'static str,
}

/// The public number of a transit route, e.g. `99` or `C20`.
///
/// The route number is the route's identity: the same route is fetched
/// independently from different stops, and all of those copies must
/// compare, hash and order identically. Parsing trims surrounding
/// whitespace and upper-cases letters.
///
/// # Examples
///
/// ```
/// use waldo_server::domain::RouteNumber;
///
/// let a = RouteNumber::parse("c20").unwrap();
/// let b = RouteNumber::parse(" C20 ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "C20");
///
/// assert!(RouteNumber::parse("").is_err());
/// assert!(RouteNumber::parse("9 9").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteNumber(String);

impl RouteNumber {
    /// Parse a route number. Must be non-empty ASCII alphanumerics after trimming.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteNumber> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidRouteNumber {
                reason: "must not be empty",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidRouteNumber {
                reason: "must be ASCII letters and digits",
            });
        }

        Ok(RouteNumber(trimmed.to_ascii_uppercase()))
    }

    /// Returns the route number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteNumber({})", self.0)
    }
}

impl fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
