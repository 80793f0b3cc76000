//! Compass directions for buses and trips.

use std::fmt;

use super::Coordinate;

/// Error returned when a direction label is not a compass word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction label: {label:?}")]
pub struct InvalidDirection {
    label: String,
}

/// One of the four compass directions a bus can be heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Parse a direction label as published on bus estimates.
    ///
    /// Labels arrive with inconsistent case and stray whitespace, so the
    /// input is trimmed and compared case-insensitively.
    ///
    /// ```
    /// use waldo_server::domain::Direction;
    ///
    /// assert_eq!(Direction::parse_normalized(" east\n").unwrap(), Direction::East);
    /// assert!(Direction::parse_normalized("UPTOWN").is_err());
    /// ```
    pub fn parse_normalized(label: &str) -> Result<Self, InvalidDirection> {
        match label.trim().to_ascii_uppercase().as_str() {
            "NORTH" => Ok(Direction::North),
            "SOUTH" => Ok(Direction::South),
            "EAST" => Ok(Direction::East),
            "WEST" => Ok(Direction::West),
            _ => Err(InvalidDirection {
                label: label.to_string(),
            }),
        }
    }

    /// The canonical upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The compass quadrant from one point towards another.
///
/// This is a coarse approximation, not a bearing: it always holds exactly
/// one east/west label and exactly one north/south label. Equal longitudes
/// classify as WEST and equal latitudes as SOUTH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelDirections {
    east_west: Direction,
    north_south: Direction,
}

impl TravelDirections {
    /// Classify the quadrant of `to` as seen from `from`.
    pub fn between(from: &Coordinate, to: &Coordinate) -> Self {
        let east_west = if to.longitude() > from.longitude() {
            Direction::East
        } else {
            Direction::West
        };
        let north_south = if to.latitude() > from.latitude() {
            Direction::North
        } else {
            Direction::South
        };

        Self {
            east_west,
            north_south,
        }
    }

    /// The east/west component.
    pub fn east_west(&self) -> Direction {
        self.east_west
    }

    /// The north/south component.
    pub fn north_south(&self) -> Direction {
        self.north_south
    }

    /// Whether a bus heading in `direction` travels towards the target.
    pub fn contains(&self, direction: Direction) -> bool {
        direction == self.east_west || direction == self.north_south
    }

    /// Both labels, east/west first.
    pub fn labels(&self) -> [Direction; 2] {
        [self.east_west, self.north_south]
    }
}

impl fmt::Display for TravelDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.north_south, self.east_west)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn parse_accepts_case_and_whitespace() {
        assert_eq!(Direction::parse_normalized("NORTH").unwrap(), Direction::North);
        assert_eq!(Direction::parse_normalized("south").unwrap(), Direction::South);
        assert_eq!(Direction::parse_normalized("  East ").unwrap(), Direction::East);
        assert_eq!(Direction::parse_normalized("wEsT\t").unwrap(), Direction::West);
    }

    #[test]
    fn parse_rejects_other_labels() {
        assert!(Direction::parse_normalized("").is_err());
        assert!(Direction::parse_normalized("N").is_err());
        assert!(Direction::parse_normalized("NORTHBOUND").is_err());
    }

    #[test]
    fn north_east_quadrant() {
        let ubc = coord(49.2606, -123.2460);
        let downtown = coord(49.2827, -123.1207);
        let dirs = TravelDirections::between(&ubc, &downtown);

        assert_eq!(dirs.east_west(), Direction::East);
        assert_eq!(dirs.north_south(), Direction::North);
        assert!(dirs.contains(Direction::East));
        assert!(dirs.contains(Direction::North));
        assert!(!dirs.contains(Direction::West));
        assert!(!dirs.contains(Direction::South));
    }

    #[test]
    fn south_west_quadrant() {
        let dirs = TravelDirections::between(&coord(49.2827, -123.1207), &coord(49.2606, -123.2460));
        assert_eq!(dirs.labels(), [Direction::West, Direction::South]);
    }

    #[test]
    fn ties_classify_as_west_and_south() {
        let p = coord(49.0, -123.0);
        let dirs = TravelDirections::between(&p, &p);
        assert_eq!(dirs.labels(), [Direction::West, Direction::South]);
    }

    #[test]
    fn display() {
        let dirs = TravelDirections::between(&coord(0.0, 0.0), &coord(1.0, 1.0));
        assert_eq!(dirs.to_string(), "NORTH/EAST");
    }
}
