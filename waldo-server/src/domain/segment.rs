//! Route geometry.

use super::Coordinate;

/// One contiguous polyline piece of a route's path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    points: Vec<Coordinate>,
}

impl Segment {
    /// Create a segment from ordered points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// The ordered points of this segment.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the segment has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points lying in the rectangle spanned by `a` and `b`, in their
    /// original order. Returns `None` when no point qualifies.
    pub fn clip_to(&self, a: &Coordinate, b: &Coordinate) -> Option<Segment> {
        let kept: Vec<Coordinate> = self
            .points
            .iter()
            .filter(|p| p.is_between(a, b))
            .copied()
            .collect();

        if kept.is_empty() {
            None
        } else {
            Some(Segment::new(kept))
        }
    }
}
