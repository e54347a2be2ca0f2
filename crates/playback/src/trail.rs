//! Visited-position accumulator.

use routeplay_geo::Coordinate;

/// Positions actually visited, in order. Nothing is synthesized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: Vec<Coordinate>,
    has_moved: bool,
}

impl Trail {
    /// Empty trail awaiting its first position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly received position.
    ///
    /// The first position since construction or [`Trail::reset`] replaces the
    /// trail with a single point; later positions are appended.
    pub fn record(&mut self, position: Coordinate) {
        if self.has_moved {
            self.points.push(position);
        } else {
            self.points.clear();
            self.points.push(position);
            self.has_moved = true;
        }
    }

    /// Starts a new session; the next position reinitializes the trail.
    pub fn reset(&mut self) {
        self.has_moved = false;
    }

    /// Visited positions, oldest first.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// True once a position was recorded since the last reset.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Number of positions held.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True before the first position.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent position.
    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }
}
