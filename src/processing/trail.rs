//! Bounded movement trail
//!
//! Keeps the most recent stretch of pointer path, bounded by cumulative
//! arc length in pixels rather than by point count. Points are kept at the
//! density the event source delivers them; the only synthesized point is
//! the tail end when the oldest kept segment has to be cut short.

use crate::capture::input::types::Point;

/// Recent pointer path, at most `max_length` pixels long
#[derive(Debug, Clone, Default)]
pub struct TrailBuffer {
    points: Vec<Point>,
    max_length: f64,
}

impl TrailBuffer {
    /// Create an empty trail bounded to `max_length` pixels of path
    pub fn new(max_length: f64) -> Self {
        Self {
            points: Vec::new(),
            max_length: if max_length.is_finite() { max_length.max(0.0) } else { 0.0 },
        }
    }

    pub fn max_length(&self) -> f64 {
        self.max_length
    }

    /// Append a point and trim the front back down to the length bound
    pub fn push(&mut self, point: Point) {
        self.points.push(point);

        let (start, tail) = bounded_suffix(&self.points, self.max_length);
        if start > 0 {
            self.points.drain(..start);
        }
        if let Some(tail) = tail {
            self.points[0] = tail;
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than two points means there is nothing to draw
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Sum of consecutive segment lengths
    pub fn path_length(&self) -> f64 {
        path_length(&self.points)
    }

    /// The most recent part of the trail that fits in `max_length`.
    ///
    /// Used to draw a mode whose configured length is shorter than the
    /// buffer's capacity without re-deriving the path.
    pub fn within(&self, max_length: f64) -> Vec<Point> {
        let (start, tail) = bounded_suffix(&self.points, max_length.max(0.0));
        let mut suffix = self.points[start..].to_vec();
        if let Some(tail) = tail {
            suffix[0] = tail;
        }
        suffix
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Sum of straight-line segment lengths along `points`
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Walk backwards from the newest point, accumulating segment lengths.
///
/// Returns the index of the first point to keep and, when the segment
/// that crosses the bound has to be cut, the replacement for that point.
fn bounded_suffix(points: &[Point], max_length: f64) -> (usize, Option<Point>) {
    let mut total = 0.0;
    let mut i = points.len().saturating_sub(1);

    while i > 0 {
        let newer = points[i];
        let older = points[i - 1];
        let segment = newer.distance(&older);

        if total + segment > max_length {
            let remaining = max_length - total;
            if remaining > 0.0 {
                return (i - 1, Some(newer.lerp(&older, remaining / segment)));
            }
            return (i, None);
        }

        total += segment;
        i -= 1;
    }

    (0, None)
}
