//! Obstacle model.
//!
//! Obstacles are the axis-aligned bounding boxes of placed components. They
//! are derived from the current component layout every time routing runs and
//! are never persisted. For routing they are inflated by a clearance margin
//! so finished wires keep their distance from component bodies.

use super::Point;

/// An axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflated(&self, margin: f64) -> Obstacle {
        Obstacle {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// True if a purely horizontal or vertical segment from `p` to `q`
    /// overlaps this rectangle. Segments on other slopes report false; the
    /// fast path only ever asks about axis-aligned candidates.
    pub fn crossed_by_hv(&self, p: &Point, q: &Point) -> bool {
        let min_x = p.x.min(q.x);
        let max_x = p.x.max(q.x);
        let min_y = p.y.min(q.y);
        let max_y = p.y.max(q.y);
        if p.y == q.y {
            return p.y >= self.y
                && p.y <= self.y + self.height
                && max_x >= self.x
                && min_x <= self.x + self.width;
        }
        if p.x == q.x {
            return p.x >= self.x
                && p.x <= self.x + self.width
                && max_y >= self.y
                && min_y <= self.y + self.height;
        }
        false
    }
}

/// True if the axis-aligned segment `p -> q` crosses any obstacle in the
/// slice.
pub fn segment_crosses_any(p: &Point, q: &Point, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| o.crossed_by_hv(p, q))
}

/// Inflate every obstacle by the routing clearance.
pub fn inflate_all(obstacles: &[Obstacle], margin: f64) -> Vec<Obstacle> {
    obstacles.iter().map(|o| o.inflated(margin)).collect()
}
