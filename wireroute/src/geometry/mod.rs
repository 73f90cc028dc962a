//! Grid and geometry primitives.
//!
//! Everything routed or persisted by this crate eventually lands on a grid:
//! coordinates are snapped to multiples of the configured grid size, and
//! finished wire paths only contain horizontal, vertical, or 45-degree
//! segments. The helpers here are the pure functions the rest of the crate
//! builds on.

pub mod obstacles;

use serde::{Deserialize, Serialize};

/// A point in world coordinates (canvas pixels at scale 1).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snap both coordinates to the nearest multiple of `grid`.
    pub fn snapped(&self, grid: f64) -> Point {
        Point {
            x: snap(self.x, grid),
            y: snap(self.y, grid),
        }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Integer key for hashing snapped points.
    pub(crate) fn key(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// Snap a scalar to the nearest multiple of `grid`.
pub fn snap(n: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return n;
    }
    (n / grid).round() * grid
}

/// A cardinal face direction. Terminals declare the face a wire must leave
/// from; the escape router turns that into an axis-aligned stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    E,
    S,
    W,
}

impl Cardinal {
    /// Unit vector for this direction (screen coordinates, +y down).
    pub fn vector(&self) -> (f64, f64) {
        match self {
            Cardinal::N => (0.0, -1.0),
            Cardinal::E => (1.0, 0.0),
            Cardinal::S => (0.0, 1.0),
            Cardinal::W => (-1.0, 0.0),
        }
    }

    /// Rotate clockwise by the given number of quarter turns.
    pub fn rotated(&self, quarter_turns: u8) -> Cardinal {
        const ORDER: [Cardinal; 4] = [Cardinal::N, Cardinal::E, Cardinal::S, Cardinal::W];
        let idx = ORDER.iter().position(|c| c == self).unwrap_or(0);
        ORDER[(idx + quarter_turns as usize) % 4]
    }

    pub fn opposite(&self) -> Cardinal {
        self.rotated(2)
    }
}

/// Classification of the vector between two points.
///
/// `Skew` covers any slope that is neither axis-aligned nor exactly 45
/// degrees; it only appears transiently, before a sequence has been through
/// the strict rebuild pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentDir {
    Empty,
    Horizontal(i8),
    Vertical(i8),
    Diagonal(i8, i8),
    Skew,
}

fn sign(n: f64) -> i8 {
    if n > 0.0 {
        1
    } else if n < 0.0 {
        -1
    } else {
        0
    }
}

impl SegmentDir {
    /// Classify the direction from `a` to `b`.
    pub fn classify(a: &Point, b: &Point) -> SegmentDir {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx == 0.0 && dy == 0.0 {
            SegmentDir::Empty
        } else if dy == 0.0 {
            SegmentDir::Horizontal(sign(dx))
        } else if dx == 0.0 {
            SegmentDir::Vertical(sign(dy))
        } else if dx.abs() == dy.abs() {
            SegmentDir::Diagonal(sign(dx), sign(dy))
        } else {
            SegmentDir::Skew
        }
    }

    /// True for horizontal, vertical, or 45-degree directions.
    pub fn is_orth45(&self) -> bool {
        matches!(
            self,
            SegmentDir::Horizontal(_) | SegmentDir::Vertical(_) | SegmentDir::Diagonal(_, _)
        )
    }

    /// Sign pair of the direction, `(0, 0)` for empty or skew-irrelevant use.
    pub fn signs(a: &Point, b: &Point) -> (i8, i8) {
        (sign(b.x - a.x), sign(b.y - a.y))
    }
}

/// True if `a -> b -> c` is a single straight run (horizontal, vertical, or
/// 45-degree) that the middle point can be dropped from.
pub fn is_collinear_run(a: &Point, b: &Point, c: &Point) -> bool {
    let d1 = SegmentDir::classify(a, b);
    let d2 = SegmentDir::classify(b, c);
    d1.is_orth45() && d1 == d2
}

/// True if every consecutive hop in `points` is horizontal, vertical, or
/// exactly 45 degrees.
pub fn is_orth45_polyline(points: &[Point]) -> bool {
    points
        .windows(2)
        .all(|w| w[0] == w[1] || SegmentDir::classify(&w[0], &w[1]).is_orth45())
}

/// An axis-aligned wire segment in world coordinates. Diagonal runs are not
/// represented here; corridor occupancy and ride checks only apply to
/// horizontal/vertical segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl HvSegment {
    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }
}

/// Extract the horizontal/vertical segments of a polyline.
pub fn hv_segments_of_polyline(points: &[Point]) -> Vec<HvSegment> {
    let mut segments = Vec::new();
    for w in points.windows(2) {
        let (p, q) = (w[0], w[1]);
        if (p.x == q.x || p.y == q.y) && p != q {
            segments.push(HvSegment {
                x1: p.x,
                y1: p.y,
                x2: q.x,
                y2: q.y,
            });
        }
    }
    segments
}
