//! Wire routing pipeline.
//!
//! A route request flows escape -> fast path -> A* -> post-process. The
//! escape router computes axis-aligned lead-out stubs for both terminals;
//! when the two escape points are already aligned and the direct segment is
//! clear, the pathfinder is skipped entirely. Otherwise the constrained A*
//! searches between the escape points, and on failure the route degrades to
//! a straight fallback segment, flagged so callers can warn the user.

pub mod astar;
pub mod cleanup;
pub mod escape;

use crate::core::RouterConfig;
use crate::geometry::obstacles::{self, Obstacle};
use crate::geometry::{Cardinal, HvSegment, Point};

/// How a route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteQuality {
    /// Straight line-of-sight connection, pathfinder skipped.
    FastPath,
    /// Full pathfinder route.
    Routed,
    /// Pathfinding failed; the route is a direct segment that may overlap
    /// obstacles.
    Fallback,
}

/// One endpoint of a route request: world position plus the terminal's
/// declared exit face, if any.
#[derive(Debug, Clone, Copy)]
pub struct RouteEndpoint {
    pub position: Point,
    pub exit: Option<Cardinal>,
}

/// Obstacle and wire context a route is computed against.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// Raw component bounding boxes (host detection for escapes).
    pub obstacles: Vec<Obstacle>,
    /// Existing wires' horizontal/vertical segments.
    pub existing: Vec<HvSegment>,
}

/// Compute the full vertex sequence (endpoints included) between two
/// terminals. The sequence is raw; callers run it through
/// [`cleanup::clean_sequence`] before persisting.
pub fn route_between(
    from: &RouteEndpoint,
    to: &RouteEndpoint,
    context: &RouteContext,
    config: &RouterConfig,
) -> (Vec<Point>, RouteQuality) {
    let a = from.position;
    let b = to.position;
    let a_esc = escape::escape_point(&a, &b, from.exit, &context.obstacles, config);
    let b_esc = escape::escape_point(&b, &a, to.exit, &context.obstacles, config);
    let inflated = obstacles::inflate_all(&context.obstacles, config.clearance);

    let aligned = a_esc.x == b_esc.x || a_esc.y == b_esc.y;
    if aligned
        && !obstacles::segment_crosses_any(&a_esc, &b_esc, &inflated)
        && !rides_same_direction(&a_esc, &b_esc, &context.existing, config.grid_size)
    {
        return (vec![a, a_esc, b_esc, b], RouteQuality::FastPath);
    }

    match astar::find_path(&a_esc, &b_esc, &inflated, &context.existing, config) {
        Some(middle) => {
            let mut seq = Vec::with_capacity(middle.len() + 4);
            seq.push(a);
            seq.push(a_esc);
            seq.extend(middle);
            seq.push(b_esc);
            seq.push(b);
            (seq, RouteQuality::Routed)
        }
        None => {
            tracing::warn!(
                from = ?a,
                to = ?b,
                "no route found, falling back to direct segment"
            );
            (vec![a, b], RouteQuality::Fallback)
        }
    }
}

/// True if the direct segment between two aligned points overlaps an
/// existing same-orientation wire segment within half a grid cell.
fn rides_same_direction(p: &Point, q: &Point, existing: &[HvSegment], grid: f64) -> bool {
    let half = grid / 2.0;
    if p.y == q.y {
        let (lo, hi) = (p.x.min(q.x), p.x.max(q.x));
        existing.iter().any(|s| {
            s.is_horizontal()
                && (s.y1 - p.y).abs() <= half
                && hi >= s.x1.min(s.x2)
                && lo <= s.x1.max(s.x2)
        })
    } else if p.x == q.x {
        let (lo, hi) = (p.y.min(q.y), p.y.max(q.y));
        existing.iter().any(|s| {
            s.is_vertical()
                && (s.x1 - p.x).abs() <= half
                && hi >= s.y1.min(s.y2)
                && lo <= s.y1.max(s.y2)
        })
    } else {
        false
    }
}
