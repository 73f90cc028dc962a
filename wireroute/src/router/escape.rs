//! Escape/stub computation.
//!
//! Terminals sit on (or inside) component bodies, so a path cannot start
//! with arbitrary motion: the first hop is a short, purely axis-aligned
//! stub that leads the wire clear of its host before the pathfinder takes
//! over. The stub honors the terminal's declared exit face when the part
//! provides one; otherwise it leaves through the nearest host edge, or along
//! the dominant axis toward the far endpoint when the terminal is already
//! outside every obstacle.

use crate::core::RouterConfig;
use crate::geometry::obstacles::Obstacle;
use crate::geometry::{snap, Cardinal, Point};

/// Compute the lead-out point for `p`. The segment `p -> result` is always
/// purely horizontal or vertical, and the result's moving coordinate is
/// snapped to the grid.
pub fn escape_point(
    p: &Point,
    toward: &Point,
    exit: Option<Cardinal>,
    obstacles: &[Obstacle],
    config: &RouterConfig,
) -> Point {
    let host = obstacles.iter().find(|o| o.contains(p));

    if let Some(direction) = exit {
        return escape_along(p, direction, host, config);
    }

    if let Some(host) = host {
        // Leave through the nearest edge, holding the other axis fixed so
        // the stub stays perfectly horizontal or vertical.
        let left = p.x - host.x;
        let right = host.x + host.width - p.x;
        let top = p.y - host.y;
        let bottom = host.y + host.height - p.y;
        let min = left.min(right).min(top).min(bottom);
        let reach = config.clearance + config.escape_length;
        return if min == left {
            Point::new(snap(host.x - reach, config.grid_size), p.y)
        } else if min == right {
            Point::new(snap(host.x + host.width + reach, config.grid_size), p.y)
        } else if min == top {
            Point::new(p.x, snap(host.y - reach, config.grid_size))
        } else {
            Point::new(p.x, snap(host.y + host.height + reach, config.grid_size))
        };
    }

    // Outside every obstacle: step along the dominant axis toward the far
    // endpoint.
    let dx = toward.x - p.x;
    let dy = toward.y - p.y;
    if dx.abs() >= dy.abs() {
        let step = if dx >= 0.0 { 1.0 } else { -1.0 };
        Point::new(snap(p.x + step * config.escape_length, config.grid_size), p.y)
    } else {
        let step = if dy >= 0.0 { 1.0 } else { -1.0 };
        Point::new(p.x, snap(p.y + step * config.escape_length, config.grid_size))
    }
}

/// Escape along a mandated exit face. When the terminal sits inside its
/// host, the stub reaches past the host face plus clearance; otherwise it is
/// a plain escape-length stub.
fn escape_along(
    p: &Point,
    direction: Cardinal,
    host: Option<&Obstacle>,
    config: &RouterConfig,
) -> Point {
    let grid = config.grid_size;
    let reach = config.clearance + config.escape_length;
    match (direction, host) {
        (Cardinal::E, Some(h)) => Point::new(snap(h.x + h.width + reach, grid), p.y),
        (Cardinal::W, Some(h)) => Point::new(snap(h.x - reach, grid), p.y),
        (Cardinal::S, Some(h)) => Point::new(p.x, snap(h.y + h.height + reach, grid)),
        (Cardinal::N, Some(h)) => Point::new(p.x, snap(h.y - reach, grid)),
        (Cardinal::E, None) => Point::new(snap(p.x + config.escape_length, grid), p.y),
        (Cardinal::W, None) => Point::new(snap(p.x - config.escape_length, grid), p.y),
        (Cardinal::S, None) => Point::new(p.x, snap(p.y + config.escape_length, grid)),
        (Cardinal::N, None) => Point::new(p.x, snap(p.y - config.escape_length, grid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SegmentDir;

    fn config() -> RouterConfig {
        RouterConfig::default()
    }

    #[test]
    fn stub_is_always_axis_aligned() {
        let cfg = config();
        let obstacles = [Obstacle::new(0.0, 0.0, 64.0, 64.0)];
        let cases = [
            (Point::new(10.0, 30.0), Point::new(300.0, 200.0)),
            (Point::new(60.0, 10.0), Point::new(-100.0, 500.0)),
            (Point::new(200.0, 200.0), Point::new(180.0, 500.0)),
        ];
        for (p, toward) in cases {
            let esc = escape_point(&p, &toward, None, &obstacles, &cfg);
            let dir = SegmentDir::classify(&p, &esc);
            assert!(
                matches!(dir, SegmentDir::Horizontal(_) | SegmentDir::Vertical(_)),
                "stub {p:?} -> {esc:?} is not axis-aligned"
            );
        }
    }

    #[test]
    fn inside_host_escapes_through_nearest_edge() {
        let cfg = config();
        let obstacles = [Obstacle::new(0.0, 0.0, 100.0, 100.0)];
        // Closest to the left edge.
        let esc = escape_point(
            &Point::new(10.0, 48.0),
            &Point::new(400.0, 48.0),
            None,
            &obstacles,
            &cfg,
        );
        assert!(esc.x <= -cfg.clearance);
        assert_eq!(esc.y, 48.0);
    }

    #[test]
    fn outside_host_steps_along_dominant_axis() {
        let cfg = config();
        let esc = escape_point(
            &Point::new(0.0, 0.0),
            &Point::new(10.0, 300.0),
            None,
            &[],
            &cfg,
        );
        // Vertical component dominates.
        assert_eq!(esc.x, 0.0);
        assert_eq!(esc.y, cfg.escape_length);
    }

    #[test]
    fn declared_exit_face_wins() {
        let cfg = config();
        let obstacles = [Obstacle::new(0.0, 0.0, 100.0, 100.0)];
        // Terminal near the left edge, but the part says the wire leaves east.
        let esc = escape_point(
            &Point::new(10.0, 48.0),
            &Point::new(-400.0, 48.0),
            Some(Cardinal::E),
            &obstacles,
            &cfg,
        );
        assert!(esc.x >= 100.0 + cfg.clearance);
        assert_eq!(esc.y, 48.0);
    }

    #[test]
    fn moving_coordinate_lands_on_grid() {
        let cfg = config();
        let esc = escape_point(
            &Point::new(7.0, 9.0),
            &Point::new(500.0, 9.0),
            None,
            &[],
            &cfg,
        );
        assert_eq!(esc.x % cfg.grid_size, 0.0);
        assert_eq!(esc.y, 9.0);
    }
}
