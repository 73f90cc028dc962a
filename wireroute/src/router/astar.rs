//! Constrained grid A*.
//!
//! The search runs on a transient integer grid covering the start/goal span
//! plus a fixed margin. Cells inside inflated obstacles are blocked
//! outright. Cells in the corridor of an existing wire are blocked
//! directionally: a move perpendicular to the occupying wire may cross it,
//! while parallel and diagonal moves may not, so wires can cross at right
//! angles but cannot ride alongside each other. Expansion is 8-connected
//! with a cardinal bias (1.0 vs 1.4), plus tunable penalties for bends,
//! obstacle proximity, and same-direction overlap with existing runs.
//!
//! The search gives up after `RouterConfig::max_iterations` expansions; the
//! caller degrades to a straight fallback segment in that case.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::core::RouterConfig;
use crate::geometry::obstacles::Obstacle;
use crate::geometry::{HvSegment, Point};

/// World-space padding around the start/goal span that bounds the search.
const SEARCH_MARGIN: f64 = 128.0;

const CARDINAL_COST: f64 = 1.0;
const DIAGONAL_COST: f64 = 1.4;

/// Cardinal directions first; index < 4 means cost 1.0.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Wire-corridor occupancy for one cell.
#[derive(Debug, Clone, Copy, Default)]
struct Corridor {
    horizontal: bool,
    vertical: bool,
}

struct SearchGrid {
    min_x: f64,
    min_y: f64,
    cols: i32,
    rows: i32,
    cell: f64,
    blocked: Vec<bool>,
    corridors: HashMap<(i32, i32), Corridor>,
}

impl SearchGrid {
    fn build(
        start: &Point,
        goal: &Point,
        obstacles: &[Obstacle],
        existing: &[HvSegment],
        cell: f64,
    ) -> SearchGrid {
        let min_x = start.x.min(goal.x) - SEARCH_MARGIN;
        let min_y = start.y.min(goal.y) - SEARCH_MARGIN;
        let max_x = start.x.max(goal.x) + SEARCH_MARGIN;
        let max_y = start.y.max(goal.y) + SEARCH_MARGIN;
        let cols = ((max_x - min_x) / cell).ceil() as i32;
        let rows = ((max_y - min_y) / cell).ceil() as i32;

        let mut blocked = vec![false; (cols * rows) as usize];
        for o in obstacles {
            let gx0 = ((o.x - min_x) / cell).floor() as i32;
            let gy0 = ((o.y - min_y) / cell).floor() as i32;
            let gx1 = ((o.x + o.width - min_x) / cell).ceil() as i32;
            let gy1 = ((o.y + o.height - min_y) / cell).ceil() as i32;
            for y in gy0.max(0)..gy1.min(rows) {
                for x in gx0.max(0)..gx1.min(cols) {
                    blocked[(y * cols + x) as usize] = true;
                }
            }
        }

        let mut grid = SearchGrid {
            min_x,
            min_y,
            cols,
            rows,
            cell,
            blocked,
            corridors: HashMap::new(),
        };
        for seg in existing {
            grid.mark_corridor(seg);
        }
        grid
    }

    /// Mark the corridor of an existing segment: its own cells plus a
    /// one-cell perpendicular margin, tagged with the segment orientation.
    fn mark_corridor(&mut self, seg: &HvSegment) {
        let a = self.to_cell(&Point::new(seg.x1, seg.y1));
        let b = self.to_cell(&Point::new(seg.x2, seg.y2));
        if seg.is_horizontal() {
            let y = a.1;
            let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
            for x in x0..=x1 {
                for dy in -1..=1 {
                    self.corridors.entry((x, y + dy)).or_default().horizontal = true;
                }
            }
        } else if seg.is_vertical() {
            let x = a.0;
            let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
            for y in y0..=y1 {
                for dx in -1..=1 {
                    self.corridors.entry((x + dx, y)).or_default().vertical = true;
                }
            }
        }
    }

    fn to_cell(&self, p: &Point) -> (i32, i32) {
        (
            ((p.x - self.min_x) / self.cell).round() as i32,
            ((p.y - self.min_y) / self.cell).round() as i32,
        )
    }

    fn to_world(&self, c: (i32, i32)) -> Point {
        Point::new(
            c.0 as f64 * self.cell + self.min_x,
            c.1 as f64 * self.cell + self.min_y,
        )
    }

    fn in_bounds(&self, c: (i32, i32)) -> bool {
        c.0 >= 0 && c.0 < self.cols && c.1 >= 0 && c.1 < self.rows
    }

    fn obstacle_at(&self, c: (i32, i32)) -> bool {
        self.in_bounds(c) && self.blocked[(c.1 * self.cols + c.0) as usize]
    }

    /// True if a move in `dir` may not enter cell `c`.
    fn move_blocked(&self, c: (i32, i32), dir: (i32, i32)) -> bool {
        if self.obstacle_at(c) {
            return true;
        }
        let Some(corridor) = self.corridors.get(&c) else {
            return false;
        };
        let perpendicular_to_horizontal = dir.0 == 0 && dir.1 != 0;
        let perpendicular_to_vertical = dir.1 == 0 && dir.0 != 0;
        if corridor.horizontal && !perpendicular_to_horizontal {
            return true;
        }
        if corridor.vertical && !perpendicular_to_vertical {
            return true;
        }
        false
    }

    /// True if any cell of the 3x3 neighborhood is obstacle-blocked.
    fn near_obstacle(&self, c: (i32, i32)) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.obstacle_at((c.0 + dx, c.1 + dy)) {
                    return true;
                }
            }
        }
        false
    }

    /// True if a cardinal move between these cells runs along (within half a
    /// cell of, and overlapping) an existing same-orientation segment.
    fn rides_same_direction(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        dir: (i32, i32),
        existing: &[HvSegment],
    ) -> bool {
        let f = self.to_world(from);
        let t = self.to_world(to);
        let half = self.cell / 2.0;
        if dir.0 != 0 && dir.1 == 0 {
            let (lo, hi) = (f.x.min(t.x), f.x.max(t.x));
            existing.iter().any(|s| {
                s.is_horizontal()
                    && (s.y1 - f.y).abs() <= half
                    && hi >= s.x1.min(s.x2)
                    && lo <= s.x1.max(s.x2)
            })
        } else if dir.1 != 0 && dir.0 == 0 {
            let (lo, hi) = (f.y.min(t.y), f.y.max(t.y));
            existing.iter().any(|s| {
                s.is_vertical()
                    && (s.x1 - f.x).abs() <= half
                    && hi >= s.y1.min(s.y2)
                    && lo <= s.y1.max(s.y2)
            })
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    g: f64,
    cell: (i32, i32),
    dir: Option<(i32, i32)>,
    parent: Option<(i32, i32)>,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on f, deterministic tie-break on cell.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn manhattan(a: (i32, i32), b: (i32, i32)) -> f64 {
    ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f64
}

/// Find a path from `start` to `goal` in world coordinates.
///
/// Returns the waypoint polyline (start and goal cells included, collinear
/// runs merged), or `None` when the open set empties or the iteration budget
/// runs out.
pub fn find_path(
    start: &Point,
    goal: &Point,
    obstacles: &[Obstacle],
    existing: &[HvSegment],
    config: &RouterConfig,
) -> Option<Vec<Point>> {
    let grid = SearchGrid::build(start, goal, obstacles, existing, config.grid_size);
    let start_cell = grid.to_cell(start);
    let goal_cell = grid.to_cell(goal);
    if start_cell == goal_cell {
        return Some(vec![grid.to_world(start_cell)]);
    }

    let mut open = BinaryHeap::new();
    let mut g_costs: HashMap<(i32, i32), f64> = HashMap::new();
    let mut parents: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut closed: HashSet<(i32, i32)> = HashSet::new();

    open.push(OpenEntry {
        f: manhattan(start_cell, goal_cell),
        g: 0.0,
        cell: start_cell,
        dir: None,
        parent: None,
    });
    g_costs.insert(start_cell, 0.0);

    let mut iterations = 0usize;
    while let Some(current) = open.pop() {
        if closed.contains(&current.cell) {
            continue;
        }
        closed.insert(current.cell);
        if let Some(parent) = current.parent {
            parents.insert(current.cell, parent);
        }
        if current.cell == goal_cell {
            return Some(reconstruct(&grid, &parents, start_cell, goal_cell));
        }

        iterations += 1;
        if iterations > config.max_iterations {
            tracing::warn!(
                iterations,
                "pathfinding iteration budget exhausted, degrading to fallback"
            );
            return None;
        }

        for (i, &dir) in DIRECTIONS.iter().enumerate() {
            let next = (current.cell.0 + dir.0, current.cell.1 + dir.1);
            if !grid.in_bounds(next) || closed.contains(&next) {
                continue;
            }
            if grid.move_blocked(next, dir) {
                continue;
            }

            let move_cost = if i < 4 { CARDINAL_COST } else { DIAGONAL_COST };
            let bend = match current.dir {
                Some(d) if d != dir => config.bend_penalty,
                _ => 0.0,
            };
            let near = if grid.near_obstacle(next) {
                config.near_obstacle_penalty
            } else {
                0.0
            };
            let ride = if grid.rides_same_direction(current.cell, next, dir, existing) {
                config.same_direction_penalty
            } else {
                0.0
            };
            let g = current.g + move_cost + bend + near + ride;
            if g_costs.get(&next).is_some_and(|&known| known <= g) {
                continue;
            }
            g_costs.insert(next, g);
            open.push(OpenEntry {
                f: g + manhattan(next, goal_cell),
                g,
                cell: next,
                dir: Some(dir),
                parent: Some(current.cell),
            });
        }
    }

    tracing::warn!("pathfinding open set exhausted, degrading to fallback");
    None
}

/// Walk parent pointers back from the goal and merge collinear cell runs.
fn reconstruct(
    grid: &SearchGrid,
    parents: &HashMap<(i32, i32), (i32, i32)>,
    start: (i32, i32),
    goal: (i32, i32),
) -> Vec<Point> {
    let mut cells = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match parents.get(&cursor) {
            Some(&p) => {
                cells.push(p);
                cursor = p;
            }
            None => break,
        }
    }
    cells.reverse();

    let mut out: Vec<Point> = vec![grid.to_world(cells[0])];
    let mut last_dir: Option<(i32, i32)> = None;
    for w in cells.windows(2) {
        let dir = ((w[1].0 - w[0].0).signum(), (w[1].1 - w[0].1).signum());
        if Some(dir) != last_dir {
            out.push(grid.to_world(w[1]));
            last_dir = Some(dir);
        } else if let Some(last) = out.last_mut() {
            *last = grid.to_world(w[1]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_orth45_polyline;

    fn config() -> RouterConfig {
        RouterConfig::default()
    }

    #[test]
    fn clear_field_route_reaches_goal() {
        let cfg = config();
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(160.0, 0.0);
        let path = find_path(&start, &goal, &[], &[], &cfg).expect("clear field should route");
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(is_orth45_polyline(&path));
    }

    #[test]
    fn route_detours_around_obstacle() {
        let cfg = config();
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(256.0, 0.0);
        let blocker = Obstacle::new(96.0, -48.0, 64.0, 96.0);
        let path =
            find_path(&start, &goal, &[blocker], &[], &cfg).expect("detour should be found");
        assert_eq!(path.last(), Some(&goal));
        // The interior of the path never enters the obstacle. The obstacle
        // straddles the direct line, so at least one bend is required.
        assert!(path.len() > 2);
        for p in &path {
            assert!(
                !(p.x > blocker.x
                    && p.x < blocker.x + blocker.width
                    && p.y > blocker.y
                    && p.y < blocker.y + blocker.height),
                "waypoint {p:?} inside obstacle"
            );
        }
    }

    #[test]
    fn fully_walled_goal_returns_none() {
        let cfg = config();
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(320.0, 0.0);
        // Box the goal in completely, including the search margin.
        let walls = [
            Obstacle::new(160.0, -640.0, 32.0, 1280.0),
            Obstacle::new(160.0, -640.0, 640.0, 32.0),
            Obstacle::new(160.0, 608.0, 640.0, 32.0),
            Obstacle::new(768.0, -640.0, 32.0, 1280.0),
        ];
        assert!(find_path(&start, &goal, &walls, &[], &cfg).is_none());
    }

    #[test]
    fn perpendicular_crossing_is_allowed() {
        let cfg = config();
        // An existing horizontal wire lies straight across the route of a
        // vertical connection.
        let existing = [HvSegment {
            x1: -320.0,
            y1: 80.0,
            x2: 320.0,
            y2: 80.0,
        }];
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(0.0, 160.0);
        let path = find_path(&start, &goal, &[], &existing, &cfg)
            .expect("perpendicular crossing should be routable");
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn budget_exhaustion_degrades_to_none() {
        let mut cfg = config();
        cfg.max_iterations = 3;
        let start = Point::new(0.0, 0.0);
        let goal = Point::new(512.0, 512.0);
        let blocker = Obstacle::new(128.0, 0.0, 32.0, 512.0);
        assert!(find_path(&start, &goal, &[blocker], &[], &cfg).is_none());
    }

    #[test]
    fn degenerate_same_cell_route() {
        let cfg = config();
        let p = Point::new(5.0, 5.0);
        let q = Point::new(6.0, 6.0);
        let path = find_path(&p, &q, &[], &[], &cfg).expect("same-cell route");
        assert_eq!(path.len(), 1);
    }
}
