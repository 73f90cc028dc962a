//! Path post-processing.
//!
//! Raw vertex sequences accumulate noise: duplicate points from repeated
//! escape/route cycles, self-crossing loops from interactive edits, short
//! reversal spikes from drag jitter, and redundant collinear bends. The
//! cleaning pipeline here removes all of it and then rebuilds the sequence
//! so every hop is horizontal, vertical, or exactly 45 degrees, snapped to
//! the grid. Applying the pipeline twice yields the same result as once.

use std::collections::HashMap;

use crate::geometry::{is_collinear_run, Point, SegmentDir};

/// Clean a full vertex sequence (endpoints included).
///
/// Pipeline order: deduplicate, collapse loops, remove spikes, simplify
/// collinear runs, rebuild strict orthogonal/45 hops, simplify again.
/// Rebuilding a skew hop can place the inserted corner on an earlier vertex,
/// recreating a loop after loop-collapsing already ran, so the pipeline
/// repeats until the sequence is stable.
pub fn clean_sequence(seq: &[Point], grid: f64) -> Vec<Point> {
    let mut current = seq.to_vec();
    for _ in 0..seq.len() + 2 {
        let next = clean_pass(&current, grid);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_pass(seq: &[Point], grid: f64) -> Vec<Point> {
    let deduped = dedup_consecutive(seq);
    let no_loops = collapse_loops(&deduped, grid);
    let de_spiked = remove_spikes(&no_loops, grid);
    let simplified = simplify(&de_spiked);
    rebuild_strict(&simplified, grid)
}

fn dedup_consecutive(seq: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(seq.len());
    for &p in seq {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Truncate back to the first occurrence whenever a (snapped) point repeats,
/// removing any loop the sequence walked in between.
fn collapse_loops(seq: &[Point], grid: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(seq.len());
    let mut seen: HashMap<(i64, i64), usize> = HashMap::new();
    for p in seq {
        let p = p.snapped(grid);
        let key = p.key();
        if let Some(&idx) = seen.get(&key) {
            out.truncate(idx + 1);
            seen.clear();
            for (i, q) in out.iter().enumerate() {
                seen.insert(q.key(), i);
            }
        } else {
            out.push(p);
            seen.insert(key, out.len() - 1);
        }
    }
    out
}

/// Drop interior points that reverse direction over at most one grid cell.
fn remove_spikes(seq: &[Point], grid: f64) -> Vec<Point> {
    if seq.len() < 3 {
        return seq.to_vec();
    }
    let mut out: Vec<Point> = vec![seq[0]];
    for i in 1..seq.len() - 1 {
        let a = out[out.len() - 1];
        let b = seq[i];
        let c = seq[i + 1];
        let (s1x, s1y) = SegmentDir::signs(&a, &b);
        let (s2x, s2y) = SegmentDir::signs(&b, &c);
        let opposite = (s1x, s1y) != (0, 0) && s1x == -s2x && s1y == -s2y;
        let short = a.distance_to(&b).min(b.distance_to(&c)) <= grid;
        if opposite && short {
            continue;
        }
        out.push(b);
    }
    out.push(seq[seq.len() - 1]);
    out
}

/// Drop interior points collinear with their surviving predecessor and their
/// successor.
fn simplify(seq: &[Point]) -> Vec<Point> {
    if seq.len() <= 2 {
        return seq.to_vec();
    }
    let mut out: Vec<Point> = vec![seq[0]];
    for i in 1..seq.len() - 1 {
        let a = out[out.len() - 1];
        let b = seq[i];
        let c = seq[i + 1];
        if is_collinear_run(&a, &b, &c) {
            continue;
        }
        out.push(b);
    }
    out.push(seq[seq.len() - 1]);
    out
}

/// Link two points with at most one intermediate vertex so every hop is
/// horizontal, vertical, or 45 degrees. A skew hop becomes an L-shaped
/// horizontal-then-vertical pair.
pub(crate) fn link_orth45(p: &Point, q: &Point, grid: f64) -> Vec<Point> {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    if dx == 0.0 || dy == 0.0 || dx.abs() == dy.abs() {
        return vec![q.snapped(grid)];
    }
    vec![Point::new(q.x, p.y).snapped(grid), q.snapped(grid)]
}

/// Re-walk the sequence pairwise, enforcing the orthogonal/45 invariant and
/// snapping every vertex, then simplify the result once more.
fn rebuild_strict(seq: &[Point], grid: f64) -> Vec<Point> {
    if seq.len() <= 1 {
        return seq.iter().map(|p| p.snapped(grid)).collect();
    }
    let mut out: Vec<Point> = vec![seq[0].snapped(grid)];
    for q in &seq[1..] {
        let last = out[out.len() - 1];
        for p in link_orth45(&last, q, grid) {
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
    }
    simplify(&out)
}
