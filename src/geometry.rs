//! # geometry
//! Exact 2-D primitives over points, segments and axis-aligned rectangles.
//!
//! Everything here is a pure function; the planner calls into this module
//! for every candidate edge it considers.

use crate::workspace::{Obstacle, Point};

/// Denominators smaller than this are treated as zero when clipping.
const CLIP_EPS: f64 = 1e-12;

/// Relative tolerance for the workspace boundary test.
const BOUNDARY_REL_TOL: f64 = 1e-12;

/// Euclidean distance between two points.
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    (p1 - p2).norm()
}

/// Total length of a polyline.
pub fn path_length(path: &[Point]) -> f64 {
    path.iter()
        .zip(path.iter().skip(1))
        .map(|(p1, p2)| distance(p1, p2))
        .sum()
}

/// Whether the closed segments p1-p2 and p3-p4 share a point.
///
/// Parametric determinant test with both parameters required in [0, 1],
/// so touching endpoints count as an intersection. A zero determinant
/// (parallel segments, including truly overlapping collinear ones) is
/// classified as non-intersecting; downstream edge checks rely on this
/// classification being consistent, so it must not be "fixed" here.
pub fn segments_intersect(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let det = d1.x * d2.y - d1.y * d2.x;
    if det == 0.0 {
        return false;
    }
    let t1 = ((p3.x - p1.x) * d2.y - (p3.y - p1.y) * d2.x) / det;
    let t2 = ((p3.x - p1.x) * d1.y - (p3.y - p1.y) * d1.x) / det;
    (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2)
}

/// The crossing point of two segments already known to intersect.
///
/// Solves the same parametric system as [`segments_intersect`]; the caller
/// guarantees a non-zero determinant.
pub fn intersection_point(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> Point {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let det = d1.x * d2.y - d1.y * d2.x;
    debug_assert!(det != 0.0, "intersection_point called on parallel segments");
    let t1 = ((p3.x - p1.x) * d2.y - (p3.y - p1.y) * d2.x) / det;
    p1 + d1 * t1
}

/// Whether the segment p1-p2 crosses any of the rectangle's four edges.
pub fn segment_intersects_rectangle(p1: &Point, p2: &Point, rect: &Obstacle) -> bool {
    let corners = rect.corners();
    (0..4).any(|i| segments_intersect(p1, p2, &corners[i], &corners[(i + 1) % 4]))
}

/// Whether the segment p1-p2 crosses any obstacle; stops at the first hit.
pub fn segment_intersects_obstacles(p1: &Point, p2: &Point, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obs| segment_intersects_rectangle(p1, p2, obs))
}

/// Closed-interval containment: points on the rectangle edge are inside.
pub fn point_in_rectangle(p: &Point, rect: &Obstacle) -> bool {
    p.x >= rect.ll.x && p.x <= rect.ll.x + rect.lx && p.y >= rect.ll.y && p.y <= rect.ll.y + rect.ly
}

/// Whether the point lies inside (or on the edge of) any obstacle.
pub fn point_in_obstacles(p: &Point, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|obs| point_in_rectangle(p, obs))
}

/// Whether p lies on one of the four workspace edges, within a relative
/// tolerance of the corresponding extent.
pub fn point_on_workspace_boundary(p: &Point, x_max: f64, y_max: f64) -> bool {
    let tol_x = BOUNDARY_REL_TOL * x_max;
    let tol_y = BOUNDARY_REL_TOL * y_max;
    p.x.abs() <= tol_x
        || (p.x - x_max).abs() <= tol_x
        || p.y.abs() <= tol_y
        || (p.y - y_max).abs() <= tol_y
}

/// Length of the portion of segment p1-p2 that lies inside the rectangle.
///
/// Liang-Barsky clipping: the segment's parametric interval [0, 1] is
/// intersected with the rectangle's four half-plane constraints. A
/// denominator below [`CLIP_EPS`] leaves that axis unconstrained unless the
/// segment is entirely outside the slab, which keeps near-axis-parallel
/// directions from dividing by ~0.
pub fn penetration_distance(p1: &Point, p2: &Point, rect: &Obstacle) -> f64 {
    let d = p2 - p1;
    let len = d.norm();
    if len < CLIP_EPS {
        return 0.0;
    }
    let p = [-d.x, d.x, -d.y, d.y];
    let q = [
        p1.x - rect.ll.x,
        rect.ll.x + rect.lx - p1.x,
        p1.y - rect.ll.y,
        rect.ll.y + rect.ly - p1.y,
    ];
    let mut t_start: f64 = 0.0;
    let mut t_end: f64 = 1.0;
    for k in 0..4 {
        if p[k].abs() < CLIP_EPS {
            if q[k] < 0.0 {
                return 0.0; // parallel to this slab and outside it
            }
        } else {
            let r = q[k] / p[k];
            if p[k] < 0.0 {
                t_start = t_start.max(r);
            } else {
                t_end = t_end.min(r);
            }
        }
    }
    if t_start >= t_end {
        return 0.0;
    }
    (t_end - t_start) * len
}

/// Sum of [`penetration_distance`] over all obstacles.
pub fn total_penetration_distance(p1: &Point, p2: &Point, obstacles: &[Obstacle]) -> f64 {
    obstacles
        .iter()
        .map(|obs| penetration_distance(p1, p2, obs))
        .sum()
}
