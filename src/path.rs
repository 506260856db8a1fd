//! # path
//! Greedy shortcutting of a planned path.

use crate::geometry::{path_length, segment_intersects_obstacles};
use crate::workspace::{Point, Workspace};

/// Replaces chains of waypoints with direct obstacle-free segments. From
/// each kept waypoint the farthest reachable later waypoint is connected
/// next, scanning candidates from the end of the path backwards. The
/// first and last waypoints always survive, adjacent waypoints stay
/// connected as-is, and the result is returned with its length.
///
/// Running the pass a second time changes nothing: every kept edge was
/// chosen as the farthest reachable shortcut already.
pub fn optimize_path(workspace: &Workspace, path: &[Point]) -> (Vec<Point>, f64) {
    if path.len() <= 2 {
        return (path.to_vec(), path_length(path));
    }
    let mut kept = vec![path[0]];
    let mut i = 0;
    while i < path.len() - 1 {
        let mut next = i + 1;
        let mut j = path.len() - 1;
        while j > i + 1 {
            if !segment_intersects_obstacles(&path[i], &path[j], &workspace.obstacles) {
                next = j;
                break;
            }
            j -= 1;
        }
        kept.push(path[next]);
        i = next;
    }
    let cost = path_length(&kept);
    (kept, cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Obstacle;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn pt(x: f64, y: f64) -> Point {
        Vector2::new(x, y)
    }

    fn open_workspace() -> Workspace {
        Workspace::single_agent(
            10.0,
            10.0,
            pt(0.0, 0.0),
            pt(9.0, 9.0),
            0.1,
            Vec::new(),
        )
    }

    #[test]
    fn test_short_paths_pass_through() {
        let ws = open_workspace();
        let path = vec![pt(0.0, 0.0), pt(3.0, 4.0)];
        let (optimized, cost) = optimize_path(&ws, &path);
        assert_eq!(optimized, path);
        assert_relative_eq!(cost, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_open_workspace_collapses_to_endpoints() {
        let ws = open_workspace();
        let path = vec![
            pt(0.0, 0.0),
            pt(0.0, 3.0),
            pt(3.0, 3.0),
            pt(3.0, 0.0),
            pt(6.0, 0.0),
        ];
        let (optimized, cost) = optimize_path(&ws, &path);
        assert_eq!(optimized, vec![pt(0.0, 0.0), pt(6.0, 0.0)]);
        assert_relative_eq!(cost, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_keeps_waypoint_forced_by_obstacle() {
        let ws = Workspace::single_agent(
            10.0,
            10.0,
            pt(0.0, 0.0),
            pt(9.0, 9.0),
            0.1,
            vec![Obstacle::new(pt(4.0, 4.0), 2.0, 2.0)],
        );
        let path = vec![
            pt(0.0, 0.0),
            pt(2.0, 2.0),
            pt(3.0, 7.0),
            pt(7.0, 7.0),
            pt(9.0, 9.0),
        ];
        let (optimized, cost) = optimize_path(&ws, &path);
        assert_eq!(optimized, vec![pt(0.0, 0.0), pt(3.0, 7.0), pt(9.0, 9.0)]);
        assert_relative_eq!(
            cost,
            58.0_f64.sqrt() + 40.0_f64.sqrt(),
            epsilon = 1e-12
        );
        for pair in optimized.windows(2) {
            assert!(!segment_intersects_obstacles(
                &pair[0],
                &pair[1],
                &ws.obstacles
            ));
        }
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let ws = Workspace::single_agent(
            10.0,
            10.0,
            pt(0.0, 0.0),
            pt(9.0, 9.0),
            0.1,
            vec![Obstacle::new(pt(4.0, 4.0), 2.0, 2.0)],
        );
        let path = vec![
            pt(0.0, 0.0),
            pt(1.0, 3.0),
            pt(2.0, 2.0),
            pt(3.0, 7.0),
            pt(6.5, 7.5),
            pt(7.0, 7.0),
            pt(9.0, 9.0),
        ];
        let (once, cost_once) = optimize_path(&ws, &path);
        let (twice, cost_twice) = optimize_path(&ws, &once);
        assert_eq!(once, twice);
        assert_eq!(cost_once, cost_twice);
        assert!(cost_once <= crate::geometry::path_length(&path));
    }
}
