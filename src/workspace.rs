//! # workspace
//! The immutable planning environment: bounds, start/goal pairs, clearance
//! radius and rectangular obstacles, plus the scenario-file loader and the
//! precomputed near-obstacle points used by intelligent sampling.

use crate::geometry;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 2-D configuration-space point.
pub type Point = Vector2<f64>;

/// Fraction of the shorter obstacle side used to push sampling-aid points
/// off the obstacle they were derived from.
const NUDGE_FRACTION: f64 = 1e-3;

/// Axis-aligned rectangular obstacle: lower-left corner plus positive extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub ll: Point,
    pub lx: f64,
    pub ly: f64,
}

impl Obstacle {
    pub fn new(ll: Point, lx: f64, ly: f64) -> Self {
        Self { ll, lx, ly }
    }

    /// The four corners in counter-clockwise order starting at the lower left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.ll,
            Vector2::new(self.ll.x + self.lx, self.ll.y),
            Vector2::new(self.ll.x + self.lx, self.ll.y + self.ly),
            Vector2::new(self.ll.x, self.ll.y + self.ly),
        ]
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.lx + self.ly)
    }

    /// Point at arc length `s` along the perimeter (counter-clockwise from
    /// the lower-left corner) together with the outward edge normal.
    fn perimeter_point(&self, s: f64) -> (Point, Vector2<f64>) {
        let s = s.rem_euclid(self.perimeter());
        let (x0, y0) = (self.ll.x, self.ll.y);
        if s < self.lx {
            (Vector2::new(x0 + s, y0), Vector2::new(0.0, -1.0))
        } else if s < self.lx + self.ly {
            let t = s - self.lx;
            (Vector2::new(x0 + self.lx, y0 + t), Vector2::new(1.0, 0.0))
        } else if s < 2.0 * self.lx + self.ly {
            let t = s - self.lx - self.ly;
            (
                Vector2::new(x0 + self.lx - t, y0 + self.ly),
                Vector2::new(0.0, 1.0),
            )
        } else {
            let t = s - 2.0 * self.lx - self.ly;
            (Vector2::new(x0, y0 + self.ly - t), Vector2::new(-1.0, 0.0))
        }
    }

    fn nudge(&self) -> f64 {
        NUDGE_FRACTION * self.lx.min(self.ly)
    }
}

/// One robot's planning task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTask {
    pub start: Point,
    pub goal: Point,
}

/// The planning environment. Immutable for the duration of a run and
/// freely shareable by reference across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub x_max: f64,
    pub y_max: f64,
    pub agents: Vec<AgentTask>,
    pub radius: f64,
    pub obstacles: Vec<Obstacle>,
}

impl Workspace {
    pub fn single_agent(
        x_max: f64,
        y_max: f64,
        start: Point,
        goal: Point,
        radius: f64,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        Self {
            x_max,
            y_max,
            agents: vec![AgentTask { start, goal }],
            radius,
            obstacles,
        }
    }

    pub fn two_agent(
        x_max: f64,
        y_max: f64,
        tasks: [AgentTask; 2],
        radius: f64,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        Self {
            x_max,
            y_max,
            agents: tasks.to_vec(),
            radius,
            obstacles,
        }
    }

    pub fn in_bounds(&self, p: &Point) -> bool {
        p.x >= 0.0 && p.x <= self.x_max && p.y >= 0.0 && p.y <= self.y_max
    }

    /// Obstacle corners nudged diagonally outward so none of them collides.
    /// Points pushed out of bounds or into a neighbouring obstacle are
    /// dropped.
    pub fn corner_sample_points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(4 * self.obstacles.len());
        for obs in &self.obstacles {
            let e = obs.nudge();
            let offsets = [
                Vector2::new(-e, -e),
                Vector2::new(e, -e),
                Vector2::new(e, e),
                Vector2::new(-e, e),
            ];
            for (corner, offset) in obs.corners().iter().zip(offsets.iter()) {
                let p = corner + offset;
                if self.in_bounds(&p) && !geometry::point_in_obstacles(&p, &self.obstacles) {
                    points.push(p);
                }
            }
        }
        points
    }

    /// Seed points along obstacle perimeters, allocated proportionally to
    /// each obstacle's share of the total perimeter and nudged outward along
    /// the edge normal. Points on the workspace boundary, out of bounds or
    /// inside another obstacle are dropped.
    pub fn perimeter_sample_points(&self, total: usize) -> Vec<Point> {
        let perimeter_sum: f64 = self.obstacles.iter().map(Obstacle::perimeter).sum();
        if perimeter_sum == 0.0 || total == 0 {
            return Vec::new();
        }
        let mut points = Vec::with_capacity(total);
        for obs in &self.obstacles {
            let share = obs.perimeter() / perimeter_sum;
            let count = ((total as f64 * share).round() as usize).max(1);
            let spacing = obs.perimeter() / count as f64;
            let e = obs.nudge();
            for k in 0..count {
                let s = (k as f64 + 0.5) * spacing;
                let (on_edge, normal) = obs.perimeter_point(s);
                let p = on_edge + normal * e;
                if self.in_bounds(&p)
                    && !geometry::point_on_workspace_boundary(&p, self.x_max, self.y_max)
                    && !geometry::point_in_obstacles(&p, &self.obstacles)
                {
                    points.push(p);
                }
            }
        }
        points
    }

    /// Loads and validates a scenario description from a file.
    ///
    /// Format (whitespace-separated):
    /// `x_max y_max s1x s1y g1x g1y s2x s2y g2x g2y radius` followed by
    /// zero or more `x y lx ly` obstacle records.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_scenario_str(&text)
    }

    /// Parses and validates a scenario description. See [`Workspace::from_file`].
    pub fn from_scenario_str(text: &str) -> Result<Self, ScenarioError> {
        let values = text
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ScenarioError::InvalidNumber {
                        token: tok.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        if values.len() < 11 {
            return Err(ScenarioError::TruncatedHeader { found: values.len() });
        }

        let (x_max, y_max) = (values[0], values[1]);
        if x_max <= 0.0 || y_max <= 0.0 {
            return Err(ScenarioError::InvalidDimensions { x_max, y_max });
        }
        let radius = values[10];
        if radius < 0.0 {
            return Err(ScenarioError::InvalidRadius { radius });
        }

        let workspace = Self {
            x_max,
            y_max,
            agents: vec![
                AgentTask {
                    start: Vector2::new(values[2], values[3]),
                    goal: Vector2::new(values[4], values[5]),
                },
                AgentTask {
                    start: Vector2::new(values[6], values[7]),
                    goal: Vector2::new(values[8], values[9]),
                },
            ],
            radius,
            obstacles: Vec::new(),
        };
        for (i, task) in workspace.agents.iter().enumerate() {
            if !workspace.in_bounds(&task.start) || !workspace.in_bounds(&task.goal) {
                return Err(ScenarioError::EndpointOutOfBounds { agent: i + 1 });
            }
        }

        let rest = &values[11..];
        if rest.len() % 4 != 0 {
            return Err(ScenarioError::TruncatedObstacle {
                index: rest.len() / 4 + 1,
            });
        }
        let mut workspace = workspace;
        for (i, quad) in rest.chunks_exact(4).enumerate() {
            let (x, y, lx, ly) = (quad[0], quad[1], quad[2], quad[3]);
            if lx <= 0.0 || ly <= 0.0 {
                return Err(ScenarioError::InvalidObstacleSize { index: i + 1, lx, ly });
            }
            if x < 0.0 || x > x_max || y < 0.0 || y > y_max {
                return Err(ScenarioError::ObstacleOutOfBounds { index: i + 1 });
            }
            if x + lx > x_max || y + ly > y_max {
                return Err(ScenarioError::ObstacleExceedsBounds { index: i + 1 });
            }
            workspace
                .obstacles
                .push(Obstacle::new(Vector2::new(x, y), lx, ly));
        }
        Ok(workspace)
    }
}

/// Validation failures while loading a scenario description.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid number in scenario file: '{token}'")]
    InvalidNumber { token: String },
    #[error("scenario header needs 11 values, found {found}")]
    TruncatedHeader { found: usize },
    #[error("invalid environment dimensions: {x_max} x {y_max}")]
    InvalidDimensions { x_max: f64, y_max: f64 },
    #[error("invalid clearance radius: {radius}")]
    InvalidRadius { radius: f64 },
    #[error("start or goal position of agent {agent} is out of bounds")]
    EndpointOutOfBounds { agent: usize },
    #[error("obstacle {index} record is incomplete")]
    TruncatedObstacle { index: usize },
    #[error("obstacle {index} has invalid dimensions: {lx} x {ly}")]
    InvalidObstacleSize { index: usize, lx: f64, ly: f64 },
    #[error("obstacle {index} position is out of bounds")]
    ObstacleOutOfBounds { index: usize },
    #[error("obstacle {index} exceeds environment bounds")]
    ObstacleExceedsBounds { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_in_obstacles;

    const SCENARIO: &str = "10 10  0 0  9 9  9 0  0 9  0.1\n4 4 2 2\n";

    #[test]
    fn test_parse_scenario() {
        let ws = Workspace::from_scenario_str(SCENARIO).unwrap();
        assert_eq!(ws.x_max, 10.0);
        assert_eq!(ws.y_max, 10.0);
        assert_eq!(ws.agents.len(), 2);
        assert_eq!(ws.agents[0].start, Vector2::new(0.0, 0.0));
        assert_eq!(ws.agents[1].goal, Vector2::new(0.0, 9.0));
        assert_eq!(ws.radius, 0.1);
        assert_eq!(ws.obstacles.len(), 1);
        assert_eq!(ws.obstacles[0].ll, Vector2::new(4.0, 4.0));
    }

    #[test]
    fn test_parse_scenario_no_obstacles() {
        let ws = Workspace::from_scenario_str("5 5 0 0 4 4 4 0 0 4 0.2").unwrap();
        assert!(ws.obstacles.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let err = Workspace::from_scenario_str("10 ten 0 0 9 9 9 0 0 9 0.1").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidNumber { .. }));
    }

    #[test]
    fn test_parse_rejects_non_finite_values() {
        // "nan" and "inf" parse as f64 but would slip through every
        // comparison-based validation gate.
        let err = Workspace::from_scenario_str("10 nan 0 0 9 9 9 0 0 9 0.1").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidNumber { .. }));
        let err = Workspace::from_scenario_str("10 10 0 0 inf 9 9 0 0 9 0.1").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidNumber { .. }));
        let err = Workspace::from_scenario_str("10 10 0 0 9 9 9 0 0 9 0.1 4 4 NaN 2").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidNumber { .. }));
    }

    #[test]
    fn test_parse_rejects_short_header() {
        let err = Workspace::from_scenario_str("10 10 0 0").unwrap_err();
        assert!(matches!(err, ScenarioError::TruncatedHeader { found: 4 }));
    }

    #[test]
    fn test_parse_rejects_bad_dimensions() {
        let err = Workspace::from_scenario_str("-1 10 0 0 9 9 9 0 0 9 0.1").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_parse_rejects_negative_radius() {
        let err = Workspace::from_scenario_str("10 10 0 0 9 9 9 0 0 9 -0.5").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidRadius { .. }));
    }

    #[test]
    fn test_parse_rejects_out_of_bounds_endpoint() {
        let err = Workspace::from_scenario_str("10 10 0 0 11 9 9 0 0 9 0.1").unwrap_err();
        assert!(matches!(err, ScenarioError::EndpointOutOfBounds { agent: 1 }));
    }

    #[test]
    fn test_parse_rejects_bad_obstacles() {
        let base = "10 10 0 0 9 9 9 0 0 9 0.1";
        let err = Workspace::from_scenario_str(&format!("{base} 4 4 2")).unwrap_err();
        assert!(matches!(err, ScenarioError::TruncatedObstacle { .. }));
        let err = Workspace::from_scenario_str(&format!("{base} 4 4 0 2")).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidObstacleSize { .. }));
        let err = Workspace::from_scenario_str(&format!("{base} -1 4 2 2")).unwrap_err();
        assert!(matches!(err, ScenarioError::ObstacleOutOfBounds { .. }));
        let err = Workspace::from_scenario_str(&format!("{base} 9 9 2 2")).unwrap_err();
        assert!(matches!(err, ScenarioError::ObstacleExceedsBounds { .. }));
    }

    #[test]
    fn test_corner_sample_points_clear_of_obstacles() {
        let ws = Workspace::from_scenario_str(SCENARIO).unwrap();
        let corners = ws.corner_sample_points();
        assert_eq!(corners.len(), 4);
        for p in &corners {
            assert!(ws.in_bounds(p));
            assert!(!point_in_obstacles(p, &ws.obstacles));
        }
    }

    #[test]
    fn test_corner_points_dropped_when_out_of_bounds() {
        // Obstacle flush with the workspace corner: its lower-left nudge
        // lands outside the bounds and is dropped.
        let ws = Workspace::single_agent(
            10.0,
            10.0,
            Vector2::new(5.0, 5.0),
            Vector2::new(9.0, 9.0),
            0.0,
            vec![Obstacle::new(Vector2::new(0.0, 0.0), 2.0, 2.0)],
        );
        let corners = ws.corner_sample_points();
        assert_eq!(corners.len(), 1);
    }

    #[test]
    fn test_perimeter_sample_points() {
        let ws = Workspace::from_scenario_str(SCENARIO).unwrap();
        let points = ws.perimeter_sample_points(16);
        assert!(!points.is_empty());
        for p in &points {
            assert!(ws.in_bounds(p));
            assert!(!point_in_obstacles(p, &ws.obstacles));
        }
    }

    #[test]
    fn test_perimeter_allocation_proportional() {
        // Two obstacles with perimeters 8 and 24: 1/4 vs 3/4 of the seeds.
        let ws = Workspace::single_agent(
            100.0,
            100.0,
            Vector2::new(50.0, 50.0),
            Vector2::new(90.0, 90.0),
            0.0,
            vec![
                Obstacle::new(Vector2::new(10.0, 10.0), 2.0, 2.0),
                Obstacle::new(Vector2::new(30.0, 30.0), 6.0, 6.0),
            ],
        );
        let points = ws.perimeter_sample_points(32);
        let near_small = points
            .iter()
            .filter(|p| p.x < 20.0 && p.y < 20.0)
            .count();
        assert_eq!(near_small, 8);
        assert_eq!(points.len() - near_small, 24);
    }

    #[test]
    fn test_perimeter_point_walks_all_edges() {
        let obs = Obstacle::new(Vector2::new(0.0, 0.0), 2.0, 1.0);
        let (p, n) = obs.perimeter_point(1.0);
        assert_eq!(p, Vector2::new(1.0, 0.0));
        assert_eq!(n, Vector2::new(0.0, -1.0));
        let (p, n) = obs.perimeter_point(2.5);
        assert_eq!(p, Vector2::new(2.0, 0.5));
        assert_eq!(n, Vector2::new(1.0, 0.0));
        let (p, n) = obs.perimeter_point(4.0);
        assert_eq!(p, Vector2::new(1.0, 1.0));
        assert_eq!(n, Vector2::new(0.0, 1.0));
        let (p, n) = obs.perimeter_point(5.5);
        assert_eq!(p, Vector2::new(0.0, 0.5));
        assert_eq!(n, Vector2::new(-1.0, 0.0));
    }
}
