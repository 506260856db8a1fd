//! # coordination
//! Sequential two-agent planning with space-time conflict avoidance.
//!
//! The first agent plans alone with full RRT* rewiring. Its path is then
//! annotated with arrival costs (path length doubles as arrival time for
//! unit-speed agents) and the second agent plans against it: every
//! candidate edge that geometrically crosses the first path is rejected
//! when the two agents would reach the crossing within two radii of each
//! other. The second planner does not rewire, so the insertion-time costs
//! its conflict checks rely on never change afterwards.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PlannerError;
use crate::geometry::{distance, intersection_point, segments_intersect};
use crate::planner::{PlanResult, PlannerParams, RRTStar};
use crate::sampling::SamplingConfig;
use crate::workspace::{Point, Workspace};

/// A polyline with the cumulative path length at each waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPath {
    pub points: Vec<Point>,
    pub arrival_costs: Vec<f64>,
}

impl TimedPath {
    pub fn new(points: Vec<Point>) -> Self {
        let mut arrival_costs = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += distance(&points[i - 1], p);
            }
            arrival_costs.push(total);
        }
        Self {
            points,
            arrival_costs,
        }
    }

    /// Path with no waypoints; conflicts with nothing.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            arrival_costs: Vec::new(),
        }
    }

    /// Whether an agent traversing the edge `a` to `b`, arriving at `a`
    /// with cost `cost_at_a`, would pass within `2 * radius` (in arrival
    /// cost) of this path's agent at any geometric crossing. Parallel
    /// overlapping segments produce no crossing and therefore no conflict.
    pub fn conflicts(&self, a: &Point, b: &Point, cost_at_a: f64, radius: f64) -> bool {
        for (k, seg) in self.points.windows(2).enumerate() {
            if segments_intersect(a, b, &seg[0], &seg[1]) {
                let crossing = intersection_point(a, b, &seg[0], &seg[1]);
                let own_arrival = cost_at_a + distance(a, &crossing);
                let other_arrival = self.arrival_costs[k] + distance(&seg[0], &crossing);
                if (own_arrival - other_arrival).abs() < 2.0 * radius {
                    return true;
                }
            }
        }
        false
    }
}

/// Plans both agents of a two-agent workspace in sequence. When the first
/// agent fails its result is still returned and the second agent plans
/// unconstrained. The second planner draws from a derived seed so the two
/// sample streams differ.
pub fn plan_two_agent_paths(
    workspace: &Workspace,
    params: PlannerParams,
    sampling: SamplingConfig,
    seed: Option<u64>,
) -> Result<(PlanResult, PlanResult), PlannerError> {
    if workspace.agents.len() < 2 {
        return Err(PlannerError::MissingSecondAgent {
            count: workspace.agents.len(),
        });
    }
    let mut first = RRTStar::new(workspace, 0, params, sampling, seed)?;
    let first_result = first.plan(workspace, None);
    let timed = if first_result.reached {
        TimedPath::new(first_result.waypoints.clone())
    } else {
        warn!("first agent found no path; second agent plans unconstrained");
        TimedPath::empty()
    };
    let mut second = RRTStar::new(
        workspace,
        1,
        params,
        sampling,
        seed.map(|s| s.wrapping_add(1)),
    )?;
    let second_result = second.plan(workspace, Some(&timed));
    Ok((first_result, second_result))
}
