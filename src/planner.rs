//! # planner
//! RRT* tree growth for a single agent.
//!
//! Each iteration draws a candidate point, steers from the nearest tree
//! vertex towards it by at most `delta_s`, connects the new vertex to the
//! cheapest collision-free parent within `delta_r` and rewires neighbours
//! through it when that lowers their cost. Growth stops when the goal is
//! connected or when the iteration or wall-clock budget runs out.
//!
//! Iteration accounting: draws that land inside an obstacle and candidates
//! with no collision-free parent are skipped without consuming an
//! iteration, and connecting the goal ends growth before the final
//! iteration is counted. `max_time` bounds the skip loops.

use std::time::Instant;

use config::Config;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coordination::TimedPath;
use crate::error::PlannerError;
use crate::geometry::{distance, point_in_obstacles, segment_intersects_obstacles};
use crate::sampling::{Sampler, SamplingConfig};
use crate::tree::Tree;
use crate::workspace::{Point, Workspace};

/// Growth parameters. `delta_s` is the steering step, `delta_r` the
/// neighbour radius for parent selection and rewiring, `max_time` a
/// wall-clock budget in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerParams {
    pub delta_s: f64,
    pub delta_r: f64,
    pub max_iterations: u64,
    pub max_time: f64,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            delta_s: 1.0,
            delta_r: 2.0,
            max_iterations: 5000,
            max_time: 30.0,
        }
    }
}

impl PlannerParams {
    /// Reads parameters from a configuration file (any format the
    /// `config` crate recognises from the extension).
    pub fn from_file(filename: &str) -> Result<Self, PlannerError> {
        let params = Config::builder()
            .add_source(config::File::with_name(filename))
            .build()?
            .try_deserialize::<PlannerParams>()?;
        Ok(params)
    }
}

/// Outcome of one planning run. On failure (`reached == false`) the
/// waypoint list is empty and the cost is infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub waypoints: Vec<Point>,
    pub cost: f64,
    pub iterations: u64,
    pub reached: bool,
}

/// Moves from `from` towards `toward`, truncating the step to `delta_s`.
pub fn steer(from: &Point, toward: &Point, delta_s: f64) -> Point {
    if distance(from, toward) <= delta_s {
        *toward
    } else {
        let theta = (toward.y - from.y).atan2(toward.x - from.x);
        Point::new(from.x + delta_s * theta.cos(), from.y + delta_s * theta.sin())
    }
}

/// Single-agent RRT* planner. The tree stays available after planning so
/// callers can inspect or serialize it.
#[derive(Debug, Clone)]
pub struct RRTStar {
    pub params: PlannerParams,
    pub tree: Tree,
    pub goal_index: Option<usize>,
    pub agent: usize,
    sampler: Sampler,
    goal: Point,
}

impl RRTStar {
    /// Validates the task for `agent` and seeds the tree at its start.
    pub fn new(
        workspace: &Workspace,
        agent: usize,
        params: PlannerParams,
        sampling: SamplingConfig,
        seed: Option<u64>,
    ) -> Result<Self, PlannerError> {
        if agent >= workspace.agents.len() {
            return Err(PlannerError::AgentIndexOutOfRange {
                index: agent,
                count: workspace.agents.len(),
            });
        }
        if params.delta_s <= 0.0 {
            return Err(PlannerError::NonPositiveStep(params.delta_s));
        }
        if params.delta_r <= 0.0 {
            return Err(PlannerError::NonPositiveRadius(params.delta_r));
        }
        if !sampling.is_valid() {
            return Err(PlannerError::InvalidSamplingConfig);
        }
        let task = &workspace.agents[agent];
        if task.start == task.goal {
            return Err(PlannerError::StartEqualsGoal { agent });
        }
        for (point, what) in [(&task.start, "start"), (&task.goal, "goal")] {
            if !workspace.in_bounds(point) {
                return Err(PlannerError::EndpointOutOfBounds { agent, what });
            }
            if point_in_obstacles(point, &workspace.obstacles) {
                return Err(PlannerError::EndpointInObstacle { agent, what });
            }
        }
        Ok(Self {
            params,
            tree: Tree::new(task.start),
            goal_index: None,
            agent,
            sampler: Sampler::new(workspace, sampling, seed),
            goal: task.goal,
        })
    }

    /// Grows the tree until the goal connects or a budget runs out, and
    /// returns the number of iterations consumed. When `other_path` is
    /// given every candidate edge is additionally checked against it for
    /// space-time conflicts and rewiring is disabled, so costs fixed at
    /// insertion stay valid for the conflict test.
    pub fn grow(&mut self, workspace: &Workspace, other_path: Option<&TimedPath>) -> u64 {
        let started = Instant::now();
        let mut iterations = 0u64;
        while iterations < self.params.max_iterations {
            if started.elapsed().as_secs_f64() >= self.params.max_time {
                warn!(
                    agent = self.agent,
                    iterations, "wall-clock budget exhausted before reaching the goal"
                );
                break;
            }
            let candidate = self.sampler.draw();
            if point_in_obstacles(&candidate, &workspace.obstacles) {
                continue;
            }
            let nearest = self.tree.nearest(&candidate);
            let new_vertex = steer(&self.tree.vertices[nearest], &candidate, self.params.delta_s);

            // Cheapest collision-free parent within delta_r; the nearest
            // vertex is always considered even when it lies further away.
            let mut parent: Option<usize> = None;
            let mut parent_cost = f64::INFINITY;
            if self.edge_is_valid(nearest, &new_vertex, workspace, other_path) {
                parent = Some(nearest);
                parent_cost =
                    self.tree.costs[nearest] + distance(&self.tree.vertices[nearest], &new_vertex);
            }
            for i in self.tree.near(&new_vertex, self.params.delta_r) {
                let through = self.tree.costs[i] + distance(&self.tree.vertices[i], &new_vertex);
                if through < parent_cost && self.edge_is_valid(i, &new_vertex, workspace, other_path)
                {
                    parent = Some(i);
                    parent_cost = through;
                }
            }
            let Some(parent_index) = parent else {
                continue;
            };
            let new_index = self.tree.add_vertex(new_vertex, parent_index);

            if other_path.is_none() {
                self.rewire_neighbours(new_index, workspace);
            }

            if distance(&new_vertex, &self.goal) <= self.params.delta_s
                && self.edge_is_valid(new_index, &self.goal, workspace, other_path)
            {
                let goal_index = self.tree.add_vertex(self.goal, new_index);
                self.goal_index = Some(goal_index);
                info!(
                    agent = self.agent,
                    iterations,
                    cost = self.tree.costs[goal_index],
                    "goal connected"
                );
                break;
            }
            iterations += 1;
            if iterations % 1000 == 0 {
                debug!(
                    agent = self.agent,
                    iterations,
                    vertices = self.tree.len(),
                    "still growing"
                );
            }
        }
        iterations
    }

    /// Runs one full planning attempt and packages the outcome.
    pub fn plan(&mut self, workspace: &Workspace, other_path: Option<&TimedPath>) -> PlanResult {
        let iterations = self.grow(workspace, other_path);
        match self.goal_index {
            Some(goal_index) => {
                let mut waypoints = vec![self.tree.vertices[0]];
                waypoints.extend(self.tree.reconstruct_path(goal_index));
                waypoints.push(self.goal);
                PlanResult {
                    waypoints,
                    cost: self.tree.costs[goal_index],
                    iterations,
                    reached: true,
                }
            }
            None => PlanResult {
                waypoints: Vec::new(),
                cost: f64::INFINITY,
                iterations,
                reached: false,
            },
        }
    }

    /// Reparents neighbours of `new_index` through it wherever that
    /// strictly lowers their cost and the connecting edge is obstacle-free.
    fn rewire_neighbours(&mut self, new_index: usize, workspace: &Workspace) {
        let new_vertex = self.tree.vertices[new_index];
        let new_cost = self.tree.costs[new_index];
        for i in self.tree.near(&new_vertex, self.params.delta_r) {
            if i == new_index || i == 0 {
                continue;
            }
            let d = distance(&self.tree.vertices[i], &new_vertex);
            if new_cost + d < self.tree.costs[i]
                && !segment_intersects_obstacles(
                    &self.tree.vertices[i],
                    &new_vertex,
                    &workspace.obstacles,
                )
            {
                self.tree.reparent(i, new_index);
            }
        }
    }

    /// An edge from tree vertex `from_index` to `to` is valid when it
    /// avoids every obstacle and, in coordinated planning, does not pass
    /// within two radii of the other agent at any crossing.
    fn edge_is_valid(
        &self,
        from_index: usize,
        to: &Point,
        workspace: &Workspace,
        other_path: Option<&TimedPath>,
    ) -> bool {
        let from = &self.tree.vertices[from_index];
        if segment_intersects_obstacles(from, to, &workspace.obstacles) {
            return false;
        }
        match other_path {
            Some(path) => {
                !path.conflicts(from, to, self.tree.costs[from_index], workspace.radius)
            }
            None => true,
        }
    }
}

/// Plans a path for one agent of `workspace` with a fresh planner.
pub fn plan_path(
    workspace: &Workspace,
    agent: usize,
    params: PlannerParams,
    sampling: SamplingConfig,
    seed: Option<u64>,
) -> Result<PlanResult, PlannerError> {
    let mut planner = RRTStar::new(workspace, agent, params, sampling, seed)?;
    Ok(planner.plan(workspace, None))
}
