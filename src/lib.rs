//! # RRT* planner
//! Sampling-based motion planning for point robots in a rectangular
//! workspace with axis-aligned rectangular obstacles:
//! - single-agent RRT* with naive or obstacle-aware sampling
//! - greedy path shortcutting
//! - sequential two-agent planning with space-time conflict avoidance
//!
//! ## Usage
//! Load a [`Workspace`] from a scenario file or build one in code, then
//! call [`plan_path`] or [`plan_two_agent_paths`].

pub mod coordination;
pub mod error;
pub mod geometry;
pub mod path;
pub mod planner;
pub mod sampling;
pub mod tree;
pub mod workspace;

pub use coordination::{plan_two_agent_paths, TimedPath};
pub use error::PlannerError;
pub use path::optimize_path;
pub use planner::{plan_path, PlanResult, PlannerParams, RRTStar};
pub use sampling::SamplingConfig;
pub use workspace::{Obstacle, Point, Workspace};
