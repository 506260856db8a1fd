//! # error
//! Configuration errors detected before tree growth begins.
//!
//! Exhausting the iteration budget is deliberately not represented here:
//! an incomplete plan is a normal outcome carried by
//! [`PlanResult::reached`](crate::planner::PlanResult).

use crate::workspace::ScenarioError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("step size delta_s must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("neighbour radius delta_r must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("agent index {index} out of range: workspace defines {count} agent(s)")]
    AgentIndexOutOfRange { index: usize, count: usize },
    #[error("two-agent planning needs two start/goal pairs, workspace defines {count}")]
    MissingSecondAgent { count: usize },
    #[error("start and goal of agent {agent} coincide")]
    StartEqualsGoal { agent: usize },
    #[error("{what} of agent {agent} is out of bounds")]
    EndpointOutOfBounds { agent: usize, what: &'static str },
    #[error("{what} of agent {agent} lies inside an obstacle")]
    EndpointInObstacle { agent: usize, what: &'static str },
    #[error("sampling probabilities p_vertex and p_edge must be non-negative and sum to at most 1")]
    InvalidSamplingConfig,
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("could not load planner parameters: {0}")]
    Config(#[from] config::ConfigError),
}
