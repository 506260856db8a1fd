//! # sampling
//! Candidate-point generation for tree growth.
//!
//! Naive sampling draws uniformly over the workspace; intelligent sampling
//! mixes in precomputed near-obstacle points to improve narrow-passage
//! discovery. The generator is injected so runs are reproducible.

use crate::workspace::{Point, Workspace};
use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};

/// Sampling strategy, selected by configuration rather than subtyping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SamplingConfig {
    /// Uniform over the workspace bounds.
    Naive,
    /// With probability `p_vertex` draw from nudged obstacle corners, with
    /// probability `p_edge` from perimeter seed points (`edge_points` of
    /// them in total), otherwise fall back to uniform sampling.
    Intelligent {
        p_vertex: f64,
        p_edge: f64,
        edge_points: usize,
    },
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig::Naive
    }
}

impl SamplingConfig {
    /// Probabilities must be non-negative and sum to at most 1.
    pub fn is_valid(&self) -> bool {
        match *self {
            SamplingConfig::Naive => true,
            SamplingConfig::Intelligent { p_vertex, p_edge, .. } => {
                p_vertex >= 0.0 && p_edge >= 0.0 && p_vertex + p_edge <= 1.0
            }
        }
    }
}

/// Stateful sample source owning the RNG and the precomputed point pools.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: SamplingConfig,
    x_max: f64,
    y_max: f64,
    vertex_points: Vec<Point>,
    edge_points: Vec<Point>,
    rng: ChaChaRng,
}

impl Sampler {
    /// Builds the sampler for a workspace, precomputing the intelligent
    /// pools when that strategy is configured. A `None` seed falls back to
    /// OS entropy.
    pub fn new(workspace: &Workspace, config: SamplingConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaChaRng::seed_from_u64(seed),
            None => ChaChaRng::from_entropy(),
        };
        let (vertex_points, edge_points) = match config {
            SamplingConfig::Naive => (Vec::new(), Vec::new()),
            SamplingConfig::Intelligent { edge_points, .. } => (
                workspace.corner_sample_points(),
                workspace.perimeter_sample_points(edge_points),
            ),
        };
        Self {
            config,
            x_max: workspace.x_max,
            y_max: workspace.y_max,
            vertex_points,
            edge_points,
            rng,
        }
    }

    /// Draws one candidate point. The caller rejects candidates that land
    /// inside an obstacle (a rejected draw does not consume an iteration).
    pub fn draw(&mut self) -> Point {
        match self.config {
            SamplingConfig::Naive => self.uniform(),
            SamplingConfig::Intelligent { p_vertex, p_edge, .. } => {
                let u: f64 = self.rng.gen();
                if u < p_vertex && !self.vertex_points.is_empty() {
                    self.vertex_points[self.rng.gen_range(0..self.vertex_points.len())]
                } else if u < p_vertex + p_edge && !self.edge_points.is_empty() {
                    self.edge_points[self.rng.gen_range(0..self.edge_points.len())]
                } else {
                    self.uniform()
                }
            }
        }
    }

    fn uniform(&mut self) -> Point {
        Vector2::new(
            self.rng.gen_range(0.0..self.x_max),
            self.rng.gen_range(0.0..self.y_max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_in_obstacles;
    use crate::workspace::Obstacle;

    fn workspace() -> Workspace {
        Workspace::single_agent(
            10.0,
            10.0,
            Vector2::new(0.0, 0.0),
            Vector2::new(9.0, 9.0),
            0.1,
            vec![Obstacle::new(Vector2::new(4.0, 4.0), 2.0, 2.0)],
        )
    }

    #[test]
    fn test_naive_within_bounds() {
        let ws = workspace();
        let mut sampler = Sampler::new(&ws, SamplingConfig::Naive, Some(1));
        for _ in 0..200 {
            let p = sampler.draw();
            assert!(ws.in_bounds(&p));
        }
    }

    #[test]
    fn test_seeded_draws_are_deterministic() {
        let ws = workspace();
        let config = SamplingConfig::Intelligent {
            p_vertex: 0.2,
            p_edge: 0.3,
            edge_points: 16,
        };
        let mut a = Sampler::new(&ws, config, Some(42));
        let mut b = Sampler::new(&ws, config, Some(42));
        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_vertex_only_draws_come_from_corner_pool() {
        let ws = workspace();
        let config = SamplingConfig::Intelligent {
            p_vertex: 1.0,
            p_edge: 0.0,
            edge_points: 0,
        };
        let pool = ws.corner_sample_points();
        let mut sampler = Sampler::new(&ws, config, Some(7));
        for _ in 0..50 {
            let p = sampler.draw();
            assert!(pool.contains(&p));
            assert!(!point_in_obstacles(&p, &ws.obstacles));
        }
    }

    #[test]
    fn test_edge_only_draws_come_from_perimeter_pool() {
        let ws = workspace();
        let config = SamplingConfig::Intelligent {
            p_vertex: 0.0,
            p_edge: 1.0,
            edge_points: 24,
        };
        let pool = ws.perimeter_sample_points(24);
        let mut sampler = Sampler::new(&ws, config, Some(7));
        for _ in 0..50 {
            let p = sampler.draw();
            assert!(pool.contains(&p));
        }
    }

    #[test]
    fn test_intelligent_without_obstacles_falls_back_to_uniform() {
        let ws = Workspace::single_agent(
            10.0,
            10.0,
            Vector2::new(0.0, 0.0),
            Vector2::new(9.0, 9.0),
            0.1,
            Vec::new(),
        );
        let config = SamplingConfig::Intelligent {
            p_vertex: 0.5,
            p_edge: 0.5,
            edge_points: 16,
        };
        let mut sampler = Sampler::new(&ws, config, Some(3));
        for _ in 0..100 {
            assert!(ws.in_bounds(&sampler.draw()));
        }
    }

    #[test]
    fn test_config_validity() {
        assert!(SamplingConfig::Naive.is_valid());
        assert!(SamplingConfig::Intelligent {
            p_vertex: 0.4,
            p_edge: 0.6,
            edge_points: 8
        }
        .is_valid());
        assert!(!SamplingConfig::Intelligent {
            p_vertex: 0.7,
            p_edge: 0.6,
            edge_points: 8
        }
        .is_valid());
        assert!(!SamplingConfig::Intelligent {
            p_vertex: -0.1,
            p_edge: 0.5,
            edge_points: 8
        }
        .is_valid());
    }
}
