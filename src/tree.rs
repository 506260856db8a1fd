//! # tree
//! Append-only search tree stored as parallel index-addressed arrays.
//!
//! Vertex 0 is always the root. The cost invariant
//! `costs[i] == costs[parents[i]] + distance(vertices[parents[i]], vertices[i])`
//! holds after every operation; [`Tree::reparent`] therefore refreshes the
//! costs of the moved vertex's whole subtree.

use crate::geometry::distance;
use crate::workspace::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub vertices: Vec<Point>,
    pub parents: Vec<Option<usize>>,
    pub costs: Vec<f64>,
}

impl Tree {
    /// One-vertex tree rooted at `root` with cost 0.
    pub fn new(root: Point) -> Self {
        Self {
            vertices: vec![root],
            parents: vec![None],
            costs: vec![0.0],
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends `vertex` under an existing parent and returns its index.
    pub fn add_vertex(&mut self, vertex: Point, parent_index: usize) -> usize {
        debug_assert!(parent_index < self.len(), "parent index out of range");
        self.vertices.push(vertex);
        self.parents.push(Some(parent_index));
        self.costs
            .push(self.costs[parent_index] + distance(&self.vertices[parent_index], &vertex));
        self.len() - 1
    }

    /// Reparents `index` to `new_parent`, recomputing its cost from the
    /// invariant and refreshing the costs of its descendants.
    pub fn reparent(&mut self, index: usize, new_parent: usize) {
        debug_assert!(index != 0, "cannot reparent the root");
        debug_assert!(new_parent < self.len(), "parent index out of range");
        debug_assert!(
            !self.has_ancestor(new_parent, index),
            "reparenting would create a cycle"
        );
        self.parents[index] = Some(new_parent);
        self.costs[index] =
            self.costs[new_parent] + distance(&self.vertices[new_parent], &self.vertices[index]);
        self.refresh_subtree_costs(index);
    }

    /// Index of the vertex closest to `p`. Linear scan; ties resolve to the
    /// first-seen (lowest) index.
    pub fn nearest(&self, p: &Point) -> usize {
        let mut best = 0;
        let mut best_dist = distance(&self.vertices[0], p);
        for (i, v) in self.vertices.iter().enumerate().skip(1) {
            let d = distance(v, p);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }

    /// Indices of all vertices strictly within `radius` of `p`.
    pub fn near(&self, p: &Point, radius: f64) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| distance(v, p) < radius)
            .map(|(i, _)| i)
            .collect()
    }

    /// Walks parent links from `vertex_index` back to the root and returns
    /// the intermediate vertices in start-to-goal order. The root and the
    /// vertex at `vertex_index` itself are excluded; callers that need the
    /// endpoints prepend and append them separately.
    pub fn reconstruct_path(&self, vertex_index: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut current = self.parents[vertex_index];
        while let Some(i) = current {
            if self.parents[i].is_none() {
                break; // reached the root
            }
            path.push(self.vertices[i]);
            current = self.parents[i];
        }
        path.reverse();
        path
    }

    fn has_ancestor(&self, mut index: usize, ancestor: usize) -> bool {
        if index == ancestor {
            return true;
        }
        let mut steps = 0;
        while let Some(p) = self.parents[index] {
            if p == ancestor {
                return true;
            }
            index = p;
            steps += 1;
            debug_assert!(steps <= self.len(), "parent chain does not terminate");
        }
        false
    }

    fn refresh_subtree_costs(&mut self, root: usize) {
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            for j in 1..self.len() {
                if self.parents[j] == Some(i) && j != root {
                    self.costs[j] =
                        self.costs[i] + distance(&self.vertices[i], &self.vertices[j]);
                    stack.push(j);
                }
            }
        }
    }
}
