//! Depth-limited CART regression tree with squared-error splits.
//!
//! Splits are exhaustive over every feature and every boundary between
//! distinct sorted values. Ties go to the lowest feature index, then the
//! lowest threshold, so a fit is a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Minimum variance reduction (in sum-of-squares units) worth a split.
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a single tree.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// A node with fewer samples becomes a leaf.
    pub min_samples_split: usize,
    /// Each child of a split keeps at least this many samples.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        /// Rows with `x[feature] <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree. Nodes are stored in a flat arena; index 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    /// Fit to `targets` using the rows of `x` selected by `indices`.
    ///
    /// `indices` must be non-empty and every row must have the same width.
    pub fn fit(x: &[Vec<f64>], targets: &[f64], indices: &[usize], params: &TreeParams) -> Self {
        let mut tree = RegressionTree { nodes: Vec::new() };
        tree.grow(x, targets, indices.to_vec(), 0, params);
        tree
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean(targets, &indices),
        });

        let can_split = depth < params.max_depth
            && indices.len() >= params.min_samples_split.max(2)
            && indices.len() >= 2 * params.min_samples_leaf.max(1);
        if !can_split {
            return id;
        }

        let Some(split) = best_split(x, targets, &indices, params.min_samples_leaf.max(1)) else {
            return id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[i][split.feature] <= split.threshold);

        let left = self.grow(x, targets, left_idx, depth + 1, params);
        let right = self.grow(x, targets, right_idx, depth + 1, params);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Predict the leaf value for one row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

/// Best split by `sum_l^2 / n_l + sum_r^2 / n_r`, which is maximal exactly
/// where the children's summed squared error is minimal.
fn best_split(x: &[Vec<f64>], targets: &[f64], indices: &[usize], min_leaf: usize) -> Option<Split> {
    let n = indices.len();
    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let parent_score = total * total / n as f64;
    let width = x[indices[0]].len();

    let mut best: Option<Split> = None;
    let mut order = indices.to_vec();

    for feature in 0..width {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        for k in 1..n {
            left_sum += targets[order[k - 1]];
            if k < min_leaf || n - k < min_leaf {
                continue;
            }
            let lo = x[order[k - 1]][feature];
            let hi = x[order[k]][feature];
            if lo >= hi {
                continue;
            }

            let right_sum = total - left_sum;
            let score = left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;
            if score <= parent_score + MIN_GAIN {
                continue;
            }
            if best.is_none_or(|b| score > b.score) {
                best = Some(Split {
                    feature,
                    threshold: midpoint(lo, hi),
                    score,
                });
            }
        }
    }
    best
}

/// A threshold in `[lo, hi)`, preferring the midpoint.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo * 0.5 + hi * 0.5;
    if mid >= lo && mid < hi { mid } else { lo }
}
