//! Bagged decision-tree ensemble for binary classification
//!
//! Axis-aligned CART trees on bootstrap samples, gini impurity, per-split
//! feature subsampling, probability = mean of leaf positive fractions across
//! trees. Every random draw comes from a seeded generator so a fixed seed
//! reproduces the model exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_LEAF: usize = 2;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        prob: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { prob } => return prob,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit `n_trees` trees on bootstrap samples of the rows. `seed` fully
    /// determines the model.
    pub fn fit(rows: &[Vec<f64>], labels: &[bool], n_trees: usize, max_depth: usize, seed: u64) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        let mtry = ((n_features as f64).sqrt().ceil() as usize).clamp(1, n_features.max(1));

        let trees = (0..n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                let sample: Vec<usize> =
                    (0..rows.len()).map(|_| rng.gen_range(0..rows.len())).collect();
                let mut builder = TreeBuilder {
                    rows,
                    labels,
                    max_depth,
                    mtry,
                    n_features,
                    rng,
                    nodes: Vec::new(),
                };
                builder.grow(sample, 0);
                DecisionTree {
                    nodes: builder.nodes,
                }
            })
            .collect();

        RandomForest { trees }
    }

    /// Probability of the positive class for one feature row.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) >= 0.5
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    labels: &'a [bool],
    max_depth: usize,
    mtry: usize,
    n_features: usize,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `indices`, returning its node index.
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let positives = indices.iter().filter(|&&i| self.labels[i]).count();
        let prob = positives as f64 / indices.len().max(1) as f64;

        if depth >= self.max_depth
            || indices.len() < 2 * MIN_LEAF
            || positives == 0
            || positives == indices.len()
        {
            return self.push(Node::Leaf { prob });
        }

        let Some((feature, threshold)) = self.best_split(&indices) else {
            return self.push(Node::Leaf { prob });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][feature] <= threshold);

        let slot = self.push(Node::Leaf { prob });
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[slot] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        slot
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Best gini split over a random feature subset, or `None` if nothing
    /// separates the rows.
    fn best_split(&mut self, indices: &[usize]) -> Option<(usize, f64)> {
        let features = sample_features(&mut self.rng, self.n_features, self.mtry);
        let n = indices.len();
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in features {
            let mut pairs: Vec<(f64, bool)> = indices
                .iter()
                .map(|&i| (self.rows[i][feature], self.labels[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            let total_pos = pairs.iter().filter(|(_, label)| *label).count();

            let mut left_pos = 0usize;
            for i in 0..n - 1 {
                if pairs[i].1 {
                    left_pos += 1;
                }
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }
                let left_n = i + 1;
                let right_n = n - left_n;
                if left_n < MIN_LEAF || right_n < MIN_LEAF {
                    continue;
                }
                let right_pos = total_pos - left_pos;
                let weighted = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(right_pos, right_n))
                    / n as f64;
                let threshold = (pairs[i].0 + pairs[i + 1].0) / 2.0;
                if best.map_or(true, |(_, _, score)| weighted < score) {
                    best = Some((feature, threshold, weighted));
                }
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

/// Draw `count` distinct feature indices.
fn sample_features(rng: &mut StdRng, n_features: usize, count: usize) -> Vec<usize> {
    let mut all: Vec<usize> = (0..n_features).collect();
    for i in 0..count.min(n_features) {
        let j = rng.gen_range(i..n_features);
        all.swap(i, j);
    }
    all.truncate(count.min(n_features));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows separable on the first feature: x0 > 0.5 means positive.
    fn separable() -> (Vec<Vec<f64>>, Vec<bool>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..60 {
            let x0 = (i % 10) as f64 / 10.0;
            let x1 = (i % 7) as f64;
            rows.push(vec![x0, x1]);
            labels.push(x0 > 0.5);
        }
        (rows, labels)
    }

    #[test]
    fn learns_separable_pattern() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, 25, 6, 42);
        assert!(forest.predict_proba(&[0.9, 3.0]) > 0.5);
        assert!(forest.predict_proba(&[0.1, 3.0]) < 0.5);
    }

    #[test]
    fn probabilities_are_bounded() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, 25, 6, 42);
        for row in &rows {
            let p = forest.predict_proba(row);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn fixed_seed_reproduces_model() {
        let (rows, labels) = separable();
        let a = RandomForest::fit(&rows, &labels, 15, 6, 7);
        let b = RandomForest::fit(&rows, &labels, 15, 6, 7);
        for row in rows.iter().take(10) {
            assert_eq!(a.predict_proba(row), b.predict_proba(row));
        }
    }

    #[test]
    fn repeated_scoring_is_stable() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, 15, 6, 7);
        let row = vec![0.3, 2.0];
        assert_eq!(forest.predict_proba(&row), forest.predict_proba(&row));
    }

    #[test]
    fn pure_node_yields_extreme_probability() {
        let rows = vec![vec![0.0], vec![0.1], vec![0.9], vec![1.0]];
        let labels = vec![false, false, true, true];
        let forest = RandomForest::fit(&rows, &labels, 40, 4, 3);
        assert!(forest.predict(&[1.0]));
        assert!(!forest.predict(&[0.0]));
    }
}
