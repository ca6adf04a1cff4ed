//! CART decision tree with Gini impurity.

use rand::rngs::StdRng;
use rand::seq::index;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Fraction of class-1 samples that reached this leaf.
        p_up: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Binary classification tree grown until leaves are pure or hold fewer
/// than two samples.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

impl DecisionTree {
    /// Grow a tree on the given sample indices (duplicates allowed).
    ///
    /// `max_features` candidate features are drawn at each node. When none
    /// of them can split the node, the remaining features are tried before
    /// settling on a leaf.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[u8],
        samples: &[usize],
        max_features: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut samples = samples.to_vec();
        let root = Self::grow(features, labels, &mut samples, max_features, rng);
        Self { root }
    }

    /// Class-1 fraction of the leaf the row falls into.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { p_up } => return *p_up,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Depth of the deepest leaf.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    fn grow(
        features: &[Vec<f64>],
        labels: &[u8],
        samples: &mut [usize],
        max_features: usize,
        rng: &mut StdRng,
    ) -> Node {
        let total = samples.len();
        let positives = samples.iter().filter(|&&i| labels[i] == 1).count();
        let p_up = if total == 0 {
            0.5
        } else {
            positives as f64 / total as f64
        };

        if total < 2 || positives == 0 || positives == total {
            return Node::Leaf { p_up };
        }

        let n_features = features[samples[0]].len();
        let drawn = index::sample(rng, n_features, max_features.clamp(1, n_features)).into_vec();

        let mut best = Self::best_split(features, labels, samples, &drawn);
        if best.is_none() {
            let rest: Vec<usize> = (0..n_features).filter(|f| !drawn.contains(f)).collect();
            best = Self::best_split(features, labels, samples, &rest);
        }

        let Some(split) = best else {
            return Node::Leaf { p_up };
        };

        // Partition in place: left side first
        let mut boundary = 0;
        for i in 0..samples.len() {
            if features[samples[i]][split.feature] <= split.threshold {
                samples.swap(i, boundary);
                boundary += 1;
            }
        }
        let (left_samples, right_samples) = samples.split_at_mut(boundary);

        let left = Self::grow(features, labels, left_samples, max_features, rng);
        let right = Self::grow(features, labels, right_samples, max_features, rng);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Lowest weighted Gini impurity split over the candidate features.
    fn best_split(
        features: &[Vec<f64>],
        labels: &[u8],
        samples: &[usize],
        candidates: &[usize],
    ) -> Option<SplitCandidate> {
        let total = samples.len();
        let total_positives = samples.iter().filter(|&&i| labels[i] == 1).count();
        let mut best: Option<SplitCandidate> = None;

        for &feature in candidates {
            let mut ordered: Vec<(f64, u8)> = samples
                .iter()
                .map(|&i| (features[i][feature], labels[i]))
                .collect();
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_positives = 0;
            for k in 1..total {
                left_positives += usize::from(ordered[k - 1].1 == 1);
                let (lower, upper) = (ordered[k - 1].0, ordered[k].0);
                if lower == upper {
                    continue;
                }

                let right_positives = total_positives - left_positives;
                let impurity = (k as f64 * gini(left_positives, k)
                    + (total - k) as f64 * gini(right_positives, total - k))
                    / total as f64;

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = lower + (upper - lower) / 2.0;
                    // Midpoint can round up to `upper` for adjacent floats
                    if threshold >= upper {
                        threshold = lower;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fit_all(features: &[Vec<f64>], labels: &[u8], max_features: usize) -> DecisionTree {
        let samples: Vec<usize> = (0..labels.len()).collect();
        let mut rng = StdRng::seed_from_u64(7);
        DecisionTree::fit(features, labels, &samples, max_features, &mut rng)
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(0, 10), 0.0);
        assert_eq!(gini(10, 10), 0.0);
        assert_eq!(gini(5, 10), 0.5);
    }

    #[test]
    fn test_separable_threshold() {
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let labels: Vec<u8> = (0..10).map(|i| u8::from(i >= 5)).collect();
        let tree = fit_all(&features, &labels, 1);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[2.0]), 0.0);
        assert_eq!(tree.predict(&[8.0]), 1.0);
        assert_eq!(tree.predict(&[4.6]), 1.0);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let tree = fit_all(&features, &[1, 1, 1], 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[100.0]), 1.0);
    }

    #[test]
    fn test_constant_features_give_mixed_leaf() {
        let features = vec![vec![1.0, 1.0]; 4];
        let tree = fit_all(&features, &[1, 0, 1, 1], 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[1.0, 1.0]), 0.75);
    }

    #[test]
    fn test_falls_back_to_undrawn_feature() {
        // Feature 0 is constant, feature 1 separates; only one feature drawn per node
        let features: Vec<Vec<f64>> = (0..8).map(|i| vec![3.0, i as f64]).collect();
        let labels: Vec<u8> = (0..8).map(|i| u8::from(i % 2 == 0 && i < 4)).collect();
        let tree = fit_all(&features, &labels, 1);
        assert!(tree.depth() >= 1);
        assert_eq!(tree.predict(&[3.0, 0.0]), 1.0);
        assert_eq!(tree.predict(&[3.0, 7.0]), 0.0);
    }
}
