//! Bagged ensemble of CART trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tree::DecisionTree;
use crate::config::ClassifierConfig;

/// Random forest classifier.
///
/// Each tree is grown on a bootstrap sample and considers `sqrt(n_features)`
/// features per split. A fixed seed gives identical forests for identical
/// data.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Train on `features` (one row per sample) and binary `labels`.
    pub fn fit(features: &[Vec<f64>], labels: &[u8], config: &ClassifierConfig) -> Self {
        let n = labels.len().min(features.len());
        if n == 0 {
            return Self { trees: Vec::new() };
        }

        let n_features = features[0].len();
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.trees.max(1))
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(features, labels, &bootstrap, max_features, &mut rng)
            })
            .collect();

        Self { trees }
    }

    /// Mean class-1 leaf fraction across trees. 0.5 for an empty forest.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        total / self.trees.len() as f64
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
