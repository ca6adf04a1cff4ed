//! Directional classifier: probability that the next close is higher.

mod forest;
mod tree;

pub use forest::RandomForest;
pub use tree::DecisionTree;

use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::services::features::FeatureTable;
use crate::types::TradingStyle;

/// Probability used when the model cannot say anything.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Train a forest on the table's training rows.
///
/// Returns `None` when there are fewer training rows than the style needs.
pub fn train(
    table: &FeatureTable,
    style: TradingStyle,
    config: &ClassifierConfig,
) -> Option<RandomForest> {
    let (features, labels) = table.training_set();
    let required = style.min_training_rows();
    if labels.len() < required {
        debug!(
            "Only {} training rows ({} needed for {}), using neutral probability",
            labels.len(),
            required,
            style.name()
        );
        return None;
    }

    Some(RandomForest::fit(&features, &labels, config))
}

/// Score the table's prediction row with a trained forest.
pub fn score(forest: &RandomForest, table: &FeatureTable) -> f64 {
    let Some(latest) = table.latest.as_ref() else {
        return NEUTRAL_PROBABILITY;
    };

    let inputs = latest.model_inputs();
    if inputs.iter().any(|v| !v.is_finite()) {
        warn!("Non-finite model inputs {:?}, using neutral probability", inputs);
        return NEUTRAL_PROBABILITY;
    }

    let p = forest.predict_proba(&inputs);
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        warn!("Classifier produced non-finite probability, using neutral");
        NEUTRAL_PROBABILITY
    }
}

/// Train on the table and score its prediction row in one step.
pub fn train_and_score(table: &FeatureTable, style: TradingStyle, config: &ClassifierConfig) -> f64 {
    match train(table, style, config) {
        Some(forest) => score(&forest, table),
        None => NEUTRAL_PROBABILITY,
    }
}
