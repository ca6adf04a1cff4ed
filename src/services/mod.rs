pub mod acquisition;
pub mod aliases;
pub mod analyzer;
pub mod classifier;
pub mod features;
pub mod formatter;
pub mod indicators;
pub mod model_cache;
pub mod policy;
pub mod universe;

pub use acquisition::{Acquired, AcquisitionService};
pub use analyzer::SignalAnalyzer;
pub use classifier::RandomForest;
pub use features::{FeatureRow, FeatureTable};
pub use model_cache::ModelCache;
pub use policy::Decision;
pub use universe::universe;
