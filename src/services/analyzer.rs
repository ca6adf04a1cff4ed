//! End-to-end signal pipeline for one or many instruments.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::acquisition::{Acquired, AcquisitionService};
use super::aliases;
use super::classifier::{self, RandomForest, NEUTRAL_PROBABILITY};
use super::features::{self, FeatureTable};
use super::formatter::build_descriptor;
use super::model_cache::ModelCache;
use super::policy;
use super::universe::universe;
use crate::config::{ClassifierConfig, Config};
use crate::error::{AppError, SignalError};
use crate::sources::{BarSource, YahooFinanceClient};
use crate::types::{InstrumentCategory, OhlcPoint, SignalDescriptor, TradingStyle};

/// Confidence a recommendation must exceed.
pub const RECOMMEND_MIN_CONFIDENCE: f64 = 0.60;

/// Fractional move over the last 3 bars a scanned instrument must exceed.
pub const SCAN_MIN_MOVE: f64 = 0.002;

/// Most instruments a scan analyzes.
pub const SCAN_MAX_CANDIDATES: usize = 10;

/// Absolute fractional change between the last close and the close 3 bars
/// earlier. Gaps are skipped; `None` unless more than 5 valid closes remain.
pub fn recent_move(bars: &[OhlcPoint]) -> Option<f64> {
    let closes: Vec<f64> = bars
        .iter()
        .map(|b| b.close)
        .filter(|c| c.is_finite() && *c > 0.0)
        .collect();
    if closes.len() <= 5 {
        return None;
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 4];
    Some((last / base - 1.0).abs())
}

/// Runs acquisition, derivation, classification, policy and formatting.
pub struct SignalAnalyzer {
    acquisition: AcquisitionService,
    classifier: ClassifierConfig,
    cache: Option<ModelCache>,
    pacing: Duration,
}

impl SignalAnalyzer {
    /// Create an analyzer over any bar source.
    pub fn new(source: Arc<dyn BarSource>, config: &Config) -> Self {
        let cache = config
            .model_cache_enabled()
            .then(|| ModelCache::new(config.model_cache_ttl));

        Self {
            acquisition: AcquisitionService::new(source, config.fetch_timeout),
            classifier: config.classifier.clone(),
            cache,
            pacing: config.scan_pacing,
        }
    }

    /// Create an analyzer backed by Yahoo Finance.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = YahooFinanceClient::new(&config.yahoo_base_url, config.fetch_timeout)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Analyze one instrument, reusing a cached forest when caching is on.
    pub async fn analyze(
        &self,
        instrument: &str,
        style: TradingStyle,
        category: InstrumentCategory,
    ) -> Result<SignalDescriptor, SignalError> {
        self.run(instrument, style, category, true).await
    }

    /// Analyze one instrument with a freshly trained forest.
    pub async fn analyze_fresh(
        &self,
        instrument: &str,
        style: TradingStyle,
        category: InstrumentCategory,
    ) -> Result<SignalDescriptor, SignalError> {
        self.run(instrument, style, category, false).await
    }

    /// Analyze instruments one after another, pausing between requests.
    pub async fn analyze_many(
        &self,
        instruments: &[String],
        style: TradingStyle,
        category: InstrumentCategory,
    ) -> Vec<(String, Result<SignalDescriptor, SignalError>)> {
        let mut results = Vec::with_capacity(instruments.len());
        for (i, instrument) in instruments.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
            let result = self.analyze(instrument, style, category).await;
            if let Err(e) = &result {
                debug!("{}: no signal ({})", instrument, e);
            }
            results.push((instrument.clone(), result));
        }
        results
    }

    /// Scan a category's universe and keep confident LONG/SHORT signals.
    ///
    /// Instruments are screened in universe order: only those whose last
    /// 3 bars moved more than [`SCAN_MIN_MOVE`] are analyzed, and screening
    /// stops after [`SCAN_MAX_CANDIDATES`] candidates.
    pub async fn recommend(
        &self,
        category: InstrumentCategory,
        style: TradingStyle,
    ) -> Vec<SignalDescriptor> {
        let instruments = universe(category);
        info!(
            "Scanning {} instruments ({}) in {} mode",
            instruments.len(),
            category.tag(),
            style.name()
        );

        let mut candidates: Vec<(&str, Acquired)> = Vec::new();
        for (i, &symbol) in instruments.iter().enumerate() {
            if candidates.len() >= SCAN_MAX_CANDIDATES {
                break;
            }
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
            let Some(acquired) = self.acquisition.fetch(symbol, style).await else {
                debug!("{}: no data, skipped", symbol);
                continue;
            };
            match recent_move(acquired.series.bars()) {
                Some(moved) if moved > SCAN_MIN_MOVE => candidates.push((symbol, acquired)),
                _ => debug!("{}: not moving, skipped", symbol),
            }
        }
        debug!("{} candidates after screening", candidates.len());

        let picks: Vec<SignalDescriptor> = candidates
            .into_iter()
            .filter_map(|(symbol, acquired)| {
                match self.evaluate(symbol, acquired, style, category, true) {
                    Ok(descriptor) => Some(descriptor),
                    Err(e) => {
                        debug!("{}: no signal ({})", symbol, e);
                        None
                    }
                }
            })
            .filter(|d| {
                d.operation_type.is_actionable() && d.confidence > RECOMMEND_MIN_CONFIDENCE
            })
            .collect();

        info!("{} recommendations for {}", picks.len(), category.tag());
        picks
    }

    /// Drop cached forests for an instrument. Returns how many were removed.
    pub fn invalidate(&self, instrument: &str) -> usize {
        let Some(cache) = &self.cache else {
            return 0;
        };
        match aliases::resolve(instrument) {
            Ok(symbol) => cache.invalidate(&symbol),
            Err(_) => 0,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Model cache TTL, when caching is on.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache.as_ref().map(ModelCache::ttl)
    }

    /// Evict expired forests. Returns how many were removed.
    pub fn purge_expired_models(&self) -> usize {
        self.cache.as_ref().map_or(0, ModelCache::cleanup)
    }

    async fn run(
        &self,
        instrument: &str,
        style: TradingStyle,
        category: InstrumentCategory,
        use_cache: bool,
    ) -> Result<SignalDescriptor, SignalError> {
        let symbol = aliases::resolve(instrument)?;

        let acquired = self
            .acquisition
            .fetch(&symbol, style)
            .await
            .ok_or_else(|| SignalError::NoData {
                instrument: symbol.clone(),
            })?;

        self.evaluate(&symbol, acquired, style, category, use_cache)
    }

    /// Everything after acquisition: features, classifier, policy, descriptor.
    fn evaluate(
        &self,
        symbol: &str,
        acquired: Acquired,
        style: TradingStyle,
        category: InstrumentCategory,
        use_cache: bool,
    ) -> Result<SignalDescriptor, SignalError> {
        let table = features::derive(&acquired.series);
        let Some(latest) = table.latest.as_ref() else {
            return Err(SignalError::InsufficientHistory {
                instrument: symbol.to_string(),
                bars: acquired.series.len(),
            });
        };

        let probability = self.probability(symbol, style, &table, use_cache);
        let decision = policy::decide(style, latest, table.prior_bars(), probability);

        info!(
            "{} [{}] {} p={:.3} price={}",
            symbol,
            style.name(),
            decision.operation.label(),
            probability,
            decision.price
        );

        build_descriptor(
            symbol,
            category,
            style,
            &decision,
            acquired.used_fallback,
            latest.time,
        )
    }

    fn probability(
        &self,
        symbol: &str,
        style: TradingStyle,
        table: &FeatureTable,
        use_cache: bool,
    ) -> f64 {
        let cache = self.cache.as_ref().filter(|_| use_cache);

        if let Some(forest) = cache.and_then(|c| c.get(symbol, style)) {
            debug!("{}: using cached forest ({} trees)", symbol, forest.len());
            return classifier::score(&forest, table);
        }

        let Some(forest) = classifier::train(table, style, &self.classifier) else {
            return NEUTRAL_PROBABILITY;
        };
        let forest: Arc<RandomForest> = Arc::new(forest);
        let p = classifier::score(&forest, table);

        // Fresh runs skip the lookup but still refresh the stored forest
        if let Some(cache) = self.cache.as_ref() {
            cache.insert(symbol, style, forest);
        }
        p
    }
}
