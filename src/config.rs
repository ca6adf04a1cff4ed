use std::env;
use std::time::Duration;

/// Classifier tuning.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Number of trees in the forest.
    pub trees: usize,
    /// RNG seed for bootstrap and feature sampling.
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            seed: 42,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base URL of the Yahoo Finance chart API.
    pub yahoo_base_url: String,
    /// Timeout applied to every bar fetch.
    pub fetch_timeout: Duration,
    /// Forest parameters.
    pub classifier: ClassifierConfig,
    /// Lifetime of cached forests. Zero disables the cache.
    pub model_cache_ttl: Duration,
    /// Delay between instruments when analyzing a list.
    pub scan_pacing: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ClassifierConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(3001),
            yahoo_base_url: env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            fetch_timeout: Duration::from_secs(parse_var("FETCH_TIMEOUT_SECS").unwrap_or(10)),
            classifier: ClassifierConfig {
                trees: parse_var::<usize>("CLASSIFIER_TREES")
                    .filter(|t| *t > 0)
                    .unwrap_or(defaults.trees),
                seed: parse_var("CLASSIFIER_SEED").unwrap_or(defaults.seed),
            },
            model_cache_ttl: Duration::from_secs(parse_var("MODEL_CACHE_TTL_SECS").unwrap_or(0)),
            scan_pacing: Duration::from_millis(parse_var("SCAN_PACING_MS").unwrap_or(2000)),
        }
    }

    /// Whether trained forests are reused across requests.
    pub fn model_cache_enabled(&self) -> bool {
        !self.model_cache_ttl.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default() {
        let config = ClassifierConfig::default();
        assert_eq!(config.trees, 100);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_parse_var_missing() {
        assert_eq!(parse_var::<u16>("AUGUR_TEST_UNSET_VARIABLE"), None);
    }

    #[test]
    fn test_model_cache_toggle() {
        let mut config = Config::from_env();
        config.model_cache_ttl = Duration::ZERO;
        assert!(!config.model_cache_enabled());

        config.model_cache_ttl = Duration::from_secs(300);
        assert!(config.model_cache_enabled());
    }
}
