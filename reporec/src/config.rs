use serde::{Deserialize, Serialize};

use crate::error::{RecError, Result};
use crate::ranking::check_ranking_params;

pub const DEFAULT_HASH_COUNT: usize = 10;
pub const DEFAULT_BAND_SIZE: usize = 2;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.05;

/// Run-wide parameters of the recommender.
///
/// `hash_count` controls the variance of the similarity estimate, `band_size`
/// trades recall for precision, `top_n` caps every neighbor list and
/// `min_similarity` drops near-zero scores before they are ranked.
/// A `random_seed` makes hash parameter generation reproducible.
///
/// # Examples
///
/// ```
/// use reporec::RecommenderConfig;
///
/// let config = RecommenderConfig::from_json_str(r#"{ "hash_count": 20, "random_seed": 7 }"#).unwrap();
/// assert_eq!(config.hash_count, 20);
/// assert_eq!(config.band_size, 2);
/// assert_eq!(config.random_seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub hash_count: usize,
    pub band_size: usize,
    pub top_n: usize,
    pub min_similarity: f64,
    pub random_seed: Option<u64>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        RecommenderConfig {
            hash_count: DEFAULT_HASH_COUNT,
            band_size: DEFAULT_BAND_SIZE,
            top_n: DEFAULT_TOP_N,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            random_seed: None,
        }
    }
}

impl RecommenderConfig {
    pub fn new(hash_count: usize, band_size: usize, top_n: usize, min_similarity: f64) -> Self {
        RecommenderConfig {
            hash_count: hash_count,
            band_size: band_size,
            top_n: top_n,
            min_similarity: min_similarity,
            random_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Parses a JSON document. Missing fields take their default values.
    /// The parsed configuration is validated.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RecommenderConfig = serde_json::from_str(json)
            .map_err(|e| RecError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn num_bands(&self) -> usize {
        (self.hash_count + self.band_size - 1) / self.band_size
    }

    pub fn validate(&self) -> Result<()> {
        if self.hash_count == 0 {
            return Err(RecError::InvalidConfiguration(
                "hash_count must be positive".to_owned(),
            ));
        }
        if self.band_size == 0 {
            return Err(RecError::InvalidConfiguration(
                "band_size must be positive".to_owned(),
            ));
        }
        check_ranking_params(self.top_n, self.min_similarity)
    }
}
