use std::fmt;
use ahash::AHashSet;
use itertools::Itertools;
use log::info;
use rand::Rng;

use crate::config::RecommenderConfig;
use crate::error::Result;
use crate::minhash::{HashParams, ItemUniverse, MinHasher, SignatureGenerator, SignatureTable};
use crate::preferences::Preferences;
use crate::ranking::{calculate_similar_items, ScoredId, SimilarityTable};
use crate::recommend::{recommend, recommend_for_user};
use crate::similarity::Similarity;
use crate::store::SignatureStore;

/// Batch recommender: one item universe and one set of hash parameters per run.
///
/// Typical use, with repositories as entities and their stargazers as items:
/// generate the signatures of every repository, build the similar-repository
/// table, then rank recommendations for a user from the repositories they
/// starred.
///
/// # Examples
///
/// ```
/// use reporec::{invert_preferences, preferences_from, ItemUniverse, Recommender, RecommenderConfig};
///
/// let user_repos = preferences_from(vec![
///     ("alice", vec!["r1", "r2"]),
///     ("bob", vec!["r1", "r2", "r3"]),
///     ("carol", vec!["r2", "r3"]),
/// ]);
/// let repo_users = invert_preferences(&user_repos);
/// let universe = ItemUniverse::from_preferences(&repo_users);
/// let config = RecommenderConfig::new(100, 1, 5, 0.05).with_seed(7);
/// let recommender = Recommender::new(config, universe).unwrap();
///
/// let signatures = recommender.generate_signatures(&repo_users).unwrap();
/// let similar_repos = recommender.similar_items(&repo_users, &signatures).unwrap();
/// let ranking = recommender.recommend(&user_repos["alice"], &similar_repos);
/// assert!(!ranking.is_empty());
/// assert!(ranking.iter().all(|r| r.id == "r3"));
/// ```
pub struct Recommender {
    config: RecommenderConfig,
    universe: ItemUniverse,
    min_hasher: MinHasher,
}

impl fmt::Display for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recommender {{ hash_count = {}, band_size = {}, bands = {}, top_n = {}, min_similarity = {}, items = {} }}",
               self.config.hash_count, self.config.band_size, self.config.num_bands(),
               self.config.top_n, self.config.min_similarity, self.universe.len())
    }
}

impl Recommender {
    /// Draws hash parameters from `random_seed` when it is set, from entropy otherwise.
    pub fn new(config: RecommenderConfig, universe: ItemUniverse) -> Result<Self> {
        config.validate()?;
        let params = match config.random_seed {
            Some(seed) => HashParams::from_seed(config.hash_count, seed),
            None => HashParams::from_entropy(config.hash_count),
        };
        Self::with_params(config, universe, params)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: RecommenderConfig, universe: ItemUniverse, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let params = HashParams::generate(config.hash_count, rng);
        Self::with_params(config, universe, params)
    }

    pub fn with_params(config: RecommenderConfig, universe: ItemUniverse, params: HashParams) -> Result<Self> {
        config.validate()?;
        let min_hasher = MinHasher::new(params, universe.len())?;
        let recommender = Recommender {
            config: config,
            universe: universe,
            min_hasher: min_hasher,
        };
        info!("{}", recommender);
        Ok(recommender)
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn universe(&self) -> &ItemUniverse {
        &self.universe
    }

    pub fn params(&self) -> &HashParams {
        self.min_hasher.params()
    }

    pub fn generator(&self) -> Result<SignatureGenerator<'_>> {
        SignatureGenerator::new(&self.universe, &self.min_hasher, self.config.band_size)
    }

    /// Banded signatures of every entity. Fails on the first entity that
    /// cannot be hashed.
    pub fn generate_signatures(&self, entities: &Preferences) -> Result<SignatureTable> {
        self.generator()?.bulk_banded_signatures(entities)
    }

    /// Generates the signatures and upserts them into `store`.
    /// Returns the number of signatures written.
    pub fn generate_and_store<S: SignatureStore>(&self, entities: &Preferences,
                                                 store: &mut S) -> std::result::Result<usize, S::Error> {
        let table = self.generate_signatures(entities)?;
        for (entity, signature) in table.iter() {
            store.upsert(entity, signature.clone())?;
        }
        info!("stored {} signatures", table.len());
        Ok(table.len())
    }

    /// Similarity table of `entities` estimated from their signatures.
    pub fn similar_items(&self, entities: &Preferences, signatures: &SignatureTable) -> Result<SimilarityTable> {
        self.similar_items_with(entities, &Similarity::Approximate(signatures))
    }

    /// Similarity table of `entities` using exact jaccard similarity.
    /// Only practical for small inputs.
    pub fn similar_items_exact(&self, entities: &Preferences) -> Result<SimilarityTable> {
        self.similar_items_with(entities, &Similarity::Exact(entities))
    }

    pub fn similar_items_with(&self, entities: &Preferences, similarity: &Similarity) -> Result<SimilarityTable> {
        let ids: Vec<String> = entities.keys().cloned().sorted().collect();
        calculate_similar_items(&ids, similarity, self.config.top_n, self.config.min_similarity)
    }

    pub fn recommend(&self, known_items: &AHashSet<String>, similar_items: &SimilarityTable) -> Vec<ScoredId> {
        recommend(known_items, similar_items)
    }

    pub fn recommend_for_user(&self, user: &str, user_items: &Preferences,
                              similar_items: &SimilarityTable) -> Result<Vec<ScoredId>> {
        recommend_for_user(user, user_items, similar_items)
    }
}
