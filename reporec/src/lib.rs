/*!
This library estimates the similarity of sparse sets with MinHash
Locality Sensitive Hashing and turns the estimates into ranked recommendations.
For example, repositories are similar when they are starred by the same users,
and a user is recommended the repositories most similar to the ones they starred.

* Signatures: every set is reduced to `hash_count` minimums of
  `(a * idx + b) mod U` over the dense indices of its items.
* Banding: signatures are split into bands of `band_size` hashes; two sets
  agree on a band only when the whole band matches.
* Similarity: the fraction of agreeing bands estimates jaccard similarity.
  Exact jaccard similarity is available to validate the estimate.
* Ranking: the `top_n` most similar entities above `min_similarity`.
* Recommendations: mean similarity over every neighbor relationship that
  reaches an item the user does not hold yet.

## Example

 ```
 use reporec::{invert_preferences, preferences_from, ItemUniverse, Recommender, RecommenderConfig};

 let user_repos = preferences_from(vec![
     ("alice", vec!["serega/gaoya", "rayon-rs/rayon"]),
     ("bob", vec!["serega/gaoya", "rayon-rs/rayon", "serde-rs/serde"]),
     ("carol", vec!["rayon-rs/rayon", "serde-rs/serde"]),
 ]);
 let repo_users = invert_preferences(&user_repos);
 let config = RecommenderConfig::default().with_seed(1);
 let recommender = Recommender::new(config, ItemUniverse::from_preferences(&repo_users)).unwrap();

 let signatures = recommender.generate_signatures(&repo_users).unwrap();
 let similar_repos = recommender.similar_items_exact(&repo_users).unwrap();
 assert_eq!(signatures.len(), 3);
 assert_eq!(similar_repos["serega/gaoya"][0].id, "rayon-rs/rayon");

 let ranking = recommender.recommend_for_user("alice", &user_repos, &similar_repos).unwrap();
 assert_eq!(ranking[0].id, "serde-rs/serde");
 ```

## References
[[1] Chapter 3, Mining of Massive Datasets](http://www.mmds.org)

 */

pub mod config;
pub mod error;
pub mod minhash;
pub mod pipeline;
pub mod preferences;
pub mod ranking;
pub mod recommend;
pub mod similarity;
pub mod store;

pub use self::config::RecommenderConfig;
pub use self::error::{RecError, Result};
pub use self::minhash::{BandedSignature, HashParams, ItemUniverse, MinHasher, SignatureLayout, SignatureTable};
pub use self::pipeline::Recommender;
pub use self::preferences::{filter_min_size, invert_preferences, preferences_from, PreferenceProvider, Preferences};
pub use self::ranking::{calculate_similar_items, top_matches, ScoredId, SimilarityTable};
pub use self::recommend::{recommend, recommend_for_user};
pub use self::similarity::{compute_jaccard_distance, compute_jaccard_similarity, Similarity, EMPTY_SETS_SIMILARITY};
pub use self::store::{MemorySignatureStore, SignatureStore};
