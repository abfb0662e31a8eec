use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use ahash::AHashMap;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RecError, Result};
use crate::similarity::Similarity;

const PROGRESS_INTERVAL: usize = 100;

/// An entity or item identifier paired with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredId {
    pub score: f64,
    pub id: String,
}

impl ScoredId {
    pub fn new<S: Into<String>>(score: f64, id: S) -> Self {
        ScoredId {
            score: score,
            id: id.into(),
        }
    }
}

/// Highest score first, equal scores ordered by id.
#[inline]
pub(crate) fn descending_by_score(x: &ScoredId, y: &ScoredId) -> Ordering {
    y.score.total_cmp(&x.score).then_with(|| x.id.cmp(&y.id))
}

/// Rejects a zero `top_n` and a `min_similarity` outside `[0, 1)`.
pub(crate) fn check_ranking_params(top_n: usize, min_similarity: f64) -> Result<()> {
    if top_n == 0 {
        return Err(RecError::InvalidConfiguration(
            "top_n must be positive".to_owned(),
        ));
    }
    if !min_similarity.is_finite() || !(0.0..1.0).contains(&min_similarity) {
        return Err(RecError::InvalidConfiguration(format!(
            "min_similarity must be in [0, 1), got {}",
            min_similarity
        )));
    }
    Ok(())
}

/// Entity identifier to its most similar entities, best first.
pub type SimilarityTable = AHashMap<String, Vec<ScoredId>>;

/// Returns the best matches for `target` among `candidates`.
///
/// Scores at or below `min_similarity` are dropped before sorting, the rest
/// are ordered by score descending then by id, and at most `top_n` are kept.
/// The target itself is never returned. A target that is not one of the
/// candidates is fine, but it must be known to `similarity`.
/// Fails with `InvalidConfiguration` for a zero `top_n` or a `min_similarity`
/// outside `[0, 1)`.
///
/// # Examples
///
/// ```
/// use reporec::{preferences_from, top_matches, Similarity};
///
/// let prefs = preferences_from(vec![
///     ("r1", vec!["alice", "bob"]),
///     ("r2", vec!["alice", "bob", "carol"]),
///     ("r3", vec!["dave"]),
/// ]);
/// let matches = top_matches("r1", &Similarity::Exact(&prefs), prefs.keys().map(|k| k.as_str()), 5, 0.05).unwrap();
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].id, "r2");
/// ```
pub fn top_matches<'c, I>(
    target: &str,
    similarity: &Similarity,
    candidates: I,
    top_n: usize,
    min_similarity: f64,
) -> Result<Vec<ScoredId>>
where
    I: IntoIterator<Item = &'c str>,
{
    check_ranking_params(top_n, min_similarity)?;
    let mut scores = Vec::new();
    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let score = similarity.compute(target, candidate)?;
        if score > min_similarity {
            scores.push(ScoredId::new(score, candidate));
        }
    }
    scores.sort_by(descending_by_score);
    scores.truncate(top_n);
    Ok(scores)
}

/// Computes the similarity table for every entity in `entities`, comparing
/// each one against all the others. Targets are processed in parallel.
pub fn calculate_similar_items(
    entities: &[String],
    similarity: &Similarity,
    top_n: usize,
    min_similarity: f64,
) -> Result<SimilarityTable> {
    check_ranking_params(top_n, min_similarity)?;
    info!("Ranking {} entities using {} similarity", entities.len(), similarity.name());
    let processed = AtomicUsize::new(0);
    let rows = entities
        .par_iter()
        .map(|target| -> Result<(String, Vec<ScoredId>)> {
            let candidates = entities.iter().map(|entity| entity.as_str());
            let matches = top_matches(target, similarity, candidates, top_n, min_similarity)?;
            let count = processed.fetch_add(1, AtomicOrdering::Relaxed) + 1;
            if count % PROGRESS_INTERVAL == 0 {
                info!("{} / {}", count, entities.len());
            }
            Ok((target.clone(), matches))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rows.into_iter().collect())
}
