use ahash::{AHashMap, AHashSet};
use log::debug;

use crate::error::{RecError, Result};
use crate::preferences::Preferences;
use crate::ranking::{descending_by_score, ScoredId, SimilarityTable};

/// Running total of the similarities that lead to one candidate item.
/// An accumulator is created by the first contribution, so `count >= 1`.
#[derive(Debug, Clone, Copy)]
struct ScoreAccumulator {
    sum: f64,
    count: usize,
}

impl ScoreAccumulator {
    fn new(similarity: f64) -> Self {
        ScoreAccumulator {
            sum: similarity,
            count: 1,
        }
    }

    fn add(&mut self, similarity: f64) {
        self.sum += similarity;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Ranks the items similar to `known_items` that are not known yet.
///
/// Every known item contributes the items of its neighbor list. A candidate's
/// score is the mean similarity over all the neighbor relationships that reach
/// it, so many weak paths do not outrank one strong path. The result is sorted
/// by score descending then by item id. Known items without a neighbor list
/// contribute nothing.
///
/// # Examples
///
/// ```
/// use ahash::AHashSet;
/// use reporec::{recommend, ScoredId, SimilarityTable};
///
/// let mut table = SimilarityTable::new();
/// table.insert("r1".to_owned(), vec![ScoredId::new(0.8, "r2"), ScoredId::new(0.4, "r3")]);
/// let known: AHashSet<String> = ["r1".to_owned()].into_iter().collect();
/// let ranking = recommend(&known, &table);
/// assert_eq!(ranking, vec![ScoredId::new(0.8, "r2"), ScoredId::new(0.4, "r3")]);
/// ```
pub fn recommend(known_items: &AHashSet<String>, similar_items: &SimilarityTable) -> Vec<ScoredId> {
    let mut accumulators: AHashMap<&str, ScoreAccumulator> = AHashMap::new();
    for item in known_items {
        let neighbors = match similar_items.get(item) {
            Some(neighbors) => neighbors,
            None => {
                debug!("no similar items for {}", item);
                continue;
            }
        };
        for neighbor in neighbors {
            if known_items.contains(&neighbor.id) {
                continue;
            }
            match accumulators.get_mut(neighbor.id.as_str()) {
                Some(accumulator) => accumulator.add(neighbor.score),
                None => {
                    accumulators.insert(neighbor.id.as_str(), ScoreAccumulator::new(neighbor.score));
                }
            }
        }
    }

    let mut rankings: Vec<ScoredId> = accumulators
        .into_iter()
        .map(|(item, accumulator)| ScoredId::new(accumulator.mean(), item))
        .collect();
    rankings.sort_by(descending_by_score);
    rankings
}

/// Recommendations for `user`, whose known items are taken from `user_items`.
pub fn recommend_for_user(
    user: &str,
    user_items: &Preferences,
    similar_items: &SimilarityTable,
) -> Result<Vec<ScoredId>> {
    let known_items = user_items.get(user).ok_or_else(|| RecError::missing(user))?;
    Ok(recommend(known_items, similar_items))
}
