use std::hash::Hash;
use ahash::AHashSet;

use crate::error::{RecError, Result};
use crate::minhash::SignatureTable;
use crate::preferences::Preferences;

/// Similarity of two empty sets. Jaccard similarity is undefined there
/// (`0 / 0`); it is reported as zero.
pub const EMPTY_SETS_SIMILARITY: f64 = 0.0;

/// Computes jaccard similarity `|A ∩ B| / |A ∪ B|` of two sets.
/// Two empty sets give `EMPTY_SETS_SIMILARITY`.
///
/// # Examples
///
/// ```
/// use ahash::AHashSet;
/// use reporec::compute_jaccard_similarity;
///
/// let a: AHashSet<&str> = ["r1", "r2"].into_iter().collect();
/// let b: AHashSet<&str> = ["r2", "r3"].into_iter().collect();
/// assert!((compute_jaccard_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn compute_jaccard_similarity<T>(set_1: &AHashSet<T>, set_2: &AHashSet<T>) -> f64
where
    T: Hash + Eq,
{
    let (smaller, larger) = if set_1.len() <= set_2.len() {
        (set_1, set_2)
    } else {
        (set_2, set_1)
    };
    let intersection_len = smaller.iter().filter(|item| larger.contains(*item)).count();
    let union_len = set_1.len() + set_2.len() - intersection_len;
    if union_len == 0 {
        return EMPTY_SETS_SIMILARITY;
    }
    intersection_len as f64 / union_len as f64
}

pub fn compute_jaccard_distance<T>(set_1: &AHashSet<T>, set_2: &AHashSet<T>) -> f64
where
    T: Hash + Eq,
{
    1.0 - compute_jaccard_similarity(set_1, set_2)
}

/// The two ways of scoring a pair of entities.
///
/// `Approximate` compares banded MinHash signatures and is the one meant for
/// large inputs. `Exact` computes jaccard similarity over the raw sets, it is
/// quadratic in practice and serves to validate the estimate on small inputs.
/// The two are not expected to return the same values.
#[derive(Debug, Clone, Copy)]
pub enum Similarity<'a> {
    Exact(&'a Preferences),
    Approximate(&'a SignatureTable),
}

impl<'a> Similarity<'a> {
    pub fn compute(&self, entity_1: &str, entity_2: &str) -> Result<f64> {
        match self {
            Similarity::Exact(prefs) => {
                let set_1 = prefs.get(entity_1).ok_or_else(|| RecError::missing(entity_1))?;
                let set_2 = prefs.get(entity_2).ok_or_else(|| RecError::missing(entity_2))?;
                Ok(compute_jaccard_similarity(set_1, set_2))
            }
            Similarity::Approximate(signatures) => signatures.similarity(entity_1, entity_2),
        }
    }

    pub fn contains(&self, entity: &str) -> bool {
        match self {
            Similarity::Exact(prefs) => prefs.contains_key(entity),
            Similarity::Approximate(signatures) => signatures.contains(entity),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Similarity::Exact(_) => "exact",
            Similarity::Approximate(_) => "approximate",
        }
    }
}
