use std::sync::atomic::{AtomicUsize, Ordering};
use ahash::AHashSet;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::{RecError, Result};
use crate::minhash::{BandedSignature, HashParams, ItemUniverse, SignatureLayout, SignatureTable};
use crate::preferences::Preferences;

const PROGRESS_INTERVAL: usize = 1000;

/// Computes MinHash signatures over dense item indices.
///
/// For every `(a, b)` pair the signature holds `min((a * idx + b) mod U)` over
/// the indices of the set, where `U` is the size of the item universe.
#[derive(Debug, Clone)]
pub struct MinHasher {
    params: HashParams,
    universe_size: usize,
}

impl MinHasher {
    pub fn new(params: HashParams, universe_size: usize) -> Result<Self> {
        if universe_size == 0 {
            return Err(RecError::EmptyUniverse);
        }
        if params.num_hashes() == 0 {
            return Err(RecError::InvalidConfiguration(
                "hash_count must be positive".to_owned(),
            ));
        }
        Ok(MinHasher {
            params: params,
            universe_size: universe_size,
        })
    }

    #[inline]
    fn hash(&self, a: u64, b: u64, index: usize) -> u64 {
        ((a as u128 * index as u128 + b as u128) % self.universe_size as u128) as u64
    }

    /// Returns `None` for an empty set, which has no minimum.
    ///
    /// ```
    /// use reporec::minhash::{HashParams, MinHasher};
    ///
    /// let min_hasher = MinHasher::new(HashParams::from_pairs(vec![(1, 0), (2, 1)]), 5).unwrap();
    /// assert_eq!(min_hasher.create_signature(&[3, 4]), Some(vec![3, 2]));
    /// assert_eq!(min_hasher.create_signature(&[]), None);
    /// ```
    pub fn create_signature(&self, indices: &[usize]) -> Option<Vec<u64>> {
        if indices.is_empty() {
            return None;
        }
        let signature = self.params
            .pairs()
            .map(|(a, b)| {
                indices
                    .iter()
                    .map(|index| self.hash(a, b, *index))
                    .min()
                    .unwrap_or(0)
            })
            .collect();
        Some(signature)
    }

    pub fn num_hashes(&self) -> usize {
        self.params.num_hashes()
    }

    pub fn universe_size(&self) -> usize {
        self.universe_size
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }
}

/// Turns entity item sets into banded signatures against one item universe.
pub struct SignatureGenerator<'a> {
    universe: &'a ItemUniverse,
    min_hasher: &'a MinHasher,
    layout: SignatureLayout,
}

impl<'a> SignatureGenerator<'a> {
    pub fn new(universe: &'a ItemUniverse, min_hasher: &'a MinHasher, band_size: usize) -> Result<Self> {
        if band_size == 0 {
            return Err(RecError::InvalidConfiguration(
                "band_size must be positive".to_owned(),
            ));
        }
        if universe.len() != min_hasher.universe_size() {
            return Err(RecError::InvalidConfiguration(format!(
                "min hasher built for {} items, universe has {}",
                min_hasher.universe_size(),
                universe.len()
            )));
        }
        let layout = SignatureLayout {
            hash_count: min_hasher.num_hashes(),
            band_size: band_size,
            universe_size: universe.len(),
            params_digest: min_hasher.params().digest(),
        };
        Ok(SignatureGenerator {
            universe: universe,
            min_hasher: min_hasher,
            layout: layout,
        })
    }

    pub fn layout(&self) -> SignatureLayout {
        self.layout
    }

    pub fn signature(&self, entity: &str, items: &AHashSet<String>) -> Result<Vec<u64>> {
        let indices = self.universe.indices_of(entity, items.iter())?;
        self.min_hasher
            .create_signature(&indices)
            .ok_or_else(|| RecError::EmptySet {
                entity: entity.to_owned(),
            })
    }

    pub fn banded_signature(&self, entity: &str, items: &AHashSet<String>) -> Result<BandedSignature> {
        let signature = self.signature(entity, items)?;
        BandedSignature::from_signature(&signature, self.layout)
    }

    /// Generates signatures for every entity in parallel.
    ///
    /// The first entity that fails aborts the whole run, a table with silently
    /// missing entities would skew every estimate that involves them.
    pub fn bulk_banded_signatures(&self, prefs: &Preferences) -> Result<SignatureTable> {
        info!("MinHash on {} entities x {} items, {}", prefs.len(), self.universe.len(), self.layout);
        let entries: Vec<(&String, &AHashSet<String>)> = prefs.iter().collect();
        let processed = AtomicUsize::new(0);
        let signatures: Vec<(String, BandedSignature)> = entries
            .par_iter()
            .map(|(entity, items)| -> Result<(String, BandedSignature)> {
                let signature = self.banded_signature(entity, items)?;
                let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if count % PROGRESS_INTERVAL == 0 {
                    info!("iteration {} / {}", count, entries.len());
                }
                Ok(((*entity).clone(), signature))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut table = SignatureTable::with_capacity(self.layout, signatures.len());
        for (entity, signature) in signatures {
            table.insert(entity, signature)?;
        }
        debug!("generated {} signatures", table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use super::{MinHasher, SignatureGenerator};
    use crate::error::RecError;
    use crate::minhash::{HashParams, ItemUniverse};
    use crate::preferences::preferences_from;
    use crate::similarity::compute_jaccard_similarity;

    fn scenario() -> (ItemUniverse, crate::preferences::Preferences) {
        let universe = ItemUniverse::new(["r1", "r2", "r3"]);
        let prefs = preferences_from(vec![
            ("A", vec!["r1", "r2"]),
            ("B", vec!["r2", "r3"]),
        ]);
        (universe, prefs)
    }

    #[test]
    fn test_hash_values() {
        // (a * idx + b) mod 3 for idx in {0, 1}
        let params = HashParams::from_pairs(vec![(1, 0), (2, 2), (5, 1)]);
        let min_hasher = MinHasher::new(params, 3).unwrap();
        assert_eq!(min_hasher.create_signature(&[0, 1]), Some(vec![0, 1, 0]));
        assert_eq!(min_hasher.create_signature(&[2]), Some(vec![2, 0, 2]));
    }

    #[test]
    fn test_large_coefficients_do_not_overflow() {
        let params = HashParams::from_pairs(vec![(u64::MAX, u64::MAX)]);
        let min_hasher = MinHasher::new(params, 7).unwrap();
        let expected = ((u64::MAX as u128 * 6 + u64::MAX as u128) % 7) as u64;
        assert_eq!(min_hasher.create_signature(&[6]), Some(vec![expected]));
    }

    #[test]
    fn test_empty_universe() {
        let err = MinHasher::new(HashParams::from_seed(4, 1), 0).unwrap_err();
        assert_eq!(err, RecError::EmptyUniverse);
    }

    #[test]
    fn test_signature_length_equals_hash_count() {
        let universe = ItemUniverse::new((0..50).map(|i| format!("item{}", i)));
        for num_hashes in [1, 4, 10, 33] {
            let min_hasher = MinHasher::new(HashParams::from_seed(num_hashes, 5), universe.len()).unwrap();
            let generator = SignatureGenerator::new(&universe, &min_hasher, 2).unwrap();
            for size in [1, 2, 17, 50] {
                let prefs = preferences_from(vec![("e", (0..size).map(|i| format!("item{}", i)).collect::<Vec<_>>())]);
                let signature = generator.signature("e", &prefs["e"]).unwrap();
                assert_eq!(signature.len(), num_hashes);
            }
        }
    }

    #[test]
    fn test_seeded_signatures_are_reproducible() {
        let (universe, prefs) = scenario();
        let run = || {
            let min_hasher = MinHasher::new(HashParams::from_seed(4, 2024), universe.len()).unwrap();
            let generator = SignatureGenerator::new(&universe, &min_hasher, 2).unwrap();
            let table = generator.bulk_banded_signatures(&prefs).unwrap();
            let a = table.get("A").unwrap().clone();
            let b = table.get("B").unwrap().clone();
            let similarity = table.similarity("A", "B").unwrap();
            (a, b, similarity)
        };
        let first = run();
        let second = run();
        assert_eq!(first.0.to_signature(), second.0.to_signature());
        assert_eq!(first.1.to_signature(), second.1.to_signature());
        assert_eq!(first.2, second.2);
        assert_eq!(first.0.to_signature().len(), 4);
        assert_eq!(first.0.num_bands(), 2);
        assert!(first.2 >= 0.0 && first.2 <= 1.0);
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let (universe, mut prefs) = scenario();
        prefs.insert("C".to_owned(), Default::default());
        let min_hasher = MinHasher::new(HashParams::from_seed(4, 1), universe.len()).unwrap();
        let generator = SignatureGenerator::new(&universe, &min_hasher, 2).unwrap();
        let err = generator.bulk_banded_signatures(&prefs).unwrap_err();
        assert_eq!(err, RecError::EmptySet { entity: "C".to_owned() });
    }

    #[test]
    fn test_unknown_item_aborts_generation() {
        let (universe, mut prefs) = scenario();
        prefs.insert("D".to_owned(), ["r9".to_owned()].into_iter().collect());
        let min_hasher = MinHasher::new(HashParams::from_seed(4, 1), universe.len()).unwrap();
        let generator = SignatureGenerator::new(&universe, &min_hasher, 2).unwrap();
        let err = generator.bulk_banded_signatures(&prefs).unwrap_err();
        assert_eq!(err, RecError::UnknownItem { entity: "D".to_owned(), item: "r9".to_owned() });
    }

    #[test]
    fn test_generator_rejects_mismatched_universe() {
        let (universe, _) = scenario();
        let min_hasher = MinHasher::new(HashParams::from_seed(4, 1), 10).unwrap();
        assert!(SignatureGenerator::new(&universe, &min_hasher, 2).is_err());
        let min_hasher = MinHasher::new(HashParams::from_seed(4, 1), 3).unwrap();
        assert!(SignatureGenerator::new(&universe, &min_hasher, 0).is_err());
    }

    #[test]
    fn test_estimate_converges_to_jaccard() {
        // a prime universe size makes every hash with a != 0 a permutation
        let universe_size = 1009;
        let universe = ItemUniverse::new((0..universe_size).map(|i| format!("item{}", i)));
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<String> = universe.iter().map(|item| item.to_owned()).collect();
        items.shuffle(&mut rng);
        let prefs = preferences_from(vec![
            ("A", items[0..80].to_vec()),
            ("B", items[40..120].to_vec()),
        ]);
        let exact = compute_jaccard_similarity(&prefs["A"], &prefs["B"]);
        assert!((exact - 1.0 / 3.0).abs() < 1e-9);

        let trials = 1000;
        let mut total = 0.0;
        for _ in 0..trials {
            let min_hasher = MinHasher::new(HashParams::generate(100, &mut rng), universe.len()).unwrap();
            let generator = SignatureGenerator::new(&universe, &min_hasher, 1).unwrap();
            let a = generator.banded_signature("A", &prefs["A"]).unwrap();
            let b = generator.banded_signature("B", &prefs["B"]).unwrap();
            total += a.similarity(&b).unwrap();
        }
        let mean = total / trials as f64;
        println!("exact {} estimated {}", exact, mean);
        assert!((mean - exact).abs() < 0.15);
    }
}
