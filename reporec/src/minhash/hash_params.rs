use std::hash::Hasher;
use fnv::FnvHasher;
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Upper bound (inclusive) of the `a` and `b` coefficients.
pub const MAX_COEFFICIENT: u64 = i64::MAX as u64;

/// The `(a, b)` coefficients of a family of hash functions `h(x) = (a * x + b) mod U`.
///
/// One pair is drawn per hash function. All signatures compared with one
/// another must come from the same `HashParams`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParams {
    a: Vec<u64>,
    b: Vec<u64>,
}

impl HashParams {
    /// Draws `num_hashes` coefficient pairs uniformly from `[0, MAX_COEFFICIENT]`.
    pub fn generate<R: Rng + ?Sized>(num_hashes: usize, rng: &mut R) -> Self {
        let range = Uniform::new_inclusive(0, MAX_COEFFICIENT);
        let a = (0..num_hashes).map(|_| range.sample(rng)).collect();
        let b = (0..num_hashes).map(|_| range.sample(rng)).collect();
        HashParams { a: a, b: b }
    }

    /// Reproducible parameters. `Pcg64` keeps the same stream across `rand` releases.
    ///
    /// ```
    /// use reporec::minhash::HashParams;
    ///
    /// assert_eq!(HashParams::from_seed(10, 42), HashParams::from_seed(10, 42));
    /// assert_ne!(HashParams::from_seed(10, 42), HashParams::from_seed(10, 43));
    /// ```
    pub fn from_seed(num_hashes: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        Self::generate(num_hashes, &mut rng)
    }

    pub fn from_entropy(num_hashes: usize) -> Self {
        let mut rng = Pcg64::from_entropy();
        Self::generate(num_hashes, &mut rng)
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let (a, b) = pairs.into_iter().unzip();
        HashParams { a: a, b: b }
    }

    pub fn num_hashes(&self) -> usize {
        self.a.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.a.iter().copied().zip(self.b.iter().copied())
    }

    /// FNV digest of the coefficient sequence. Stable across processes.
    pub fn digest(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        hasher.write_usize(self.a.len());
        for (a, b) in self.pairs() {
            hasher.write_u64(a);
            hasher.write_u64(b);
        }
        hasher.finish()
    }
}
