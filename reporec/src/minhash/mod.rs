use std::fmt;
use serde::{Deserialize, Serialize};

mod banding;
mod hash_params;
mod min_hasher;
mod signature_table;
mod universe;

pub use self::banding::{band_signature, Band, BandedSignature};
pub use self::hash_params::{HashParams, MAX_COEFFICIENT};
pub use self::min_hasher::{MinHasher, SignatureGenerator};
pub use self::signature_table::SignatureTable;
pub use self::universe::ItemUniverse;

/// Describes how a banded signature was built.
///
/// Signatures are comparable only when they were produced with the same
/// `(a, b)` parameter sequence against an item universe of the same size and
/// banded with the same band size. The layout captures all of this, with the
/// parameter sequence reduced to a deterministic FNV digest, so the
/// shared-parameter requirement is checked rather than assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureLayout {
    pub hash_count: usize,
    pub band_size: usize,
    pub universe_size: usize,
    pub params_digest: u64,
}

impl SignatureLayout {
    pub fn num_bands(&self) -> usize {
        (self.hash_count + self.band_size - 1) / self.band_size
    }
}

impl fmt::Display for SignatureLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureLayout {{ hash_count = {}, band_size = {}, universe_size = {}, params = {:016x} }}",
               self.hash_count, self.band_size, self.universe_size, self.params_digest)
    }
}
