use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{RecError, Result};
use crate::minhash::SignatureLayout;

/// A contiguous group of min hashes. Bands of up to four hashes are stored inline.
pub type Band = SmallVec<[u64; 4]>;

/// Splits `signature` into contiguous bands of `band_size` hashes.
/// The last band is shorter when `band_size` does not divide the signature length.
///
/// # Examples
///
/// ```
/// use reporec::minhash::band_signature;
///
/// let bands = band_signature(&[1, 2, 3, 4, 5], 2).unwrap();
/// assert_eq!(bands.len(), 3);
/// assert_eq!(bands[2].as_slice(), &[5]);
/// ```
pub fn band_signature(signature: &[u64], band_size: usize) -> Result<Vec<Band>> {
    if band_size == 0 {
        return Err(RecError::InvalidConfiguration(
            "band_size must be positive".to_owned(),
        ));
    }
    Ok(signature
        .chunks(band_size)
        .map(Band::from_slice)
        .collect())
}

/// Fraction of band positions where both bands are identical.
/// Both sides must have the same number of bands, `BandedSignature::similarity`
/// checks this before calling.
pub(crate) fn compute_band_similarity(bands_1: &[Band], bands_2: &[Band]) -> f64 {
    assert_eq!(bands_1.len(), bands_2.len());
    if bands_1.is_empty() {
        return 0.0;
    }
    let matches: u64 = bands_1
        .iter()
        .zip(bands_2.iter())
        .map(|(band_1, band_2)| (band_1 == band_2) as u64)
        .sum();
    (matches as f64) / (bands_1.len() as f64)
}

/// A MinHash signature split into bands, together with the layout it was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandedSignature {
    layout: SignatureLayout,
    bands: Vec<Band>,
}

impl BandedSignature {
    pub fn from_signature(signature: &[u64], layout: SignatureLayout) -> Result<Self> {
        if signature.len() != layout.hash_count {
            return Err(RecError::DimensionMismatch {
                expected: layout,
                found: SignatureLayout { hash_count: signature.len(), ..layout },
            });
        }
        Ok(BandedSignature {
            layout: layout,
            bands: band_signature(signature, layout.band_size)?,
        })
    }

    /// Rebuilds a banded signature, e.g. one read back from a store.
    /// Band boundaries must agree with `layout`.
    pub fn from_bands(bands: Vec<Band>, layout: SignatureLayout) -> Result<Self> {
        let hash_count: usize = bands.iter().map(|band| band.len()).sum();
        let well_formed = layout.band_size > 0
            && bands.len() == layout.num_bands()
            && hash_count == layout.hash_count
            && bands.iter().rev().skip(1).all(|band| band.len() == layout.band_size);
        if !well_formed {
            return Err(RecError::DimensionMismatch {
                expected: layout,
                found: SignatureLayout { hash_count: hash_count, ..layout },
            });
        }
        Ok(BandedSignature {
            layout: layout,
            bands: bands,
        })
    }

    pub fn layout(&self) -> &SignatureLayout {
        &self.layout
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// The flat signature.
    pub fn to_signature(&self) -> Vec<u64> {
        self.bands.iter().flat_map(|band| band.iter().copied()).collect()
    }

    /// Approximate Jaccard similarity from band agreement.
    ///
    /// Two bands agree only when all their hashes agree, so with `band_size = r`
    /// a band matches with probability close to `J^r`. With `band_size = 1` this
    /// is the plain MinHash estimator.
    pub fn similarity(&self, other: &BandedSignature) -> Result<f64> {
        if self.layout != other.layout || self.bands.len() != other.bands.len() {
            return Err(RecError::DimensionMismatch {
                expected: self.layout,
                found: other.layout,
            });
        }
        Ok(compute_band_similarity(&self.bands, &other.bands))
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use super::{band_signature, compute_band_similarity, Band, BandedSignature};
    use crate::error::RecError;
    use crate::minhash::SignatureLayout;

    fn layout(hash_count: usize, band_size: usize) -> SignatureLayout {
        SignatureLayout { hash_count: hash_count, band_size: band_size, universe_size: 100, params_digest: 1 }
    }

    #[test]
    fn test_even_bands() {
        let signature: Vec<u64> = (0..10).collect();
        let bands = band_signature(&signature, 2).unwrap();
        assert_eq!(bands.len(), 5);
        assert!(bands.iter().all(|band| band.len() == 2));
        assert_eq!(bands[3].as_slice(), &[6, 7]);
    }

    #[test]
    fn test_uneven_bands() {
        let signature: Vec<u64> = (0..10).collect();
        let bands = band_signature(&signature, 3).unwrap();
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[3].as_slice(), &[9]);

        let bands = band_signature(&signature, 20).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].len(), 10);
    }

    #[test]
    fn test_zero_band_size() {
        assert!(matches!(band_signature(&[1, 2], 0), Err(RecError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_band_similarity() {
        let b1: Vec<Band> = vec![smallvec![1, 2], smallvec![3, 4], smallvec![5, 6], smallvec![7]];
        let b2: Vec<Band> = vec![smallvec![1, 2], smallvec![3, 5], smallvec![5, 6], smallvec![8]];
        assert_eq!(compute_band_similarity(&b1, &b2), 0.5);
        assert_eq!(compute_band_similarity(&b1, &b1), 1.0);
    }

    #[test]
    fn test_short_last_band_compared_element_wise() {
        let s1 = BandedSignature::from_signature(&[1, 2, 3, 4, 5], layout(5, 2)).unwrap();
        let s2 = BandedSignature::from_signature(&[1, 2, 0, 4, 5], layout(5, 2)).unwrap();
        let s3 = BandedSignature::from_signature(&[1, 2, 3, 4, 6], layout(5, 2)).unwrap();
        assert_eq!(s1.num_bands(), 3);
        assert!((s1.similarity(&s2).unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert!((s1.similarity(&s3).unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(s1.to_signature(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_layout_mismatch() {
        let s1 = BandedSignature::from_signature(&[1, 2, 3, 4], layout(4, 2)).unwrap();
        let other = SignatureLayout { params_digest: 2, ..layout(4, 2) };
        let s2 = BandedSignature::from_signature(&[1, 2, 3, 4], other).unwrap();
        assert!(matches!(s1.similarity(&s2), Err(RecError::DimensionMismatch { .. })));

        let err = BandedSignature::from_signature(&[1, 2, 3], layout(4, 2)).unwrap_err();
        assert!(matches!(err, RecError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_different_band_counts_are_an_error() {
        let short = BandedSignature::from_signature(&[1, 2, 3, 4], layout(4, 2)).unwrap();
        let long = BandedSignature::from_signature(&[1, 2, 3, 4, 5, 6], layout(6, 2)).unwrap();
        assert_eq!(short.num_bands(), 2);
        assert_eq!(long.num_bands(), 3);
        let err = short.similarity(&long).unwrap_err();
        assert_eq!(err, RecError::DimensionMismatch { expected: layout(4, 2), found: layout(6, 2) });
        assert!(long.similarity(&short).is_err());
    }

    #[test]
    fn test_from_bands_checks_boundaries() {
        let ok: Vec<Band> = vec![smallvec![1, 2], smallvec![3]];
        assert!(BandedSignature::from_bands(ok, layout(3, 2)).is_ok());

        let bad: Vec<Band> = vec![smallvec![1], smallvec![2, 3]];
        assert!(BandedSignature::from_bands(bad, layout(3, 2)).is_err());

        let short: Vec<Band> = vec![smallvec![1, 2]];
        assert!(BandedSignature::from_bands(short, layout(3, 2)).is_err());
    }
}
