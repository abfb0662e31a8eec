use std::fmt;
use ahash::AHashMap;
use log::debug;

use crate::error::{RecError, Result};
use crate::minhash::{BandedSignature, SignatureLayout};

/// Banded signatures keyed by entity, all built with one `SignatureLayout`.
///
/// The layout is checked on every insert, so any two signatures taken from the
/// same table can be compared.
#[derive(Debug, Clone)]
pub struct SignatureTable {
    layout: SignatureLayout,
    signatures: AHashMap<String, BandedSignature>,
}

impl fmt::Display for SignatureTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureTable {{ {}, size = {} }}", self.layout, self.len())
    }
}

impl SignatureTable {
    pub fn new(layout: SignatureLayout) -> Self {
        SignatureTable {
            layout: layout,
            signatures: AHashMap::new(),
        }
    }

    pub fn with_capacity(layout: SignatureLayout, capacity: usize) -> Self {
        SignatureTable {
            layout: layout,
            signatures: AHashMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces the signature of `entity`, returning the previous one.
    pub fn insert(&mut self, entity: String, signature: BandedSignature) -> Result<Option<BandedSignature>> {
        if *signature.layout() != self.layout {
            return Err(RecError::DimensionMismatch {
                expected: self.layout,
                found: *signature.layout(),
            });
        }
        Ok(self.signatures.insert(entity, signature))
    }

    pub fn get(&self, entity: &str) -> Option<&BandedSignature> {
        self.signatures.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.signatures.contains_key(entity)
    }

    /// Approximate Jaccard similarity of two entities from their band agreement.
    pub fn similarity(&self, entity_1: &str, entity_2: &str) -> Result<f64> {
        let signature_1 = self.get(entity_1).ok_or_else(|| RecError::missing(entity_1))?;
        let signature_2 = self.get(entity_2).ok_or_else(|| RecError::missing(entity_2))?;
        let similarity = signature_1.similarity(signature_2)?;
        if similarity > 0.0 {
            debug!("{} <-> {} {}", entity_1, entity_2, similarity);
        }
        Ok(similarity)
    }

    pub fn layout(&self) -> SignatureLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.signatures.keys().map(|entity| entity.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BandedSignature)> {
        self.signatures.iter().map(|(entity, signature)| (entity.as_str(), signature))
    }
}
