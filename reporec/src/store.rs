use ahash::AHashMap;

use crate::error::{RecError, Result};
use crate::minhash::{BandedSignature, SignatureLayout, SignatureTable};

/// Persists banded signatures between runs.
///
/// `upsert` is keyed by entity: the last write for an entity wins and no
/// ordering across entities is implied.
pub trait SignatureStore {
    type Error: From<RecError>;

    fn upsert(&mut self, entity: &str, signature: BandedSignature) -> std::result::Result<(), Self::Error>;

    /// Loads every stored signature into a table. Signatures built with a
    /// layout other than `layout` are rejected with `DimensionMismatch`.
    fn load(&self, layout: SignatureLayout) -> std::result::Result<SignatureTable, Self::Error>;
}

/// Signature store kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySignatureStore {
    signatures: AHashMap<String, BandedSignature>,
}

impl MemorySignatureStore {
    pub fn new() -> Self {
        MemorySignatureStore::default()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl SignatureStore for MemorySignatureStore {
    type Error = RecError;

    fn upsert(&mut self, entity: &str, signature: BandedSignature) -> Result<()> {
        self.signatures.insert(entity.to_owned(), signature);
        Ok(())
    }

    fn load(&self, layout: SignatureLayout) -> Result<SignatureTable> {
        let mut table = SignatureTable::with_capacity(layout, self.signatures.len());
        for (entity, signature) in self.signatures.iter() {
            table.insert(entity.clone(), signature.clone())?;
        }
        Ok(table)
    }
}
