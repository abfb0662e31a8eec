use thiserror::Error;

use crate::minhash::SignatureLayout;

/// Errors produced while generating signatures, comparing entities and ranking.
///
/// Every variant that concerns a particular entity carries its identifier so a
/// failed run can report which entity stopped it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecError {
    /// The entity has no items, so its signature has no defined minimum.
    #[error("entity `{entity}` has an empty item set")]
    EmptySet { entity: String },

    /// No preference set or signature exists for the identifier.
    #[error("no set or signature for entity `{entity}`")]
    MissingEntity { entity: String },

    /// Two signatures were built with different parameters or lengths.
    #[error("signature dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: SignatureLayout,
        found: SignatureLayout,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The item universe has no items, hashing modulo its size is undefined.
    #[error("item universe is empty")]
    EmptyUniverse,

    #[error("item `{item}` of entity `{entity}` is not in the item universe")]
    UnknownItem { entity: String, item: String },
}

impl RecError {
    pub(crate) fn missing(entity: &str) -> Self {
        RecError::MissingEntity {
            entity: entity.to_owned(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecError>;
