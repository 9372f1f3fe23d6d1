//! Errors raised while loading authored clue data or persisted snapshots.

use thiserror::Error;

use crate::ClueId;

/// Failures of catalog construction and snapshot decoding.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A clue was authored without an id.
    #[error("clue '{name}' has an empty id")]
    EmptyId { name: String },

    /// Two authored clues share the same id.
    #[error("duplicate clue id: {0}")]
    DuplicateId(ClueId),

    /// The TOML clue file could not be parsed.
    #[error("invalid clue file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A persisted snapshot could not be encoded or decoded.
    #[error("invalid board snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
