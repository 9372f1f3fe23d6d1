//! Board errors.
//!
//! None of these are fatal: the operation that returns one has left the
//! board untouched, and callers are free to ignore it.

use thiserror::Error;

use clue_model::ClueId;

/// Failure reported by a persistence store. Logged by the board, never
/// returned from its operations.
#[derive(Debug, Clone, Error)]
#[error("store write failed: {0}")]
pub struct StoreError(pub String);

/// Rejections of board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The clue record is unusable (blank id or name).
    #[error("invalid clue record: {reason}")]
    InvalidClue { reason: String },

    /// The clue id is not known to the resolver or board.
    #[error("unknown clue: {0}")]
    UnknownClue(ClueId),

    /// A link was requested between a clue and itself.
    #[error("cannot link clue {0} to itself")]
    SelfLink(ClueId),

    /// A reveal run is already scheduled or in progress.
    #[error("a reveal sequence is already running")]
    RevealInProgress,

    /// There is nothing queued to reveal.
    #[error("nothing to reveal")]
    NothingToReveal,
}
