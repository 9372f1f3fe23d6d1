//! Board events - what the host game tells the board.

use serde::{Deserialize, Serialize};

use clue_model::{ClueId, ClueRecord};

/// Notifications flowing from the game into the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// The player discovered a clue.
    ClueDiscovered(ClueRecord),

    /// The player confirmed a link between two clues.
    LinkConfirmed { a: ClueId, b: ClueId },

    /// The board panel became visible.
    BoardOpened,

    /// The board panel was hidden.
    BoardClosed,

    /// Play queued reveals now, if the board is open.
    RevealRequested,
}

impl BoardEvent {
    /// Clue ids this event concerns.
    pub fn clues(&self) -> Vec<&ClueId> {
        match self {
            BoardEvent::ClueDiscovered(record) => vec![&record.id],
            BoardEvent::LinkConfirmed { a, b } => vec![a, b],
            _ => Vec::new(),
        }
    }
}
