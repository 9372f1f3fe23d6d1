//! Node instances - the on-board representation of a discovered clue.

use serde::{Deserialize, Serialize};

use clue_model::{ClueId, ClueRecord, InstanceId, Vec2};

/// A discovered clue placed on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInstance {
    pub instance: InstanceId,

    /// The authored record this node presents.
    pub clue: ClueRecord,

    /// Centre of the node in board-local space.
    pub position: Vec2,

    /// Pop-in scale from 0.0 (hidden) to 1.0 (fully shown).
    pub reveal: f32,

    pub selected: bool,
}

impl NodeInstance {
    /// Create a hidden node at the given position.
    pub fn new(clue: ClueRecord, position: Vec2) -> Self {
        Self {
            instance: InstanceId::new(),
            clue,
            position,
            reveal: 0.0,
            selected: false,
        }
    }

    /// Set the reveal scale.
    pub fn with_reveal(mut self, reveal: f32) -> Self {
        self.reveal = reveal.clamp(0.0, 1.0);
        self
    }

    pub fn id(&self) -> &ClueId {
        &self.clue.id
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal >= 1.0
    }
}
