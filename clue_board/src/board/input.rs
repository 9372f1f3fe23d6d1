//! Per-frame input, abstracted from any device binding.

use clue_model::Vec2;

/// One frame of board input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardInput {
    /// Navigation stick or d-pad; length below the deadzone means released.
    pub navigate: Vec2,
    /// True on the frame submit was pressed.
    pub submit: bool,
    /// Free-look stick, in the direction the view should move.
    pub look: Vec2,
    /// Zoom axis: positive zooms in, negative zooms out.
    pub zoom: f32,
    /// Whether the advance button is held.
    pub advance: bool,
}

impl BoardInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn navigate(direction: Vec2) -> Self {
        Self {
            navigate: direction,
            ..Self::default()
        }
    }

    pub fn submit() -> Self {
        Self {
            submit: true,
            ..Self::default()
        }
    }

    pub fn look(direction: Vec2) -> Self {
        Self {
            look: direction,
            ..Self::default()
        }
    }

    pub fn zoom(amount: f32) -> Self {
        Self {
            zoom: amount,
            ..Self::default()
        }
    }

    pub fn advance(held: bool) -> Self {
        Self {
            advance: held,
            ..Self::default()
        }
    }
}
