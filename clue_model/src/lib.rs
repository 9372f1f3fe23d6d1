//! # Clue Model
//!
//! The shared vocabulary of the relationship board. This crate holds the
//! authored clue data, the 2D geometry the board works in and the persisted
//! board state. It contains no presentation or sequencing logic.

pub mod board_state;
pub mod clues;
pub mod error;
pub mod geometry;

pub use board_state::*;
pub use clues::*;
pub use error::*;
pub use geometry::*;
