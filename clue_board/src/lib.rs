//! # Clue Board
//!
//! The relationship board: discovered clues laid out as nodes on a 2D
//! canvas, with edges between related clues. This crate places nodes,
//! derives edges, moves the selection between nodes, drives the camera and
//! plays the reveal sequence for newly discovered clues.
//!
//! ## Core Components
//!
//! - **board**: The orchestrator that owns the registries and routes input
//! - **placement**: Ring sampling for collision-free node positions
//! - **graph**: Node and edge registries plus the edge builder
//! - **navigation**: Directional cone selection with a repeat gate
//! - **camera**: Smoothed, clamped pan and zoom
//! - **reveal**: The timed reveal state machine
//! - **services**: Persistence and detail-panel collaborators
//!
//! Everything is driven by an explicit `update(input, dt)` from the host
//! loop; nothing here reads a clock.

pub mod board;
pub mod camera;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod navigation;
pub mod placement;
pub mod reveal;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use board::*;
pub use camera::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use graph::*;
pub use navigation::*;
pub use placement::*;
pub use reveal::*;
pub use services::*;
