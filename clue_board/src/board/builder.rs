//! Board builder - explicit wiring of the board and its collaborators.

use crate::camera::CameraController;
use crate::config::BoardConfig;
use crate::services::{BoardStore, InfoPresenter};

use super::Board;

/// Assembles a [`Board`]. Every collaborator is optional.
pub struct BoardBuilder {
    config: BoardConfig,
    store: Option<Box<dyn BoardStore>>,
    presenter: Option<Box<dyn InfoPresenter>>,
    camera: bool,
    placement_seed: Option<u64>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self {
            config: BoardConfig::default(),
            store: None,
            presenter: None,
            camera: true,
            placement_seed: None,
        }
    }
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a persistence store.
    pub fn store(mut self, store: impl BoardStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Attach a detail panel.
    pub fn presenter(mut self, presenter: impl InfoPresenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// Build without a camera; focusing falls back to setting pan directly.
    pub fn without_camera(mut self) -> Self {
        self.camera = false;
        self
    }

    /// Make placement jitter reproducible.
    pub fn placement_seed(mut self, seed: u64) -> Self {
        self.placement_seed = Some(seed);
        self
    }

    pub fn build(self) -> Board {
        let camera = self
            .camera
            .then(|| CameraController::new(self.config.camera.clone()));
        Board::assemble(
            self.config,
            self.store,
            self.presenter,
            camera,
            self.placement_seed,
        )
    }
}
