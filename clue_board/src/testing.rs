//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use clue_model::{ClueId, ClueRecord};

use crate::services::InfoPresenter;

/// Everything a [`RecordingPresenter`] was asked to do.
#[derive(Debug, Default)]
pub struct PresenterLog {
    /// Shown clues with their `immediate` flag.
    pub shown: Vec<(ClueId, bool)>,
    pub hidden: usize,
    pub completed: usize,
    pub typing: bool,
}

/// Detail panel double. Clones share one log, so a test can keep a handle
/// after boxing the presenter into a board.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    log: Rc<RefCell<PresenterLog>>,
    types_text: bool,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A presenter whose text keeps typing after a non-immediate show until
    /// `complete_typing` is called.
    pub fn typing() -> Self {
        Self {
            types_text: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> std::cell::Ref<'_, PresenterLog> {
        self.log.borrow()
    }

    pub fn shown_ids(&self) -> Vec<ClueId> {
        self.log.borrow().shown.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl InfoPresenter for RecordingPresenter {
    fn show(&mut self, clue: &ClueRecord, immediate: bool) {
        let mut log = self.log.borrow_mut();
        log.shown.push((clue.id.clone(), immediate));
        log.typing = self.types_text && !immediate;
    }

    fn hide(&mut self, _immediate: bool) {
        let mut log = self.log.borrow_mut();
        log.hidden += 1;
        log.typing = false;
    }

    fn is_typing(&self) -> bool {
        self.log.borrow().typing
    }

    fn complete_typing(&mut self) {
        let mut log = self.log.borrow_mut();
        log.completed += 1;
        log.typing = false;
    }
}

/// Advance button pattern for driving a run to completion: pressed for three
/// frames, released for three.
pub fn tapping(frame: usize) -> bool {
    (frame / 3) % 2 == 0
}
