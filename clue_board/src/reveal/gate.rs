//! Guarded advance - turns a held button into one deliberate "next" press.

use serde::{Deserialize, Serialize};

/// Where the gate is in its wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateStage {
    /// Text is still typing; a press completes it instead of advancing.
    Typing,
    /// Waiting for the advance button to be let go.
    AwaitRelease,
    /// Released; waiting out the debounce window.
    Debounce,
    /// Waiting for a fresh press.
    AwaitPress,
    /// A press was accepted.
    Accepted,
}

/// What the caller should do after polling the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    Wait,
    /// Fast-forward the typing text.
    CompleteTyping,
    Advance,
}

/// Requires typing to finish, the button to be released, a debounce delay
/// to pass, and then a new press, so one long press cannot skip several
/// reveal steps.
#[derive(Debug, Clone)]
pub struct AdvanceGate {
    debounce: f32,
    stage: GateStage,
    elapsed: f32,
    was_down: bool,
}

impl AdvanceGate {
    pub fn new(debounce: f32) -> Self {
        Self {
            debounce: debounce.max(0.0),
            stage: GateStage::Accepted,
            elapsed: 0.0,
            was_down: false,
        }
    }

    pub fn stage(&self) -> GateStage {
        self.stage
    }

    /// Start a new wait. `held` is the button state right now, so a press
    /// that began before arming is not mistaken for a new one.
    pub fn arm(&mut self, held: bool) {
        self.stage = GateStage::Typing;
        self.elapsed = 0.0;
        self.was_down = held;
    }

    /// Feed one frame of input.
    pub fn poll(&mut self, held: bool, typing: bool, dt: f32) -> GateSignal {
        let pressed = held && !self.was_down;
        self.was_down = held;

        loop {
            match self.stage {
                GateStage::Typing => {
                    if typing {
                        return if pressed {
                            GateSignal::CompleteTyping
                        } else {
                            GateSignal::Wait
                        };
                    }
                    self.stage = GateStage::AwaitRelease;
                    if pressed {
                        // This press belongs to the text, not to advancing.
                        return GateSignal::Wait;
                    }
                }
                GateStage::AwaitRelease => {
                    if held {
                        return GateSignal::Wait;
                    }
                    self.stage = GateStage::Debounce;
                    self.elapsed = 0.0;
                    return GateSignal::Wait;
                }
                GateStage::Debounce => {
                    self.elapsed += dt.max(0.0);
                    if self.elapsed < self.debounce {
                        return GateSignal::Wait;
                    }
                    self.stage = GateStage::AwaitPress;
                }
                GateStage::AwaitPress => {
                    if !pressed {
                        return GateSignal::Wait;
                    }
                    self.stage = GateStage::Accepted;
                    return GateSignal::Advance;
                }
                GateStage::Accepted => return GateSignal::Wait,
            }
        }
    }
}
