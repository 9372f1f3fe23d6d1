//! Reveal sequencer - the discovery cutscene played when the board opens
//! with new material.
//!
//! A run goes through these phases, one [`RevealSequencer::tick`] per frame:
//! 1. **ZoomIn**: zoom the camera to the focus zoom
//! 2. **Pop**: per node in discovery order, select it, focus it and scale it in
//! 3. **Stagger**: short pause, then show the clue in the detail panel
//! 4. **Advance**: wait for a guarded advance press (see [`AdvanceGate`])
//! 5. **GrowEdges**: grow queued edges between this node and nodes already
//!    shown, from the earlier-discovered end, then hide the panel
//! 6. **ZoomOut**: zoom back to the default, leaving the last node selected
//!    with its detail shown
//!
//! An edge never starts growing until both of its endpoints have popped.

mod gate;

pub use gate::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use clue_model::{ClueId, DiscoveryOrder, EdgeKey};

use crate::camera::CameraController;
use crate::config::RevealConfig;
use crate::graph::BoardGraph;
use crate::navigation::NavigationController;
use crate::services::InfoPresenter;
use crate::BoardError;

/// Hard cap on phase transitions handled within one tick.
const MAX_STEPS_PER_TICK: usize = 16;

/// Nodes and edges waiting to be revealed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealQueue {
    pub nodes: Vec<ClueId>,
    pub edges: Vec<EdgeKey>,
}

impl RevealQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn push_node(&mut self, id: ClueId) {
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
    }

    pub fn push_edge(&mut self, key: EdgeKey) {
        if !self.edges.contains(&key) {
            self.edges.push(key);
        }
    }

    /// Move everything from `other` into this queue.
    pub fn merge(&mut self, other: RevealQueue) {
        for id in other.nodes {
            self.push_node(id);
        }
        for key in other.edges {
            self.push_edge(key);
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// Phase of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    Idle,
    ZoomIn,
    Pop,
    Stagger,
    Advance,
    GrowEdges,
    ZoomOut,
}

/// Observable milestones of a run, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    RunStarted { nodes: usize, edges: usize },
    NodePopStarted(ClueId),
    NodePopped(ClueId),
    DetailShown(ClueId),
    AdvanceAccepted(ClueId),
    EdgeGrowStarted(EdgeKey),
    EdgeGrown(EdgeKey),
    RunFinished,
    RunCancelled,
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    /// No run in progress.
    Idle,
    Running,
    /// The run completed during this tick.
    Finished,
}

/// Everything a run touches, borrowed from the board for one tick.
pub struct RevealContext<'a> {
    pub graph: &'a mut BoardGraph,
    pub navigation: &'a mut NavigationController,
    pub camera: Option<&'a mut CameraController>,
    pub presenter: Option<&'a mut dyn InfoPresenter>,
    /// Whether the advance button is held this frame.
    pub advance_held: bool,
}

impl RevealContext<'_> {
    fn is_typing(&self) -> bool {
        self.presenter.as_ref().is_some_and(|p| p.is_typing())
    }
}

/// Drives one reveal run at a time as an explicit state machine.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    config: RevealConfig,
    default_zoom: f32,
    phase: RevealPhase,
    elapsed: f32,

    /// Nodes of this run, in discovery order.
    nodes: Vec<ClueId>,
    cursor: usize,
    popped: HashSet<ClueId>,

    /// Queued edges not yet started.
    edges: Vec<EdgeKey>,
    /// Edges currently growing.
    growing: Vec<EdgeKey>,
    /// Growing edge whose tip the camera follows.
    tracked: Option<EdgeKey>,

    zoom_from: f32,
    gate: AdvanceGate,
    last_shown: Option<ClueId>,
    log: Vec<RevealEvent>,
}

impl RevealSequencer {
    pub fn new(config: RevealConfig, default_zoom: f32) -> Self {
        Self {
            gate: AdvanceGate::new(config.advance_debounce),
            config,
            default_zoom,
            phase: RevealPhase::Idle,
            elapsed: 0.0,
            nodes: Vec::new(),
            cursor: 0,
            popped: HashSet::new(),
            edges: Vec::new(),
            growing: Vec::new(),
            tracked: None,
            zoom_from: default_zoom,
            last_shown: None,
            log: Vec::new(),
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != RevealPhase::Idle
    }

    /// Node currently being revealed.
    pub fn current(&self) -> Option<&ClueId> {
        match self.phase {
            RevealPhase::Idle | RevealPhase::ZoomIn | RevealPhase::ZoomOut => None,
            _ => self.nodes.get(self.cursor),
        }
    }

    pub fn gate_stage(&self) -> GateStage {
        self.gate.stage()
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.log)
    }

    /// Begin a run over `queue`, zooming in from `current_zoom`. Nodes are
    /// ordered by discovery index.
    pub fn start(
        &mut self,
        queue: RevealQueue,
        order: &DiscoveryOrder,
        current_zoom: f32,
    ) -> Result<(), BoardError> {
        if self.is_running() {
            return Err(BoardError::RevealInProgress);
        }
        if queue.is_empty() {
            return Err(BoardError::NothingToReveal);
        }

        let mut nodes = queue.nodes;
        nodes.sort_by_key(|id| (order.index_of(id).unwrap_or(usize::MAX), id.clone()));

        info!(nodes = nodes.len(), edges = queue.edges.len(), "reveal run started");
        self.log.push(RevealEvent::RunStarted {
            nodes: nodes.len(),
            edges: queue.edges.len(),
        });

        self.nodes = nodes;
        self.edges = queue.edges;
        self.cursor = 0;
        self.popped.clear();
        self.growing.clear();
        self.tracked = None;
        self.last_shown = None;
        self.zoom_from = current_zoom;
        self.enter(RevealPhase::ZoomIn);
        Ok(())
    }

    /// Abort the run. Unfinished work is reset to zero progress and handed
    /// back so it can be replayed by a later run.
    pub fn cancel(&mut self, graph: &mut BoardGraph) -> RevealQueue {
        let mut leftover = RevealQueue::new();
        if !self.is_running() {
            return leftover;
        }

        for id in &self.nodes {
            if self.popped.contains(id) {
                continue;
            }
            if let Some(node) = graph.node_mut(id) {
                node.reveal = 0.0;
                leftover.push_node(id.clone());
            }
        }
        for key in self.growing.drain(..).chain(self.edges.drain(..)) {
            if let Some(edge) = graph.edge_mut(&key) {
                edge.progress = 0.0;
                leftover.push_edge(key);
            }
        }

        info!(
            nodes = leftover.nodes.len(),
            edges = leftover.edges.len(),
            "reveal run cancelled"
        );
        self.log.push(RevealEvent::RunCancelled);
        self.nodes.clear();
        self.tracked = None;
        self.enter(RevealPhase::Idle);
        leftover
    }

    /// Advance the run by `dt` seconds.
    pub fn tick(&mut self, ctx: &mut RevealContext<'_>, dt: f32) -> RevealStatus {
        if !self.is_running() {
            return RevealStatus::Idle;
        }

        let mut dt = dt.max(0.0);
        for _ in 0..MAX_STEPS_PER_TICK {
            let before = self.phase;
            let status = self.step(ctx, dt);
            if status == RevealStatus::Finished {
                return status;
            }
            if self.phase == before {
                break;
            }
            // Time is spent by the phase that consumed it; later phases in
            // the same frame start from zero.
            dt = 0.0;
        }
        RevealStatus::Running
    }

    fn step(&mut self, ctx: &mut RevealContext<'_>, dt: f32) -> RevealStatus {
        self.elapsed += dt;
        match self.phase {
            RevealPhase::Idle => RevealStatus::Idle,
            RevealPhase::ZoomIn => {
                let t = progress(self.elapsed, self.config.zoom_in_duration);
                let zoom = lerp(self.zoom_from, self.config.focus_zoom, ease(t));
                if let Some(camera) = ctx.camera.as_mut() {
                    camera.set_zoom(zoom, true);
                }
                if t >= 1.0 {
                    self.begin_node(ctx);
                }
                RevealStatus::Running
            }
            RevealPhase::Pop => {
                let t = progress(self.elapsed, self.config.pop_duration);
                let Some(id) = self.nodes.get(self.cursor).cloned() else {
                    self.begin_zoom_out(ctx);
                    return RevealStatus::Running;
                };
                if let Some(node) = ctx.graph.node_mut(&id) {
                    node.reveal = ease(t);
                }
                if t >= 1.0 {
                    if let Some(node) = ctx.graph.node_mut(&id) {
                        node.reveal = 1.0;
                    }
                    self.popped.insert(id.clone());
                    debug!(clue = %id, "node popped");
                    self.log.push(RevealEvent::NodePopped(id));
                    self.enter(RevealPhase::Stagger);
                }
                RevealStatus::Running
            }
            RevealPhase::Stagger => {
                if self.elapsed >= self.config.pop_stagger {
                    self.show_current(ctx);
                    self.gate.arm(ctx.advance_held);
                    self.enter(RevealPhase::Advance);
                }
                RevealStatus::Running
            }
            RevealPhase::Advance => {
                let typing = ctx.is_typing();
                match self.gate.poll(ctx.advance_held, typing, dt) {
                    GateSignal::Wait => {}
                    GateSignal::CompleteTyping => {
                        if let Some(presenter) = ctx.presenter.as_mut() {
                            presenter.complete_typing();
                        }
                    }
                    GateSignal::Advance => {
                        if let Some(id) = self.nodes.get(self.cursor).cloned() {
                            self.log.push(RevealEvent::AdvanceAccepted(id));
                        }
                        self.begin_edges(ctx);
                    }
                }
                RevealStatus::Running
            }
            RevealPhase::GrowEdges => {
                let t = if self.growing.is_empty() {
                    1.0
                } else {
                    progress(self.elapsed, self.config.edge_grow_duration)
                };
                self.grow(ctx, t);
                if t >= 1.0 {
                    self.finish_edges();
                    if let Some(presenter) = ctx.presenter.as_mut() {
                        presenter.hide(false);
                    }
                    self.cursor += 1;
                    self.begin_node(ctx);
                }
                RevealStatus::Running
            }
            RevealPhase::ZoomOut => {
                let t = progress(self.elapsed, self.config.zoom_out_duration);
                let zoom = lerp(self.zoom_from, self.default_zoom, ease(t));
                if let Some(camera) = ctx.camera.as_mut() {
                    camera.set_zoom(zoom, true);
                }
                self.grow(ctx, t);
                if t >= 1.0 {
                    self.finish_edges();
                    self.finish(ctx);
                    return RevealStatus::Finished;
                }
                RevealStatus::Running
            }
        }
    }

    fn enter(&mut self, phase: RevealPhase) {
        debug!(from = ?self.phase, to = ?phase, "reveal phase");
        self.phase = phase;
        self.elapsed = 0.0;
    }

    /// Start popping the node at the cursor, skipping nodes that vanished.
    fn begin_node(&mut self, ctx: &mut RevealContext<'_>) {
        while let Some(id) = self.nodes.get(self.cursor).cloned() {
            let Some(position) = ctx.graph.position(&id) else {
                self.cursor += 1;
                continue;
            };
            ctx.navigation.select(Some(id.clone()));
            ctx.graph.set_selected(Some(&id));
            if let Some(camera) = ctx.camera.as_mut() {
                camera.focus_on(position, false);
            }
            debug!(clue = %id, "node pop started");
            self.log.push(RevealEvent::NodePopStarted(id));
            self.enter(RevealPhase::Pop);
            return;
        }
        self.begin_zoom_out(ctx);
    }

    fn show_current(&mut self, ctx: &mut RevealContext<'_>) {
        let Some(id) = self.nodes.get(self.cursor).cloned() else {
            return;
        };
        if let (Some(presenter), Some(node)) = (ctx.presenter.as_mut(), ctx.graph.node(&id)) {
            presenter.show(&node.clue, false);
        }
        self.log.push(RevealEvent::DetailShown(id.clone()));
        self.last_shown = Some(id);
    }

    /// Start growing the queued edges whose endpoints have both popped and
    /// one of which is the current node.
    fn begin_edges(&mut self, ctx: &mut RevealContext<'_>) {
        let Some(current) = self.nodes.get(self.cursor).cloned() else {
            self.enter(RevealPhase::GrowEdges);
            return;
        };
        let previous = self
            .cursor
            .checked_sub(1)
            .and_then(|i| self.nodes.get(i))
            .cloned();

        let touching: HashSet<EdgeKey> = ctx.graph.edges_touching(&current).into_iter().collect();
        let ready = |key: &EdgeKey| {
            touching.contains(key)
                && key
                    .other(&current)
                    .and_then(|other| ctx.graph.node(other))
                    .is_some_and(|n| n.is_revealed())
        };
        let (now, later): (Vec<_>, Vec<_>) = self.edges.drain(..).partition(|k| ready(k));
        self.edges = later;

        self.tracked = previous.and_then(|prev| {
            now.iter()
                .find(|k| ctx.graph.edge(k).is_some_and(|e| e.grows_from == prev))
                .cloned()
        });
        self.start_growing(now);
        self.enter(RevealPhase::GrowEdges);
    }

    fn begin_zoom_out(&mut self, ctx: &mut RevealContext<'_>) {
        self.zoom_from = ctx
            .camera
            .as_ref()
            .map_or(self.default_zoom, |c| c.target_zoom());

        // Whatever is still queued joins existing nodes only; let it grow
        // during the zoom out.
        let leftover: Vec<_> = std::mem::take(&mut self.edges)
            .into_iter()
            .filter(|key| {
                [key.low(), key.high()]
                    .iter()
                    .all(|id| ctx.graph.node(id).is_some_and(|n| n.is_revealed()))
            })
            .collect();
        self.tracked = None;
        self.start_growing(leftover);
        self.enter(RevealPhase::ZoomOut);
    }

    fn start_growing(&mut self, keys: Vec<EdgeKey>) {
        for key in &keys {
            debug!(edge = %key, "edge grow started");
            self.log.push(RevealEvent::EdgeGrowStarted(key.clone()));
        }
        self.growing = keys;
    }

    fn grow(&mut self, ctx: &mut RevealContext<'_>, t: f32) {
        let progress = ease(t);
        for key in &self.growing {
            if let Some(edge) = ctx.graph.edge_mut(key) {
                edge.progress = progress;
            }
        }

        let Some(key) = self.tracked.as_ref() else {
            return;
        };
        let tip = ctx.graph.edge(key).and_then(|edge| {
            let from = ctx.graph.position(&edge.grows_from)?;
            let to = ctx.graph.position(edge.grows_to())?;
            Some(edge.tip(from, to))
        });
        if let (Some(tip), Some(camera)) = (tip, ctx.camera.as_mut()) {
            camera.focus_on(tip, false);
        }
    }

    fn finish_edges(&mut self) {
        for key in self.growing.drain(..) {
            self.log.push(RevealEvent::EdgeGrown(key));
        }
        self.tracked = None;
    }

    fn finish(&mut self, ctx: &mut RevealContext<'_>) {
        if let Some(id) = self.last_shown.clone() {
            ctx.navigation.select(Some(id.clone()));
            ctx.graph.set_selected(Some(&id));
            if let (Some(presenter), Some(node)) = (ctx.presenter.as_mut(), ctx.graph.node(&id)) {
                presenter.show(&node.clue, true);
            }
        }
        info!(nodes = self.popped.len(), "reveal run finished");
        self.log.push(RevealEvent::RunFinished);
        self.nodes.clear();
        self.enter(RevealPhase::Idle);
    }
}

fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Ease-out cubic.
fn ease(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
