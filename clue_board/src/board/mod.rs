//! Board orchestrator.
//!
//! [`Board`] owns the node and edge registries and wires the placement,
//! edge, navigation, camera and reveal components together. Discoveries are
//! written through to an optional [`BoardStore`]; a failing store is logged
//! and otherwise ignored.
//!
//! Nodes discovered while the board is hidden, or while a reveal is playing,
//! wait at zero visibility in a pending queue. Opening the board plays the
//! queue as a single reveal run; navigation input is ignored for as long as
//! the run lasts.

mod builder;
mod input;

pub use builder::*;
pub use input::*;

use tracing::{debug, info, warn};

use clue_model::{
    BoardState, ClueCatalog, ClueId, ClueRecord, ClueResolver, EdgeKey, Vec2,
};

use crate::camera::CameraController;
use crate::config::BoardConfig;
use crate::error::{BoardError, StoreError};
use crate::events::BoardEvent;
use crate::graph::{BoardGraph, EdgeBuilder, EdgeChange, EdgeInstance, NodeInstance};
use crate::navigation::{NavigationController, RepeatGate};
use crate::placement::PlacementEngine;
use crate::reveal::{RevealContext, RevealEvent, RevealQueue, RevealSequencer, RevealStatus};
use crate::services::{BoardStore, InfoPresenter};

/// Stick deflection below which look input is ignored.
const LOOK_DEADZONE: f32 = 0.1;

/// Result of [`Board::add_node`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeAdded {
    /// A new node was created.
    Added {
        /// Position in discovery order.
        index: usize,
        position: Vec2,
        /// Whether the node waits for a reveal run.
        queued: bool,
    },
    /// The clue was already on the board; its edges were repaired.
    AlreadyPresent,
}

/// The relationship board.
pub struct Board {
    config: BoardConfig,
    graph: BoardGraph,
    state: BoardState,
    store: Option<Box<dyn BoardStore>>,
    presenter: Option<Box<dyn InfoPresenter>>,
    camera: Option<CameraController>,
    navigation: NavigationController,
    nav_gate: RepeatGate,
    placement: PlacementEngine,
    sequencer: RevealSequencer,
    pending: RevealQueue,
    visible: bool,
    reveal_scheduled: bool,
}

impl Board {
    pub fn builder() -> BoardBuilder {
        BoardBuilder::new()
    }

    /// A board with a camera and no store or presenter.
    pub fn new(config: BoardConfig) -> Self {
        BoardBuilder::new().config(config).build()
    }

    pub(crate) fn assemble(
        config: BoardConfig,
        store: Option<Box<dyn BoardStore>>,
        presenter: Option<Box<dyn InfoPresenter>>,
        camera: Option<CameraController>,
        placement_seed: Option<u64>,
    ) -> Self {
        let placement = match placement_seed {
            Some(seed) => PlacementEngine::with_seed(config.placement.clone(), seed),
            None => PlacementEngine::new(config.placement.clone()),
        };

        let mut state = BoardState::new();
        state.zoom = config.camera.default_zoom;
        if let Some(store) = store.as_deref() {
            for key in store.confirmed() {
                state.confirm(key);
            }
        }

        Self {
            navigation: NavigationController::new(config.navigation.clone()),
            nav_gate: RepeatGate::new(&config.navigation),
            sequencer: RevealSequencer::new(config.reveal.clone(), config.camera.default_zoom),
            placement,
            graph: BoardGraph::new(),
            state,
            store,
            presenter,
            camera,
            pending: RevealQueue::new(),
            visible: false,
            reveal_scheduled: false,
            config,
        }
    }

    // === Queries ===

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn graph(&self) -> &BoardGraph {
        &self.graph
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn node(&self, id: &ClueId) -> Option<&NodeInstance> {
        self.graph.node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeInstance> {
        self.graph.nodes()
    }

    pub fn edge(&self, a: &ClueId, b: &ClueId) -> Option<&EdgeInstance> {
        self.graph.edge(&EdgeKey::between(a, b))
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeInstance> {
        self.graph.edges()
    }

    pub fn discovery_index(&self, id: &ClueId) -> Option<usize> {
        self.state.discovery.index_of(id)
    }

    pub fn selected(&self) -> Option<&ClueId> {
        self.navigation.selected()
    }

    pub fn camera(&self) -> Option<&CameraController> {
        self.camera.as_ref()
    }

    pub fn store(&self) -> Option<&dyn BoardStore> {
        self.store.as_deref()
    }

    pub fn pending(&self) -> &RevealQueue {
        &self.pending
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a reveal run is playing. Navigation is suppressed meanwhile.
    pub fn is_cutscene_active(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn is_reveal_scheduled(&self) -> bool {
        self.reveal_scheduled
    }

    pub fn is_confirmed(&self, a: &ClueId, b: &ClueId) -> bool {
        let key = EdgeKey::between(a, b);
        self.state.is_confirmed(&key) || self.store.as_deref().is_some_and(|s| s.is_confirmed(&key))
    }

    /// Take the reveal events recorded since the last call.
    pub fn take_reveal_events(&mut self) -> Vec<RevealEvent> {
        self.sequencer.drain_events()
    }

    // === Discovery ===

    /// Add a discovered clue to the board.
    ///
    /// A clue already on the board only has its edges repaired. A new node
    /// is placed at its saved position or near the view centre, pulled
    /// toward its related nodes. It shows at once when the board is open and
    /// idle, and waits for a reveal run otherwise.
    pub fn add_node(&mut self, record: ClueRecord) -> Result<NodeAdded, BoardError> {
        if record.id.is_blank() {
            warn!(name = %record.name, "rejected clue with blank id");
            return Err(BoardError::InvalidClue {
                reason: "blank id".into(),
            });
        }

        let id = record.id.clone();
        if self.graph.contains(&id) {
            debug!(clue = %id, "clue already on board, repairing edges");
            self.build_edges_touching(&id);
            return Ok(NodeAdded::AlreadyPresent);
        }

        let (index, _) = self.state.discovery.record(&id);
        self.write(|s| s.append_discovered(&id));

        let saved = self.store.as_deref().and_then(|s| s.position(&id));
        let position = match saved {
            Some(position) => position,
            None => self.place(&record),
        };
        self.write(|s| s.save_position(&id, position));

        let immediate = self.reveals_immediately();
        let reveal = if immediate { 1.0 } else { 0.0 };
        self.graph
            .add_node(NodeInstance::new(record, position).with_reveal(reveal));
        if !immediate {
            self.pending.push_node(id.clone());
        }

        self.build_edges_touching(&id);
        self.grow_content();
        if immediate && self.navigation.selected().is_none() {
            self.set_selection(Some(id.clone()));
        }

        info!(clue = %id, index, x = position.x, y = position.y, queued = !immediate, "clue added to board");
        Ok(NodeAdded::Added {
            index,
            position,
            queued: !immediate,
        })
    }

    /// Look a clue up in the catalog and add it.
    pub fn discover(&mut self, id: &ClueId, catalog: &ClueCatalog) -> Result<NodeAdded, BoardError> {
        match catalog.get(id) {
            Some(record) => self.add_node(record.clone()),
            None => {
                warn!(clue = %id, "discovered clue missing from catalog");
                Err(BoardError::UnknownClue(id.clone()))
            }
        }
    }

    /// Rebuild the board from saved discoveries without playing any reveal.
    ///
    /// Ids the resolver does not know are skipped. Saved positions, pan and
    /// zoom come from the store when one is attached. Returns the number of
    /// nodes restored.
    pub fn restore_from_save<R>(&mut self, ids: &[ClueId], resolver: &R) -> usize
    where
        R: ClueResolver + ?Sized,
    {
        if let Some(store) = self.store.as_deref() {
            for key in store.confirmed() {
                self.state.confirm(key);
            }
        }

        let mut restored = 0;
        for id in ids {
            if id.is_blank() || self.graph.contains(id) {
                continue;
            }
            let Some(record) = resolver.resolve(id).filter(|r| r.id == *id) else {
                warn!(clue = %id, "saved clue could not be resolved");
                continue;
            };

            let (_, is_new) = self.state.discovery.record(id);
            if is_new {
                self.write(|s| s.append_discovered(id));
            }
            let saved = self.store.as_deref().and_then(|s| s.position(id));
            let position = match saved {
                Some(position) => position,
                None => {
                    let position = self.place(&record);
                    self.write(|s| s.save_position(id, position));
                    position
                }
            };
            self.graph
                .add_node(NodeInstance::new(record, position).with_reveal(1.0));
            restored += 1;
        }

        self.rebuild_edges();
        self.grow_content();

        let saved_pan = self.store.as_deref().and_then(|s| s.pan());
        let saved_zoom = self.store.as_deref().and_then(|s| s.zoom());
        let pan = saved_pan.unwrap_or(self.state.pan);
        let zoom = saved_zoom.unwrap_or(self.state.zoom);
        match self.camera.as_mut() {
            Some(camera) => {
                camera.restore(pan, zoom);
                self.state.pan = camera.pan();
                self.state.zoom = camera.zoom();
            }
            None => {
                self.state.pan = pan;
                self.state.zoom = zoom;
            }
        }

        if self.navigation.selected().is_none() {
            let last = self.state.discovery.ids().last().cloned();
            self.set_selection(last);
        }

        info!(restored, skipped = ids.len() - restored, "board restored from save");
        restored
    }

    /// Restore using the discovery order held by the attached store.
    pub fn restore<R>(&mut self, resolver: &R) -> usize
    where
        R: ClueResolver + ?Sized,
    {
        let ids = self
            .store
            .as_deref()
            .map(|s| s.discovery_order())
            .unwrap_or_default();
        self.restore_from_save(&ids, resolver)
    }

    /// Record a confirmed link and promote its edge when both clues are on
    /// the board. Confirming twice changes nothing.
    pub fn confirm_link(&mut self, a: &ClueId, b: &ClueId) -> Result<EdgeChange, BoardError> {
        if a.is_blank() || b.is_blank() {
            return Err(BoardError::InvalidClue {
                reason: "blank id in link".into(),
            });
        }
        if a == b {
            return Err(BoardError::SelfLink(a.clone()));
        }

        let key = EdgeKey::between(a, b);
        if self.state.confirm(key.clone()) {
            self.write(|s| s.confirm(&key));
        }

        let revealed = self.edges_reveal_immediately(a, b);
        let change = {
            let state = &self.state;
            let confirmed = |k: &EdgeKey| state.is_confirmed(k);
            EdgeBuilder::new(&mut self.graph, &state.discovery, &confirmed, revealed)
                .ensure_edge(a, b)
        };
        if change.is_change() && !revealed {
            self.pending.push_edge(key.clone());
        }

        info!(edge = %key, ?change, "link confirmed");
        Ok(change)
    }

    /// Drop and rederive every edge. Edges with a hidden endpoint wait for
    /// the next reveal run. Returns the number of edges.
    pub fn rebuild_edges(&mut self) -> usize {
        let count = {
            let state = &self.state;
            let confirmed = |k: &EdgeKey| state.is_confirmed(k);
            EdgeBuilder::new(&mut self.graph, &state.discovery, &confirmed, true)
                .rebuild_all(state.confirmed.iter())
        };

        let hidden: Vec<EdgeKey> = self
            .graph
            .edges()
            .filter(|e| !self.endpoints_revealed(&e.key))
            .map(|e| e.key.clone())
            .collect();
        for key in hidden {
            if let Some(edge) = self.graph.edge_mut(&key) {
                edge.progress = 0.0;
            }
            self.pending.push_edge(key);
        }

        debug!(edges = count, "edges rebuilt");
        count
    }

    /// Empty the board and its store.
    pub fn clear(&mut self) {
        self.sequencer.cancel(&mut self.graph);
        self.graph.clear();
        self.pending.clear();
        self.reveal_scheduled = false;
        self.set_selection(None);
        self.nav_gate.reset();

        self.state = BoardState::new();
        self.state.zoom = self.config.camera.default_zoom;
        if let Some(camera) = self.camera.as_mut() {
            camera.set_content_size(Vec2::ZERO);
            camera.restore(Vec2::ZERO, self.config.camera.default_zoom);
        }
        if let Some(presenter) = self.presenter.as_deref_mut() {
            presenter.hide(true);
        }
        self.write(|s| s.clear());
        info!("board cleared");
    }

    /// Route a game event to the matching operation.
    pub fn handle_event(&mut self, event: BoardEvent) -> Result<(), BoardError> {
        match event {
            BoardEvent::ClueDiscovered(record) => self.add_node(record).map(|_| ()),
            BoardEvent::LinkConfirmed { a, b } => self.confirm_link(&a, &b).map(|_| ()),
            BoardEvent::BoardOpened => {
                self.open();
                Ok(())
            }
            BoardEvent::BoardClosed => {
                self.close();
                Ok(())
            }
            BoardEvent::RevealRequested => self.request_reveal(),
        }
    }

    // === Visibility and reveal scheduling ===

    /// Show the board. Pending discoveries are scheduled for a reveal run.
    pub fn open(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.nav_gate.reset();
        info!(pending_nodes = self.pending.nodes.len(), "board opened");

        if !self.pending.is_empty() {
            if let Err(err) = self.request_reveal() {
                debug!(%err, "reveal not scheduled on open");
            }
            return;
        }

        if self.navigation.selected().is_none() {
            let last = self.state.discovery.ids().last().cloned();
            self.set_selection(last);
        }
        if let Some(id) = self.navigation.selected().cloned() {
            self.focus(&id, true);
            self.show_detail(&id, true);
        }
    }

    /// Hide the board. A running reveal is cancelled and its unfinished work
    /// goes back to the pending queue.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.reveal_scheduled = false;

        if self.sequencer.is_running() {
            let leftover = self.sequencer.cancel(&mut self.graph);
            self.pending.merge(leftover);
        }
        if let Some(presenter) = self.presenter.as_deref_mut() {
            presenter.hide(true);
        }
        self.nav_gate.reset();
        self.persist_camera();
        info!(pending_nodes = self.pending.nodes.len(), "board closed");
    }

    /// Schedule a reveal run for the pending queue. It starts on the next
    /// [`update`](Self::update) while the board is open.
    pub fn request_reveal(&mut self) -> Result<(), BoardError> {
        if self.reveal_scheduled || self.sequencer.is_running() {
            debug!("reveal already scheduled");
            return Err(BoardError::RevealInProgress);
        }
        if self.pending.is_empty() {
            return Err(BoardError::NothingToReveal);
        }
        self.reveal_scheduled = true;
        debug!(
            nodes = self.pending.nodes.len(),
            edges = self.pending.edges.len(),
            "reveal scheduled"
        );
        Ok(())
    }

    // === Frame update ===

    /// Advance the board by `dt` seconds.
    pub fn update(&mut self, input: &BoardInput, dt: f32) {
        if !self.visible {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.reveal_scheduled && !self.sequencer.is_running() {
            self.start_reveal();
        }

        if self.sequencer.is_running() {
            self.tick_reveal(input.advance, dt);
        } else {
            self.handle_input(input, dt);
        }

        if let Some(camera) = self.camera.as_mut() {
            camera.tick(dt);
        }
    }

    /// Move the selection one hop in `direction`, bypassing the repeat
    /// gate. With nothing selected, the latest discovery is selected.
    pub fn move_selection(&mut self, direction: Vec2) -> bool {
        if self.sequencer.is_running() {
            return false;
        }
        if self.navigation.selected().is_none() {
            let Some(last) = self.state.discovery.ids().last().cloned() else {
                return false;
            };
            self.set_selection(Some(last.clone()));
            self.show_detail(&last, false);
            return true;
        }

        let nodes = self.graph.placed();
        if !self.navigation.move_selection(direction, &nodes) {
            return false;
        }
        let Some(id) = self.navigation.selected().cloned() else {
            return false;
        };
        self.graph.set_selected(Some(&id));
        debug!(clue = %id, "selection moved");
        self.show_detail(&id, false);
        true
    }

    /// Select a clue on the board.
    pub fn select(&mut self, id: &ClueId) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        self.set_selection(Some(id.clone()));
        true
    }

    /// Centre the camera on the selection.
    pub fn submit(&mut self) -> bool {
        let Some(id) = self.navigation.selected().cloned() else {
            return false;
        };
        self.focus(&id, false);
        self.persist_camera();
        true
    }

    fn handle_input(&mut self, input: &BoardInput, dt: f32) {
        if let Some(direction) = self.nav_gate.poll(input.navigate, dt) {
            self.move_selection(direction);
        }
        if input.submit {
            self.submit();
        }

        let mut moved = false;
        if input.look.length() > LOOK_DEADZONE {
            let delta = -input.look * self.config.look_speed * dt;
            match self.camera.as_mut() {
                Some(camera) => camera.nudge(delta),
                None => self.state.pan += delta,
            }
            moved = true;
        }
        if input.zoom != 0.0 && input.zoom.is_finite() {
            if let Some(camera) = self.camera.as_mut() {
                let factor = self.config.zoom_speed.powf(input.zoom * dt);
                camera.zoom_around(factor, Vec2::ZERO);
                moved = true;
            }
        }
        if moved {
            self.persist_camera();
        }
    }

    fn start_reveal(&mut self) {
        self.reveal_scheduled = false;
        if self.pending.is_empty() {
            return;
        }
        let queue = std::mem::take(&mut self.pending);
        let zoom = self
            .camera
            .as_ref()
            .map_or(self.state.zoom, |c| c.target_zoom());
        if let Err(err) = self.sequencer.start(queue, &self.state.discovery, zoom) {
            warn!(%err, "reveal run did not start");
        }
    }

    fn tick_reveal(&mut self, advance_held: bool, dt: f32) {
        let presenter: Option<&mut dyn InfoPresenter> = match self.presenter.as_mut() {
            Some(presenter) => Some(&mut **presenter),
            None => None,
        };
        let mut ctx = RevealContext {
            graph: &mut self.graph,
            navigation: &mut self.navigation,
            camera: self.camera.as_mut(),
            presenter,
            advance_held,
        };

        if self.sequencer.tick(&mut ctx, dt) == RevealStatus::Finished {
            self.nav_gate.reset();
            self.persist_camera();
            if !self.pending.is_empty() {
                debug!("discoveries arrived during the run, scheduling another");
                if let Err(err) = self.request_reveal() {
                    debug!(%err, "follow-up reveal not scheduled");
                }
            }
        }
    }

    // === Helpers ===

    /// New nodes and edges skip the reveal run only on an open, idle board.
    fn reveals_immediately(&self) -> bool {
        self.visible && !self.sequencer.is_running() && !self.reveal_scheduled
    }

    fn edges_reveal_immediately(&self, a: &ClueId, b: &ClueId) -> bool {
        self.reveals_immediately() && self.endpoints_revealed(&EdgeKey::between(a, b))
    }

    fn endpoints_revealed(&self, key: &EdgeKey) -> bool {
        [key.low(), key.high()]
            .into_iter()
            .all(|id| self.graph.node(id).is_some_and(|n| n.is_revealed()))
    }

    fn view_center(&self) -> Vec2 {
        match self.camera.as_ref() {
            Some(camera) => camera.view_center(),
            None => -self.state.pan / self.state.zoom,
        }
    }

    fn place(&mut self, record: &ClueRecord) -> Vec2 {
        let seed = self.view_center();
        let related: Vec<Vec2> = self
            .graph
            .related_ids(&record.id, &record.related)
            .iter()
            .filter_map(|id| self.graph.position(id))
            .collect();
        let existing = self.graph.positions();
        self.placement.place(seed, &related, &existing)
    }

    fn build_edges_touching(&mut self, id: &ClueId) {
        let revealed = self.reveals_immediately();
        let changed = {
            let state = &self.state;
            let store = self.store.as_deref();
            let confirmed =
                |k: &EdgeKey| state.is_confirmed(k) || store.is_some_and(|s| s.is_confirmed(k));
            let touching: Vec<&EdgeKey> = state.confirmed.iter().filter(|k| k.contains(id)).collect();

            let mut builder = EdgeBuilder::new(&mut self.graph, &state.discovery, &confirmed, revealed);
            let mut changed = builder.build_touching(id);
            changed.extend(builder.ensure_pairs(touching));
            changed
        };
        if !revealed {
            for key in changed {
                self.pending.push_edge(key);
            }
        }
    }

    /// Grow camera content bounds to enclose every node plus a margin.
    fn grow_content(&mut self) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let extent = self
            .graph
            .nodes()
            .fold(Vec2::ZERO, |acc, n| {
                Vec2::new(acc.x.max(n.position.x.abs()), acc.y.max(n.position.y.abs()))
            });
        let margin = self.config.content_margin;
        camera.set_content_size(Vec2::new(extent.x + margin, extent.y + margin) * 2.0);
    }

    fn set_selection(&mut self, id: Option<ClueId>) {
        self.graph.set_selected(id.as_ref());
        self.navigation.select(id);
    }

    fn focus(&mut self, id: &ClueId, immediate: bool) {
        let Some(position) = self.graph.position(id) else {
            return;
        };
        match self.camera.as_mut() {
            Some(camera) => camera.focus_on(position, immediate),
            None => self.state.pan = -position * self.state.zoom,
        }
    }

    fn show_detail(&mut self, id: &ClueId, immediate: bool) {
        let Some(presenter) = self.presenter.as_deref_mut() else {
            return;
        };
        if let Some(node) = self.graph.node(id) {
            presenter.show(&node.clue, immediate);
        }
    }

    /// Mirror the camera targets into board state and the store.
    fn persist_camera(&mut self) {
        let (pan, zoom) = match self.camera.as_ref() {
            Some(camera) => (camera.target_pan(), camera.target_zoom()),
            None => (self.state.pan, self.state.zoom),
        };
        self.state.pan = pan;
        self.state.zoom = zoom;
        self.write(|s| s.save_pan(pan));
        self.write(|s| s.save_zoom(zoom));
    }

    /// Run a store write. Failures are logged and the board carries on.
    fn write<F>(&mut self, op: F)
    where
        F: FnOnce(&mut dyn BoardStore) -> Result<(), StoreError>,
    {
        if let Some(store) = self.store.as_deref_mut() {
            if let Err(err) = op(store) {
                warn!(%err, "board store write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeState;
    use crate::reveal::RevealPhase;
    use crate::services::MemoryStore;
    use crate::testing::{tapping, RecordingPresenter};
    use clue_model::BoardSnapshot;

    const FRAME: f32 = 1.0 / 60.0;

    fn id(s: &str) -> ClueId {
        ClueId::new(s)
    }

    fn open_board() -> Board {
        let mut board = Board::builder().placement_seed(7).build();
        board.open();
        board
    }

    /// A store that already knows where each clue goes.
    fn store_with(positions: &[(&str, Vec2)]) -> MemoryStore {
        let mut snapshot = BoardSnapshot::new();
        for (name, position) in positions {
            snapshot.positions.insert(id(name), *position);
        }
        MemoryStore::from_snapshot(snapshot)
    }

    /// Feed frames with a tapping advance button until no run is playing or
    /// scheduled.
    fn play_out(board: &mut Board) {
        for frame in 0..20_000 {
            board.update(&BoardInput::advance(tapping(frame)), FRAME);
            if !board.is_cutscene_active() && !board.is_reveal_scheduled() {
                return;
            }
        }
        panic!("reveal never finished");
    }

    fn discover_chain_hidden(board: &mut Board) {
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.add_node(ClueRecord::new("b", "B").with_related("a")).unwrap();
        board.add_node(ClueRecord::new("c", "C").with_related("b")).unwrap();
    }

    fn position_of(events: &[RevealEvent], wanted: &RevealEvent) -> usize {
        events
            .iter()
            .position(|e| e == wanted)
            .unwrap_or_else(|| panic!("missing {wanted:?}"))
    }

    struct FailingStore;

    fn refuse() -> Result<(), StoreError> {
        Err(StoreError("disk full".into()))
    }

    impl BoardStore for FailingStore {
        fn position(&self, _: &ClueId) -> Option<Vec2> {
            None
        }
        fn save_position(&mut self, _: &ClueId, _: Vec2) -> Result<(), StoreError> {
            refuse()
        }
        fn pan(&self) -> Option<Vec2> {
            None
        }
        fn save_pan(&mut self, _: Vec2) -> Result<(), StoreError> {
            refuse()
        }
        fn zoom(&self) -> Option<f32> {
            None
        }
        fn save_zoom(&mut self, _: f32) -> Result<(), StoreError> {
            refuse()
        }
        fn discovery_order(&self) -> Vec<ClueId> {
            Vec::new()
        }
        fn append_discovered(&mut self, _: &ClueId) -> Result<(), StoreError> {
            refuse()
        }
        fn is_confirmed(&self, _: &EdgeKey) -> bool {
            false
        }
        fn confirm(&mut self, _: &EdgeKey) -> Result<(), StoreError> {
            refuse()
        }
        fn confirmed(&self) -> Vec<EdgeKey> {
            Vec::new()
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            refuse()
        }
    }

    #[test]
    fn test_first_clue_lands_at_view_center() {
        let mut board = open_board();
        let added = board.add_node(ClueRecord::new("x", "X")).unwrap();

        let NodeAdded::Added { index, position, queued } = added else {
            panic!("expected a new node, got {added:?}");
        };
        assert_eq!(index, 0);
        assert!(!queued);

        let center = board.camera().unwrap().view_center();
        assert!(position.distance(center) <= board.config().placement.min_spacing);
        assert_eq!(board.nodes().count(), 1);
        assert_eq!(board.edges().count(), 0);
        assert_eq!(board.node(&id("x")).unwrap().reveal, 1.0);
        assert_eq!(board.selected(), Some(&id("x")));
    }

    #[test]
    fn test_related_clue_gets_one_suggested_edge_then_promotion() {
        let mut board = open_board();
        board.add_node(ClueRecord::new("x", "X")).unwrap();
        board.add_node(ClueRecord::new("y", "Y").with_related("x")).unwrap();

        assert_eq!(board.nodes().count(), 2);
        assert_eq!(board.edges().count(), 1);
        let before = board.edge(&id("x"), &id("y")).unwrap().clone();
        assert_eq!(before.state, EdgeState::Suggested);
        assert_eq!(before.progress, 1.0);

        let x = board.node(&id("x")).unwrap().position;
        let y = board.node(&id("y")).unwrap().position;
        let placement = &board.config().placement;
        assert!(x.distance(y) >= placement.min_spacing - 1e-3);
        assert!(x.distance(y) <= placement.related_max_distance + 1e-3);

        assert_eq!(board.confirm_link(&id("y"), &id("x")).unwrap(), EdgeChange::Promoted);
        assert_eq!(board.confirm_link(&id("x"), &id("y")).unwrap(), EdgeChange::Unchanged);

        assert_eq!(board.edges().count(), 1);
        let after = board.edge(&id("x"), &id("y")).unwrap();
        assert_eq!(after.key, before.key);
        assert_eq!(after.state, EdgeState::Confirmed);
        assert_ne!(after.instance, before.instance);
        assert!(board.is_confirmed(&id("x"), &id("y")));
    }

    #[test]
    fn test_opening_reveals_in_discovery_order() {
        let mut board = Board::builder().placement_seed(1).build();
        discover_chain_hidden(&mut board);

        assert!(board.nodes().all(|n| n.reveal == 0.0));
        assert!(board.edges().all(|e| e.progress == 0.0));
        assert_eq!(board.pending().nodes, vec![id("a"), id("b"), id("c")]);
        assert_eq!(board.pending().edges.len(), 2);

        board.open();
        assert!(board.is_reveal_scheduled());
        play_out(&mut board);

        let events = board.take_reveal_events();
        let ab = EdgeKey::between(&id("a"), &id("b"));
        let bc = EdgeKey::between(&id("b"), &id("c"));
        let a_done = position_of(&events, &RevealEvent::NodePopped(id("a")));
        let b_start = position_of(&events, &RevealEvent::NodePopStarted(id("b")));
        let b_done = position_of(&events, &RevealEvent::NodePopped(id("b")));
        let ab_start = position_of(&events, &RevealEvent::EdgeGrowStarted(ab));
        let c_start = position_of(&events, &RevealEvent::NodePopStarted(id("c")));
        let c_done = position_of(&events, &RevealEvent::NodePopped(id("c")));
        let bc_start = position_of(&events, &RevealEvent::EdgeGrowStarted(bc));

        assert!(a_done < b_start);
        assert!(b_done < ab_start);
        assert!(ab_start < c_start);
        assert!(c_done < bc_start);

        assert!(board.nodes().all(|n| n.is_revealed()));
        assert!(board.edges().all(|e| e.is_revealed()));
        assert!(board.pending().is_empty());
        assert_eq!(board.selected(), Some(&id("c")));
    }

    #[test]
    fn test_blank_clue_is_rejected() {
        let mut board = open_board();
        let result = board.add_node(ClueRecord::new("  ", "Nobody"));
        assert!(matches!(result, Err(BoardError::InvalidClue { .. })));
        assert_eq!(board.nodes().count(), 0);
        assert!(board.state().discovery.is_empty());

        board.add_node(ClueRecord::new("a", "A")).unwrap();
        assert!(matches!(
            board.confirm_link(&id("a"), &id("a")),
            Err(BoardError::SelfLink(_))
        ));
        assert!(board.state().confirmed.is_empty());
    }

    #[test]
    fn test_readding_repairs_edges() {
        let mut board = open_board();
        board.add_node(ClueRecord::new("y", "Y").with_related("x")).unwrap();
        assert_eq!(board.edges().count(), 0);
        board.add_node(ClueRecord::new("x", "X")).unwrap();
        assert_eq!(board.edges().count(), 1);

        let key = EdgeKey::between(&id("x"), &id("y"));
        board.graph.remove_edge(&key);
        let position = board.node(&id("x")).unwrap().position;

        let again = board.add_node(ClueRecord::new("x", "X")).unwrap();
        assert_eq!(again, NodeAdded::AlreadyPresent);
        assert!(board.edge(&id("x"), &id("y")).is_some());
        assert_eq!(board.nodes().count(), 2);
        assert_eq!(board.state().discovery.len(), 2);
        assert_eq!(board.node(&id("x")).unwrap().position, position);
    }

    #[test]
    fn test_discoveries_write_through() {
        let mut board = Board::builder()
            .store(MemoryStore::new())
            .placement_seed(2)
            .build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.add_node(ClueRecord::new("b", "B")).unwrap();
        board.confirm_link(&id("a"), &id("b")).unwrap();

        let store = board.store().unwrap();
        assert_eq!(store.discovery_order(), vec![id("a"), id("b")]);
        assert_eq!(store.position(&id("b")), Some(board.node(&id("b")).unwrap().position));
        assert!(store.is_confirmed(&EdgeKey::between(&id("b"), &id("a"))));
        // A confirmed pair gets an edge even without an authored relation.
        assert!(board.edge(&id("a"), &id("b")).unwrap().is_confirmed());
    }

    #[test]
    fn test_failing_store_is_not_fatal() {
        let mut board = Board::builder().store(FailingStore).build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.add_node(ClueRecord::new("b", "B").with_related("a")).unwrap();
        assert_eq!(board.confirm_link(&id("a"), &id("b")).unwrap(), EdgeChange::Promoted);
        board.update(&BoardInput::look(Vec2::RIGHT), FRAME);
        board.clear();
        assert_eq!(board.nodes().count(), 0);
    }

    #[test]
    fn test_saved_position_is_reused() {
        let store = store_with(&[("a", Vec2::new(420.0, -90.0))]);
        let mut board = Board::builder().store(store).build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        assert_eq!(board.node(&id("a")).unwrap().position, Vec2::new(420.0, -90.0));
    }

    #[test]
    fn test_restore_from_store() {
        let mut snapshot = BoardSnapshot::new();
        for (name, x) in [("a", 0.0), ("ghost", 100.0), ("b", 300.0)] {
            snapshot.state.discovery.record(&id(name));
            snapshot.positions.insert(id(name), Vec2::new(x, 0.0));
        }
        snapshot.state.confirm(EdgeKey::between(&id("a"), &id("b")));
        snapshot.state.pan = Vec2::new(-40.0, 10.0);
        snapshot.state.zoom = 1.25;

        let mut catalog = ClueCatalog::new();
        catalog.insert(ClueRecord::new("a", "A")).unwrap();
        catalog.insert(ClueRecord::new("b", "B").with_related("a")).unwrap();

        let mut board = Board::builder()
            .store(MemoryStore::from_snapshot(snapshot))
            .build();
        assert_eq!(board.restore(&catalog), 2);

        assert!(board.node(&id("ghost")).is_none());
        assert_eq!(board.node(&id("b")).unwrap().position, Vec2::new(300.0, 0.0));
        assert!(board.nodes().all(|n| n.is_revealed()));
        let edge = board.edge(&id("a"), &id("b")).unwrap();
        assert!(edge.is_confirmed());
        assert!(edge.is_revealed());
        assert!(board.pending().is_empty());

        let camera = board.camera().unwrap();
        assert_eq!(camera.pan(), Vec2::new(-40.0, 10.0));
        assert_eq!(camera.zoom(), 1.25);
        assert_eq!(board.selected(), Some(&id("b")));

        board.open();
        assert!(!board.is_reveal_scheduled());
    }

    #[test]
    fn test_restore_with_closure_resolver() {
        let mut board = Board::builder().placement_seed(4).build();
        let resolver = |id: &ClueId| (id.as_str() != "gone").then(|| ClueRecord::new(id.clone(), "Known"));
        let restored = board.restore_from_save(&[id("p"), id("gone"), id("q")], &resolver);
        assert_eq!(restored, 2);
        assert_eq!(board.discovery_index(&id("q")), Some(1));
    }

    #[test]
    fn test_cutscene_suppresses_navigation() {
        let store = store_with(&[("a", Vec2::ZERO), ("b", Vec2::new(300.0, 0.0))]);
        let mut board = Board::builder().store(store).build();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.add_node(ClueRecord::new("b", "B")).unwrap();
        board.open();

        for _ in 0..600 {
            board.update(&BoardInput::none(), FRAME);
            if board.sequencer.phase() == RevealPhase::Advance {
                break;
            }
        }
        assert_eq!(board.sequencer.phase(), RevealPhase::Advance);
        assert_eq!(board.selected(), Some(&id("a")));

        for _ in 0..30 {
            board.update(&BoardInput::navigate(Vec2::RIGHT), FRAME);
        }
        assert!(!board.move_selection(Vec2::RIGHT));
        assert_eq!(board.selected(), Some(&id("a")));
        assert_eq!(board.sequencer.phase(), RevealPhase::Advance);
    }

    #[test]
    fn test_navigation_moves_between_nodes() {
        let store = store_with(&[
            ("a", Vec2::ZERO),
            ("b", Vec2::new(300.0, 0.0)),
            ("c", Vec2::new(0.0, 300.0)),
        ]);
        let mut board = Board::builder().store(store).build();
        board.open();
        for name in ["a", "b", "c"] {
            board.add_node(ClueRecord::new(name, name.to_uppercase())).unwrap();
        }
        assert_eq!(board.selected(), Some(&id("a")));

        board.update(&BoardInput::navigate(Vec2::RIGHT), FRAME);
        assert_eq!(board.selected(), Some(&id("b")));
        assert!(board.node(&id("b")).unwrap().selected);
        assert!(!board.node(&id("a")).unwrap().selected);

        // Held sideways with nothing further right: no move.
        board.update(&BoardInput::navigate(Vec2::RIGHT), 0.5);
        assert_eq!(board.selected(), Some(&id("b")));

        board.update(&BoardInput::navigate(Vec2::LEFT), FRAME);
        assert_eq!(board.selected(), Some(&id("a")));
        board.update(&BoardInput::none(), FRAME);
        board.update(&BoardInput::navigate(Vec2::DOWN), FRAME);
        assert_eq!(board.selected(), Some(&id("c")));

        board.update(&BoardInput::submit(), FRAME);
        assert_eq!(board.camera().unwrap().target_pan(), Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_close_cancels_and_replays() {
        let presenter = RecordingPresenter::new();
        let mut board = Board::builder()
            .presenter(presenter.clone())
            .placement_seed(9)
            .build();
        discover_chain_hidden(&mut board);
        board.open();

        for _ in 0..600 {
            board.update(&BoardInput::none(), FRAME);
            if board.sequencer.phase() == RevealPhase::Advance {
                break;
            }
        }
        board.close();

        assert!(!board.is_cutscene_active());
        assert!(board.node(&id("a")).unwrap().is_revealed());
        assert_eq!(board.pending().nodes, vec![id("b"), id("c")]);
        assert_eq!(board.pending().edges.len(), 2);
        assert!(board.node(&id("b")).unwrap().reveal == 0.0);
        assert!(presenter.log().hidden >= 1);

        // Nothing plays while hidden.
        board.update(&BoardInput::advance(true), FRAME);
        assert!(!board.is_cutscene_active());

        board.open();
        play_out(&mut board);
        assert!(board.nodes().all(|n| n.is_revealed()));
        assert!(board.edges().all(|e| e.is_revealed()));
        assert_eq!(presenter.shown_ids().last(), Some(&id("c")));
    }

    #[test]
    fn test_discovery_during_run_gets_its_own_run() {
        let mut board = Board::builder().placement_seed(5).build();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.open();
        board.update(&BoardInput::none(), FRAME);
        assert!(board.is_cutscene_active());

        let added = board.add_node(ClueRecord::new("d", "D").with_related("a")).unwrap();
        assert!(matches!(added, NodeAdded::Added { queued: true, .. }));
        assert_eq!(board.node(&id("d")).unwrap().reveal, 0.0);
        assert!(matches!(board.request_reveal(), Err(BoardError::RevealInProgress)));

        play_out(&mut board);
        assert!(board.node(&id("d")).unwrap().is_revealed());
        assert!(board.edge(&id("a"), &id("d")).unwrap().is_revealed());
        let runs = board
            .take_reveal_events()
            .into_iter()
            .filter(|e| *e == RevealEvent::RunFinished)
            .count();
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_request_reveal_single_flight() {
        let mut board = Board::builder().build();
        assert!(matches!(board.request_reveal(), Err(BoardError::NothingToReveal)));
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        assert!(board.request_reveal().is_ok());
        assert!(matches!(board.request_reveal(), Err(BoardError::RevealInProgress)));

        // Hidden boards keep the request until opened.
        board.update(&BoardInput::none(), FRAME);
        assert!(!board.is_cutscene_active());
        board.open();
        board.update(&BoardInput::none(), FRAME);
        assert!(board.is_cutscene_active());
    }

    #[test]
    fn test_look_and_zoom_input() {
        let mut board = Board::builder().store(MemoryStore::new()).build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();

        board.update(&BoardInput::look(Vec2::RIGHT), FRAME);
        let pan = board.camera().unwrap().pan();
        assert!((pan.x + 900.0 * FRAME).abs() < 1e-3);
        assert_eq!(board.store().unwrap().pan(), Some(pan));

        for _ in 0..60 {
            board.update(&BoardInput::zoom(1.0), FRAME);
        }
        let zoom = board.camera().unwrap().target_zoom();
        assert!((zoom - 2.0).abs() < 0.05, "zoom {zoom}");
        assert_eq!(board.store().unwrap().zoom(), Some(zoom));
    }

    #[test]
    fn test_without_camera_falls_back_to_direct_pan() {
        let store = store_with(&[("a", Vec2::new(200.0, 100.0))]);
        let mut board = Board::builder().without_camera().store(store).build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();

        board.update(&BoardInput::submit(), FRAME);
        assert_eq!(board.state().pan, Vec2::new(-200.0, -100.0));

        board.close();
        board.add_node(ClueRecord::new("b", "B")).unwrap();
        assert_eq!(board.node(&id("b")).unwrap().reveal, 0.0);
        board.open();
        play_out(&mut board);
        assert!(board.node(&id("b")).unwrap().is_revealed());
    }

    #[test]
    fn test_content_grows_with_far_nodes() {
        let store = store_with(&[("far", Vec2::new(3000.0, -50.0))]);
        let mut board = Board::builder().store(store).build();
        board.open();
        board.add_node(ClueRecord::new("far", "Far")).unwrap();

        let size = board.camera().unwrap().content_size();
        assert!(size.x >= 2.0 * (3000.0 + board.config().content_margin));
        assert_eq!(size.y, board.config().camera.content.y);
    }

    #[test]
    fn test_clear_empties_board_and_store() {
        let mut board = Board::builder().store(MemoryStore::new()).build();
        board.open();
        board.add_node(ClueRecord::new("a", "A")).unwrap();
        board.add_node(ClueRecord::new("b", "B").with_related("a")).unwrap();
        board.clear();

        assert_eq!(board.nodes().count(), 0);
        assert_eq!(board.edges().count(), 0);
        assert_eq!(board.selected(), None);
        assert!(board.store().unwrap().discovery_order().is_empty());

        let added = board.add_node(ClueRecord::new("b", "B")).unwrap();
        assert!(matches!(added, NodeAdded::Added { index: 0, .. }));
    }

    #[test]
    fn test_events_route_to_operations() {
        let mut board = Board::builder().placement_seed(6).build();
        board
            .handle_event(BoardEvent::ClueDiscovered(ClueRecord::new("a", "A")))
            .unwrap();
        board
            .handle_event(BoardEvent::ClueDiscovered(ClueRecord::new("b", "B").with_related("a")))
            .unwrap();
        board
            .handle_event(BoardEvent::LinkConfirmed { a: id("b"), b: id("a") })
            .unwrap();
        assert_eq!(board.pending().edges, vec![EdgeKey::between(&id("a"), &id("b"))]);

        board.handle_event(BoardEvent::BoardOpened).unwrap();
        assert!(matches!(
            board.handle_event(BoardEvent::RevealRequested),
            Err(BoardError::RevealInProgress)
        ));
        play_out(&mut board);
        assert!(board.edge(&id("a"), &id("b")).unwrap().is_confirmed());

        board.handle_event(BoardEvent::BoardClosed).unwrap();
        assert!(!board.is_visible());
    }

    #[test]
    fn test_discover_from_catalog() {
        let catalog = ClueCatalog::from_toml_str(
            r#"
            [[clue]]
            id = "letter"
            name = "Torn Letter"
            "#,
        )
        .unwrap();
        let mut board = open_board();
        board.discover(&id("letter"), &catalog).unwrap();
        assert_eq!(board.node(&id("letter")).unwrap().clue.name, "Torn Letter");
        assert!(matches!(
            board.discover(&id("missing"), &catalog),
            Err(BoardError::UnknownClue(_))
        ));
    }
}
