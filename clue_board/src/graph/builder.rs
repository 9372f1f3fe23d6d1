//! Edge builder - derives canonical edges from authored relations.

use tracing::debug;

use clue_model::{ClueId, DiscoveryOrder, EdgeKey};

use super::{BoardGraph, EdgeInstance, EdgeState};

/// Outcome of [`EdgeBuilder::ensure_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    /// A new suggested or confirmed edge was created.
    Created,
    /// A suggested edge was replaced by a confirmed one.
    Promoted,
    /// Nothing to do: the edge is current, or an endpoint is missing.
    Unchanged,
}

impl EdgeChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, EdgeChange::Unchanged)
    }
}

/// Creates and promotes edges on a [`BoardGraph`].
///
/// Confirmation state is looked up through `confirmed` for every edge it
/// touches. New instances start fully drawn when `revealed` is set and at
/// zero length otherwise, waiting for the reveal sequence.
pub struct EdgeBuilder<'a> {
    graph: &'a mut BoardGraph,
    discovery: &'a DiscoveryOrder,
    confirmed: &'a dyn Fn(&EdgeKey) -> bool,
    revealed: bool,
}

impl<'a> EdgeBuilder<'a> {
    pub fn new(
        graph: &'a mut BoardGraph,
        discovery: &'a DiscoveryOrder,
        confirmed: &'a dyn Fn(&EdgeKey) -> bool,
        revealed: bool,
    ) -> Self {
        Self {
            graph,
            discovery,
            confirmed,
            revealed,
        }
    }

    /// Make sure the edge between two existing nodes exists in its current
    /// state.
    ///
    /// A suggested edge whose pair has since been confirmed is destroyed and
    /// recreated as confirmed. Confirmed edges are never demoted here.
    pub fn ensure_edge(&mut self, a: &ClueId, b: &ClueId) -> EdgeChange {
        if a == b || !self.graph.contains(a) || !self.graph.contains(b) {
            return EdgeChange::Unchanged;
        }

        let key = EdgeKey::between(a, b);
        let confirmed = (self.confirmed)(&key);
        let existing = self.graph.edge(&key).map(|e| e.state);

        let change = match existing {
            None => EdgeChange::Created,
            Some(EdgeState::Suggested) if confirmed => EdgeChange::Promoted,
            Some(_) => return EdgeChange::Unchanged,
        };

        if change == EdgeChange::Promoted {
            self.graph.remove_edge(&key);
        }

        let state = if confirmed {
            EdgeState::Confirmed
        } else {
            EdgeState::Suggested
        };
        let origin = self.discovery.earlier(a, b).clone();
        let progress = if self.revealed { 1.0 } else { 0.0 };

        debug!(edge = %key, ?state, ?change, "edge built");
        self.graph
            .insert_edge(EdgeInstance::new(key, state, origin, progress));
        change
    }

    /// Ensure every edge touching a clue, whichever side declared the
    /// relation. Returns the keys that were created or promoted.
    pub fn build_touching(&mut self, id: &ClueId) -> Vec<EdgeKey> {
        let Some(node) = self.graph.node(id) else {
            return Vec::new();
        };
        let declared = node.clue.related.clone();
        let related = self.graph.related_ids(id, &declared);

        related
            .into_iter()
            .filter(|other| self.ensure_edge(id, other).is_change())
            .map(|other| EdgeKey::between(id, &other))
            .collect()
    }

    /// Ensure edges for explicit pairs, such as links the player confirmed
    /// without an authored relation.
    pub fn ensure_pairs<'k>(&mut self, keys: impl IntoIterator<Item = &'k EdgeKey>) -> Vec<EdgeKey> {
        keys.into_iter()
            .filter(|key| self.ensure_edge(key.low(), key.high()).is_change())
            .cloned()
            .collect()
    }

    /// Drop all edges and derive them again from the nodes' relation lists
    /// and the confirmed pairs. Returns the number of edges built.
    pub fn rebuild_all<'k>(&mut self, confirmed: impl IntoIterator<Item = &'k EdgeKey>) -> usize {
        self.graph.clear_edges();
        for id in self.graph.ids_in_discovery_order(self.discovery) {
            self.build_touching(&id);
        }
        self.ensure_pairs(confirmed);
        self.graph.edge_count()
    }
}
