//! Board graph - node and edge registries with an adjacency index.

use std::collections::{HashMap, HashSet};

use clue_model::{ClueId, DiscoveryOrder, EdgeKey, Vec2};

use super::{EdgeInstance, NodeInstance};

/// Registries of every node and edge currently on the board.
#[derive(Debug, Clone, Default)]
pub struct BoardGraph {
    /// All nodes by clue id.
    nodes: HashMap<ClueId, NodeInstance>,

    /// All edges by canonical key.
    edges: HashMap<EdgeKey, EdgeInstance>,

    /// Index: clue id -> keys of edges touching it.
    adjacency: HashMap<ClueId, HashSet<EdgeKey>>,
}

impl BoardGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns false, leaving the graph unchanged, when a
    /// node with the same clue id already exists.
    pub fn add_node(&mut self, node: NodeInstance) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.nodes.insert(node.id().clone(), node);
        true
    }

    pub fn node(&self, id: &ClueId) -> Option<&NodeInstance> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &ClueId) -> Option<&mut NodeInstance> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &ClueId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeInstance> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn position(&self, id: &ClueId) -> Option<Vec2> {
        self.nodes.get(id).map(|n| n.position)
    }

    /// Positions of every node.
    pub fn positions(&self) -> Vec<Vec2> {
        self.nodes.values().map(|n| n.position).collect()
    }

    /// `(id, position)` pairs for every node, sorted by id.
    pub fn placed(&self) -> Vec<(ClueId, Vec2)> {
        let mut placed: Vec<_> = self
            .nodes
            .values()
            .map(|n| (n.id().clone(), n.position))
            .collect();
        placed.sort_by(|a, b| a.0.cmp(&b.0));
        placed
    }

    /// Node ids sorted by discovery index. Ids missing from `order` go last.
    pub fn ids_in_discovery_order(&self, order: &DiscoveryOrder) -> Vec<ClueId> {
        let mut ids: Vec<_> = self.nodes.keys().cloned().collect();
        ids.sort_by_key(|id| (order.index_of(id).unwrap_or(usize::MAX), id.clone()));
        ids
    }

    /// Clue ids of existing nodes related to `id` in either direction.
    pub fn related_ids(&self, id: &ClueId, declared: &[ClueId]) -> Vec<ClueId> {
        let mut related: Vec<ClueId> = declared
            .iter()
            .filter(|other| *other != id && self.nodes.contains_key(*other))
            .cloned()
            .collect();
        for node in self.nodes.values() {
            if node.id() != id && node.clue.relates_to(id) && !related.contains(node.id()) {
                related.push(node.id().clone());
            }
        }
        related.sort();
        related
    }

    /// Mark exactly one node selected, or none.
    pub fn set_selected(&mut self, id: Option<&ClueId>) {
        for node in self.nodes.values_mut() {
            node.selected = Some(node.id()) == id;
        }
    }

    /// Insert or replace an edge, returning the replaced instance.
    pub fn insert_edge(&mut self, edge: EdgeInstance) -> Option<EdgeInstance> {
        let key = edge.key.clone();
        self.adjacency
            .entry(key.low().clone())
            .or_default()
            .insert(key.clone());
        self.adjacency
            .entry(key.high().clone())
            .or_default()
            .insert(key.clone());
        self.edges.insert(key, edge)
    }

    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<EdgeInstance> {
        let edge = self.edges.remove(key)?;
        for endpoint in [key.low(), key.high()] {
            if let Some(keys) = self.adjacency.get_mut(endpoint) {
                keys.remove(key);
            }
        }
        Some(edge)
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&EdgeInstance> {
        self.edges.get(key)
    }

    pub fn edge_mut(&mut self, key: &EdgeKey) -> Option<&mut EdgeInstance> {
        self.edges.get_mut(key)
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeInstance> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Keys of all edges touching a clue, sorted.
    pub fn edges_touching(&self, id: &ClueId) -> Vec<EdgeKey> {
        let mut keys: Vec<_> = self
            .adjacency
            .get(id)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Drop every edge, keeping nodes.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
        self.adjacency.clear();
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.clear_edges();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeState;
    use clue_model::ClueRecord;

    fn id(s: &str) -> ClueId {
        ClueId::new(s)
    }

    fn node(s: &str, x: f32) -> NodeInstance {
        NodeInstance::new(ClueRecord::new(s, s), Vec2::new(x, 0.0))
    }

    #[test]
    fn test_add_node_is_unique() {
        let mut graph = BoardGraph::new();
        assert!(graph.add_node(node("a", 0.0)));
        assert!(!graph.add_node(node("a", 50.0)));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.position(&id("a")), Some(Vec2::ZERO));
    }

    #[test]
    fn test_edge_adjacency() {
        let mut graph = BoardGraph::new();
        graph.add_node(node("a", 0.0));
        graph.add_node(node("b", 100.0));
        graph.add_node(node("c", 200.0));

        let ab = EdgeKey::new(id("b"), id("a"));
        let bc = EdgeKey::new(id("b"), id("c"));
        graph.insert_edge(EdgeInstance::new(ab.clone(), EdgeState::Suggested, id("a"), 1.0));
        graph.insert_edge(EdgeInstance::new(bc.clone(), EdgeState::Suggested, id("b"), 1.0));

        assert_eq!(graph.edges_touching(&id("b")), vec![ab.clone(), bc.clone()]);
        assert_eq!(graph.edges_touching(&id("a")), vec![ab.clone()]);

        assert!(graph.remove_edge(&ab).is_some());
        assert_eq!(graph.edges_touching(&id("b")), vec![bc]);
        assert!(graph.edges_touching(&id("a")).is_empty());
    }

    #[test]
    fn test_related_ids_both_directions() {
        let mut graph = BoardGraph::new();
        graph.add_node(NodeInstance::new(
            ClueRecord::new("a", "A").with_related("new"),
            Vec2::ZERO,
        ));
        graph.add_node(node("b", 100.0));
        graph.add_node(node("c", 200.0));

        let related = graph.related_ids(&id("new"), &[id("b"), id("ghost"), id("new")]);
        assert_eq!(related, vec![id("a"), id("b")]);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut graph = BoardGraph::new();
        graph.add_node(node("a", 0.0));
        graph.add_node(node("b", 100.0));

        graph.set_selected(Some(&id("a")));
        graph.set_selected(Some(&id("b")));
        assert!(!graph.node(&id("a")).unwrap().selected);
        assert!(graph.node(&id("b")).unwrap().selected);

        graph.set_selected(None);
        assert!(graph.nodes().all(|n| !n.selected));
    }

    #[test]
    fn test_discovery_sorting() {
        let mut graph = BoardGraph::new();
        graph.add_node(node("a", 0.0));
        graph.add_node(node("b", 100.0));
        graph.add_node(node("c", 200.0));
        let order = DiscoveryOrder::from(vec![id("c"), id("a")]);
        assert_eq!(graph.ids_in_discovery_order(&order), vec![id("c"), id("a"), id("b")]);
    }
}
