//! Board state - the persisted part of the relationship board.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{CatalogError, ClueId, Vec2};

/// Canonical key of an undirected edge between two clues.
///
/// The endpoints are stored sorted, so `EdgeKey::new(a, b)` and
/// `EdgeKey::new(b, a)` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawEdgeKey")]
pub struct EdgeKey {
    low: ClueId,
    high: ClueId,
}

#[derive(Deserialize)]
struct RawEdgeKey {
    low: ClueId,
    high: ClueId,
}

impl From<RawEdgeKey> for EdgeKey {
    fn from(raw: RawEdgeKey) -> Self {
        EdgeKey::new(raw.low, raw.high)
    }
}

impl EdgeKey {
    pub fn new(a: ClueId, b: ClueId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn between(a: &ClueId, b: &ClueId) -> Self {
        Self::new(a.clone(), b.clone())
    }

    /// The endpoint that sorts first.
    pub fn low(&self) -> &ClueId {
        &self.low
    }

    /// The endpoint that sorts last.
    pub fn high(&self) -> &ClueId {
        &self.high
    }

    pub fn contains(&self, id: &ClueId) -> bool {
        &self.low == id || &self.high == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: &ClueId) -> Option<&ClueId> {
        if &self.low == id {
            Some(&self.high)
        } else if &self.high == id {
            Some(&self.low)
        } else {
            None
        }
    }

    /// Whether both endpoints are the same clue.
    pub fn is_loop(&self) -> bool {
        self.low == self.high
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}~{}", self.low, self.high)
    }
}

/// Append-only record of the order in which clues were first discovered.
///
/// Once assigned, an id's index never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ClueId>", into = "Vec<ClueId>")]
pub struct DiscoveryOrder {
    order: Vec<ClueId>,
    index: HashMap<ClueId, usize>,
}

impl DiscoveryOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovery. Returns the id's index and whether it was new.
    pub fn record(&mut self, id: &ClueId) -> (usize, bool) {
        if let Some(index) = self.index.get(id) {
            return (*index, false);
        }
        let index = self.order.len();
        self.order.push(id.clone());
        self.index.insert(id.clone(), index);
        (index, true)
    }

    pub fn index_of(&self, id: &ClueId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &ClueId) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> &[ClueId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Of two ids, the one discovered first. Undiscovered ids sort last,
    /// ties fall back to id order.
    pub fn earlier<'a>(&self, a: &'a ClueId, b: &'a ClueId) -> &'a ClueId {
        let rank = |id: &ClueId| self.index_of(id).unwrap_or(usize::MAX);
        match rank(a).cmp(&rank(b)) {
            std::cmp::Ordering::Less => a,
            std::cmp::Ordering::Greater => b,
            std::cmp::Ordering::Equal => a.min(b),
        }
    }
}

impl From<Vec<ClueId>> for DiscoveryOrder {
    fn from(ids: Vec<ClueId>) -> Self {
        let mut order = DiscoveryOrder::new();
        for id in &ids {
            order.record(id);
        }
        order
    }
}

impl From<DiscoveryOrder> for Vec<ClueId> {
    fn from(order: DiscoveryOrder) -> Self {
        order.order
    }
}

/// Global board state: camera placement, discovery order and confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub pan: Vec2,
    pub zoom: f32,
    pub discovery: DiscoveryOrder,
    pub confirmed: BTreeSet<EdgeKey>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            discovery: DiscoveryOrder::new(),
            confirmed: BTreeSet::new(),
        }
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_confirmed(&self, key: &EdgeKey) -> bool {
        self.confirmed.contains(key)
    }

    /// Mark a link confirmed. Returns false if it already was.
    pub fn confirm(&mut self, key: EdgeKey) -> bool {
        self.confirmed.insert(key)
    }
}

/// Everything a store persists: the board state plus each node's position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub state: BoardState,
    pub positions: BTreeMap<ClueId, Vec2>,
}

impl BoardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(source)?)
    }
}
