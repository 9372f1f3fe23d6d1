//! Edge instances - visual relations between two nodes.

use serde::{Deserialize, Serialize};

use clue_model::{ClueId, EdgeKey, InstanceId, Vec2};

/// Styling state of an edge. Only ever moves from suggested to confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeState {
    /// Derived from authored relations, not yet confirmed by the player.
    Suggested,
    /// Confirmed by the player.
    Confirmed,
}

/// A relation drawn between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInstance {
    pub instance: InstanceId,
    pub key: EdgeKey,
    pub state: EdgeState,

    /// Drawn length from 0.0 (nothing) to 1.0 (full).
    pub progress: f32,

    /// Endpoint the line grows out of; the earlier-discovered clue.
    pub grows_from: ClueId,
}

impl EdgeInstance {
    /// Create an edge growing out of `grows_from`, which should be one of
    /// the key's endpoints. Anything else falls back to the low endpoint.
    pub fn new(key: EdgeKey, state: EdgeState, grows_from: ClueId, progress: f32) -> Self {
        let grows_from = if key.contains(&grows_from) {
            grows_from
        } else {
            key.low().clone()
        };
        Self {
            instance: InstanceId::new(),
            key,
            state,
            progress: progress.clamp(0.0, 1.0),
            grows_from,
        }
    }

    /// Endpoint the line grows toward.
    pub fn grows_to(&self) -> &ClueId {
        self.key.other(&self.grows_from).unwrap_or(self.key.high())
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == EdgeState::Confirmed
    }

    pub fn is_revealed(&self) -> bool {
        self.progress >= 1.0
    }

    /// Position of the growing tip, given the endpoint positions.
    pub fn tip(&self, from: Vec2, to: Vec2) -> Vec2 {
        from.lerp(to, self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> EdgeKey {
        EdgeKey::new(ClueId::new("a"), ClueId::new("b"))
    }

    #[test]
    fn test_grow_direction() {
        let edge = EdgeInstance::new(key(), EdgeState::Suggested, ClueId::new("b"), 0.0);
        assert_eq!(edge.grows_from, ClueId::new("b"));
        assert_eq!(edge.grows_to(), &ClueId::new("a"));
    }

    #[test]
    fn test_foreign_origin_falls_back() {
        let edge = EdgeInstance::new(key(), EdgeState::Confirmed, ClueId::new("z"), 1.0);
        assert_eq!(edge.grows_from, ClueId::new("a"));
        assert!(edge.is_confirmed());
        assert!(edge.is_revealed());
    }

    #[test]
    fn test_tip() {
        let mut edge = EdgeInstance::new(key(), EdgeState::Suggested, ClueId::new("a"), 0.25);
        let tip = edge.tip(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!((tip.x - 25.0).abs() < 1e-4);
        edge.progress = 1.0;
        assert_eq!(edge.tip(Vec2::ZERO, Vec2::new(100.0, 0.0)), Vec2::new(100.0, 0.0));
    }
}
