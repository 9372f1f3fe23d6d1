//! Collaborators the board talks to: persistence and the detail panel.
//!
//! Both are injected into the [`crate::Board`] at construction time and both
//! are optional.

use clue_model::{BoardSnapshot, CatalogError, ClueId, ClueRecord, EdgeKey, Vec2};

use crate::StoreError;

/// Persistence adapter for board layout and progress.
///
/// The board writes through after every mutation. Durability and atomicity
/// of the underlying storage are the implementor's concern.
pub trait BoardStore {
    fn position(&self, id: &ClueId) -> Option<Vec2>;
    fn save_position(&mut self, id: &ClueId, position: Vec2) -> Result<(), StoreError>;

    fn pan(&self) -> Option<Vec2>;
    fn save_pan(&mut self, pan: Vec2) -> Result<(), StoreError>;

    fn zoom(&self) -> Option<f32>;
    fn save_zoom(&mut self, zoom: f32) -> Result<(), StoreError>;

    /// The persisted discovery order, oldest first.
    fn discovery_order(&self) -> Vec<ClueId>;
    /// Append an id to the discovery order. Already present ids are ignored.
    fn append_discovered(&mut self, id: &ClueId) -> Result<(), StoreError>;

    fn is_confirmed(&self, key: &EdgeKey) -> bool;
    fn confirm(&mut self, key: &EdgeKey) -> Result<(), StoreError>;
    fn confirmed(&self) -> Vec<EdgeKey>;

    /// Forget everything.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory store backed by a [`BoardSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: BoardSnapshot,
    has_camera: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved snapshot.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            snapshot,
            has_camera: true,
        }
    }

    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_snapshot(BoardSnapshot::from_json(source)?))
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        self.snapshot.to_json()
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }
}

impl BoardStore for MemoryStore {
    fn position(&self, id: &ClueId) -> Option<Vec2> {
        self.snapshot.positions.get(id).copied()
    }

    fn save_position(&mut self, id: &ClueId, position: Vec2) -> Result<(), StoreError> {
        self.snapshot.positions.insert(id.clone(), position);
        Ok(())
    }

    fn pan(&self) -> Option<Vec2> {
        self.has_camera.then_some(self.snapshot.state.pan)
    }

    fn save_pan(&mut self, pan: Vec2) -> Result<(), StoreError> {
        self.snapshot.state.pan = pan;
        self.has_camera = true;
        Ok(())
    }

    fn zoom(&self) -> Option<f32> {
        self.has_camera.then_some(self.snapshot.state.zoom)
    }

    fn save_zoom(&mut self, zoom: f32) -> Result<(), StoreError> {
        self.snapshot.state.zoom = zoom;
        self.has_camera = true;
        Ok(())
    }

    fn discovery_order(&self) -> Vec<ClueId> {
        self.snapshot.state.discovery.ids().to_vec()
    }

    fn append_discovered(&mut self, id: &ClueId) -> Result<(), StoreError> {
        self.snapshot.state.discovery.record(id);
        Ok(())
    }

    fn is_confirmed(&self, key: &EdgeKey) -> bool {
        self.snapshot.state.is_confirmed(key)
    }

    fn confirm(&mut self, key: &EdgeKey) -> Result<(), StoreError> {
        self.snapshot.state.confirm(key.clone());
        Ok(())
    }

    fn confirmed(&self) -> Vec<EdgeKey> {
        self.snapshot.state.confirmed.iter().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.snapshot = BoardSnapshot::default();
        self.has_camera = false;
        Ok(())
    }
}

/// The detail panel that presents a clue's text with a typewriter effect.
pub trait InfoPresenter {
    /// Show a clue. `immediate` skips the typing animation.
    fn show(&mut self, clue: &ClueRecord, immediate: bool);
    fn hide(&mut self, immediate: bool);
    /// Whether text is still being typed out.
    fn is_typing(&self) -> bool;
    /// Finish typing at once.
    fn complete_typing(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_write_through() {
        let mut store = MemoryStore::new();
        let x = ClueId::new("x");
        let y = ClueId::new("y");

        assert!(store.pan().is_none());
        store.save_position(&x, Vec2::new(1.0, 2.0)).unwrap();
        store.append_discovered(&x).unwrap();
        store.append_discovered(&y).unwrap();
        store.append_discovered(&x).unwrap();
        store.confirm(&EdgeKey::between(&y, &x)).unwrap();
        store.save_zoom(1.5).unwrap();

        assert_eq!(store.position(&x), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(store.discovery_order(), vec![x.clone(), y.clone()]);
        assert!(store.is_confirmed(&EdgeKey::between(&x, &y)));
        assert_eq!(store.zoom(), Some(1.5));
        assert_eq!(store.confirmed().len(), 1);
    }

    #[test]
    fn test_memory_store_json() {
        let mut store = MemoryStore::new();
        let x = ClueId::new("x");
        store.append_discovered(&x).unwrap();
        store.save_position(&x, Vec2::new(-4.0, 8.0)).unwrap();

        let restored = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored.discovery_order(), vec![x.clone()]);
        assert_eq!(restored.position(&x), Some(Vec2::new(-4.0, 8.0)));
    }

    #[test]
    fn test_memory_store_clear() {
        let mut store = MemoryStore::new();
        store.append_discovered(&ClueId::new("x")).unwrap();
        store.save_pan(Vec2::new(3.0, 3.0)).unwrap();
        store.clear().unwrap();
        assert!(store.discovery_order().is_empty());
        assert!(store.pan().is_none());
    }
}
