//! Clue definitions: identifiers, categories and authored records.

mod catalog;
mod record;

pub use catalog::*;
pub use record::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable authored identifier of a clue.
///
/// Ids are totally ordered so that an unordered pair of clues has a single
/// canonical form (see [`crate::EdgeKey`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClueId(pub String);

impl ClueId {
    /// Create a clue id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is blank (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ClueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClueId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ClueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one visual instance of a node or edge.
///
/// A clue keeps its [`ClueId`] forever, but the instance drawn for it is
/// replaced when it is rebuilt, so the two identities are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Create a new random instance ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Narrative categories a clue can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClueCategory {
    #[default]
    Person,
    Object,
    Location,
    Event,
}

impl ClueCategory {
    /// Lowercase label, used for icon lookup and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ClueCategory::Person => "person",
            ClueCategory::Object => "object",
            ClueCategory::Location => "location",
            ClueCategory::Event => "event",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_id_ordering() {
        let a = ClueId::new("alpha");
        let b = ClueId::new("beta");
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_blank_ids() {
        assert!(ClueId::new("").is_blank());
        assert!(ClueId::new("   ").is_blank());
        assert!(!ClueId::new("letter").is_blank());
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(InstanceId::new(), InstanceId::new());
    }

    #[test]
    fn test_category_label() {
        assert_eq!(ClueCategory::Person.label(), "person");
        assert_eq!(ClueCategory::Event.label(), "event");
    }
}
