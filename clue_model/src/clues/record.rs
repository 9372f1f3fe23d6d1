//! Authored clue records.

use serde::{Deserialize, Serialize};

use super::{ClueCategory, ClueId};

/// A clue as authored by the narrative designers.
///
/// `related` may be one-directional: clue A may list B while B says nothing
/// about A. The board resolves that into a single undirected edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClueRecord {
    pub id: ClueId,

    #[serde(default)]
    pub category: ClueCategory,

    /// Title shown on the node and in the detail panel.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Asset reference for the node icon. Resolution is the host's job.
    #[serde(default)]
    pub icon: Option<String>,

    /// Ids of clues this one is related to.
    #[serde(default)]
    pub related: Vec<ClueId>,
}

impl ClueRecord {
    /// Create a new record with the given id and display name.
    pub fn new(id: impl Into<ClueId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: ClueCategory::default(),
            name: name.into(),
            description: String::new(),
            icon: None,
            related: Vec::new(),
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: ClueCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Declare a relation to another clue.
    pub fn with_related(mut self, other: impl Into<ClueId>) -> Self {
        let other = other.into();
        if !self.related.contains(&other) {
            self.related.push(other);
        }
        self
    }

    /// Whether this record declares a relation to `other`.
    pub fn relates_to(&self, other: &ClueId) -> bool {
        self.related.iter().any(|id| id == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = ClueRecord::new("letter", "Torn Letter")
            .with_category(ClueCategory::Object)
            .with_description("Half a letter, signed with an initial.")
            .with_icon("icons/letter.png")
            .with_related("butler")
            .with_related("butler");

        assert_eq!(record.id, ClueId::new("letter"));
        assert_eq!(record.category, ClueCategory::Object);
        assert_eq!(record.icon.as_deref(), Some("icons/letter.png"));
        assert_eq!(record.related.len(), 1);
        assert!(record.relates_to(&ClueId::new("butler")));
        assert!(!record.relates_to(&ClueId::new("gardener")));
    }
}
