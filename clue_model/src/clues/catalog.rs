//! Clue catalog - the authored set of clues the board can discover.

use serde::Deserialize;
use std::collections::HashMap;

use super::{ClueId, ClueRecord};
use crate::CatalogError;

/// Anything able to turn a clue id back into its authored record.
///
/// Used when restoring a saved board, where only ids are persisted.
pub trait ClueResolver {
    fn resolve(&self, id: &ClueId) -> Option<ClueRecord>;
}

impl<F> ClueResolver for F
where
    F: Fn(&ClueId) -> Option<ClueRecord>,
{
    fn resolve(&self, id: &ClueId) -> Option<ClueRecord> {
        self(id)
    }
}

/// All authored clues, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct ClueCatalog {
    records: HashMap<ClueId, ClueRecord>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    clue: Vec<ClueRecord>,
}

impl ClueCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML made of `[[clue]]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;
        let mut catalog = Self::new();
        for record in file.clue {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Add a record. Blank and duplicate ids are rejected.
    pub fn insert(&mut self, record: ClueRecord) -> Result<(), CatalogError> {
        if record.id.is_blank() {
            return Err(CatalogError::EmptyId { name: record.name });
        }
        if self.records.contains_key(&record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &ClueId) -> Option<&ClueRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &ClueId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClueRecord> {
        self.records.values()
    }
}

impl ClueResolver for ClueCatalog {
    fn resolve(&self, id: &ClueId) -> Option<ClueRecord> {
        self.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClueCategory;

    const CATALOG: &str = r#"
        [[clue]]
        id = "butler"
        category = "Person"
        name = "The Butler"
        description = "Has served the family for thirty years."
        related = ["letter"]

        [[clue]]
        id = "letter"
        category = "Object"
        name = "Torn Letter"
        icon = "icons/letter.png"
    "#;

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ClueCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let butler = catalog.get(&ClueId::new("butler")).unwrap();
        assert_eq!(butler.category, ClueCategory::Person);
        assert!(butler.relates_to(&ClueId::new("letter")));

        let letter = catalog.get(&ClueId::new("letter")).unwrap();
        assert!(letter.related.is_empty());
        assert!(letter.description.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut catalog = ClueCatalog::new();
        catalog.insert(ClueRecord::new("knife", "Knife")).unwrap();
        let err = catalog.insert(ClueRecord::new("knife", "Other Knife"));
        assert!(matches!(err, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_blank_id_rejected() {
        let mut catalog = ClueCatalog::new();
        let err = catalog.insert(ClueRecord::new(" ", "Nothing"));
        assert!(matches!(err, Err(CatalogError::EmptyId { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ClueCatalog::from_toml_str("[[clue]]\nid = ");
        assert!(matches!(err, Err(CatalogError::Toml(_))));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |id: &ClueId| {
            (id.as_str() == "knife").then(|| ClueRecord::new(id.clone(), "Knife"))
        };
        assert!(resolver.resolve(&ClueId::new("knife")).is_some());
        assert!(resolver.resolve(&ClueId::new("rope")).is_none());
    }
}
