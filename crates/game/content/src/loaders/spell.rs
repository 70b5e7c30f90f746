//! Spell catalog loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spellcast_core::{Spell, SpellSymbol};

use crate::loaders::{LoadResult, read_file};

/// Spell catalog structure for RON files.
///
/// ```ron
/// (
///     spells: [
///         (
///             name: "fireball",
///             rows: [[(kind: Projectile, element: Fire), (kind: Explosion)]],
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<SpellEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellEntry {
    pub name: String,
    pub rows: Vec<Vec<SpellSymbol>>,
}

/// Named, shareable spell definitions.
#[derive(Debug, Clone, Default)]
pub struct SpellBook {
    spells: BTreeMap<String, Arc<Spell>>,
}

impl SpellBook {
    pub fn get(&self, name: &str) -> Option<Arc<Spell>> {
        self.spells.get(name).cloned()
    }

    pub fn insert(&mut self, name: impl Into<String>, spell: Spell) {
        self.spells.insert(name.into(), Arc::new(spell));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.spells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

/// Loader for spell catalogs from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpellBook> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load spells {}: {}", path.display(), e))
    }

    /// Parse a spell catalog from RON text.
    ///
    /// Duplicate names and malformed grids are rejected.
    pub fn parse(content: &str) -> LoadResult<SpellBook> {
        let catalog: SpellCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut book = SpellBook::default();
        for entry in catalog.spells {
            if book.spells.contains_key(&entry.name) {
                anyhow::bail!("Duplicate spell '{}'", entry.name);
            }
            let spell = Spell::from_rows(entry.rows)
                .map_err(|e| anyhow::anyhow!("Invalid spell '{}': {}", entry.name, e))?;
            tracing::debug!(
                spell = %entry.name,
                cols = spell.cols(),
                rows = spell.rows(),
                "loaded spell"
            );
            book.insert(entry.name, spell);
        }

        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use spellcast_core::{ElementType, SymbolKind};

    use super::*;

    const CATALOG: &str = r#"
        (
            spells: [
                (
                    name: "fireball",
                    rows: [[(kind: Projectile, element: Fire), (kind: Explosion)]],
                ),
                (
                    name: "dash",
                    rows: [[(kind: Push, element: Lightning)]],
                ),
            ],
        )
    "#;

    #[test]
    fn parses_named_grids() {
        let book = SpellLoader::parse(CATALOG).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.names().collect::<Vec<_>>(), vec!["dash", "fireball"]);

        let fireball = book.get("fireball").unwrap();
        assert_eq!(fireball.cols(), 2);
        assert_eq!(fireball.symbol(0, 0).element, ElementType::Fire);
        assert_eq!(fireball.symbol(1, 0).kind, SymbolKind::Explosion);
        assert_eq!(fireball.symbol(1, 0).element, ElementType::None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let content = r#"(spells: [(name: "a", rows: [[(kind: Fire)]]), (name: "a", rows: [[(kind: Push)]])])"#;
        let err = SpellLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate spell 'a'"));
    }

    #[test]
    fn empty_grids_are_rejected() {
        assert!(SpellLoader::parse(r#"(spells: [(name: "none", rows: [])])"#).is_err());
    }
}
