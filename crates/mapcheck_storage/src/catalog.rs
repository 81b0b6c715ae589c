//! Catalog tables.
//!
//! A [`Catalog`] keeps entries in first-definition order so that catalog
//! rules report in file order. Redefining a name replaces the entry in
//! place.

use std::collections::HashMap;

use mapcheck_foundation::AttributeRecord;

/// A name-keyed table of attribute records.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<(String, AttributeRecord)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry, returning the record it replaced.
    pub fn insert(&mut self, name: impl Into<String>, record: AttributeRecord) -> Option<AttributeRecord> {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[i].1, record));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, record));
        None
    }

    /// Gets an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeRecord> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Returns true if an entry with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over entries in first-definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates mutably over records in first-definition order.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut AttributeRecord> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

/// The archetype, artifact and region tables used during validation.
///
/// Built once before any map is parsed and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    archetypes: Catalog,
    artifacts: Catalog,
    regions: Catalog,
}

impl CatalogIndex {
    /// Creates an index from its three tables.
    #[must_use]
    pub fn new(archetypes: Catalog, artifacts: Catalog, regions: Catalog) -> Self {
        Self {
            archetypes,
            artifacts,
            regions,
        }
    }

    /// Looks up an archetype by name, falling back to artifacts.
    #[must_use]
    pub fn find_archetype(&self, name: &str) -> Option<&AttributeRecord> {
        self.archetypes
            .get(name)
            .or_else(|| self.artifacts.get(name))
    }

    /// Returns true if the name is defined in the artifacts table.
    #[must_use]
    pub fn is_artifact(&self, name: &str) -> bool {
        self.artifacts.contains(name)
    }

    /// Looks up a region by name.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&AttributeRecord> {
        self.regions.get(name)
    }

    /// The archetypes table.
    #[must_use]
    pub fn archetypes(&self) -> &Catalog {
        &self.archetypes
    }

    /// The artifacts table.
    #[must_use]
    pub fn artifacts(&self) -> &Catalog {
        &self.artifacts
    }

    /// The regions table.
    #[must_use]
    pub fn regions(&self) -> &Catalog {
        &self.regions
    }
}
