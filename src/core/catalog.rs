// src/core/catalog.rs

use crate::constants::DEFAULT_COLLECTION;
use crate::models::SchematicSchema;
use crate::system::source::{SchemaSource, SourceError, builtin_default_manifest};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Collection '{0}' has not been loaded yet.")]
    NotLoaded(String),
    #[error("Collection '{collection}' has no schematic named '{schema}'.")]
    UnknownSchema { collection: String, schema: String },
    #[error("Collection '{0}' contains no schematics.")]
    EmptySchemaSet(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// One collection's lazily populated schema set.
#[derive(Debug, Default)]
pub struct CollectionEntry {
    pub collection_name: String,
    schemas: Vec<SchematicSchema>,
    pub loaded: bool,
}

impl CollectionEntry {
    fn new(collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            ..Default::default()
        }
    }
}

/// Resolves collection identifiers to their schema sets, loading schema
/// definitions on demand through the [`SchemaSource`] seam.
pub struct CollectionCatalog {
    source: Box<dyn SchemaSource>,
    entries: HashMap<String, CollectionEntry>,
}

impl CollectionCatalog {
    pub fn new(source: Box<dyn SchemaSource>) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    /// Collections available to the project, in menu order.
    pub fn list_collections(&self) -> Vec<String> {
        self.source.list_collections()
    }

    /// Returns the entry for `collection`, creating an unloaded one if it
    /// has not been seen before.
    pub fn resolve(&mut self, collection: &str) -> &CollectionEntry {
        self.entries
            .entry(collection.to_string())
            .or_insert_with(|| CollectionEntry::new(collection))
    }

    /// Performs the (potentially slow) schema lookup for `collection`.
    /// On failure the entry stays unusable (`loaded == false`) and the whole
    /// flow must abort; a partially loaded schema set is never exposed.
    pub fn load(&mut self, collection: &str) -> Result<(), CatalogError> {
        let schemas = self.source.load_collection(collection)?;
        let entry = self
            .entries
            .entry(collection.to_string())
            .or_insert_with(|| CollectionEntry::new(collection));
        entry.schemas = schemas;
        entry.loaded = true;
        log::debug!(
            "Loaded collection '{}' with {} schematics.",
            collection,
            entry.schemas.len()
        );
        Ok(())
    }

    /// Schematic names of a loaded collection. An empty set is an error:
    /// there is nothing the flow could do with it.
    pub fn schema_names(&self, collection: &str) -> Result<Vec<String>, CatalogError> {
        let entry = self.loaded_entry(collection)?;
        if entry.schemas.is_empty() {
            return Err(CatalogError::EmptySchemaSet(collection.to_string()));
        }
        Ok(entry.schemas.iter().map(|s| s.name.clone()).collect())
    }

    /// Returns the schema for `schema_name`.
    ///
    /// Requires the collection to be loaded, with one documented exception:
    /// the default collection may be consulted without an explicit load, in
    /// which case the built-in manifest answers. The quick-generate flow
    /// relies on that fast-path.
    pub fn create_schema(
        &self,
        collection: &str,
        schema_name: &str,
    ) -> Result<SchematicSchema, CatalogError> {
        let unknown = || CatalogError::UnknownSchema {
            collection: collection.to_string(),
            schema: schema_name.to_string(),
        };

        match self.loaded_entry(collection) {
            Ok(entry) => entry
                .schemas
                .iter()
                .find(|s| s.name == schema_name)
                .cloned()
                .ok_or_else(unknown),
            Err(CatalogError::NotLoaded(_)) if collection == DEFAULT_COLLECTION => {
                builtin_default_manifest()
                    .into_iter()
                    .find(|s| s.name == schema_name)
                    .ok_or_else(unknown)
            }
            Err(e) => Err(e),
        }
    }

    fn loaded_entry(&self, collection: &str) -> Result<&CollectionEntry, CatalogError> {
        match self.entries.get(collection) {
            Some(entry) if entry.loaded => Ok(entry),
            _ => Err(CatalogError::NotLoaded(collection.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionKind, OptionSchema};

    /// Source double with a fixed set of collections.
    struct StaticSource {
        collections: Vec<(String, Vec<SchematicSchema>)>,
        failing: Vec<String>,
    }

    impl SchemaSource for StaticSource {
        fn list_collections(&self) -> Vec<String> {
            self.collections.iter().map(|(n, _)| n.clone()).collect()
        }

        fn load_collection(&self, name: &str) -> Result<Vec<SchematicSchema>, SourceError> {
            if self.failing.iter().any(|f| f == name) {
                return Err(SourceError::NotFound(name.to_string()));
            }
            self.collections
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, schemas)| schemas.clone())
                .ok_or_else(|| SourceError::NotFound(name.to_string()))
        }
    }

    fn schema(name: &str) -> SchematicSchema {
        SchematicSchema::new(
            name,
            None,
            vec![OptionSchema::new("name", OptionKind::Text).as_default_option()],
        )
        .unwrap()
    }

    fn catalog() -> CollectionCatalog {
        CollectionCatalog::new(Box::new(StaticSource {
            collections: vec![
                ("my-coll".to_string(), vec![schema("widget"), schema("card")]),
                ("empty-coll".to_string(), vec![]),
            ],
            failing: vec!["broken-coll".to_string()],
        }))
    }

    #[test]
    fn resolve_starts_unloaded() {
        let mut catalog = catalog();
        let entry = catalog.resolve("my-coll");
        assert!(!entry.loaded);
    }

    #[test]
    fn load_marks_entry_loaded_and_exposes_schema_names() {
        let mut catalog = catalog();
        catalog.load("my-coll").unwrap();
        assert!(catalog.resolve("my-coll").loaded);
        assert_eq!(catalog.schema_names("my-coll").unwrap(), vec!["widget", "card"]);
    }

    #[test]
    fn load_failure_leaves_entry_unusable() {
        let mut catalog = catalog();
        catalog.resolve("broken-coll");
        assert!(catalog.load("broken-coll").is_err());
        assert!(!catalog.resolve("broken-coll").loaded);
        assert!(matches!(
            catalog.schema_names("broken-coll"),
            Err(CatalogError::NotLoaded(_))
        ));
    }

    #[test]
    fn empty_schema_set_is_an_error() {
        let mut catalog = catalog();
        catalog.load("empty-coll").unwrap();
        assert!(matches!(
            catalog.schema_names("empty-coll"),
            Err(CatalogError::EmptySchemaSet(_))
        ));
    }

    #[test]
    fn create_schema_on_unloaded_entry_fails_loudly() {
        let catalog = catalog();
        assert!(matches!(
            catalog.create_schema("my-coll", "widget"),
            Err(CatalogError::NotLoaded(_))
        ));
    }

    #[test]
    fn default_collection_fast_path_skips_loading() {
        let catalog = catalog();
        let component = catalog
            .create_schema(DEFAULT_COLLECTION, "component")
            .unwrap();
        assert!(component.has_default_option());
    }

    #[test]
    fn unknown_schema_in_loaded_collection() {
        let mut catalog = catalog();
        catalog.load("my-coll").unwrap();
        assert!(matches!(
            catalog.create_schema("my-coll", "nope"),
            Err(CatalogError::UnknownSchema { .. })
        ));
    }
}
