// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for schema and storage lookups
//!
//! This module defines the `SchemaCatalog` trait the lowering layer queries
//! while it walks a statement.

use ecsql_ir::{ClassDef, ClassId, PropertyDef};

use crate::error::{CatalogError, CatalogResult};
use crate::metadata::{ClassMap, StoragePartition, TableDef};

/// Default name of the class-hierarchy cache table
pub const CLASS_HIERARCHY_CACHE_TABLE: &str = "[main].ec_cache_ClassHierarchy";

/// Catalog trait for schema metadata and storage mapping
///
/// Lookups are synchronous: lowering runs as a single depth-first walk with
/// no suspension points, so implementations are expected to answer from
/// memory.
///
/// # Examples
///
/// ```rust,ignore
/// use ecsql_catalog::{SchemaCatalog, CatalogResult};
///
/// fn table_of(catalog: &dyn SchemaCatalog, class: ClassId) -> CatalogResult<String> {
///     Ok(catalog.class_map(class)?.table.clone())
/// }
/// ```
pub trait SchemaCatalog {
    /// Class metadata by id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ClassNotFound` if no such class exists.
    fn class(&self, id: ClassId) -> CatalogResult<&ClassDef>;

    /// Class metadata by schema alias and class name (case-insensitive)
    fn find_class(&self, schema: &str, name: &str) -> CatalogResult<&ClassDef>;

    /// Storage mapping of a class
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ClassNotMapped` for classes without storage
    /// (structs, custom attributes, unmapped relationships).
    fn class_map(&self, id: ClassId) -> CatalogResult<&ClassMap>;

    /// Physical table by name
    fn table(&self, name: &str) -> CatalogResult<&TableDef>;

    /// Direct subclasses of a class
    fn derived_classes(&self, id: ClassId) -> CatalogResult<Vec<ClassId>>;

    /// Mapped classes whose rows live in `table`
    fn classes_in_table(&self, table: &str) -> Vec<ClassId>;

    /// Name of the precomputed class-hierarchy cache table
    fn class_hierarchy_cache_table(&self) -> &str {
        CLASS_HIERARCHY_CACHE_TABLE
    }

    /// The class itself plus all of its subclasses, depth-first
    fn class_and_all_derived(&self, id: ClassId) -> CatalogResult<Vec<ClassId>> {
        let mut result = vec![id];
        let mut next = 0;
        while next < result.len() {
            for derived in self.derived_classes(result[next])? {
                if !result.contains(&derived) {
                    result.push(derived);
                }
            }
            next += 1;
        }
        Ok(result)
    }

    /// `true` if `class` equals `base` or derives from it
    fn is_subclass_of(&self, class: ClassId, base: ClassId) -> bool {
        if class == base {
            return true;
        }
        match self.class(class) {
            Ok(def) => def
                .base_classes
                .iter()
                .any(|parent| self.is_subclass_of(*parent, base)),
            Err(_) => false,
        }
    }

    /// Property lookup including inherited properties
    fn find_property(&self, class: ClassId, name: &str) -> CatalogResult<&PropertyDef> {
        let def = self.class(class)?;
        if let Some(property) = def.find_property(name) {
            return Ok(property);
        }
        for base in &def.base_classes {
            if let Ok(property) = self.find_property(*base, name) {
                return Ok(property);
            }
        }
        Err(CatalogError::PropertyNotFound {
            class: def.full_name(),
            property: name.to_string(),
        })
    }

    /// How the hierarchy rooted at `class` is stored in `table`
    fn storage_partition(&self, table: &str, class: ClassId) -> CatalogResult<StoragePartition> {
        let hierarchy = self.class_and_all_derived(class)?;
        let stored = self.classes_in_table(table);
        let class_ids: Vec<ClassId> = stored
            .iter()
            .copied()
            .filter(|id| hierarchy.contains(id))
            .collect();
        let requires_class_id_filter = stored.iter().any(|id| !hierarchy.contains(id));
        Ok(StoragePartition {
            table: table.to_string(),
            class_ids,
            requires_class_id_filter,
        })
    }

    /// `true` if more than one class stores rows in `table`
    fn is_shared_table(&self, table: &str) -> bool {
        self.classes_in_table(table).len() > 1
    }
}
