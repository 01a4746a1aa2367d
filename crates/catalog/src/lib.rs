// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # ECSQL - Catalog Layer
//!
//! This crate provides the schema and storage mapping abstraction the
//! lowering layer resolves classes against.
//!
//! ## Architecture
//!
//! The catalog is responsible for:
//! - Class metadata and inheritance (base and derived classes)
//! - Class maps: which table stores a class, and which physical column
//!   backs each property access string
//! - Storage partitions: whether a class-id filter is needed when reading a
//!   class hierarchy from a shared table
//! - The name of the class-hierarchy cache table
//!
//! ## Implementations
//!
//! - [`StaticCatalog`]: in-memory, from a builder or a JSON
//!   [`CatalogDefinition`]

pub mod error;
pub mod metadata;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use metadata::{ClassMap, ColumnSource, MappedColumn, StoragePartition, TableDef};
pub use r#static::{CatalogDefinition, ClassEntry, StaticCatalog, StaticCatalogBuilder};
pub use r#trait::{CLASS_HIERARCHY_CACHE_TABLE, SchemaCatalog};
