// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! This module provides an in-memory catalog built from class and table
//! definitions, either through the builder API or from JSON.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecsql_catalog::{StaticCatalog, TableDef};
//!
//! let catalog = StaticCatalog::builder()
//!     .table(TableDef::new("ts_Widget"))
//!     .mapped_class(widget, "ts_Widget")
//!     .build()?;
//! ```
//!
//! Class maps are generated from the class definitions: one view column per
//! physical column, named after the property access string.

use std::collections::BTreeMap;

use ecsql_ir::{ClassDef, ClassId, PropertyDef, PropertyKind, StructType, TypeInfo};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::{ClassMap, ColumnSource, MappedColumn, TableDef};
use crate::{CatalogError, CatalogResult, SchemaCatalog};

/// One class entry of a [`CatalogDefinition`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(flatten)]
    pub class: ClassDef,
    /// Table holding the rows of the class, `None` for unmapped classes
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default = "default_true")]
    pub allows_polymorphic_queries: bool,
}

fn default_true() -> bool {
    true
}

/// Serializable catalog description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

/// Builder for [`StaticCatalog`]
#[derive(Debug, Default)]
pub struct StaticCatalogBuilder {
    definition: CatalogDefinition,
}

impl StaticCatalogBuilder {
    pub fn table(mut self, table: TableDef) -> Self {
        self.definition.tables.push(table);
        self
    }

    /// Add a class without storage (struct, mixin, unmapped relationship)
    pub fn class(mut self, class: ClassDef) -> Self {
        self.definition.classes.push(ClassEntry {
            class,
            table: None,
            allows_polymorphic_queries: true,
        });
        self
    }

    /// Add a class whose rows live in `table`
    pub fn mapped_class(mut self, class: ClassDef, table: impl Into<String>) -> Self {
        self.definition.classes.push(ClassEntry {
            class,
            table: Some(table.into()),
            allows_polymorphic_queries: true,
        });
        self
    }

    /// Add a mapped class that may only be queried with `ONLY`
    pub fn non_polymorphic_class(mut self, class: ClassDef, table: impl Into<String>) -> Self {
        self.definition.classes.push(ClassEntry {
            class,
            table: Some(table.into()),
            allows_polymorphic_queries: false,
        });
        self
    }

    pub fn build(self) -> CatalogResult<StaticCatalog> {
        StaticCatalog::from_definition(self.definition)
    }
}

/// In-memory [`SchemaCatalog`]
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    classes: BTreeMap<ClassId, ClassDef>,
    class_maps: BTreeMap<ClassId, ClassMap>,
    tables: BTreeMap<String, TableDef>,
    /// Mapped classes per table, in definition order
    table_classes: BTreeMap<String, Vec<ClassId>>,
    derived: BTreeMap<ClassId, Vec<ClassId>>,
}

impl StaticCatalog {
    pub fn builder() -> StaticCatalogBuilder {
        StaticCatalogBuilder::default()
    }

    /// Parse a JSON [`CatalogDefinition`]
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let definition: CatalogDefinition = serde_json::from_str(json)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        Self::from_definition(definition)
    }

    pub fn from_definition(definition: CatalogDefinition) -> CatalogResult<Self> {
        let mut catalog = StaticCatalog::default();

        for table in definition.tables {
            catalog.tables.insert(table.name.clone(), table);
        }

        for entry in &definition.classes {
            let id = entry.class.id;
            if catalog.classes.insert(id, entry.class.clone()).is_some() {
                return Err(CatalogError::InvalidDefinition(format!(
                    "duplicate class id {id}"
                )));
            }
        }

        for class in catalog.classes.values() {
            for base in &class.base_classes {
                if !catalog.classes.contains_key(base) {
                    return Err(CatalogError::InvalidDefinition(format!(
                        "base class {base} of '{}' is not defined",
                        class.full_name()
                    )));
                }
                catalog.derived.entry(*base).or_default().push(class.id);
            }
        }

        for entry in &definition.classes {
            let Some(table_name) = &entry.table else {
                continue;
            };
            let table = catalog
                .tables
                .get(table_name)
                .ok_or_else(|| CatalogError::TableNotFound(table_name.clone()))?;
            let columns = catalog.generate_columns(entry.class.id, table)?;
            catalog.class_maps.insert(
                entry.class.id,
                ClassMap {
                    class_id: entry.class.id,
                    table: table_name.clone(),
                    allows_polymorphic_queries: entry.allows_polymorphic_queries,
                    columns,
                },
            );
            catalog
                .table_classes
                .entry(table_name.clone())
                .or_default()
                .push(entry.class.id);
        }

        debug!(
            classes = catalog.classes.len(),
            mapped = catalog.class_maps.len(),
            tables = catalog.tables.len(),
            "Built static catalog"
        );
        Ok(catalog)
    }

    /// Properties of a class including inherited ones, base classes first
    fn all_properties(&self, id: ClassId) -> CatalogResult<Vec<PropertyDef>> {
        let class = self.class(id)?;
        let mut properties: Vec<PropertyDef> = Vec::new();
        for base in &class.base_classes {
            for property in self.all_properties(*base)? {
                if !properties
                    .iter()
                    .any(|p| p.name.eq_ignore_ascii_case(&property.name))
                {
                    properties.push(property);
                }
            }
        }
        for property in &class.properties {
            properties.retain(|p| !p.name.eq_ignore_ascii_case(&property.name));
            properties.push(property.clone());
        }
        Ok(properties)
    }

    fn generate_columns(&self, id: ClassId, table: &TableDef) -> CatalogResult<Vec<MappedColumn>> {
        let class = self.class(id)?;
        let mut columns = vec![
            mapped("ECInstanceId", ColumnSource::Column(table.id_column.clone())),
            mapped(
                "ECClassId",
                match &table.class_id_column {
                    Some(column) => ColumnSource::Column(column.clone()),
                    None => ColumnSource::ClassIdConstant(id),
                },
            ),
        ];

        if class.is_relationship() {
            for (access, column) in [
                ("SourceECInstanceId", "SourceId"),
                ("SourceECClassId", "SourceClassId"),
                ("TargetECInstanceId", "TargetId"),
                ("TargetECClassId", "TargetClassId"),
            ] {
                columns.push(mapped(access, ColumnSource::Column(column.to_string())));
            }
        }

        for property in self.all_properties(id)? {
            expand_property(&property, &mut columns);
        }
        Ok(columns)
    }
}

fn mapped(access: &str, source: ColumnSource) -> MappedColumn {
    MappedColumn {
        access_string: access.to_string(),
        view_name: access.to_string(),
        source,
    }
}

fn push_column(columns: &mut Vec<MappedColumn>, access: String, view_name: String) {
    columns.push(MappedColumn {
        access_string: access,
        source: ColumnSource::Column(view_name.clone()),
        view_name,
    });
}

fn expand_property(property: &PropertyDef, columns: &mut Vec<MappedColumn>) {
    match &property.kind {
        PropertyKind::Navigation(_) => {
            push_column(
                columns,
                format!("{}.Id", property.name),
                format!("{}Id", property.name),
            );
            push_column(
                columns,
                format!("{}.RelECClassId", property.name),
                format!("{}RelECClassId", property.name),
            );
        }
        PropertyKind::Struct(struct_type) => {
            expand_struct(&property.name, &property.name, struct_type, columns)
        }
        _ => expand_value(
            &property.name,
            &property.name,
            &property.type_info(),
            columns,
        ),
    }
}

fn expand_struct(
    access: &str,
    view: &str,
    struct_type: &StructType,
    columns: &mut Vec<MappedColumn>,
) {
    for member in &struct_type.members {
        let access = format!("{access}.{}", member.name);
        let view = format!("{view}_{}", member.name);
        match &member.type_info {
            TypeInfo::Struct(inner) => expand_struct(&access, &view, inner, columns),
            other => expand_value(&access, &view, other, columns),
        }
    }
}

fn expand_value(access: &str, view: &str, type_info: &TypeInfo, columns: &mut Vec<MappedColumn>) {
    match type_info.as_primitive() {
        Some(kind) if kind.is_point() => {
            for suffix in kind.component_suffixes() {
                push_column(
                    columns,
                    format!("{access}.{suffix}"),
                    format!("{view}_{suffix}"),
                );
            }
        }
        _ => push_column(columns, access.to_string(), view.to_string()),
    }
}

impl SchemaCatalog for StaticCatalog {
    fn class(&self, id: ClassId) -> CatalogResult<&ClassDef> {
        self.classes.get(&id).ok_or(CatalogError::ClassNotFound(id))
    }

    fn find_class(&self, schema: &str, name: &str) -> CatalogResult<&ClassDef> {
        self.classes
            .values()
            .find(|c| c.schema.eq_ignore_ascii_case(schema) && c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::ClassNameNotFound(format!("{schema}.{name}")))
    }

    fn class_map(&self, id: ClassId) -> CatalogResult<&ClassMap> {
        match self.class_maps.get(&id) {
            Some(map) => Ok(map),
            None => Err(CatalogError::ClassNotMapped(self.class(id)?.full_name())),
        }
    }

    fn table(&self, name: &str) -> CatalogResult<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    fn derived_classes(&self, id: ClassId) -> CatalogResult<Vec<ClassId>> {
        self.class(id)?;
        Ok(self.derived.get(&id).cloned().unwrap_or_default())
    }

    fn classes_in_table(&self, table: &str) -> Vec<ClassId> {
        self.table_classes.get(table).cloned().unwrap_or_default()
    }
}
