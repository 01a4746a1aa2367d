// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Storage mapping types
//!
//! How classes and their properties map onto physical tables and columns.
//! Class and property metadata itself is defined in `ecsql-ir` and
//! re-exported here.

use ecsql_ir::ClassId;
use serde::{Deserialize, Serialize};

pub use ecsql_ir::{ClassDef, ClassKind, PropertyDef, PropertyKind};

/// Physical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default = "default_table_space")]
    pub table_space: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Present when rows of several classes share the table
    #[serde(default)]
    pub class_id_column: Option<String>,
}

fn default_table_space() -> String {
    "main".to_string()
}

fn default_id_column() -> String {
    "Id".to_string()
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_space: default_table_space(),
            id_column: default_id_column(),
            class_id_column: None,
        }
    }

    /// Builder method: add the `ECClassId` discriminator column
    pub fn with_class_id_column(mut self) -> Self {
        self.class_id_column = Some("ECClassId".to_string());
        self
    }

    pub fn has_class_id_column(&self) -> bool {
        self.class_id_column.is_some()
    }

    /// `[main].[ts_Element]`
    pub fn qualified_name(&self) -> String {
        format!("[{}].[{}]", self.table_space, self.name)
    }
}

/// Where the value of a mapped column comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSource {
    /// A physical column of the class's table
    Column(String),
    /// A constant class id, used for `ECClassId` in single-class tables
    ClassIdConstant(ClassId),
}

/// One physical column of a property (or system property)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedColumn {
    /// Dotted path including point components, e.g. `Origin.X`
    pub access_string: String,
    /// Column name in generated class views, e.g. `Origin_X`
    pub view_name: String,
    pub source: ColumnSource,
}

impl MappedColumn {
    /// `true` if this column belongs to the property at `path`
    pub fn belongs_to(&self, path: &str) -> bool {
        self.access_string.eq_ignore_ascii_case(path)
            || (self.access_string.len() > path.len()
                && self.access_string.as_bytes()[path.len()] == b'.'
                && self.access_string[..path.len()].eq_ignore_ascii_case(path))
    }

    /// Root property name, e.g. `Origin` for `Origin.X`
    pub fn root_property(&self) -> &str {
        self.access_string
            .split('.')
            .next()
            .unwrap_or(&self.access_string)
    }
}

/// Storage mapping of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    pub class_id: ClassId,
    /// Table holding the rows of this class
    pub table: String,
    /// `false` for classes that must not be queried polymorphically
    #[serde(default = "default_allow_polymorphic")]
    pub allows_polymorphic_queries: bool,
    /// Columns in view order: system properties first, then properties
    pub columns: Vec<MappedColumn>,
}

fn default_allow_polymorphic() -> bool {
    true
}

impl ClassMap {
    /// All columns of the property at `path`, in physical order
    pub fn property(&self, path: &str) -> Vec<&MappedColumn> {
        self.columns.iter().filter(|c| c.belongs_to(path)).collect()
    }

    pub fn column(&self, access_string: &str) -> Option<&MappedColumn> {
        self.columns
            .iter()
            .find(|c| c.access_string.eq_ignore_ascii_case(access_string))
    }
}

/// How one class hierarchy is laid out in one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePartition {
    pub table: String,
    /// Classes of the hierarchy stored in the table
    pub class_ids: Vec<ClassId>,
    /// The table also holds rows of classes outside the hierarchy
    pub requires_class_id_filter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(access: &str) -> MappedColumn {
        MappedColumn {
            access_string: access.to_string(),
            view_name: access.replace('.', "_"),
            source: ColumnSource::Column(access.replace('.', "_")),
        }
    }

    #[test]
    fn test_property_prefix_match() {
        let map = ClassMap {
            class_id: ClassId(1),
            table: "t".to_string(),
            allows_polymorphic_queries: true,
            columns: vec![
                column("Origin.X"),
                column("Origin.Y"),
                column("OriginName"),
                column("Origin.Z"),
            ],
        };

        let origin: Vec<_> = map
            .property("origin")
            .into_iter()
            .map(|c| c.view_name.as_str())
            .collect();
        assert_eq!(origin, vec!["Origin_X", "Origin_Y", "Origin_Z"]);
        assert_eq!(map.property("OriginName").len(), 1);
        assert_eq!(map.columns[0].root_property(), "Origin");
    }

    #[test]
    fn test_qualified_table_name() {
        let table = TableDef::new("ts_Element").with_class_id_column();
        assert_eq!(table.qualified_name(), "[main].[ts_Element]");
        assert!(table.has_class_id_column());
    }
}
