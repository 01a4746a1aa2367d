// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema metadata
//!
//! Classes and properties as seen by the expression tree. Storage mapping
//! (tables, columns) lives in the catalog crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PrimitiveType, StructType, TypeInfo};

/// Numeric id of an ECClass
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ClassId(pub u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Class classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Entity,
    Relationship,
    Struct,
    CustomAttribute,
    Mixin,
}

/// Class modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClassModifier {
    #[default]
    None,
    Abstract,
    Sealed,
}

/// Direction of a relationship as referenced by a navigation property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipDirection {
    Forward,
    Backward,
}

/// Source and target constraint classes of a relationship class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEnds {
    pub source: ClassId,
    pub target: ClassId,
}

/// Navigation property details
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationDef {
    /// Relationship class the navigation property is declared against
    pub relationship_class: ClassId,
    pub direction: RelationshipDirection,
}

/// Kind of an ECProperty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Primitive(PrimitiveType),
    Struct(StructType),
    PrimitiveArray(PrimitiveType),
    StructArray(StructType),
    Navigation(NavigationDef),
}

/// Metadata for an ECProperty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyDef {
    pub fn primitive(name: impl Into<String>, kind: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Primitive(kind),
        }
    }

    pub fn structure(name: impl Into<String>, struct_type: StructType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Struct(struct_type),
        }
    }

    pub fn navigation(
        name: impl Into<String>,
        relationship_class: ClassId,
        direction: RelationshipDirection,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Navigation(NavigationDef {
                relationship_class,
                direction,
            }),
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self.kind, PropertyKind::Navigation(_))
    }

    pub fn as_navigation(&self) -> Option<&NavigationDef> {
        match &self.kind {
            PropertyKind::Navigation(nav) => Some(nav),
            _ => None,
        }
    }

    /// Type descriptor of a value of this property
    pub fn type_info(&self) -> TypeInfo {
        match &self.kind {
            PropertyKind::Primitive(kind) => TypeInfo::Primitive(*kind),
            PropertyKind::Struct(struct_type) => TypeInfo::Struct(struct_type.clone()),
            PropertyKind::PrimitiveArray(kind) => TypeInfo::PrimitiveArray(*kind),
            PropertyKind::StructArray(struct_type) => TypeInfo::StructArray(struct_type.clone()),
            PropertyKind::Navigation(nav) => TypeInfo::Navigation {
                relationship_class: nav.relationship_class,
            },
        }
    }
}

/// Metadata for an ECClass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: ClassId,
    /// Schema alias (e.g. `ts`)
    pub schema: String,
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub modifier: ClassModifier,
    /// Direct base classes
    #[serde(default)]
    pub base_classes: Vec<ClassId>,
    /// Properties declared locally on this class
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    /// Set for relationship classes
    #[serde(default)]
    pub relationship: Option<RelationshipEnds>,
}

impl ClassDef {
    /// Create a new entity class with builder pattern
    pub fn new(id: ClassId, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            schema: schema.into(),
            name: name.into(),
            kind: ClassKind::Entity,
            modifier: ClassModifier::None,
            base_classes: Vec::new(),
            properties: Vec::new(),
            relationship: None,
        }
    }

    /// Builder method: set class kind
    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder method: set modifier
    pub fn with_modifier(mut self, modifier: ClassModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Builder method: add a direct base class
    pub fn with_base(mut self, base: ClassId) -> Self {
        self.base_classes.push(base);
        self
    }

    /// Builder method: add a property
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Builder method: make this a relationship class between two ends
    pub fn with_relationship(mut self, source: ClassId, target: ClassId) -> Self {
        self.kind = ClassKind::Relationship;
        self.relationship = Some(RelationshipEnds { source, target });
        self
    }

    /// `schema.Name`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Find a locally declared property (case-insensitive, like ECSQL)
    pub fn find_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn is_relationship(&self) -> bool {
        self.kind == ClassKind::Relationship
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_builder() {
        let class = ClassDef::new(ClassId(7), "ts", "Element")
            .with_property(PropertyDef::primitive("Code", PrimitiveType::String))
            .with_property(PropertyDef::navigation(
                "Parent",
                ClassId(9),
                RelationshipDirection::Backward,
            ));

        assert_eq!(class.full_name(), "ts.Element");
        assert!(class.find_property("code").is_some());
        assert!(class.find_property("Parent").unwrap().is_navigation());
        assert_eq!(
            class.find_property("Parent").unwrap().type_info().column_count(),
            2
        );
    }
}
