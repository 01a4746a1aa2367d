// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Type descriptors
//!
//! Every value expression in the tree carries a [`TypeInfo`]. The lowering
//! layer uses it to compute how many physical columns ("snippets") one
//! logical value occupies:
//!
//! | type | columns |
//! |------|---------|
//! | scalar primitive | 1 |
//! | `Point2d` | 2 |
//! | `Point3d` | 3 |
//! | struct | sum of its members, recursively |
//! | navigation | 2 (id, relationship class id) |
//! | arrays | 1 (serialized) |

use serde::{Deserialize, Serialize};

use crate::metadata::ClassId;

/// ECSQL primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Binary,
    Boolean,
    DateTime,
    Double,
    Integer,
    Long,
    Point2d,
    Point3d,
    String,
    IGeometry,
}

impl PrimitiveType {
    /// Number of physical columns a value of this type maps to
    pub fn column_count(self) -> usize {
        match self {
            PrimitiveType::Point2d => 2,
            PrimitiveType::Point3d => 3,
            _ => 1,
        }
    }

    /// ECSQL spelling of the type name
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Binary => "Binary",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::DateTime => "DateTime",
            PrimitiveType::Double => "Double",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Point2d => "Point2d",
            PrimitiveType::Point3d => "Point3d",
            PrimitiveType::String => "String",
            PrimitiveType::IGeometry => "IGeometry",
        }
    }

    /// Suffixes used for the component columns of point types
    pub fn component_suffixes(self) -> &'static [&'static str] {
        match self {
            PrimitiveType::Point2d => &["X", "Y"],
            PrimitiveType::Point3d => &["X", "Y", "Z"],
            _ => &[],
        }
    }

    pub fn is_point(self) -> bool {
        matches!(self, PrimitiveType::Point2d | PrimitiveType::Point3d)
    }
}

/// A struct type: an ordered list of named members
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    /// Fully qualified struct class name (e.g. `ts.Address`)
    pub name: String,
    pub members: Vec<StructMember>,
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Builder method: append a member
    pub fn with_member(mut self, name: impl Into<String>, type_info: TypeInfo) -> Self {
        self.members.push(StructMember {
            name: name.into(),
            type_info,
        });
        self
    }

    /// Physical column count, summed recursively over all members
    pub fn column_count(&self) -> usize {
        self.members.iter().map(|m| m.type_info.column_count()).sum()
    }
}

/// One member of a [`StructType`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructMember {
    pub name: String,
    pub type_info: TypeInfo,
}

/// Type descriptor attached to every value expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeInfo {
    /// Not (yet) known, e.g. an untyped parameter
    #[default]
    Unknown,
    /// The type of an untyped NULL literal
    Null,
    Primitive(PrimitiveType),
    Struct(StructType),
    /// Navigation property value: id plus relationship class id
    Navigation { relationship_class: ClassId },
    PrimitiveArray(PrimitiveType),
    StructArray(StructType),
}

impl TypeInfo {
    pub fn primitive(kind: PrimitiveType) -> Self {
        TypeInfo::Primitive(kind)
    }

    /// Number of physical columns one value of this type occupies
    pub fn column_count(&self) -> usize {
        match self {
            TypeInfo::Primitive(kind) => kind.column_count(),
            TypeInfo::Struct(struct_type) => struct_type.column_count(),
            TypeInfo::Navigation { .. } => 2,
            TypeInfo::Unknown
            | TypeInfo::Null
            | TypeInfo::PrimitiveArray(_)
            | TypeInfo::StructArray(_) => 1,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeInfo::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeInfo::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeInfo::Null)
    }
}
