// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fixture schema shared by the lowering tests
//!
//! ```text
//! ts.Element (10)            ts_Element, ECClassId column
//! ├── ts.PhysicalElement (11)   ts_Element
//! │   ├── ts.SpatialElement (12) ts_Element, Location: ts.Address
//! │   └── ts.Sensor (13)         ts_Sensor, no ECClassId column
//! ts.Widget (20)              ts_Widget
//! ts.Settings (21)            ts_Settings, ONLY queries
//! ts.ElementOwnsChildElements (30)  unmapped, backs Element.Parent
//! ts.ElementRefersToElements (31)   ts_ElementRefersToElements
//! ts.Address (40)             struct { Street, Pos: Point2d }
//! ```

use ecsql_catalog::{SchemaCatalog, StaticCatalog, TableDef};
use ecsql_ir::{
    ClassDef, ClassId, ClassKind, ClassModifier, ClassNameExp, Exp, PrimitiveType, PropertyDef,
    PropertyNameExp, PropertyTarget, RelationshipDirection, StructType, TypeInfo,
};

pub const ELEMENT: ClassId = ClassId(10);
pub const PHYSICAL_ELEMENT: ClassId = ClassId(11);
pub const SPATIAL_ELEMENT: ClassId = ClassId(12);
pub const SENSOR: ClassId = ClassId(13);
pub const WIDGET: ClassId = ClassId(20);
pub const SETTINGS: ClassId = ClassId(21);
pub const ELEMENT_OWNS_CHILD_ELEMENTS: ClassId = ClassId(30);
pub const ELEMENT_REFERS_TO_ELEMENTS: ClassId = ClassId(31);
pub const ADDRESS: ClassId = ClassId(40);

/// `ts.Address`
pub fn address_struct() -> StructType {
    StructType::new("ts.Address")
        .with_member("Street", TypeInfo::Primitive(PrimitiveType::String))
        .with_member("Pos", TypeInfo::Primitive(PrimitiveType::Point2d))
}

pub struct FixtureSchema {
    catalog: StaticCatalog,
}

impl Default for FixtureSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureSchema {
    pub fn new() -> Self {
        let catalog = StaticCatalog::builder()
            .table(TableDef::new("ts_Element").with_class_id_column())
            .table(TableDef::new("ts_Sensor"))
            .table(TableDef::new("ts_Widget"))
            .table(TableDef::new("ts_Settings"))
            .table(TableDef::new("ts_ElementRefersToElements").with_class_id_column())
            .mapped_class(
                ClassDef::new(ELEMENT, "ts", "Element")
                    .with_modifier(ClassModifier::Abstract)
                    .with_property(PropertyDef::primitive("Code", PrimitiveType::String))
                    .with_property(PropertyDef::primitive("Origin", PrimitiveType::Point3d))
                    .with_property(PropertyDef::navigation(
                        "Parent",
                        ELEMENT_OWNS_CHILD_ELEMENTS,
                        RelationshipDirection::Backward,
                    )),
                "ts_Element",
            )
            .mapped_class(
                ClassDef::new(PHYSICAL_ELEMENT, "ts", "PhysicalElement").with_base(ELEMENT),
                "ts_Element",
            )
            .mapped_class(
                ClassDef::new(SPATIAL_ELEMENT, "ts", "SpatialElement")
                    .with_base(PHYSICAL_ELEMENT)
                    .with_property(PropertyDef::structure("Location", address_struct())),
                "ts_Element",
            )
            .mapped_class(
                ClassDef::new(SENSOR, "ts", "Sensor")
                    .with_base(PHYSICAL_ELEMENT)
                    .with_property(PropertyDef::primitive("Reading", PrimitiveType::Double)),
                "ts_Sensor",
            )
            .mapped_class(
                ClassDef::new(WIDGET, "ts", "Widget")
                    .with_property(PropertyDef::primitive("Name", PrimitiveType::String))
                    .with_property(PropertyDef::primitive("Size", PrimitiveType::Double))
                    .with_property(PropertyDef::primitive("Position", PrimitiveType::Point2d))
                    .with_property(PropertyDef::primitive("P", PrimitiveType::Point3d))
                    .with_property(PropertyDef::primitive("Q", PrimitiveType::Point3d))
                    .with_property(PropertyDef::primitive("Count", PrimitiveType::Long))
                    .with_property(PropertyDef::primitive("Flag", PrimitiveType::Boolean))
                    .with_property(PropertyDef::primitive("Created", PrimitiveType::DateTime))
                    .with_property(PropertyDef::primitive("Color", PrimitiveType::Integer)),
                "ts_Widget",
            )
            .non_polymorphic_class(
                ClassDef::new(SETTINGS, "ts", "Settings")
                    .with_property(PropertyDef::primitive("Key", PrimitiveType::String)),
                "ts_Settings",
            )
            .class(
                ClassDef::new(ELEMENT_OWNS_CHILD_ELEMENTS, "ts", "ElementOwnsChildElements")
                    .with_relationship(ELEMENT, ELEMENT),
            )
            .mapped_class(
                ClassDef::new(ELEMENT_REFERS_TO_ELEMENTS, "ts", "ElementRefersToElements")
                    .with_relationship(ELEMENT, ELEMENT)
                    .with_property(PropertyDef::primitive("Priority", PrimitiveType::Integer)),
                "ts_ElementRefersToElements",
            )
            .class(ClassDef::new(ADDRESS, "ts", "Address").with_kind(ClassKind::Struct))
            .build()
            .expect("fixture schema is valid");
        Self { catalog }
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    /// Polymorphic class reference with an alias
    pub fn class(&self, id: ClassId, alias: &str) -> ClassNameExp {
        let def = self.catalog.class(id).expect("fixture class");
        ClassNameExp::new(id, def.schema.clone(), def.name.clone()).with_alias(alias)
    }

    /// `ONLY` class reference with an alias
    pub fn only(&self, id: ClassId, alias: &str) -> ClassNameExp {
        self.class(id, alias).only()
    }

    /// Typed reference to `alias.path` on `class`
    pub fn property(&self, alias: &str, class: ClassId, path: &str) -> Exp {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        let type_info = self.type_of(class, &segments);
        Exp::PropertyName(PropertyNameExp {
            class_alias: alias.to_string(),
            path: segments,
            target: PropertyTarget::Class { class_id: class },
            type_info,
        })
    }

    fn type_of(&self, class: ClassId, segments: &[String]) -> TypeInfo {
        let root = segments[0].as_str();
        if matches!(
            root,
            "ECInstanceId"
                | "ECClassId"
                | "SourceECInstanceId"
                | "SourceECClassId"
                | "TargetECInstanceId"
                | "TargetECClassId"
        ) {
            return TypeInfo::Primitive(PrimitiveType::Long);
        }

        let mut type_info = self
            .catalog
            .find_property(class, root)
            .expect("fixture property")
            .type_info();
        for segment in &segments[1..] {
            type_info = match type_info {
                TypeInfo::Struct(struct_type) => struct_type
                    .members
                    .into_iter()
                    .find(|member| member.name.eq_ignore_ascii_case(segment))
                    .expect("fixture struct member")
                    .type_info,
                TypeInfo::Primitive(kind) if kind.is_point() => {
                    TypeInfo::Primitive(PrimitiveType::Double)
                }
                TypeInfo::Navigation { .. } => TypeInfo::Primitive(PrimitiveType::Long),
                other => panic!("cannot descend into {other:?} with '{segment}'"),
            };
        }
        type_info
    }
}
