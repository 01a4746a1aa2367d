// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit tests for the expression tree

use ecsql_ir::{
    ClassId, Exp, FunctionCallExp, LiteralExp, LiteralValue, PrimitiveType, PropertyNameExp,
    PropertyTarget, StructType, TypeInfo,
};

fn property(path: &[&str], type_info: TypeInfo) -> Exp {
    Exp::PropertyName(PropertyNameExp {
        class_alias: "e".to_string(),
        path: path.iter().map(|p| p.to_string()).collect(),
        target: PropertyTarget::Class {
            class_id: ClassId(10),
        },
        type_info,
    })
}

#[test]
fn test_literal_types() {
    let lit = LiteralExp::new(LiteralValue::Integer(42));
    assert_eq!(lit.type_info, TypeInfo::Primitive(PrimitiveType::Long));

    let lit = LiteralExp::new(LiteralValue::Timestamp("2024-01-01T00:00:00Z".into()));
    assert_eq!(lit.type_info, TypeInfo::Primitive(PrimitiveType::DateTime));

    let null = LiteralExp::new(LiteralValue::Null);
    assert!(null.type_info.is_null());
}

#[test]
fn test_property_column_counts() {
    let origin = property(&["Origin"], TypeInfo::primitive(PrimitiveType::Point3d));
    assert_eq!(origin.type_info().column_count(), 3);

    let address = StructType::new("ts.Address")
        .with_member("Street", TypeInfo::primitive(PrimitiveType::String))
        .with_member("Pos", TypeInfo::primitive(PrimitiveType::Point2d));
    let location = property(&["Location"], TypeInfo::Struct(address));
    assert_eq!(location.type_info().column_count(), 3);

    let parent = property(
        &["Parent"],
        TypeInfo::Navigation {
            relationship_class: ClassId(30),
        },
    );
    assert_eq!(parent.type_info().column_count(), 2);
}

#[test]
fn test_access_string_and_system_properties() {
    let Exp::PropertyName(prop) = property(&["Location", "Street"], TypeInfo::Unknown) else {
        unreachable!()
    };
    assert_eq!(prop.access_string(), "Location.Street");
    assert!(!prop.is_system_property());

    let Exp::PropertyName(id) = property(&["ECInstanceId"], TypeInfo::Unknown) else {
        unreachable!()
    };
    assert!(id.is_system_property());
}

#[test]
fn test_parentheses_flag() {
    let lit = Exp::Literal(LiteralExp::new(LiteralValue::Null).with_parentheses());
    assert!(lit.has_parentheses());
    assert!(lit.is_null_literal());
    assert!(!Exp::literal(LiteralValue::Integer(1)).has_parentheses());
}

#[test]
fn test_function_call_builder() {
    let call = FunctionCallExp::new("UPPER", vec![Exp::literal(LiteralValue::String("a".into()))])
        .with_type(TypeInfo::primitive(PrimitiveType::String));
    assert_eq!(call.args.len(), 1);
    assert!(!call.star_arg);
    assert_eq!(
        Exp::FunctionCall(call).type_info(),
        TypeInfo::primitive(PrimitiveType::String)
    );
}
