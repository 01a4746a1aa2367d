// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit tests for statements and class references

use ecsql_ir::{
    ClassId, ClassNameExp, ClassRef, CompoundOperator, CompoundSelect, DerivedProperty, Exp,
    LiteralValue, SelectStatement, SingleSelect, Statement, StatementKind,
};

fn select_one() -> SingleSelect {
    SingleSelect {
        select_list: vec![DerivedProperty::new(Exp::literal(LiteralValue::Integer(1)))],
        from: vec![ClassRef::ClassName(ClassNameExp::new(
            ClassId(10),
            "ts",
            "Element",
        ))],
        ..Default::default()
    }
}

#[test]
fn test_class_name_alias() {
    let class = ClassNameExp::new(ClassId(10), "ts", "Element");
    assert_eq!(class.effective_alias(), "Element");
    assert!(class.polymorphic);

    let class = class.with_alias("e").only();
    assert_eq!(class.effective_alias(), "e");
    assert!(!class.polymorphic);
}

#[test]
fn test_compound_select() {
    let mut statement = SelectStatement::from(select_one());
    assert!(!statement.is_compound());

    statement.rest.push(CompoundSelect {
        op: CompoundOperator::UnionAll,
        select: select_one(),
    });
    assert!(statement.is_compound());
    assert_eq!(statement.rest[0].op.as_sql(), "UNION ALL");
}

#[test]
fn test_statement_kind() {
    let statement = Statement::Select(select_one().into());
    assert_eq!(statement.kind(), StatementKind::Select);
}

#[test]
fn test_statement_json_shape() {
    let statement = Statement::Select(select_one().into());
    let json = serde_json::to_string(&statement).unwrap();
    assert!(json.starts_with("{\"Select\""));

    let back: Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(back, statement);
}

#[test]
fn test_class_name_defaults_to_polymorphic_in_json() {
    let class: ClassNameExp =
        serde_json::from_str(r#"{"class_id":11,"schema":"ts","name":"PhysicalElement","alias":null}"#)
            .unwrap();
    assert!(class.polymorphic);
    assert_eq!(class.class_id, ClassId(11));
}
