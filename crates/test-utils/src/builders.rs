// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Shorthand constructors for ECSQL statement trees

use ecsql_ir::{
    BinaryBooleanExp, BooleanOperator, ClassNameExp, ClassRef, ComparisonOperator,
    DerivedProperty, Exp, FunctionCallExp, LiteralExp, LiteralValue, ParameterExp, PrimitiveType,
    SelectStatement, SingleSelect, Statement, TypeInfo,
};

pub fn int(value: i64) -> Exp {
    Exp::literal(LiteralValue::Integer(value))
}

pub fn double(value: f64) -> Exp {
    Exp::literal(LiteralValue::Double(value))
}

pub fn string(value: &str) -> Exp {
    Exp::literal(LiteralValue::String(value.to_string()))
}

pub fn null() -> Exp {
    Exp::null()
}

/// NULL literal carrying the type of the operand it is compared with
pub fn typed_null(type_info: TypeInfo) -> Exp {
    Exp::Literal(LiteralExp::new(LiteralValue::Null).with_type(type_info))
}

/// `:name` of the given type
pub fn named_param(name: &str, index: u32, type_info: TypeInfo) -> Exp {
    Exp::Parameter(ParameterExp {
        name: Some(name.to_string()),
        index,
        type_info,
    })
}

/// `?` of the given type
pub fn positional_param(index: u32, type_info: TypeInfo) -> Exp {
    Exp::Parameter(ParameterExp {
        name: None,
        index,
        type_info,
    })
}

pub fn primitive(kind: PrimitiveType) -> TypeInfo {
    TypeInfo::Primitive(kind)
}

pub fn binary(lhs: Exp, op: BooleanOperator, rhs: Exp) -> Exp {
    Exp::BinaryBoolean(BinaryBooleanExp {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
        parenthesized: false,
    })
}

pub fn compare(lhs: Exp, op: ComparisonOperator, rhs: Exp) -> Exp {
    binary(lhs, BooleanOperator::Comparison(op), rhs)
}

pub fn eq(lhs: Exp, rhs: Exp) -> Exp {
    compare(lhs, ComparisonOperator::Eq, rhs)
}

pub fn and(lhs: Exp, rhs: Exp) -> Exp {
    binary(lhs, BooleanOperator::And, rhs)
}

pub fn call(name: &str, args: Vec<Exp>) -> Exp {
    Exp::FunctionCall(FunctionCallExp::new(name, args))
}

/// `SELECT items FROM class`
pub fn select_from(items: Vec<Exp>, class: ClassNameExp) -> SingleSelect {
    SingleSelect {
        select_list: items.into_iter().map(DerivedProperty::new).collect(),
        from: vec![ClassRef::ClassName(class)],
        ..Default::default()
    }
}

/// `SELECT items FROM class WHERE condition`
pub fn select_where(items: Vec<Exp>, class: ClassNameExp, condition: Exp) -> SingleSelect {
    SingleSelect {
        where_clause: Some(condition),
        ..select_from(items, class)
    }
}

pub fn subquery(select: SingleSelect) -> Box<SelectStatement> {
    Box::new(SelectStatement::single(select))
}

pub fn statement(select: SingleSelect) -> Statement {
    Statement::Select(SelectStatement::single(select))
}
