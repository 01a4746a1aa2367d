// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Value expression lowering
//!
//! Literals, parameters, property references, enum values, arithmetic,
//! CASE/IIF, the `extract_prop`/`extract_inst` helpers, scalar subqueries
//! and value lists.

use ecsql_catalog::{CatalogError, ColumnSource};
use ecsql_ir::{
    BinaryValueExp, CaseExp, EnumValueExp, Exp, ExtractInstanceExp, ExtractPropertyExp, IifExp,
    LiteralExp, LiteralValue, ParameterExp, PropertyNameExp, PropertyTarget, SelectStatement,
    StatementKind, UnaryValueExp,
};

use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};
use crate::exp::{prepare_aligned, prepare_exp, prepare_single};
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets, bracketed, qualified_column, quoted_string};

pub fn prepare_literal(ctx: &mut PrepareContext<'_>, lit: &LiteralExp) -> LoweringResult<Snippets> {
    if let LiteralValue::Null = lit.value {
        let text = if lit.parenthesized { "(NULL)" } else { "NULL" };
        return Ok((0..lit.type_info.column_count())
            .map(|_| NativeSql::text(text))
            .collect());
    }

    let text = literal_text(ctx, &lit.value)?;
    let sql = if lit.parenthesized {
        format!("({text})")
    } else {
        text
    };
    Ok(vec![NativeSql::text(sql)])
}

/// Native text of a non-NULL literal value
pub(crate) fn literal_text(
    ctx: &mut PrepareContext<'_>,
    value: &LiteralValue,
) -> LoweringResult<String> {
    Ok(match value {
        LiteralValue::Null => "NULL".to_string(),
        LiteralValue::Boolean(true) => "TRUE".to_string(),
        LiteralValue::Boolean(false) => "FALSE".to_string(),
        LiteralValue::Integer(value) => value.to_string(),
        LiteralValue::Double(value) => {
            if !value.is_finite() {
                return Err(ctx.invalid(
                    IssueId::InvalidLiteral,
                    format!("'{value}' is not a valid numeric literal"),
                ));
            }
            format!("{value:?}")
        }
        LiteralValue::String(text) => quoted_string(text),
        LiteralValue::Date(text) | LiteralValue::Timestamp(text) => {
            format!("JULIANDAY({})", quoted_string(text))
        }
    })
}

pub fn prepare_parameter(
    ctx: &mut PrepareContext<'_>,
    param: &ParameterExp,
) -> LoweringResult<Snippets> {
    let in_dml = matches!(ctx.scope().kind, StatementKind::Insert | StatementKind::Update);
    if param.name.is_none() && in_dml {
        return Err(LoweringError::internal(format!(
            "parameter {} must be named before INSERT/UPDATE lowering",
            param.index
        )));
    }
    let names = ctx.parameters.bind(param)?;
    Ok(names.into_iter().map(NativeSql::text).collect())
}

/// One snippet per physical column of the referenced property
pub fn prepare_property_name(
    ctx: &mut PrepareContext<'_>,
    prop: &PropertyNameExp,
) -> LoweringResult<Snippets> {
    let class_id = match &prop.target {
        PropertyTarget::Derived { columns } => {
            return Ok(columns
                .iter()
                .map(|column| NativeSql::text(qualified_column(&prop.class_alias, column)))
                .collect());
        }
        PropertyTarget::Class { class_id } => *class_id,
    };

    let access = prop.access_string();
    let class_map = ctx.catalog().class_map(class_id)?;
    let columns = class_map.property(&access);
    if columns.is_empty() {
        let class = ctx.catalog().class(class_id)?;
        return Err(CatalogError::PropertyNotFound {
            class: class.full_name(),
            property: access,
        }
        .into());
    }

    let in_dml = !matches!(ctx.scope().kind, StatementKind::Select);
    Ok(columns
        .into_iter()
        .map(|column| match (&column.source, in_dml) {
            (_, false) => NativeSql::text(qualified_column(&prop.class_alias, &column.view_name)),
            (ColumnSource::Column(name), true) => NativeSql::text(bracketed(name)),
            (ColumnSource::ClassIdConstant(id), true) => NativeSql::text(id.to_string()),
        })
        .collect())
}

pub fn prepare_enum_value(
    ctx: &mut PrepareContext<'_>,
    value: &EnumValueExp,
) -> LoweringResult<Snippets> {
    Ok(vec![NativeSql::text(literal_text(ctx, &value.value)?)])
}

pub fn prepare_binary_value(
    ctx: &mut PrepareContext<'_>,
    binary: &BinaryValueExp,
) -> LoweringResult<Snippets> {
    let (lhs, rhs) = prepare_aligned(ctx, &binary.lhs, &binary.rhs)?;
    let op = binary.op.as_sql();
    Ok(lhs
        .iter()
        .zip(&rhs)
        .map(|(l, r)| {
            let sql = l.clone().with_str(&format!(" {op} ")).with_sql(r);
            if binary.parenthesized {
                sql.parenthesized()
            } else {
                sql
            }
        })
        .collect())
}

pub fn prepare_unary_value(
    ctx: &mut PrepareContext<'_>,
    unary: &UnaryValueExp,
) -> LoweringResult<Snippets> {
    let operand = prepare_exp(ctx, &unary.operand)?;
    Ok(operand
        .iter()
        .map(|snippet| NativeSql::text(unary.op.as_sql()).with_sql(snippet))
        .collect())
}

pub fn prepare_case(ctx: &mut PrepareContext<'_>, case: &CaseExp) -> LoweringResult<Snippets> {
    let mut sql = NativeSql::text("CASE");
    for branch in &case.whens {
        let when = prepare_single(ctx, &branch.when, "CASE WHEN condition")?;
        let then = prepare_single(ctx, &branch.then, "CASE THEN value")?;
        sql.push_str(" WHEN ");
        sql.push_sql(&when);
        sql.push_str(" THEN ");
        sql.push_sql(&then);
    }
    if let Some(otherwise) = &case.otherwise {
        let otherwise = prepare_single(ctx, otherwise, "CASE ELSE value")?;
        sql.push_str(" ELSE ");
        sql.push_sql(&otherwise);
    }
    sql.push_str(" END");
    Ok(vec![sql])
}

pub fn prepare_iif(ctx: &mut PrepareContext<'_>, iif: &IifExp) -> LoweringResult<Snippets> {
    let condition = prepare_single(ctx, &iif.condition, "IIF condition")?;
    let then = prepare_single(ctx, &iif.then, "IIF value")?;
    let otherwise = prepare_single(ctx, &iif.otherwise, "IIF value")?;
    Ok(vec![
        NativeSql::text("IIF(")
            .with_sql(&condition)
            .with_str(",")
            .with_sql(&then)
            .with_str(",")
            .with_sql(&otherwise)
            .with_str(")"),
    ])
}

/// `extract_prop([a].[ECClassId],[a].[ECInstanceId],'path')`
pub fn prepare_extract_property(
    _ctx: &mut PrepareContext<'_>,
    extract: &ExtractPropertyExp,
) -> LoweringResult<Snippets> {
    let alias = &extract.class_alias;
    Ok(vec![NativeSql::text(format!(
        "extract_prop({},{},{})",
        qualified_column(alias, "ECClassId"),
        qualified_column(alias, "ECInstanceId"),
        quoted_string(&extract.access_string)
    ))])
}

/// `extract_inst([a].[ECClassId],[a].[ECInstanceId])`
pub fn prepare_extract_instance(
    _ctx: &mut PrepareContext<'_>,
    extract: &ExtractInstanceExp,
) -> LoweringResult<Snippets> {
    let alias = &extract.class_alias;
    Ok(vec![NativeSql::text(format!(
        "extract_inst({},{})",
        qualified_column(alias, "ECClassId"),
        qualified_column(alias, "ECInstanceId")
    ))])
}

/// Scalar subquery: `(SELECT ...)`
pub fn prepare_subquery(
    ctx: &mut PrepareContext<'_>,
    select: &SelectStatement,
) -> LoweringResult<Snippets> {
    let preparer = ctx.preparer();
    let mut capture = ctx.capture();
    preparer.prepare_select(&mut capture, select)?;
    Ok(vec![capture.finish().parenthesized()])
}

/// `(a,b,c)` as the right operand of `IN`
pub fn prepare_value_list(
    ctx: &mut PrepareContext<'_>,
    values: &[Exp],
) -> LoweringResult<Snippets> {
    let items = values
        .iter()
        .map(|value| prepare_single(ctx, value, "IN list item"))
        .collect::<LoweringResult<Vec<_>>>()?;
    Ok(vec![NativeSql::join(&items, ",").parenthesized()])
}
