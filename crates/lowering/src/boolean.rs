// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Boolean expression lowering
//!
//! Comparisons between multi-column values compare column by column. The
//! pairs are joined with AND for operators that require every component to
//! agree and with OR for their negations, so `P = Q` on two points becomes
//! `(Px = Qx AND Py = Qy AND Pz = Qz)` and `P <> Q` becomes
//! `(Px <> Qx OR Py <> Qy OR Pz <> Qz)`.

use ecsql_ir::{
    BetweenExp, BinaryBooleanExp, BooleanOperator, Exp, LikeExp, SubqueryTestExp,
    SubqueryTestKind, UnaryBooleanExp,
};

use crate::class_filter;
use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};
use crate::exp::{expand_null, prepare_aligned, prepare_exp, prepare_single};
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets};

/// Alignment column of the element parent navigation property. Comparing it
/// with NULL never filters, so the pair is dropped from compound predicates.
const ELIDED_ALIGNMENT_COLUMN: &str = "[Element].[ParentRelECClassId]";

pub fn prepare_binary_boolean(
    ctx: &mut PrepareContext<'_>,
    binary: &BinaryBooleanExp,
) -> LoweringResult<Snippets> {
    if let Exp::TypeList(type_list) = &*binary.rhs {
        let not = match binary.op {
            BooleanOperator::Is => "",
            BooleanOperator::IsNot => "NOT ",
            other => {
                return Err(LoweringError::internal(format!(
                    "type list used with operator {}",
                    other.as_sql()
                )));
            }
        };
        let lhs = prepare_single(ctx, &binary.lhs, "Left operand of IS (type list)")?;
        let filter = class_filter::type_list_filter(ctx, type_list)?;
        let sql = lhs.with_str(&format!(" {not}{filter}"));
        return Ok(vec![wrap(sql, binary.parenthesized)]);
    }

    match binary.op {
        BooleanOperator::And | BooleanOperator::Or => {
            let lhs = prepare_single(ctx, &binary.lhs, "Boolean operand")?;
            let rhs = prepare_single(ctx, &binary.rhs, "Boolean operand")?;
            Ok(vec![wrap(infix(&lhs, binary.op, &rhs), binary.parenthesized)])
        }
        BooleanOperator::In
        | BooleanOperator::NotIn
        | BooleanOperator::Match
        | BooleanOperator::NotMatch => {
            let lhs = prepare_single(ctx, &binary.lhs, "Left operand of IN / MATCH")?;
            let rhs = prepare_single(ctx, &binary.rhs, "Right operand of IN / MATCH")?;
            Ok(vec![wrap(infix(&lhs, binary.op, &rhs), binary.parenthesized)])
        }
        BooleanOperator::Comparison(_) | BooleanOperator::Is | BooleanOperator::IsNot => {
            let (lhs, rhs) = prepare_aligned(ctx, &binary.lhs, &binary.rhs)?;
            Ok(vec![compound_comparison(
                &lhs,
                binary.op,
                &rhs,
                binary.parenthesized,
            )])
        }
    }
}

/// Join aligned column pairs into one predicate
pub(crate) fn compound_comparison(
    lhs: &[NativeSql],
    op: BooleanOperator,
    rhs: &[NativeSql],
    parenthesized: bool,
) -> NativeSql {
    let pairs: Vec<NativeSql> = lhs
        .iter()
        .zip(rhs)
        .filter(|(l, r)| !is_elided_pair(l, r))
        .map(|(l, r)| infix(l, op, r))
        .collect();

    match pairs.len() {
        0 => NativeSql::text("TRUE"),
        1 => wrap(pairs.into_iter().next().unwrap_or_default(), parenthesized),
        _ => {
            let separator = if op.is_negative() { " OR " } else { " AND " };
            NativeSql::join(&pairs, separator).parenthesized()
        }
    }
}

fn is_elided_pair(lhs: &NativeSql, rhs: &NativeSql) -> bool {
    lhs.as_text()
        .is_some_and(|text| text.eq_ignore_ascii_case(ELIDED_ALIGNMENT_COLUMN))
        && matches!(rhs.as_text(), Some("NULL" | "(NULL)"))
}

fn infix(lhs: &NativeSql, op: BooleanOperator, rhs: &NativeSql) -> NativeSql {
    lhs.clone()
        .with_str(&format!(" {} ", op.as_sql()))
        .with_sql(rhs)
}

fn wrap(sql: NativeSql, parenthesized: bool) -> NativeSql {
    if parenthesized { sql.parenthesized() } else { sql }
}

pub fn prepare_unary_boolean(
    ctx: &mut PrepareContext<'_>,
    unary: &UnaryBooleanExp,
) -> LoweringResult<Snippets> {
    let operand = prepare_single(ctx, &unary.operand, "NOT operand")?;
    Ok(vec![wrap(
        NativeSql::text("NOT ").with_sql(&operand),
        unary.parenthesized,
    )])
}

pub fn prepare_between(
    ctx: &mut PrepareContext<'_>,
    between: &BetweenExp,
) -> LoweringResult<Snippets> {
    let operand = prepare_exp(ctx, &between.operand)?;
    let lower = bound_snippets(ctx, &between.lower, operand.len())?;
    let upper = bound_snippets(ctx, &between.upper, operand.len())?;

    if lower.len() != operand.len() || upper.len() != operand.len() {
        return Err(ctx.invalid(
            IssueId::InvalidBetweenOperands,
            format!(
                "BETWEEN operands have different column counts ({}, {}, {})",
                operand.len(),
                lower.len(),
                upper.len()
            ),
        ));
    }

    let keyword = if between.negated { " NOT BETWEEN " } else { " BETWEEN " };
    let terms: Vec<NativeSql> = operand
        .iter()
        .zip(lower.iter().zip(&upper))
        .map(|(op, (lo, hi))| {
            op.clone()
                .with_str(keyword)
                .with_sql(lo)
                .with_str(" AND ")
                .with_sql(hi)
        })
        .collect();

    let sql = if terms.len() == 1 {
        terms.into_iter().next().unwrap_or_default()
    } else {
        let separator = if between.negated { " OR " } else { " AND " };
        NativeSql::join(&terms, separator).parenthesized()
    };
    Ok(vec![sql])
}

fn bound_snippets(
    ctx: &mut PrepareContext<'_>,
    bound: &Exp,
    operand_columns: usize,
) -> LoweringResult<Snippets> {
    if bound.is_null_literal() {
        return Ok(expand_null(bound, operand_columns));
    }
    prepare_exp(ctx, bound)
}

pub fn prepare_like(ctx: &mut PrepareContext<'_>, like: &LikeExp) -> LoweringResult<Snippets> {
    let operand = prepare_single(ctx, &like.operand, "LIKE operand")?;
    let pattern = prepare_single(ctx, &like.pattern, "LIKE pattern")?;

    let keyword = if like.negated { " NOT LIKE " } else { " LIKE " };
    let mut sql = operand.with_str(keyword).with_sql(&pattern);
    if let Some(escape) = &like.escape {
        let escape = prepare_single(ctx, escape, "LIKE escape")?;
        sql.push_str(" ESCAPE ");
        sql.push_sql(&escape);
    }
    Ok(vec![sql])
}

pub fn prepare_subquery_test(
    ctx: &mut PrepareContext<'_>,
    test: &SubqueryTestExp,
) -> LoweringResult<Snippets> {
    if test.kind == SubqueryTestKind::Unique {
        return Err(ctx.invalid(
            IssueId::UniqueSubqueryUnsupported,
            "UNIQUE subquery tests are not supported",
        ));
    }

    let preparer = ctx.preparer();
    let mut capture = ctx.capture();
    preparer.prepare_select(&mut capture, &test.subquery)?;
    let subquery = capture.finish();
    Ok(vec![NativeSql::text("EXISTS").with_sql(&subquery.parenthesized())])
}
