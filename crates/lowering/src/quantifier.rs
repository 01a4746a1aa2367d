// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! ALL / ANY / SOME rewriting
//!
//! `x >= ALL (SELECT y FROM T WHERE w)` becomes
//! `NOT EXISTS (SELECT y FROM T WHERE (w) AND x < y)` and
//! `x = ANY (SELECT y FROM T)` becomes `EXISTS (SELECT y FROM T WHERE x = y)`.
//!
//! The predicate references the subquery's own select-list columns, so the
//! subquery is lowered first with an anchor standing in for its WHERE
//! clause. The select preparer records the select-list snippets and the
//! original WHERE in the anchor table; the anchor is resolved here once
//! the predicate can be built.

use ecsql_ir::{AllOrAnyExp, Quantifier};
use tracing::trace;

use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};
use crate::exp::prepare_exp;
use crate::issues::IssueId;
use crate::snippet::{CapturedSelect, NativeSql, Snippets};

pub fn prepare_all_or_any(
    ctx: &mut PrepareContext<'_>,
    exp: &AllOrAnyExp,
) -> LoweringResult<Snippets> {
    if exp.subquery.is_compound() {
        return Err(ctx.invalid(
            IssueId::CompoundQuantifiedSubquery,
            "ALL/ANY/SOME requires a single SELECT, not a compound select",
        ));
    }

    let operand = prepare_exp(ctx, &exp.operand)?;

    let anchor = ctx.anchors.reserve();
    ctx.set_pending_quantifier(anchor);
    let preparer = ctx.preparer();
    let subquery = {
        let mut capture = ctx.capture();
        preparer.prepare_select(&mut capture, &exp.subquery)?;
        capture.finish()
    };
    if ctx.take_pending_quantifier().is_some() {
        return Err(LoweringError::internal(
            "quantified subquery was lowered without taking its anchor",
        ));
    }

    let captured = ctx.anchors.take_capture(anchor)?;
    let where_clause = quantified_where(&operand, exp, captured)?;
    trace!(anchor = %anchor, predicate = %where_clause, "Rewrote quantified subquery");
    ctx.anchors.resolve(anchor, where_clause)?;

    let keyword = match exp.quantifier {
        Quantifier::All => "NOT EXISTS",
        Quantifier::Any | Quantifier::Some => "EXISTS",
    };
    Ok(vec![NativeSql::text(keyword).with_sql(&subquery.parenthesized())])
}

/// Text that replaces the anchor, i.e. everything after `WHERE `
fn quantified_where(
    operand: &[NativeSql],
    exp: &AllOrAnyExp,
    captured: CapturedSelect,
) -> LoweringResult<NativeSql> {
    let columns = &captured.select_columns;
    let (op, separator) = match exp.quantifier {
        Quantifier::All => (exp.op.negate(), " AND "),
        Quantifier::Any | Quantifier::Some => (exp.op, " OR "),
    };
    let compare = |lhs: &NativeSql, rhs: &NativeSql| {
        lhs.clone()
            .with_str(&format!(" {} ", op.as_sql()))
            .with_sql(rhs)
    };

    let predicates: Vec<NativeSql> = match (operand.len(), columns.len()) {
        (_, 0) => {
            return Err(LoweringError::internal(
                "quantified subquery has an empty select list",
            ));
        }
        (n, m) if n == m => operand
            .iter()
            .zip(columns)
            .map(|(lhs, rhs)| compare(lhs, rhs))
            .collect(),
        (1, _) => columns.iter().map(|rhs| compare(&operand[0], rhs)).collect(),
        (n, m) => {
            return Err(LoweringError::internal(format!(
                "quantified operand has {n} columns, subquery selects {m}"
            )));
        }
    };

    let mut predicate = NativeSql::join(&predicates, separator);
    if predicates.len() > 1 && exp.quantifier != Quantifier::All {
        predicate = predicate.parenthesized();
    }

    Ok(match captured.original_where {
        Some(original) => original.parenthesized().with_str(" AND ").with_sql(&predicate),
        None => predicate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsql_ir::{ComparisonOperator, Exp, SelectStatement, SingleSelect};

    fn quantified(op: ComparisonOperator, quantifier: Quantifier) -> AllOrAnyExp {
        AllOrAnyExp {
            operand: Box::new(Exp::null()),
            op,
            quantifier,
            subquery: Box::new(SelectStatement::single(SingleSelect::default())),
        }
    }

    #[test]
    fn test_all_uses_negated_operator_and_guard() {
        let exp = quantified(ComparisonOperator::Ge, Quantifier::All);
        let captured = CapturedSelect {
            select_columns: vec!["[t].[y]".into()],
            original_where: Some("[t].[y] > 0".into()),
        };
        let sql = quantified_where(&["[w].[x]".into()], &exp, captured).unwrap();
        assert_eq!(sql.as_text(), Some("([t].[y] > 0) AND [w].[x] < [t].[y]"));
    }

    #[test]
    fn test_any_ors_columns() {
        let exp = quantified(ComparisonOperator::Eq, Quantifier::Any);
        let captured = CapturedSelect {
            select_columns: vec!["[t].[a]".into(), "[t].[b]".into()],
            original_where: None,
        };
        let sql = quantified_where(&["?".into()], &exp, captured).unwrap();
        assert_eq!(sql.as_text(), Some("(? = [t].[a] OR ? = [t].[b])"));
    }

    #[test]
    fn test_column_count_mismatch_is_internal() {
        let exp = quantified(ComparisonOperator::Eq, Quantifier::Some);
        let captured = CapturedSelect {
            select_columns: vec!["a".into(), "b".into(), "c".into()],
            original_where: None,
        };
        let err = quantified_where(&["x".into(), "y".into()], &exp, captured).unwrap_err();
        assert!(err.is_internal());
    }
}
