// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression dispatcher
//!
//! Every expression kind lowers to a snippet list. The dispatcher is an
//! exhaustive match over [`Exp`]; each arm delegates to the module that
//! owns that kind.

use ecsql_ir::Exp;

use crate::boolean;
use crate::cast;
use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};
use crate::function::{self, CallSite};
use crate::issues::IssueId;
use crate::navigation;
use crate::quantifier;
use crate::snippet::{NativeSql, Snippets};
use crate::value;
use crate::window;

/// Lower one expression to its snippet list
pub fn prepare_exp(ctx: &mut PrepareContext<'_>, exp: &Exp) -> LoweringResult<Snippets> {
    ctx.enter_expression()?;
    let result = dispatch(ctx, exp);
    ctx.exit_expression();
    result
}

fn dispatch(ctx: &mut PrepareContext<'_>, exp: &Exp) -> LoweringResult<Snippets> {
    match exp {
        Exp::Literal(lit) => value::prepare_literal(ctx, lit),
        Exp::Parameter(param) => value::prepare_parameter(ctx, param),
        Exp::PropertyName(prop) => value::prepare_property_name(ctx, prop),
        Exp::EnumValue(value) => value::prepare_enum_value(ctx, value),
        Exp::Cast(cast) => cast::prepare_cast(ctx, cast),
        Exp::BinaryValue(binary) => value::prepare_binary_value(ctx, binary),
        Exp::UnaryValue(unary) => value::prepare_unary_value(ctx, unary),
        Exp::FunctionCall(call) => {
            function::prepare_function_call(ctx, call, CallSite::Expression)
                .map(|call| vec![call.into_sql()])
        }
        Exp::Case(case) => value::prepare_case(ctx, case),
        Exp::Iif(iif) => value::prepare_iif(ctx, iif),
        Exp::NavValueCreation(nav) => navigation::prepare_nav_value_creation(ctx, nav),
        Exp::ExtractProperty(extract) => value::prepare_extract_property(ctx, extract),
        Exp::ExtractInstance(extract) => value::prepare_extract_instance(ctx, extract),
        Exp::Subquery(select) => value::prepare_subquery(ctx, select),
        Exp::ValueList(values) => value::prepare_value_list(ctx, values),
        Exp::TypeList(_) => Err(LoweringError::internal(
            "type list is only valid as the right operand of IS / IS NOT",
        )),
        Exp::WindowFunction(window) => window::prepare_window_function(ctx, window),
        Exp::BinaryBoolean(binary) => boolean::prepare_binary_boolean(ctx, binary),
        Exp::UnaryBoolean(unary) => boolean::prepare_unary_boolean(ctx, unary),
        Exp::Between(between) => boolean::prepare_between(ctx, between),
        Exp::Like(like) => boolean::prepare_like(ctx, like),
        Exp::AllOrAny(quantified) => quantifier::prepare_all_or_any(ctx, quantified),
        Exp::SubqueryTest(test) => boolean::prepare_subquery_test(ctx, test),
    }
}

/// Lower an expression that must occupy exactly one native column
pub fn prepare_single(
    ctx: &mut PrepareContext<'_>,
    exp: &Exp,
    context: &str,
) -> LoweringResult<NativeSql> {
    let mut snippets = prepare_exp(ctx, exp)?;
    match snippets.len() {
        0 => Err(LoweringError::internal(format!(
            "{context} lowered to an empty snippet list"
        ))),
        1 => Ok(snippets.remove(0)),
        n => Err(ctx.invalid(
            IssueId::MultiColumnOperand,
            format!("{context} must be a single-column value, found {n} columns"),
        )),
    }
}

/// Lower both operands of a binary operator and align their lengths
///
/// A NULL literal on one side is expanded to as many `NULL` snippets as the
/// other side has columns.
pub fn prepare_aligned(
    ctx: &mut PrepareContext<'_>,
    lhs: &Exp,
    rhs: &Exp,
) -> LoweringResult<(Snippets, Snippets)> {
    let lhs_snippets = prepare_exp(ctx, lhs)?;
    let rhs_snippets = prepare_exp(ctx, rhs)?;
    align_null_operand(lhs, lhs_snippets, rhs, rhs_snippets)
}

pub(crate) fn align_null_operand(
    lhs: &Exp,
    lhs_snippets: Snippets,
    rhs: &Exp,
    rhs_snippets: Snippets,
) -> LoweringResult<(Snippets, Snippets)> {
    let (lhs_snippets, rhs_snippets) = if lhs.is_null_literal() && !rhs.is_null_literal() {
        (expand_null(lhs, rhs_snippets.len()), rhs_snippets)
    } else if rhs.is_null_literal() && !lhs.is_null_literal() {
        let expanded = expand_null(rhs, lhs_snippets.len());
        (lhs_snippets, expanded)
    } else {
        (lhs_snippets, rhs_snippets)
    };

    if lhs_snippets.len() != rhs_snippets.len() {
        return Err(LoweringError::internal(format!(
            "operand snippet counts differ: {} vs {}",
            lhs_snippets.len(),
            rhs_snippets.len()
        )));
    }
    Ok((lhs_snippets, rhs_snippets))
}

/// `count` NULL snippets, parenthesized if the literal was
pub(crate) fn expand_null(null: &Exp, count: usize) -> Snippets {
    let text = if null.has_parentheses() { "(NULL)" } else { "NULL" };
    (0..count).map(|_| NativeSql::text(text)).collect()
}
