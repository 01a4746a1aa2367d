// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Window function lowering

use ecsql_function_registry::FunctionKind;
use ecsql_ir::{
    Exp, FrameBound, FrameExclusion, FrameExtent, FrameStart, WindowDefinition, WindowFrame,
    WindowFunctionExp, WindowOver, WindowSpec,
};

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::exp::{prepare_exp, prepare_single};
use crate::function::{CallSite, prepare_function_call};
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets, bracketed};
use crate::statement::order_by_list;

/// `fn(args) [FILTER(WHERE ...)] OVER (...)`
pub fn prepare_window_function(
    ctx: &mut PrepareContext<'_>,
    window: &WindowFunctionExp,
) -> LoweringResult<Snippets> {
    let def = ctx.functions().get_function(&window.function.name);
    if let Some(def) =
        def.filter(|def| matches!(def.kind, FunctionKind::Scalar | FunctionKind::TableValued))
    {
        return Err(ctx.invalid(
            IssueId::NotAWindowFunction,
            format!("'{}' cannot be used with OVER", def.name),
        ));
    }

    let call = prepare_function_call(ctx, &window.function, CallSite::Window)?;
    let mut sql = call.call;

    if let Some(filter) = &window.filter {
        let filter = prepare_single(ctx, filter, "Window FILTER condition")?;
        sql.push_str(" FILTER(WHERE ");
        sql.push_sql(&filter);
        sql.push_str(")");
    }

    sql.push_str(" OVER ");
    match &window.over {
        WindowOver::Spec(spec) => {
            let spec = prepare_window_spec(ctx, spec)?;
            sql.push_sql(&spec.parenthesized());
        }
        WindowOver::Name(name) => sql.push_str(&bracketed(name)),
    }
    sql.push_str(call.suffix);
    Ok(vec![sql])
}

/// `WINDOW [w] AS (...),[v] AS (...)`
pub fn prepare_window_clause(
    ctx: &mut PrepareContext<'_>,
    definitions: &[WindowDefinition],
) -> LoweringResult<NativeSql> {
    let mut sql = NativeSql::text("WINDOW ");
    for (i, definition) in definitions.iter().enumerate() {
        if i > 0 {
            sql.push_str(",");
        }
        let spec = prepare_window_spec(ctx, &definition.spec)?;
        sql.push_str(&format!("{} AS ", bracketed(&definition.name)));
        sql.push_sql(&spec.parenthesized());
    }
    Ok(sql)
}

/// Body of a window specification, without the parentheses
pub fn prepare_window_spec(
    ctx: &mut PrepareContext<'_>,
    spec: &WindowSpec,
) -> LoweringResult<NativeSql> {
    let mut parts: Vec<NativeSql> = Vec::new();

    if let Some(base) = &spec.base_window {
        parts.push(NativeSql::text(bracketed(base)));
    }

    if !spec.partition_by.is_empty() {
        let mut columns = Vec::new();
        for column in &spec.partition_by {
            if !matches!(
                column.exp,
                Exp::PropertyName(_)
                    | Exp::EnumValue(_)
                    | Exp::ExtractProperty(_)
                    | Exp::ExtractInstance(_)
            ) {
                return Err(ctx.invalid(
                    IssueId::InvalidPartitionColumn,
                    "PARTITION BY accepts property references only",
                ));
            }
            for snippet in prepare_exp(ctx, &column.exp)? {
                columns.push(match column.collation {
                    Some(collation) => {
                        snippet.with_str(&format!(" COLLATE {}", collation.as_sql()))
                    }
                    None => snippet,
                });
            }
        }
        parts.push(NativeSql::text("PARTITION BY ").with_sql(&NativeSql::join(&columns, ",")));
    }

    if !spec.order_by.is_empty() {
        let order_by = order_by_list(ctx, &spec.order_by)?;
        parts.push(NativeSql::text("ORDER BY ").with_sql(&order_by));
    }

    if let Some(frame) = &spec.frame {
        parts.push(prepare_frame(ctx, frame)?);
    }

    Ok(NativeSql::join(&parts, " "))
}

fn prepare_frame(ctx: &mut PrepareContext<'_>, frame: &WindowFrame) -> LoweringResult<NativeSql> {
    let mut sql = NativeSql::text(frame.unit.as_sql()).with_str(" ");

    match &frame.extent {
        FrameExtent::Start(start) => {
            let start = match start {
                FrameStart::CurrentRow => NativeSql::text("CURRENT ROW"),
                FrameStart::UnboundedPreceding => NativeSql::text("UNBOUNDED PRECEDING"),
                FrameStart::Preceding(value) => {
                    prepare_single(ctx, value, "Frame offset")?.with_str(" PRECEDING")
                }
            };
            sql.push_sql(&start);
        }
        FrameExtent::Between { first, second } => {
            if matches!(first, FrameBound::UnboundedFollowing)
                || matches!(second, FrameBound::UnboundedPreceding)
                || bound_rank(first) > bound_rank(second)
            {
                return Err(ctx.invalid(
                    IssueId::InvalidFrameBound,
                    "Window frame starts after it ends",
                ));
            }
            let first = prepare_bound(ctx, first)?;
            let second = prepare_bound(ctx, second)?;
            sql.push_str("BETWEEN ");
            sql.push_sql(&first);
            sql.push_str(" AND ");
            sql.push_sql(&second);
        }
    }

    if let Some(exclusion) = frame.exclusion {
        sql.push_str(match exclusion {
            FrameExclusion::CurrentRow | FrameExclusion::Ties => " EXCLUDE CURRENT ROW",
            FrameExclusion::Group => " EXCLUDE GROUP",
            FrameExclusion::NoOthers => " EXCLUDE NO OTHERS",
        });
    }
    Ok(sql)
}

fn prepare_bound(ctx: &mut PrepareContext<'_>, bound: &FrameBound) -> LoweringResult<NativeSql> {
    Ok(match bound {
        FrameBound::CurrentRow => NativeSql::text("CURRENT ROW"),
        FrameBound::UnboundedPreceding => NativeSql::text("UNBOUNDED PRECEDING"),
        FrameBound::UnboundedFollowing => NativeSql::text("UNBOUNDED FOLLOWING"),
        FrameBound::Preceding(value) => {
            prepare_single(ctx, value, "Frame offset")?.with_str(" PRECEDING")
        }
        FrameBound::Following(value) => {
            prepare_single(ctx, value, "Frame offset")?.with_str(" FOLLOWING")
        }
    })
}

/// Position of a bound on the frame axis
fn bound_rank(bound: &FrameBound) -> u8 {
    match bound {
        FrameBound::UnboundedPreceding => 0,
        FrameBound::Preceding(_) => 1,
        FrameBound::CurrentRow => 2,
        FrameBound::Following(_) => 3,
        FrameBound::UnboundedFollowing => 4,
    }
}
