// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Function call lowering
//!
//! Names are resolved against the [`FunctionRegistry`]; functions the
//! registry does not know pass through under their ECSQL name.
//!
//! [`FunctionRegistry`]: ecsql_function_registry::FunctionRegistry

use ecsql_function_registry::{FunctionKind, FunctionRewrite};
use ecsql_ir::FunctionCallExp;
use tracing::trace;

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::exp::prepare_single;
use crate::issues::IssueId;
use crate::snippet::NativeSql;

/// Where a function call appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    /// Ordinary value expression
    Expression,
    /// Function of a window function expression (has an OVER clause)
    Window,
    /// Table-valued function in FROM
    From,
}

/// A lowered call, split so a window clause can go between the call and
/// the predicate suffix of an aggregate rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredCall {
    pub call: NativeSql,
    pub suffix: &'static str,
}

impl LoweredCall {
    pub fn into_sql(self) -> NativeSql {
        self.call.with_str(self.suffix)
    }
}

pub fn prepare_function_call(
    ctx: &mut PrepareContext<'_>,
    call: &FunctionCallExp,
    site: CallSite,
) -> LoweringResult<LoweredCall> {
    if ctx.config().is_function_disabled(&call.name) {
        return Err(ctx.invalid(
            IssueId::DisabledFunction,
            format!("Function '{}' is disabled", call.name),
        ));
    }

    let def = ctx.functions().get_function(&call.name);
    let mut name = call.name.as_str();
    let mut rewrite = FunctionRewrite::None;

    if let Some(def) = def {
        match (def.kind, site) {
            (FunctionKind::Window, CallSite::Expression | CallSite::From) => {
                return Err(ctx.invalid(
                    IssueId::WindowFunctionWithoutOver,
                    format!("Window function '{}' requires an OVER clause", def.name),
                ));
            }
            (FunctionKind::TableValued, CallSite::Expression | CallSite::Window) => {
                return Err(ctx.invalid(
                    IssueId::TableValuedFunctionOutsideFrom,
                    format!("Table-valued function '{}' is only valid in FROM", def.name),
                ));
            }
            _ => {}
        }

        let arg_count = if call.star_arg { 1 } else { call.args.len() };
        if !def.accepts_arg_count(arg_count) {
            return Err(ctx.invalid(
                IssueId::InvalidFunctionArguments,
                format!(
                    "Function '{}' does not accept {arg_count} argument(s)",
                    def.name
                ),
            ));
        }
        name = def.name;
        rewrite = def.rewrite;
    }

    match rewrite {
        FunctionRewrite::JulianDay => {
            trace!(function = name, "Wrapping in JULIANDAY");
            Ok(LoweredCall {
                call: NativeSql::text(format!("JULIANDAY({name})")),
                suffix: "",
            })
        }
        FunctionRewrite::AggregatePredicate { native } => {
            trace!(function = name, native, "Rewriting aggregate predicate");
            Ok(LoweredCall {
                call: prepare_call_text(ctx, native, call)?,
                suffix: "<>0",
            })
        }
        FunctionRewrite::None => Ok(LoweredCall {
            call: prepare_call_text(ctx, name, call)?,
            suffix: "",
        }),
    }
}

/// `name([DISTINCT ]arg,...)`, each argument a single column
fn prepare_call_text(
    ctx: &mut PrepareContext<'_>,
    name: &str,
    call: &FunctionCallExp,
) -> LoweringResult<NativeSql> {
    let mut sql = NativeSql::text(format!("{name}({}", call.set_quantifier.prefix()));
    if call.star_arg {
        sql.push_str("*");
    } else {
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                sql.push_str(",");
            }
            let context = format!("Argument {} of function '{}'", i + 1, call.name);
            let arg = prepare_single(ctx, arg, &context)?;
            sql.push_sql(&arg);
        }
    }
    sql.push_str(")");
    Ok(sql)
}
