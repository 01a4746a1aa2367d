// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! CAST lowering
//!
//! A NULL operand yields one `NULL` per physical column of the target type.
//! Anything else is cast with a per-target template and must occupy as many
//! columns as the target type, so a scalar never casts to a point.

use ecsql_ir::{CastExp, PrimitiveType, TypeInfo};

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::exp::{expand_null, prepare_exp};
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets};

pub fn prepare_cast(ctx: &mut PrepareContext<'_>, cast: &CastExp) -> LoweringResult<Snippets> {
    if cast.operand.is_null_literal() {
        return Ok(expand_null(&cast.operand, cast.target.column_count()));
    }

    let Some(target) = cast.target.as_primitive() else {
        return Err(ctx.invalid(
            IssueId::UnsupportedCastTarget,
            format!("CAST target {:?} must be a primitive type", cast.target),
        ));
    };

    let operand = prepare_exp(ctx, &cast.operand)?;
    let target_columns = cast.target.column_count();
    if operand.len() != target_columns {
        return Err(ctx.invalid(
            IssueId::UnsupportedCastTarget,
            format!(
                "Cannot cast a {}-column value to {}, which has {target_columns} columns",
                operand.len(),
                target.name()
            ),
        ));
    }
    if !needs_cast(&cast.operand.type_info(), target) {
        return Ok(operand);
    }

    Ok(operand.iter().map(|snippet| cast_snippet(snippet, target)).collect())
}

fn needs_cast(operand: &TypeInfo, target: PrimitiveType) -> bool {
    operand.as_primitive() != Some(target)
}

fn cast_snippet(snippet: &NativeSql, target: PrimitiveType) -> NativeSql {
    let native = match target {
        PrimitiveType::Boolean => {
            return NativeSql::text("CASE WHEN ")
                .with_sql(snippet)
                .with_str("<>0 THEN 1 ELSE 0 END");
        }
        PrimitiveType::Binary | PrimitiveType::IGeometry => "BLOB",
        PrimitiveType::DateTime => "TIMESTAMP",
        PrimitiveType::Double | PrimitiveType::Point2d | PrimitiveType::Point3d => "REAL",
        PrimitiveType::Integer | PrimitiveType::Long => "INTEGER",
        PrimitiveType::String => "TEXT",
    };
    NativeSql::text("CAST(")
        .with_sql(snippet)
        .with_str(&format!(" AS {native})"))
}
