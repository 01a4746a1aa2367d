// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use ecsql_ir::CommonTableStatement;

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::snippet::bracketed;

/// `WITH [RECURSIVE] [name]([col],...) AS (SELECT ...),... SELECT ...`
pub(super) fn prepare_common_table(
    ctx: &mut PrepareContext<'_>,
    statement: &CommonTableStatement,
) -> LoweringResult<()> {
    let preparer = ctx.preparer();
    ctx.buffer_mut().append_str(if statement.recursive {
        "WITH RECURSIVE "
    } else {
        "WITH "
    });

    for (i, block) in statement.blocks.iter().enumerate() {
        let mut header = String::new();
        if i > 0 {
            header.push(',');
        }
        header.push_str(&bracketed(&block.name));
        if !block.columns.is_empty() {
            let columns: Vec<String> = block.columns.iter().map(|c| bracketed(c)).collect();
            header.push_str(&format!("({})", columns.join(",")));
        }
        header.push_str(" AS (");
        ctx.buffer_mut().append_str(&header);
        preparer.prepare_select(ctx, &block.select)?;
        ctx.buffer_mut().append_str(")");
    }

    ctx.buffer_mut().append_str(" ");
    preparer.prepare_select(ctx, &statement.select)
}
