// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-statement preparers
//!
//! Each preparer appends the native text of one statement body to the
//! context's current buffer frame and calls back into expression lowering
//! for every sub-expression. Embedders can substitute their own preparers
//! through [`StatementPreparer`].

mod cte;
mod dml;
mod select;

use ecsql_ir::{
    CommonTableStatement, DeleteStatement, InsertStatement, SelectStatement, UpdateStatement,
};

use crate::context::PrepareContext;
use crate::error::LoweringResult;

pub(crate) use select::order_by_list;

pub trait StatementPreparer {
    fn prepare_select(
        &self,
        ctx: &mut PrepareContext<'_>,
        select: &SelectStatement,
    ) -> LoweringResult<()>;

    fn prepare_common_table(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &CommonTableStatement,
    ) -> LoweringResult<()>;

    fn prepare_insert(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &InsertStatement,
    ) -> LoweringResult<()>;

    fn prepare_update(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &UpdateStatement,
    ) -> LoweringResult<()>;

    fn prepare_delete(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &DeleteStatement,
    ) -> LoweringResult<()>;
}

/// Preparers emitting SQLite-flavoured native SQL
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeStatementPreparer;

impl StatementPreparer for NativeStatementPreparer {
    fn prepare_select(
        &self,
        ctx: &mut PrepareContext<'_>,
        select: &SelectStatement,
    ) -> LoweringResult<()> {
        select::prepare_select(ctx, select)
    }

    fn prepare_common_table(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &CommonTableStatement,
    ) -> LoweringResult<()> {
        cte::prepare_common_table(ctx, statement)
    }

    fn prepare_insert(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &InsertStatement,
    ) -> LoweringResult<()> {
        dml::prepare_insert(ctx, statement)
    }

    fn prepare_update(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &UpdateStatement,
    ) -> LoweringResult<()> {
        dml::prepare_update(ctx, statement)
    }

    fn prepare_delete(
        &self,
        ctx: &mut PrepareContext<'_>,
        statement: &DeleteStatement,
    ) -> LoweringResult<()> {
        dml::prepare_delete(ctx, statement)
    }
}
