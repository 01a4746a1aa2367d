// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # ECSQL Lowering
//!
//! Lowers a typed ECSQL statement tree to native SQL text.
//!
//! ## Overview
//!
//! ```text
//! Statement AST → statement preparers → expression lowering → anchor finalization → SQL
//! ```
//!
//! Every ECSQL value lowers to a *snippet list*, one native SQL fragment per
//! physical column. Points, structs and navigation values fan out to
//! several columns and every operator keeps the fan-outs aligned.
//!
//! Class references in a SELECT read from generated union views over the
//! class hierarchy's tables. `ALL`/`ANY`/`SOME` predicates are rewritten to
//! `[NOT] EXISTS` subqueries through anchors resolved after the walk.
//!
//! ## Error Handling Strategy
//!
//! - **Success**: the statement lowered completely
//! - **InvalidECSql**: a user-fixable error, also reported to the issue sink
//! - **Error**: an internal contract violation or a catalog failure
//!
//! No partial results are produced.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecsql_lowering::{EcSqlLowerer, IssueLog};
//!
//! let lowerer = EcSqlLowerer::new(&catalog);
//! let mut issues = IssueLog::new();
//! let lowered = lowerer.lower(&statement, &mut issues)?;
//! println!("{}", lowered.sql);
//! ```

pub mod boolean;
pub mod cast;
pub mod class_filter;
pub mod class_ref;
pub mod config;
pub mod context;
pub mod error;
pub mod exp;
pub mod function;
pub mod issues;
pub mod navigation;
pub mod parameters;
pub mod property_usage;
pub mod quantifier;
pub mod snippet;
pub mod statement;
pub mod value;
pub mod view;
pub mod window;

pub use config::LoweringConfig;
pub use context::{CaptureGuard, PrepareContext, Scope};
pub use error::{LoweringError, LoweringResult, PrepareStatus};
pub use issues::{ErrorSeverity, Issue, IssueCategory, IssueId, IssueLog, IssueReporter};
pub use parameters::{ParameterBinding, ParameterKey, ParameterMap};
pub use property_usage::PropertyUsage;
pub use snippet::{AnchorId, AnchorTable, NativeSql, Snippets};
pub use statement::{NativeStatementPreparer, StatementPreparer};
pub use view::{DefaultViewGenerator, ViewGenerator};

use ecsql_catalog::SchemaCatalog;
use ecsql_function_registry::FunctionRegistry;
use ecsql_ir::Statement;
use serde::Serialize;
use tracing::debug;

/// Lower one statement with the given context
///
/// On success the parameter map of `ctx` holds the statement's bindings.
/// The context's buffer and anchor table are reset on every exit path so
/// it can prepare the next statement.
pub fn prepare(ctx: &mut PrepareContext<'_>, statement: &Statement) -> LoweringResult<String> {
    let kind = statement.kind();
    debug!(?kind, primary = ctx.is_primary_connection(), "Preparing ECSQL statement");

    if !ctx.is_primary_connection()
        && !matches!(statement, Statement::Select(_) | Statement::CommonTable(_))
    {
        return Err(ctx.invalid(
            IssueId::StatementNotAllowedOnConnection,
            format!("{kind:?} statements are only allowed on the primary connection"),
        ));
    }

    let result = dispatch(ctx, statement).and_then(|()| finalize(ctx));
    match &result {
        Ok(sql) => debug!(%sql, parameters = ctx.parameters().len(), "Prepared ECSQL statement"),
        Err(err) => debug!(
            status = ?err.status(),
            error = %err,
            "ECSQL statement failed to prepare"
        ),
    }
    ctx.reset();
    result
}

fn dispatch(ctx: &mut PrepareContext<'_>, statement: &Statement) -> LoweringResult<()> {
    let preparer = ctx.preparer();
    match statement {
        Statement::Select(select) => preparer.prepare_select(ctx, select),
        Statement::CommonTable(cte) => preparer.prepare_common_table(ctx, cte),
        Statement::Insert(insert) => preparer.prepare_insert(ctx, insert),
        Statement::Update(update) => preparer.prepare_update(ctx, update),
        Statement::Delete(delete) => preparer.prepare_delete(ctx, delete),
    }
}

/// Resolve every anchor in the root buffer and produce the final text
fn finalize(ctx: &mut PrepareContext<'_>) -> LoweringResult<String> {
    if ctx.buffer.depth() != 0 {
        return Err(LoweringError::internal(format!(
            "{} capture frame(s) left open",
            ctx.buffer.depth()
        )));
    }
    let root = ctx.buffer.take_root();
    root.render(&ctx.anchors)
}

/// Result of [`EcSqlLowerer::lower`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredStatement {
    pub sql: String,
    pub parameters: ParameterMap,
}

/// Owns the configuration and function registry for repeated lowering
/// against one catalog
pub struct EcSqlLowerer<'a> {
    catalog: &'a dyn SchemaCatalog,
    config: LoweringConfig,
    functions: FunctionRegistry,
}

impl<'a> EcSqlLowerer<'a> {
    pub fn new(catalog: &'a dyn SchemaCatalog) -> Self {
        Self {
            catalog,
            config: LoweringConfig::default(),
            functions: FunctionRegistry::new(),
        }
    }

    pub fn with_config(mut self, config: LoweringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    /// Lower `statement` on the primary connection
    pub fn lower(
        &self,
        statement: &Statement,
        issues: &mut dyn IssueReporter,
    ) -> LoweringResult<LoweredStatement> {
        let mut ctx = PrepareContext::new(self.catalog, &self.config, &self.functions, issues);
        let sql = prepare(&mut ctx, statement)?;
        Ok(LoweredStatement {
            sql,
            parameters: ctx.parameters.clone(),
        })
    }
}
