// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Preparation context for one prepare call
//!
//! The context owns the output buffer, the anchor table, the parameter map
//! and the scope stack, and borrows the collaborators (catalog,
//! configuration, function registry, issue sink, statement preparers, view
//! generator). It is created per statement and passed down by `&mut`.

use std::ops::{Deref, DerefMut};

use ecsql_catalog::SchemaCatalog;
use ecsql_function_registry::FunctionRegistry;
use ecsql_ir::StatementKind;
use tracing::warn;

use crate::config::LoweringConfig;
use crate::error::{LoweringError, LoweringResult};
use crate::issues::{ErrorSeverity, Issue, IssueId, IssueReporter};
use crate::parameters::ParameterMap;
use crate::snippet::{AnchorId, AnchorTable, NativeSql, SqlBuffer};
use crate::statement::{NativeStatementPreparer, StatementPreparer};
use crate::view::{DefaultViewGenerator, ViewGenerator};

/// One level of the scope stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub kind: StatementKind,
    /// Top-level select (or DML) of the statement
    pub is_root: bool,
    /// Select-list items get `[alias]` column names
    pub derived_aliases: bool,
    /// The enclosing single select has a FROM clause
    pub has_from: bool,
}

impl Scope {
    pub fn root(kind: StatementKind) -> Self {
        Self {
            kind,
            is_root: true,
            derived_aliases: true,
            has_from: true,
        }
    }
}

/// Context for tracking state during lowering
pub struct PrepareContext<'a> {
    catalog: &'a dyn SchemaCatalog,
    config: &'a LoweringConfig,
    functions: &'a FunctionRegistry,
    issues: &'a mut dyn IssueReporter,
    preparer: &'a dyn StatementPreparer,
    views: &'a dyn ViewGenerator,
    primary_connection: bool,

    pub(crate) buffer: SqlBuffer,
    pub(crate) anchors: AnchorTable,
    pub(crate) parameters: ParameterMap,
    scopes: Vec<Scope>,
    /// Next subquery captured whose WHERE becomes a quantifier anchor
    pending_quantifier: Option<AnchorId>,
    /// Current expression nesting depth
    depth: usize,
}

impl<'a> PrepareContext<'a> {
    /// Create a new context with the default preparers and view generator
    pub fn new(
        catalog: &'a dyn SchemaCatalog,
        config: &'a LoweringConfig,
        functions: &'a FunctionRegistry,
        issues: &'a mut dyn IssueReporter,
    ) -> Self {
        Self {
            catalog,
            config,
            functions,
            issues,
            preparer: &NativeStatementPreparer,
            views: &DefaultViewGenerator,
            primary_connection: true,
            buffer: SqlBuffer::default(),
            anchors: AnchorTable::default(),
            parameters: ParameterMap::default(),
            scopes: Vec::new(),
            pending_quantifier: None,
            depth: 0,
        }
    }

    /// Substitute the per-statement preparers
    pub fn with_preparer(mut self, preparer: &'a dyn StatementPreparer) -> Self {
        self.preparer = preparer;
        self
    }

    /// Substitute the class view generator
    pub fn with_view_generator(mut self, views: &'a dyn ViewGenerator) -> Self {
        self.views = views;
        self
    }

    /// The statement reads from a connection other than the primary one
    pub fn on_secondary_connection(mut self) -> Self {
        self.primary_connection = false;
        self
    }

    pub fn catalog(&self) -> &'a dyn SchemaCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a LoweringConfig {
        self.config
    }

    pub fn functions(&self) -> &'a FunctionRegistry {
        self.functions
    }

    pub fn preparer(&self) -> &'a dyn StatementPreparer {
        self.preparer
    }

    pub fn views(&self) -> &'a dyn ViewGenerator {
        self.views
    }

    pub fn is_primary_connection(&self) -> bool {
        self.primary_connection
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn buffer_mut(&mut self) -> &mut SqlBuffer {
        &mut self.buffer
    }

    /// Report an invalid-ECSQL issue and build the matching error
    pub fn invalid(&mut self, issue: IssueId, message: impl Into<String>) -> LoweringError {
        let message = message.into();
        warn!(issue = ?issue, code = issue.code(), %message, "Invalid ECSQL");
        self.issues.report(Issue {
            severity: ErrorSeverity::Error,
            category: issue.category(),
            id: issue,
            message: message.clone(),
        });
        LoweringError::InvalidECSql { issue, message }
    }

    /// Current scope; an empty stack reads as a root select
    pub fn scope(&self) -> Scope {
        self.scopes
            .last()
            .copied()
            .unwrap_or(Scope::root(StatementKind::Select))
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Run `f` with `scope` pushed; the scope is popped on every exit path
    pub fn with_scope<T>(
        &mut self,
        scope: Scope,
        f: impl FnOnce(&mut Self) -> LoweringResult<T>,
    ) -> LoweringResult<T> {
        self.scopes.push(scope);
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Start capturing output into a fresh buffer frame
    pub fn capture(&mut self) -> CaptureGuard<'_, 'a> {
        self.buffer.push_frame();
        CaptureGuard {
            ctx: self,
            finished: false,
        }
    }

    pub(crate) fn set_pending_quantifier(&mut self, anchor: AnchorId) {
        self.pending_quantifier = Some(anchor);
    }

    pub(crate) fn take_pending_quantifier(&mut self) -> Option<AnchorId> {
        self.pending_quantifier.take()
    }

    /// Enter one level of expression nesting
    pub(crate) fn enter_expression(&mut self) -> LoweringResult<()> {
        self.depth += 1;
        if self.depth > self.config.max_expression_depth {
            let limit = self.config.max_expression_depth;
            self.depth -= 1;
            return Err(self.invalid(
                IssueId::ExpressionTooDeep,
                format!("Expression nesting exceeds the limit of {limit}"),
            ));
        }
        Ok(())
    }

    pub(crate) fn exit_expression(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Reset per-call state so the context can prepare another statement
    pub(crate) fn reset(&mut self) {
        self.buffer = SqlBuffer::default();
        self.anchors.clear();
        self.scopes.clear();
        self.pending_quantifier = None;
        self.depth = 0;
    }
}

/// Scoped capture of a nested statement's output
///
/// Dereferences to the context. [`CaptureGuard::finish`] pops the frame and
/// returns its text; dropping the guard early (for example on `?`) pops
/// and discards it.
pub struct CaptureGuard<'c, 'a> {
    ctx: &'c mut PrepareContext<'a>,
    finished: bool,
}

impl CaptureGuard<'_, '_> {
    pub fn finish(mut self) -> NativeSql {
        self.finished = true;
        self.ctx.buffer.pop_frame()
    }
}

impl<'a> Deref for CaptureGuard<'_, 'a> {
    type Target = PrepareContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for CaptureGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for CaptureGuard<'_, '_> {
    fn drop(&mut self) {
        if !self.finished {
            self.ctx.buffer.pop_frame();
        }
    }
}
