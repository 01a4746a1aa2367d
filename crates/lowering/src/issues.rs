// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Diagnostics sink
//!
//! Every invalid-ECSQL error is reported here as an [`Issue`] carrying a
//! stable numeric id before the error propagates.

use serde::Serialize;

/// Severity level of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ErrorSeverity {
    /// Informational note
    Info,
    /// Warning (statement still prepared)
    Warning,
    /// Error (statement rejected)
    Error,
}

/// Issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCategory {
    /// Problem with the statement itself
    Query,
    /// Problem with how the schema is used
    Schema,
    /// Rejected by configuration
    Configuration,
}

/// Stable issue identifiers
///
/// Discriminants are part of the public contract and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum IssueId {
    InvalidBetweenOperands = 1,
    UnsupportedCastTarget = 2,
    NaturalJoinUnsupported = 3,
    DisabledFunction = 4,
    InvalidNavigationId = 5,
    UniqueSubqueryUnsupported = 6,
    JoinUsingUnsupported = 7,
    InvalidNavigationProperty = 8,
    NavigationRequiresFrom = 9,
    MultiColumnOperand = 10,
    ClassNotUsable = 11,
    PolymorphismNotAllowed = 12,
    ExpressionTooDeep = 13,
    WindowFunctionWithoutOver = 14,
    ExperimentalFeatureDisabled = 15,
    CompoundQuantifiedSubquery = 16,
    StatementNotAllowedOnConnection = 17,
    InvalidFunctionArguments = 18,
    TableValuedFunctionOutsideFrom = 19,
    InvalidFrameBound = 20,
    InvalidRelationshipJoin = 21,
    InvalidPartitionColumn = 22,
    InsertValueCountMismatch = 23,
    PolymorphicDmlSpansTables = 24,
    InvalidLiteral = 25,
    NotAWindowFunction = 26,
}

impl IssueId {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn category(self) -> IssueCategory {
        match self {
            IssueId::ClassNotUsable
            | IssueId::PolymorphismNotAllowed
            | IssueId::InvalidNavigationProperty
            | IssueId::InvalidRelationshipJoin
            | IssueId::PolymorphicDmlSpansTables => IssueCategory::Schema,
            IssueId::DisabledFunction
            | IssueId::ExperimentalFeatureDisabled
            | IssueId::StatementNotAllowedOnConnection => IssueCategory::Configuration,
            _ => IssueCategory::Query,
        }
    }
}

/// One reported diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: ErrorSeverity,
    pub category: IssueCategory,
    pub id: IssueId,
    pub message: String,
}

/// Receiver of diagnostics
pub trait IssueReporter {
    fn report(&mut self, issue: Issue);
}

/// In-memory issue sink
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == ErrorSeverity::Error)
    }

    /// Whether an issue with this id was reported
    pub fn contains(&self, id: IssueId) -> bool {
        self.issues.iter().any(|issue| issue.id == id)
    }

    pub fn clear(&mut self) {
        self.issues.clear();
    }
}

impl IssueReporter for IssueLog {
    fn report(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}
