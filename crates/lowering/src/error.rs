// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types and handling strategy for the lowering layer
//!
//! Lowering distinguishes two failure classes:
//!
//! - **Invalid ECSQL**: the statement is semantically wrong in a way its
//!   author can fix. Always reported to the issue sink before it is
//!   returned (see [`crate::PrepareContext::invalid`]).
//! - **Internal**: a contract violation that valid input cannot trigger,
//!   such as misaligned snippet lists. Never reported as a user issue.
//!
//! Neither is recovered from: every nested call returns immediately.

use ecsql_catalog::CatalogError;
use serde::Serialize;
use tracing::error;

use crate::issues::IssueId;

/// Result type alias for lowering operations
pub type LoweringResult<T> = Result<T, LoweringError>;

/// Final status of a prepare call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrepareStatus {
    Success,
    InvalidECSql,
    Error,
}

impl PrepareStatus {
    pub fn from_result<T>(result: &LoweringResult<T>) -> Self {
        match result {
            Ok(_) => PrepareStatus::Success,
            Err(err) => err.status(),
        }
    }
}

/// Errors that can occur during ECSQL → native SQL lowering
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum LoweringError {
    /// The statement is semantically invalid
    #[error("Invalid ECSQL: {message}")]
    InvalidECSql { issue: IssueId, message: String },

    /// Internal contract violation
    #[error("Internal lowering error: {message}")]
    Internal { message: String },

    /// Schema lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl LoweringError {
    /// Build an internal error and log it
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(%message, "Lowering contract violation");
        LoweringError::Internal { message }
    }

    pub fn status(&self) -> PrepareStatus {
        match self {
            LoweringError::InvalidECSql { .. } => PrepareStatus::InvalidECSql,
            LoweringError::Internal { .. } | LoweringError::Catalog(_) => PrepareStatus::Error,
        }
    }

    /// Issue id of an invalid-ECSQL error
    pub fn issue(&self) -> Option<IssueId> {
        match self {
            LoweringError::InvalidECSql { issue, .. } => Some(*issue),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, LoweringError::Internal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsql_ir::ClassId;

    #[test]
    fn test_status_mapping() {
        let invalid = LoweringError::InvalidECSql {
            issue: IssueId::NaturalJoinUnsupported,
            message: "NATURAL JOIN".to_string(),
        };
        assert_eq!(invalid.status(), PrepareStatus::InvalidECSql);
        assert_eq!(invalid.issue(), Some(IssueId::NaturalJoinUnsupported));

        let internal = LoweringError::internal("snippet count mismatch");
        assert_eq!(internal.status(), PrepareStatus::Error);
        assert!(internal.is_internal());

        let catalog: LoweringError = CatalogError::ClassNotFound(ClassId(3)).into();
        assert_eq!(catalog.status(), PrepareStatus::Error);
        assert_eq!(catalog.issue(), None);
    }

    #[test]
    fn test_error_display() {
        let err = LoweringError::InvalidECSql {
            issue: IssueId::DisabledFunction,
            message: "Function 'RANDOM' is disabled".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid ECSQL: Function 'RANDOM' is disabled");

        let catalog: LoweringError = CatalogError::TableNotFound("t".to_string()).into();
        assert_eq!(catalog.to_string(), "Table 't' not found");
    }

    #[test]
    fn test_status_from_result() {
        let ok: LoweringResult<()> = Ok(());
        assert_eq!(PrepareStatus::from_result(&ok), PrepareStatus::Success);
    }

    #[test]
    fn test_error_serialization() {
        let err = LoweringError::internal("dangling anchor");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("dangling anchor"));
    }
}
