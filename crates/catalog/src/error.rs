// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.

use ecsql_ir::ClassId;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during Catalog operations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogError {
    /// No class with this id exists
    #[error("ECClass with id {0} not found")]
    ClassNotFound(ClassId),

    /// No class with this schema-qualified name exists
    #[error("ECClass '{0}' not found")]
    ClassNameNotFound(String),

    /// The class exists but has no storage mapping
    #[error("ECClass '{0}' is not mapped to a table")]
    ClassNotMapped(String),

    /// Requested table was not found
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// The class has no property with the given access string
    #[error("Property '{property}' not found in ECClass '{class}'")]
    PropertyNotFound { class: String, property: String },

    /// Class or table definitions are inconsistent
    #[error("Invalid catalog definition: {0}")]
    InvalidDefinition(String),

    /// Failed to serialize or deserialize schema data
    #[error("Failed to serialize schema data: {0}")]
    SerializationError(String),
}
