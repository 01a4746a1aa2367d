// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # ECSQL Function Registry
//!
//! This crate provides a centralized registry for builtin functions that
//! may appear in ECSQL statements.
//!
//! ## Features
//!
//! - Native engine builtins (scalar, aggregate, window, table-valued)
//! - ECSQL-only functions and the rewrite rules lowering applies to them
//! - Case-insensitive lookup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecsql_function_registry::{FunctionRegistry, FunctionRewrite};
//!
//! let registry = FunctionRegistry::new();
//! let every = registry.get_function("EVERY").unwrap();
//! assert_eq!(every.rewrite, FunctionRewrite::AggregatePredicate { native: "MIN" });
//! ```

pub mod builtin;
pub mod function;
pub mod registry;

pub use function::{FunctionDef, FunctionKind, FunctionRewrite};
pub use registry::FunctionRegistry;
