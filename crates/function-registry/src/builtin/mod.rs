// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin function definitions
//!
//! `sqlite` holds the functions of the native engine that ECSQL passes
//! through, `ecsql` the ECSQL-only functions and rewrites.

pub mod ecsql;
pub mod sqlite;
