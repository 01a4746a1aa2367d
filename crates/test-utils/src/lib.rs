// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for ECSQL lowering
//!
//! This crate provides common testing components including:
//! - A fixture schema backed by a static catalog
//! - Builders for ECSQL statement trees
//! - Assertions on produced native SQL

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::{assert_well_formed, is_well_formed};
pub use fixtures::FixtureSchema;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a test subscriber honouring `RUST_LOG`; later calls are no-ops
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
