// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use anyhow::{Context, bail};
use ecsql_catalog::{CatalogDefinition, StaticCatalog};
use ecsql_ir::Statement;
use ecsql_lowering::{EcSqlLowerer, IssueLog, LoweringConfig};
use serde::Deserialize;
use tracing::{info, warn};

/// Input document of the CLI
#[derive(Debug, Deserialize)]
pub struct LoweringRequest {
    pub catalog: CatalogDefinition,
    #[serde(default)]
    pub config: LoweringConfig,
    pub statement: Statement,
}

/// Lower the request in `input` and render the result as pretty JSON
pub fn run(input: &str) -> anyhow::Result<String> {
    let request: LoweringRequest =
        serde_json::from_str(input).context("Malformed lowering request")?;
    let catalog =
        StaticCatalog::from_definition(request.catalog).context("Invalid catalog definition")?;

    info!(kind = ?request.statement.kind(), "Lowering ECSQL statement");
    let mut issues = IssueLog::new();
    let lowerer = EcSqlLowerer::new(&catalog).with_config(request.config);
    let lowered = match lowerer.lower(&request.statement, &mut issues) {
        Ok(lowered) => lowered,
        Err(err) => {
            for issue in issues.issues() {
                warn!(id = issue.id.code(), category = ?issue.category, "{}", issue.message);
            }
            bail!("{err} (status {:?})", err.status());
        }
    };

    serde_json::to_string_pretty(&lowered).context("Failed to serialize lowered statement")
}
