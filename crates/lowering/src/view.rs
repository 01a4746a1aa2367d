// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Class view generation
//!
//! A class referenced in a SELECT is read through a view that unions the
//! rows of every table storing the class (and its subclasses when the
//! reference is polymorphic):
//!
//! ```text
//! (SELECT [ts_Element].[Id] [ECInstanceId],[ts_Element].[ECClassId] [ECClassId],...
//!  FROM [main].[ts_Element] WHERE [ts_Element].[ECClassId] IN (...)
//!  UNION ALL SELECT ... FROM [main].[ts_Sensor]) [e]
//! ```

use ecsql_catalog::{ClassMap, ColumnSource, MappedColumn, TableDef};
use ecsql_ir::{ClassId, ClassNameExp};
use tracing::debug;

use crate::class_filter::class_id_filter;
use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};
use crate::property_usage::PropertyUsage;
use crate::snippet::{NativeSql, bracketed, qualified_column};

/// Produces the native FROM item for a class reference in a SELECT
pub trait ViewGenerator {
    fn generate(
        &self,
        ctx: &mut PrepareContext<'_>,
        class: &ClassNameExp,
        usage: &PropertyUsage,
    ) -> LoweringResult<NativeSql>;
}

/// Union-all view over the tables of a class hierarchy
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultViewGenerator;

impl ViewGenerator for DefaultViewGenerator {
    fn generate(
        &self,
        ctx: &mut PrepareContext<'_>,
        class: &ClassNameExp,
        usage: &PropertyUsage,
    ) -> LoweringResult<NativeSql> {
        let catalog = ctx.catalog();
        let root_map = catalog.class_map(class.class_id)?;
        let columns: Vec<&MappedColumn> = root_map
            .columns
            .iter()
            .filter(|column| is_system_column(column) || usage.includes(column.root_property()))
            .collect();

        let mut selects = Vec::new();
        for (table_name, table_map) in storage_tables(ctx, class)? {
            let table = catalog.table(&table_name)?;
            let mut select = format!(
                "SELECT {} FROM {}",
                select_list(table, table_map, &columns),
                table.qualified_name()
            );
            if let Some(column) = &table.class_id_column {
                let column = qualified_column(&table.name, column);
                if let Some(filter) =
                    class_id_filter(ctx, table, class.class_id, class.polymorphic, &column)?
                {
                    select.push_str(" WHERE ");
                    select.push_str(&filter);
                }
            }
            selects.push(select);
        }

        if selects.is_empty() {
            return Err(LoweringError::internal(format!(
                "class {} has no storage table",
                class.class_id
            )));
        }

        debug!(
            class = %class.name,
            tables = selects.len(),
            columns = columns.len(),
            polymorphic = class.polymorphic,
            "Generated class view"
        );
        Ok(NativeSql::text(format!(
            "({}) {}",
            selects.join(" UNION ALL "),
            bracketed(class.effective_alias())
        )))
    }
}

/// Tables holding rows of the class, in hierarchy order, each with the
/// class map of the first class found in it
fn storage_tables<'a>(
    ctx: &PrepareContext<'a>,
    class: &ClassNameExp,
) -> LoweringResult<Vec<(String, &'a ClassMap)>> {
    let catalog = ctx.catalog();
    let classes: Vec<ClassId> = if class.polymorphic {
        catalog.class_and_all_derived(class.class_id)?
    } else {
        vec![class.class_id]
    };

    let mut tables: Vec<(String, &'a ClassMap)> = Vec::new();
    for id in classes {
        let Ok(map) = catalog.class_map(id) else {
            continue;
        };
        if !tables.iter().any(|(name, _)| name == &map.table) {
            tables.push((map.table.clone(), map));
        }
    }
    Ok(tables)
}

fn select_list(table: &TableDef, table_map: &ClassMap, columns: &[&MappedColumn]) -> String {
    columns
        .iter()
        .map(|column| {
            let value = match table_map.column(&column.access_string).map(|c| &c.source) {
                Some(ColumnSource::Column(name)) => qualified_column(&table.name, name),
                Some(ColumnSource::ClassIdConstant(id)) => id.to_string(),
                None => "NULL".to_string(),
            };
            format!("{value} {}", bracketed(&column.view_name))
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn is_system_column(column: &MappedColumn) -> bool {
    matches!(
        column.access_string.as_str(),
        "ECInstanceId"
            | "ECClassId"
            | "SourceECInstanceId"
            | "SourceECClassId"
            | "TargetECInstanceId"
            | "TargetECClassId"
    )
}
