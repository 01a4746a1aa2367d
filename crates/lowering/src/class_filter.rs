// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Class-id filter synthesis
//!
//! Tables shared by several classes carry an `ECClassId` column. Queries
//! restrict rows to the requested class (or hierarchy) through it, using
//! the class-hierarchy cache table for polymorphic filters.

use ecsql_catalog::TableDef;
use ecsql_ir::{ClassId, TypeListEntry, TypeListExp};

use crate::context::PrepareContext;
use crate::error::{LoweringError, LoweringResult};

/// Filter restricting `table` rows to `class_id` (and its subclasses if
/// `polymorphic`), or `None` if every row already qualifies
///
/// `column` is the class-id column as it should appear in the output,
/// e.g. `[ts_Element].[ECClassId]` in a view or `ECClassId` in DML.
pub fn class_id_filter(
    ctx: &PrepareContext<'_>,
    table: &TableDef,
    class_id: ClassId,
    polymorphic: bool,
    column: &str,
) -> LoweringResult<Option<String>> {
    if !table.has_class_id_column() {
        return Ok(None);
    }

    let catalog = ctx.catalog();
    if !polymorphic {
        if catalog.is_shared_table(&table.name) {
            return Ok(Some(format!("{column}={class_id}")));
        }
        return Ok(None);
    }

    let partition = catalog.storage_partition(&table.name, class_id)?;
    if !partition.requires_class_id_filter {
        return Ok(None);
    }
    Ok(Some(format!(
        "{column} IN (SELECT ClassId FROM {} WHERE BaseClassId={class_id})",
        catalog.class_hierarchy_cache_table()
    )))
}

/// `IN (...)` part of `ECClassId IS (A, ONLY B, ...)`
pub fn type_list_filter(ctx: &PrepareContext<'_>, list: &TypeListExp) -> LoweringResult<String> {
    let entries = subsume_entries(ctx, &list.entries);
    if entries.is_empty() {
        return Err(LoweringError::internal("type list has no entries"));
    }

    let (poly, exact): (Vec<TypeListEntry>, Vec<TypeListEntry>) =
        entries.into_iter().partition(|entry| entry.polymorphic);
    let poly = id_list(&poly);
    let exact = id_list(&exact);

    if poly.is_empty() {
        return Ok(format!("IN ({exact})"));
    }

    let mut constraint = format!("BaseClassId IN ({poly})");
    if !exact.is_empty() {
        constraint.push_str(&format!(" OR ClassId IN ({exact})"));
    }
    Ok(format!(
        "IN (SELECT ClassId FROM {} WHERE {constraint})",
        ctx.catalog().class_hierarchy_cache_table()
    ))
}

/// Drop duplicates and exact entries covered by another polymorphic entry
fn subsume_entries(ctx: &PrepareContext<'_>, entries: &[TypeListEntry]) -> Vec<TypeListEntry> {
    let catalog = ctx.catalog();
    let mut unique: Vec<TypeListEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(entry) {
            unique.push(*entry);
        }
    }

    unique
        .iter()
        .filter(|entry| {
            entry.polymorphic
                || !unique.iter().any(|other| {
                    other.polymorphic
                        && other != *entry
                        && catalog.is_subclass_of(entry.class_id, other.class_id)
                })
        })
        .copied()
        .collect()
}

fn id_list(entries: &[TypeListEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.class_id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
