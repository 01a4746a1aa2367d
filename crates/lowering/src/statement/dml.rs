// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! INSERT, UPDATE and DELETE
//!
//! DML writes to the class's table directly; property references lower to
//! bare column names.

use ecsql_catalog::TableDef;
use ecsql_ir::{
    ClassNameExp, DeleteStatement, Exp, InsertStatement, PropertyNameExp, StatementKind,
    UpdateStatement,
};

use crate::class_filter::class_id_filter;
use crate::class_ref::{prepare_class_name, usable_class_map};
use crate::context::{PrepareContext, Scope};
use crate::error::{LoweringError, LoweringResult};
use crate::exp::{align_null_operand, prepare_exp, prepare_single};
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets, bracketed};
use crate::value::prepare_property_name;

fn dml_scope(kind: StatementKind) -> Scope {
    Scope {
        kind,
        is_root: true,
        derived_aliases: false,
        has_from: false,
    }
}

fn class_table<'a>(
    ctx: &mut PrepareContext<'a>,
    class: &ClassNameExp,
) -> LoweringResult<&'a TableDef> {
    let map = usable_class_map(ctx, class)?;
    Ok(ctx.catalog().table(&map.table)?)
}

pub(super) fn prepare_insert(
    ctx: &mut PrepareContext<'_>,
    statement: &InsertStatement,
) -> LoweringResult<()> {
    ctx.with_scope(dml_scope(StatementKind::Insert), |ctx| {
        if statement.properties.len() != statement.values.len() {
            return Err(ctx.invalid(
                IssueId::InsertValueCountMismatch,
                format!(
                    "INSERT lists {} properties but {} values",
                    statement.properties.len(),
                    statement.values.len()
                ),
            ));
        }

        let target = prepare_class_name(ctx, &statement.class, None)?;
        let table = class_table(ctx, &statement.class)?;

        let mut columns: Snippets = Vec::new();
        let mut values: Snippets = Vec::new();
        for (property, value) in statement.properties.iter().zip(&statement.values) {
            let (property_columns, value_columns) = prepare_assignment(ctx, property, value)?;
            columns.extend(property_columns);
            values.extend(value_columns);
        }

        let sets_class_id = statement
            .properties
            .iter()
            .any(|p| p.access_string().eq_ignore_ascii_case("ECClassId"));
        if let (Some(class_id_column), false) = (&table.class_id_column, sets_class_id) {
            columns.push(NativeSql::text(bracketed(class_id_column)));
            values.push(NativeSql::text(statement.class.class_id.to_string()));
        }

        let sql = NativeSql::text("INSERT INTO ")
            .with_sql(&target)
            .with_str("(")
            .with_sql(&NativeSql::join(&columns, ","))
            .with_str(") VALUES (")
            .with_sql(&NativeSql::join(&values, ","))
            .with_str(")");
        ctx.buffer_mut().append(&sql);
        Ok(())
    })
}

pub(super) fn prepare_update(
    ctx: &mut PrepareContext<'_>,
    statement: &UpdateStatement,
) -> LoweringResult<()> {
    ctx.with_scope(dml_scope(StatementKind::Update), |ctx| {
        let target = prepare_class_name(ctx, &statement.class, None)?;
        let table = class_table(ctx, &statement.class)?;

        let mut assignments = Vec::new();
        for assignment in &statement.assignments {
            let (columns, values) =
                prepare_assignment(ctx, &assignment.property, &assignment.value)?;
            for (column, value) in columns.iter().zip(&values) {
                assignments.push(column.clone().with_str("=").with_sql(value));
            }
        }

        let mut sql = NativeSql::text("UPDATE ")
            .with_sql(&target)
            .with_str(" SET ")
            .with_sql(&NativeSql::join(&assignments, ","));
        append_where(ctx, &mut sql, table, &statement.class, statement.where_clause.as_ref())?;
        ctx.buffer_mut().append(&sql);
        Ok(())
    })
}

pub(super) fn prepare_delete(
    ctx: &mut PrepareContext<'_>,
    statement: &DeleteStatement,
) -> LoweringResult<()> {
    ctx.with_scope(dml_scope(StatementKind::Delete), |ctx| {
        let target = prepare_class_name(ctx, &statement.class, None)?;
        let table = class_table(ctx, &statement.class)?;

        let mut sql = NativeSql::text("DELETE FROM ").with_sql(&target);
        append_where(ctx, &mut sql, table, &statement.class, statement.where_clause.as_ref())?;
        ctx.buffer_mut().append(&sql);
        Ok(())
    })
}

/// Column snippets of `property` and the aligned snippets of `value`
fn prepare_assignment(
    ctx: &mut PrepareContext<'_>,
    property: &PropertyNameExp,
    value: &Exp,
) -> LoweringResult<(Snippets, Snippets)> {
    let columns = prepare_property_name(ctx, property)?;
    let values = prepare_exp(ctx, value)?;
    let property_exp = Exp::PropertyName(property.clone());
    let (columns, values) = align_null_operand(&property_exp, columns, value, values)?;
    if columns.is_empty() {
        return Err(LoweringError::internal(format!(
            "property '{}' has no columns",
            property.access_string()
        )));
    }
    Ok((columns, values))
}

/// ` WHERE (w) AND (class filter)` with whichever parts apply
fn append_where(
    ctx: &mut PrepareContext<'_>,
    sql: &mut NativeSql,
    table: &TableDef,
    class: &ClassNameExp,
    where_clause: Option<&Exp>,
) -> LoweringResult<()> {
    let where_clause = match where_clause {
        Some(exp) => Some(prepare_single(ctx, exp, "WHERE clause")?),
        None => None,
    };
    let filter = match &table.class_id_column {
        Some(column) => class_id_filter(ctx, table, class.class_id, class.polymorphic, column)?,
        None => None,
    };

    match (where_clause, filter) {
        (Some(where_clause), Some(filter)) => {
            sql.push_str(" WHERE ");
            sql.push_sql(&where_clause.parenthesized());
            sql.push_str(&format!(" AND ({filter})"));
        }
        (Some(where_clause), None) => {
            sql.push_str(" WHERE ");
            sql.push_sql(&where_clause);
        }
        (None, Some(filter)) => sql.push_str(&format!(" WHERE ({filter})")),
        (None, None) => {}
    }
    Ok(())
}
