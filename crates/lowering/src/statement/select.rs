// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use ecsql_ir::{
    DerivedProperty, Exp, NullsOrder, OrderBySpec, SelectStatement, SingleSelect, SortDirection,
    StatementKind,
};

use crate::class_ref::prepare_class_ref;
use crate::context::{PrepareContext, Scope};
use crate::error::LoweringResult;
use crate::exp::{prepare_exp, prepare_single};
use crate::navigation::{nav_value_aliases, prepare_nav_value_creation};
use crate::snippet::{AnchorId, CapturedSelect, NativeSql, Snippets, bracketed};
use crate::window::prepare_window_clause;

pub(super) fn prepare_select(
    ctx: &mut PrepareContext<'_>,
    select: &SelectStatement,
) -> LoweringResult<()> {
    let is_root = ctx.scope_depth() == 0;
    let anchor = ctx.take_pending_quantifier();

    let first = prepare_single_select(ctx, &select.first, is_root, anchor)?;
    ctx.buffer_mut().append(&first);
    for compound in &select.rest {
        let next = prepare_single_select(ctx, &compound.select, is_root, None)?;
        ctx.buffer_mut()
            .append_str(&format!(" {} ", compound.op.as_sql()));
        ctx.buffer_mut().append(&next);
    }
    Ok(())
}

/// `anchor` is set when the select is the subquery of an ALL/ANY/SOME
/// predicate; its WHERE clause is then emitted as that anchor.
fn prepare_single_select(
    ctx: &mut PrepareContext<'_>,
    select: &SingleSelect,
    is_root: bool,
    anchor: Option<AnchorId>,
) -> LoweringResult<NativeSql> {
    let scope = Scope {
        kind: StatementKind::Select,
        is_root,
        derived_aliases: anchor.is_none(),
        has_from: !select.from.is_empty(),
    };

    ctx.with_scope(scope, |ctx| {
        let mut from = Vec::with_capacity(select.from.len());
        for class_ref in &select.from {
            from.push(prepare_class_ref(ctx, class_ref, Some(select))?);
        }

        let mut items = Vec::new();
        let mut columns: Snippets = Vec::new();
        for property in &select.select_list {
            let (item, values) = prepare_derived_property(ctx, property, scope.derived_aliases)?;
            items.extend(item);
            columns.extend(values);
        }

        let mut sql = NativeSql::text("SELECT ");
        sql.push_str(select.quantifier.prefix());
        sql.push_sql(&NativeSql::join(&items, ","));

        if !from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_sql(&NativeSql::join(&from, ","));
        }

        let where_clause = match &select.where_clause {
            Some(exp) => Some(prepare_single(ctx, exp, "WHERE clause")?),
            None => None,
        };
        match (anchor, where_clause) {
            (Some(anchor), original_where) => {
                ctx.anchors.capture(
                    anchor,
                    CapturedSelect {
                        select_columns: columns,
                        original_where,
                    },
                )?;
                sql.push_str(" WHERE ");
                sql.push_anchor(anchor);
            }
            (None, Some(where_clause)) => {
                sql.push_str(" WHERE ");
                sql.push_sql(&where_clause);
            }
            (None, None) => {}
        }

        if !select.group_by.is_empty() {
            let mut group_by = Vec::new();
            for exp in &select.group_by {
                group_by.extend(prepare_exp(ctx, exp)?);
            }
            sql.push_str(" GROUP BY ");
            sql.push_sql(&NativeSql::join(&group_by, ","));
        }

        if let Some(having) = &select.having {
            let having = prepare_single(ctx, having, "HAVING clause")?;
            sql.push_str(" HAVING ");
            sql.push_sql(&having);
        }

        if !select.window_clause.is_empty() {
            let window = prepare_window_clause(ctx, &select.window_clause)?;
            sql.push_str(" ");
            sql.push_sql(&window);
        }

        if !select.order_by.is_empty() {
            let order_by = order_by_list(ctx, &select.order_by)?;
            sql.push_str(" ORDER BY ");
            sql.push_sql(&order_by);
        }

        if let Some(limit) = &select.limit {
            let count = prepare_single(ctx, &limit.limit, "LIMIT")?;
            sql.push_str(" LIMIT ");
            sql.push_sql(&count);
            if let Some(offset) = &limit.offset {
                let offset = prepare_single(ctx, offset, "OFFSET")?;
                sql.push_str(" OFFSET ");
                sql.push_sql(&offset);
            }
        }

        Ok(sql)
    })
}

/// Select-list entries of one derived property plus its bare column values
fn prepare_derived_property(
    ctx: &mut PrepareContext<'_>,
    property: &DerivedProperty,
    with_aliases: bool,
) -> LoweringResult<(Snippets, Snippets)> {
    if let Exp::NavValueCreation(nav) = &property.exp {
        let values = prepare_nav_value_creation(ctx, nav)?;
        let items = if with_aliases {
            nav_value_aliases(nav, property.nested_alias.as_deref(), &values)
        } else {
            values.clone()
        };
        return Ok((items, values));
    }

    let values = prepare_exp(ctx, &property.exp)?;
    let items = match (&property.alias, with_aliases) {
        (Some(alias), true) if values.len() == 1 => {
            vec![values[0].clone().with_str(" ").with_str(&bracketed(alias))]
        }
        (Some(alias), true) => values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .clone()
                    .with_str(" ")
                    .with_str(&bracketed(&format!("{alias}_{i}")))
            })
            .collect(),
        _ => values.clone(),
    };
    Ok((items, values))
}

/// `a ASC,b DESC NULLS LAST`; multi-column values sort by every column
pub(crate) fn order_by_list(
    ctx: &mut PrepareContext<'_>,
    specs: &[OrderBySpec],
) -> LoweringResult<NativeSql> {
    let mut items = Vec::new();
    for spec in specs {
        let mut suffix = String::new();
        match spec.direction {
            Some(SortDirection::Asc) => suffix.push_str(" ASC"),
            Some(SortDirection::Desc) => suffix.push_str(" DESC"),
            None => {}
        }
        match spec.nulls {
            Some(NullsOrder::First) => suffix.push_str(" NULLS FIRST"),
            Some(NullsOrder::Last) => suffix.push_str(" NULLS LAST"),
            None => {}
        }
        for snippet in prepare_exp(ctx, &spec.exp)? {
            items.push(snippet.with_str(&suffix));
        }
    }
    Ok(NativeSql::join(&items, ","))
}
