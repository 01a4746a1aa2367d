// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! FROM-clause lowering: class names, joins, derived tables, table-valued
//! functions and common table block references.

use ecsql_catalog::{CatalogError, ClassMap};
use ecsql_ir::{
    ClassId, ClassNameExp, ClassRef, JoinDirection, JoinExp, JoinKind, JoinSpec, JoinType,
    SingleSelect, StatementKind,
};
use tracing::debug;

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::function::{CallSite, prepare_function_call};
use crate::issues::IssueId;
use crate::property_usage::{PropertyUsage, collect_property_usage};
use crate::snippet::{NativeSql, bracketed, qualified_column};

/// Lower one FROM item
///
/// `enclosing` is the single select the item belongs to; it is scanned for
/// property references when generated views are pruned.
pub fn prepare_class_ref(
    ctx: &mut PrepareContext<'_>,
    class_ref: &ClassRef,
    enclosing: Option<&SingleSelect>,
) -> LoweringResult<NativeSql> {
    match class_ref {
        ClassRef::ClassName(class) => prepare_class_name(ctx, class, enclosing),
        ClassRef::Join(join) => prepare_join(ctx, join, enclosing),
        ClassRef::Subquery(subquery) => {
            let preparer = ctx.preparer();
            let mut capture = ctx.capture();
            preparer.prepare_select(&mut capture, &subquery.select)?;
            let sql = capture.finish();
            Ok(sql
                .parenthesized()
                .with_str(" ")
                .with_str(&bracketed(&subquery.alias)))
        }
        ClassRef::TableValuedFunction(tvf) => {
            if !ctx.config().experimental_features {
                return Err(ctx.invalid(
                    IssueId::ExperimentalFeatureDisabled,
                    format!(
                        "Table-valued function '{}' requires experimental features",
                        tvf.function.name
                    ),
                ));
            }
            let call = prepare_function_call(ctx, &tvf.function, CallSite::From)?.into_sql();
            Ok(match &tvf.alias {
                Some(alias) => call.with_str(" ").with_str(&bracketed(alias)),
                None => call,
            })
        }
        ClassRef::CommonTableBlock(block) => {
            let mut sql = bracketed(&block.name);
            if let Some(alias) = &block.alias {
                sql.push(' ');
                sql.push_str(&bracketed(alias));
            }
            Ok(NativeSql::text(sql))
        }
    }
}

/// Resolve a class name to a class view (SELECT) or its table (DML)
pub fn prepare_class_name(
    ctx: &mut PrepareContext<'_>,
    class: &ClassNameExp,
    enclosing: Option<&SingleSelect>,
) -> LoweringResult<NativeSql> {
    let map = usable_class_map(ctx, class)?;
    let scope = ctx.scope();

    match scope.kind {
        StatementKind::Select => {
            if class.polymorphic && !map.allows_polymorphic_queries {
                return Err(ctx.invalid(
                    IssueId::PolymorphismNotAllowed,
                    format!(
                        "Class '{}.{}' cannot be queried polymorphically; use ONLY",
                        class.schema, class.name
                    ),
                ));
            }

            let usage = match enclosing {
                Some(select) if ctx.config().optimize_nested_select_joins && !scope.is_root => {
                    collect_property_usage(select, class.effective_alias())
                }
                _ => PropertyUsage::All,
            };
            let views = ctx.views();
            views.generate(ctx, class, &usage)
        }
        StatementKind::Insert | StatementKind::Update if class.polymorphic => {
            Err(ctx.invalid(
                IssueId::PolymorphismNotAllowed,
                format!(
                    "{:?} target '{}.{}' must be an ONLY class reference",
                    scope.kind, class.schema, class.name
                ),
            ))
        }
        StatementKind::Delete if class.polymorphic => {
            let tables = hierarchy_tables(ctx, class.class_id)?;
            if tables.len() > 1 {
                return Err(ctx.invalid(
                    IssueId::PolymorphicDmlSpansTables,
                    format!(
                        "Polymorphic DELETE of '{}.{}' spans tables {}",
                        class.schema,
                        class.name,
                        tables.join(", ")
                    ),
                ));
            }
            Ok(NativeSql::text(bracketed(&map.table)))
        }
        StatementKind::Insert | StatementKind::Update | StatementKind::Delete => {
            Ok(NativeSql::text(bracketed(&map.table)))
        }
    }
}

/// Class map of a class that can be used in ECSQL
pub(crate) fn usable_class_map<'a>(
    ctx: &mut PrepareContext<'a>,
    class: &ClassNameExp,
) -> LoweringResult<&'a ClassMap> {
    match ctx.catalog().class_map(class.class_id) {
        Ok(map) => Ok(map),
        Err(CatalogError::ClassNotMapped(name)) => Err(ctx.invalid(
            IssueId::ClassNotUsable,
            format!("Class '{name}' has no storage and cannot be used in ECSQL"),
        )),
        Err(err) => Err(err.into()),
    }
}

/// Distinct tables storing the class and its subclasses
fn hierarchy_tables(ctx: &PrepareContext<'_>, class_id: ClassId) -> LoweringResult<Vec<String>> {
    let catalog = ctx.catalog();
    let mut tables: Vec<String> = Vec::new();
    for id in catalog.class_and_all_derived(class_id)? {
        let Ok(map) = catalog.class_map(id) else {
            continue;
        };
        if !tables.contains(&map.table) {
            tables.push(map.table.clone());
        }
    }
    Ok(tables)
}

fn prepare_join(
    ctx: &mut PrepareContext<'_>,
    join: &JoinExp,
    enclosing: Option<&SingleSelect>,
) -> LoweringResult<NativeSql> {
    match &join.kind {
        JoinKind::Natural(_) => Err(ctx.invalid(
            IssueId::NaturalJoinUnsupported,
            "NATURAL JOIN is not supported",
        )),
        JoinKind::Qualified {
            spec: JoinSpec::Using(_),
            ..
        } => Err(ctx.invalid(
            IssueId::JoinUsingUnsupported,
            "JOIN ... USING (columns) is not supported",
        )),
        JoinKind::Cross => {
            let lhs = prepare_class_ref(ctx, &join.lhs, enclosing)?;
            let rhs = prepare_class_ref(ctx, &join.rhs, enclosing)?;
            Ok(lhs.with_str(" CROSS JOIN ").with_sql(&rhs))
        }
        JoinKind::Qualified {
            join_type,
            spec: JoinSpec::On(on),
        } => {
            let lhs = prepare_class_ref(ctx, &join.lhs, enclosing)?;
            let rhs = prepare_class_ref(ctx, &join.rhs, enclosing)?;
            let on = crate::exp::prepare_single(ctx, on, "JOIN condition")?;
            Ok(lhs
                .with_str(&format!(" {} ", join_type.as_sql()))
                .with_sql(&rhs)
                .with_str(" ON ")
                .with_sql(&on))
        }
        JoinKind::Relationship {
            relationship,
            direction,
        } => prepare_relationship_join(ctx, join, relationship, *direction, enclosing),
    }
}

/// `lhs JOIN rhs USING rel` through the relationship's link view
fn prepare_relationship_join(
    ctx: &mut PrepareContext<'_>,
    join: &JoinExp,
    relationship: &ClassNameExp,
    direction: JoinDirection,
    enclosing: Option<&SingleSelect>,
) -> LoweringResult<NativeSql> {
    let (Some(from), Some(to)) = (last_class_name(&join.lhs), last_class_name(&join.rhs)) else {
        return Err(ctx.invalid(
            IssueId::InvalidRelationshipJoin,
            "Relationship joins require class names on both sides",
        ));
    };

    let direction = resolve_direction(ctx, relationship, from.class_id, to.class_id, direction)?;
    let (near, far) = match direction {
        JoinDirection::Backward => ("Target", "Source"),
        JoinDirection::Forward | JoinDirection::Implied => ("Source", "Target"),
    };
    debug!(
        relationship = %relationship.name,
        direction = ?direction,
        "Lowering relationship join"
    );

    let lhs = prepare_class_ref(ctx, &join.lhs, enclosing)?;
    let link = prepare_class_name(ctx, relationship, enclosing)?;
    let rhs = prepare_class_ref(ctx, &join.rhs, enclosing)?;

    let rel_alias = relationship.effective_alias();
    let inner = JoinType::Inner.as_sql();
    Ok(lhs
        .with_str(&format!(" {inner} "))
        .with_sql(&link)
        .with_str(&format!(
            " ON {}={}",
            qualified_column(rel_alias, &format!("{near}ECInstanceId")),
            qualified_column(from.effective_alias(), "ECInstanceId")
        ))
        .with_str(&format!(" {inner} "))
        .with_sql(&rhs)
        .with_str(&format!(
            " ON {}={}",
            qualified_column(to.effective_alias(), "ECInstanceId"),
            qualified_column(rel_alias, &format!("{far}ECInstanceId"))
        )))
}

fn resolve_direction(
    ctx: &mut PrepareContext<'_>,
    relationship: &ClassNameExp,
    from: ClassId,
    to: ClassId,
    direction: JoinDirection,
) -> LoweringResult<JoinDirection> {
    let catalog = ctx.catalog();
    let Some(ends) = catalog.class(relationship.class_id)?.relationship else {
        return Err(ctx.invalid(
            IssueId::InvalidRelationshipJoin,
            format!("'{}' is not a relationship class", relationship.name),
        ));
    };

    let forward =
        catalog.is_subclass_of(from, ends.source) && catalog.is_subclass_of(to, ends.target);
    let backward =
        catalog.is_subclass_of(from, ends.target) && catalog.is_subclass_of(to, ends.source);
    match direction {
        JoinDirection::Forward if forward => Ok(JoinDirection::Forward),
        JoinDirection::Backward if backward => Ok(JoinDirection::Backward),
        JoinDirection::Implied if forward => Ok(JoinDirection::Forward),
        JoinDirection::Implied if backward => Ok(JoinDirection::Backward),
        _ => Err(ctx.invalid(
            IssueId::InvalidRelationshipJoin,
            format!(
                "Relationship '{}' does not connect the joined classes in the {direction:?} direction",
                relationship.name
            ),
        )),
    }
}

/// Right-most class name of a (possibly nested) join operand
fn last_class_name(class_ref: &ClassRef) -> Option<&ClassNameExp> {
    match class_ref {
        ClassRef::ClassName(class) => Some(class),
        ClassRef::Join(join) => last_class_name(&join.rhs),
        _ => None,
    }
}
