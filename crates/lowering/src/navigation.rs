// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Navigation value construction: `NAVIGATION_VALUE(e.Parent, id [, relClassId])`

use ecsql_ir::{
    ClassId, Exp, LiteralValue, NavValueCreationExp, PropertyNameExp, PropertyTarget, TypeInfo,
    UnaryValueOperator,
};

use crate::context::PrepareContext;
use crate::error::LoweringResult;
use crate::exp::prepare_single;
use crate::issues::IssueId;
use crate::snippet::{NativeSql, Snippets, bracketed};

/// Two bare snippets, `<id>` and `<relClassId>`
///
/// Select lists alias them with [`nav_value_aliases`].
pub fn prepare_nav_value_creation(
    ctx: &mut PrepareContext<'_>,
    nav: &NavValueCreationExp,
) -> LoweringResult<Snippets> {
    let declared_relationship = navigation_relationship(ctx, &nav.property)?;

    check_positive_id(ctx, &nav.id, "ECInstanceId")?;
    if let Some(rel_class_id) = &nav.rel_class_id {
        check_positive_id(ctx, rel_class_id, "RelECClassId")?;
    }

    if matches!(*nav.id, Exp::PropertyName(_)) && !ctx.scope().has_from {
        return Err(ctx.invalid(
            IssueId::NavigationRequiresFrom,
            format!(
                "Navigation value '{}' references a property but the statement has no FROM clause",
                nav.property.access_string()
            ),
        ));
    }

    let id = prepare_single(ctx, &nav.id, "Navigation id")?;
    let rel_class_id = match &nav.rel_class_id {
        Some(exp) => prepare_single(ctx, exp, "Navigation relationship class id")?,
        None => NativeSql::text(declared_relationship.to_string()),
    };

    Ok(vec![id, rel_class_id])
}

/// `<id> [alias_0]` and `<relClassId> [alias_1]`
///
/// `nested_alias` is the alias of the enclosing derived property, if any;
/// it takes precedence over the expression's own column alias.
pub fn nav_value_aliases(
    nav: &NavValueCreationExp,
    nested_alias: Option<&str>,
    values: &[NativeSql],
) -> Snippets {
    let alias = nested_alias.unwrap_or(&nav.column_alias);
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .clone()
                .with_str(" ")
                .with_str(&bracketed(&format!("{alias}_{i}")))
        })
        .collect()
}

/// Declared relationship class of a navigation property
fn navigation_relationship(
    ctx: &mut PrepareContext<'_>,
    property: &PropertyNameExp,
) -> LoweringResult<ClassId> {
    let declared = match (&property.target, property.path.as_slice()) {
        (PropertyTarget::Class { class_id }, [name]) => ctx
            .catalog()
            .find_property(*class_id, name)
            .ok()
            .and_then(|def| def.as_navigation())
            .map(|nav| nav.relationship_class),
        (PropertyTarget::Derived { .. }, _) => match property.type_info {
            TypeInfo::Navigation { relationship_class } => Some(relationship_class),
            _ => None,
        },
        _ => None,
    };

    declared.ok_or_else(|| {
        ctx.invalid(
            IssueId::InvalidNavigationProperty,
            format!(
                "'{}' is not a navigation property",
                property.access_string()
            ),
        )
    })
}

/// Reject a negated value and literals that are not positive
fn check_positive_id(ctx: &mut PrepareContext<'_>, exp: &Exp, what: &str) -> LoweringResult<()> {
    let non_positive = match exp {
        Exp::UnaryValue(unary) => unary.op == UnaryValueOperator::Minus,
        Exp::Literal(lit) => match lit.value {
            LiteralValue::Integer(value) => value <= 0,
            LiteralValue::Double(value) => value <= 0.0,
            _ => false,
        },
        _ => false,
    };
    if non_positive {
        return Err(ctx.invalid(
            IssueId::InvalidNavigationId,
            format!("Navigation {what} must be a positive integer"),
        ));
    }
    Ok(())
}
