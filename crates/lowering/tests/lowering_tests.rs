// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end lowering of ECSQL statements against the fixture schema

use ecsql_function_registry::FunctionRegistry;
use ecsql_ir::{
    AllOrAnyExp, Assignment, BetweenExp, BooleanOperator, CastExp, ClassId, ClassRef, Collation,
    CommonTableBlock, CommonTableBlockRef, CommonTableStatement, ComparisonOperator,
    DeleteStatement, DerivedProperty, Exp, FrameBound, FrameExclusion, FrameExtent, FrameUnit,
    FunctionCallExp, InsertStatement, JoinDirection, JoinExp, JoinKind, JoinType, LiteralExp,
    LiteralValue, NavValueCreationExp, OrderBySpec, PartitionColumn, PrimitiveType,
    PropertyNameExp, PropertyTarget, Quantifier, SelectStatement, SingleSelect, Statement,
    StructType, TypeInfo, TypeListEntry, TypeListExp, UpdateStatement, WindowDefinition,
    WindowFrame, WindowFunctionExp, WindowOver, WindowSpec,
};
use ecsql_lowering::{
    EcSqlLowerer, IssueId, IssueLog, LoweredStatement, LoweringConfig, LoweringResult,
    PrepareContext, PrepareStatus, prepare,
};
use ecsql_test_utils::builders::{
    and, binary, call, compare, double, eq, int, named_param, null, primitive, select_from,
    select_where, statement, string, subquery,
};
use ecsql_test_utils::fixtures::{
    ELEMENT, ELEMENT_OWNS_CHILD_ELEMENTS, ELEMENT_REFERS_TO_ELEMENTS, PHYSICAL_ELEMENT, SENSOR,
    SETTINGS, SPATIAL_ELEMENT, WIDGET,
};
use ecsql_test_utils::{FixtureSchema, assert_well_formed, init_tracing};

fn lower_with(
    schema: &FixtureSchema,
    config: LoweringConfig,
    statement: &Statement,
) -> (LoweringResult<LoweredStatement>, IssueLog) {
    init_tracing();
    let mut issues = IssueLog::new();
    let result = EcSqlLowerer::new(schema.catalog())
        .with_config(config)
        .lower(statement, &mut issues);
    (result, issues)
}

fn lower_ok(schema: &FixtureSchema, statement: &Statement) -> LoweredStatement {
    let (result, issues) = lower_with(schema, LoweringConfig::default(), statement);
    let lowered = result.unwrap_or_else(|err| panic!("lowering failed: {err}"));
    assert!(issues.issues().is_empty(), "unexpected issues: {issues:?}");
    assert_well_formed(&lowered.sql);
    lowered
}

fn lower_invalid(schema: &FixtureSchema, statement: &Statement, expected: IssueId) {
    lower_invalid_with(schema, LoweringConfig::default(), statement, expected);
}

fn lower_invalid_with(
    schema: &FixtureSchema,
    config: LoweringConfig,
    statement: &Statement,
    expected: IssueId,
) {
    let (result, issues) = lower_with(schema, config, statement);
    let err = result.expect_err("statement should be rejected");
    assert_eq!(err.status(), PrepareStatus::InvalidECSql, "{err}");
    assert_eq!(err.issue(), Some(expected));
    assert!(issues.contains(expected), "issue {expected:?} not reported");
}

fn property_name(exp: Exp) -> PropertyNameExp {
    match exp {
        Exp::PropertyName(prop) => prop,
        other => panic!("expected a property reference, got {other:?}"),
    }
}

fn widget_where(schema: &FixtureSchema, condition: Exp) -> Statement {
    statement(select_where(
        vec![schema.property("w", WIDGET, "Name")],
        schema.only(WIDGET, "w"),
        condition,
    ))
}

fn element_where(schema: &FixtureSchema, condition: Exp) -> Statement {
    statement(select_where(
        vec![schema.property("e", ELEMENT, "Code")],
        schema.class(ELEMENT, "e"),
        condition,
    ))
}

fn type_list(entries: &[(ClassId, bool)]) -> Exp {
    Exp::TypeList(TypeListExp {
        entries: entries
            .iter()
            .map(|&(class_id, polymorphic)| TypeListEntry {
                class_id,
                polymorphic,
            })
            .collect(),
    })
}

fn parent_nav_value(schema: &FixtureSchema, id: Exp) -> Exp {
    Exp::NavValueCreation(NavValueCreationExp {
        property: property_name(schema.property("e", ELEMENT, "Parent")),
        id: Box::new(id),
        rel_class_id: None,
        column_alias: "Parent".to_string(),
    })
}

fn sensor_readings(schema: &FixtureSchema, where_clause: Option<Exp>) -> Box<SelectStatement> {
    let mut select = select_from(
        vec![schema.property("s", SENSOR, "Reading")],
        schema.class(SENSOR, "s"),
    );
    select.where_clause = where_clause;
    subquery(select)
}

/// `WITH names(n) AS (SELECT w.Name FROM ONLY ts.Widget w) SELECT names.n FROM names`
fn widget_names_cte(schema: &FixtureSchema) -> Statement {
    let block = CommonTableBlock {
        name: "names".to_string(),
        columns: vec!["n".to_string()],
        select: SelectStatement::single(select_from(
            vec![schema.property("w", WIDGET, "Name")],
            schema.only(WIDGET, "w"),
        )),
    };
    let derived = Exp::PropertyName(PropertyNameExp {
        class_alias: "names".to_string(),
        path: vec!["n".to_string()],
        target: PropertyTarget::Derived {
            columns: vec!["n".to_string()],
        },
        type_info: primitive(PrimitiveType::String),
    });
    Statement::CommonTable(CommonTableStatement {
        recursive: false,
        blocks: vec![block],
        select: SelectStatement::single(SingleSelect {
            select_list: vec![DerivedProperty::new(derived)],
            from: vec![ClassRef::CommonTableBlock(CommonTableBlockRef {
                name: "names".to_string(),
                alias: None,
            })],
            ..Default::default()
        }),
    })
}

/// `SELECT t.Code FROM ts.Element e <kind> ts.Element t`
fn element_join(schema: &FixtureSchema, kind: JoinKind) -> Statement {
    let join = JoinExp {
        lhs: ClassRef::ClassName(schema.class(ELEMENT, "e")),
        rhs: ClassRef::ClassName(schema.class(ELEMENT, "t")),
        kind,
    };
    statement(SingleSelect {
        select_list: vec![DerivedProperty::new(schema.property("t", ELEMENT, "Code"))],
        from: vec![ClassRef::Join(Box::new(join))],
        ..Default::default()
    })
}

mod comparisons {
    use super::*;

    #[test]
    fn test_point_equality_joins_components_with_and() {
        let schema = FixtureSchema::new();
        let condition = eq(
            schema.property("w", WIDGET, "P"),
            schema.property("w", WIDGET, "Q"),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.ends_with(
            " WHERE ([w].[P_X] = [w].[Q_X] AND [w].[P_Y] = [w].[Q_Y] AND [w].[P_Z] = [w].[Q_Z])"
        ));
    }

    #[test]
    fn test_point_inequality_joins_components_with_or() {
        let schema = FixtureSchema::new();
        let condition = compare(
            schema.property("w", WIDGET, "P"),
            ComparisonOperator::Ne,
            schema.property("w", WIDGET, "Q"),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.ends_with(
            " WHERE ([w].[P_X] <> [w].[Q_X] OR [w].[P_Y] <> [w].[Q_Y] OR [w].[P_Z] <> [w].[Q_Z])"
        ));
    }

    #[test]
    fn test_null_expands_to_operand_width() {
        let schema = FixtureSchema::new();
        let condition = binary(
            schema.property("w", WIDGET, "Position"),
            BooleanOperator::Is,
            null(),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered
            .sql
            .ends_with(" WHERE ([w].[Position_X] IS NULL AND [w].[Position_Y] IS NULL)"));
    }

    #[test]
    fn test_parent_alignment_column_is_elided() {
        let schema = FixtureSchema::new();
        let select = select_where(
            vec![schema.property("Element", ELEMENT, "Code")],
            schema.class(ELEMENT, "Element"),
            binary(schema.property("Element", ELEMENT, "Parent"), BooleanOperator::Is, null()),
        );
        let lowered = lower_ok(&schema, &statement(select));
        assert!(lowered.sql.ends_with(" WHERE [Element].[ParentId] IS NULL"));
        assert!(!lowered.sql.contains("[Element].[ParentRelECClassId] IS NULL"));
    }

    #[test]
    fn test_type_list_drops_subsumed_entries() {
        let schema = FixtureSchema::new();
        let condition = binary(
            schema.property("e", ELEMENT, "ECClassId"),
            BooleanOperator::Is,
            type_list(&[(SPATIAL_ELEMENT, false), (PHYSICAL_ELEMENT, true)]),
        );
        let lowered = lower_ok(&schema, &element_where(&schema, condition));
        assert!(lowered.sql.ends_with(
            " WHERE [e].[ECClassId] IN (SELECT ClassId FROM [main].ec_cache_ClassHierarchy WHERE BaseClassId IN (11))"
        ));
    }

    #[test]
    fn test_multi_column_operand_rejected_in_like() {
        let schema = FixtureSchema::new();
        let condition = Exp::Like(ecsql_ir::LikeExp {
            operand: Box::new(schema.property("w", WIDGET, "Position")),
            pattern: Box::new(string("a%")),
            escape: None,
            negated: false,
        });
        lower_invalid(&schema, &widget_where(&schema, condition), IssueId::MultiColumnOperand);
    }

    #[test]
    fn test_parenthesized_null_still_elides_alignment_column() {
        let schema = FixtureSchema::new();
        let null = Exp::Literal(LiteralExp::new(LiteralValue::Null).with_parentheses());
        let select = select_where(
            vec![schema.property("Element", ELEMENT, "Code")],
            schema.class(ELEMENT, "Element"),
            binary(schema.property("Element", ELEMENT, "Parent"), BooleanOperator::Is, null),
        );
        let lowered = lower_ok(&schema, &statement(select));
        assert!(lowered.sql.ends_with(" WHERE [Element].[ParentId] IS (NULL)"));
        assert!(!lowered.sql.contains("ParentRelECClassId] IS"));
    }

    #[test]
    fn test_exact_type_list_uses_plain_id_list() {
        let schema = FixtureSchema::new();
        let condition = binary(
            schema.property("e", ELEMENT, "ECClassId"),
            BooleanOperator::Is,
            type_list(&[(SPATIAL_ELEMENT, false), (SENSOR, false)]),
        );
        let lowered = lower_ok(&schema, &element_where(&schema, condition));
        assert!(lowered.sql.ends_with(" WHERE [e].[ECClassId] IN (12,13)"));
    }

    #[test]
    fn test_type_list_drops_duplicates() {
        let schema = FixtureSchema::new();
        let condition = binary(
            schema.property("e", ELEMENT, "ECClassId"),
            BooleanOperator::IsNot,
            type_list(&[(SENSOR, false), (SPATIAL_ELEMENT, false), (SENSOR, false)]),
        );
        let lowered = lower_ok(&schema, &element_where(&schema, condition));
        assert!(lowered.sql.ends_with(" WHERE [e].[ECClassId] NOT IN (13,12)"));
    }

    #[test]
    fn test_mixed_type_list_combines_base_and_exact_ids() {
        let schema = FixtureSchema::new();
        let condition = binary(
            schema.property("e", ELEMENT, "ECClassId"),
            BooleanOperator::Is,
            type_list(&[(SPATIAL_ELEMENT, true), (WIDGET, false)]),
        );
        let lowered = lower_ok(&schema, &element_where(&schema, condition));
        assert!(lowered.sql.ends_with(
            " WHERE [e].[ECClassId] IN (SELECT ClassId FROM [main].ec_cache_ClassHierarchy WHERE BaseClassId IN (12) OR ClassId IN (20))"
        ));
    }

    fn position_between(schema: &FixtureSchema, negated: bool) -> Exp {
        let point = primitive(PrimitiveType::Point2d);
        Exp::Between(BetweenExp {
            operand: Box::new(schema.property("w", WIDGET, "Position")),
            lower: Box::new(named_param("lo", 1, point.clone())),
            upper: Box::new(named_param("hi", 2, point)),
            negated,
        })
    }

    #[test]
    fn test_point_between_joins_components_with_and() {
        let schema = FixtureSchema::new();
        let lowered = lower_ok(&schema, &widget_where(&schema, position_between(&schema, false)));
        assert!(lowered.sql.ends_with(
            " WHERE ([w].[Position_X] BETWEEN :_ecdb_ecsqlparam_lo_col1 AND :_ecdb_ecsqlparam_hi_col1 AND [w].[Position_Y] BETWEEN :_ecdb_ecsqlparam_lo_col2 AND :_ecdb_ecsqlparam_hi_col2)"
        ));
    }

    #[test]
    fn test_point_not_between_joins_components_with_or() {
        let schema = FixtureSchema::new();
        let lowered = lower_ok(&schema, &widget_where(&schema, position_between(&schema, true)));
        assert!(lowered.sql.ends_with(
            " WHERE ([w].[Position_X] NOT BETWEEN :_ecdb_ecsqlparam_lo_col1 AND :_ecdb_ecsqlparam_hi_col1 OR [w].[Position_Y] NOT BETWEEN :_ecdb_ecsqlparam_lo_col2 AND :_ecdb_ecsqlparam_hi_col2)"
        ));
    }
}

mod casts {
    use super::*;

    fn select_cast(target: TypeInfo) -> Statement {
        let cast = Exp::Cast(CastExp {
            operand: Box::new(null()),
            target,
        });
        statement(SingleSelect {
            select_list: vec![DerivedProperty::new(cast)],
            ..Default::default()
        })
    }

    #[test]
    fn test_null_cast_to_point() {
        let schema = FixtureSchema::new();
        let lowered = lower_ok(&schema, &select_cast(primitive(PrimitiveType::Point2d)));
        assert_eq!(lowered.sql, "SELECT NULL,NULL");
    }

    #[test]
    fn test_null_cast_to_struct_counts_leaf_columns() {
        let schema = FixtureSchema::new();
        let target = TypeInfo::Struct(
            StructType::new("ts.Placement")
                .with_member("Origin", primitive(PrimitiveType::Point3d))
                .with_member("Label", primitive(PrimitiveType::String)),
        );
        let lowered = lower_ok(&schema, &select_cast(target));
        assert_eq!(lowered.sql, "SELECT NULL,NULL,NULL,NULL");
    }

    #[test]
    fn test_scalar_cast_uses_native_type() {
        let schema = FixtureSchema::new();
        let cast = Exp::Cast(CastExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            target: primitive(PrimitiveType::Integer),
        });
        let lowered = lower_ok(&schema, &widget_where(&schema, eq(cast, int(3))));
        assert!(lowered.sql.ends_with(" WHERE CAST([w].[Size] AS INTEGER) = 3"));
    }

    #[test]
    fn test_point_cast_to_same_type_is_unchanged() {
        let schema = FixtureSchema::new();
        let cast = Exp::Cast(CastExp {
            operand: Box::new(schema.property("w", WIDGET, "Position")),
            target: primitive(PrimitiveType::Point2d),
        });
        let condition = eq(cast, named_param("pt", 1, primitive(PrimitiveType::Point2d)));
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.ends_with(
            " WHERE ([w].[Position_X] = :_ecdb_ecsqlparam_pt_col1 AND [w].[Position_Y] = :_ecdb_ecsqlparam_pt_col2)"
        ));
    }

    #[test]
    fn test_scalar_cast_to_point_rejected() {
        let schema = FixtureSchema::new();
        let cast = Exp::Cast(CastExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            target: primitive(PrimitiveType::Point2d),
        });
        let condition = eq(schema.property("w", WIDGET, "Position"), cast);
        lower_invalid(
            &schema,
            &widget_where(&schema, condition),
            IssueId::UnsupportedCastTarget,
        );
    }

    #[test]
    fn test_cast_to_struct_rejected() {
        let schema = FixtureSchema::new();
        let cast = Exp::Cast(CastExp {
            operand: Box::new(schema.property("w", WIDGET, "Name")),
            target: TypeInfo::Struct(ecsql_test_utils::fixtures::address_struct()),
        });
        lower_invalid(
            &schema,
            &statement(select_from(vec![cast], schema.only(WIDGET, "w"))),
            IssueId::UnsupportedCastTarget,
        );
    }
}

mod quantified {
    use super::*;

    #[test]
    fn test_all_becomes_not_exists_with_negated_comparison() {
        let schema = FixtureSchema::new();
        let condition = Exp::AllOrAny(AllOrAnyExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            op: ComparisonOperator::Gt,
            quantifier: Quantifier::All,
            subquery: sensor_readings(&schema, None),
        });
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.contains(" WHERE NOT EXISTS(SELECT [s].[Reading] FROM ("));
        assert!(lowered.sql.ends_with(" [s] WHERE [w].[Size] <= [s].[Reading])"));
    }

    #[test]
    fn test_any_keeps_original_where() {
        let schema = FixtureSchema::new();
        let guard = compare(
            schema.property("s", SENSOR, "Reading"),
            ComparisonOperator::Gt,
            int(0),
        );
        let condition = Exp::AllOrAny(AllOrAnyExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            op: ComparisonOperator::Lt,
            quantifier: Quantifier::Any,
            subquery: sensor_readings(&schema, Some(guard)),
        });
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.contains(" WHERE EXISTS(SELECT [s].[Reading] FROM ("));
        assert!(lowered
            .sql
            .ends_with(" [s] WHERE ([s].[Reading] > 0) AND [w].[Size] < [s].[Reading])"));
    }

    #[test]
    fn test_compound_subquery_rejected() {
        let schema = FixtureSchema::new();
        let mut sub = sensor_readings(&schema, None);
        sub.rest.push(ecsql_ir::CompoundSelect {
            op: ecsql_ir::CompoundOperator::Union,
            select: select_from(
                vec![schema.property("x", SENSOR, "Reading")],
                schema.class(SENSOR, "x"),
            ),
        });
        let condition = Exp::AllOrAny(AllOrAnyExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            op: ComparisonOperator::Eq,
            quantifier: Quantifier::Some,
            subquery: sub,
        });
        lower_invalid(
            &schema,
            &widget_where(&schema, condition),
            IssueId::CompoundQuantifiedSubquery,
        );
    }
}

mod parameters {
    use super::*;

    #[test]
    fn test_named_parameter_reused() {
        let schema = FixtureSchema::new();
        let string_type = primitive(PrimitiveType::String);
        let condition = and(
            eq(schema.property("w", WIDGET, "Name"), named_param("n", 1, string_type.clone())),
            compare(
                schema.property("w", WIDGET, "Name"),
                ComparisonOperator::Ne,
                named_param("n", 2, string_type),
            ),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert_eq!(lowered.parameters.len(), 1);
        assert_eq!(
            lowered.parameters.named("n"),
            Some(&[":_ecdb_ecsqlparam_n_col1".to_string()][..])
        );
        assert_eq!(lowered.sql.matches(":_ecdb_ecsqlparam_n_col1").count(), 2);
    }

    #[test]
    fn test_point_parameter_binds_one_name_per_component() {
        let schema = FixtureSchema::new();
        let condition = eq(
            schema.property("w", WIDGET, "Position"),
            named_param("pt", 1, primitive(PrimitiveType::Point2d)),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert_eq!(
            lowered.parameters.named("pt"),
            Some(
                &[
                    ":_ecdb_ecsqlparam_pt_col1".to_string(),
                    ":_ecdb_ecsqlparam_pt_col2".to_string()
                ][..]
            )
        );
        assert!(lowered.sql.ends_with(
            "([w].[Position_X] = :_ecdb_ecsqlparam_pt_col1 AND [w].[Position_Y] = :_ecdb_ecsqlparam_pt_col2)"
        ));
    }
}

mod functions {
    use super::*;

    fn select_widget(schema: &FixtureSchema, item: Exp) -> Statement {
        statement(select_from(vec![item], schema.only(WIDGET, "w")))
    }

    #[test]
    fn test_count_star() {
        let schema = FixtureSchema::new();
        let mut count = FunctionCallExp::new("count", vec![]);
        count.star_arg = true;
        let lowered = lower_ok(&schema, &select_widget(&schema, Exp::FunctionCall(count)));
        assert!(lowered.sql.starts_with("SELECT COUNT(*) FROM ("));
    }

    #[test]
    fn test_aggregate_predicate_rewrite() {
        let schema = FixtureSchema::new();
        let any = call("any", vec![schema.property("w", WIDGET, "Flag")]);
        let lowered = lower_ok(&schema, &select_widget(&schema, any));
        assert!(lowered.sql.starts_with("SELECT MAX([w].[Flag])<>0 FROM ("));
    }

    #[test]
    fn test_disabled_function_rejected() {
        let schema = FixtureSchema::new();
        let upper = call("upper", vec![schema.property("w", WIDGET, "Name")]);
        lower_invalid_with(
            &schema,
            LoweringConfig::default().with_disabled_function("UPPER"),
            &select_widget(&schema, upper),
            IssueId::DisabledFunction,
        );
    }

    #[test]
    fn test_window_function_requires_over() {
        let schema = FixtureSchema::new();
        lower_invalid(
            &schema,
            &select_widget(&schema, call("row_number", vec![])),
            IssueId::WindowFunctionWithoutOver,
        );
    }

    #[test]
    fn test_window_function_with_partition_and_order() {
        let schema = FixtureSchema::new();
        let window = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("row_number", vec![]),
            filter: None,
            over: WindowOver::Spec(WindowSpec {
                partition_by: vec![PartitionColumn {
                    exp: schema.property("w", WIDGET, "Color"),
                    collation: None,
                }],
                order_by: vec![OrderBySpec::new(schema.property("w", WIDGET, "Size")).desc()],
                ..Default::default()
            }),
        });
        let lowered = lower_ok(&schema, &select_widget(&schema, window));
        assert!(lowered.sql.starts_with(
            "SELECT ROW_NUMBER() OVER (PARTITION BY [w].[Color] ORDER BY [w].[Size] DESC) FROM ("
        ));
    }

    #[test]
    fn test_partition_by_literal_rejected() {
        let schema = FixtureSchema::new();
        let window = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("rank", vec![]),
            filter: None,
            over: WindowOver::Spec(WindowSpec {
                partition_by: vec![PartitionColumn {
                    exp: int(1),
                    collation: None,
                }],
                ..Default::default()
            }),
        });
        lower_invalid(
            &schema,
            &select_widget(&schema, window),
            IssueId::InvalidPartitionColumn,
        );
    }

    #[test]
    fn test_current_timestamp_wrapped_in_julianday() {
        let schema = FixtureSchema::new();
        let select = SingleSelect {
            select_list: vec![DerivedProperty::new(call("current_timestamp", vec![]))],
            ..Default::default()
        };
        assert_eq!(
            lower_ok(&schema, &statement(select)).sql,
            "SELECT JULIANDAY(CURRENT_TIMESTAMP)"
        );

        let condition = compare(
            schema.property("w", WIDGET, "Created"),
            ComparisonOperator::Lt,
            call("current_date", vec![]),
        );
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(lowered.sql.ends_with(" WHERE [w].[Created] < JULIANDAY(CURRENT_DATE)"));
    }

    #[test]
    fn test_window_filter_collation_and_frame() {
        let schema = FixtureSchema::new();
        let window = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("every", vec![schema.property("w", WIDGET, "Flag")]),
            filter: Some(Box::new(compare(
                schema.property("w", WIDGET, "Size"),
                ComparisonOperator::Gt,
                int(1),
            ))),
            over: WindowOver::Spec(WindowSpec {
                partition_by: vec![PartitionColumn {
                    exp: schema.property("w", WIDGET, "Name"),
                    collation: Some(Collation::NoCase),
                }],
                frame: Some(WindowFrame {
                    unit: FrameUnit::Groups,
                    extent: FrameExtent::Between {
                        first: FrameBound::Preceding(Box::new(int(2))),
                        second: FrameBound::UnboundedFollowing,
                    },
                    exclusion: Some(FrameExclusion::Ties),
                }),
                ..Default::default()
            }),
        });
        let lowered = lower_ok(&schema, &select_widget(&schema, window));
        assert!(lowered.sql.starts_with(
            "SELECT MIN([w].[Flag]) FILTER(WHERE [w].[Size] > 1) OVER (PARTITION BY [w].[Name] COLLATE NOCASE GROUPS BETWEEN 2 PRECEDING AND UNBOUNDED FOLLOWING EXCLUDE CURRENT ROW)<>0 FROM ("
        ));
    }

    #[test]
    fn test_named_window_and_window_clause() {
        let schema = FixtureSchema::new();
        let rank = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("rank", vec![]),
            filter: None,
            over: WindowOver::Name("win".to_string()),
        });
        let mut select = select_from(vec![rank], schema.only(WIDGET, "w"));
        select.window_clause = vec![WindowDefinition {
            name: "win".to_string(),
            spec: WindowSpec {
                partition_by: vec![PartitionColumn {
                    exp: schema.property("w", WIDGET, "Color"),
                    collation: None,
                }],
                order_by: vec![OrderBySpec::new(schema.property("w", WIDGET, "Size"))],
                ..Default::default()
            },
        }];
        let lowered = lower_ok(&schema, &statement(select));
        assert!(lowered.sql.starts_with("SELECT RANK() OVER [win] FROM ("));
        assert!(lowered.sql.ends_with(
            " [w] WINDOW [win] AS (PARTITION BY [w].[Color] ORDER BY [w].[Size])"
        ));
    }

    #[test]
    fn test_inverted_frame_rejected() {
        let schema = FixtureSchema::new();
        let window = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("row_number", vec![]),
            filter: None,
            over: WindowOver::Spec(WindowSpec {
                frame: Some(WindowFrame {
                    unit: FrameUnit::Rows,
                    extent: FrameExtent::Between {
                        first: FrameBound::CurrentRow,
                        second: FrameBound::Preceding(Box::new(int(1))),
                    },
                    exclusion: None,
                }),
                ..Default::default()
            }),
        });
        lower_invalid(&schema, &select_widget(&schema, window), IssueId::InvalidFrameBound);
    }
}

mod navigation {
    use super::*;

    #[test]
    fn test_navigation_value_without_from() {
        let schema = FixtureSchema::new();
        let select = SingleSelect {
            select_list: vec![DerivedProperty::new(parent_nav_value(&schema, int(42)))],
            ..Default::default()
        };
        let lowered = lower_ok(&schema, &statement(select));
        assert_eq!(lowered.sql, "SELECT 42 [Parent_0],30 [Parent_1]");
    }

    #[test]
    fn test_non_positive_id_rejected() {
        let schema = FixtureSchema::new();
        let select = SingleSelect {
            select_list: vec![DerivedProperty::new(parent_nav_value(&schema, int(0)))],
            ..Default::default()
        };
        lower_invalid(&schema, &statement(select), IssueId::InvalidNavigationId);
    }

    #[test]
    fn test_property_id_requires_from() {
        let schema = FixtureSchema::new();
        let id = schema.property("w", WIDGET, "Count");
        let select = SingleSelect {
            select_list: vec![DerivedProperty::new(parent_nav_value(&schema, id))],
            ..Default::default()
        };
        lower_invalid(&schema, &statement(select), IssueId::NavigationRequiresFrom);
    }

    #[test]
    fn test_nested_alias_names_navigation_columns() {
        let schema = FixtureSchema::new();
        let mut property = DerivedProperty::new(parent_nav_value(&schema, int(7)));
        property.nested_alias = Some("Owner".to_string());
        let select = SingleSelect {
            select_list: vec![property],
            ..Default::default()
        };
        let lowered = lower_ok(&schema, &statement(select));
        assert_eq!(lowered.sql, "SELECT 7 [Owner_0],30 [Owner_1]");
    }

    #[test]
    fn test_navigation_value_in_quantified_subquery_is_unaliased() {
        let schema = FixtureSchema::new();
        let nav = parent_nav_value(&schema, schema.property("e", ELEMENT, "ECInstanceId"));
        let condition = Exp::AllOrAny(AllOrAnyExp {
            operand: Box::new(schema.property("w", WIDGET, "Size")),
            op: ComparisonOperator::Eq,
            quantifier: Quantifier::Any,
            subquery: subquery(select_from(vec![nav], schema.class(ELEMENT, "e"))),
        });
        let lowered = lower_ok(&schema, &widget_where(&schema, condition));
        assert!(!lowered.sql.contains("[Parent_"), "{}", lowered.sql);
        assert!(lowered.sql.contains("EXISTS(SELECT [e].[ECInstanceId],30 FROM ("));
        assert!(lowered.sql.ends_with(
            " [e] WHERE ([w].[Size] = [e].[ECInstanceId] OR [w].[Size] = 30))"
        ));
    }
}

mod joins {
    use super::*;

    #[test]
    fn test_natural_join_rejected() {
        let schema = FixtureSchema::new();
        lower_invalid(
            &schema,
            &element_join(&schema, JoinKind::Natural(JoinType::Inner)),
            IssueId::NaturalJoinUnsupported,
        );
    }

    #[test]
    fn test_join_using_columns_rejected() {
        let schema = FixtureSchema::new();
        let kind = JoinKind::Qualified {
            join_type: JoinType::Inner,
            spec: ecsql_ir::JoinSpec::Using(vec!["Code".to_string()]),
        };
        lower_invalid(&schema, &element_join(&schema, kind), IssueId::JoinUsingUnsupported);
    }

    #[test]
    fn test_relationship_join_through_link_table() {
        let schema = FixtureSchema::new();
        let kind = JoinKind::Relationship {
            relationship: schema.class(ELEMENT_REFERS_TO_ELEMENTS, "r"),
            direction: JoinDirection::Implied,
        };
        let lowered = lower_ok(&schema, &element_join(&schema, kind));
        assert!(lowered
            .sql
            .contains(" ON [r].[SourceECInstanceId]=[e].[ECInstanceId] INNER JOIN ("));
        assert!(lowered
            .sql
            .ends_with(" ON [t].[ECInstanceId]=[r].[TargetECInstanceId]"));
    }

    #[test]
    fn test_unmapped_relationship_not_usable() {
        let schema = FixtureSchema::new();
        let kind = JoinKind::Relationship {
            relationship: schema.class(ELEMENT_OWNS_CHILD_ELEMENTS, "r"),
            direction: JoinDirection::Forward,
        };
        lower_invalid(&schema, &element_join(&schema, kind), IssueId::ClassNotUsable);
    }
}

mod class_views {
    use super::*;

    #[test]
    fn test_polymorphic_view_unions_tables() {
        let schema = FixtureSchema::new();
        let select = select_from(
            vec![schema.property("p", PHYSICAL_ELEMENT, "Code")],
            schema.class(PHYSICAL_ELEMENT, "p"),
        );
        let lowered = lower_ok(&schema, &statement(select));
        assert!(lowered.sql.contains(" FROM [main].[ts_Element] WHERE [ts_Element].[ECClassId] IN (SELECT ClassId FROM [main].ec_cache_ClassHierarchy WHERE BaseClassId=11) UNION ALL SELECT "));
        assert!(lowered.sql.contains(" FROM [main].[ts_Sensor]) [p]"));
        assert!(lowered.sql.contains("13 [ECClassId]"));
    }

    #[test]
    fn test_polymorphic_settings_rejected() {
        let schema = FixtureSchema::new();
        let select = select_from(
            vec![schema.property("s", SETTINGS, "Key")],
            schema.class(SETTINGS, "s"),
        );
        lower_invalid(&schema, &statement(select), IssueId::PolymorphismNotAllowed);
    }

    #[test]
    fn test_only_settings_allowed() {
        let schema = FixtureSchema::new();
        let select = select_from(
            vec![schema.property("s", SETTINGS, "Key")],
            schema.only(SETTINGS, "s"),
        );
        let lowered = lower_ok(&schema, &statement(select));
        assert!(lowered.sql.starts_with("SELECT [s].[Key] FROM (SELECT [ts_Settings].[Id] [ECInstanceId],21 [ECClassId],[ts_Settings].[Key] [Key] FROM [main].[ts_Settings]) [s]"));
    }

    fn widget_name_exists(schema: &FixtureSchema) -> Statement {
        let nested = select_from(
            vec![schema.property("x", WIDGET, "Name")],
            schema.only(WIDGET, "x"),
        );
        widget_where(
            schema,
            Exp::SubqueryTest(ecsql_ir::SubqueryTestExp {
                kind: ecsql_ir::SubqueryTestKind::Exists,
                subquery: subquery(nested),
            }),
        )
    }

    #[test]
    fn test_nested_view_pruned_to_used_properties() {
        let schema = FixtureSchema::new();
        let pruned = "(SELECT [ts_Widget].[Id] [ECInstanceId],20 [ECClassId],[ts_Widget].[Name] [Name] FROM [main].[ts_Widget]) [x]";

        let (result, _) = lower_with(
            &schema,
            LoweringConfig::default().with_nested_select_optimization(true),
            &widget_name_exists(&schema),
        );
        let optimized = result.unwrap().sql;
        assert!(optimized.contains(pruned), "{optimized}");
        assert!(optimized.contains("[ts_Widget].[Size] [Size]"));

        let (result, _) = lower_with(
            &schema,
            LoweringConfig::default().with_nested_select_optimization(false),
            &widget_name_exists(&schema),
        );
        let full = result.unwrap().sql;
        assert!(!full.contains(pruned), "{full}");
    }
}

mod dml {
    use super::*;

    #[test]
    fn test_delete_only_adds_class_id_filter() {
        let schema = FixtureSchema::new();
        let delete = Statement::Delete(DeleteStatement {
            class: schema.only(PHYSICAL_ELEMENT, "p"),
            where_clause: Some(eq(schema.property("p", PHYSICAL_ELEMENT, "Code"), string("a"))),
        });
        let lowered = lower_ok(&schema, &delete);
        assert_eq!(
            lowered.sql,
            "DELETE FROM [ts_Element] WHERE ([Code] = 'a') AND (ECClassId=11)"
        );
    }

    #[test]
    fn test_polymorphic_delete_filters_hierarchy() {
        let schema = FixtureSchema::new();
        let delete = Statement::Delete(DeleteStatement {
            class: schema.class(SPATIAL_ELEMENT, "s"),
            where_clause: None,
        });
        let lowered = lower_ok(&schema, &delete);
        assert_eq!(
            lowered.sql,
            "DELETE FROM [ts_Element] WHERE (ECClassId IN (SELECT ClassId FROM [main].ec_cache_ClassHierarchy WHERE BaseClassId=12))"
        );
    }

    #[test]
    fn test_polymorphic_delete_across_tables_rejected() {
        let schema = FixtureSchema::new();
        let delete = Statement::Delete(DeleteStatement {
            class: schema.class(PHYSICAL_ELEMENT, "p"),
            where_clause: None,
        });
        lower_invalid(&schema, &delete, IssueId::PolymorphicDmlSpansTables);
    }

    #[test]
    fn test_insert_expands_point_and_null() {
        let schema = FixtureSchema::new();
        let insert = Statement::Insert(InsertStatement {
            class: schema.only(WIDGET, "w"),
            properties: vec![
                property_name(schema.property("w", WIDGET, "Name")),
                property_name(schema.property("w", WIDGET, "Position")),
            ],
            values: vec![string("w1"), null()],
        });
        let lowered = lower_ok(&schema, &insert);
        assert_eq!(
            lowered.sql,
            "INSERT INTO [ts_Widget]([Name],[Position_X],[Position_Y]) VALUES ('w1',NULL,NULL)"
        );
    }

    #[test]
    fn test_insert_into_shared_table_sets_class_id() {
        let schema = FixtureSchema::new();
        let insert = Statement::Insert(InsertStatement {
            class: schema.only(SPATIAL_ELEMENT, "s"),
            properties: vec![property_name(schema.property("s", SPATIAL_ELEMENT, "Code"))],
            values: vec![named_param("code", 1, primitive(PrimitiveType::String))],
        });
        let lowered = lower_ok(&schema, &insert);
        assert_eq!(
            lowered.sql,
            "INSERT INTO [ts_Element]([Code],[ECClassId]) VALUES (:_ecdb_ecsqlparam_code_col1,12)"
        );
    }

    #[test]
    fn test_insert_count_mismatch_rejected() {
        let schema = FixtureSchema::new();
        let insert = Statement::Insert(InsertStatement {
            class: schema.only(WIDGET, "w"),
            properties: vec![property_name(schema.property("w", WIDGET, "Name"))],
            values: vec![string("a"), string("b")],
        });
        lower_invalid(&schema, &insert, IssueId::InsertValueCountMismatch);
    }

    #[test]
    fn test_update_sets_every_component() {
        let schema = FixtureSchema::new();
        let update = Statement::Update(UpdateStatement {
            class: schema.only(WIDGET, "w"),
            assignments: vec![Assignment {
                property: property_name(schema.property("w", WIDGET, "Position")),
                value: named_param("pos", 1, primitive(PrimitiveType::Point2d)),
            }],
            where_clause: Some(eq(schema.property("w", WIDGET, "Name"), string("x"))),
        });
        let lowered = lower_ok(&schema, &update);
        assert_eq!(
            lowered.sql,
            "UPDATE [ts_Widget] SET [Position_X]=:_ecdb_ecsqlparam_pos_col1,[Position_Y]=:_ecdb_ecsqlparam_pos_col2 WHERE [Name] = 'x'"
        );
    }

    #[test]
    fn test_update_only_shared_table_adds_class_id_filter() {
        let schema = FixtureSchema::new();
        let update = Statement::Update(UpdateStatement {
            class: schema.only(SPATIAL_ELEMENT, "s"),
            assignments: vec![Assignment {
                property: property_name(schema.property("s", SPATIAL_ELEMENT, "Code")),
                value: string("c"),
            }],
            where_clause: None,
        });
        let lowered = lower_ok(&schema, &update);
        assert_eq!(
            lowered.sql,
            "UPDATE [ts_Element] SET [Code]='c' WHERE (ECClassId=12)"
        );
    }

    #[test]
    fn test_polymorphic_insert_rejected() {
        let schema = FixtureSchema::new();
        let insert = Statement::Insert(InsertStatement {
            class: schema.class(WIDGET, "w"),
            properties: vec![property_name(schema.property("w", WIDGET, "Name"))],
            values: vec![string("a")],
        });
        lower_invalid(&schema, &insert, IssueId::PolymorphismNotAllowed);
    }

    #[test]
    fn test_polymorphic_update_rejected() {
        let schema = FixtureSchema::new();
        let update = Statement::Update(UpdateStatement {
            class: schema.class(SPATIAL_ELEMENT, "s"),
            assignments: vec![Assignment {
                property: property_name(schema.property("s", SPATIAL_ELEMENT, "Code")),
                value: string("c"),
            }],
            where_clause: None,
        });
        lower_invalid(&schema, &update, IssueId::PolymorphismNotAllowed);
    }
}

mod connections {
    use super::*;

    #[test]
    fn test_secondary_connection_rejects_dml() {
        let schema = FixtureSchema::new();
        let config = LoweringConfig::default();
        let functions = FunctionRegistry::new();
        let mut issues = IssueLog::new();
        let delete = Statement::Delete(DeleteStatement {
            class: schema.only(WIDGET, "w"),
            where_clause: None,
        });

        let mut ctx = PrepareContext::new(schema.catalog(), &config, &functions, &mut issues)
            .on_secondary_connection();
        let err = prepare(&mut ctx, &delete).unwrap_err();
        assert_eq!(err.issue(), Some(IssueId::StatementNotAllowedOnConnection));

        let select = widget_where(&FixtureSchema::new(), eq(int(1), int(1)));
        let sql = prepare(&mut ctx, &select).unwrap();
        assert_well_formed(&sql);
    }

    #[test]
    fn test_context_reusable_after_failure() {
        let schema = FixtureSchema::new();
        let config = LoweringConfig::default();
        let functions = FunctionRegistry::new();
        let mut issues = IssueLog::new();
        let mut ctx = PrepareContext::new(schema.catalog(), &config, &functions, &mut issues);

        let bad = Statement::Delete(DeleteStatement {
            class: schema.class(PHYSICAL_ELEMENT, "p"),
            where_clause: None,
        });
        assert!(prepare(&mut ctx, &bad).is_err());

        let good = Statement::Delete(DeleteStatement {
            class: schema.only(WIDGET, "w"),
            where_clause: None,
        });
        assert_eq!(prepare(&mut ctx, &good).unwrap(), "DELETE FROM [ts_Widget]");
    }
}

mod corpus {
    use super::*;
    use ecsql_ir::{CaseExp, IifExp, LikeExp, SubqueryTestExp, SubqueryTestKind, WhenThen};

    fn string_type() -> TypeInfo {
        primitive(PrimitiveType::String)
    }

    fn select_widget(schema: &FixtureSchema, items: Vec<Exp>) -> Statement {
        statement(select_from(items, schema.only(WIDGET, "w")))
    }

    fn corpus(schema: &FixtureSchema) -> Vec<Statement> {
        let size = || schema.property("w", WIDGET, "Size");
        let case = Exp::Case(CaseExp {
            whens: vec![WhenThen {
                when: compare(size(), ComparisonOperator::Gt, int(10)),
                then: string("large"),
            }],
            otherwise: Some(Box::new(string("small"))),
            type_info: string_type(),
        });
        let iif = Exp::Iif(IifExp {
            condition: Box::new(schema.property("w", WIDGET, "Flag")),
            then: Box::new(int(1)),
            otherwise: Box::new(int(0)),
            type_info: primitive(PrimitiveType::Integer),
        });
        let cast = Exp::Cast(CastExp {
            operand: Box::new(size()),
            target: primitive(PrimitiveType::String),
        });
        let between = Exp::Between(BetweenExp {
            operand: Box::new(size()),
            lower: Box::new(int(1)),
            upper: Box::new(int(5)),
            negated: false,
        });
        let like = Exp::Like(LikeExp {
            operand: Box::new(schema.property("w", WIDGET, "Name")),
            pattern: Box::new(string("a%")),
            escape: Some(Box::new(string("\\"))),
            negated: true,
        });
        let window = Exp::WindowFunction(WindowFunctionExp {
            function: FunctionCallExp::new("sum", vec![size()]),
            filter: None,
            over: WindowOver::Spec(WindowSpec {
                order_by: vec![OrderBySpec::new(schema.property("w", WIDGET, "Name")).desc()],
                ..Default::default()
            }),
        });
        let all = Exp::AllOrAny(AllOrAnyExp {
            operand: Box::new(size()),
            op: ComparisonOperator::Ge,
            quantifier: Quantifier::All,
            subquery: sensor_readings(schema, None),
        });
        let exists = Exp::SubqueryTest(SubqueryTestExp {
            kind: SubqueryTestKind::Exists,
            subquery: sensor_readings(schema, None),
        });
        let classes = binary(
            schema.property("e", ELEMENT, "ECClassId"),
            BooleanOperator::Is,
            type_list(&[(PHYSICAL_ELEMENT, true), (ELEMENT, false)]),
        );
        let nav = SingleSelect {
            select_list: vec![DerivedProperty::new(parent_nav_value(
                schema,
                schema.property("e", ELEMENT, "ECInstanceId"),
            ))],
            from: vec![ClassRef::ClassName(schema.class(ELEMENT, "e"))],
            ..Default::default()
        };
        let relationship = JoinKind::Relationship {
            relationship: schema.class(ELEMENT_REFERS_TO_ELEMENTS, "r"),
            direction: JoinDirection::Forward,
        };

        vec![
            widget_where(schema, eq(schema.property("w", WIDGET, "Color"), int(3))),
            statement(select_from(
                vec![schema.property("e", ELEMENT, "Origin")],
                schema.class(ELEMENT, "e"),
            )),
            statement(select_from(
                vec![schema.property("s", SPATIAL_ELEMENT, "Location")],
                schema.class(SPATIAL_ELEMENT, "s"),
            )),
            select_widget(schema, vec![case, iif, cast, window]),
            widget_where(schema, and(between, like)),
            widget_where(schema, and(all, exists)),
            element_where(schema, classes),
            statement(nav),
            element_join(schema, relationship),
            widget_names_cte(schema),
            Statement::Insert(InsertStatement {
                class: schema.only(WIDGET, "w"),
                properties: vec![property_name(schema.property("w", WIDGET, "Name"))],
                values: vec![named_param("name", 1, string_type())],
            }),
            Statement::Update(UpdateStatement {
                class: schema.only(WIDGET, "w"),
                assignments: vec![Assignment {
                    property: property_name(schema.property("w", WIDGET, "Size")),
                    value: double(2.5),
                }],
                where_clause: Some(eq(schema.property("w", WIDGET, "Name"), string("x"))),
            }),
            Statement::Delete(DeleteStatement {
                class: schema.class(SPATIAL_ELEMENT, "s"),
                where_clause: Some(binary(
                    schema.property("s", SPATIAL_ELEMENT, "Location.Pos"),
                    BooleanOperator::IsNot,
                    null(),
                )),
            }),
        ]
    }

    #[test]
    fn test_corpus_produces_well_formed_sql() {
        let schema = FixtureSchema::new();
        for statement in &corpus(&schema) {
            lower_ok(&schema, statement);
        }
    }
}

mod statements {
    use super::*;
    use ecsql_ir::{
        CompoundOperator, CompoundSelect, SubqueryTestExp, SubqueryTestKind,
        TableValuedFunctionExp,
    };

    #[test]
    fn test_common_table_expression() {
        let schema = FixtureSchema::new();
        let lowered = lower_ok(&schema, &widget_names_cte(&schema));
        assert!(lowered.sql.starts_with("WITH [names]([n]) AS (SELECT [w].[Name] FROM ("));
        assert!(lowered.sql.ends_with(") SELECT [names].[n] FROM [names]"));
    }

    #[test]
    fn test_compound_select() {
        let schema = FixtureSchema::new();
        let mut select = SelectStatement::single(select_from(
            vec![schema.property("w", WIDGET, "Name")],
            schema.only(WIDGET, "w"),
        ));
        select.rest.push(CompoundSelect {
            op: CompoundOperator::UnionAll,
            select: select_from(
                vec![schema.property("s", SETTINGS, "Key")],
                schema.only(SETTINGS, "s"),
            ),
        });
        let lowered = lower_ok(&schema, &Statement::Select(select));
        assert!(lowered.sql.contains(" [w] UNION ALL SELECT [s].[Key] FROM ("));
    }

    fn json_each_select() -> Statement {
        statement(SingleSelect {
            select_list: vec![DerivedProperty::new(int(1))],
            from: vec![ClassRef::TableValuedFunction(TableValuedFunctionExp {
                function: FunctionCallExp::new("json_each", vec![string("[1,2]")]),
                alias: Some("j".to_string()),
            })],
            ..Default::default()
        })
    }

    #[test]
    fn test_table_valued_function_requires_experimental_features() {
        let schema = FixtureSchema::new();
        lower_invalid(&schema, &json_each_select(), IssueId::ExperimentalFeatureDisabled);

        let (result, _) = lower_with(
            &schema,
            LoweringConfig::default().with_experimental_features(true),
            &json_each_select(),
        );
        assert_eq!(result.unwrap().sql, "SELECT 1 FROM JSON_EACH('[1,2]') [j]");
    }

    #[test]
    fn test_unique_subquery_rejected() {
        let schema = FixtureSchema::new();
        let condition = Exp::SubqueryTest(SubqueryTestExp {
            kind: SubqueryTestKind::Unique,
            subquery: subquery(select_from(
                vec![schema.property("s", SENSOR, "Reading")],
                schema.class(SENSOR, "s"),
            )),
        });
        lower_invalid(
            &schema,
            &widget_where(&schema, condition),
            IssueId::UniqueSubqueryUnsupported,
        );
    }

    #[test]
    fn test_expression_depth_limit() {
        let schema = FixtureSchema::new();
        let mut condition = eq(schema.property("w", WIDGET, "Color"), int(0));
        for i in 1..8 {
            condition = and(condition, eq(schema.property("w", WIDGET, "Color"), int(i)));
        }
        lower_invalid_with(
            &schema,
            LoweringConfig::default().with_max_expression_depth(4),
            &widget_where(&schema, condition),
            IssueId::ExpressionTooDeep,
        );
    }
}
