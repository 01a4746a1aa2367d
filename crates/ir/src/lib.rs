// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # ECSQL - Intermediate Representation
//!
//! Typed, already-resolved ECSQL syntax trees consumed by the lowering
//! layer:
//! - Every value expression knows its [`TypeInfo`] and therefore how many
//!   native columns it occupies
//! - Class references carry resolved [`ClassId`]s
//! - All nodes are serde-serializable so trees can be stored as JSON

pub mod expr;
pub mod metadata;
pub mod query;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use expr::{
    AllOrAnyExp, BetweenExp, BinaryBooleanExp, BinaryValueExp, BinaryValueOperator,
    BooleanOperator, CaseExp, CastExp, ComparisonOperator, EnumValueExp, Exp,
    ExtractInstanceExp, ExtractPropertyExp, FunctionCallExp, IifExp, LikeExp, LiteralExp,
    LiteralValue, NavValueCreationExp, ParameterExp, PropertyNameExp, PropertyTarget, Quantifier,
    SetQuantifier, SubqueryTestExp, SubqueryTestKind, TypeListEntry, TypeListExp,
    UnaryBooleanExp, UnaryValueExp, UnaryValueOperator, WhenThen, WindowFunctionExp, WindowOver,
};
pub use metadata::{
    ClassDef, ClassId, ClassKind, ClassModifier, NavigationDef, PropertyDef, PropertyKind,
    RelationshipDirection, RelationshipEnds,
};
pub use query::{
    Assignment, ClassNameExp, ClassRef, CommonTableBlock, CommonTableBlockRef,
    CommonTableStatement, CompoundOperator, CompoundSelect, DeleteStatement, DerivedProperty,
    InsertStatement, JoinDirection, JoinExp, JoinKind, JoinSpec, JoinType, LimitOffset,
    NullsOrder, OrderBySpec, SelectStatement, SingleSelect, SortDirection, Statement,
    StatementKind, SubqueryRef, TableValuedFunctionExp, UpdateStatement,
};
pub use types::{PrimitiveType, StructMember, StructType, TypeInfo};
pub use window::{
    Collation, FrameBound, FrameExclusion, FrameExtent, FrameStart, FrameUnit, PartitionColumn,
    WindowDefinition, WindowFrame, WindowSpec,
};
