// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module represents typed ECSQL expressions.
//!
//! ## Design
//!
//! [`Exp`] is a closed sum type: one variant per expression kind the
//! lowering layer understands. Every value expression carries (or can
//! compute) a [`TypeInfo`], from which its physical column count follows.
//!
//! Expressions fall into three groups:
//!
//! - **Value expressions**: literals, parameters, property references,
//!   enum values, casts, arithmetic, function calls, `CASE`/`IIF`,
//!   navigation value construction, `extract_prop`/`extract_inst`,
//!   scalar subqueries and value lists
//! - **Boolean expressions**: comparisons (`=`, `<>`, `IS`, `IN`,
//!   `MATCH`, ...), `AND`/`OR`/`NOT`, `BETWEEN`, `LIKE`, quantified
//!   subqueries (`ALL`/`ANY`/`SOME`) and `EXISTS`/`UNIQUE`
//! - **Structural helpers**: type lists (`IS (ts.A, ONLY ts.B)`) and
//!   window function calls
//!
//! Class references and statements live in [`crate::query`]; window
//! specifications in [`crate::window`].
//!
//! ## Example
//!
//! ```sql
//! SELECT Origin FROM ts.Element WHERE Origin = ?
//! ```
//!
//! `Origin` is a `Point3d` property: a [`PropertyNameExp`] whose type
//! spans three columns, so the comparison fans out into three pairs.

use serde::{Deserialize, Serialize};

use crate::metadata::ClassId;
use crate::query::SelectStatement;
use crate::types::{PrimitiveType, TypeInfo};
use crate::window::WindowSpec;

/// A typed ECSQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exp {
    Literal(LiteralExp),
    Parameter(ParameterExp),
    PropertyName(PropertyNameExp),
    EnumValue(EnumValueExp),
    Cast(CastExp),
    BinaryValue(BinaryValueExp),
    UnaryValue(UnaryValueExp),
    FunctionCall(FunctionCallExp),
    Case(CaseExp),
    Iif(IifExp),
    NavValueCreation(NavValueCreationExp),
    ExtractProperty(ExtractPropertyExp),
    ExtractInstance(ExtractInstanceExp),
    /// Scalar subquery `(SELECT ...)`
    Subquery(Box<SelectStatement>),
    /// Parenthesized value list, right operand of `IN`
    ValueList(Vec<Exp>),
    TypeList(TypeListExp),
    WindowFunction(WindowFunctionExp),
    BinaryBoolean(BinaryBooleanExp),
    UnaryBoolean(UnaryBooleanExp),
    Between(BetweenExp),
    Like(LikeExp),
    AllOrAny(AllOrAnyExp),
    SubqueryTest(SubqueryTestExp),
}

impl Exp {
    /// Type of the value this expression produces
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Exp::Literal(lit) => lit.type_info.clone(),
            Exp::Parameter(param) => param.type_info.clone(),
            Exp::PropertyName(prop) => prop.type_info.clone(),
            Exp::EnumValue(value) => match value.value {
                LiteralValue::String(_) => TypeInfo::Primitive(PrimitiveType::String),
                _ => TypeInfo::Primitive(PrimitiveType::Integer),
            },
            Exp::Cast(cast) => cast.target.clone(),
            Exp::BinaryValue(exp) => exp.type_info.clone(),
            Exp::UnaryValue(exp) => exp.type_info.clone(),
            Exp::FunctionCall(call) => call.type_info.clone(),
            Exp::Case(exp) => exp.type_info.clone(),
            Exp::Iif(exp) => exp.type_info.clone(),
            Exp::NavValueCreation(nav) => nav.property.type_info.clone(),
            Exp::ExtractProperty(exp) => exp.type_info.clone(),
            Exp::ExtractInstance(_) => TypeInfo::Primitive(PrimitiveType::String),
            Exp::Subquery(select) => select
                .first
                .select_list
                .first()
                .map(|item| item.exp.type_info())
                .unwrap_or_default(),
            Exp::ValueList(_) | Exp::TypeList(_) => TypeInfo::Unknown,
            Exp::WindowFunction(window) => window.function.type_info.clone(),
            Exp::BinaryBoolean(_)
            | Exp::UnaryBoolean(_)
            | Exp::Between(_)
            | Exp::Like(_)
            | Exp::AllOrAny(_)
            | Exp::SubqueryTest(_) => TypeInfo::Primitive(PrimitiveType::Boolean),
        }
    }

    /// `true` for a bare `NULL` literal, typed or not
    pub fn is_null_literal(&self) -> bool {
        matches!(
            self,
            Exp::Literal(LiteralExp {
                value: LiteralValue::Null,
                ..
            })
        )
    }

    /// `true` if the source text wrapped this expression in parentheses
    pub fn has_parentheses(&self) -> bool {
        match self {
            Exp::Literal(lit) => lit.parenthesized,
            Exp::BinaryValue(exp) => exp.parenthesized,
            Exp::BinaryBoolean(exp) => exp.parenthesized,
            Exp::UnaryBoolean(exp) => exp.parenthesized,
            _ => false,
        }
    }

    pub fn literal(value: LiteralValue) -> Self {
        Exp::Literal(LiteralExp::new(value))
    }

    pub fn null() -> Self {
        Exp::Literal(LiteralExp::new(LiteralValue::Null))
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    /// `DATE '2024-01-01'`
    Date(String),
    /// `TIMESTAMP '2024-01-01T10:00:00Z'`
    Timestamp(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExp {
    pub value: LiteralValue,
    /// For `NULL`, the type inferred from the surrounding expression
    #[serde(default)]
    pub type_info: TypeInfo,
    #[serde(default)]
    pub parenthesized: bool,
}

impl LiteralExp {
    pub fn new(value: LiteralValue) -> Self {
        let type_info = match &value {
            LiteralValue::Null => TypeInfo::Null,
            LiteralValue::Boolean(_) => TypeInfo::Primitive(PrimitiveType::Boolean),
            LiteralValue::Integer(_) => TypeInfo::Primitive(PrimitiveType::Long),
            LiteralValue::Double(_) => TypeInfo::Primitive(PrimitiveType::Double),
            LiteralValue::String(_) => TypeInfo::Primitive(PrimitiveType::String),
            LiteralValue::Date(_) | LiteralValue::Timestamp(_) => {
                TypeInfo::Primitive(PrimitiveType::DateTime)
            }
        };
        Self {
            value,
            type_info,
            parenthesized: false,
        }
    }

    pub fn with_parentheses(mut self) -> Self {
        self.parenthesized = true;
        self
    }

    pub fn with_type(mut self, type_info: TypeInfo) -> Self {
        self.type_info = type_info;
        self
    }
}

/// `?` or `:name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterExp {
    pub name: Option<String>,
    /// 1-based position among all parameters of the statement
    pub index: u32,
    #[serde(default)]
    pub type_info: TypeInfo,
}

/// What a property reference resolves against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyTarget {
    /// A property of the class bound to `class_alias`
    Class { class_id: ClassId },
    /// Columns exposed by a subquery or common table block
    Derived { columns: Vec<String> },
}

/// A (possibly nested) property access, e.g. `e.Location.Street`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNameExp {
    pub class_alias: String,
    pub path: Vec<String>,
    pub target: PropertyTarget,
    pub type_info: TypeInfo,
}

impl PropertyNameExp {
    /// Dotted access string, e.g. `Location.Street`
    pub fn access_string(&self) -> String {
        self.path.join(".")
    }

    pub fn is_system_property(&self) -> bool {
        matches!(
            self.access_string().as_str(),
            "ECInstanceId" | "ECClassId" | "SourceECInstanceId" | "SourceECClassId"
                | "TargetECInstanceId" | "TargetECClassId"
        )
    }
}

/// `ts.Color.Red`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueExp {
    pub enumeration: String,
    pub enumerator: String,
    pub value: LiteralValue,
}

/// `CAST(operand AS target)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastExp {
    pub operand: Box<Exp>,
    pub target: TypeInfo,
}

/// Binary value operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryValueOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
    BitwiseAnd,
    BitwiseOr,
    ShiftLeft,
    ShiftRight,
}

impl BinaryValueOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            BinaryValueOperator::Plus => "+",
            BinaryValueOperator::Minus => "-",
            BinaryValueOperator::Multiply => "*",
            BinaryValueOperator::Divide => "/",
            BinaryValueOperator::Modulo => "%",
            BinaryValueOperator::Concat => "||",
            BinaryValueOperator::BitwiseAnd => "&",
            BinaryValueOperator::BitwiseOr => "|",
            BinaryValueOperator::ShiftLeft => "<<",
            BinaryValueOperator::ShiftRight => ">>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryValueExp {
    pub lhs: Box<Exp>,
    pub op: BinaryValueOperator,
    pub rhs: Box<Exp>,
    #[serde(default)]
    pub type_info: TypeInfo,
    #[serde(default)]
    pub parenthesized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryValueOperator {
    Minus,
    Plus,
    BitwiseNot,
}

impl UnaryValueOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            UnaryValueOperator::Minus => "-",
            UnaryValueOperator::Plus => "+",
            UnaryValueOperator::BitwiseNot => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryValueExp {
    pub op: UnaryValueOperator,
    pub operand: Box<Exp>,
    #[serde(default)]
    pub type_info: TypeInfo,
}

/// `DISTINCT` / `ALL` modifier of a select or an aggregate call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SetQuantifier {
    #[default]
    NotSpecified,
    All,
    Distinct,
}

impl SetQuantifier {
    /// Keyword followed by a space, or empty
    pub fn prefix(self) -> &'static str {
        match self {
            SetQuantifier::NotSpecified => "",
            SetQuantifier::All => "ALL ",
            SetQuantifier::Distinct => "DISTINCT ",
        }
    }
}

/// Function call, e.g. `COUNT(*)`, `UPPER(Name)`, `ANY(Flag)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallExp {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Exp>,
    #[serde(default)]
    pub set_quantifier: SetQuantifier,
    /// `COUNT(*)`
    #[serde(default)]
    pub star_arg: bool,
    #[serde(default)]
    pub type_info: TypeInfo,
}

impl FunctionCallExp {
    pub fn new(name: impl Into<String>, args: Vec<Exp>) -> Self {
        Self {
            name: name.into(),
            args,
            set_quantifier: SetQuantifier::NotSpecified,
            star_arg: false,
            type_info: TypeInfo::Unknown,
        }
    }

    pub fn with_type(mut self, type_info: TypeInfo) -> Self {
        self.type_info = type_info;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenThen {
    pub when: Exp,
    pub then: Exp,
}

/// Searched `CASE WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExp {
    pub whens: Vec<WhenThen>,
    pub otherwise: Option<Box<Exp>>,
    #[serde(default)]
    pub type_info: TypeInfo,
}

/// `IIF(condition, then, otherwise)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IifExp {
    pub condition: Box<Exp>,
    pub then: Box<Exp>,
    pub otherwise: Box<Exp>,
    #[serde(default)]
    pub type_info: TypeInfo,
}

/// `NAVIGATION_VALUE(ts.Element.Parent, id [, relClassId])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavValueCreationExp {
    /// The navigation property the value is built for
    pub property: PropertyNameExp,
    pub id: Box<Exp>,
    pub rel_class_id: Option<Box<Exp>>,
    /// Alias of the resulting column, defaults to the property name
    pub column_alias: String,
}

/// `extract_prop(alias, 'Access.String')`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractPropertyExp {
    pub class_alias: String,
    pub access_string: String,
    #[serde(default)]
    pub type_info: TypeInfo,
}

/// `extract_inst(alias)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractInstanceExp {
    pub class_alias: String,
}

/// One class of an `IS (...)` type list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeListEntry {
    pub class_id: ClassId,
    /// `false` for `ONLY ts.Class`
    pub polymorphic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeListExp {
    pub entries: Vec<TypeListEntry>,
}

/// OVER clause target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowOver {
    Spec(WindowSpec),
    /// `OVER w` referencing a WINDOW clause definition
    Name(String),
}

/// `fn(...) [FILTER (WHERE ...)] OVER ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFunctionExp {
    pub function: FunctionCallExp,
    pub filter: Option<Box<Exp>>,
    pub over: WindowOver,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    /// Logical complement: `NOT (a op b)` equals `a op.negate() b`
    pub fn negate(self) -> Self {
        match self {
            ComparisonOperator::Eq => ComparisonOperator::Ne,
            ComparisonOperator::Ne => ComparisonOperator::Eq,
            ComparisonOperator::Lt => ComparisonOperator::Ge,
            ComparisonOperator::Ge => ComparisonOperator::Lt,
            ComparisonOperator::Le => ComparisonOperator::Gt,
            ComparisonOperator::Gt => ComparisonOperator::Le,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "<>",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }
}

/// Binary boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperator {
    Comparison(ComparisonOperator),
    Is,
    IsNot,
    In,
    NotIn,
    Match,
    NotMatch,
    And,
    Or,
}

impl BooleanOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            BooleanOperator::Comparison(op) => op.as_sql(),
            BooleanOperator::Is => "IS",
            BooleanOperator::IsNot => "IS NOT",
            BooleanOperator::In => "IN",
            BooleanOperator::NotIn => "NOT IN",
            BooleanOperator::Match => "MATCH",
            BooleanOperator::NotMatch => "NOT MATCH",
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }

    /// Operators whose multi-column form holds only if some component
    /// differs. Their pairs are joined with OR, all others with AND.
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            BooleanOperator::Comparison(ComparisonOperator::Ne)
                | BooleanOperator::IsNot
                | BooleanOperator::NotIn
                | BooleanOperator::NotMatch
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryBooleanExp {
    pub lhs: Box<Exp>,
    pub op: BooleanOperator,
    pub rhs: Box<Exp>,
    #[serde(default)]
    pub parenthesized: bool,
}

/// `NOT operand`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryBooleanExp {
    pub operand: Box<Exp>,
    #[serde(default)]
    pub parenthesized: bool,
}

/// `operand [NOT] BETWEEN lower AND upper`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetweenExp {
    pub operand: Box<Exp>,
    pub lower: Box<Exp>,
    pub upper: Box<Exp>,
    #[serde(default)]
    pub negated: bool,
}

/// `operand [NOT] LIKE pattern [ESCAPE escape]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeExp {
    pub operand: Box<Exp>,
    pub pattern: Box<Exp>,
    pub escape: Option<Box<Exp>>,
    #[serde(default)]
    pub negated: bool,
}

/// `ALL`, `ANY` or `SOME`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    All,
    Any,
    Some,
}

/// `operand op ALL|ANY|SOME (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllOrAnyExp {
    pub operand: Box<Exp>,
    pub op: ComparisonOperator,
    pub quantifier: Quantifier,
    pub subquery: Box<SelectStatement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubqueryTestKind {
    Exists,
    Unique,
}

/// `EXISTS (subquery)` / `UNIQUE (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryTestExp {
    pub kind: SubqueryTestKind,
    pub subquery: Box<SelectStatement>,
}
