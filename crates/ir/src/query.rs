// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statements and class references
//!
//! ## Statements
//!
//! [`Statement`] is the root of every prepare call:
//!
//! - `Select`: a single select or a compound (`UNION [ALL]`, `INTERSECT`, `EXCEPT`)
//! - `CommonTable`: `WITH [RECURSIVE] name(cols) AS (...) SELECT ...`
//! - `Insert`, `Update`, `Delete`: DML against exactly one class
//!
//! ## Class references
//!
//! [`ClassRef`] is an item of a FROM clause:
//!
//! ```sql
//! FROM ts.Element e                                   -- ClassName (polymorphic)
//! FROM ONLY ts.Element                                -- ClassName (exact)
//! FROM ts.Element a JOIN ts.Element b ON a.Code = b.Code
//! FROM ts.Element a JOIN ts.Element b USING ts.ElementRefersToElements FORWARD
//! FROM (SELECT Code FROM ts.Element) sub
//! FROM json_each(:doc) j                              -- table-valued function
//! ```

use serde::{Deserialize, Serialize};

use crate::expr::{Exp, FunctionCallExp, PropertyNameExp, SetQuantifier};
use crate::metadata::ClassId;
use crate::window::WindowDefinition;

/// Root statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(SelectStatement),
    CommonTable(CommonTableStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) | Statement::CommonTable(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }
}

/// Statement kind tracked by the lowering scope stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// Compound operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl CompoundOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompoundOperator::Union => "UNION",
            CompoundOperator::UnionAll => "UNION ALL",
            CompoundOperator::Intersect => "INTERSECT",
            CompoundOperator::Except => "EXCEPT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundSelect {
    pub op: CompoundOperator,
    pub select: SingleSelect,
}

/// A single select optionally followed by compound parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub first: SingleSelect,
    #[serde(default)]
    pub rest: Vec<CompoundSelect>,
}

impl SelectStatement {
    pub fn single(select: SingleSelect) -> Self {
        Self {
            first: select,
            rest: Vec::new(),
        }
    }

    pub fn is_compound(&self) -> bool {
        !self.rest.is_empty()
    }
}

impl From<SingleSelect> for SelectStatement {
    fn from(select: SingleSelect) -> Self {
        SelectStatement::single(select)
    }
}

/// One select-list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedProperty {
    pub exp: Exp,
    pub alias: Option<String>,
    /// Alias assigned when this item is re-exposed by an enclosing
    /// subquery or view
    pub nested_alias: Option<String>,
}

impl DerivedProperty {
    pub fn new(exp: Exp) -> Self {
        Self {
            exp,
            alias: None,
            nested_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBySpec {
    pub exp: Exp,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
}

impl OrderBySpec {
    pub fn new(exp: Exp) -> Self {
        Self {
            exp,
            direction: None,
            nulls: None,
        }
    }

    pub fn desc(mut self) -> Self {
        self.direction = Some(SortDirection::Desc);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOffset {
    pub limit: Exp,
    pub offset: Option<Exp>,
}

/// `SELECT [DISTINCT] ... FROM ... WHERE ... GROUP BY ... HAVING ...
/// WINDOW ... ORDER BY ... LIMIT ...`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SingleSelect {
    #[serde(default)]
    pub quantifier: SetQuantifier,
    pub select_list: Vec<DerivedProperty>,
    /// Comma separated FROM items
    #[serde(default)]
    pub from: Vec<ClassRef>,
    pub where_clause: Option<Exp>,
    #[serde(default)]
    pub group_by: Vec<Exp>,
    pub having: Option<Exp>,
    #[serde(default)]
    pub window_clause: Vec<WindowDefinition>,
    #[serde(default)]
    pub order_by: Vec<OrderBySpec>,
    pub limit: Option<LimitOffset>,
}

/// `ts.Element [AS] e`, `ONLY ts.Element`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNameExp {
    pub class_id: ClassId,
    pub schema: String,
    pub name: String,
    pub alias: Option<String>,
    /// `false` for `ONLY`
    #[serde(default = "default_polymorphic")]
    pub polymorphic: bool,
}

fn default_polymorphic() -> bool {
    true
}

impl ClassNameExp {
    pub fn new(class_id: ClassId, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_id,
            schema: schema.into(),
            name: name.into(),
            alias: None,
            polymorphic: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn only(mut self) -> Self {
        self.polymorphic = false;
        self
    }

    /// Alias used to qualify references: the explicit alias or the class name
    pub fn effective_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinSpec {
    On(Exp),
    Using(Vec<String>),
}

/// Direction keyword of a relationship join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinDirection {
    #[default]
    Implied,
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinKind {
    Cross,
    Natural(JoinType),
    Qualified { join_type: JoinType, spec: JoinSpec },
    /// `JOIN rhs USING relationship [FORWARD|BACKWARD]`
    Relationship {
        relationship: ClassNameExp,
        direction: JoinDirection,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinExp {
    pub lhs: ClassRef,
    pub rhs: ClassRef,
    pub kind: JoinKind,
}

/// `(SELECT ...) alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryRef {
    pub select: Box<SelectStatement>,
    pub alias: String,
}

/// `fn(args) [alias]` in FROM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableValuedFunctionExp {
    pub function: FunctionCallExp,
    pub alias: Option<String>,
}

/// Reference to a common table block by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonTableBlockRef {
    pub name: String,
    pub alias: Option<String>,
}

/// FROM clause item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassRef {
    ClassName(ClassNameExp),
    Join(Box<JoinExp>),
    Subquery(SubqueryRef),
    TableValuedFunction(TableValuedFunctionExp),
    CommonTableBlock(CommonTableBlockRef),
}

/// `name(col, ...) AS (select)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableBlock {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    pub select: SelectStatement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableStatement {
    #[serde(default)]
    pub recursive: bool,
    pub blocks: Vec<CommonTableBlock>,
    pub select: SelectStatement,
}

/// `INSERT INTO class (props) VALUES (values)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub class: ClassNameExp,
    pub properties: Vec<PropertyNameExp>,
    pub values: Vec<Exp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub property: PropertyNameExp,
    pub value: Exp,
}

/// `UPDATE class SET prop = value, ... [WHERE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub class: ClassNameExp,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Exp>,
}

/// `DELETE FROM class [WHERE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub class: ClassNameExp,
    pub where_clause: Option<Exp>,
}
