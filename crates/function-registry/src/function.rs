// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Function definitions

use ecsql_ir::PrimitiveType;
use serde::{Deserialize, Serialize};

/// Function category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
    /// Only valid with an OVER clause
    Window,
    /// Only valid in a FROM clause
    TableValued,
}

/// Rewrite applied when a call is lowered to native SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FunctionRewrite {
    /// Emit `NAME(args)` unchanged
    #[default]
    None,
    /// Boolean aggregate without a native counterpart:
    /// `ANY(x)` becomes `MAX(x)<>0`, `EVERY(x)` becomes `MIN(x)<>0`
    AggregatePredicate { native: &'static str },
    /// Argument-less date/time keyword wrapped as `JULIANDAY(NAME)`
    JulianDay,
}

/// A builtin function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDef {
    pub name: &'static str,
    pub kind: FunctionKind,
    pub rewrite: FunctionRewrite,
    pub min_args: usize,
    /// `None` for variadic functions
    pub max_args: Option<usize>,
    pub returns: Option<PrimitiveType>,
    pub description: &'static str,
}

impl FunctionDef {
    pub fn new(name: &'static str, kind: FunctionKind) -> Self {
        Self {
            name,
            kind,
            rewrite: FunctionRewrite::None,
            min_args: 0,
            max_args: None,
            returns: None,
            description: "",
        }
    }

    pub fn scalar(name: &'static str) -> Self {
        Self::new(name, FunctionKind::Scalar)
    }

    pub fn aggregate(name: &'static str) -> Self {
        Self::new(name, FunctionKind::Aggregate)
    }

    pub fn window(name: &'static str) -> Self {
        Self::new(name, FunctionKind::Window)
    }

    pub fn table_valued(name: &'static str) -> Self {
        Self::new(name, FunctionKind::TableValued)
    }

    pub fn with_args(mut self, min: usize, max: usize) -> Self {
        self.min_args = min;
        self.max_args = Some(max);
        self
    }

    pub fn with_min_args(mut self, min: usize) -> Self {
        self.min_args = min;
        self.max_args = None;
        self
    }

    pub fn with_rewrite(mut self, rewrite: FunctionRewrite) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn with_return(mut self, returns: PrimitiveType) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// `true` if `count` arguments satisfy the declared arity
    pub fn accepts_arg_count(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.is_none_or(|max| count <= max)
    }
}
