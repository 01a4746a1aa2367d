// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Window specifications: `OVER ([base] [PARTITION BY ...] [ORDER BY ...] [frame])`

use serde::{Deserialize, Serialize};

use crate::expr::Exp;
use crate::query::OrderBySpec;

/// Inline window specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Name of a WINDOW clause definition this spec extends
    pub base_window: Option<String>,
    #[serde(default)]
    pub partition_by: Vec<PartitionColumn>,
    #[serde(default)]
    pub order_by: Vec<OrderBySpec>,
    pub frame: Option<WindowFrame>,
}

/// Collating sequences allowed after a partition column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collation {
    Binary,
    NoCase,
    RTrim,
}

impl Collation {
    pub fn as_sql(self) -> &'static str {
        match self {
            Collation::Binary => "BINARY",
            Collation::NoCase => "NOCASE",
            Collation::RTrim => "RTRIM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionColumn {
    pub exp: Exp,
    pub collation: Option<Collation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

impl FrameUnit {
    pub fn as_sql(self) -> &'static str {
        match self {
            FrameUnit::Rows => "ROWS",
            FrameUnit::Range => "RANGE",
            FrameUnit::Groups => "GROUPS",
        }
    }
}

/// Single-bound frame start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameStart {
    CurrentRow,
    UnboundedPreceding,
    Preceding(Box<Exp>),
}

/// One side of `BETWEEN ... AND ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    Preceding(Box<Exp>),
    Following(Box<Exp>),
    UnboundedFollowing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameExtent {
    Start(FrameStart),
    Between { first: FrameBound, second: FrameBound },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub extent: FrameExtent,
    pub exclusion: Option<FrameExclusion>,
}

/// `WINDOW name AS (spec)` entry of a select
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDefinition {
    pub name: String,
    pub spec: WindowSpec,
}
