// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering configuration
//!
//! ```json
//! {
//!   "disabledFunctions": ["RANDOM", "randomblob"],
//!   "experimentalFeatures": true,
//!   "optimizeNestedSelectJoins": true,
//!   "maxExpressionDepth": 128
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default recursion limit for nested expressions
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 256;

/// Feature flags and policies consulted while lowering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoweringConfig {
    /// Functions rejected with invalid ECSQL (case-insensitive)
    pub disabled_functions: BTreeSet<String>,
    /// Enables experimental syntax such as table-valued functions
    pub experimental_features: bool,
    /// Prune generated class views of nested selects to the properties
    /// the select references
    pub optimize_nested_select_joins: bool,
    pub max_expression_depth: usize,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            disabled_functions: BTreeSet::new(),
            experimental_features: false,
            optimize_nested_select_joins: false,
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }
}

impl LoweringConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_disabled_function(mut self, name: impl Into<String>) -> Self {
        self.disabled_functions.insert(name.into());
        self
    }

    pub fn with_experimental_features(mut self, enabled: bool) -> Self {
        self.experimental_features = enabled;
        self
    }

    pub fn with_nested_select_optimization(mut self, enabled: bool) -> Self {
        self.optimize_nested_select_joins = enabled;
        self
    }

    pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
        self.max_expression_depth = depth;
        self
    }

    pub fn is_function_disabled(&self, name: &str) -> bool {
        self.disabled_functions
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(name))
    }
}
