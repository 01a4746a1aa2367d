// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use crate::{FunctionDef, FunctionKind, builtin};

/// Function registry for builtin ECSQL and native functions
///
/// Lookups are case-insensitive. Names not found here are passed through to
/// the native engine unchanged.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: Vec<FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new function registry with all builtin functions loaded
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use ecsql_function_registry::FunctionRegistry;
    ///
    /// let registry = FunctionRegistry::new();
    /// assert!(registry.has_function("count"));
    /// ```
    pub fn new() -> Self {
        let mut functions = builtin::ecsql::all_functions();
        functions.extend(builtin::sqlite::all_functions());
        Self { functions }
    }

    /// Register an additional function, replacing a builtin of the same name
    pub fn register(&mut self, function: FunctionDef) {
        self.functions
            .retain(|f| !f.name.eq_ignore_ascii_case(function.name));
        self.functions.push(function);
    }

    /// Lookup a single function by name (case-insensitive)
    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.get_function(name).is_some()
    }

    /// All functions of the given kind
    pub fn functions_of_kind(&self, kind: FunctionKind) -> impl Iterator<Item = &FunctionDef> {
        self.functions.iter().filter(move |f| f.kind == kind)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
