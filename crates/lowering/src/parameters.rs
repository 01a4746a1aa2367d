// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Parameter binder
//!
//! Each ECSQL parameter maps to one native parameter per physical column.
//! A named parameter referenced several times keeps a single entry whose
//! native names are reused at every reference site.

use ecsql_ir::ParameterExp;
use serde::Serialize;

use crate::error::{LoweringError, LoweringResult};

const NATIVE_PREFIX: &str = ":_ecdb_ecsqlparam_";

/// How an ECSQL parameter is addressed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterKey {
    Named(String),
    Positional(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    pub key: ParameterKey,
    pub native_names: Vec<String>,
}

/// ECSQL parameter → native parameter names, in first-reference order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterMap {
    bindings: Vec<ParameterBinding>,
}

impl ParameterMap {
    /// Native names for `param`, creating the binding on first reference
    pub fn bind(&mut self, param: &ParameterExp) -> LoweringResult<Vec<String>> {
        let column_count = param.type_info.column_count();
        let key = match &param.name {
            Some(name) => ParameterKey::Named(name.clone()),
            None => ParameterKey::Positional(param.index),
        };

        if let Some(existing) = self.get(&key) {
            if existing.len() != column_count {
                return Err(LoweringError::internal(format!(
                    "parameter {key:?} bound with {} columns, referenced with {column_count}",
                    existing.len()
                )));
            }
            return Ok(existing.to_vec());
        }

        let stem = match &key {
            ParameterKey::Named(name) => name.clone(),
            ParameterKey::Positional(index) => format!("ix{index}"),
        };
        let native_names: Vec<String> = (1..=column_count)
            .map(|n| format!("{NATIVE_PREFIX}{stem}_col{n}"))
            .collect();
        self.bindings.push(ParameterBinding {
            key,
            native_names: native_names.clone(),
        });
        Ok(native_names)
    }

    pub fn get(&self, key: &ParameterKey) -> Option<&[String]> {
        self.bindings
            .iter()
            .find(|binding| &binding.key == key)
            .map(|binding| binding.native_names.as_slice())
    }

    pub fn named(&self, name: &str) -> Option<&[String]> {
        self.get(&ParameterKey::Named(name.to_string()))
    }

    pub fn positional(&self, index: u32) -> Option<&[String]> {
        self.get(&ParameterKey::Positional(index))
    }

    pub fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsql_ir::{PrimitiveType, TypeInfo};

    fn param(name: Option<&str>, index: u32, type_info: TypeInfo) -> ParameterExp {
        ParameterExp {
            name: name.map(str::to_string),
            index,
            type_info,
        }
    }

    #[test]
    fn test_named_parameter_reuse() {
        let mut map = ParameterMap::default();
        let p = param(Some("p"), 1, TypeInfo::primitive(PrimitiveType::Point2d));

        let first = map.bind(&p).unwrap();
        let second = map.bind(&param(Some("p"), 2, p.type_info.clone())).unwrap();

        assert_eq!(first, vec![":_ecdb_ecsqlparam_p_col1", ":_ecdb_ecsqlparam_p_col2"]);
        assert_eq!(first, second);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_positional_parameters() {
        let mut map = ParameterMap::default();
        map.bind(&param(None, 1, TypeInfo::Unknown)).unwrap();
        map.bind(&param(None, 2, TypeInfo::Unknown)).unwrap();

        assert_eq!(map.positional(2).unwrap(), [":_ecdb_ecsqlparam_ix2_col1"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_column_count_conflict() {
        let mut map = ParameterMap::default();
        map.bind(&param(Some("p"), 1, TypeInfo::Unknown)).unwrap();
        let err = map
            .bind(&param(Some("p"), 2, TypeInfo::primitive(PrimitiveType::Point3d)))
            .unwrap_err();
        assert!(err.is_internal());
    }
}
