// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! ECSQL-specific function definitions

use ecsql_ir::PrimitiveType;

use crate::{FunctionDef, FunctionRewrite};

/// Get all ECSQL-only functions
pub fn all_functions() -> Vec<FunctionDef> {
    vec![
        FunctionDef::aggregate("ANY")
            .with_args(1, 1)
            .with_rewrite(FunctionRewrite::AggregatePredicate { native: "MAX" })
            .with_return(PrimitiveType::Boolean)
            .with_description("True if any value in the group is true"),
        FunctionDef::aggregate("SOME")
            .with_args(1, 1)
            .with_rewrite(FunctionRewrite::AggregatePredicate { native: "MAX" })
            .with_return(PrimitiveType::Boolean)
            .with_description("True if some value in the group is true"),
        FunctionDef::aggregate("EVERY")
            .with_args(1, 1)
            .with_rewrite(FunctionRewrite::AggregatePredicate { native: "MIN" })
            .with_return(PrimitiveType::Boolean)
            .with_description("True if every value in the group is true"),
        FunctionDef::scalar("EC_CLASSNAME")
            .with_args(1, 2)
            .with_return(PrimitiveType::String)
            .with_description("Formatted name of the class with the given id"),
        FunctionDef::scalar("EC_CLASSID")
            .with_args(1, 2)
            .with_return(PrimitiveType::Long)
            .with_description("Id of the class with the given name"),
        FunctionDef::scalar("EC_INSTANCEOF")
            .with_min_args(2)
            .with_return(PrimitiveType::Boolean)
            .with_description("True if the class id derives from one of the named classes"),
        FunctionDef::scalar("REGEXP")
            .with_args(2, 2)
            .with_return(PrimitiveType::Boolean),
        FunctionDef::scalar("REGEXP_EXTRACT")
            .with_args(2, 3)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("STRTOID")
            .with_args(1, 1)
            .with_return(PrimitiveType::Long),
        FunctionDef::scalar("IDTOSTR")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("IDTOHEX")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("HEXTOID")
            .with_args(1, 1)
            .with_return(PrimitiveType::Long),
    ]
}
