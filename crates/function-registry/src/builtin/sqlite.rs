// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Native engine builtin function definitions

use ecsql_ir::PrimitiveType;

use crate::{FunctionDef, FunctionRewrite};

/// Get all builtin native functions
pub fn all_functions() -> Vec<FunctionDef> {
    vec![
        // Aggregate functions
        FunctionDef::aggregate("AVG")
            .with_args(1, 1)
            .with_return(PrimitiveType::Double)
            .with_description("Average of non-NULL values"),
        FunctionDef::aggregate("COUNT")
            .with_args(0, 1)
            .with_return(PrimitiveType::Long)
            .with_description("Count the number of rows"),
        FunctionDef::aggregate("GROUP_CONCAT")
            .with_args(1, 2)
            .with_return(PrimitiveType::String)
            .with_description("Concatenate values from multiple rows"),
        FunctionDef::aggregate("MAX")
            .with_min_args(1)
            .with_description("Maximum value"),
        FunctionDef::aggregate("MIN")
            .with_min_args(1)
            .with_description("Minimum value"),
        FunctionDef::aggregate("SUM")
            .with_args(1, 1)
            .with_description("Sum of values"),
        FunctionDef::aggregate("TOTAL")
            .with_args(1, 1)
            .with_return(PrimitiveType::Double)
            .with_description("Floating point sum of values"),
        // Scalar functions
        FunctionDef::scalar("ABS").with_args(1, 1),
        FunctionDef::scalar("CHAR")
            .with_min_args(0)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("COALESCE").with_min_args(2),
        FunctionDef::scalar("GLOB")
            .with_args(2, 2)
            .with_return(PrimitiveType::Boolean),
        FunctionDef::scalar("HEX")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("IFNULL").with_args(2, 2),
        FunctionDef::scalar("INSTR")
            .with_args(2, 2)
            .with_return(PrimitiveType::Integer),
        FunctionDef::scalar("LENGTH")
            .with_args(1, 1)
            .with_return(PrimitiveType::Integer),
        FunctionDef::scalar("LOWER")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("LTRIM")
            .with_args(1, 2)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("NULLIF").with_args(2, 2),
        FunctionDef::scalar("PRINTF")
            .with_min_args(1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("QUOTE")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("RANDOM")
            .with_args(0, 0)
            .with_return(PrimitiveType::Long),
        FunctionDef::scalar("RANDOMBLOB")
            .with_args(1, 1)
            .with_return(PrimitiveType::Binary),
        FunctionDef::scalar("REPLACE")
            .with_args(3, 3)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("ROUND")
            .with_args(1, 2)
            .with_return(PrimitiveType::Double),
        FunctionDef::scalar("RTRIM")
            .with_args(1, 2)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("SUBSTR")
            .with_args(2, 3)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("TRIM")
            .with_args(1, 2)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("TYPEOF")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("UNICODE")
            .with_args(1, 1)
            .with_return(PrimitiveType::Integer),
        FunctionDef::scalar("UPPER")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("ZEROBLOB")
            .with_args(1, 1)
            .with_return(PrimitiveType::Binary),
        // Date/Time functions
        FunctionDef::scalar("DATE")
            .with_min_args(1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("TIME")
            .with_min_args(1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("DATETIME")
            .with_min_args(1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("JULIANDAY")
            .with_min_args(1)
            .with_return(PrimitiveType::Double),
        FunctionDef::scalar("STRFTIME")
            .with_min_args(2)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("CURRENT_DATE")
            .with_args(0, 0)
            .with_rewrite(FunctionRewrite::JulianDay)
            .with_return(PrimitiveType::DateTime)
            .with_description("Current UTC date"),
        FunctionDef::scalar("CURRENT_TIME")
            .with_args(0, 0)
            .with_rewrite(FunctionRewrite::JulianDay)
            .with_return(PrimitiveType::DateTime)
            .with_description("Current UTC time"),
        FunctionDef::scalar("CURRENT_TIMESTAMP")
            .with_args(0, 0)
            .with_rewrite(FunctionRewrite::JulianDay)
            .with_return(PrimitiveType::DateTime)
            .with_description("Current UTC date and time"),
        // JSON functions
        FunctionDef::scalar("JSON")
            .with_args(1, 1)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("JSON_ARRAY")
            .with_min_args(0)
            .with_return(PrimitiveType::String),
        FunctionDef::scalar("JSON_EXTRACT").with_min_args(2),
        FunctionDef::scalar("JSON_OBJECT")
            .with_min_args(0)
            .with_return(PrimitiveType::String),
        FunctionDef::table_valued("JSON_EACH")
            .with_args(1, 2)
            .with_description("One row per element of a JSON array or object"),
        FunctionDef::table_valued("JSON_TREE")
            .with_args(1, 2)
            .with_description("One row per element of a JSON value, recursively"),
        // Window functions
        FunctionDef::window("ROW_NUMBER")
            .with_args(0, 0)
            .with_return(PrimitiveType::Long),
        FunctionDef::window("RANK")
            .with_args(0, 0)
            .with_return(PrimitiveType::Long),
        FunctionDef::window("DENSE_RANK")
            .with_args(0, 0)
            .with_return(PrimitiveType::Long),
        FunctionDef::window("PERCENT_RANK")
            .with_args(0, 0)
            .with_return(PrimitiveType::Double),
        FunctionDef::window("CUME_DIST")
            .with_args(0, 0)
            .with_return(PrimitiveType::Double),
        FunctionDef::window("NTILE")
            .with_args(1, 1)
            .with_return(PrimitiveType::Long),
        FunctionDef::window("LAG").with_args(1, 3),
        FunctionDef::window("LEAD").with_args(1, 3),
        FunctionDef::window("FIRST_VALUE").with_args(1, 1),
        FunctionDef::window("LAST_VALUE").with_args(1, 1),
        FunctionDef::window("NTH_VALUE").with_args(2, 2),
    ]
}
