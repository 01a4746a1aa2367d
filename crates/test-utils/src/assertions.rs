// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions on produced native SQL

/// `true` if parentheses and brackets balance outside string literals,
/// string literals are closed and no anchor placeholder is left
pub fn is_well_formed(sql: &str) -> bool {
    if sql.trim().is_empty() || sql.contains("<anchor") {
        return false;
    }

    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut in_identifier = false;
    for c in sql.chars() {
        match c {
            '\'' if !in_identifier => in_string = !in_string,
            '[' if !in_string => {
                if in_identifier {
                    return false;
                }
                in_identifier = true;
            }
            ']' if !in_string => {
                if !in_identifier {
                    return false;
                }
                in_identifier = false;
            }
            '(' if !in_string && !in_identifier => depth += 1,
            ')' if !in_string && !in_identifier => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !in_string && !in_identifier
}

/// Panic with the offending SQL if it is not well formed
pub fn assert_well_formed(sql: &str) {
    assert!(is_well_formed(sql), "Malformed native SQL: {sql}");
}
