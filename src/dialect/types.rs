//! Type mapping from neutral column types to Spanner type tokens.
//!
//! | Logical type | Spanner type |
//! |--------------|--------------|
//! | bool | BOOL |
//! | int8 / int16 / int32 / int64 | INT64 |
//! | float32 / float64 | FLOAT64 |
//! | numeric | NUMERIC |
//! | string | STRING(len), STRING(MAX) above the column limit |
//! | text | STRING(MAX) |
//! | bytes | BYTES(len), BYTES(MAX) above the column limit |
//! | blob | BYTES(MAX) |
//! | date | DATE |
//! | timestamp | TIMESTAMP |
//! | json | JSON |
//! | array(T) | ARRAY<T> |

use crate::schema::{ColumnSpec, LogicalType};

/// Length used for strings and bytes that don't declare one.
pub const DEFAULT_LENGTH: u64 = 255;

/// Largest length accepted for STRING(n).
pub const MAX_STRING_LENGTH: u64 = 2_621_440;

/// Largest length accepted for BYTES(n).
pub const MAX_BYTES_LENGTH: u64 = 10_485_760;

/// Type token of the single column of every counter table.
pub const COUNTER_TYPE: &str = "INT64";

fn sized(name: &str, length: Option<u64>, limit: u64) -> String {
    match length.unwrap_or(DEFAULT_LENGTH) {
        n if n > limit => format!("{}(MAX)", name),
        n => format!("{}({})", name, n),
    }
}

/// Returns the Spanner type token for a logical type.
///
/// `length` applies to strings and bytes, including array elements.
pub fn spanner_type(logical_type: &LogicalType, length: Option<u64>) -> String {
    match logical_type {
        LogicalType::Bool => "BOOL".to_string(),
        LogicalType::Int8 | LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64 => {
            "INT64".to_string()
        }
        LogicalType::Float32 | LogicalType::Float64 => "FLOAT64".to_string(),
        LogicalType::Numeric => "NUMERIC".to_string(),
        LogicalType::String => sized("STRING", length, MAX_STRING_LENGTH),
        LogicalType::Text => "STRING(MAX)".to_string(),
        LogicalType::Bytes => sized("BYTES", length, MAX_BYTES_LENGTH),
        LogicalType::Blob => "BYTES(MAX)".to_string(),
        LogicalType::Date => "DATE".to_string(),
        LogicalType::Timestamp => "TIMESTAMP".to_string(),
        LogicalType::Json => "JSON".to_string(),
        LogicalType::Array(element) => format!("ARRAY<{}>", spanner_type(element, length)),
    }
}

/// Returns the Spanner type token for a column.
pub fn column_type(column: &ColumnSpec) -> String {
    spanner_type(&column.logical_type, column.length)
}

/// Renders a column definition as it appears inside `create table`.
///
/// Key columns are always rendered `not null`.
pub fn column_definition(column: &ColumnSpec, is_key: bool) -> String {
    if is_key || !column.nullable {
        format!("{} {} not null", column.name, column_type(column))
    } else {
        format!("{} {}", column.name, column_type(column))
    }
}
