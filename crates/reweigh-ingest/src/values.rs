//! Conversion of DataFrame cells into category values.
//!
//! A category value is the trimmed text form of a cell. Null cells and cells
//! that are blank after trimming are missing.

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Converts a Polars `AnyValue` to its text form.
///
/// Returns an empty string for `Null`; floats are written without trailing zeros
/// so a zip code read as `10001.0` becomes `10001`.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Category value of a cell, or `None` when the cell is missing.
pub fn category_value(value: AnyValue<'_>) -> Option<String> {
    let text = any_to_string(value);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Category values of a column in row order.
pub fn column_categories(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let col = df
        .column(column)
        .map_err(|_| IngestError::ColumnNotFound {
            column: column.to_string(),
        })?;

    if let Ok(chunked) = col.str() {
        return Ok(chunked
            .iter()
            .map(|value| {
                value
                    .map(str::trim)
                    .filter(|trimmed| !trimmed.is_empty())
                    .map(str::to_string)
            })
            .collect());
    }

    let mut values = Vec::with_capacity(col.len());
    for idx in 0..col.len() {
        let value = col.get(idx)?;
        values.push(category_value(value));
    }
    Ok(values)
}

/// Column names in dataset order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(10001.0), "10001");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn test_category_value() {
        assert_eq!(category_value(AnyValue::Null), None);
        assert_eq!(category_value(AnyValue::String("  ")), None);
        assert_eq!(category_value(AnyValue::String(" F ")), Some("F".to_string()));
        assert_eq!(category_value(AnyValue::Int64(90001)), Some("90001".to_string()));
        assert_eq!(
            category_value(AnyValue::Float64(60601.0)),
            Some("60601".to_string())
        );
    }

    #[test]
    fn test_column_categories_string_and_numeric() {
        let df = df! {
            "Gender" => &[Some("F"), None, Some(""), Some("M")],
            "zip" => &[Some(10001i64), Some(90001), None, Some(10001)],
        }
        .unwrap();

        let gender = column_categories(&df, "Gender").unwrap();
        assert_eq!(
            gender,
            vec![Some("F".to_string()), None, None, Some("M".to_string())]
        );

        let zip = column_categories(&df, "zip").unwrap();
        assert_eq!(zip[0].as_deref(), Some("10001"));
        assert_eq!(zip[2], None);
    }

    #[test]
    fn test_column_categories_missing_column() {
        let df = df! { "a" => &["x"] }.unwrap();
        assert!(matches!(
            column_categories(&df, "b"),
            Err(IngestError::ColumnNotFound { .. })
        ));
    }
}
