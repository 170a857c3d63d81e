//! Row to JSON conversion.
//!
//! Queries run over the simple (text) protocol, so every non-null cell
//! arrives as text. The column type name decides how the text is mapped to a
//! JSON value. Binary cells that are not UTF-8 become `base64:` strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Number, Value};
use sqlx::{Column, ColumnIndex, Decode, Row, TypeInfo};

use common::models::ColumnInfo;

/// Column metadata of a row.
pub(crate) fn columns<R: Row>(row: &R) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name().to_string(),
            data_type: c.type_info().name().to_string(),
            nullable: None,
        })
        .collect()
}

/// Decodes every cell of a text-protocol row.
pub(crate) fn decode_row<R>(row: &R) -> Result<Vec<Value>, sqlx::Error>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> Option<&'r [u8]>: Decode<'r, R::Database>,
{
    let mut values = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let raw: Option<&[u8]> = row.try_get_unchecked(index)?;
        values.push(cell_value(column.type_info().name(), raw));
    }
    Ok(values)
}

/// Maps the raw bytes of a cell to JSON according to its column type.
pub(crate) fn cell_value(type_name: &str, raw: Option<&[u8]>) -> Value {
    let Some(bytes) = raw else {
        return Value::Null;
    };
    match std::str::from_utf8(bytes) {
        Ok(text) => text_value(type_name, text),
        Err(_) => Value::String(format!("base64:{}", STANDARD.encode(bytes))),
    }
}

fn text_value(type_name: &str, text: &str) -> Value {
    let base = type_name
        .trim_end_matches(" UNSIGNED")
        .to_ascii_uppercase();

    match base.as_str() {
        "BOOL" | "BOOLEAN" => match text {
            "t" | "true" | "1" => Value::Bool(true),
            "f" | "false" | "0" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        },
        "INT2" | "INT4" | "INT8" | "OID" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT"
        | "INTEGER" | "BIGINT" | "YEAR" => integer(text),
        "FLOAT4" | "FLOAT8" | "FLOAT" | "DOUBLE" | "REAL" => float(text),
        "JSON" | "JSONB" => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        // NUMERIC/DECIMAL stay textual to keep their exact digits.
        _ => Value::String(text.to_string()),
    }
}

fn integer(text: &str) -> Value {
    if let Ok(v) = text.parse::<i64>() {
        Value::Number(v.into())
    } else if let Ok(v) = text.parse::<u64>() {
        Value::Number(v.into())
    } else {
        Value::String(text.to_string())
    }
}

fn float(text: &str) -> Value {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(type_name: &str, raw: Option<&str>) -> Value {
        cell_value(type_name, raw.map(str::as_bytes))
    }

    #[test]
    fn test_null() {
        assert_eq!(cell_value("INT4", None), Value::Null);
        assert_eq!(cell_value("TEXT", None), Value::Null);
    }

    #[test]
    fn test_integers() {
        assert_eq!(text("INT4", Some("42")), json!(42));
        assert_eq!(text("BIGINT", Some("-7")), json!(-7));
        assert_eq!(
            text("BIGINT UNSIGNED", Some("18446744073709551615")),
            json!(18446744073709551615u64)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(text("FLOAT8", Some("1.5")), json!(1.5));
        assert_eq!(text("FLOAT8", Some("NaN")), json!("NaN"));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(text("BOOL", Some("t")), json!(true));
        assert_eq!(text("BOOLEAN", Some("0")), json!(false));
    }

    #[test]
    fn test_json_columns() {
        assert_eq!(
            text("JSONB", Some(r#"{"a":[1,2]}"#)),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn test_decimal_and_text_stay_strings() {
        assert_eq!(text("NUMERIC", Some("10.10")), json!("10.10"));
        assert_eq!(text("DECIMAL", Some("0.30")), json!("0.30"));
        assert_eq!(text("VARCHAR", Some("hello")), json!("hello"));
        assert_eq!(
            text("TIMESTAMPTZ", Some("2024-01-01 00:00:00+00")),
            json!("2024-01-01 00:00:00+00")
        );
    }

    #[test]
    fn test_binary_cells() {
        let blob: &[u8] = &[0xff, 0x00, 0xfe];
        assert_eq!(cell_value("BLOB", Some(blob)), json!("base64:/wD+"));
        assert_eq!(cell_value("VARBINARY", Some(b"plain".as_slice())), json!("plain"));
        assert_eq!(cell_value("BYTEA", None), Value::Null);
    }
}
