//! CSV rendering of result sets

use serde_json::Value;

use crate::database::traits::Row;
use crate::Error;

/// Render rows as CSV text
///
/// The header comes from the first row's column names, in order, and every row
/// is written in that same column order. Lines are separated by `\n` with no
/// trailing newline.
///
/// # Errors
///
/// [`Error::NoData`] when `rows` is empty, since there is no header to write.
pub fn to_csv(rows: &[Row]) -> Result<String, Error> {
    let first = rows.first().ok_or(Error::NoData)?;
    let columns: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|column| escape_field(column))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|column| row.get(column.as_str()).map(format_value).unwrap_or_default())
            .collect();
        lines.push(fields.join(","));
    }

    Ok(lines.join("\n"))
}

/// Format one cell; null becomes an empty field
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => escape_field(text),
        Value::Array(_) | Value::Object(_) => escape_field(&value.to_string()),
    }
}

/// Quote a field containing a comma, quote or line break, doubling inner quotes
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::row;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn quotes_fields_with_commas() {
        let csv = to_csv(&[row(json!({"a": 1, "b": "x,y"}))]).unwrap();
        assert_eq!(csv, "a,b\n1,\"x,y\"");
    }

    #[test]
    fn null_renders_as_empty_field() {
        let csv = to_csv(&[row(json!({"a": null}))]).unwrap();
        assert_eq!(csv, "a\n");
    }

    #[test]
    fn empty_result_is_no_data() {
        assert!(matches!(to_csv(&[]), Err(Error::NoData)));
    }

    #[test]
    fn doubles_inner_quotes() {
        let csv = to_csv(&[row(json!({"quote": "say \"hi\""}))]).unwrap();
        assert_eq!(csv, "quote\n\"say \"\"hi\"\"\"");
    }

    #[test]
    fn keeps_first_row_column_order() {
        let csv = to_csv(&[
            row(json!({"zeta": true, "alpha": 2.5, "mid": "plain"})),
            row(json!({"mid": "other", "alpha": null, "zeta": false})),
        ])
        .unwrap();

        assert_eq!(csv, "zeta,alpha,mid\ntrue,2.5,plain\nfalse,,other");
    }

    #[test]
    fn missing_columns_render_empty_and_json_is_quoted() {
        let csv = to_csv(&[
            row(json!({"id": 1, "tags": ["a", "b"]})),
            row(json!({"id": 2})),
        ])
        .unwrap();

        assert_eq!(csv, "id,tags\n1,\"[\"\"a\"\",\"\"b\"\"]\"\n2,");
    }

    #[test]
    fn line_breaks_stay_inside_one_field() {
        let csv = to_csv(&[row(json!({"note": "first\nsecond"}))]).unwrap();
        assert_eq!(csv, "note\n\"first\nsecond\"");
    }
}
