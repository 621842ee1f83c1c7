//! Parsing for Google Visualization query responses.
//!
//! The endpoint answers with JSONP along the lines of
//! `/*O_o*/ google.visualization.Query.setResponse({...});`. The JSON
//! object is everything between the first `{` and the last `}`.

use serde::Deserialize;
use serde_json::Value;

use super::SheetsError;
use super::row::{SheetRow, value_to_text};

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: Option<GvizTable>,
}

#[derive(Debug, Default, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Default, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Cut the JSON object out of a JSONP body.
///
/// # Errors
///
/// Returns [`SheetsError::MalformedResponse`] when there is no `{ ... }`.
pub fn extract_json(body: &str) -> Result<&str, SheetsError> {
    let start = body.find('{');
    let end = body.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => body
            .get(start..=end)
            .ok_or_else(|| SheetsError::MalformedResponse("no JSON object in response".to_string())),
        _ => Err(SheetsError::MalformedResponse(
            "no JSON object in response".to_string(),
        )),
    }
}

/// Parse a gviz response body into header-keyed rows.
///
/// Headers come from the column labels when any label is set; otherwise the
/// first data row is the header row and is skipped. Columns with a blank
/// header are dropped, null cells become empty strings, and rows with no
/// non-blank cell are skipped.
///
/// # Errors
///
/// Returns an error when the body holds no JSON object or the object is not
/// valid JSON.
pub fn parse_rows(body: &str) -> Result<Vec<SheetRow>, SheetsError> {
    let json = extract_json(body)?;
    let response: GvizResponse = serde_json::from_str(json)?;
    let table = response.table.unwrap_or_default();

    let cells: Vec<Vec<Value>> = table.rows.into_iter().map(row_values).collect();

    let labelled = table
        .cols
        .iter()
        .any(|col| col.label.as_deref().is_some_and(|l| !l.trim().is_empty()));

    let (headers, data): (Vec<String>, &[Vec<Value>]) = if labelled {
        let headers = table
            .cols
            .iter()
            .map(|col| {
                col.label
                    .as_deref()
                    .filter(|l| !l.trim().is_empty())
                    .or(col.id.as_deref())
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .collect();
        (headers, cells.as_slice())
    } else if let Some((first, rest)) = cells.split_first() {
        let headers = first.iter().map(|v| value_to_text(v).trim().to_string()).collect();
        (headers, rest)
    } else {
        return Ok(Vec::new());
    };

    let rows = data
        .iter()
        .filter(|values| values.iter().any(|v| !value_to_text(v).trim().is_empty()))
        .map(|values| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(i, header)| {
                    let value = values
                        .get(i)
                        .filter(|v| !v.is_null())
                        .cloned()
                        .unwrap_or_else(|| Value::String(String::new()));
                    (header.clone(), value)
                })
                .collect::<SheetRow>()
        })
        .collect();

    Ok(rows)
}

fn row_values(row: GvizRow) -> Vec<Value> {
    row.c
        .unwrap_or_default()
        .into_iter()
        .map(|cell| cell.map_or(Value::Null, |c| c.v))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LABELLED: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{"cols":[{"id":"A","label":"id","type":"string"},{"id":"B","label":"name","type":"string"},{"id":"C","label":"price","type":"number"},{"id":"D","label":"","type":"string"}],"rows":[{"c":[{"v":"m1"},{"v":"Club Sandwich"},{"v":120.0},null]},{"c":[null,null,null,null]},{"c":[{"v":"m2"},{"v":"Fries"},null,{"v":"x"}]}]}});"#;

    const UNLABELLED: &str = r#"google.visualization.Query.setResponse({"table":{"cols":[{"id":"A","label":""},{"id":"B","label":""}],"rows":[{"c":[{"v":"key"},{"v":"value"}]},{"c":[{"v":"isOpen"},{"v":true}]}]}});"#;

    #[test]
    fn test_extract_json() {
        assert_eq!(extract_json("cb({\"a\":1});").unwrap(), "{\"a\":1}");
        assert!(matches!(
            extract_json("<html>Sign in</html>"),
            Err(SheetsError::MalformedResponse(_))
        ));
        assert!(extract_json("} oops {").is_err());
    }

    #[test]
    fn test_labelled_columns() {
        let rows = parse_rows(LABELLED).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].text("id"), "m1");
        assert_eq!(rows[0].text("price"), "120");
        assert!(rows[0].get("").is_none());

        assert_eq!(rows[1].text("name"), "Fries");
        assert_eq!(rows[1].get("price"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_first_row_as_header_when_unlabelled() {
        let rows = parse_rows(UNLABELLED).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("key"), "isOpen");
        assert_eq!(rows[0].flag("value"), Some(true));
    }

    #[test]
    fn test_missing_table_is_empty() {
        assert!(parse_rows(r#"x({"status":"error"})"#).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_rows("x({not json})"),
            Err(SheetsError::Parse(_))
        ));
    }
}
