use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{InsightsError, Result};

use super::types::ResponseRecord;

/// Parses an export of response rows: either a bare array or `{"responses": [...]}`.
/// Rows that cannot be read are skipped so one bad respondent never blocks a report.
pub fn parse_responses_json(raw: &str) -> Result<Vec<ResponseRecord>> {
    let root: Value = serde_json::from_str(raw)?;
    let rows = match &root {
        Value::Array(rows) => rows,
        Value::Object(obj) => obj
            .get("responses")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                InsightsError::InvalidSurvey("response export is missing a responses array".to_string())
            })?,
        _ => {
            return Err(InsightsError::InvalidSurvey(
                "response export must be an array or object".to_string(),
            ))
        }
    };

    Ok(rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| match parse_row(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(row = idx, error = %e, "skipping unreadable response row");
                None
            }
        })
        .collect())
}

pub fn parse_row(row: &Value) -> Result<ResponseRecord> {
    let mut row = row.clone();
    if let Some(obj) = row.as_object_mut() {
        // Some exports store the answer payload as an encoded JSON string.
        for key in ["response_data", "answers"] {
            if let Some(Value::String(encoded)) = obj.get(key) {
                let decoded: Value = serde_json::from_str(encoded)?;
                obj.insert(key.to_string(), decoded);
            }
        }
        match obj.get("id") {
            Some(Value::String(_)) => {}
            Some(Value::Number(n)) => {
                let id = n.to_string();
                obj.insert("id".to_string(), Value::String(id));
            }
            _ => {
                obj.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
        }
    }
    Ok(serde_json::from_value(row)?)
}
