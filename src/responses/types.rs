use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One respondent's answer to one question, exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Null,
    /// Matrix rows, mixed arrays and anything else no processor understands.
    Other(Value),
}

impl RawAnswer {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "name_or_object")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "name_or_object")]
    pub location: Option<String>,
    #[serde(default, alias = "employment_type", deserialize_with = "name_or_object")]
    pub employment_type: Option<String>,
    #[serde(default, alias = "org_unit", deserialize_with = "name_or_object")]
    pub org_unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    /// Anonymous submissions carry `"respondent": null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub respondent: RespondentMetadata,
    #[serde(default, alias = "submitted_at")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "response_data", deserialize_with = "null_as_default")]
    pub answers: BTreeMap<String, RawAnswer>,
}

impl ResponseRecord {
    pub fn answer(&self, question_name: &str) -> Option<&RawAnswer> {
        self.answers.get(question_name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts either `"Berlin"` or `{"name": "Berlin", ...}`.
fn name_or_object<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{RawAnswer, ResponseRecord};

    #[test]
    fn raw_answers_keep_their_json_shape() {
        let raw = r#"[true, 9, "great", ["a", "b"], null, {"row1": "col2"}, [1, 2]]"#;
        let parsed: Vec<RawAnswer> = serde_json::from_str(raw).expect("parse answers");
        assert_eq!(parsed[0], RawAnswer::Bool(true));
        assert_eq!(parsed[1], RawAnswer::Number(9.0));
        assert_eq!(parsed[2], RawAnswer::Text("great".to_string()));
        assert_eq!(
            parsed[3],
            RawAnswer::List(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(parsed[4], RawAnswer::Null);
        assert!(matches!(parsed[5], RawAnswer::Other(_)));
        assert!(matches!(parsed[6], RawAnswer::Other(_)));
    }

    #[test]
    fn record_accepts_backend_row_field_names() {
        let raw = r#"{
      "id": "r1",
      "respondent": {"gender": "female", "location": {"id": 4, "name": "Lagos"}, "org_unit": "Ops"},
      "submitted_at": "2026-03-02T10:15:00Z",
      "response_data": {"q1": true}
    }"#;
        let record: ResponseRecord = serde_json::from_str(raw).expect("parse record");
        assert_eq!(record.respondent.location.as_deref(), Some("Lagos"));
        assert_eq!(record.respondent.org_unit.as_deref(), Some("Ops"));
        assert!(record.submitted_at.is_some());
        assert_eq!(record.answer("q1"), Some(&RawAnswer::Bool(true)));
    }
}
