use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::InsightsSettings;
use crate::error::{InsightsError, Result};
use crate::responses::parse::parse_row;
use crate::responses::types::ResponseRecord;
use crate::survey::parse::parse_survey_value;
use crate::survey::types::SurveyDefinition;

use super::ResponseSource;

/// Reads surveys and responses from the hosted backend's REST interface.
/// Failures are reported once and never retried.
pub struct RestSource {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl RestSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| InsightsError::InvalidBackendUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(InsightsError::InvalidBackendUrl(base_url.to_string()));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: parsed,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Builds a source from `backendUrl`, reading the key from the env var named by `backendKeyEnv`.
    pub fn from_settings(settings: &InsightsSettings) -> Result<Self> {
        let base_url = settings
            .backend_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| InsightsError::NotFound("backendUrl setting".to_string()))?;
        let api_key = std::env::var(&settings.backend_key_env).ok();
        Self::new(base_url, api_key)
    }

    pub fn survey_url(&self, survey_id: &str) -> String {
        self.endpoint(
            "surveys",
            &[
                ("id", format!("eq.{survey_id}")),
                ("select", "id,title,definition".to_string()),
            ],
        )
    }

    pub fn responses_url(&self, campaign_id: &str) -> String {
        self.endpoint(
            "survey_responses",
            &[
                ("campaign_id", format!("eq.{campaign_id}")),
                (
                    "select",
                    "id,respondent,submitted_at,response_data".to_string(),
                ),
            ],
        )
    }

    /// Ids go through query encoding, so `&` or `=` inside one stays part of the value.
    fn endpoint(&self, table: &str, params: &[(&str, String)]) -> String {
        let mut url = self.base_url.clone();
        let path = format!("{}/rest/v1/{table}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url.to_string()
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("survey-insights/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.as_str())
                .header(AUTHORIZATION, format!("Bearer {key}"));
        }
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InsightsError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Value>()?)
    }
}

impl ResponseSource for RestSource {
    fn load_survey(&self, survey_id: &str) -> Result<SurveyDefinition> {
        let rows = self.get_json(&self.survey_url(survey_id))?;
        let row = rows
            .as_array()
            .and_then(|r| r.first())
            .ok_or_else(|| InsightsError::NotFound(format!("survey '{survey_id}'")))?;
        survey_from_row(row)
    }

    fn load_responses(&self, campaign_id: &str) -> Result<Vec<ResponseRecord>> {
        let rows = self.get_json(&self.responses_url(campaign_id))?;
        let records = records_from_rows(&rows)?;
        info!(campaign = %campaign_id, count = records.len(), "fetched responses");
        Ok(records)
    }
}

fn survey_from_row(row: &Value) -> Result<SurveyDefinition> {
    let definition = row
        .get("definition")
        .ok_or_else(|| InsightsError::InvalidSurvey("survey row has no definition".to_string()))?;
    let mut survey = match definition {
        Value::String(encoded) => parse_survey_value(&serde_json::from_str(encoded)?)?,
        other => parse_survey_value(other)?,
    };
    if let Some(title) = row.get("title").and_then(Value::as_str) {
        if !title.trim().is_empty() {
            survey.title = title.to_string();
        }
    }
    Ok(survey)
}

fn records_from_rows(rows: &Value) -> Result<Vec<ResponseRecord>> {
    let rows = rows.as_array().ok_or_else(|| InsightsError::Backend {
        status: 200,
        body: "expected a JSON array of response rows".to_string(),
    })?;
    Ok(rows
        .iter()
        .filter_map(|row| match parse_row(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping unreadable response row from backend");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{records_from_rows, survey_from_row, RestSource};
    use crate::config::InsightsSettings;
    use crate::error::InsightsError;

    #[test]
    fn builds_filtered_endpoint_urls() {
        let source = RestSource::new("https://db.example.test/", Some("k".to_string())).expect("source");
        assert_eq!(
            source.survey_url("abc-123"),
            "https://db.example.test/rest/v1/surveys?id=eq.abc-123&select=id%2Ctitle%2Cdefinition"
        );
    }

    #[test]
    fn reserved_characters_in_ids_are_encoded_not_dropped() {
        let source = RestSource::new("https://db.example.test/api/", None).expect("source");
        let url = reqwest::Url::parse(&source.responses_url("c1&drop=1")).expect("url");
        assert_eq!(url.path(), "/api/rest/v1/survey_responses");
        let pairs = url.query_pairs().into_owned().collect::<Vec<(String, String)>>();
        assert_eq!(pairs[0], ("campaign_id".to_string(), "eq.c1&drop=1".to_string()));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn malformed_backend_url_is_rejected() {
        assert!(matches!(
            RestSource::new("db.example.test", None),
            Err(InsightsError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn settings_without_backend_url_are_rejected() {
        assert!(RestSource::from_settings(&InsightsSettings::default()).is_err());
    }

    #[test]
    fn decodes_backend_rows() {
        let row = serde_json::json!({
          "id": "s1",
          "title": "Engagement 2026",
          "definition": "{\"pages\":[{\"elements\":[{\"name\":\"q1\",\"type\":\"nps\"}]}]}"
        });
        let survey = survey_from_row(&row).expect("survey");
        assert_eq!(survey.title, "Engagement 2026");
        assert_eq!(survey.questions.len(), 1);

        let rows = serde_json::json!([
          {"id": "r1", "response_data": {"q1": 10}},
          {"id": "r2", "submitted_at": 5}
        ]);
        let records = records_from_rows(&rows).expect("records");
        assert_eq!(records.len(), 1);
        assert!(records_from_rows(&serde_json::json!({"error": "x"})).is_err());
    }
}
