use std::collections::HashMap;

use crate::error::{InsightsError, Result};
use crate::responses::types::ResponseRecord;
use crate::survey::types::SurveyDefinition;

use super::ResponseSource;

#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    surveys: HashMap<String, SurveyDefinition>,
    responses: HashMap<String, Vec<ResponseRecord>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey_id: &str, survey: SurveyDefinition) -> Self {
        self.surveys.insert(survey_id.to_string(), survey);
        self
    }

    pub fn with_responses(mut self, campaign_id: &str, records: Vec<ResponseRecord>) -> Self {
        self.responses
            .entry(campaign_id.to_string())
            .or_default()
            .extend(records);
        self
    }
}

impl ResponseSource for MemorySource {
    fn load_survey(&self, survey_id: &str) -> Result<SurveyDefinition> {
        self.surveys
            .get(survey_id)
            .cloned()
            .ok_or_else(|| InsightsError::NotFound(format!("survey '{survey_id}'")))
    }

    fn load_responses(&self, campaign_id: &str) -> Result<Vec<ResponseRecord>> {
        Ok(self.responses.get(campaign_id).cloned().unwrap_or_default())
    }
}
