use crate::error::Result;
use crate::responses::types::ResponseRecord;
use crate::survey::types::SurveyDefinition;

pub mod memory;
pub mod rest;
pub mod sqlite;

/// Where survey definitions and submitted responses come from. Passed into the
/// command layer explicitly so analytics can run against fixtures, a local
/// SQLite cache, or the hosted backend.
pub trait ResponseSource {
    fn load_survey(&self, survey_id: &str) -> Result<SurveyDefinition>;

    fn load_responses(&self, campaign_id: &str) -> Result<Vec<ResponseRecord>>;
}
