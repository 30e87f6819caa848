use crate::responses::types::RawAnswer;

use super::registry::{boolean_config, DisplayConfig, Processor};
use super::summary::{BooleanCounts, ProcessedSummary};

pub struct BooleanProcessor;

impl Processor for BooleanProcessor {
    fn process(&self, answers: &[&RawAnswer]) -> ProcessedSummary {
        ProcessedSummary::Boolean {
            data: count_booleans(answers),
        }
    }

    fn config(&self, _summary: &ProcessedSummary) -> DisplayConfig {
        boolean_config()
    }
}

pub fn count_booleans(answers: &[&RawAnswer]) -> BooleanCounts {
    let mut counts = BooleanCounts { yes: 0, no: 0 };
    for answer in answers {
        match answer.as_bool() {
            Some(true) => counts.yes += 1,
            Some(false) => counts.no += 1,
            None => {}
        }
    }
    counts
}
