use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::InsightsSettings;
use crate::responses::types::{RawAnswer, ResponseRecord};
use crate::survey::normalize::clean_label;
use crate::survey::types::{Question, SurveyDefinition};

use super::demographics::{breakdown_all, segment, DemographicBreakdown, Dimension, SegmentSummary};
use super::registry::{processor_for, DisplayConfig};
use super::summary::ProcessedSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningItem {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub name: String,
    pub title: String,
    pub question_type: String,
    /// Respondents who left any answer at all, valid or not.
    pub answered: usize,
    pub summary: ProcessedSummary,
    pub config: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyReport {
    pub survey_title: String,
    pub response_count: usize,
    pub questions: Vec<QuestionReport>,
    pub skipped: Vec<WarningItem>,
    pub demographics: Vec<DemographicBreakdown>,
    pub timeline: Vec<DailyCount>,
}

pub struct AnalyticsEngine {
    settings: InsightsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: InsightsSettings) -> Self {
        Self { settings }
    }

    /// Summarizes one question. `None` means no processor handles its type.
    pub fn process(&self, question: &Question, answers: &[&RawAnswer]) -> Option<QuestionReport> {
        let processor = processor_for(question, &self.settings)?;
        let summary = processor.process(answers);
        let config = processor.config(&summary);
        debug!(
            question = %question.name,
            answered = answers.len(),
            counted = summary.counted(),
            kind = summary.kind(),
            "processed question"
        );
        Some(QuestionReport {
            name: question.name.clone(),
            title: clean_label(&question.title),
            question_type: question.question_type.to_string(),
            answered: answers.len(),
            summary,
            config,
        })
    }

    pub fn process_survey(
        &self,
        survey: &SurveyDefinition,
        records: &[ResponseRecord],
    ) -> SurveyReport {
        let mut questions = Vec::new();
        let mut skipped = survey
            .warnings
            .iter()
            .map(|w| definition_warning(w))
            .collect::<Vec<WarningItem>>();

        for question in &survey.questions {
            let answers = answers_for(question, records);
            match self.process(question, &answers) {
                Some(mut report) => {
                    if let Some(label) = survey.label_map.get(&question.name) {
                        report.title = label.clone();
                    }
                    questions.push(report);
                }
                None => {
                    warn!(
                        question = %question.name,
                        question_type = %question.question_type,
                        "no processor registered for question type, skipping"
                    );
                    skipped.push(WarningItem {
                        code: "UNSUPPORTED_QUESTION_TYPE".to_string(),
                        message: format!(
                            "Question '{}' has type '{}' which has no analytics processor.",
                            question.name, question.question_type
                        ),
                        details: serde_json::json!({
                          "question": question.name,
                          "type": question.question_type.as_str(),
                        }),
                    });
                }
            }
        }

        SurveyReport {
            survey_title: survey.title.clone(),
            response_count: records.len(),
            questions,
            skipped,
            demographics: breakdown_all(records, &self.settings.not_specified_label),
            timeline: submission_timeline(records),
        }
    }

    /// Cross-tabulates one question by a demographic dimension.
    /// `None` when the question type has no processor.
    pub fn segment(
        &self,
        question: &Question,
        records: &[ResponseRecord],
        dimension: Dimension,
    ) -> Option<Vec<SegmentSummary>> {
        let processor = processor_for(question, &self.settings)?;
        Some(segment(
            processor.as_ref(),
            &question.name,
            records,
            dimension,
            &self.settings.not_specified_label,
        ))
    }
}

/// Lifts a `CODE: question` warning recorded while the definition was built.
fn definition_warning(warning: &str) -> WarningItem {
    let (code, question) = warning.split_once(": ").unwrap_or(("DEFINITION_WARNING", warning));
    let message = match code {
        "DUPLICATE_QUESTION_NAME" => {
            format!("Question name '{question}' appears more than once; only the first is analyzed.")
        }
        _ => warning.to_string(),
    };
    WarningItem {
        code: code.to_string(),
        message,
        details: serde_json::json!({ "question": question }),
    }
}

/// Answers present for `question`; respondents who never saw or skipped it are left out.
pub fn answers_for<'a>(question: &Question, records: &'a [ResponseRecord]) -> Vec<&'a RawAnswer> {
    records
        .iter()
        .filter_map(|r| r.answer(&question.name))
        .collect()
}

/// Submissions per UTC day, oldest first. Records without a timestamp are not counted.
pub fn submission_timeline(records: &[ResponseRecord]) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for at in records.iter().filter_map(|r| r.submitted_at) {
        *days.entry(at.date_naive()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}
