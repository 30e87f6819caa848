use serde::{Deserialize, Serialize};

use crate::config::InsightsSettings;
use crate::responses::types::RawAnswer;
use crate::survey::types::{Question, QuestionType};

use super::boolean::BooleanProcessor;
use super::choice::ChoiceProcessor;
use super::rating::{scale_resolver_for, RatingProcessor};
use super::summary::ProcessedSummary;
use super::text::TextProcessor;

const POSITIVE: &str = "#22c55e";
const NEUTRAL: &str = "#f59e0b";
const NEGATIVE: &str = "#ef4444";
const CATEGORICAL: &[&str] = &[
    "#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316", "#84cc16", "#06b6d4", "#a855f7",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Pie,
    Bar,
    Histogram,
    WordCloud,
}

/// Rendering hints handed to chart components alongside a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub chart: ChartKind,
    pub labels: Vec<String>,
    pub palette: Vec<String>,
}

impl DisplayConfig {
    fn new(chart: ChartKind, labels: &[&str], palette: &[&str]) -> Self {
        Self {
            chart,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub trait Processor {
    /// Folds one question's answers into a summary. Never fails: answers of the
    /// wrong shape are left out of the counts.
    fn process(&self, answers: &[&RawAnswer]) -> ProcessedSummary;

    fn config(&self, summary: &ProcessedSummary) -> DisplayConfig;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    Boolean,
    Rating,
    Text,
    Choice,
}

impl ProcessorKind {
    pub fn for_type(question_type: &QuestionType) -> Option<Self> {
        match question_type {
            QuestionType::Boolean => Some(Self::Boolean),
            QuestionType::Rating | QuestionType::Nps => Some(Self::Rating),
            QuestionType::Text | QuestionType::Comment => Some(Self::Text),
            QuestionType::RadioGroup | QuestionType::Checkbox => Some(Self::Choice),
            QuestionType::Matrix | QuestionType::Numeric | QuestionType::Unsupported(_) => None,
        }
    }
}

/// Returns `None` for question types with no registered processor; callers skip those.
pub fn processor_for(
    question: &Question,
    settings: &InsightsSettings,
) -> Option<Box<dyn Processor>> {
    let kind = ProcessorKind::for_type(&question.question_type)?;
    Some(match kind {
        ProcessorKind::Boolean => Box::new(BooleanProcessor),
        ProcessorKind::Rating => Box::new(RatingProcessor::new(scale_resolver_for(question))),
        ProcessorKind::Text => Box::new(TextProcessor::new(
            settings.top_words,
            settings.min_token_length,
        )),
        ProcessorKind::Choice => Box::new(ChoiceProcessor),
    })
}

pub(crate) fn boolean_config() -> DisplayConfig {
    DisplayConfig::new(ChartKind::Pie, &["Yes", "No"], &[POSITIVE, NEGATIVE])
}

pub(crate) fn nps_config() -> DisplayConfig {
    DisplayConfig::new(
        ChartKind::Histogram,
        &["Detractors", "Passives", "Promoters"],
        &[NEGATIVE, NEUTRAL, POSITIVE],
    )
}

pub(crate) fn satisfaction_config() -> DisplayConfig {
    DisplayConfig::new(
        ChartKind::Histogram,
        &["Unsatisfied", "Neutral", "Satisfied"],
        &[NEGATIVE, NEUTRAL, POSITIVE],
    )
}

pub(crate) fn text_config() -> DisplayConfig {
    DisplayConfig::new(ChartKind::WordCloud, &[], CATEGORICAL)
}

pub(crate) fn choice_config(labels: &[&str]) -> DisplayConfig {
    DisplayConfig::new(ChartKind::Bar, labels, CATEGORICAL)
}
