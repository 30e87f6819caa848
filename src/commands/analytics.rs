use serde::{Deserialize, Serialize};
use std::path::Path;
use strsim::normalized_levenshtein;
use tracing::info;

use crate::analytics::demographics::{
    breakdown_all, breakdown_dimension, DemographicBreakdown, Dimension, SegmentSummary,
};
use crate::analytics::engine::AnalyticsEngine;
use crate::config::InsightsSettings;
use crate::report::helpers::write_string;
use crate::report::templates::{build_document, render_report};
use crate::report::types::{InputRef, ReportFormat};
use crate::responses::parse::parse_responses_json;
use crate::store::sqlite::SqliteStore;
use crate::store::ResponseSource;
use crate::survey::parse::parse_survey_json;
use crate::survey::types::{Question, SurveyDefinition};
use crate::util::text::normalize_token;

use super::assets::{read_file_text, read_input};

const SUGGESTION_MIN_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeArgs {
    pub survey_path: String,
    pub responses_path: String,
    pub format: ReportFormat,
    #[serde(default)]
    pub out_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsArgs {
    pub responses_path: String,
    #[serde(default)]
    pub dimension: Option<Dimension>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentArgs {
    pub survey_path: String,
    pub responses_path: String,
    pub question: String,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportArgs {
    pub db_path: String,
    pub survey_path: String,
    pub responses_path: String,
    pub survey_id: String,
    pub campaign_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutput {
    pub survey_title: String,
    pub questions: usize,
    pub read: usize,
    pub inserted: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReportArgs {
    pub survey_id: String,
    pub campaign_id: String,
    pub format: ReportFormat,
    #[serde(default)]
    pub out_path: Option<String>,
}

/// Analyzes a survey export and its responses, returning the rendered report.
pub fn analyze_survey(settings: &InsightsSettings, args: AnalyzeArgs) -> Result<String, String> {
    let (survey_raw, survey_input) = read_input("Survey", &args.survey_path)?;
    let (responses_raw, responses_input) = read_input("Responses", &args.responses_path)?;
    let survey = parse_survey_json(&survey_raw).map_err(|e| e.to_string())?;
    let records = parse_responses_json(&responses_raw).map_err(|e| e.to_string())?;
    info!(
        survey = %survey.title,
        questions = survey.questions.len(),
        responses = records.len(),
        "analyzing survey"
    );

    let report = AnalyticsEngine::new(settings.clone()).process_survey(&survey, &records);
    let document = build_document(report, vec![survey_input, responses_input]);
    let rendered = render_report(&document, args.format, template_dir(settings))
        .map_err(|e| e.to_string())?;
    emit(rendered, args.out_path.as_deref())
}

pub fn demographics(
    settings: &InsightsSettings,
    args: DemographicsArgs,
) -> Result<Vec<DemographicBreakdown>, String> {
    let raw = read_file_text(&args.responses_path)?;
    let records = parse_responses_json(&raw).map_err(|e| e.to_string())?;
    let label = &settings.not_specified_label;
    Ok(match args.dimension {
        Some(dimension) => vec![breakdown_dimension(&records, dimension, label)],
        None => breakdown_all(&records, label),
    })
}

pub fn segment_question(
    settings: &InsightsSettings,
    args: SegmentArgs,
) -> Result<Vec<SegmentSummary>, String> {
    let survey = parse_survey_json(&read_file_text(&args.survey_path)?).map_err(|e| e.to_string())?;
    let records =
        parse_responses_json(&read_file_text(&args.responses_path)?).map_err(|e| e.to_string())?;
    let question = find_question(&survey, &args.question)?;
    AnalyticsEngine::new(settings.clone())
        .segment(question, &records, args.dimension)
        .ok_or_else(|| {
            format!(
                "Question '{}' has type '{}' which cannot be summarized.",
                question.name, question.question_type
            )
        })
}

/// Imports a survey export and its responses into the local SQLite cache.
pub fn import_responses(args: ImportArgs) -> Result<ImportOutput, String> {
    let survey_raw = read_file_text(&args.survey_path)?;
    let records =
        parse_responses_json(&read_file_text(&args.responses_path)?).map_err(|e| e.to_string())?;
    let mut store = SqliteStore::open(Path::new(&args.db_path)).map_err(|e| e.to_string())?;
    let survey = store
        .save_survey(&args.survey_id, &survey_raw)
        .map_err(|e| e.to_string())?;
    let inserted = store
        .save_responses(&args.survey_id, &args.campaign_id, &records)
        .map_err(|e| e.to_string())?;
    info!(
        campaign = %args.campaign_id,
        read = records.len(),
        inserted,
        "imported responses"
    );
    Ok(ImportOutput {
        survey_title: survey.title,
        questions: survey.questions.len(),
        read: records.len(),
        inserted,
    })
}

/// Builds a report from whichever data source the caller hands in.
pub fn report_from_source(
    source: &dyn ResponseSource,
    settings: &InsightsSettings,
    args: StoredReportArgs,
) -> Result<String, String> {
    let survey = source
        .load_survey(&args.survey_id)
        .map_err(|e| e.to_string())?;
    let records = source
        .load_responses(&args.campaign_id)
        .map_err(|e| e.to_string())?;
    let report = AnalyticsEngine::new(settings.clone()).process_survey(&survey, &records);
    let inputs = vec![
        InputRef {
            label: "Survey".to_string(),
            path: format!("survey:{}", args.survey_id),
            sha256: crate::util::hash::sha256_hex(
                serde_json::to_string(&survey)
                    .map_err(|e| e.to_string())?
                    .as_bytes(),
            ),
        },
        InputRef {
            label: "Responses".to_string(),
            path: format!("campaign:{}", args.campaign_id),
            sha256: crate::util::hash::sha256_hex(
                serde_json::to_string(&records)
                    .map_err(|e| e.to_string())?
                    .as_bytes(),
            ),
        },
    ];
    let document = build_document(report, inputs);
    let rendered = render_report(&document, args.format, template_dir(settings))
        .map_err(|e| e.to_string())?;
    emit(rendered, args.out_path.as_deref())
}

fn template_dir(settings: &InsightsSettings) -> Option<&Path> {
    settings
        .template_dir
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(Path::new)
}

fn emit(rendered: String, out_path: Option<&str>) -> Result<String, String> {
    if let Some(path) = out_path {
        write_string(Path::new(path), &rendered).map_err(|e| e.to_string())?;
        info!(path, "wrote report");
    }
    Ok(rendered)
}

fn find_question<'a>(survey: &'a SurveyDefinition, name: &str) -> Result<&'a Question, String> {
    if let Some(q) = survey.question(name) {
        return Ok(q);
    }
    let wanted = normalize_token(name);
    let mut scored = survey
        .questions
        .iter()
        .map(|q| {
            let by_name = normalized_levenshtein(&normalize_token(&q.name), &wanted);
            let by_title = normalized_levenshtein(&normalize_token(&q.title), &wanted);
            (q.name.as_str(), by_name.max(by_title))
        })
        .filter(|(_, score)| *score >= SUGGESTION_MIN_SCORE)
        .collect::<Vec<(&str, f64)>>();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let suggestions = scored
        .into_iter()
        .take(3)
        .map(|(n, _)| n)
        .collect::<Vec<&str>>();
    if suggestions.is_empty() {
        Err(format!("Question '{name}' not found in survey."))
    } else {
        Err(format!(
            "Question '{name}' not found in survey. Did you mean: {}?",
            suggestions.join(", ")
        ))
    }
}
