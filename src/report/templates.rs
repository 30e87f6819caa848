use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};
use uuid::Uuid;

use crate::analytics::engine::{DailyCount, SurveyReport};
use crate::error::{InsightsError, Result};

use super::tables::{demographic_table, question_table, TableView};
use super::types::{InputRef, ReportDocument, ReportFormat};

const MARKDOWN_TEMPLATE: &str = "report.md.tera";
const HTML_TEMPLATE: &str = "report.html.tera";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    title: &'a str,
    report_id: &'a str,
    generated_at: &'a str,
    response_count: usize,
    inputs: &'a [InputRef],
    questions: Vec<TableView>,
    demographics: Vec<TableView>,
    timeline: &'a [DailyCount],
    skipped: Vec<&'a str>,
}

pub fn build_document(report: SurveyReport, inputs: Vec<InputRef>) -> ReportDocument {
    ReportDocument {
        report_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        inputs,
        report,
    }
}

pub fn render_report(
    document: &ReportDocument,
    format: ReportFormat,
    template_dir: Option<&Path>,
) -> Result<String> {
    let template = match format {
        ReportFormat::Json => return Ok(serde_json::to_string_pretty(document)?),
        ReportFormat::Markdown => MARKDOWN_TEMPLATE,
        ReportFormat::Html => HTML_TEMPLATE,
    };
    let tera = load_templates(template_dir)?;
    let template_name = tera
        .get_template_names()
        .find(|name| name.ends_with(template))
        .ok_or_else(|| InsightsError::NotFound(format!("template '{template}'")))?
        .to_string();

    let mut ctx = Context::new();
    ctx.insert("view", &view_of(document));
    Ok(tera.render(&template_name, &ctx)?)
}

fn view_of(document: &ReportDocument) -> ReportView<'_> {
    let report = &document.report;
    ReportView {
        title: &report.survey_title,
        report_id: &document.report_id,
        generated_at: &document.generated_at,
        response_count: report.response_count,
        inputs: &document.inputs,
        questions: report.questions.iter().map(question_table).collect(),
        demographics: report
            .demographics
            .iter()
            .filter(|d| !d.slices.is_empty())
            .map(demographic_table)
            .collect(),
        timeline: &report.timeline,
        skipped: report.skipped.iter().map(|w| w.message.as_str()).collect(),
    }
}

fn load_templates(template_dir: Option<&Path>) -> Result<Tera> {
    let mut tera = match template_dir {
        Some(dir) => Tera::new(&format!("{}/**/*", dir.display()))?,
        None => {
            let mut tera = Tera::default();
            tera.add_raw_templates(vec![
                (
                    MARKDOWN_TEMPLATE,
                    include_str!("../../templates/report/report.md.tera"),
                ),
                (
                    HTML_TEMPLATE,
                    include_str!("../../templates/report/report.html.tera"),
                ),
            ])?;
            tera
        }
    };
    tera.autoescape_on(vec![".html", ".html.tera"]);
    Ok(tera)
}
