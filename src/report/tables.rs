use serde::Serialize;

use crate::analytics::demographics::{DemographicBreakdown, SegmentSummary};
use crate::analytics::engine::QuestionReport;
use crate::analytics::summary::{percentage, ProcessedSummary};

use super::helpers::format_percent;

/// A titled table of string cells, header row first, as the PDF table generator expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub title: String,
    pub headline: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Header plus body rows in one grid.
    pub fn grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

fn header(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn counted_row(label: &str, count: usize, total: usize) -> Vec<String> {
    vec![
        label.to_string(),
        count.to_string(),
        format_percent(percentage(count, total)),
    ]
}

pub fn headline(summary: &ProcessedSummary) -> String {
    match summary {
        ProcessedSummary::Boolean { data } => {
            format!("{} yes of {}", format_percent(data.yes_percentage()), data.total())
        }
        ProcessedSummary::Nps { breakdown, .. } => {
            format!("NPS {} from {} ratings", breakdown.nps_score, breakdown.total)
        }
        ProcessedSummary::Satisfaction { breakdown, .. } => format!(
            "{}% satisfied from {} ratings",
            breakdown.satisfaction_rate, breakdown.total
        ),
        ProcessedSummary::Text { data } => match data.first() {
            Some(top) => format!("Most mentioned: \"{}\" ({})", top.text, top.value),
            None => "No text answers".to_string(),
        },
        ProcessedSummary::Choice { data } => match data.first() {
            Some(top) => format!("Most picked: {} ({})", top.name, top.value),
            None => "No choices recorded".to_string(),
        },
    }
}

pub fn summary_rows(summary: &ProcessedSummary) -> (Vec<String>, Vec<Vec<String>>) {
    match summary {
        ProcessedSummary::Boolean { data } => (
            header(&["Answer", "Count", "Percentage"]),
            data.slices()
                .iter()
                .map(|s| counted_row(&s.name, s.value, data.total()))
                .collect(),
        ),
        ProcessedSummary::Nps { breakdown: b, .. } => (
            header(&["Category", "Count", "Percentage"]),
            vec![
                counted_row("Promoters (9-10)", b.promoters, b.total),
                counted_row("Passives (7-8)", b.passives, b.total),
                counted_row("Detractors (0-6)", b.detractors, b.total),
                vec!["NPS Score".to_string(), b.nps_score.to_string(), String::new()],
            ],
        ),
        ProcessedSummary::Satisfaction { breakdown: b, .. } => (
            header(&["Category", "Count", "Percentage"]),
            vec![
                counted_row("Unsatisfied (1-2)", b.unsatisfied, b.total),
                counted_row("Neutral (3)", b.neutral, b.total),
                counted_row("Satisfied (4-5)", b.satisfied, b.total),
                vec![
                    "Satisfaction Rate".to_string(),
                    format!("{}%", b.satisfaction_rate),
                    String::new(),
                ],
            ],
        ),
        ProcessedSummary::Text { data } => (
            header(&["Word", "Count"]),
            data.iter()
                .map(|w| vec![w.text.clone(), w.value.to_string()])
                .collect(),
        ),
        ProcessedSummary::Choice { data } => {
            let total: usize = data.iter().map(|s| s.value).sum();
            (
                header(&["Choice", "Count", "Percentage"]),
                data.iter()
                    .map(|s| counted_row(&s.name, s.value, total))
                    .collect(),
            )
        }
    }
}

pub fn question_table(question: &QuestionReport) -> TableView {
    let (header, rows) = summary_rows(&question.summary);
    TableView {
        title: question.title.clone(),
        headline: headline(&question.summary),
        header,
        rows,
    }
}

pub fn demographic_table(breakdown: &DemographicBreakdown) -> TableView {
    let total: usize = breakdown.slices.iter().map(|s| s.count).sum();
    TableView {
        title: breakdown.dimension.label().to_string(),
        headline: format!("{} respondents", total),
        header: header(&["Category", "Count", "Percentage"]),
        rows: breakdown
            .slices
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    s.count.to_string(),
                    format_percent(s.percentage),
                ]
            })
            .collect(),
    }
}

pub fn segment_table(title: &str, segments: &[SegmentSummary]) -> TableView {
    TableView {
        title: title.to_string(),
        headline: format!("{} segments", segments.len()),
        header: header(&["Segment", "Respondents", "Result"]),
        rows: segments
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    s.respondents.to_string(),
                    headline(&s.summary),
                ]
            })
            .collect(),
    }
}
