use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::responses::types::{RawAnswer, ResponseRecord};

use super::registry::Processor;
use super::summary::{percentage, ProcessedSummary};

pub const NOT_SPECIFIED: &str = "Not Specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Gender,
    Location,
    EmploymentType,
    OrgUnit,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Gender,
        Dimension::Location,
        Dimension::EmploymentType,
        Dimension::OrgUnit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Location => "Location",
            Self::EmploymentType => "Employment Type",
            Self::OrgUnit => "Org Unit",
        }
    }

    pub fn extract<'a>(&self, record: &'a ResponseRecord) -> Option<&'a str> {
        let respondent = &record.respondent;
        match self {
            Self::Gender => respondent.gender.as_deref(),
            Self::Location => respondent.location.as_deref(),
            Self::EmploymentType => respondent.employment_type.as_deref(),
            Self::OrgUnit => respondent.org_unit.as_deref(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::util::text::normalize_token(s).as_str() {
            "gender" => Ok(Self::Gender),
            "location" => Ok(Self::Location),
            "employment" | "employment_type" => Ok(Self::EmploymentType),
            "org_unit" | "orgunit" | "department" => Ok(Self::OrgUnit),
            other => Err(format!(
                "unknown dimension '{other}' (expected gender, location, employment, org-unit)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicSlice {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicBreakdown {
    pub dimension: Dimension,
    pub slices: Vec<DemographicSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub category: String,
    pub respondents: usize,
    pub summary: ProcessedSummary,
}

/// Counts every record exactly once under the category `extractor` returns,
/// substituting `not_specified` for missing or blank values. Categories are
/// emitted in first-seen order.
pub fn breakdown<F>(
    records: &[ResponseRecord],
    extractor: F,
    not_specified: &str,
) -> Vec<DemographicSlice>
where
    F: Fn(&ResponseRecord) -> Option<&str>,
{
    let groups = group_by_category(records, extractor, not_specified);
    let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
    if total == 0 {
        return Vec::new();
    }
    groups
        .into_iter()
        .map(|(category, members)| DemographicSlice {
            category,
            count: members.len(),
            percentage: percentage(members.len(), total),
        })
        .collect()
}

pub fn breakdown_dimension(
    records: &[ResponseRecord],
    dimension: Dimension,
    not_specified: &str,
) -> DemographicBreakdown {
    DemographicBreakdown {
        dimension,
        slices: breakdown(records, |r| dimension.extract(r), not_specified),
    }
}

pub fn breakdown_all(records: &[ResponseRecord], not_specified: &str) -> Vec<DemographicBreakdown> {
    Dimension::ALL
        .iter()
        .map(|d| breakdown_dimension(records, *d, not_specified))
        .collect()
}

/// Runs `processor` separately over each category's respondents.
pub fn segment(
    processor: &dyn Processor,
    question_name: &str,
    records: &[ResponseRecord],
    dimension: Dimension,
    not_specified: &str,
) -> Vec<SegmentSummary> {
    group_by_category(records, |r| dimension.extract(r), not_specified)
        .into_iter()
        .map(|(category, members)| {
            let answers = members
                .iter()
                .filter_map(|r| r.answer(question_name))
                .collect::<Vec<&RawAnswer>>();
            SegmentSummary {
                category,
                respondents: members.len(),
                summary: processor.process(&answers),
            }
        })
        .collect()
}

fn group_by_category<'a, F>(
    records: &'a [ResponseRecord],
    extractor: F,
    not_specified: &str,
) -> Vec<(String, Vec<&'a ResponseRecord>)>
where
    F: Fn(&ResponseRecord) -> Option<&str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&ResponseRecord>)> = Vec::new();
    for record in records {
        let category = extractor(record)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(not_specified)
            .to_string();
        match index.get(&category) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(category.clone(), groups.len());
                groups.push((category, vec![record]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::boolean::BooleanProcessor;
    use crate::analytics::summary::BooleanCounts;
    use crate::responses::types::RespondentMetadata;
    use std::collections::BTreeMap;

    fn record(id: &str, gender: Option<&str>, org_unit: Option<&str>, likes: bool) -> ResponseRecord {
        ResponseRecord {
            id: id.to_string(),
            respondent: RespondentMetadata {
                gender: gender.map(|g| g.to_string()),
                org_unit: org_unit.map(|o| o.to_string()),
                ..RespondentMetadata::default()
            },
            submitted_at: None,
            answers: BTreeMap::from([("likes".to_string(), RawAnswer::Bool(likes))]),
        }
    }

    #[test]
    fn gender_scenario_keeps_first_seen_order() {
        let records = vec![
            record("1", Some("male"), None, true),
            record("2", Some("male"), None, true),
            record("3", Some("female"), None, true),
            record("4", None, None, true),
        ];
        let slices = breakdown_dimension(&records, Dimension::Gender, NOT_SPECIFIED).slices;
        assert_eq!(
            slices,
            vec![
                DemographicSlice {
                    category: "male".to_string(),
                    count: 2,
                    percentage: 50.0
                },
                DemographicSlice {
                    category: "female".to_string(),
                    count: 1,
                    percentage: 25.0
                },
                DemographicSlice {
                    category: NOT_SPECIFIED.to_string(),
                    count: 1,
                    percentage: 25.0
                },
            ]
        );
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let records = vec![
            record("1", Some("a"), None, true),
            record("2", Some("b"), None, true),
            record("3", Some("c"), None, true),
        ];
        let slices = breakdown(&records, |r| r.respondent.gender.as_deref(), NOT_SPECIFIED);
        let sum: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.01);
    }

    #[test]
    fn empty_collection_gives_empty_breakdown() {
        assert!(breakdown(&[], |r| r.respondent.gender.as_deref(), NOT_SPECIFIED).is_empty());
        assert!(breakdown_all(&[], NOT_SPECIFIED)
            .iter()
            .all(|b| b.slices.is_empty()));
    }

    #[test]
    fn blank_values_are_not_specified() {
        let records = vec![record("1", Some("  "), None, true)];
        let slices = breakdown(&records, |r| r.respondent.gender.as_deref(), "Unknown");
        assert_eq!(slices[0].category, "Unknown");
        assert_eq!(slices[0].percentage, 100.0);
    }

    #[test]
    fn segments_run_processor_per_category() {
        let records = vec![
            record("1", None, Some("Ops"), true),
            record("2", None, Some("Sales"), false),
            record("3", None, Some("Ops"), false),
            record("4", None, None, true),
        ];
        let segments = segment(
            &BooleanProcessor,
            "likes",
            &records,
            Dimension::OrgUnit,
            NOT_SPECIFIED,
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].category, "Ops");
        assert_eq!(segments[0].respondents, 2);
        assert_eq!(
            segments[0].summary,
            ProcessedSummary::Boolean {
                data: BooleanCounts { yes: 1, no: 1 }
            }
        );
        assert_eq!(segments[2].category, NOT_SPECIFIED);
    }

    #[test]
    fn dimensions_parse_from_cli_spellings() {
        assert_eq!("org-unit".parse::<Dimension>(), Ok(Dimension::OrgUnit));
        assert_eq!("Employment".parse::<Dimension>(), Ok(Dimension::EmploymentType));
        assert!("age".parse::<Dimension>().is_err());
    }
}
