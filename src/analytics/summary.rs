use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCounts {
    pub yes: usize,
    pub no: usize,
}

impl BooleanCounts {
    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    pub fn yes_percentage(&self) -> f64 {
        percentage(self.yes, self.total())
    }

    pub fn slices(&self) -> Vec<ChartSlice> {
        vec![
            ChartSlice {
                name: "Yes".to_string(),
                value: self.yes,
            },
            ChartSlice {
                name: "No".to_string(),
                value: self.no,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsBreakdown {
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    pub total: usize,
    pub nps_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionBreakdown {
    pub unsatisfied: usize,
    pub neutral: usize,
    pub satisfied: usize,
    pub total: usize,
    pub satisfaction_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub text: String,
    pub value: usize,
}

/// `{name, value}` pair consumed by pie and bar charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
}

/// Chart-ready summary of one question's answers. Serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProcessedSummary {
    Boolean {
        data: BooleanCounts,
    },
    Nps {
        data: Vec<RatingBucket>,
        breakdown: NpsBreakdown,
    },
    Satisfaction {
        data: Vec<RatingBucket>,
        breakdown: SatisfactionBreakdown,
    },
    Text {
        data: Vec<WordFrequency>,
    },
    Choice {
        data: Vec<ChartSlice>,
    },
}

impl ProcessedSummary {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Nps { .. } => "nps",
            Self::Satisfaction { .. } => "satisfaction",
            Self::Text { .. } => "text",
            Self::Choice { .. } => "choice",
        }
    }

    /// Total of the plotted series. For boolean and rating summaries that is the number
    /// of valid answers. For choices it is picked options, so one checkbox answer can
    /// add several. For text it is word occurrences within the kept top words only.
    pub fn counted(&self) -> usize {
        match self {
            Self::Boolean { data } => data.total(),
            Self::Nps { breakdown, .. } => breakdown.total,
            Self::Satisfaction { breakdown, .. } => breakdown.total,
            Self::Text { data } => data.iter().map(|w| w.value).sum(),
            Self::Choice { data } => data.iter().map(|s| s.value).sum(),
        }
    }
}

/// `part / total * 100`, or 0 when there is nothing to divide by.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

pub fn nps_score(promoters: usize, detractors: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((promoters as f64 - detractors as f64) / total as f64 * 100.0).round() as i64
}

pub fn satisfaction_rate(satisfied: usize, total: usize) -> i64 {
    percentage(satisfied, total).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_boolean_counts_show_zero_percent() {
        let counts = BooleanCounts { yes: 0, no: 0 };
        assert_eq!(counts.yes_percentage(), 0.0);
        assert!(!counts.yes_percentage().is_nan());
    }

    #[test]
    fn counted_sums_the_plotted_series() {
        let text = ProcessedSummary::Text {
            data: vec![
                WordFrequency {
                    text: "great".to_string(),
                    value: 3,
                },
                WordFrequency {
                    text: "team".to_string(),
                    value: 1,
                },
            ],
        };
        assert_eq!(text.counted(), 4);

        let choice = ProcessedSummary::Choice {
            data: vec![
                ChartSlice {
                    name: "email".to_string(),
                    value: 2,
                },
                ChartSlice {
                    name: "chat".to_string(),
                    value: 1,
                },
            ],
        };
        assert_eq!(choice.counted(), 3);

        let nps = ProcessedSummary::Nps {
            data: vec![RatingBucket { rating: 9, count: 2 }],
            breakdown: NpsBreakdown {
                promoters: 2,
                passives: 0,
                detractors: 0,
                total: 2,
                nps_score: 100,
            },
        };
        assert_eq!(nps.counted(), 2);
    }

    #[test]
    fn nps_score_bounds() {
        assert_eq!(nps_score(0, 0, 0), 0);
        assert_eq!(nps_score(5, 0, 5), 100);
        assert_eq!(nps_score(0, 5, 5), -100);
        assert_eq!(nps_score(2, 2, 5), 0);
        assert_eq!(nps_score(2, 1, 3), 33);
    }

    #[test]
    fn satisfaction_rate_is_guarded() {
        assert_eq!(satisfaction_rate(0, 0), 0);
        assert_eq!(satisfaction_rate(2, 5), 40);
        assert_eq!(satisfaction_rate(3, 3), 100);
    }

    #[test]
    fn summary_serializes_with_type_tag() {
        let summary = ProcessedSummary::Boolean {
            data: BooleanCounts { yes: 2, no: 1 },
        };
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["type"], "boolean");
        assert_eq!(json["data"]["yes"], 2);
        assert_eq!(json["data"]["no"], 1);
    }
}
