use tracing::debug;

use crate::responses::types::RawAnswer;
use crate::survey::types::{Question, RatingScale};

use super::registry::{nps_config, satisfaction_config, DisplayConfig, Processor};
use super::summary::{
    nps_score, satisfaction_rate, NpsBreakdown, ProcessedSummary, RatingBucket,
    SatisfactionBreakdown,
};

/// Decides whether a rating question is read as NPS or satisfaction.
pub trait ScaleResolver {
    fn resolve(&self, answers: &[&RawAnswer]) -> RatingScale;
}

/// Infers the scale from the data: any answer above 5 means a 0-10 NPS scale.
/// A sparse NPS question where nobody answered above 5 reads as satisfaction.
pub struct InferredScale;

impl ScaleResolver for InferredScale {
    fn resolve(&self, answers: &[&RawAnswer]) -> RatingScale {
        let max = answers
            .iter()
            .filter_map(|a| a.as_number())
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
        let scale = match max {
            Some(m) if m > 5.0 => RatingScale::Nps,
            _ => RatingScale::Satisfaction,
        };
        debug!(?max, ?scale, "inferred rating scale");
        scale
    }
}

/// Scale fixed by the survey definition.
pub struct DeclaredScale(pub RatingScale);

impl ScaleResolver for DeclaredScale {
    fn resolve(&self, _answers: &[&RawAnswer]) -> RatingScale {
        self.0
    }
}

pub fn scale_resolver_for(question: &Question) -> Box<dyn ScaleResolver> {
    match question.declared_scale {
        Some(scale) => Box::new(DeclaredScale(scale)),
        None => Box::new(InferredScale),
    }
}

pub struct RatingProcessor {
    scale: Box<dyn ScaleResolver>,
}

impl RatingProcessor {
    pub fn new(scale: Box<dyn ScaleResolver>) -> Self {
        Self { scale }
    }
}

impl Processor for RatingProcessor {
    fn process(&self, answers: &[&RawAnswer]) -> ProcessedSummary {
        let scale = self.scale.resolve(answers);
        let data = histogram(answers, scale.max_rating());
        match scale {
            RatingScale::Nps => ProcessedSummary::Nps {
                breakdown: classify_nps(&data),
                data,
            },
            RatingScale::Satisfaction => ProcessedSummary::Satisfaction {
                breakdown: classify_satisfaction(&data),
                data,
            },
        }
    }

    fn config(&self, summary: &ProcessedSummary) -> DisplayConfig {
        match summary {
            ProcessedSummary::Satisfaction { .. } => satisfaction_config(),
            _ => nps_config(),
        }
    }
}

/// One bucket per integer rating in `0..=max`, zero-count buckets included.
pub fn histogram(answers: &[&RawAnswer], max: u32) -> Vec<RatingBucket> {
    let mut counts = vec![0usize; max as usize + 1];
    for value in answers.iter().filter_map(|a| a.as_number()) {
        if let Some(rating) = valid_rating(value, max) {
            counts[rating as usize] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(rating, count)| RatingBucket {
            rating: rating as u32,
            count,
        })
        .collect()
}

fn valid_rating(value: f64, max: u32) -> Option<u32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(max) {
        return None;
    }
    Some(value as u32)
}

pub fn classify_nps(histogram: &[RatingBucket]) -> NpsBreakdown {
    let mut promoters = 0;
    let mut passives = 0;
    let mut detractors = 0;
    for bucket in histogram {
        match bucket.rating {
            9..=10 => promoters += bucket.count,
            7..=8 => passives += bucket.count,
            _ => detractors += bucket.count,
        }
    }
    let total = promoters + passives + detractors;
    NpsBreakdown {
        promoters,
        passives,
        detractors,
        total,
        nps_score: nps_score(promoters, detractors, total),
    }
}

pub fn classify_satisfaction(histogram: &[RatingBucket]) -> SatisfactionBreakdown {
    let mut unsatisfied = 0;
    let mut neutral = 0;
    let mut satisfied = 0;
    let mut total = 0;
    for bucket in histogram {
        total += bucket.count;
        match bucket.rating {
            1..=2 => unsatisfied += bucket.count,
            3 => neutral += bucket.count,
            4..=5 => satisfied += bucket.count,
            _ => {}
        }
    }
    SatisfactionBreakdown {
        unsatisfied,
        neutral,
        satisfied,
        total,
        satisfaction_rate: satisfaction_rate(satisfied, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<RawAnswer> {
        values.iter().map(|v| RawAnswer::Number(*v)).collect()
    }

    fn run(processor: &RatingProcessor, answers: &[RawAnswer]) -> ProcessedSummary {
        let refs = answers.iter().collect::<Vec<&RawAnswer>>();
        processor.process(&refs)
    }

    #[test]
    fn nps_scenario_scores_zero() {
        let processor = RatingProcessor::new(Box::new(InferredScale));
        let summary = run(&processor, &numbers(&[9.0, 9.0, 7.0, 3.0, 3.0]));
        let ProcessedSummary::Nps { data, breakdown } = summary else {
            panic!("expected nps summary");
        };
        assert_eq!(data.len(), 11);
        assert_eq!(breakdown.promoters, 2);
        assert_eq!(breakdown.passives, 1);
        assert_eq!(breakdown.detractors, 2);
        assert_eq!(breakdown.nps_score, 0);
        assert_eq!(data.iter().map(|b| b.count).sum::<usize>(), breakdown.total);
    }

    #[test]
    fn satisfaction_scenario_rates_forty_percent() {
        let processor = RatingProcessor::new(Box::new(InferredScale));
        let summary = run(&processor, &numbers(&[5.0, 4.0, 3.0, 2.0, 1.0]));
        let ProcessedSummary::Satisfaction { data, breakdown } = summary else {
            panic!("expected satisfaction summary");
        };
        assert_eq!(
            data.iter().map(|b| b.rating).collect::<Vec<u32>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert_eq!(breakdown.unsatisfied, 2);
        assert_eq!(breakdown.neutral, 1);
        assert_eq!(breakdown.satisfied, 2);
        assert_eq!(breakdown.satisfaction_rate, 40);
    }

    #[test]
    fn malformed_ratings_are_excluded() {
        let mut answers = numbers(&[10.0, 11.0, -1.0, 7.5, f64::NAN]);
        answers.push(RawAnswer::Text("9".to_string()));
        answers.push(RawAnswer::Null);
        let processor = RatingProcessor::new(Box::new(InferredScale));
        let ProcessedSummary::Nps { data, breakdown } = run(&processor, &answers) else {
            panic!("expected nps summary");
        };
        assert_eq!(breakdown.total, 1);
        assert_eq!(breakdown.promoters, 1);
        assert_eq!(breakdown.nps_score, 100);
        assert_eq!(data[10].count, 1);
    }

    #[test]
    fn empty_input_yields_zero_filled_satisfaction() {
        let processor = RatingProcessor::new(Box::new(InferredScale));
        let ProcessedSummary::Satisfaction { data, breakdown } = run(&processor, &[]) else {
            panic!("expected satisfaction summary");
        };
        assert_eq!(data.len(), 6);
        assert!(data.iter().all(|b| b.count == 0));
        assert_eq!(breakdown.satisfaction_rate, 0);
    }

    #[test]
    fn declared_scale_overrides_low_scoring_nps() {
        let answers = numbers(&[2.0, 3.0, 5.0]);
        let inferred = RatingProcessor::new(Box::new(InferredScale));
        assert_eq!(run(&inferred, &answers).kind(), "satisfaction");

        let declared = RatingProcessor::new(Box::new(DeclaredScale(RatingScale::Nps)));
        let ProcessedSummary::Nps { breakdown, .. } = run(&declared, &answers) else {
            panic!("expected nps summary");
        };
        assert_eq!(breakdown.detractors, 3);
        assert_eq!(breakdown.nps_score, -100);
    }

    #[test]
    fn zero_on_satisfaction_scale_counts_toward_total_only() {
        let processor = RatingProcessor::new(Box::new(DeclaredScale(RatingScale::Satisfaction)));
        let ProcessedSummary::Satisfaction { breakdown, .. } =
            run(&processor, &numbers(&[0.0, 5.0]))
        else {
            panic!("expected satisfaction summary");
        };
        assert_eq!(breakdown.total, 2);
        assert_eq!(
            breakdown.unsatisfied + breakdown.neutral + breakdown.satisfied,
            1
        );
        assert_eq!(breakdown.satisfaction_rate, 50);
    }

    #[test]
    fn nps_categories_partition_every_valid_score() {
        let answers = numbers(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let processor = RatingProcessor::new(Box::new(InferredScale));
        let ProcessedSummary::Nps { breakdown, .. } = run(&processor, &answers) else {
            panic!("expected nps summary");
        };
        assert_eq!(
            breakdown.promoters + breakdown.passives + breakdown.detractors,
            breakdown.total
        );
        assert_eq!(breakdown.total, 11);
        assert!((-100..=100).contains(&breakdown.nps_score));
        assert_eq!(breakdown.nps_score, -45);
    }
}
