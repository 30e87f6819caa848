use std::collections::HashMap;

use crate::responses::types::RawAnswer;

use super::registry::{choice_config, DisplayConfig, Processor};
use super::summary::{ChartSlice, ProcessedSummary};

/// Counts picks for single-choice (`radiogroup`) and multi-choice (`checkbox`) questions.
pub struct ChoiceProcessor;

impl Processor for ChoiceProcessor {
    fn process(&self, answers: &[&RawAnswer]) -> ProcessedSummary {
        ProcessedSummary::Choice {
            data: count_choices(answers),
        }
    }

    fn config(&self, summary: &ProcessedSummary) -> DisplayConfig {
        let labels = match summary {
            ProcessedSummary::Choice { data } => {
                data.iter().map(|s| s.name.as_str()).collect::<Vec<&str>>()
            }
            _ => Vec::new(),
        };
        choice_config(&labels)
    }
}

pub fn count_choices(answers: &[&RawAnswer]) -> Vec<ChartSlice> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slices: Vec<ChartSlice> = Vec::new();
    let mut bump = |choice: &str| {
        let choice = choice.trim();
        if choice.is_empty() {
            return;
        }
        match index.get(choice) {
            Some(&slot) => slices[slot].value += 1,
            None => {
                index.insert(choice.to_string(), slices.len());
                slices.push(ChartSlice {
                    name: choice.to_string(),
                    value: 1,
                });
            }
        }
    };

    for answer in answers {
        match answer {
            RawAnswer::Text(choice) => bump(choice),
            RawAnswer::List(choices) => choices.iter().for_each(|c| bump(c)),
            _ => {}
        }
    }

    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}

#[cfg(test)]
mod tests {
    use super::count_choices;
    use crate::responses::types::RawAnswer;

    #[test]
    fn counts_single_and_multi_select_answers() {
        let answers = vec![
            RawAnswer::Text("email".to_string()),
            RawAnswer::List(vec!["chat".to_string(), "email".to_string()]),
            RawAnswer::List(vec!["phone".to_string()]),
            RawAnswer::Bool(true),
            RawAnswer::Text(" ".to_string()),
        ];
        let refs = answers.iter().collect::<Vec<&RawAnswer>>();
        let slices = count_choices(&refs);
        let pairs = slices
            .iter()
            .map(|s| (s.name.as_str(), s.value))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![("email", 2), ("chat", 1), ("phone", 1)]);
    }
}
