use std::collections::HashMap;

use crate::responses::types::RawAnswer;
use crate::util::text::tokenize_words;

use super::registry::{text_config, DisplayConfig, Processor};
use super::summary::{ProcessedSummary, WordFrequency};

pub const DEFAULT_TOP_WORDS: usize = 50;
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

pub struct TextProcessor {
    top_words: usize,
    min_token_length: usize,
}

impl TextProcessor {
    pub fn new(top_words: usize, min_token_length: usize) -> Self {
        Self {
            top_words,
            min_token_length,
        }
    }
}

impl Processor for TextProcessor {
    fn process(&self, answers: &[&RawAnswer]) -> ProcessedSummary {
        ProcessedSummary::Text {
            data: word_frequencies(answers, self.top_words, self.min_token_length),
        }
    }

    fn config(&self, _summary: &ProcessedSummary) -> DisplayConfig {
        text_config()
    }
}

/// Counts tokens across every text answer and keeps the `top` most frequent.
/// Equal counts keep the order in which the words were first seen.
pub fn word_frequencies(
    answers: &[&RawAnswer],
    top: usize,
    min_token_length: usize,
) -> Vec<WordFrequency> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordFrequency> = Vec::new();

    let texts = answers
        .iter()
        .filter_map(|a| a.as_text())
        .filter(|t| !t.trim().is_empty());
    for text in texts {
        for token in tokenize_words(text) {
            if token.chars().count() < min_token_length {
                continue;
            }
            match index.get(&token) {
                Some(&slot) => counts[slot].value += 1,
                None => {
                    index.insert(token.clone(), counts.len());
                    counts.push(WordFrequency {
                        text: token,
                        value: 1,
                    });
                }
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.value.cmp(&a.value));
    counts.truncate(top);
    counts
}
