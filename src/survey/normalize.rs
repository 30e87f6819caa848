use std::collections::BTreeMap;

use tracing::warn;

use super::types::{Question, SurveyDefinition};

pub fn build_definition(title: String, questions: Vec<Question>) -> SurveyDefinition {
    let mut kept: Vec<Question> = Vec::new();
    let mut label_map: BTreeMap<String, String> = BTreeMap::new();
    let mut warnings: Vec<String> = Vec::new();

    for q in questions {
        if kept.iter().any(|k| k.name == q.name) {
            warn!(question = %q.name, "duplicate question name, keeping first occurrence");
            warnings.push(format!("DUPLICATE_QUESTION_NAME: {}", q.name));
            continue;
        }
        label_map.insert(q.name.clone(), clean_label(&q.title));
        kept.push(q);
    }

    SurveyDefinition {
        title,
        questions: kept,
        label_map,
        warnings,
    }
}

pub(crate) fn clean_label(text: &str) -> String {
    let compact = text.split_whitespace().collect::<Vec<&str>>().join(" ");
    if compact.chars().count() > 200 {
        let head = compact.chars().take(197).collect::<String>();
        format!("{head}...")
    } else {
        compact
    }
}
