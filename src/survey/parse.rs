use regex::Regex;
use serde_json::Value;

use crate::error::{InsightsError, Result};

use super::normalize::build_definition;
use super::types::{Question, QuestionType, RatingScale, SurveyDefinition};

const CONTAINER_TYPES: &[&str] = &["panel", "paneldynamic"];

pub fn parse_survey_json(raw: &str) -> Result<SurveyDefinition> {
    let root: Value = serde_json::from_str(raw)?;
    parse_survey_value(&root)
}

pub fn parse_survey_value(root: &Value) -> Result<SurveyDefinition> {
    let title = root
        .get("title")
        .and_then(Value::as_str)
        .map(strip_html)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled Survey".to_string());

    let pages = root
        .get("pages")
        .and_then(Value::as_array)
        .ok_or_else(|| InsightsError::InvalidSurvey("survey is missing a pages array".to_string()))?;

    let mut questions: Vec<Question> = Vec::new();
    for page in pages {
        if let Some(elements) = page.get("elements").and_then(Value::as_array) {
            collect_questions(elements, &mut questions);
        }
    }

    Ok(build_definition(title, questions))
}

fn collect_questions(elements: &[Value], out: &mut Vec<Question>) {
    for element in elements {
        let element_type = element.get("type").and_then(Value::as_str).unwrap_or("");
        if CONTAINER_TYPES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(element_type))
        {
            for key in ["elements", "templateElements"] {
                if let Some(nested) = element.get(key).and_then(Value::as_array) {
                    collect_questions(nested, out);
                }
            }
            continue;
        }
        if let Some(q) = parse_question(element) {
            out.push(q);
        }
    }
}

fn parse_question(element: &Value) -> Option<Question> {
    let name = element
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())?
        .to_string();
    let title = element
        .get("title")
        .and_then(Value::as_str)
        .map(strip_html)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| name.clone());
    let question_type = QuestionType::from(
        element
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown"),
    );
    let declared_scale = declared_scale(element, &question_type);

    Some(Question {
        name,
        title,
        question_type,
        declared_scale,
    })
}

fn declared_scale(element: &Value, question_type: &QuestionType) -> Option<RatingScale> {
    if *question_type == QuestionType::Nps {
        return Some(RatingScale::Nps);
    }
    if let Some(kind) = element.get("scaleType").and_then(Value::as_str) {
        match kind.trim().to_lowercase().as_str() {
            "nps" => return Some(RatingScale::Nps),
            "satisfaction" | "csat" => return Some(RatingScale::Satisfaction),
            _ => {}
        }
    }
    element
        .get("rateMax")
        .and_then(Value::as_f64)
        .map(|max| {
            if max > 5.0 {
                RatingScale::Nps
            } else {
                RatingScale::Satisfaction
            }
        })
}

pub(crate) fn strip_html(input: &str) -> String {
    let tag_re = Regex::new(r"<[^>]+>").expect("regex");
    let no_tags = tag_re.replace_all(input, " ");
    no_tags
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::parse_survey_json;
    use crate::error::InsightsError;
    use crate::survey::types::{QuestionType, RatingScale};

    #[test]
    fn flattens_pages_and_panels_in_document_order() {
        let raw = r#"{
      "title": "<b>Quarterly</b> pulse",
      "pages": [
        {"elements": [
          {"name": "likes_job", "title": "Do you <i>like</i> your job?", "type": "boolean"},
          {"type": "panel", "name": "p1", "elements": [
            {"name": "recommend", "title": "Recommend us?", "type": "rating", "rateMax": 10},
            {"name": "why", "type": "comment"}
          ]}
        ]},
        {"elements": [
          {"name": "grid", "title": "Grid", "type": "matrix"},
          {"title": "nameless", "type": "text"}
        ]}
      ]
    }"#;
        let def = parse_survey_json(raw).expect("parse survey");
        assert_eq!(def.title, "Quarterly pulse");
        let names = def
            .questions
            .iter()
            .map(|q| q.name.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(names, vec!["likes_job", "recommend", "why", "grid"]);
        assert_eq!(def.questions[0].title, "Do you like your job?");
        assert_eq!(def.questions[1].declared_scale, Some(RatingScale::Nps));
        assert_eq!(def.questions[2].title, "why");
        assert_eq!(def.questions[3].question_type, QuestionType::Matrix);
    }

    #[test]
    fn scale_declarations_are_read() {
        let raw = r#"{"pages":[{"elements":[
          {"name":"a","type":"nps"},
          {"name":"b","type":"rating","scaleType":"satisfaction"},
          {"name":"c","type":"rating","rateMax":5},
          {"name":"d","type":"rating"}
        ]}]}"#;
        let def = parse_survey_json(raw).expect("parse survey");
        let scales = def
            .questions
            .iter()
            .map(|q| q.declared_scale)
            .collect::<Vec<_>>();
        assert_eq!(
            scales,
            vec![
                Some(RatingScale::Nps),
                Some(RatingScale::Satisfaction),
                Some(RatingScale::Satisfaction),
                None
            ]
        );
        assert_eq!(def.title, "Untitled Survey");
    }

    #[test]
    fn missing_pages_is_rejected() {
        let err = parse_survey_json(r#"{"title":"x"}"#).expect_err("should fail");
        assert!(matches!(err, InsightsError::InvalidSurvey(_)));
    }
}
