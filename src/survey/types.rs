use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Question types as declared by the survey builder. Anything else is kept
/// verbatim in `Unsupported` so reports can name what was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Boolean,
    Rating,
    Nps,
    Text,
    Comment,
    RadioGroup,
    Checkbox,
    Matrix,
    Numeric,
    Unsupported(String),
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::Rating => "rating",
            Self::Nps => "nps",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::RadioGroup => "radiogroup",
            Self::Checkbox => "checkbox",
            Self::Matrix => "matrix",
            Self::Numeric => "numeric",
            Self::Unsupported(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for QuestionType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "boolean" => Self::Boolean,
            "rating" => Self::Rating,
            "nps" => Self::Nps,
            "text" => Self::Text,
            "comment" => Self::Comment,
            "radiogroup" => Self::RadioGroup,
            "checkbox" => Self::Checkbox,
            "matrix" => Self::Matrix,
            "numeric" => Self::Numeric,
            _ => Self::Unsupported(value.to_string()),
        }
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<QuestionType> for String {
    fn from(value: QuestionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingScale {
    /// 0..=10, promoters / passives / detractors.
    Nps,
    /// 0..=5, unsatisfied / neutral / satisfied.
    Satisfaction,
}

impl RatingScale {
    pub fn max_rating(&self) -> u32 {
        match self {
            Self::Nps => 10,
            Self::Satisfaction => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Scale declared by the survey author, if any. Absent means inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_scale: Option<RatingScale>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    pub title: String,
    pub questions: Vec<Question>,
    pub label_map: BTreeMap<String, String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SurveyDefinition {
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.name == name)
    }
}
