use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Invalid survey definition: {0}")]
    InvalidSurvey(String),

    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend responded with status {status}: {body}")]
    Backend { status: u16, body: String },
}
