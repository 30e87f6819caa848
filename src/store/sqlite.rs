use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::warn;

use crate::error::{InsightsError, Result};
use crate::responses::types::{RespondentMetadata, ResponseRecord};
use crate::survey::parse::parse_survey_json;
use crate::survey::types::SurveyDefinition;

use super::ResponseSource;

/// Local cache of surveys and responses imported from backend exports.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Stores the raw survey JSON after checking that it parses.
    pub fn save_survey(&self, survey_id: &str, raw_definition: &str) -> Result<SurveyDefinition> {
        let survey = parse_survey_json(raw_definition)?;
        self.conn.execute(
            "INSERT INTO surveys (id, title, definition, imported_at) VALUES (?1, ?2, ?3, ?4) \
            ON CONFLICT(id) DO UPDATE SET title = excluded.title, definition = excluded.definition, \
            imported_at = excluded.imported_at",
            params![survey_id, survey.title, raw_definition, now_string()],
        )?;
        Ok(survey)
    }

    /// Inserts responses for a campaign. Responses are write-once: a record id that
    /// already exists is left untouched. Returns how many rows were inserted.
    pub fn save_responses(
        &mut self,
        survey_id: &str,
        campaign_id: &str,
        records: &[ResponseRecord],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO responses \
                (id, campaign_id, survey_id, respondent, submitted_at, response_data) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.id,
                    campaign_id,
                    survey_id,
                    serde_json::to_string(&record.respondent)?,
                    record.submitted_at.map(|at| at.to_rfc3339()),
                    serde_json::to_string(&record.answers)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS surveys (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        definition TEXT NOT NULL,
        imported_at TEXT NOT NULL
      );
      CREATE TABLE IF NOT EXISTS responses (
        id TEXT PRIMARY KEY,
        campaign_id TEXT NOT NULL,
        survey_id TEXT NOT NULL,
        respondent TEXT NOT NULL,
        submitted_at TEXT,
        response_data TEXT NOT NULL,
        FOREIGN KEY(survey_id) REFERENCES surveys(id)
      );
      CREATE INDEX IF NOT EXISTS idx_responses_campaign ON responses(campaign_id);",
    )?;
    Ok(())
}

fn now_string() -> String {
    Utc::now().to_rfc3339()
}

struct StoredRow {
    id: String,
    respondent: String,
    submitted_at: Option<String>,
    response_data: String,
}

fn decode_row(row: StoredRow) -> Result<ResponseRecord> {
    let respondent: RespondentMetadata = serde_json::from_str(&row.respondent)?;
    let answers = serde_json::from_str(&row.response_data)?;
    let submitted_at = match row.submitted_at {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| InsightsError::InvalidSurvey(format!("bad submitted_at '{raw}': {e}")))?
                .with_timezone(&Utc),
        ),
        None => None,
    };
    Ok(ResponseRecord {
        id: row.id,
        respondent,
        submitted_at,
        answers,
    })
}

impl ResponseSource for SqliteStore {
    fn load_survey(&self, survey_id: &str) -> Result<SurveyDefinition> {
        let raw: String = self
            .conn
            .query_row(
                "SELECT definition FROM surveys WHERE id = ?1",
                params![survey_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    InsightsError::NotFound(format!("survey '{survey_id}'"))
                }
                other => InsightsError::Sqlite(other),
            })?;
        parse_survey_json(&raw)
    }

    fn load_responses(&self, campaign_id: &str) -> Result<Vec<ResponseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, respondent, submitted_at, response_data FROM responses \
            WHERE campaign_id = ?1 ORDER BY submitted_at, id",
        )?;
        let rows = stmt.query_map(params![campaign_id], |row| {
            Ok(StoredRow {
                id: row.get(0)?,
                respondent: row.get(1)?,
                submitted_at: row.get(2)?,
                response_data: row.get(3)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match decode_row(row) {
                Ok(record) => records.push(record),
                Err(e) => warn!(response = %id, error = %e, "skipping unreadable stored response"),
            }
        }
        Ok(records)
    }
}
