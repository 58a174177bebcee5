//! Tabular and structured renderings of survey data.
//!
//! Everything here is pure; writing the bytes somewhere is the caller's job.

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SurveyError},
    models::{ResponseRecord, Session, SurveyField, SurveyOption},
};

/// Joins hope values in exported tables. Distinct from the on-screen
/// `", "` join so a comma inside a value stays unambiguous.
pub const HOPE_EXPORT_DELIMITER: &str = "; ";

pub const TABLE_COLUMNS: [&str; 4] = [
    "Timestamp",
    SurveyField::Role.label(),
    SurveyField::Familiarity.label(),
    SurveyField::Hope.label(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

/// A rendered export and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

/// One row per response: `[timestamp, role, familiarity, hope]`.
pub fn to_table(responses: &[ResponseRecord]) -> Vec<[String; 4]> {
    responses
        .iter()
        .map(|response| {
            [
                format_timestamp(response.timestamp),
                response.role.as_str().to_string(),
                response.familiarity.as_str().to_string(),
                response
                    .hope
                    .iter()
                    .map(|hope| hope.as_str())
                    .collect::<Vec<_>>()
                    .join(HOPE_EXPORT_DELIMITER),
            ]
        })
        .collect()
}

/// CSV with a bare header line and every data field double-quoted.
pub fn to_csv(responses: &[ResponseRecord]) -> Result<String> {
    let mut out = TABLE_COLUMNS.join(",");
    out.push('\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in to_table(responses) {
        writer
            .write_record(&row)
            .map_err(|err| SurveyError::Export(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| SurveyError::Export(err.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|err| SurveyError::Export(err.to_string()))?;
    out.push_str(&body);
    Ok(out)
}

/// The session exactly as stored, embedded responses included.
pub fn to_document(session: &Session) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(session)?)
}

pub fn to_json(session: &Session) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(session)?)?)
}

pub fn csv_file_name(exported_at: DateTime<Utc>) -> String {
    format!("workshop-responses-{}.csv", exported_at.format("%Y-%m-%d"))
}

/// Session ids already carry the `session-` prefix.
pub fn json_file_name(session_id: &str) -> String {
    format!("workshop-{session_id}.json")
}

/// Renders a session in the requested format. Empty sessions have nothing to
/// put in a table, so CSV export refuses them.
pub fn render(session: &Session, format: ExportFormat, exported_at: DateTime<Utc>) -> Result<ExportArtifact> {
    match format {
        ExportFormat::Csv => {
            if session.responses.is_empty() {
                return Err(SurveyError::NothingToExport(session.id.clone()));
            }
            Ok(ExportArtifact {
                file_name: csv_file_name(exported_at),
                content: to_csv(&session.responses)?,
            })
        }
        ExportFormat::Json => Ok(ExportArtifact {
            file_name: json_file_name(&session.id),
            content: to_json(session)?,
        }),
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
