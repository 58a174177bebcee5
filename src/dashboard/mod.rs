//! Read model consumed by the presentation layer.

pub mod refresh;
pub mod render;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    metrics::{self, FieldBreakdown},
    models::{ResponseRecord, Session, SessionSummary, SurveyOption},
};

/// Everything the live dashboard shows for one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub session: SessionSummary,
    pub generated_at: DateTime<Utc>,
    pub total_responses: usize,
    pub last_response_at: Option<DateTime<Utc>>,
    /// "12s ago", "4m ago", ... or "--" when nothing was submitted yet
    pub last_response_label: String,
    /// Time since the session started, as MM:SS
    pub session_elapsed: String,
    /// `None` until the first response arrives
    pub breakdowns: Option<Vec<FieldBreakdown>>,
    /// Most recent first
    pub recent_responses: Vec<ResponseView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    /// Arrival ordinal within the session, starting at 1
    pub number: usize,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub role: String,
    pub familiarity: String,
    pub hope: String,
}

impl ResponseView {
    fn from_record(number: usize, record: &ResponseRecord) -> Self {
        Self {
            number,
            id: record.id.clone(),
            timestamp: record.timestamp,
            role: record.role.as_str().to_string(),
            familiarity: record.familiarity.as_str().to_string(),
            hope: record.hope_display(),
        }
    }
}

impl DashboardSnapshot {
    pub fn build(session: &Session, active_id: Option<&str>, now: DateTime<Utc>) -> Self {
        let responses = &session.responses;
        let last_response_at = responses.last().map(|record| record.timestamp);

        let recent_responses = responses
            .iter()
            .enumerate()
            .rev()
            .map(|(index, record)| ResponseView::from_record(index + 1, record))
            .collect();

        Self {
            session: SessionSummary::from_session(session, active_id),
            generated_at: now,
            total_responses: responses.len(),
            last_response_at,
            last_response_label: last_response_at
                .map(|at| format_time_ago(at, now))
                .unwrap_or_else(|| "--".to_string()),
            session_elapsed: format_elapsed(session.start_time, now),
            breakdowns: metrics::summarize(responses),
            recent_responses,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total_responses > 0
    }
}

/// Relative age of `then`: seconds, minutes or hours ago, else the date.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);

    if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

/// Elapsed time as zero-padded `MM:SS`; minutes keep counting past 59.
pub fn format_elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - start).num_seconds().max(0);
    format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
}
