//! Session-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::response::ResponseRecord;

/// One workshop run and the responses collected during it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: String, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            responses: Vec::new(),
            archived: false,
            archived_at: None,
            last_updated: None,
        }
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }
}

/// Row of the session picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub display_name: String,
    pub start_time: DateTime<Utc>,
    pub response_count: usize,
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub active: bool,
}

impl SessionSummary {
    pub fn from_session(session: &Session, active_id: Option<&str>) -> Self {
        Self {
            id: session.id.clone(),
            display_name: crate::session::display_name(&session.id),
            start_time: session.start_time,
            response_count: session.response_count(),
            archived: session.archived,
            archived_at: session.archived_at,
            last_updated: session.last_updated,
            active: active_id == Some(session.id.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn legacy_session_without_optional_keys_deserializes() {
        let json = r#"{"id":"session-20240315-142530-000","startTime":"2024-03-15T14:25:30Z"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.responses.is_empty());
        assert!(!session.archived);
        assert!(session.archived_at.is_none());
    }

    #[test]
    fn summary_marks_active_session() {
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).unwrap();
        let session = Session::new("session-20240315-142530-000".into(), start);

        let summary = SessionSummary::from_session(&session, Some("session-20240315-142530-000"));
        assert!(summary.active);
        assert_eq!(summary.display_name, "Session 2024-03-15 14:25:30");

        let summary = SessionSummary::from_session(&session, None);
        assert!(!summary.active);
    }
}
