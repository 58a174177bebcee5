use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SurveyError},
    models::{ResponseRecord, Session},
};

/// Session metadata keyed by session id, each session carrying its own copy
/// of the responses recorded into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRegistry {
    sessions: BTreeMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, session_id: &str, start_time: DateTime<Utc>) -> Result<&Session> {
        if self.sessions.contains_key(session_id) {
            return Err(SurveyError::DuplicateSession(session_id.to_string()));
        }

        let session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id.to_string(), start_time));
        Ok(session)
    }

    pub fn get(&self, session_id: &str) -> Result<&Session> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| SurveyError::NotFound(session_id.to_string()))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Sessions in id order, which is also creation order for generated ids.
    pub fn list_all(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn append_response(&mut self, session_id: &str, record: ResponseRecord) -> Result<()> {
        let session = self.get_mut(session_id)?;
        session.last_updated = Some(record.timestamp);
        session.responses.push(record);
        Ok(())
    }

    /// Marks a session archived. Archiving twice keeps the first `archived_at`
    /// and returns `false`.
    pub fn archive(&mut self, session_id: &str, archived_at: DateTime<Utc>) -> Result<bool> {
        let session = self.get_mut(session_id)?;
        if session.archived {
            return Ok(false);
        }

        session.archived = true;
        session.archived_at = Some(archived_at);
        Ok(true)
    }

    /// Drops every embedded response of a session, keeping the session itself.
    pub fn clear_responses(&mut self, session_id: &str, cleared_at: DateTime<Utc>) -> Result<usize> {
        let session = self.get_mut(session_id)?;
        let removed = session.responses.len();
        if removed > 0 {
            session.responses.clear();
            session.last_updated = Some(cleared_at);
        }
        Ok(removed)
    }

    pub fn delete(&mut self, session_id: &str, active_session_id: Option<&str>) -> Result<Session> {
        if !self.contains(session_id) {
            return Err(SurveyError::NotFound(session_id.to_string()));
        }
        if active_session_id == Some(session_id) {
            return Err(SurveyError::ActiveSessionDeletionForbidden(
                session_id.to_string(),
            ));
        }

        self.sessions
            .remove(session_id)
            .ok_or_else(|| SurveyError::NotFound(session_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn get_mut(&mut self, session_id: &str) -> Result<&mut Session> {
        self.sessions
            .get_mut(session_id)
            .ok_or_else(|| SurveyError::NotFound(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Familiarity, Hope, Role};
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).unwrap()
    }

    fn record(session_id: &str, minutes: i64) -> ResponseRecord {
        ResponseRecord {
            id: format!("r-{minutes}"),
            session_id: session_id.into(),
            role: Role::Engineer,
            familiarity: Familiarity::Intermediate,
            hope: vec![Hope::CareerGrowth],
            timestamp: start() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn create_rejects_duplicate_ids() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();

        assert!(matches!(
            registry.create("a", start()),
            Err(SurveyError::DuplicateSession(id)) if id == "a"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        assert!(matches!(registry.get("nope"), Err(SurveyError::NotFound(_))));
    }

    #[test]
    fn append_response_updates_last_updated() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();
        registry.append_response("a", record("a", 3)).unwrap();

        let session = registry.get("a").unwrap();
        assert_eq!(session.response_count(), 1);
        assert_eq!(session.last_updated, Some(start() + Duration::minutes(3)));

        assert!(matches!(
            registry.append_response("b", record("b", 4)),
            Err(SurveyError::NotFound(_))
        ));
    }

    #[test]
    fn second_archive_keeps_first_timestamp() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();

        assert!(registry.archive("a", start() + Duration::hours(1)).unwrap());
        assert!(!registry.archive("a", start() + Duration::hours(2)).unwrap());

        let session = registry.get("a").unwrap();
        assert!(session.archived);
        assert_eq!(session.archived_at, Some(start() + Duration::hours(1)));
    }

    #[test]
    fn delete_refuses_active_session() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();
        registry.create("b", start()).unwrap();

        assert!(matches!(
            registry.delete("a", Some("a")),
            Err(SurveyError::ActiveSessionDeletionForbidden(_))
        ));
        assert!(matches!(
            registry.delete("zzz", Some("a")),
            Err(SurveyError::NotFound(_))
        ));

        let removed = registry.delete("b", Some("a")).unwrap();
        assert_eq!(removed.id, "b");
        assert!(!registry.contains("b"));
    }

    #[test]
    fn delete_of_missing_active_id_is_not_found() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();

        assert!(matches!(
            registry.delete("gone", Some("gone")),
            Err(SurveyError::NotFound(id)) if id == "gone"
        ));
        assert!(registry.contains("a"));
    }

    #[test]
    fn clear_responses_keeps_session() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();
        registry.append_response("a", record("a", 1)).unwrap();
        registry.append_response("a", record("a", 2)).unwrap();

        let cleared_at = start() + Duration::hours(1);
        assert_eq!(registry.clear_responses("a", cleared_at).unwrap(), 2);
        let session = registry.get("a").unwrap();
        assert!(session.responses.is_empty());
        assert_eq!(session.last_updated, Some(cleared_at));
    }

    #[test]
    fn serializes_as_object_keyed_by_id() {
        let mut registry = SessionRegistry::new();
        registry.create("a", start()).unwrap();
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["a"]["id"], "a");
        assert_eq!(json["a"]["archived"], false);
    }
}
