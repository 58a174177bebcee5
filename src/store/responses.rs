use serde::{Deserialize, Serialize};

use crate::models::ResponseRecord;

/// Flat collection of every response across all sessions, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseStore {
    records: Vec<ResponseRecord>,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ResponseRecord) {
        self.records.push(record);
    }

    pub fn list_all(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn list_by_session(&self, session_id: &str) -> Vec<ResponseRecord> {
        self.records
            .iter()
            .filter(|record| record.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Removes every record tagged with `session_id` and returns how many went.
    pub fn delete_by_session(&mut self, session_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.session_id != session_id);
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Familiarity, Hope, Role};
    use chrono::{TimeZone, Utc};

    fn record(id: &str, session_id: &str) -> ResponseRecord {
        ResponseRecord {
            id: id.into(),
            session_id: session_id.into(),
            role: Role::Designer,
            familiarity: Familiarity::Advanced,
            hope: vec![Hope::Inspiration],
            timestamp: Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn list_by_session_preserves_insertion_order() {
        let mut store = ResponseStore::new();
        store.append(record("1", "a"));
        store.append(record("2", "b"));
        store.append(record("3", "a"));

        let ids: Vec<_> = store
            .list_by_session("a")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(store.list_all().len(), 3);
    }

    #[test]
    fn delete_by_session_only_touches_that_session() {
        let mut store = ResponseStore::new();
        store.append(record("1", "a"));
        store.append(record("2", "b"));
        store.append(record("3", "a"));

        assert_eq!(store.delete_by_session("a"), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_all()[0].id, "2");
    }

    #[test]
    fn delete_unknown_session_is_a_no_op() {
        let mut store = ResponseStore::new();
        store.append(record("1", "a"));

        assert_eq!(store.delete_by_session("missing"), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut store = ResponseStore::new();
        store.append(record("1", "a"));
        let json = serde_json::to_value(&store).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "1");
    }
}
