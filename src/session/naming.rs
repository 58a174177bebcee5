use chrono::{DateTime, NaiveDateTime, Utc};

const SESSION_PREFIX: &str = "session-";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Session id for a session created at `at`, e.g. `session-20240315-142530-042`.
///
/// Fixed-width fields keep lexical order equal to chronological order.
pub fn session_id_for(at: DateTime<Utc>) -> String {
    format!(
        "{SESSION_PREFIX}{}-{:03}",
        at.format(STAMP_FORMAT),
        at.timestamp_subsec_millis().min(999)
    )
}

/// Creation instant encoded in a generated session id, to the second.
pub fn parse_session_id(session_id: &str) -> Option<DateTime<Utc>> {
    let stamp = session_id.strip_prefix(SESSION_PREFIX)?;
    let (seconds, millis) = stamp.rsplit_once('-')?;
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(seconds, STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Name shown for a session. Ids that were not generated here are shown as-is.
pub fn display_name(session_id: &str) -> String {
    match parse_session_id(session_id) {
        Some(at) => format!("Session {}", at.format("%Y-%m-%d %H:%M:%S")),
        None => session_id.to_string(),
    }
}
