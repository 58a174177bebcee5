//! Plain-text rendering for the terminal.

use std::fmt::Write;

use crate::{metrics::FieldBreakdown, models::SessionSummary};

use super::DashboardSnapshot;

const BAR_WIDTH: usize = 24;
const RECENT_LIMIT: usize = 10;

pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let session = &snapshot.session;

    let _ = writeln!(out, "{}{}", session.display_name, archived_tag(session));
    let _ = writeln!(
        out,
        "Responses: {}   Last response: {}   Session time: {}",
        snapshot.total_responses, snapshot.last_response_label, snapshot.session_elapsed
    );
    out.push('\n');

    match &snapshot.breakdowns {
        None => {
            let _ = writeln!(out, "No data yet");
        }
        Some(breakdowns) => {
            for breakdown in breakdowns {
                render_breakdown(&mut out, breakdown);
                out.push('\n');
            }
        }
    }

    let _ = writeln!(out, "Recent responses");
    if snapshot.recent_responses.is_empty() {
        let _ = writeln!(out, "  No responses yet");
    }
    for view in snapshot.recent_responses.iter().take(RECENT_LIMIT) {
        let _ = writeln!(
            out,
            "  Response #{:<4} {}  {} / {} / {}",
            view.number,
            view.timestamp.format("%H:%M:%S"),
            view.role,
            view.familiarity,
            view.hope
        );
    }
    if snapshot.recent_responses.len() > RECENT_LIMIT {
        let _ = writeln!(
            out,
            "  ... {} more",
            snapshot.recent_responses.len() - RECENT_LIMIT
        );
    }

    out
}

fn render_breakdown(out: &mut String, breakdown: &FieldBreakdown) {
    let _ = writeln!(out, "{}", breakdown.title);
    let width = breakdown
        .entries
        .iter()
        .map(|entry| entry.label.len())
        .max()
        .unwrap_or(0);

    for entry in &breakdown.entries {
        let filled = ((entry.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<width$}  {:<bar$}  {:>3}  {:>5.1}%",
            entry.label,
            "#".repeat(filled.min(BAR_WIDTH)),
            entry.count,
            entry.percentage,
            width = width,
            bar = BAR_WIDTH,
        );
    }
}

pub fn render_session_list(sessions: &[SessionSummary]) -> String {
    if sessions.is_empty() {
        return "No sessions yet\n".to_string();
    }

    let mut out = String::new();
    for session in sessions {
        let marker = if session.active { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {:<28} {:<30} {:>4} responses{}",
            session.id,
            session.display_name,
            session.response_count,
            archived_tag(session)
        );
    }
    out
}

fn archived_tag(session: &SessionSummary) -> &'static str {
    if session.archived {
        " [archived]"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Familiarity, Hope, ResponseRecord, Role, Session};
    use chrono::{Duration, TimeZone, Utc};

    fn session() -> Session {
        Session::new(
            "session-20240315-142530-000".into(),
            Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).unwrap(),
        )
    }

    #[test]
    fn empty_dashboard_has_placeholders() {
        let session = session();
        let snapshot = DashboardSnapshot::build(&session, Some(&session.id), session.start_time);
        let text = render_snapshot(&snapshot);

        assert!(text.starts_with("Session 2024-03-15 14:25:30\n"));
        assert!(text.contains("No data yet"));
        assert!(text.contains("No responses yet"));
        assert!(text.contains("Last response: --"));
    }

    #[test]
    fn populated_dashboard_shows_breakdowns() {
        let mut session = session();
        session.archived = true;
        session.responses.push(ResponseRecord {
            id: "resp-1".into(),
            session_id: session.id.clone(),
            role: Role::Engineer,
            familiarity: Familiarity::Beginner,
            hope: vec![Hope::Networking],
            timestamp: session.start_time + Duration::seconds(30),
        });

        let snapshot = DashboardSnapshot::build(&session, None, session.start_time + Duration::minutes(1));
        let text = render_snapshot(&snapshot);

        assert!(text.contains("[archived]"));
        assert!(text.contains("Primary Role"));
        assert!(text.contains("Engineer"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("Response #1"));
        assert!(!text.contains("No data yet"));
    }

    #[test]
    fn session_list_marks_active() {
        let session = session();
        let summaries = vec![SessionSummary::from_session(&session, Some(&session.id))];
        let text = render_session_list(&summaries);
        assert!(text.starts_with("* session-20240315-142530-000"));
        assert_eq!(render_session_list(&[]), "No sessions yet\n");
    }
}
