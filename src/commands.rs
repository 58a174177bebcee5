//! Command handlers behind the CLI. Each returns `Result<_, String>` so the
//! caller only ever has a message to show.

use std::{fs, path::PathBuf};

use crate::{
    dashboard::DashboardSnapshot,
    export::ExportFormat,
    models::{RawSubmission, ResponseRecord, Session, SessionSummary},
    settings::DashboardSettings,
    storage::StoragePort,
    AppState,
};

pub fn submit_response<S: StoragePort>(
    state: &AppState<S>,
    role: Option<String>,
    familiarity: Option<String>,
    hope: Vec<String>,
) -> Result<ResponseRecord, String> {
    let raw = RawSubmission {
        role,
        familiarity,
        hope,
    };
    state.manager.record_response(&raw).map_err(|e| e.to_string())
}

pub fn get_dashboard<S: StoragePort>(state: &AppState<S>) -> Result<DashboardSnapshot, String> {
    state.manager.dashboard().map_err(|e| e.to_string())
}

pub fn list_sessions<S: StoragePort>(state: &AppState<S>) -> Result<Vec<SessionSummary>, String> {
    state.manager.list_sessions().map_err(|e| e.to_string())
}

pub fn start_new_session<S: StoragePort>(state: &AppState<S>, force: bool) -> Result<Session, String> {
    state
        .manager
        .start_new_session(force)
        .map_err(|e| e.to_string())
}

pub fn switch_session<S: StoragePort>(state: &AppState<S>, session_id: &str) -> Result<Session, String> {
    state
        .manager
        .switch_session(session_id)
        .map_err(|e| e.to_string())
}

pub fn delete_session<S: StoragePort>(state: &AppState<S>, session_id: &str) -> Result<Session, String> {
    state
        .manager
        .delete_session(session_id)
        .map_err(|e| e.to_string())
}

pub fn clear_session<S: StoragePort>(
    state: &AppState<S>,
    session_id: Option<&str>,
    force: bool,
) -> Result<usize, String> {
    state
        .manager
        .clear_session(session_id, force)
        .map_err(|e| e.to_string())
}

/// Renders a session and writes it to `output`, or into the configured
/// export directory (current directory if unset) under its default name.
pub fn export_session<S: StoragePort>(
    state: &AppState<S>,
    session_id: Option<&str>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf, String> {
    let artifact = state
        .manager
        .export(session_id, format)
        .map_err(|e| e.to_string())?;

    let path = match output {
        Some(path) => path,
        None => {
            let dir = state
                .settings
                .dashboard()
                .export_dir
                .unwrap_or_else(|| PathBuf::from("."));
            dir.join(&artifact.file_name)
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    fs::write(&path, artifact.content.as_bytes())
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    log::info!("Exported {} to {}", artifact.file_name, path.display());
    Ok(path)
}

pub fn get_settings<S: StoragePort>(state: &AppState<S>) -> Result<DashboardSettings, String> {
    Ok(state.settings.dashboard())
}

pub fn set_refresh_interval<S: StoragePort>(
    state: &AppState<S>,
    secs: u64,
) -> Result<DashboardSettings, String> {
    state
        .settings
        .set_refresh_interval(secs)
        .map_err(|e| e.to_string())
}

pub fn set_export_dir<S: StoragePort>(
    state: &AppState<S>,
    dir: Option<PathBuf>,
) -> Result<DashboardSettings, String> {
    state.settings.set_export_dir(dir).map_err(|e| e.to_string())
}
