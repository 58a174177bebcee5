use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    commands,
    dashboard::{refresh::refresh_loop, render},
    export::ExportFormat,
    storage::StoragePort,
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "workshop-pulse", about = "Live audience survey for workshops", version)]
pub struct Cli {
    /// Directory holding the database and settings
    #[arg(long, global = true, env = "WORKSHOP_PULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record one survey response in the active session
    Submit {
        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        familiarity: Option<String>,

        /// Expected takeaways; repeat or comma-separate
        #[arg(long, value_delimiter = ',')]
        hope: Vec<String>,
    },

    /// Show aggregated results for the active session
    Dashboard {
        /// Keep redrawing until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// List every session, newest first
    Sessions,

    /// Archive the active session and start a fresh one
    NewSession {
        /// Replace the active session even if it has no responses
        #[arg(long)]
        force: bool,
    },

    /// Make another session the target for new responses
    Switch { session_id: String },

    /// Delete a non-active session and its responses
    Delete { session_id: String },

    /// Remove all responses from a session, keeping the session
    Clear {
        /// Session to clear; defaults to the active one
        #[arg(long)]
        session: Option<String>,

        #[arg(long)]
        force: bool,
    },

    /// Export a session to a file
    Export {
        /// Session to export; defaults to the active one
        #[arg(long)]
        session: Option<String>,

        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Output file; defaults to the export directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change dashboard settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    /// Seconds between dashboard redraws in watch mode
    SetRefresh { secs: u64 },
    /// Default directory for exports; omit to reset
    SetExportDir { path: Option<PathBuf> },
}

pub fn dispatch<S: StoragePort>(state: &AppState<S>, cli: Cli) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Command::Submit {
            role,
            familiarity,
            hope,
        } => {
            let record = commands::submit_response(state, role, familiarity, hope).map_err(|e| anyhow!(e))?;
            if json {
                print_json(&record)?;
            } else {
                println!("Recorded response {} in {}", record.id, record.session_id);
            }
        }
        Command::Dashboard { watch: false } => {
            let snapshot = commands::get_dashboard(state).map_err(|e| anyhow!(e))?;
            if json {
                print_json(&snapshot)?;
            } else {
                print!("{}", render::render_snapshot(&snapshot));
            }
        }
        Command::Dashboard { watch: true } => watch_dashboard(state, json)?,
        Command::Sessions => {
            let sessions = commands::list_sessions(state).map_err(|e| anyhow!(e))?;
            if json {
                print_json(&sessions)?;
            } else {
                print!("{}", render::render_session_list(&sessions));
            }
        }
        Command::NewSession { force } => {
            let session = commands::start_new_session(state, force).map_err(|e| anyhow!(e))?;
            println!("Started {}", session.id);
        }
        Command::Switch { session_id } => {
            let session = commands::switch_session(state, &session_id).map_err(|e| anyhow!(e))?;
            if session.archived {
                println!("Switched to {} (archived)", session.id);
            } else {
                println!("Switched to {}", session.id);
            }
        }
        Command::Delete { session_id } => {
            let session = commands::delete_session(state, &session_id).map_err(|e| anyhow!(e))?;
            println!(
                "Deleted {} and {} response(s)",
                session.id,
                session.response_count()
            );
        }
        Command::Clear { session, force } => {
            let removed = commands::clear_session(state, session.as_deref(), force).map_err(|e| anyhow!(e))?;
            println!("Removed {removed} response(s)");
        }
        Command::Export {
            session,
            format,
            output,
        } => {
            let path = commands::export_session(state, session.as_deref(), format.into(), output).map_err(|e| anyhow!(e))?;
            println!("Wrote {}", path.display());
        }
        Command::Settings { action } => {
            let settings = match action.unwrap_or(SettingsAction::Show) {
                SettingsAction::Show => commands::get_settings(state),
                SettingsAction::SetRefresh { secs } => commands::set_refresh_interval(state, secs),
                SettingsAction::SetExportDir { path } => commands::set_export_dir(state, path),
            }
            .map_err(|e| anyhow!(e))?;
            print_json(&settings)?;
        }
    }

    Ok(())
}

fn watch_dashboard<S: StoragePort>(state: &AppState<S>, json: bool) -> Result<()> {
    let interval = state.settings.dashboard().refresh_interval();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async {
        let cancel_token = CancellationToken::new();
        let on_ctrl_c = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_ctrl_c.cancel();
            }
        });

        refresh_loop(interval, cancel_token, || {
            let snapshot = commands::get_dashboard(state).map_err(|e| anyhow!(e))?;
            if json {
                println!("{}", serde_json::to_string(&snapshot)?);
            } else {
                // Clear the screen and home the cursor before redrawing
                print!("\x1B[2J\x1B[H{}", render::render_snapshot(&snapshot));
            }
            Ok(())
        })
        .await;
    });

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
