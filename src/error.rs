//! Error types for the survey core.
//!
//! Every failure a caller can hit through the session manager is a variant
//! here; all of them are recoverable and meant to be surfaced to the user.

use thiserror::Error;

use crate::storage::Region;

#[derive(Error, Debug)]
pub enum SurveyError {
    /// The submission selected no expected takeaways
    #[error("select at least one expected takeaway")]
    EmptySelection,

    /// A single-choice answer was not supplied
    #[error("missing answer for {0}")]
    MissingField(&'static str),

    /// An answer outside the closed survey options
    #[error("unknown {field} option '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session already exists: {0}")]
    DuplicateSession(String),

    #[error("cannot delete the active session {0}; switch to another session first")]
    ActiveSessionDeletionForbidden(String),

    /// The operation needs an explicit `force` from the caller
    #[error("{action} for session {session_id} requires confirmation")]
    ConfirmationRequired {
        action: &'static str,
        session_id: String,
    },

    #[error("no data to export for session {0}")]
    NothingToExport(String),

    #[error("export failed: {0}")]
    Export(String),

    /// A multi-region write failed after at least one region was written.
    /// `rolled_back` reports whether the earlier regions were restored.
    #[error("partial write while updating {region}: {source} (rolled back: {rolled_back})")]
    PartialWrite {
        region: Region,
        rolled_back: bool,
        #[source]
        source: anyhow::Error,
    },

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("stored {region} data is unreadable: {source}")]
    CorruptRegion {
        region: Region,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
