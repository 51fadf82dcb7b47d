pub mod backends;
pub mod gateway;
pub mod json_extract;
pub mod medicines;
pub mod orchestrator;
pub mod prompt;
pub mod reconcile;
pub mod symptoms;
pub mod types;

pub use backends::*;
pub use gateway::*;
pub use json_extract::*;
pub use medicines::*;
pub use orchestrator::*;
pub use prompt::*;
pub use reconcile::*;
pub use symptoms::*;
pub use types::*;

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;

/// Transient backend failures. These never cross the gateway boundary:
/// the gateway logs them and substitutes the stage's dummy payload.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("cannot reach model backend at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("backend returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("response decoding error: {0}")]
    Decode(String),
}

/// Structural failures the orchestrator surfaces to the caller. Unlike
/// `BackendError`, these are caller-actionable and are never downgraded.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("clinical note {0} not found")]
    NoteNotFound(Uuid),

    #[error("clinical note {0} has no transcript to analyze")]
    EmptyTranscript(Uuid),

    #[error("clinical note {0} is already analyzed")]
    AlreadyAnalyzed(Uuid),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
