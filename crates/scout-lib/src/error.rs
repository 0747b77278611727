//! Error types for offer discovery and instance creation

use thiserror::Error;

/// Failure talking to the marketplace tool
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` failed ({status}): {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("invalid offer payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("offer has no identifier to rent")]
    MissingId,
}

/// Pipeline-level errors surfaced to the operator
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("No offers found matching criteria")]
    NoOffers,
}
