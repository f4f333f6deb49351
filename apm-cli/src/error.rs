use apm_store::StoreError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog store operation failed
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Follow-up suggestion printed under the error, for lookups that missed.
    pub(crate) fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Store(e) if e.is_not_found() => Some(match e {
                StoreError::TrackNotFound(_) => {
                    "Check the track ID against tracks.csv in the data directory."
                }
                StoreError::MembershipNotFound { .. } => {
                    "Run 'apm-agent list-tracks --project-id <ID>' to see the project's tracks."
                }
                _ => "Run 'apm-agent list-projects' to see existing projects.",
            }),
            _ => None,
        }
    }
}
