use apm_catalog::{InvalidProjectId, TableError};
use thiserror::Error;

/// Errors returned by [`CatalogStore`](crate::CatalogStore) operations.
///
/// Precondition failures are reported before anything is written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project {0} does not exist")]
    ProjectNotFound(String),

    #[error("Track {0} does not exist in catalog")]
    TrackNotFound(String),

    #[error("Track {track_id} not found in project {project_id}")]
    MembershipNotFound {
        project_id: String,
        track_id: String,
    },

    #[error("Track {track_id} is already in project {project_id}")]
    DuplicateMembership {
        project_id: String,
        track_id: String,
    },

    #[error("No project IDs left after {0}")]
    ProjectIdsExhausted(String),

    #[error("Project {0} has no track positions left")]
    PositionsExhausted(String),

    #[error(transparent)]
    InvalidProjectId(#[from] InvalidProjectId),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_) | Self::TrackNotFound(_) | Self::MembershipNotFound { .. }
        )
    }
}
