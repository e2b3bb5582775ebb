use plan_canvas::ProjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project {0} not found")]
    NotFound(ProjectId),

    #[error("malformed backup: {0}")]
    MalformedBackup(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode project: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stored project {id} is corrupt: {source}")]
    Corrupt {
        id: ProjectId,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
