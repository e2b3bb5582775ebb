use plan_canvas::{ImportError, ProjectId};
use programplan_export::ExportError;
use programplan_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("project {0} not found")]
    NotFound(ProjectId),

    #[error(transparent)]
    InvalidFormat(#[from] ImportError),

    #[error("persistence failure: {0}")]
    Persistence(#[source] StoreError),

    #[error("export failure: {0}")]
    Export(#[from] ExportError),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SessionError::NotFound(id),
            other => SessionError::Persistence(other),
        }
    }
}
