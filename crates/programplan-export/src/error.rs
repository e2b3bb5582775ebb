use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an image export is already running")]
    Busy,

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
