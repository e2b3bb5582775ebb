//! Durable storage of program-plan projects.
//!
//! [`ProjectRepository`] is the seam the editor session talks to.
//! [`ProjectStore`] backs it with SQLite and [`MemoryStore`] keeps everything
//! in process for hosts that do not persist.

pub mod database;
pub mod error;
pub mod memory;

use async_trait::async_trait;
use plan_canvas::{Project, ProjectId, ProjectSummary};

pub use database::ProjectStore;
pub use error::StoreError;
pub use memory::MemoryStore;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Lists every project, most recently updated first.
    async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, StoreError>;

    /// Loads a full project or fails with [`StoreError::NotFound`].
    async fn get(&self, id: &ProjectId) -> Result<Project, StoreError>;

    /// Inserts or wholesale replaces the project with the same id.
    async fn put(&self, project: &Project) -> Result<(), StoreError>;

    /// Removes a project. Deleting an unknown id succeeds.
    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError>;

    /// Serializes every stored project as a JSON array.
    async fn export_all(&self) -> Result<String, StoreError>;

    /// Upserts every project in a backup produced by `export_all`.
    ///
    /// The payload is fully validated before the first write, so a corrupt
    /// backup leaves existing data untouched. Returns the number of records.
    async fn import_all(&self, payload: &str) -> Result<usize, StoreError>;
}

/// Parses a backup payload into project records.
pub fn parse_backup(payload: &str) -> Result<Vec<Project>, StoreError> {
    serde_json::from_str::<Vec<Project>>(payload)
        .map_err(|e| StoreError::MalformedBackup(e.to_string()))
}

/// Serializes projects in the backup layout.
pub fn encode_backup(projects: &[Project]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(projects)?)
}
