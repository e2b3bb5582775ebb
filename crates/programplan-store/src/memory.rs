use async_trait::async_trait;
use plan_canvas::{Project, ProjectId, ProjectSummary};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{ProjectRepository, StoreError, encode_backup, parse_backup};

/// In-process repository. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(projects: &HashMap<ProjectId, Project>) -> Vec<&Project> {
        let mut list: Vec<&Project> = projects.values().collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        list
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let projects = self.projects.read().await;
        Ok(Self::sorted(&projects).into_iter().map(Project::summary).collect())
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.projects
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn put(&self, project: &Project) -> Result<(), StoreError> {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        self.projects.write().await.remove(id);
        Ok(())
    }

    async fn export_all(&self) -> Result<String, StoreError> {
        let projects = self.projects.read().await;
        let list: Vec<Project> = Self::sorted(&projects).into_iter().cloned().collect();
        encode_backup(&list)
    }

    async fn import_all(&self, payload: &str) -> Result<usize, StoreError> {
        let incoming = parse_backup(payload)?;
        let count = incoming.len();
        let mut projects = self.projects.write().await;
        for project in incoming {
            projects.insert(project.id.clone(), project);
        }
        Ok(count)
    }
}
