use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use plan_canvas::{Project, ProjectId, ProjectSummary};
use programplan_store::{MemoryStore, ProjectRepository, StoreError};

/// In-memory repository that counts successful writes and can be told to fail or
/// slow down.
#[derive(Default)]
pub struct CountingRepo {
    inner: MemoryStore,
    puts: AtomicUsize,
    failing: AtomicBool,
    put_delay_ms: AtomicU64,
}

impl CountingRepo {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_put_delay(&self, delay: Duration) {
        self.put_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProjectRepository for CountingRepo {
    async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        self.inner.list_summaries().await
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.inner.get(id).await
    }

    async fn put(&self, project: &Project) -> Result<(), StoreError> {
        let delay = self.put_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::MalformedBackup("disk full".into()));
        }
        self.inner.put(project).await?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn export_all(&self) -> Result<String, StoreError> {
        self.inner.export_all().await
    }

    async fn import_all(&self, payload: &str) -> Result<usize, StoreError> {
        self.inner.import_all(payload).await
    }
}
