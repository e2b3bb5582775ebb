use async_trait::async_trait;
use plan_canvas::{Project, ProjectId, ProjectSummary};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

use crate::{ProjectRepository, StoreError, encode_backup, parse_backup};

/// SQLite persistence for projects.
///
/// One row per project. Nodes and edges are stored as JSON text so the
/// record shape can evolve without migrations; `updated_at` is indexed for
/// the dashboard listing.
#[derive(Clone, Debug)]
pub struct ProjectStore {
    pool: Pool<Sqlite>,
}

impl ProjectStore {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        let connection_options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Each connection to `:memory:` is its own database, so pin the pool
        // to a single connection that is never recycled.
        let pool_options = if db_url.contains(":memory:") || db_url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connection_options).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                thumbnail TEXT,
                version INTEGER NOT NULL DEFAULT 1,
                nodes_json TEXT NOT NULL,
                edges_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_projects_by_updated ON projects (updated_at);
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::debug!(db_url, "Project store ready");
        Ok(Self { pool })
    }

    /// A private, non-durable store.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::new("sqlite::memory:").await
    }

    async fn upsert<'e, E>(executor: E, project: &Project) -> Result<(), StoreError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let nodes_json = serde_json::to_string(&project.nodes)?;
        let edges_json = serde_json::to_string(&project.edges)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, created_at, updated_at, thumbnail, version, nodes_json, edges_json)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                thumbnail = excluded.thumbnail,
                version = excluded.version,
                nodes_json = excluded.nodes_json,
                edges_json = excluded.edges_json
            "#,
        )
        .bind(project.id.as_str())
        .bind(&project.name)
        .bind(project.created_at)
        .bind(project.updated_at)
        .bind(project.thumbnail.as_deref())
        .bind(i64::from(project.version))
        .bind(nodes_json)
        .bind(edges_json)
        .execute(executor)
        .await?;
        Ok(())
    }

    fn decode_project(row: &SqliteRow) -> Result<Project, StoreError> {
        let id = ProjectId::from(row.try_get::<String, _>("id")?);
        let nodes_json: String = row.try_get("nodes_json")?;
        let edges_json: String = row.try_get("edges_json")?;
        let version: i64 = row.try_get("version")?;

        let nodes = serde_json::from_str(&nodes_json).map_err(|source| StoreError::Corrupt {
            id: id.clone(),
            source,
        })?;
        let edges = serde_json::from_str(&edges_json).map_err(|source| StoreError::Corrupt {
            id: id.clone(),
            source,
        })?;

        Ok(Project {
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            thumbnail: row.try_get("thumbnail")?,
            nodes,
            edges,
            version: u32::try_from(version).unwrap_or(plan_canvas::model::PROJECT_SCHEMA_VERSION),
            id,
        })
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at, thumbnail FROM projects ORDER BY updated_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            summaries.push(ProjectSummary {
                id: ProjectId::from(row.try_get::<String, _>("id")?),
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
                thumbnail: row.try_get("thumbnail")?,
            });
        }
        Ok(summaries)
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, StoreError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::decode_project(&row),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    async fn put(&self, project: &Project) -> Result<(), StoreError> {
        Self::upsert(&self.pool, project).await?;
        tracing::debug!(project_id = %project.id, nodes = project.nodes.len(), edges = project.edges.len(), "Project stored");
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn export_all(&self) -> Result<String, StoreError> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY updated_at DESC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            projects.push(Self::decode_project(row)?);
        }
        encode_backup(&projects)
    }

    async fn import_all(&self, payload: &str) -> Result<usize, StoreError> {
        let projects = parse_backup(payload)?;

        let mut tx = self.pool.begin().await?;
        for project in &projects {
            Self::upsert(&mut *tx, project).await?;
        }
        tx.commit().await?;

        tracing::info!(count = projects.len(), "Imported project backup");
        Ok(projects.len())
    }
}
