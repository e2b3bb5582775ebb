use std::sync::Arc;

use plan_canvas::clipboard::ClipboardData;
use plan_canvas::model::{ArrowType, EdgeId, NodeDataPatch};
use plan_canvas::palette::{self, StylePreset};
use plan_canvas::persistence::{ImportPolicy, parse_graph};
use plan_canvas::{GraphState, Node, NodeId, Position, Project, ProjectId, templates};
use programplan_export::{
    ImageDocument, ImageExporter, JsonDocument, MarkdownDocument, MarkdownExporter, export_json,
};
use programplan_store::ProjectRepository;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::autosave::{self, Document, SaveTrigger, Shared};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::status::SaveStatus;

/// An open project with auto-save, undo/redo and clipboard.
///
/// Must be created inside a tokio runtime; the auto-save worker runs as a
/// spawned task until [`EditorSession::close`] or drop.
pub struct EditorSession {
    shared: Arc<Shared>,
    config: SessionConfig,
    markdown: MarkdownExporter,
    changes: mpsc::UnboundedSender<()>,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl EditorSession {
    /// Opens a stored project.
    pub async fn open(
        repo: Arc<dyn ProjectRepository>,
        id: &ProjectId,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let project = repo.get(id).await?;
        tracing::info!(project_id = %project.id, name = %project.name, "Opened project");
        Ok(Self::start(repo, project, config))
    }

    /// Creates an empty project, stores it right away and opens it.
    pub async fn create(
        repo: Arc<dyn ProjectRepository>,
        name: &str,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let name = match name.trim() {
            "" => config.default_project_name.clone(),
            name => name.to_string(),
        };
        let project = Project::new(name);
        repo.put(&project).await?;
        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(Self::start(repo, project, config))
    }

    /// Opens the most recently updated project, creating one if the store is empty.
    pub async fn open_latest(
        repo: Arc<dyn ProjectRepository>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let latest = repo.list_summaries().await?.into_iter().next();
        match latest {
            Some(summary) => Self::open(repo, &summary.id, config).await,
            None => Self::create(repo, "", config).await,
        }
    }

    fn start(repo: Arc<dyn ProjectRepository>, project: Project, config: SessionConfig) -> Self {
        let doc = Document::new(project, config.canvas.history_capacity);
        let shared = Arc::new(Shared::new(repo, doc));
        let (changes, changes_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();

        let worker = tokio::spawn(autosave::run(
            shared.clone(),
            config.debounce(),
            config.autosave_interval(),
            changes_rx,
            shutdown_rx,
        ));

        Self {
            shared,
            markdown: MarkdownExporter::new(config.export.clone()),
            config,
            changes,
            shutdown: Some(shutdown),
            worker: Some(worker),
        }
    }

    fn changed(&self) {
        // The worker only stops once the session is closing.
        let _ = self.changes.send(());
    }

    /// Applies `f` to the working graph. `None` means nothing changed.
    async fn edit<R>(
        &self,
        commit: bool,
        f: impl FnOnce(&mut GraphState) -> Option<R>,
    ) -> Option<R> {
        let mut guard = self.shared.doc.lock().await;
        let doc = &mut *guard;
        let out = f(&mut doc.graph)?;
        doc.revision += 1;
        if commit {
            doc.history.commit(&doc.graph);
        }
        drop(guard);
        self.changed();
        Some(out)
    }

    // --- Accessors ---

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub async fn project_id(&self) -> ProjectId {
        self.shared.doc.lock().await.project.id.clone()
    }

    pub async fn name(&self) -> String {
        self.shared.doc.lock().await.project.name.clone()
    }

    /// Copy of the working graph.
    pub async fn graph(&self) -> GraphState {
        self.shared.doc.lock().await.graph.clone()
    }

    /// The project record with the working graph merged in.
    pub async fn project(&self) -> Project {
        let doc = self.shared.doc.lock().await;
        let mut project = doc.project.clone();
        project.set_graph(doc.graph.clone());
        project
    }

    pub async fn is_dirty(&self) -> bool {
        self.shared.doc.lock().await.is_dirty()
    }

    pub async fn can_undo(&self) -> bool {
        self.shared.doc.lock().await.history.can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.shared.doc.lock().await.history.can_redo()
    }

    pub fn status(&self) -> SaveStatus {
        self.shared.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    /// `updatedAt` of the last write made by this session.
    pub async fn last_saved_at(&self) -> Option<i64> {
        self.shared.doc.lock().await.last_saved_at
    }

    // --- Editing ---

    /// Mutates the graph without a history snapshot, e.g. while dragging.
    /// Call [`EditorSession::commit`] when the gesture ends.
    pub async fn update<R>(&self, f: impl FnOnce(&mut GraphState) -> R) -> R {
        let mut doc = self.shared.doc.lock().await;
        let out = f(&mut doc.graph);
        doc.revision += 1;
        drop(doc);
        self.changed();
        out
    }

    /// Replaces the working graph without a history snapshot.
    pub async fn set_graph(&self, graph: GraphState) {
        self.edit(false, |g| {
            *g = graph;
            Some(())
        })
        .await;
    }

    /// Records the current working graph as an undo step.
    pub async fn commit(&self) {
        let mut guard = self.shared.doc.lock().await;
        let doc = &mut *guard;
        doc.history.commit(&doc.graph);
    }

    /// Drops a palette item onto the canvas.
    pub async fn add_node(&self, toolbox_id: &str, position: Position) -> Option<NodeId> {
        let item = palette::find(toolbox_id)?;
        let z_index = self.config.canvas.container_z_index;
        self.edit(true, |graph| {
            let node = Node::from_palette(NodeId::generate(), item, position, z_index);
            let id = node.id.clone();
            graph.nodes.push(node);
            Some(id)
        })
        .await
    }

    /// Merges `patch` into the node's data.
    pub async fn update_node(&self, id: &NodeId, patch: NodeDataPatch) -> bool {
        self.edit(true, |graph| {
            patch.apply(&mut graph.node_mut(id)?.data);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn apply_style_preset(&self, id: &NodeId, preset: &str) -> bool {
        let Some(preset) = StylePreset::find(preset) else {
            return false;
        };
        self.edit(true, |graph| {
            preset.apply(graph.node_mut(id)?);
            Some(())
        })
        .await
        .is_some()
    }

    /// Removes a node together with its edges.
    pub async fn delete_node(&self, id: &NodeId) -> bool {
        self.edit(true, |graph| graph.remove_node(id).map(drop))
            .await
            .is_some()
    }

    pub async fn connect(&self, source: &NodeId, target: &NodeId) -> Option<EdgeId> {
        self.edit(true, |graph| graph.connect(source, target)).await
    }

    pub async fn set_arrow_type(&self, id: &EdgeId, arrow: ArrowType) -> bool {
        self.edit(true, |graph| {
            graph.edge_mut(id)?.set_arrow_type(arrow);
            Some(())
        })
        .await
        .is_some()
    }

    pub async fn delete_edge(&self, id: &EdgeId) -> bool {
        self.edit(true, |graph| graph.remove_edge(id).map(drop))
            .await
            .is_some()
    }

    pub async fn bring_to_front(&self, id: &NodeId) -> bool {
        self.edit(true, |graph| graph.bring_to_front(id).then_some(()))
            .await
            .is_some()
    }

    pub async fn send_to_back(&self, id: &NodeId) -> bool {
        self.edit(true, |graph| graph.send_to_back(id).then_some(()))
            .await
            .is_some()
    }

    /// Selects exactly the given nodes.
    pub async fn select(&self, ids: &[NodeId]) {
        self.edit(false, |graph| {
            for node in &mut graph.nodes {
                node.selected = ids.contains(&node.id);
            }
            Some(())
        })
        .await;
    }

    /// Replaces the graph with a starter template.
    pub async fn load_template(&self, key: &str) -> bool {
        let Some(template) = templates::find(key) else {
            tracing::warn!(template = key, "Unknown template");
            return false;
        };
        let graph = template.build();
        self.edit(true, |g| {
            *g = graph;
            Some(())
        })
        .await;
        tracing::info!(template = key, "Loaded template");
        true
    }

    // --- History ---

    pub async fn undo(&self) -> bool {
        let mut guard = self.shared.doc.lock().await;
        let doc = &mut *guard;
        if !doc.history.undo(&mut doc.graph) {
            return false;
        }
        doc.revision += 1;
        tracing::debug!(cursor = doc.history.cursor(), "Undo");
        drop(guard);
        self.changed();
        true
    }

    pub async fn redo(&self) -> bool {
        let mut guard = self.shared.doc.lock().await;
        let doc = &mut *guard;
        if !doc.history.redo(&mut doc.graph) {
            return false;
        }
        doc.revision += 1;
        tracing::debug!(cursor = doc.history.cursor(), "Redo");
        drop(guard);
        self.changed();
        true
    }

    // --- Clipboard ---

    /// Copies the selected nodes. Returns how many were copied.
    pub async fn copy(&self) -> usize {
        let mut doc = self.shared.doc.lock().await;
        match ClipboardData::capture(&doc.graph) {
            Some(data) => {
                let count = data.nodes.len();
                doc.clipboard = Some(data);
                tracing::debug!(nodes = count, "Copied selection");
                count
            }
            None => 0,
        }
    }

    /// Pastes the clipboard as a new selection and records an undo step.
    pub async fn paste(&self) -> Vec<NodeId> {
        let offset = self.config.canvas.paste_offset;
        let mut guard = self.shared.doc.lock().await;
        let doc = &mut *guard;
        let Some(clipboard) = doc.clipboard.as_ref().filter(|c| !c.is_empty()) else {
            return Vec::new();
        };
        let pasted = clipboard.paste_into(&mut doc.graph, offset);
        doc.history.commit(&doc.graph);
        doc.revision += 1;
        tracing::debug!(nodes = pasted.len(), "Pasted clipboard");
        drop(guard);
        self.changed();
        pasted
    }

    // --- Persistence ---

    /// Writes the project now, waiting for any save already running.
    pub async fn save_now(&self) -> Result<(), SessionError> {
        self.shared.save(SaveTrigger::Manual).await?;
        Ok(())
    }

    /// Renames the project and saves immediately.
    pub async fn rename(&self, name: &str) -> Result<(), SessionError> {
        {
            let mut doc = self.shared.doc.lock().await;
            doc.project.name = match name.trim() {
                "" => self.config.default_project_name.clone(),
                name => name.to_string(),
            };
            doc.revision += 1;
        }
        self.save_now().await
    }

    /// Replaces the working graph with an imported file and saves it.
    ///
    /// The file is validated first; on error nothing changes.
    pub async fn import_json(&self, text: &str, policy: ImportPolicy) -> Result<(), SessionError> {
        let graph = parse_graph(text, policy).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected import");
        })?;
        let (nodes, edges) = (graph.nodes.len(), graph.edges.len());
        self.edit(true, |g| {
            *g = graph;
            Some(())
        })
        .await;
        tracing::info!(nodes, edges, "Imported graph");
        self.save_now().await
    }

    // --- Export ---

    pub async fn export_json(&self) -> Result<JsonDocument, SessionError> {
        let graph = self.graph().await;
        Ok(export_json(&graph, &self.config.export.file_base)?)
    }

    /// `None` when the graph has no nodes.
    pub async fn export_markdown(&self) -> Option<MarkdownDocument> {
        let (graph, name) = {
            let doc = self.shared.doc.lock().await;
            (doc.graph.clone(), doc.project.name.clone())
        };
        self.markdown.export(&graph, &name)
    }

    pub async fn export_image(&self, exporter: &ImageExporter) -> Result<ImageDocument, SessionError> {
        Ok(exporter.export().await?)
    }

    /// Stops auto-saving and writes any pending changes.
    pub async fn close(mut self) -> Result<(), SessionError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        #[allow(clippy::collapsible_if)]
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Auto-save worker ended abnormally");
            }
        }
        self.shared.save(SaveTrigger::Teardown).await?;
        tracing::info!("Closed session");
        Ok(())
    }
}
