//! Background persistence for an open session.
//!
//! Every edit pings the worker. The worker writes once the edits stop for
//! the debounce window, and also on a fixed period while the session is
//! open. All writes go through one gate, so two saves of the same project
//! never overlap.

use std::sync::Arc;
use std::time::Duration;

use plan_canvas::{GraphState, HistoryManager, Project};
use plan_canvas::clipboard::ClipboardData;
use programplan_store::{ProjectRepository, StoreError};
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::status::SaveStatus;

/// Working state of the open project.
pub(crate) struct Document {
    /// Metadata of the stored record. Its `nodes`/`edges` are stale; `graph` is live.
    pub project: Project,
    pub graph: GraphState,
    pub history: HistoryManager,
    pub clipboard: Option<ClipboardData>,
    pub revision: u64,
    pub saved_revision: u64,
    pub last_saved_at: Option<i64>,
}

impl Document {
    pub fn new(project: Project, history_capacity: usize) -> Self {
        let graph = project.graph();
        let mut history = HistoryManager::new(history_capacity);
        history.reset(&graph);
        Self {
            project,
            graph,
            history,
            clipboard: None,
            revision: 0,
            saved_revision: 0,
            last_saved_at: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// The record as it should be written now.
    pub fn record(&self) -> Project {
        let mut record = self.project.clone();
        record.set_graph(self.graph.clone());
        record.touch();
        record
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SaveTrigger {
    Debounce,
    Interval,
    Manual,
    Teardown,
}

/// What a call to [`Shared::save`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Written,
    /// Nothing changed since the last write.
    Clean,
    /// Another save held the gate.
    Skipped,
}

pub(crate) struct Shared {
    pub repo: Arc<dyn ProjectRepository>,
    pub doc: Mutex<Document>,
    save_gate: Mutex<()>,
    pub status: watch::Sender<SaveStatus>,
}

impl Shared {
    pub fn new(repo: Arc<dyn ProjectRepository>, doc: Document) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            repo,
            doc: Mutex::new(doc),
            save_gate: Mutex::new(()),
            status,
        }
    }

    /// Writes the current record.
    ///
    /// Timer-driven saves are skipped while another save holds the gate;
    /// manual and teardown saves wait for it. Only a manual save writes a
    /// project without pending changes.
    pub async fn save(&self, trigger: SaveTrigger) -> Result<SaveOutcome, StoreError> {
        let _gate = match trigger {
            SaveTrigger::Manual | SaveTrigger::Teardown => self.save_gate.lock().await,
            SaveTrigger::Debounce | SaveTrigger::Interval => match self.save_gate.try_lock() {
                Ok(gate) => gate,
                Err(_) => {
                    tracing::debug!(?trigger, "Save already in flight, skipping");
                    return Ok(SaveOutcome::Skipped);
                }
            },
        };

        let (record, revision) = {
            let doc = self.doc.lock().await;
            if !doc.is_dirty() && trigger != SaveTrigger::Manual {
                return Ok(SaveOutcome::Clean);
            }
            (doc.record(), doc.revision)
        };

        self.status.send_replace(SaveStatus::Saving);
        match self.repo.put(&record).await {
            Ok(()) => {
                {
                    let mut doc = self.doc.lock().await;
                    doc.project.updated_at = record.updated_at;
                    doc.saved_revision = doc.saved_revision.max(revision);
                    doc.last_saved_at = Some(record.updated_at);
                }
                self.status.send_replace(SaveStatus::Saved {
                    at: record.updated_at,
                });
                tracing::info!(
                    project_id = %record.id,
                    nodes = record.nodes.len(),
                    edges = record.edges.len(),
                    ?trigger,
                    "Project saved"
                );
                Ok(SaveOutcome::Written)
            }
            Err(e) => {
                tracing::error!(project_id = %record.id, ?trigger, error = %e, "Project save failed");
                self.status.send_replace(SaveStatus::Unsaved {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

/// Runs until the session closes it.
///
/// An explicit shutdown leaves the final save to the caller. If the session
/// is dropped instead, the worker performs that save itself.
pub(crate) async fn run(
    shared: Arc<Shared>,
    debounce: Duration,
    period: Duration,
    mut changes: mpsc::UnboundedReceiver<()>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pending: Option<Instant> = None;

    let closed_explicitly = loop {
        tokio::select! {
            res = &mut shutdown => break res.is_ok(),
            change = changes.recv() => match change {
                Some(()) => pending = Some(Instant::now() + debounce),
                None => break false,
            },
            _ = time::sleep_until(pending.unwrap_or_else(Instant::now)), if pending.is_some() => {
                pending = None;
                // Retry after a failure, or once the save holding the gate is done.
                match shared.save(SaveTrigger::Debounce).await {
                    Ok(SaveOutcome::Written | SaveOutcome::Clean) => {}
                    Ok(SaveOutcome::Skipped) | Err(_) => {
                        pending = Some(Instant::now() + debounce);
                    }
                }
            }
            _ = interval.tick() => {
                // Failures are already logged and reported through the status.
                let _ = shared.save(SaveTrigger::Interval).await;
            }
        }
    };

    if !closed_explicitly {
        let _ = shared.save(SaveTrigger::Teardown).await;
    }
    tracing::debug!("Auto-save worker stopped");
}
