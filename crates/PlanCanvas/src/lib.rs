//! # PlanCanvas
//!
//! `plan_canvas` is the headless model behind the program-plan diagram editor.
//! It owns the node/edge graph and the operations that edit it, while the
//! host application supplies rendering and input.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: Nodes, edges and the persisted project record.
//! - **History (`src/history.rs`)**: Bounded linear undo/redo of graph snapshots.
//! - **Clipboard (`src/clipboard.rs`)**: Copy/paste with id rewriting.
//! - **Persistence (`src/persistence.rs`)**: The JSON snapshot format and import validation.
//! - **Palette (`src/palette.rs`)**: Toolbox items and localized display names.

pub mod clipboard;
pub mod config;
pub mod history;
pub mod model;
pub mod palette;
pub mod persistence;
pub mod templates;

// Re-exports for convenience
pub use config::CanvasConfig;
pub use history::HistoryManager;
pub use model::{Edge, EdgeId, GraphState, Node, NodeId, Position, Project, ProjectId, ProjectSummary};
pub use palette::{Locale, UiType};
pub use persistence::{GraphSnapshot, ImportError, ImportPolicy};
