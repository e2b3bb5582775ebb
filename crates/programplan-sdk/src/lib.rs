//! # ProgramPlan SDK
//!
//! The editing session a host application drives. [`EditorSession`] ties
//! the canvas model, a [`ProjectRepository`](programplan_store::ProjectRepository)
//! and the exporters together:
//!
//! - edits are saved in the background after a quiet period and on a timer,
//! - undo/redo and copy/paste follow the canvas history and clipboard,
//! - import replaces the graph only after the file validates.

mod autosave;
pub mod config;
pub mod error;
pub mod session;
pub mod status;

pub use config::SessionConfig;
pub use error::SessionError;
pub use session::EditorSession;
pub use status::SaveStatus;
