//! # Configuration
//!
//! Timing and defaults for an editing session.

use std::time::Duration;

use plan_canvas::CanvasConfig;
use programplan_export::ExportOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period after the last change before an auto-save. Default: 2000.
    pub debounce_ms: u64,
    /// Periodic save independent of the debounce. Default: 30.
    pub autosave_interval_secs: u64,
    /// Name given to projects created without one.
    pub default_project_name: String,
    pub canvas: CanvasConfig,
    pub export: ExportOptions,
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn autosave_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 2000,
            autosave_interval_secs: 30,
            default_project_name: "Untitled Project".to_string(),
            canvas: CanvasConfig::default(),
            export: ExportOptions::default(),
        }
    }
}
