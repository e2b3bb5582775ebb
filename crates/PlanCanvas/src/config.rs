//! # Configuration
//!
//! Tunables for the editing model.

use serde::{Deserialize, Serialize};

/// Configuration parameters for the canvas model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Maximum number of undo snapshots kept. Default: 50.
    pub history_capacity: usize,
    /// Distance pasted copies are shifted on both axes. Default: 50.0.
    pub paste_offset: f64,
    /// Stacking order given to dropped container nodes. Default: -10.
    pub container_z_index: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            paste_offset: 50.0,
            container_z_index: -10,
        }
    }
}
