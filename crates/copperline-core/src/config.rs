//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Default grid interval in millimetres (100 mil).
pub const DEFAULT_GRID_INTERVAL: f64 = 2.54;
/// Default pick tolerance around items in millimetres.
pub const DEFAULT_HIT_TOLERANCE: f64 = 0.3;
/// Default grab radius of outline vertex handles in millimetres.
pub const DEFAULT_VERTEX_HANDLE_RADIUS: f64 = 0.5;
/// Default number of undo steps to keep.
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 100;

/// Tunable parameters of the board editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Grid interval used for snapping.
    #[serde(default = "default_grid_interval")]
    pub grid_interval: f64,
    /// Distance within which a click still hits an item.
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f64,
    /// Distance within which a click grabs an outline vertex.
    #[serde(default = "default_vertex_handle_radius")]
    pub vertex_handle_radius: f64,
    /// Maximum number of entries on the undo stack.
    #[serde(default = "default_max_undo_depth")]
    pub max_undo_depth: usize,
}

fn default_grid_interval() -> f64 {
    DEFAULT_GRID_INTERVAL
}

fn default_hit_tolerance() -> f64 {
    DEFAULT_HIT_TOLERANCE
}

fn default_vertex_handle_radius() -> f64 {
    DEFAULT_VERTEX_HANDLE_RADIUS
}

fn default_max_undo_depth() -> usize {
    DEFAULT_MAX_UNDO_DEPTH
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_interval: DEFAULT_GRID_INTERVAL,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            vertex_handle_radius: DEFAULT_VERTEX_HANDLE_RADIUS,
            max_undo_depth: DEFAULT_MAX_UNDO_DEPTH,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Same configuration with a different grid interval.
    pub fn with_grid_interval(mut self, grid_interval: f64) -> Self {
        self.grid_interval = grid_interval;
        self
    }
}
