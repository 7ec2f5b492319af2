//! Editor tunables and UI-transient canvas view settings.

use serde::{Deserialize, Serialize};

/// Tunables for the interaction controllers and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. `None` keeps every step.
    pub history_depth: Option<usize>,
    /// Timeline snapping grid (ms).
    pub timeline_grid_ms: f64,
    /// Shortest animation a gesture or panel edit may produce (ms).
    pub min_animation_ms: f64,
    /// `play()` restarts from 0 when the playhead is this close to the end (ms).
    pub restart_threshold_ms: f64,
    /// Distance (canvas px) within which a dragged layer snaps to a guide.
    pub guide_snap_threshold: f64,
    /// Width of the grab zone at each end of a timeline block (px).
    pub resize_handle_px: f64,
    /// Canvas settings the editor starts with.
    pub canvas: CanvasSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: None,
            timeline_grid_ms: 100.0,
            min_animation_ms: slider_core::MIN_ANIMATION_MS,
            restart_threshold_ms: 100.0,
            guide_snap_threshold: 5.0,
            resize_handle_px: 8.0,
            canvas: CanvasSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config document. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Canvas view toggles. Never part of undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    pub show_grid: bool,
    pub show_rulers: bool,
    pub snap_to_grid: bool,
    /// Grid pitch (canvas px).
    pub grid_size: f64,
    /// Draws alignment guides while dragging. Guide snapping applies either way.
    pub show_guides: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_rulers: true,
            snap_to_grid: true,
            grid_size: 20.0,
            show_guides: true,
        }
    }
}

impl CanvasSettings {
    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_rulers(&mut self) {
        self.show_rulers = !self.show_rulers;
    }

    pub fn toggle_guides(&mut self) {
        self.show_guides = !self.show_guides;
    }

    pub fn toggle_snap(&mut self) {
        self.snap_to_grid = !self.snap_to_grid;
    }

    /// Set the grid pitch. Non-positive sizes are ignored.
    pub fn set_grid_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.grid_size = size;
        }
    }
}

// ─── Zoom ────────────────────────────────────────────────────────────────

/// Canvas zoom factor, kept within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: f64 = 0.25;
    pub const MAX: f64 = 2.0;
    pub const STEP: f64 = 0.25;

    pub fn new(factor: f64) -> Self {
        if factor.is_finite() {
            Zoom(factor.clamp(Self::MIN, Self::MAX))
        } else {
            Zoom::default()
        }
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        *self = Zoom::new(self.0 + Self::STEP);
    }

    pub fn zoom_out(&mut self) {
        *self = Zoom::new(self.0 - Self::STEP);
    }

    pub fn reset(&mut self) {
        *self = Zoom::default();
    }

    /// Zoom as a whole percentage, e.g. `125`.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}
