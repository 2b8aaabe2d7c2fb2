//! Board configuration.

use crate::alignment::DEFAULT_ALIGNMENT_THRESHOLD;
use crate::error::ConfigResult;
use crate::marker::MarkerStyle;
use crate::popup::PopupTrigger;
use serde::{Deserialize, Serialize};

/// Smallest accepted resize step.
pub const MIN_RESIZE_STEP: f64 = 0.1;
/// Largest accepted resize step.
pub const MAX_RESIZE_STEP: f64 = 5.0;

/// Construction options for a marker board.
///
/// Every field has a default, so a JSON config may name any subset.
/// Out-of-range values are clamped by [`BoardConfig::sanitized`], never
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Container width in screen pixels.
    pub width: f64,
    /// Container height in screen pixels.
    pub height: f64,
    pub default_marker_style: MarkerStyle,
    /// Allow adding, moving, resizing and nudging markers.
    pub editable: bool,
    /// Allow Delete/Backspace to remove selected markers.
    pub deletable: bool,
    pub keep_aspect_ratio: bool,
    /// Resize results are rounded to a multiple of this, in natural pixels.
    pub resize_step: f64,
    pub show_alignment_guides: bool,
    /// Screen pixels.
    pub alignment_threshold: f64,
    pub alignment_line_color: String,
    pub enable_popup: bool,
    pub popup_trigger: PopupTrigger,
    pub min_marker_width: f64,
    pub min_marker_height: f64,
    pub id_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            default_marker_style: MarkerStyle::default(),
            editable: true,
            deletable: true,
            keep_aspect_ratio: false,
            resize_step: 1.0,
            show_alignment_guides: true,
            alignment_threshold: DEFAULT_ALIGNMENT_THRESHOLD,
            alignment_line_color: "#ff4d4f".to_string(),
            enable_popup: false,
            popup_trigger: PopupTrigger::default(),
            min_marker_width: 10.0,
            min_marker_height: 10.0,
            id_prefix: "marker".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a config from JSON and sanitize it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp out-of-range values into their accepted ranges.
    pub fn sanitized(mut self) -> Self {
        self.resize_step = clamp_resize_step(self.resize_step);
        self.min_marker_width = non_negative(self.min_marker_width);
        self.min_marker_height = non_negative(self.min_marker_height);
        self.width = non_negative(self.width);
        self.height = non_negative(self.height);
        if self.id_prefix.is_empty() {
            self.id_prefix = "marker".to_string();
        }
        self
    }
}

/// Clamp a resize step into `[MIN_RESIZE_STEP, MAX_RESIZE_STEP]`.
pub fn clamp_resize_step(step: f64) -> f64 {
    if step.is_nan() {
        return 1.0;
    }
    step.clamp(MIN_RESIZE_STEP, MAX_RESIZE_STEP)
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}
