//! Scene scripts: initial board state plus a list of input steps.

use crate::error::ReplayResult;
use imagemark_core::{BoardConfig, Marker, MarkerId, MarkerUpdate, Modifiers, NewMarker, ResizeHandle};
use kurbo::{Point, Rect};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Natural image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// A scripted session against one board.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub config: BoardConfig,
    /// Loaded image. Absent means the image never loads.
    #[serde(default)]
    pub image: Option<ImageSize>,
    /// Load failure reported instead of an image.
    #[serde(default)]
    pub image_error: Option<String>,
    /// Initial marker snapshot.
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scene {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scene file.
    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// One scripted input. Coordinates are screen pixels relative to the
/// displayed image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Programmatic add.
    Add { marker: NewMarker },
    Update { id: MarkerId, update: MarkerUpdate },
    Delete { id: MarkerId },
    Select { ids: Vec<MarkerId> },
    ClearSelection,
    /// Pointer click; hits the topmost marker under the point, or the canvas.
    Click {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Hover { id: MarkerId },
    Leave { id: MarkerId },
    /// Drag a marker's center through each point in turn.
    Drag { id: MarkerId, path: Vec<Point> },
    /// Resize through the transformer: live rectangles, then the final scale.
    Resize {
        id: MarkerId,
        handle: ResizeHandle,
        #[serde(default)]
        rects: Vec<Rect>,
        scale_x: f64,
        scale_y: f64,
        /// Final screen centers by marker id.
        #[serde(default)]
        centers: BTreeMap<MarkerId, Point>,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ResizeContainer { width: f64, height: f64 },
    ImageLoaded { width: f64, height: f64 },
    ImageFailed { message: String },
}
