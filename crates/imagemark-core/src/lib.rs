//! imagemark Core Library
//!
//! Platform-agnostic marker positioning, alignment and interaction logic
//! for placing markers on a reference image.

pub mod alignment;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod marker;
pub mod popup;
pub mod selection;
pub mod store;

pub use alignment::{
    AlignmentGuide, AlignmentResult, Candidate, GuideKind, calculate_alignment_guides_with_snap,
    calculate_resize_guides, DEFAULT_ALIGNMENT_THRESHOLD,
};
pub use config::BoardConfig;
pub use controller::{GestureState, InteractionEvent, MarkerBoard, round_to_step};
pub use error::{ConfigError, ConfigResult, ImageLoadError};
pub use geometry::{
    ImageFrame, MarkerBounds, clamp_position, get_marker_bounds, percent_to_pixel, pixel_to_percent,
};
pub use handles::ResizeHandle;
pub use input::{Key, Modifiers, PointerInput};
pub use marker::{Marker, MarkerId, MarkerPosition, MarkerStyle, MarkerUpdate, NewMarker, StylePatch};
pub use popup::{ActivePopup, PopupTrigger};
pub use selection::SelectionSet;
pub use store::{ChangeEvent, ChangeKind, MarkerStore};
