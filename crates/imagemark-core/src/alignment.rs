//! Alignment guides and snapping between markers.
//!
//! While a marker is dragged, its edges and center are compared against
//! every other marker. The nearest match per axis within the threshold
//! becomes a guide line, and for drags also a snap target for the center.

use crate::geometry::{ImageFrame, MarkerBounds};
use crate::handles::{HorizontalEdge, ResizeHandle, VerticalEdge};
use crate::marker::{Marker, MarkerStyle};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Default distance in screen pixels under which two lines align.
pub const DEFAULT_ALIGNMENT_THRESHOLD: f64 = 5.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideKind {
    /// Line of constant y; aligns the y axis.
    Horizontal,
    /// Line of constant x; aligns the x axis.
    Vertical,
}

/// A guide line to paint, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    #[serde(rename = "type")]
    pub kind: GuideKind,
    pub position: f64,
}

/// One matching comparison between the active marker and another one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub kind: GuideKind,
    /// The other marker's line.
    pub position: f64,
    /// Gap between the compared lines.
    pub distance: f64,
    /// Active marker center that puts the compared line on `position`.
    pub snap_position: f64,
}

/// Outcome of an alignment search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentResult {
    /// At most one vertical and one horizontal guide.
    pub guides: Vec<AlignmentGuide>,
    /// New center x in screen pixels.
    pub snap_x: Option<f64>,
    /// New center y in screen pixels.
    pub snap_y: Option<f64>,
}

impl AlignmentResult {
    fn from_best(vertical: Option<Candidate>, horizontal: Option<Candidate>) -> Self {
        let mut guides = Vec::with_capacity(2);
        for candidate in [vertical, horizontal].into_iter().flatten() {
            guides.push(AlignmentGuide {
                kind: candidate.kind,
                position: candidate.position,
            });
        }
        Self {
            guides,
            snap_x: vertical.map(|c| c.snap_position),
            snap_y: horizontal.map(|c| c.snap_position),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn vertical(&self) -> Option<&AlignmentGuide> {
        self.guides.iter().find(|g| g.kind == GuideKind::Vertical)
    }

    pub fn horizontal(&self) -> Option<&AlignmentGuide> {
        self.guides.iter().find(|g| g.kind == GuideKind::Horizontal)
    }
}

/// Keep the closer candidate; the earlier one wins ties.
fn offer(best: &mut Option<Candidate>, candidate: Option<Candidate>) {
    let Some(candidate) = candidate else { return };
    match best {
        Some(current) if candidate.distance >= current.distance => {}
        _ => *best = Some(candidate),
    }
}

/// Compare one line of the active marker against a line of another.
fn compare(kind: GuideKind, active: f64, target: f64, snap_position: f64, threshold: f64) -> Option<Candidate> {
    let distance = (active - target).abs();
    (distance < threshold).then_some(Candidate {
        kind,
        position: target,
        distance,
        snap_position,
    })
}

fn usable_threshold(threshold: f64) -> bool {
    threshold > 0.0
}

/// Find guides and snap targets for a marker being dragged.
///
/// `dragged` carries the candidate position for this tick. Markers in
/// `others` sharing its id are ignored.
pub fn calculate_alignment_guides_with_snap<'a, T: 'a>(
    dragged: &Marker<T>,
    others: impl IntoIterator<Item = &'a Marker<T>>,
    frame: &ImageFrame,
    default_style: &MarkerStyle,
    threshold: f64,
) -> AlignmentResult {
    if !usable_threshold(threshold) {
        return AlignmentResult::default();
    }

    let active = frame.marker_bounds(dragged, default_style);
    let half_w = active.width / 2.0;
    let half_h = active.height / 2.0;

    let mut vertical: Option<Candidate> = None;
    let mut horizontal: Option<Candidate> = None;

    for other in others {
        if other.id == dragged.id {
            continue;
        }
        let target = frame.marker_bounds(other, default_style);

        let x_pairs = [
            (active.center_x(), target.center_x(), target.center_x()),
            (active.left, target.left, target.left + half_w),
            (active.left, target.right, target.right + half_w),
            (active.right, target.left, target.left - half_w),
            (active.right, target.right, target.right - half_w),
        ];
        for (line, against, snap) in x_pairs {
            offer(&mut vertical, compare(GuideKind::Vertical, line, against, snap, threshold));
        }

        let y_pairs = [
            (active.center_y(), target.center_y(), target.center_y()),
            (active.top, target.top, target.top + half_h),
            (active.top, target.bottom, target.bottom + half_h),
            (active.bottom, target.top, target.top - half_h),
            (active.bottom, target.bottom, target.bottom - half_h),
        ];
        for (line, against, snap) in y_pairs {
            offer(&mut horizontal, compare(GuideKind::Horizontal, line, against, snap, threshold));
        }
    }

    AlignmentResult::from_best(vertical, horizontal)
}

/// Find guides for the edges a resize handle is moving.
///
/// `rect` is the live screen rectangle of the marker under the transformer.
/// Only the handle's edges are compared, never centers, and nothing snaps.
pub fn calculate_resize_guides<'a, T: 'a>(
    rect: Rect,
    handle: ResizeHandle,
    resized_id: &str,
    others: impl IntoIterator<Item = &'a Marker<T>>,
    frame: &ImageFrame,
    default_style: &MarkerStyle,
    threshold: f64,
) -> Vec<AlignmentGuide> {
    if !usable_threshold(threshold) {
        return Vec::new();
    }

    let active = MarkerBounds::from_rect(rect);
    let x_line = handle.x_edge().map(|edge| match edge {
        HorizontalEdge::Left => active.left,
        HorizontalEdge::Right => active.right,
    });
    let y_line = handle.y_edge().map(|edge| match edge {
        VerticalEdge::Top => active.top,
        VerticalEdge::Bottom => active.bottom,
    });

    let mut vertical: Option<Candidate> = None;
    let mut horizontal: Option<Candidate> = None;

    for other in others {
        if other.id == resized_id {
            continue;
        }
        let target = frame.marker_bounds(other, default_style);
        if let Some(line) = x_line {
            for against in [target.left, target.right] {
                offer(&mut vertical, compare(GuideKind::Vertical, line, against, against, threshold));
            }
        }
        if let Some(line) = y_line {
            for against in [target.top, target.bottom] {
                offer(&mut horizontal, compare(GuideKind::Horizontal, line, against, against, threshold));
            }
        }
    }

    AlignmentResult::from_best(vertical, horizontal).guides
}
