//! Interaction controller: turns adapter input into marker mutations.

use crate::alignment::{AlignmentGuide, calculate_alignment_guides_with_snap, calculate_resize_guides};
use crate::config::BoardConfig;
use crate::error::ImageLoadError;
use crate::geometry::{ImageFrame, pixel_to_percent};
use crate::handles::ResizeHandle;
use crate::input::{Key, Modifiers, PointerInput};
use crate::marker::{Marker, MarkerId, MarkerPosition, MarkerStyle, MarkerUpdate, NewMarker};
use crate::popup::{ActivePopup, PopupState, PopupTrigger};
use crate::selection::SelectionSet;
use crate::store::{ChangeEvent, MarkerStore};
use kurbo::{Point, Rect, Size};
use serde::Serialize;

/// The active gesture. Only one runs at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// A marker is being moved.
    Dragging { marker_id: MarkerId },
    /// The selection is under a resize transformer.
    Resizing { marker_id: MarkerId, handle: ResizeHandle },
    /// Host-driven editing of a marker's content.
    Editing { marker_id: MarkerId },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// The marker the gesture acts on, if any.
    pub fn marker_id(&self) -> Option<&str> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { marker_id }
            | GestureState::Resizing { marker_id, .. }
            | GestureState::Editing { marker_id } => Some(marker_id),
        }
    }
}

/// Notifications that are not marker mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent<T = serde_json::Value> {
    Click { input: PointerInput, marker: Marker<T> },
    DoubleClick { input: PointerInput, marker: Marker<T> },
    ImageError { message: String },
}

/// Round `value` to the nearest multiple of `step`.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    let rounded = (value / step).round() * step;
    // Trim float noise from fractional steps such as 0.1.
    (rounded * 1e6).round() / 1e6
}

/// A marker board: store, selection, gesture state and alignment guides.
#[derive(Debug, Clone)]
pub struct MarkerBoard<T = serde_json::Value> {
    config: BoardConfig,
    store: MarkerStore<T>,
    /// Natural image size once loaded.
    natural: Option<Size>,
    frame: Option<ImageFrame>,
    selection: SelectionSet,
    gesture: GestureState,
    guides: Vec<AlignmentGuide>,
    popup: PopupState,
    image_error_reported: bool,
    interactions: Vec<InteractionEvent<T>>,
}

impl<T: Clone> MarkerBoard<T> {
    /// Create an empty board.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_markers(config, Vec::new())
    }

    /// Create a board seeded with an initial marker snapshot.
    pub fn with_markers(config: BoardConfig, markers: Vec<Marker<T>>) -> Self {
        let config = config.sanitized();
        let store = MarkerStore::with_markers(markers, config.default_marker_style.clone(), config.id_prefix.clone());
        Self {
            config,
            store,
            natural: None,
            frame: None,
            selection: SelectionSet::new(),
            gesture: GestureState::Idle,
            guides: Vec::new(),
            popup: PopupState::new(),
            image_error_reported: false,
            interactions: Vec::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replace the configuration. The frame is refitted if the container
    /// size changed.
    pub fn set_config(&mut self, config: BoardConfig) {
        let config = config.sanitized();
        let resized = config.width != self.config.width || config.height != self.config.height;
        self.store.set_default_style(config.default_marker_style.clone());
        self.config = config;
        if !self.config.enable_popup || self.config.editable {
            self.popup.close();
        }
        if resized {
            self.refit();
        }
    }

    // --- Image lifecycle ---

    /// The image finished loading; fit it into the container.
    pub fn image_loaded(&mut self, natural: Size) {
        self.natural = Some(natural);
        match self.container_fit() {
            Some(frame) => {
                log::debug!(
                    "Image loaded: {}x{} at scale {:.3}",
                    natural.width,
                    natural.height,
                    frame.scale
                );
                self.frame = Some(frame);
                self.image_error_reported = false;
            }
            None => {
                self.natural = None;
                self.image_failed(ImageLoadError::EmptyImage);
            }
        }
    }

    /// The image failed to load. Reported once until the next success.
    pub fn image_failed(&mut self, error: ImageLoadError) {
        self.frame = None;
        self.natural = None;
        self.end_gesture();
        self.popup.close();
        if self.image_error_reported {
            return;
        }
        log::warn!("{}", error);
        self.image_error_reported = true;
        self.interactions.push(InteractionEvent::ImageError {
            message: error.to_string(),
        });
    }

    /// The container changed size; replace the frame.
    pub fn resize_container(&mut self, width: f64, height: f64) {
        self.config.width = width.max(0.0);
        self.config.height = height.max(0.0);
        self.refit();
    }

    /// Use a frame computed by the host instead of fitting.
    pub fn set_image_frame(&mut self, frame: ImageFrame) {
        self.natural = Some(frame.natural);
        self.frame = Some(frame);
        self.image_error_reported = false;
        self.reanchor_popup();
    }

    /// Current image frame, if the image has loaded.
    pub fn image_frame(&self) -> Option<ImageFrame> {
        self.frame
    }

    /// The frame, if markers can be placed on it. A collapsed container
    /// yields a zero-scale frame, which counts as no frame.
    fn ready_frame(&self) -> Option<ImageFrame> {
        self.frame.filter(|f| f.scale > 0.0)
    }

    fn container_fit(&self) -> Option<ImageFrame> {
        let natural = self.natural?;
        ImageFrame::fit(natural, Size::new(self.config.width, self.config.height))
    }

    fn refit(&mut self) {
        if self.natural.is_none() {
            return;
        }
        self.frame = self.container_fit();
        self.guides.clear();
        self.reanchor_popup();
    }

    fn reanchor_popup(&mut self) {
        let Some(active) = self.popup.active() else { return };
        let id = active.marker_id.clone();
        match (self.ready_frame(), self.store.marker_by_id(&id)) {
            (Some(frame), Some(marker)) => {
                let anchor = frame.marker_bounds(marker, self.store.default_style());
                self.popup.open(&id, anchor);
            }
            _ => self.popup.close(),
        }
    }

    // --- Imperative API ---

    pub fn add_marker(&mut self, partial: NewMarker<T>) -> Marker<T> {
        self.store.add_marker(partial)
    }

    pub fn update_marker(&mut self, id: &str, updates: MarkerUpdate<T>) -> Option<Marker<T>> {
        self.store.update_marker(id, updates)
    }

    /// Remove a marker and forget any UI state that refers to it.
    pub fn delete_marker(&mut self, id: &str) -> Option<Marker<T>> {
        let removed = self.store.delete_marker(id)?;
        self.selection.remove(id);
        self.popup.close_for(id);
        if self.gesture.marker_id() == Some(id) {
            self.end_gesture();
        }
        Some(removed)
    }

    pub fn markers(&self) -> &[Marker<T>] {
        self.store.markers()
    }

    pub fn marker_by_id(&self, id: &str) -> Option<&Marker<T>> {
        self.store.marker_by_id(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the selection. Unknown ids are dropped.
    pub fn select_markers<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.set(ids);
        let store = &self.store;
        self.selection.retain_live(|id| store.contains(id));
    }

    /// Selected ids that still exist, in selection order.
    pub fn selected_ids(&self) -> Vec<MarkerId> {
        self.selection.live(|id| self.store.contains(id))
    }

    /// Drain committed change events.
    pub fn poll_events(&mut self) -> Vec<ChangeEvent<T>> {
        self.store.poll_events()
    }

    /// Drain click, double-click and image error notifications.
    pub fn poll_interactions(&mut self) -> Vec<InteractionEvent<T>> {
        std::mem::take(&mut self.interactions)
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Guides to paint for the current gesture tick.
    pub fn alignment_guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    pub fn active_popup(&self) -> Option<&ActivePopup> {
        self.popup.active()
    }

    /// Topmost marker under a screen point.
    pub fn marker_at(&self, point: Point) -> Option<&Marker<T>> {
        let frame = self.ready_frame()?;
        self.store.marker_at(point, &frame)
    }

    // --- Pointer input ---

    /// Click on empty canvas.
    pub fn click_canvas(&mut self, input: PointerInput) -> Option<Marker<T>> {
        let Some(frame) = self.ready_frame() else {
            log::debug!("Canvas click without image frame, ignoring");
            return None;
        };
        if !self.gesture.is_idle() {
            return None;
        }
        if !self.config.editable {
            self.selection.clear();
            self.popup.close();
            return None;
        }
        self.selection.clear();
        let position = frame.to_position(input.position);
        Some(self.store.add_marker(NewMarker::at(position)))
    }

    /// Click on a marker: select, toggle, or open a popup.
    pub fn click_marker(&mut self, id: &str, input: PointerInput) {
        let Some(marker) = self.store.marker_by_id(id).cloned() else {
            return;
        };
        if input.modifiers.command() {
            self.selection.toggle(id);
        } else {
            self.selection.select(id);
        }
        if self.popup_enabled(PopupTrigger::Click) {
            if let Some(frame) = self.ready_frame() {
                let anchor = frame.marker_bounds(&marker, self.store.default_style());
                self.popup.toggle(id, anchor);
            }
        }
        self.interactions.push(InteractionEvent::Click { input, marker });
    }

    pub fn double_click_marker(&mut self, id: &str, input: PointerInput) {
        if let Some(marker) = self.store.marker_by_id(id).cloned() {
            self.interactions.push(InteractionEvent::DoubleClick { input, marker });
        }
    }

    pub fn hover_marker(&mut self, id: &str) {
        if !self.popup_enabled(PopupTrigger::Hover) {
            return;
        }
        let (Some(frame), Some(marker)) = (self.ready_frame(), self.store.marker_by_id(id)) else {
            return;
        };
        let anchor = frame.marker_bounds(marker, self.store.default_style());
        self.popup.open(id, anchor);
    }

    pub fn leave_marker(&mut self, id: &str) {
        if self.popup_enabled(PopupTrigger::Hover) {
            self.popup.close_for(id);
        }
    }

    fn popup_enabled(&self, trigger: PopupTrigger) -> bool {
        self.config.enable_popup && !self.config.editable && self.config.popup_trigger == trigger
    }

    // --- Drag ---

    /// Begin dragging a marker. Returns false if the gesture cannot start.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if !self.can_start_gesture(id) {
            return false;
        }
        log::debug!("Drag start: {}", id);
        self.gesture = GestureState::Dragging {
            marker_id: id.to_string(),
        };
        true
    }

    /// Move the dragged marker's center to a screen point.
    ///
    /// Snaps to the nearest alignment when guides are on and at most one
    /// marker is selected. Returns the committed position.
    pub fn drag_move(&mut self, id: &str, center: Point) -> Option<MarkerPosition> {
        if !matches!(&self.gesture, GestureState::Dragging { marker_id } if marker_id == id) {
            return None;
        }
        let frame = self.ready_frame()?;
        let marker = self.store.marker_by_id(id)?;

        let mut target = center;
        if self.config.show_alignment_guides && self.selected_ids().len() <= 1 {
            let mut candidate = marker.clone();
            candidate.position = pixel_to_percent(
                center.x / frame.scale,
                center.y / frame.scale,
                frame.natural.width,
                frame.natural.height,
            );
            let result = calculate_alignment_guides_with_snap(
                &candidate,
                self.store.markers(),
                &frame,
                self.store.default_style(),
                self.config.alignment_threshold,
            );
            target = Point::new(result.snap_x.unwrap_or(center.x), result.snap_y.unwrap_or(center.y));
            self.guides = result.guides;
        } else {
            self.guides.clear();
        }

        let position = frame.to_position(target);
        self.store
            .update_marker(id, MarkerUpdate::position(position))
            .map(|m| m.position)
    }

    pub fn drag_end(&mut self, id: &str) {
        if matches!(&self.gesture, GestureState::Dragging { marker_id } if marker_id == id) {
            log::debug!("Drag end: {}", id);
            self.end_gesture();
        }
    }

    // --- Resize ---

    /// Begin resizing from a transformer handle attached to `id`.
    ///
    /// If `id` is not selected it becomes the only selected marker.
    pub fn transform_start(&mut self, id: &str, handle: ResizeHandle) -> bool {
        if !self.can_start_gesture(id) {
            return false;
        }
        if !self.selection.contains(id) {
            self.selection.select(id);
        }
        log::debug!("Resize start: {} ({:?})", id, handle);
        self.gesture = GestureState::Resizing {
            marker_id: id.to_string(),
            handle,
        };
        true
    }

    /// Update guides for the live transformer rectangle in screen pixels.
    pub fn transform_move(&mut self, rect: Rect) -> &[AlignmentGuide] {
        let GestureState::Resizing { marker_id, handle } = &self.gesture else {
            return &[];
        };
        match self.ready_frame() {
            Some(frame) if self.config.show_alignment_guides => {
                self.guides = calculate_resize_guides(
                    rect,
                    *handle,
                    marker_id,
                    self.store.markers(),
                    &frame,
                    self.store.default_style(),
                    self.config.alignment_threshold,
                );
            }
            _ => self.guides.clear(),
        }
        &self.guides
    }

    /// Commit the resize for every selected marker as one change.
    ///
    /// `final_centers` holds screen-pixel centers reported by the
    /// transformer; markers without an entry keep their position.
    pub fn transform_end(&mut self, scale_x: f64, scale_y: f64, final_centers: &[(MarkerId, Point)]) {
        let GestureState::Resizing { marker_id, .. } = &self.gesture else {
            return;
        };
        let primary = marker_id.clone();
        self.end_gesture();
        let Some(frame) = self.ready_frame() else { return };

        let (sx, sy) = if self.config.keep_aspect_ratio {
            let uniform = (scale_x.abs() + scale_y.abs()) / 2.0;
            (uniform, uniform)
        } else {
            (scale_x.abs(), scale_y.abs())
        };

        let mut targets = self.selected_ids();
        if !targets.contains(&primary) {
            targets.push(primary.clone());
        }

        let updates: Vec<(MarkerId, MarkerUpdate<T>)> = targets
            .into_iter()
            .filter_map(|id| {
                let marker = self.store.marker_by_id(&id)?;
                let style = self.resized_style(marker.style_or(self.store.default_style()), sx, sy);
                let position = final_centers
                    .iter()
                    .find(|(center_id, _)| *center_id == id)
                    .map(|(_, center)| frame.to_position(*center));
                let update = MarkerUpdate {
                    position,
                    style: Some(style),
                    ..MarkerUpdate::default()
                };
                Some((id, update))
            })
            .collect();

        log::debug!("Resize end: {} marker(s)", updates.len());
        self.store.update_batch(&primary, updates);
    }

    fn resized_style(&self, style: &MarkerStyle, sx: f64, sy: f64) -> MarkerStyle {
        let step = self.config.resize_step;
        let mut resized = style.clone();
        resized.width = round_to_step(style.width * sx, step).max(self.config.min_marker_width);
        resized.height = round_to_step(style.height * sy, step).max(self.config.min_marker_height);
        resized
    }

    // --- Keyboard ---

    /// Handle a key press. Returns true when the key was consumed.
    pub fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> bool {
        if !self.config.editable || !self.gesture.is_idle() {
            return false;
        }
        let selected = self.selected_ids();
        if selected.is_empty() {
            return false;
        }

        if let Some((dx, dy)) = key.arrow_direction() {
            let Some(frame) = self.ready_frame() else { return false };
            let step = modifiers.nudge_step();
            let delta_x = step * dx / frame.natural.width * 100.0;
            let delta_y = step * dy / frame.natural.height * 100.0;
            let positions: Vec<(MarkerId, MarkerPosition)> = selected
                .into_iter()
                .filter_map(|id| {
                    let p = self.store.marker_by_id(&id)?.position;
                    Some((id, MarkerPosition::new(p.x + delta_x, p.y + delta_y)))
                })
                .collect();
            self.store.apply_positions(positions);
            return true;
        }

        match key {
            Key::Escape => {
                self.selection.clear();
                true
            }
            k if k.is_delete() && self.config.deletable => {
                for id in selected {
                    self.delete_marker(&id);
                }
                self.selection.clear();
                true
            }
            _ => false,
        }
    }

    // --- Editing ---

    /// Enter host-driven editing for a marker.
    pub fn begin_editing(&mut self, id: &str) -> bool {
        if !self.gesture.is_idle() || !self.store.contains(id) {
            return false;
        }
        self.gesture = GestureState::Editing {
            marker_id: id.to_string(),
        };
        true
    }

    pub fn end_editing(&mut self) {
        if matches!(self.gesture, GestureState::Editing { .. }) {
            self.gesture = GestureState::Idle;
        }
    }

    fn can_start_gesture(&self, id: &str) -> bool {
        if self.ready_frame().is_none() {
            log::debug!("Gesture on {} without image frame, ignoring", id);
            return false;
        }
        self.config.editable && self.gesture.is_idle() && self.store.contains(id)
    }

    fn end_gesture(&mut self) {
        self.gesture = GestureState::Idle;
        self.guides.clear();
    }
}
