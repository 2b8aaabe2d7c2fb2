//! Canonical marker collection and change events.

use crate::geometry::{ImageFrame, clamp_position};
use crate::marker::{Marker, MarkerId, MarkerPosition, MarkerStyle, MarkerUpdate, NewMarker, generate_id};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

/// A committed mutation with the full post-mutation marker list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent<T = serde_json::Value> {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub marker: Marker<T>,
    pub markers: Vec<Marker<T>>,
}

/// Ordered marker collection.
///
/// Order is insertion order; later markers paint above earlier ones.
#[derive(Debug, Clone)]
pub struct MarkerStore<T = serde_json::Value> {
    markers: Vec<Marker<T>>,
    /// Id -> index into `markers`.
    index: HashMap<MarkerId, usize>,
    default_style: MarkerStyle,
    id_prefix: String,
    /// Events not yet polled by the host.
    pending: Vec<ChangeEvent<T>>,
}

impl<T: Clone> MarkerStore<T> {
    /// Create an empty store.
    pub fn new(default_style: MarkerStyle, id_prefix: impl Into<String>) -> Self {
        Self {
            markers: Vec::new(),
            index: HashMap::new(),
            default_style,
            id_prefix: id_prefix.into(),
            pending: Vec::new(),
        }
    }

    /// Create a store seeded with an initial snapshot.
    ///
    /// Positions are clamped and duplicate ids replaced; no events are queued.
    pub fn with_markers(
        markers: impl IntoIterator<Item = Marker<T>>,
        default_style: MarkerStyle,
        id_prefix: impl Into<String>,
    ) -> Self {
        let mut store = Self::new(default_style, id_prefix);
        for mut marker in markers {
            marker.position = clamp_position(marker.position);
            if store.index.contains_key(&marker.id) {
                let fresh = store.unique_id();
                log::warn!("Duplicate marker id {} in initial snapshot, using {}", marker.id, fresh);
                marker.id = fresh;
            }
            store.index.insert(marker.id.clone(), store.markers.len());
            store.markers.push(marker);
        }
        store
    }

    /// Style applied to markers that have none of their own.
    pub fn default_style(&self) -> &MarkerStyle {
        &self.default_style
    }

    pub fn set_default_style(&mut self, style: MarkerStyle) {
        self.default_style = style;
    }

    /// Add a marker and queue an `add` event.
    pub fn add_marker(&mut self, partial: NewMarker<T>) -> Marker<T> {
        let id = match partial.id {
            Some(id) if !self.index.contains_key(&id) => id,
            Some(id) => {
                let fresh = self.unique_id();
                log::warn!("Marker id {} already exists, using {}", id, fresh);
                fresh
            }
            None => self.unique_id(),
        };

        let style = match &partial.style {
            Some(patch) => self.default_style.merged(patch),
            None => self.default_style.clone(),
        };

        let marker = Marker {
            id,
            position: clamp_position(partial.position),
            style: Some(style),
            content: partial.content,
            data: partial.data,
        };

        self.index.insert(marker.id.clone(), self.markers.len());
        self.markers.push(marker.clone());
        self.emit(ChangeKind::Add, marker.clone());
        marker
    }

    /// Shallow-merge `updates` into a marker and queue an `update` event.
    ///
    /// Returns the updated marker, or `None` for an unknown id.
    pub fn update_marker(&mut self, id: &str, updates: MarkerUpdate<T>) -> Option<Marker<T>> {
        let updated = self.apply_update(id, updates)?;
        self.emit(ChangeKind::Update, updated.clone());
        Some(updated)
    }

    /// Apply several updates, then queue one `update` event for `primary`.
    ///
    /// Unknown ids are skipped. No event is queued when nothing applied or
    /// when `primary` itself is unknown.
    pub fn update_batch(
        &mut self,
        primary: &str,
        updates: impl IntoIterator<Item = (MarkerId, MarkerUpdate<T>)>,
    ) -> usize {
        let mut applied = 0;
        for (id, update) in updates {
            if self.apply_update(&id, update).is_some() {
                applied += 1;
            }
        }
        if applied > 0 {
            if let Some(marker) = self.marker_by_id(primary).cloned() {
                self.emit(ChangeKind::Update, marker);
            }
        }
        applied
    }

    /// Move several markers at once, then queue one `update` per marker whose
    /// position actually changed. Every event carries the post-batch list.
    pub fn apply_positions(
        &mut self,
        positions: impl IntoIterator<Item = (MarkerId, MarkerPosition)>,
    ) -> Vec<MarkerId> {
        let mut changed = Vec::new();
        for (id, position) in positions {
            let Some(&idx) = self.index.get(&id) else {
                continue;
            };
            let position = clamp_position(position);
            let marker = &mut self.markers[idx];
            if marker.position != position {
                marker.position = position;
                changed.push(id);
            }
        }
        for id in &changed {
            if let Some(marker) = self.marker_by_id(id).cloned() {
                self.emit(ChangeKind::Update, marker);
            }
        }
        changed
    }

    /// Remove a marker and queue a `delete` event.
    pub fn delete_marker(&mut self, id: &str) -> Option<Marker<T>> {
        let idx = self.index.remove(id)?;
        let removed = self.markers.remove(idx);
        self.reindex_from(idx);
        self.emit(ChangeKind::Delete, removed.clone());
        Some(removed)
    }

    /// All markers in order.
    pub fn markers(&self) -> &[Marker<T>] {
        &self.markers
    }

    /// Get a marker by id.
    pub fn marker_by_id(&self, id: &str) -> Option<&Marker<T>> {
        self.index.get(id).map(|&idx| &self.markers[idx])
    }

    /// Check if a marker with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Check if the store holds no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Topmost marker whose screen bounds contain `point`.
    pub fn marker_at(&self, point: Point, frame: &ImageFrame) -> Option<&Marker<T>> {
        self.markers
            .iter()
            .rev()
            .find(|m| frame.marker_bounds(m, &self.default_style).contains(point))
    }

    /// Drain queued change events in emission order.
    pub fn poll_events(&mut self) -> Vec<ChangeEvent<T>> {
        std::mem::take(&mut self.pending)
    }

    fn apply_update(&mut self, id: &str, updates: MarkerUpdate<T>) -> Option<Marker<T>> {
        let &idx = self.index.get(id)?;
        let marker = &mut self.markers[idx];
        if let Some(position) = updates.position {
            marker.position = clamp_position(position);
        }
        if let Some(style) = updates.style {
            marker.style = Some(style);
        }
        if let Some(content) = updates.content {
            marker.content = Some(content);
        }
        if let Some(data) = updates.data {
            marker.data = Some(data);
        }
        Some(marker.clone())
    }

    fn emit(&mut self, kind: ChangeKind, marker: Marker<T>) {
        log::debug!("Marker {:?}: {}", kind, marker.id);
        self.pending.push(ChangeEvent {
            kind,
            marker,
            markers: self.markers.clone(),
        });
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, marker) in self.markers[start..].iter().enumerate() {
            self.index.insert(marker.id.clone(), start + offset);
        }
    }

    fn unique_id(&self) -> MarkerId {
        loop {
            let id = generate_id(&self.id_prefix);
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}
