//! Marker selection set.

use crate::marker::MarkerId;

/// Ordered set of selected marker ids.
///
/// Selection is UI state; it never mutates markers. Readers should filter
/// it against the live store with [`SelectionSet::retain_live`] or
/// [`SelectionSet::live`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<MarkerId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single marker.
    pub fn select(&mut self, id: &str) {
        self.ids.clear();
        self.ids.push(id.to_string());
    }

    /// Add a marker to the selection.
    pub fn add(&mut self, id: &str) {
        if !self.contains(id) {
            self.ids.push(id.to_string());
        }
    }

    /// Remove a marker from the selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Add the marker if absent, remove it otherwise.
    pub fn toggle(&mut self, id: &str) {
        if !self.remove(id) {
            self.ids.push(id.to_string());
        }
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids.clear();
        for id in ids {
            self.add(id.as_ref());
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Check if a marker is selected, live or not.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected ids, including stale ones.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[MarkerId] {
        &self.ids
    }

    /// Drop ids for which `is_live` returns false.
    pub fn retain_live(&mut self, is_live: impl Fn(&str) -> bool) {
        self.ids.retain(|id| is_live(id));
    }

    /// Selected ids that pass `is_live`, without modifying the set.
    pub fn live(&self, is_live: impl Fn(&str) -> bool) -> Vec<MarkerId> {
        self.ids.iter().filter(|id| is_live(id)).cloned().collect()
    }
}
