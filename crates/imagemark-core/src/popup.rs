//! Marker popup state.

use crate::geometry::MarkerBounds;
use crate::marker::MarkerId;
use serde::{Deserialize, Serialize};

/// What opens a marker popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupTrigger {
    #[default]
    Hover,
    Click,
}

/// The single open popup and where to anchor it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePopup {
    pub marker_id: MarkerId,
    /// Marker bounds in screen pixels when the popup opened.
    pub anchor: MarkerBounds,
}

/// At most one open popup at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    active: Option<ActivePopup>,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActivePopup> {
        self.active.as_ref()
    }

    pub fn is_open_for(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|p| p.marker_id == id)
    }

    /// Open for a marker, replacing any other popup.
    pub fn open(&mut self, id: &str, anchor: MarkerBounds) {
        self.active = Some(ActivePopup {
            marker_id: id.to_string(),
            anchor,
        });
    }

    /// Close only if the popup belongs to `id`.
    pub fn close_for(&mut self, id: &str) {
        if self.is_open_for(id) {
            self.active = None;
        }
    }

    /// Open for `id`, or close if it is already open for `id`.
    pub fn toggle(&mut self, id: &str, anchor: MarkerBounds) {
        if self.is_open_for(id) {
            self.active = None;
        } else {
            self.open(id, anchor);
        }
    }

    pub fn close(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn anchor() -> MarkerBounds {
        MarkerBounds::from_center(Point::new(10.0, 10.0), 5.0, 5.0)
    }

    #[test]
    fn test_single_popup() {
        let mut popup = PopupState::new();
        popup.open("a", anchor());
        popup.open("b", anchor());
        assert!(popup.is_open_for("b"));
        assert!(!popup.is_open_for("a"));
    }

    #[test]
    fn test_toggle() {
        let mut popup = PopupState::new();
        popup.toggle("a", anchor());
        assert!(popup.is_open_for("a"));
        popup.toggle("a", anchor());
        assert!(popup.active().is_none());
    }

    #[test]
    fn test_close_for_other_keeps_open() {
        let mut popup = PopupState::new();
        popup.open("a", anchor());
        popup.close_for("b");
        assert!(popup.is_open_for("a"));
    }
}
