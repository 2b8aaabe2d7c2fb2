//! Marker data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, immutable marker identifier.
pub type MarkerId = String;

/// Marker position as percentages of the natural image size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    /// Percent of natural width, `[0, 100]`.
    pub x: f64,
    /// Percent of natural height, `[0, 100]`.
    pub y: f64,
}

impl MarkerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Marker size and presentation attributes.
///
/// `width`/`height` are natural-image pixels. The remaining fields are
/// passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            width: 28.0,
            height: 28.0,
            border_radius: Some("50%".to_string()),
            background_color: Some("rgba(24, 144, 255, 0.6)".to_string()),
            border: Some("2px solid #ffffff".to_string()),
            box_shadow: Some("0 2px 6px rgba(0, 0, 0, 0.3)".to_string()),
        }
    }
}

impl MarkerStyle {
    /// A style with only a size set.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            border_radius: None,
            background_color: None,
            border: None,
            box_shadow: None,
        }
    }

    /// Overlay the fields present in `patch` onto this style.
    pub fn merged(&self, patch: &StylePatch) -> Self {
        Self {
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            border_radius: patch.border_radius.clone().or_else(|| self.border_radius.clone()),
            background_color: patch
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            border: patch.border.clone().or_else(|| self.border.clone()),
            box_shadow: patch.box_shadow.clone().or_else(|| self.box_shadow.clone()),
        }
    }
}

/// Partial style used when creating markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub border_radius: Option<String>,
    pub background_color: Option<String>,
    pub border: Option<String>,
    pub box_shadow: Option<String>,
}

impl From<MarkerStyle> for StylePatch {
    fn from(style: MarkerStyle) -> Self {
        Self {
            width: Some(style.width),
            height: Some(style.height),
            border_radius: style.border_radius,
            background_color: style.background_color,
            border: style.border,
            box_shadow: style.box_shadow,
        }
    }
}

/// A positioned, resizable point of interest on the image.
///
/// `content` is renderer-facing and opaque; `data` is the host's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker<T = serde_json::Value> {
    pub id: MarkerId,
    pub position: MarkerPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<MarkerStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Marker<T> {
    /// Create a bare marker with no style, content or data.
    pub fn new(id: impl Into<MarkerId>, position: MarkerPosition) -> Self {
        Self {
            id: id.into(),
            position,
            style: None,
            content: None,
            data: None,
        }
    }

    /// The marker's style, or `default` when it has none.
    pub fn style_or<'a>(&'a self, default: &'a MarkerStyle) -> &'a MarkerStyle {
        self.style.as_ref().unwrap_or(default)
    }
}

/// Input to `add_marker`: everything is optional except the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMarker<T = serde_json::Value> {
    #[serde(default)]
    pub id: Option<MarkerId>,
    pub position: MarkerPosition,
    #[serde(default)]
    pub style: Option<StylePatch>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    pub data: Option<T>,
}

impl<T> NewMarker<T> {
    pub fn at(position: MarkerPosition) -> Self {
        Self {
            id: None,
            position,
            style: None,
            content: None,
            data: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<MarkerId>) -> Self {
        self.id = Some(id.into());
        self
    }

}

/// Shallow update for an existing marker. Present fields replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerUpdate<T = serde_json::Value> {
    #[serde(default)]
    pub position: Option<MarkerPosition>,
    #[serde(default)]
    pub style: Option<MarkerStyle>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    pub data: Option<T>,
}

impl<T> Default for MarkerUpdate<T> {
    fn default() -> Self {
        Self {
            position: None,
            style: None,
            content: None,
            data: None,
        }
    }
}

impl<T> MarkerUpdate<T> {
    pub fn position(position: MarkerPosition) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn style(style: MarkerStyle) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Check if the update carries no fields.
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.style.is_none() && self.content.is_none() && self.data.is_none()
    }
}

/// Generate a fresh marker id with the given prefix.
pub fn generate_id(prefix: &str) -> MarkerId {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_merge_keeps_defaults() {
        let base = MarkerStyle::default();
        let patch = StylePatch {
            width: Some(40.0),
            background_color: Some("red".to_string()),
            ..StylePatch::default()
        };
        let merged = base.merged(&patch);
        assert_eq!(merged.width, 40.0);
        assert_eq!(merged.height, base.height);
        assert_eq!(merged.background_color.as_deref(), Some("red"));
        assert_eq!(merged.border, base.border);
    }

    #[test]
    fn test_generate_id_prefix() {
        let a = generate_id("pin");
        let b = generate_id("pin");
        assert!(a.starts_with("pin-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_marker_json_shape() {
        let json = r#"{"id":"a","position":{"x":10,"y":20},"data":{"device":"cam-1"}}"#;
        let marker: Marker = serde_json::from_str(json).unwrap();
        assert_eq!(marker.position, MarkerPosition::new(10.0, 20.0));
        assert!(marker.style.is_none());
        assert_eq!(marker.data.unwrap()["device"], "cam-1");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(MarkerUpdate::<()>::default().is_empty());
        assert!(!MarkerUpdate::<()>::position(MarkerPosition::new(1.0, 1.0)).is_empty());
    }

    /// Payload type with no `Default` impl.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Camera {
        serial: String,
    }

    #[test]
    fn test_payload_without_default() {
        let marker: Marker<Camera> =
            serde_json::from_str(r#"{"id":"a","position":{"x":1,"y":2},"data":{"serial":"c-9"}}"#).unwrap();
        assert_eq!(marker.data.unwrap().serial, "c-9");

        let bare: Marker<Camera> = serde_json::from_str(r#"{"id":"b","position":{"x":1,"y":2}}"#).unwrap();
        assert!(bare.data.is_none());

        let partial: NewMarker<Camera> = serde_json::from_str(r#"{"position":{"x":5,"y":5}}"#).unwrap();
        assert!(partial.data.is_none());

        let update: MarkerUpdate<Camera> = serde_json::from_str(r#"{"data":{"serial":"c-1"}}"#).unwrap();
        assert_eq!(update.data.unwrap().serial, "c-1");
        assert!(update.position.is_none());
    }
}
