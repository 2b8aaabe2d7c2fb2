//! Resize handle definitions.

use serde::{Deserialize, Serialize};

/// The transformer anchor being dragged during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Edge on the x axis moved by a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Left,
    Right,
}

/// Edge on the y axis moved by a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    Top,
    Bottom,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopCenter,
        ResizeHandle::TopRight,
        ResizeHandle::MiddleLeft,
        ResizeHandle::MiddleRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomCenter,
        ResizeHandle::BottomRight,
    ];

    /// The x-axis edge this handle drags, if any.
    pub fn x_edge(self) -> Option<HorizontalEdge> {
        match self {
            ResizeHandle::TopLeft | ResizeHandle::MiddleLeft | ResizeHandle::BottomLeft => {
                Some(HorizontalEdge::Left)
            }
            ResizeHandle::TopRight | ResizeHandle::MiddleRight | ResizeHandle::BottomRight => {
                Some(HorizontalEdge::Right)
            }
            ResizeHandle::TopCenter | ResizeHandle::BottomCenter => None,
        }
    }

    /// The y-axis edge this handle drags, if any.
    pub fn y_edge(self) -> Option<VerticalEdge> {
        match self {
            ResizeHandle::TopLeft | ResizeHandle::TopCenter | ResizeHandle::TopRight => Some(VerticalEdge::Top),
            ResizeHandle::BottomLeft | ResizeHandle::BottomCenter | ResizeHandle::BottomRight => {
                Some(VerticalEdge::Bottom)
            }
            ResizeHandle::MiddleLeft | ResizeHandle::MiddleRight => None,
        }
    }

    pub fn is_corner(self) -> bool {
        self.x_edge().is_some() && self.y_edge().is_some()
    }
}
