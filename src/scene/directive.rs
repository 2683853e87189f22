//! Drawable primitives emitted by the scene builder.

use crate::foundation::core::{Rgb, ZLayer};
use smallvec::SmallVec;

/// Map-space position: `x` is longitude, `y` is latitude. Text panels use anchors past
/// the coastline, so this deliberately carries no range validation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapPos {
    pub x: f64,
    pub y: f64,
}

impl MapPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Marker glyph for a point directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MarkerShape {
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
}

/// Stroke style for a line directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Horizontal anchoring of a text directive at its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    Left,
    Center,
    Right,
}

/// One drawable primitive.
///
/// Immutable value, rebuilt every frame; the renderer paints the emitted sequence in
/// order, so sequence position plus [`ZLayer`] establish the stacking.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawDirective {
    Point {
        pos: MapPos,
        size: f64,
        color: Rgb,
        alpha: f64,
        layer: ZLayer,
        marker: MarkerShape,
    },
    Line {
        points: SmallVec<[MapPos; 4]>,
        color: Rgb,
        style: LineStyle,
        width: f64,
        alpha: f64,
        layer: ZLayer,
    },
    Text {
        pos: MapPos,
        text: String,
        color: Rgb,
        size: f64,
        alpha: f64,
        anchor: TextAnchor,
    },
    Rect {
        pos: MapPos,
        width: f64,
        height: f64,
        color: Rgb,
        alpha: f64,
    },
}

impl DrawDirective {
    /// An empty, fully transparent text directive: the cleared state of a pool slot.
    pub fn ghost_text(pos: MapPos) -> Self {
        Self::Text {
            pos,
            text: String::new(),
            color: Rgb::gray(0.0),
            size: 0.0,
            alpha: 0.0,
            anchor: TextAnchor::Left,
        }
    }

    /// An empty, fully transparent line directive: the cleared state of a line slot.
    pub fn ghost_line(layer: ZLayer) -> Self {
        Self::Line {
            points: SmallVec::new(),
            color: Rgb::gray(0.0),
            style: LineStyle::Solid,
            width: 0.0,
            alpha: 0.0,
            layer,
        }
    }
}
