//! Drawing tool selection.

use crate::draw::ShapeKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Drawing tool selection.
///
/// The active tool determines what happens while the user drags the pointer:
/// stroke tools paint straight onto the surface, shape tools show a dashed
/// preview and commit a single outline on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Freehand drawing - follows the pointer path (default)
    #[default]
    Freehand,
    /// Eraser - freehand stroke painted in the background color
    Erase,
    /// Straight line between start and end points
    Line,
    /// Rectangle outline from corner to corner
    Rectangle,
    /// Circle outline from center outward
    Ellipse,
    /// Text placement; selectable but cannot start an interaction
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Freehand,
        ToolKind::Erase,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Text,
    ];

    /// The outline primitive drawn by shape tools, or `None` for stroke tools and text.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Freehand | ToolKind::Erase | ToolKind::Text => None,
        }
    }

    /// Whether the tool paints directly onto the surface while dragging.
    pub fn is_stroke(self) -> bool {
        matches!(self, ToolKind::Freehand | ToolKind::Erase)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Freehand => "freehand",
            ToolKind::Erase => "erase",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Text => "text",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "freehand" | "pen" => Ok(ToolKind::Freehand),
            "erase" | "eraser" => Ok(ToolKind::Erase),
            "line" => Ok(ToolKind::Line),
            "rectangle" | "rect" => Ok(ToolKind::Rectangle),
            "ellipse" | "circle" => Ok(ToolKind::Ellipse),
            "text" => Ok(ToolKind::Text),
            other => Err(format!("Unknown tool '{}'", other)),
        }
    }
}
