//! Raster drawing engine (Cairo-based).
//!
//! This module defines the pixel-level half of the engine:
//! - [`Surface`]: the committed pixel buffer
//! - [`PreviewLayer`]: transparent overlay for in-progress shapes
//! - [`HistoryStore`]: linear undo/redo over [`Raster`] snapshots
//! - [`Canvas`]: owner of all three, kept consistent across resize

pub mod canvas;
pub mod color;
pub mod dirty;
pub mod error;
pub mod history;
pub mod preview;
pub(crate) mod render;
pub mod raster;
pub mod shape;
pub mod surface;

// Re-export commonly used types at module level
pub use canvas::{Canvas, CanvasOptions};
pub use color::Color;
pub use error::EngineError;
pub use history::{CompressionMode, HistoryOptions, HistoryStore};
pub use preview::PreviewLayer;
pub use raster::Raster;
pub use shape::{Point, ShapeKind, StrokeStyle};
pub use surface::Surface;

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, PURPLE, RED, TRANSPARENT, WHITE, YELLOW};
