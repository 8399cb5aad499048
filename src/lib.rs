//! Raster sketching engine.
//!
//! A [`draw::Canvas`] owns the committed pixels, a transparent preview layer
//! for live shapes, and a snapshot undo history. An [`input::InputDispatcher`]
//! turns host pointer and keyboard events into drawing operations on it.
//! Hosts render with [`draw::Canvas::render_to`] and export committed pixels
//! with [`draw::Canvas::export_pixels`].

pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod script;
pub mod util;

pub use config::Config;
pub use draw::{Canvas, CanvasOptions, EngineError, Raster};
pub use input::InputDispatcher;
