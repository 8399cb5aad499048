//! Error taxonomy for the drawing engine.

use crate::input::ToolKind;
use thiserror::Error;

/// Errors raised by the surface, preview layer, history and tool controller.
///
/// Most variants describe benign races between overlapping input events and
/// are swallowed (logged at debug) by the input dispatcher. Only
/// [`EngineError::DimensionMismatch`] and the backend variants indicate a real
/// failure of the requested operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("operation not valid in the current interaction state: {0}")]
    InvalidState(&'static str),

    #[error("no history entry in that direction")]
    EmptyHistory,

    #[error("snapshot is {found_width}x{found_height} but surface is {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("tool '{0}' cannot start an interaction")]
    UnsupportedTool(ToolKind),

    #[error("invalid stroke width {0}")]
    InvalidWidth(f64),

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Cairo buffer access failed: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether this error is a tolerated no-op rather than a failure.
    ///
    /// Spurious pointer events, setters during a drag and undo/redo at the
    /// ends of history all land here.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidState(_)
                | EngineError::EmptyHistory
                | EngineError::UnsupportedTool(_)
                | EngineError::InvalidWidth(_)
        )
    }
}
