//! Input handling and tool state machine.
//!
//! This module translates host keyboard and pointer events into drawing
//! operations. It holds the active tool, color and width, and enforces that
//! at most one interaction (a drag) is live at a time.

pub mod controller;
pub mod dispatcher;
pub mod events;
pub mod modifiers;
pub mod tool;

// Re-export commonly used types at module level
pub use controller::{LiveInteraction, ToolController, ToolDefaults};
pub use dispatcher::InputDispatcher;
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use tool::ToolKind;
