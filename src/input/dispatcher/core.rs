//! Dispatcher state and the engine-facing passthroughs.

use crate::config::{Action, Config, KeyBinding};
use crate::draw::{Canvas, Color, EngineError};
use crate::input::controller::ToolController;
use crate::input::{modifiers::Modifiers, tool::ToolKind};
use std::collections::HashMap;

/// Routes raw pointer and keyboard events to the tool controller and canvas.
///
/// Owns the whole engine for one drawing session. Engine errors never escape:
/// benign ones (spurious events, setters mid-drag, undo at the ends of
/// history) are logged at debug, anything else at warn.
pub struct InputDispatcher {
    pub(super) canvas: Canvas,
    pub(super) tools: ToolController,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Whether the primary button is held
    pub(super) button_held: bool,
    /// Whether the visible image changed since the host last repainted
    pub needs_redraw: bool,
    /// Keybinding action map for efficient lookup
    action_map: HashMap<KeyBinding, Action>,
}

impl InputDispatcher {
    pub fn new(canvas: Canvas, tools: ToolController, action_map: HashMap<KeyBinding, Action>) -> Self {
        Self {
            canvas,
            tools,
            modifiers: Modifiers::new(),
            button_held: false,
            needs_redraw: true,
            action_map,
        }
    }

    /// Builds a complete engine for a `width` x `height` canvas from configuration.
    pub fn from_config(width: u32, height: u32, config: &Config) -> anyhow::Result<Self> {
        let canvas = Canvas::new(width, height, config.canvas_options())?;
        let tools = ToolController::new(config.tool_defaults());
        let action_map = config.action_map()?;
        Ok(Self::new(canvas, tools, action_map))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn is_button_held(&self) -> bool {
        self.button_held
    }

    /// Reallocates the canvas. Any live interaction is abandoned and history restarts.
    pub fn resize(&mut self, width: u32, height: u32) {
        let result = self.canvas.resize(width, height);
        if result.is_ok() {
            self.tools.abort_interaction();
            self.button_held = false;
        }
        self.apply("resize", result);
    }

    /// Fills the canvas with the background as one undoable edit.
    pub fn clear_canvas(&mut self) {
        let result = self.ensure_idle().and_then(|_| self.canvas.clear());
        self.apply("clear", result);
    }

    pub fn undo(&mut self) {
        let result = self.ensure_idle().and_then(|_| self.canvas.undo());
        self.apply("undo", result);
    }

    pub fn redo(&mut self) {
        let result = self.ensure_idle().and_then(|_| self.canvas.redo());
        self.apply("redo", result);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let result = self.tools.set_tool(tool);
        if self.apply("set tool", result) {
            log::debug!("Tool set to {}", tool);
        }
    }

    pub fn set_color(&mut self, color: Color) {
        let result = self.tools.set_color(color);
        if self.apply("set color", result) {
            log::debug!("Color set to {} ({})", crate::util::color_to_name(&color), color.to_hex());
        }
    }

    pub fn set_width(&mut self, width: f64) {
        let result = self.tools.set_width(width);
        self.apply("set width", result);
    }

    pub fn adjust_width(&mut self, steps: i32) {
        let result = self.tools.adjust_width(steps);
        self.apply("adjust width", result);
    }

    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        self.action_map
            .iter()
            .find(|(binding, _)| {
                binding.matches(
                    key_str,
                    self.modifiers.ctrl,
                    self.modifiers.shift,
                    self.modifiers.alt,
                )
            })
            .map(|(_, action)| *action)
    }

    /// History and clear are refused mid-drag so the live stroke cannot be
    /// split across snapshots.
    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.tools.is_live() {
            Err(EngineError::InvalidState("interaction in progress"))
        } else {
            Ok(())
        }
    }

    /// Logs a failed operation or flags a redraw. Returns whether it succeeded.
    pub(super) fn apply(&mut self, operation: &str, result: Result<(), EngineError>) -> bool {
        match result {
            Ok(()) => {
                self.needs_redraw = true;
                true
            }
            Err(err) if err.is_benign() => {
                log::debug!("Ignored {}: {}", operation, err);
                false
            }
            Err(err) => {
                log::warn!("{} failed: {}", operation, err);
                false
            }
        }
    }
}
