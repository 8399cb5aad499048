use crate::config::Action;
use crate::draw::color::{BLACK, BLUE, GREEN, ORANGE, PURPLE, RED, WHITE, YELLOW};
use crate::input::{events::Key, tool::ToolKind};

use super::InputDispatcher;

impl InputDispatcher {
    /// Processes a key press event.
    ///
    /// Modifier keys only update the tracked modifier state. Every other key
    /// is looked up in the keybinding map together with the held modifiers.
    pub fn on_key_press(&mut self, key: Key) {
        if self.modifiers.update(key, true) {
            return;
        }

        let Some(key_str) = key.binding_name() else {
            return;
        };

        match self.find_action(&key_str) {
            Some(action) => self.handle_action(action),
            None => log::debug!("No action bound to {:?} with {:?}", key_str, self.modifiers),
        }
    }

    /// Processes a key release event. Only modifier releases matter.
    pub fn on_key_release(&mut self, key: Key) {
        self.modifiers.update(key, false);
    }

    /// Processes the canvas losing keyboard focus.
    ///
    /// Releases for held modifiers will never arrive, so they are dropped.
    /// A drag in progress is cancelled like a pointer leave.
    pub fn on_focus_lost(&mut self) {
        self.modifiers.reset();
        self.on_pointer_leave();
    }

    /// Handle an action triggered by a keybinding.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::SelectFreehand => self.set_tool(ToolKind::Freehand),
            Action::SelectEraser => self.set_tool(ToolKind::Erase),
            Action::SelectLine => self.set_tool(ToolKind::Line),
            Action::SelectRectangle => self.set_tool(ToolKind::Rectangle),
            Action::SelectEllipse => self.set_tool(ToolKind::Ellipse),
            Action::SelectText => self.set_tool(ToolKind::Text),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::ClearCanvas => self.clear_canvas(),
            Action::CancelInteraction => {
                let result = self.tools.discard_interaction(&mut self.canvas);
                if self.apply("discard interaction", result) {
                    self.button_held = false;
                }
            }
            Action::IncreaseThickness => self.adjust_width(1),
            Action::DecreaseThickness => self.adjust_width(-1),
            Action::SetColorBlack => self.set_color(BLACK),
            Action::SetColorRed => self.set_color(RED),
            Action::SetColorGreen => self.set_color(GREEN),
            Action::SetColorBlue => self.set_color(BLUE),
            Action::SetColorYellow => self.set_color(YELLOW),
            Action::SetColorOrange => self.set_color(ORANGE),
            Action::SetColorPurple => self.set_color(PURPLE),
            Action::SetColorWhite => self.set_color(WHITE),
        }
    }
}
