use crate::draw::Point;
use crate::input::events::MouseButton;

use super::InputDispatcher;

impl InputDispatcher {
    /// Processes a pointer button press.
    ///
    /// Only the left button draws; it starts an interaction with the active tool.
    pub fn on_pointer_down(&mut self, button: MouseButton, point: Point) {
        if button != MouseButton::Left {
            return;
        }
        self.button_held = true;
        let result = self.tools.begin_interaction(&mut self.canvas, point);
        self.apply("begin interaction", result);
    }

    /// Processes pointer motion. Ignored unless the left button is held.
    pub fn on_pointer_move(&mut self, point: Point) {
        if !self.button_held {
            return;
        }
        let result = self.tools.continue_interaction(&mut self.canvas, point);
        self.apply("continue interaction", result);
    }

    /// Processes a pointer button release, committing the interaction.
    pub fn on_pointer_up(&mut self, button: MouseButton, point: Point) {
        if button != MouseButton::Left {
            return;
        }
        self.button_held = false;
        let result = self.tools.end_interaction(&mut self.canvas, point);
        self.apply("end interaction", result);
    }

    /// Processes the pointer leaving the canvas.
    ///
    /// A drag in progress is cancelled according to the configured policy; a
    /// later button release then finds nothing to end.
    pub fn on_pointer_leave(&mut self) {
        if !self.button_held {
            return;
        }
        self.button_held = false;
        let result = self.tools.cancel_interaction(&mut self.canvas);
        self.apply("cancel interaction", result);
    }
}
