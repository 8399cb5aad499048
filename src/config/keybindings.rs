//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that maps keyboard
//! shortcuts to drawing actions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Tool selection
    SelectFreehand,
    SelectEraser,
    SelectLine,
    SelectRectangle,
    SelectEllipse,
    SelectText,

    // History and canvas
    Undo,
    Redo,
    ClearCanvas,

    // Abandon the current drag
    CancelInteraction,

    // Thickness controls
    IncreaseThickness,
    DecreaseThickness,

    // Palette colors
    SetColorBlack,
    SetColorRed,
    SetColorGreen,
    SetColorBlue,
    SetColorYellow,
    SetColorOrange,
    SetColorPurple,
    SetColorWhite,
}

/// A single keybinding: a key name with optional modifiers.
///
/// The key is stored lowercased so that `Ctrl+Z` and `ctrl+z` are the same
/// binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Delete".
    /// Modifiers can appear in any order and spaces around '+' are ignored.
    /// A literal '+' key is written as "+" or "Ctrl++".
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]; rejoining the leftovers restores '+'
        let key = key_parts.join("+");
        if key.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        Ok(Self {
            key: key.to_lowercase(),
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// redo = ["Ctrl+Y", "Ctrl+Shift+Z"]
/// select_line = ["L"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_select_freehand")]
    pub select_freehand: Vec<String>,

    #[serde(default = "default_select_eraser")]
    pub select_eraser: Vec<String>,

    #[serde(default = "default_select_line")]
    pub select_line: Vec<String>,

    #[serde(default = "default_select_rectangle")]
    pub select_rectangle: Vec<String>,

    #[serde(default = "default_select_ellipse")]
    pub select_ellipse: Vec<String>,

    #[serde(default = "default_select_text")]
    pub select_text: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_redo")]
    pub redo: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_cancel_interaction")]
    pub cancel_interaction: Vec<String>,

    #[serde(default = "default_increase_thickness")]
    pub increase_thickness: Vec<String>,

    #[serde(default = "default_decrease_thickness")]
    pub decrease_thickness: Vec<String>,

    #[serde(default = "default_set_color_black")]
    pub set_color_black: Vec<String>,

    #[serde(default = "default_set_color_red")]
    pub set_color_red: Vec<String>,

    #[serde(default = "default_set_color_green")]
    pub set_color_green: Vec<String>,

    #[serde(default = "default_set_color_blue")]
    pub set_color_blue: Vec<String>,

    #[serde(default = "default_set_color_yellow")]
    pub set_color_yellow: Vec<String>,

    #[serde(default = "default_set_color_orange")]
    pub set_color_orange: Vec<String>,

    #[serde(default = "default_set_color_purple")]
    pub set_color_purple: Vec<String>,

    #[serde(default = "default_set_color_white")]
    pub set_color_white: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            select_freehand: default_select_freehand(),
            select_eraser: default_select_eraser(),
            select_line: default_select_line(),
            select_rectangle: default_select_rectangle(),
            select_ellipse: default_select_ellipse(),
            select_text: default_select_text(),
            undo: default_undo(),
            redo: default_redo(),
            clear_canvas: default_clear_canvas(),
            cancel_interaction: default_cancel_interaction(),
            increase_thickness: default_increase_thickness(),
            decrease_thickness: default_decrease_thickness(),
            set_color_black: default_set_color_black(),
            set_color_red: default_set_color_red(),
            set_color_green: default_set_color_green(),
            set_color_blue: default_set_color_blue(),
            set_color_yellow: default_set_color_yellow(),
            set_color_orange: default_set_color_orange(),
            set_color_purple: default_set_color_purple(),
            set_color_white: default_set_color_white(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions for efficient matching.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups: [(&Vec<String>, Action); 20] = [
            (&self.select_freehand, Action::SelectFreehand),
            (&self.select_eraser, Action::SelectEraser),
            (&self.select_line, Action::SelectLine),
            (&self.select_rectangle, Action::SelectRectangle),
            (&self.select_ellipse, Action::SelectEllipse),
            (&self.select_text, Action::SelectText),
            (&self.undo, Action::Undo),
            (&self.redo, Action::Redo),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.cancel_interaction, Action::CancelInteraction),
            (&self.increase_thickness, Action::IncreaseThickness),
            (&self.decrease_thickness, Action::DecreaseThickness),
            (&self.set_color_black, Action::SetColorBlack),
            (&self.set_color_red, Action::SetColorRed),
            (&self.set_color_green, Action::SetColorGreen),
            (&self.set_color_blue, Action::SetColorBlue),
            (&self.set_color_yellow, Action::SetColorYellow),
            (&self.set_color_orange, Action::SetColorOrange),
            (&self.set_color_purple, Action::SetColorPurple),
            (&self.set_color_white, Action::SetColorWhite),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn bindings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn default_select_freehand() -> Vec<String> {
    bindings(&["P"])
}

fn default_select_eraser() -> Vec<String> {
    bindings(&["E"])
}

fn default_select_line() -> Vec<String> {
    bindings(&["L"])
}

fn default_select_rectangle() -> Vec<String> {
    bindings(&["R"])
}

fn default_select_ellipse() -> Vec<String> {
    bindings(&["C"])
}

fn default_select_text() -> Vec<String> {
    bindings(&["T"])
}

fn default_undo() -> Vec<String> {
    bindings(&["Ctrl+Z"])
}

fn default_redo() -> Vec<String> {
    bindings(&["Ctrl+Y", "Ctrl+Shift+Z"])
}

fn default_clear_canvas() -> Vec<String> {
    bindings(&["Delete"])
}

fn default_cancel_interaction() -> Vec<String> {
    bindings(&["Escape"])
}

fn default_increase_thickness() -> Vec<String> {
    bindings(&["+", "="])
}

fn default_decrease_thickness() -> Vec<String> {
    bindings(&["-", "_"])
}

fn default_set_color_black() -> Vec<String> {
    bindings(&["Alt+K"])
}

fn default_set_color_red() -> Vec<String> {
    bindings(&["Alt+R"])
}

fn default_set_color_green() -> Vec<String> {
    bindings(&["Alt+G"])
}

fn default_set_color_blue() -> Vec<String> {
    bindings(&["Alt+B"])
}

fn default_set_color_yellow() -> Vec<String> {
    bindings(&["Alt+Y"])
}

fn default_set_color_orange() -> Vec<String> {
    bindings(&["Alt+O"])
}

fn default_set_color_purple() -> Vec<String> {
    bindings(&["Alt+U"])
}

fn default_set_color_white() -> Vec<String> {
    bindings(&["Alt+W"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Delete").unwrap();
        assert_eq!(binding.key, "delete");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(binding.key, "z");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_with_spaces_and_any_order() {
        let a = KeyBinding::parse("Ctrl + Shift + Z").unwrap();
        let b = KeyBinding::parse("shift+ctrl+z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_plus_key() {
        let plain = KeyBinding::parse("+").unwrap();
        assert_eq!(plain.key, "+");
        assert!(!plain.ctrl);

        let ctrl = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(ctrl.key, "+");
        assert!(ctrl.ctrl);
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        assert!(binding.matches("Z", true, true, false));
        assert!(binding.matches("z", true, true, false));
        assert!(!binding.matches("z", false, true, false));
        assert!(!binding.matches("z", true, false, false));
        assert!(!binding.matches("y", true, true, false));
    }

    #[test]
    fn test_build_action_map_defaults() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let get = |s: &str| map.get(&KeyBinding::parse(s).unwrap()).copied();
        assert_eq!(get("Ctrl+Z"), Some(Action::Undo));
        assert_eq!(get("Ctrl+Y"), Some(Action::Redo));
        assert_eq!(get("Ctrl+Shift+Z"), Some(Action::Redo));
        assert_eq!(get("L"), Some(Action::SelectLine));
        assert_eq!(get("Alt+R"), Some(Action::SetColorRed));
        assert_eq!(get("R"), Some(Action::SelectRectangle));
        assert_eq!(get("Delete"), Some(Action::ClearCanvas));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let config = KeybindingsConfig {
            redo: bindings(&["Ctrl+Z"]),
            ..KeybindingsConfig::default()
        };

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_with_different_case_and_order() {
        let config = KeybindingsConfig {
            select_line: bindings(&["Shift+Ctrl+q"]),
            select_text: bindings(&["Ctrl+Shift+Q"]),
            ..KeybindingsConfig::default()
        };
        assert!(config.build_action_map().is_err());
    }
}
