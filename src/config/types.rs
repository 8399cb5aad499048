//! Configuration type definitions.

use super::enums::{CancelPolicy, ColorSpec, HistoryCompression};
use crate::draw::history::{DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, DEFAULT_MAX_ENTRIES};
use crate::draw::preview::DEFAULT_DASH_PATTERN;
use crate::input::ToolKind;
use crate::input::controller::DEFAULT_WIDTH;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Drawing-related settings.
///
/// Controls the tool state a new canvas starts with. Users can change these
/// values at runtime using keybindings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - a named color, a hex/`rgb()` string, or an RGB
    /// array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_width")]
    pub default_width: f64,

    /// Canvas background, also painted by the eraser and by clear (forced opaque)
    #[serde(default = "default_background_color")]
    pub background_color: ColorSpec,

    /// Tool active when the canvas opens
    #[serde(default)]
    pub default_tool: ToolKind,

    /// Preset widths stepped through by the thickness shortcuts
    #[serde(default = "default_brush_sizes")]
    pub brush_sizes: Vec<f64>,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_width: default_width(),
            background_color: default_background_color(),
            default_tool: ToolKind::default(),
            brush_sizes: default_brush_sizes(),
        }
    }
}

/// Shape preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PreviewConfig {
    /// Alternating on/off dash lengths in pixels for the shape preview outline
    #[serde(default = "default_dash_pattern")]
    pub dash_pattern: Vec<f64>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dash_pattern: default_dash_pattern(),
        }
    }
}

/// Undo history settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum snapshots kept, including the initial one (valid range: 2 - 1000)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Snapshot compression: off, on, or auto
    #[serde(default)]
    pub compression: HistoryCompression,

    /// Snapshot size in bytes at which `auto` starts compressing
    #[serde(default = "default_auto_compress_threshold")]
    pub auto_compress_threshold_bytes: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            compression: HistoryCompression::default(),
            auto_compress_threshold_bytes: default_auto_compress_threshold(),
        }
    }
}

/// Pointer interaction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// What to do with a drag when the pointer leaves the canvas: commit or discard
    #[serde(default)]
    pub cancel_policy: CancelPolicy,
}

/// PNG export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported images; `~` expands to the home directory
    #[serde(default = "default_export_directory")]
    pub directory: String,

    /// Filename template using chrono format specifiers (`.png` is appended)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            filename_template: default_filename_template(),
        }
    }
}

impl ExportConfig {
    /// Resolves `directory`, expanding a leading `~`.
    pub fn resolved_directory(&self) -> PathBuf {
        crate::export::expand_tilde(&self.directory)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_background_color() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_brush_sizes() -> Vec<f64> {
    vec![1.0, 3.0, 5.0, 8.0, 12.0, 16.0, 20.0]
}

fn default_dash_pattern() -> Vec<f64> {
    DEFAULT_DASH_PATTERN.to_vec()
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_auto_compress_threshold() -> usize {
    DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES
}

fn default_export_directory() -> String {
    dirs::picture_dir()
        .map(|dir| dir.join("Sketchboard").to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/Pictures/Sketchboard".to_string())
}

fn default_filename_template() -> String {
    "drawing_%Y-%m-%d_%H%M%S".to_string()
}
