//! Configuration file support for sketchboard.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/sketchboard/config.toml`. Settings include drawing defaults,
//! preview appearance, history limits, export location and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{CancelPolicy, ColorSpec, HistoryCompression};
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{DrawingConfig, ExportConfig, HistoryConfig, InteractionConfig, PreviewConfig};

use crate::draw::color::{BLACK, WHITE};
use crate::draw::shape::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::draw::{CanvasOptions, CompressionMode, HistoryOptions};
use crate::input::controller::ToolDefaults;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const MIN_HISTORY_ENTRIES: usize = 2;
const MAX_HISTORY_ENTRIES: usize = 1000;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_width = 3.0
/// background_color = "#fafaf0"
///
/// [preview]
/// dash_pattern = [6.0, 4.0]
///
/// [history]
/// max_entries = 100
/// compression = "auto"
///
/// [interaction]
/// cancel_policy = "discard"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Tool defaults (color, width, background, tool)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Shape preview appearance
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Undo history limits and storage
    #[serde(default)]
    pub history: HistoryConfig,

    /// Pointer interaction policy
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// PNG export location
    #[serde(default)]
    pub export: ExportConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by
    /// the default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_width` and `brush_sizes`: 1.0 - 100.0
    /// - `max_entries`: 2 - 1000
    /// - `dash_pattern`: non-empty, non-negative, not all zero
    fn validate_and_clamp(&mut self) {
        let width = self.drawing.default_width;
        if !width.is_finite() {
            warn!("Invalid default_width {}, using 5.0", width);
            self.drawing.default_width = DrawingConfig::default().default_width;
        } else if !(MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&width) {
            warn!(
                "Invalid default_width {:.1}, clamping to {:.1}-{:.1} range",
                width, MIN_STROKE_WIDTH, MAX_STROKE_WIDTH
            );
            self.drawing.default_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        }

        let before = self.drawing.brush_sizes.len();
        self.drawing
            .brush_sizes
            .retain(|w| w.is_finite() && (MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(w));
        if self.drawing.brush_sizes.len() != before {
            warn!(
                "Dropped {} brush size(s) outside {:.1}-{:.1}",
                before - self.drawing.brush_sizes.len(),
                MIN_STROKE_WIDTH,
                MAX_STROKE_WIDTH
            );
        }

        if !self.drawing.default_color.is_valid() {
            warn!(
                "Invalid default_color {:?}, falling back to black",
                self.drawing.default_color
            );
            self.drawing.default_color = ColorSpec::Name("black".to_string());
        }

        if !self.drawing.background_color.is_valid() {
            warn!(
                "Invalid background_color {:?}, falling back to white",
                self.drawing.background_color
            );
            self.drawing.background_color = ColorSpec::Name("white".to_string());
        }

        let pattern = &self.preview.dash_pattern;
        let valid_pattern = !pattern.is_empty()
            && pattern.iter().all(|v| v.is_finite() && *v >= 0.0)
            && pattern.iter().any(|v| *v > 0.0);
        if !valid_pattern {
            warn!("Invalid dash_pattern {:?}, using default", pattern);
            self.preview.dash_pattern = PreviewConfig::default().dash_pattern;
        }

        if !(MIN_HISTORY_ENTRIES..=MAX_HISTORY_ENTRIES).contains(&self.history.max_entries) {
            warn!(
                "Invalid history max_entries {}, clamping to {}-{} range",
                self.history.max_entries, MIN_HISTORY_ENTRIES, MAX_HISTORY_ENTRIES
            );
            self.history.max_entries = self
                .history
                .max_entries
                .clamp(MIN_HISTORY_ENTRIES, MAX_HISTORY_ENTRIES);
        }

        if self.export.filename_template.trim().is_empty() {
            warn!("Empty export filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/sketchboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("sketchboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Canvas construction options derived from the drawing, preview and history sections.
    pub fn canvas_options(&self) -> CanvasOptions {
        let compression = match self.history.compression {
            HistoryCompression::Off => CompressionMode::Off,
            HistoryCompression::On => CompressionMode::On,
            HistoryCompression::Auto => CompressionMode::Auto {
                threshold_bytes: self.history.auto_compress_threshold_bytes,
            },
        };

        CanvasOptions {
            background: self.drawing.background_color.to_color_or(WHITE).opaque(),
            history: HistoryOptions {
                max_entries: self.history.max_entries,
                compression,
            },
            dash_pattern: self.preview.dash_pattern.clone(),
        }
    }

    /// Initial tool controller state.
    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults {
            tool: self.drawing.default_tool,
            color: self.drawing.default_color.to_color_or(BLACK),
            width: self.drawing.default_width,
            brush_sizes: self.drawing.brush_sizes.clone(),
            cancel_policy: self.interaction.cancel_policy,
        }
    }

    /// Builds the keybinding lookup table.
    ///
    /// # Errors
    /// Returns an error for unparseable or duplicate bindings.
    pub fn action_map(&self) -> Result<HashMap<KeyBinding, Action>> {
        self.keybindings
            .build_action_map()
            .map_err(|err| anyhow::anyhow!(err))
            .context("Invalid [keybindings] configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;
    use crate::input::ToolKind;
    use std::io::Write;

    fn load_str(contents: &str) -> Result<Config> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Config::load_from(file.path())
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = load_str("").unwrap();
        assert_eq!(config.drawing.default_width, 5.0);
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.history.compression, HistoryCompression::Auto);
        assert_eq!(config.interaction.cancel_policy, CancelPolicy::Commit);
        assert_eq!(config.preview.dash_pattern, vec![5.0, 5.0]);
        assert_eq!(config.drawing.default_tool, ToolKind::Freehand);
    }

    #[test]
    fn sections_are_parsed() {
        let config = load_str(
            r##"
            [drawing]
            default_color = "#ff0000"
            default_tool = "rectangle"
            background_color = [10, 20, 30]

            [history]
            max_entries = 7
            compression = "off"

            [interaction]
            cancel_policy = "discard"

            [keybindings]
            undo = ["Ctrl+U"]
            "##,
        )
        .unwrap();

        let tools = config.tool_defaults();
        assert_eq!(tools.color, RED);
        assert_eq!(tools.tool, ToolKind::Rectangle);
        assert_eq!(tools.cancel_policy, CancelPolicy::Discard);

        let options = config.canvas_options();
        assert_eq!(options.history.max_entries, 7);
        assert_eq!(options.history.compression, CompressionMode::Off);
        assert_eq!(options.background.to_rgba8(), [10, 20, 30, 255]);

        let map = config.action_map().unwrap();
        assert_eq!(
            map.get(&KeyBinding::parse("Ctrl+U").unwrap()),
            Some(&Action::Undo)
        );
        assert!(!map.contains_key(&KeyBinding::parse("Ctrl+Z").unwrap()));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = load_str(
            r#"
            [drawing]
            default_width = 500.0
            default_color = "bogus"
            brush_sizes = [0.5, 4.0, 250.0]

            [preview]
            dash_pattern = []

            [history]
            max_entries = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.drawing.default_width, 100.0);
        assert_eq!(config.drawing.brush_sizes, vec![4.0]);
        assert_eq!(config.tool_defaults().color, BLACK);
        assert_eq!(config.preview.dash_pattern, vec![5.0, 5.0]);
        assert_eq!(config.history.max_entries, 2);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = load_str("[drawing\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }

    #[test]
    fn duplicate_bindings_fail_action_map() {
        let config = load_str("[keybindings]\nredo = [\"Ctrl+Z\"]\n").unwrap();
        assert!(config.action_map().is_err());
    }

    #[test]
    fn effective_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.history.max_entries, config.history.max_entries);
        assert_eq!(parsed.export.filename_template, config.export.filename_template);
    }

    #[test]
    fn schema_mentions_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("keybindings"));
        assert!(schema.contains("cancel_policy"));
    }
}
