//! Configuration enum types.

use crate::draw::{Color, color::BLACK};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a name, a CSS-style string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Hex or functional notation
/// default_color = "#ff8000"
/// background_color = "rgb(250, 250, 240)"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (black, red, green, blue, yellow, magenta, cyan, orange,
    /// purple, pink, brown, white) or `#rgb`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb(r, g, b)`, `rgba(r, g, b, a)`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Unparseable strings fall back to `fallback` with a warning.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => Color::parse(name).unwrap_or_else(|err| {
                warn!("{}, using {}", err, fallback.to_hex());
                fallback
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// Converts the color specification, falling back to black.
    pub fn to_color(&self) -> Color {
        self.to_color_or(BLACK)
    }

    /// Whether the specification parses without falling back.
    pub fn is_valid(&self) -> bool {
        match self {
            ColorSpec::Name(name) => Color::parse(name).is_ok(),
            ColorSpec::Rgb(_) => true,
        }
    }
}

/// How history snapshots are stored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryCompression {
    /// Raw pixel copies
    Off,
    /// Gzip every snapshot
    On,
    /// Gzip snapshots at or above `auto_compress_threshold_bytes`
    #[default]
    Auto,
}

/// What happens to a drag abandoned by the pointer leaving the canvas.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Finish the interaction at the last tracked pointer position
    #[default]
    Commit,
    /// Drop the interaction as if it never happened
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{ORANGE, RED, WHITE};

    #[test]
    fn color_spec_variants_resolve() {
        assert_eq!(ColorSpec::Name("red".into()).to_color(), RED);
        assert_eq!(ColorSpec::Name("#FFA500".into()).to_color(), ORANGE);
        assert_eq!(ColorSpec::Rgb([255, 255, 255]).to_color(), WHITE);
    }

    #[test]
    fn invalid_color_falls_back() {
        let spec = ColorSpec::Name("not-a-color".into());
        assert!(!spec.is_valid());
        assert_eq!(spec.to_color_or(WHITE), WHITE);
    }

    #[test]
    fn enums_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Section {
            compression: HistoryCompression,
            policy: CancelPolicy,
        }
        let section: Section = toml::from_str("compression = \"on\"\npolicy = \"discard\"").unwrap();
        assert_eq!(section.compression, HistoryCompression::On);
        assert_eq!(section.policy, CancelPolicy::Discard);
    }
}
