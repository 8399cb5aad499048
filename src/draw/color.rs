//! RGBA color type, palette constants and CSS-style color parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use sketchboard::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// assert_eq!(Color::parse("#ff0000").unwrap(), red);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}'")]
pub struct ParseColorError(pub String);

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    /// Converts to 8-bit straight (non-premultiplied) RGBA channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// Returns the same color with full opacity.
    pub fn opaque(self) -> Self {
        Self { a: 1.0, ..self }
    }

    /// Whether the alpha channel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Parses a color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` (alpha in 0.0-1.0) and the palette names understood
    /// by [`crate::util::name_to_color`].
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let trimmed = input.trim();
        let err = || ParseColorError(input.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body, lower.starts_with("rgba(")).ok_or_else(err);
        }

        crate::util::name_to_color(trimmed).ok_or_else(err)
    }

    /// Formats the color as `#rrggbb`, or `#rrggbbaa` when translucent.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::from_rgb8(
                channels.next()??,
                channels.next()??,
                channels.next()??,
            ))
        }
        6 => Some(Color::from_rgb8(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Some(Color::from_rgba8(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn parse_functional(body: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse::<u8>().ok()?;
    }

    let alpha = if with_alpha {
        let a = parts[3].parse::<f64>().ok()?;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }
        a
    } else {
        1.0
    };

    Some(Color {
        a: alpha,
        ..Color::from_rgb8(rgb[0], rgb[1], rgb[2])
    })
}

// ============================================================================
// Predefined Color Constants (toolbar palette)
// ============================================================================

/// Predefined black color (#000000)
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined red color (#FF0000)
pub const RED: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined green color (#00FF00)
pub const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined blue color (#0000FF)
pub const BLUE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined yellow color (#FFFF00)
pub const YELLOW: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined magenta color (#FF00FF)
pub const MAGENTA: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined cyan color (#00FFFF)
pub const CYAN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined orange color (#FFA500)
pub const ORANGE: Color = Color {
    r: 1.0,
    g: 165.0 / 255.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined purple color (#800080)
pub const PURPLE: Color = Color {
    r: 128.0 / 255.0,
    g: 0.0,
    b: 128.0 / 255.0,
    a: 1.0,
};

/// Predefined pink color (#FFC0CB)
pub const PINK: Color = Color {
    r: 1.0,
    g: 192.0 / 255.0,
    b: 203.0 / 255.0,
    a: 1.0,
};

/// Predefined brown color (#A52A2A)
pub const BROWN: Color = Color {
    r: 165.0 / 255.0,
    g: 42.0 / 255.0,
    b: 42.0 / 255.0,
    a: 1.0,
};

/// Predefined white color (#FFFFFF)
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Fully transparent color, the resting state of the preview layer
pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// The toolbar palette in display order.
pub const PALETTE: [Color; 12] = [
    BLACK, RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN, ORANGE, PURPLE, PINK, BROWN, WHITE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#000000").unwrap(), BLACK);
        assert_eq!(Color::parse("#FFF").unwrap(), WHITE);
        assert_eq!(Color::parse("#FFA500").unwrap().to_rgba8(), [255, 165, 0, 255]);
        assert_eq!(Color::parse("#ff000080").unwrap().to_rgba8(), [255, 0, 0, 128]);
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(Color::parse("rgb(0, 0, 255)").unwrap(), BLUE);
        let translucent = Color::parse("rgba(255, 0, 0, 0.5)").unwrap();
        assert_eq!(translucent.r, 1.0);
        assert_eq!(translucent.a, 0.5);
        assert!(Color::parse("rgba(255, 0, 0)").is_err());
        assert!(Color::parse("rgb(256, 0, 0)").is_err());
        assert!(Color::parse("rgba(1, 2, 3, 1.5)").is_err());
    }

    #[test]
    fn parses_palette_names() {
        assert_eq!(Color::parse("Red").unwrap(), RED);
        assert_eq!(Color::parse(" purple ").unwrap(), PURPLE);
        assert_eq!(
            Color::parse("chartreuse"),
            Err(ParseColorError("chartreuse".to_string()))
        );
    }

    #[test]
    fn hex_formatting_drops_opaque_alpha() {
        assert_eq!(ORANGE.to_hex(), "#ffa500");
        assert_eq!(Color::from_rgba8(1, 2, 3, 4).to_hex(), "#01020304");
    }
}
