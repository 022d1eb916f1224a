// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export styling.

use peniko::Color;

/// Fill and border for nodes on one level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelStyle {
    /// Box fill.
    #[cfg_attr(feature = "serde", serde(with = "hex"))]
    pub fill: Color,
    /// Box outline.
    #[cfg_attr(feature = "serde", serde(with = "hex"))]
    pub border: Color,
}

impl LevelStyle {
    /// Creates a style from two colors.
    #[must_use]
    pub const fn new(fill: Color, border: Color) -> Self {
        Self { fill, border }
    }
}

/// Colors, strokes, and limits for exported images.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportConfig {
    /// Canvas color behind everything.
    #[cfg_attr(feature = "serde", serde(with = "hex"))]
    pub background: Color,
    /// Connector color.
    #[cfg_attr(feature = "serde", serde(with = "hex"))]
    pub edge_color: Color,
    /// Connector stroke width in world units.
    pub edge_width: f64,
    /// Node styles by level; deeper levels reuse the last entry.
    pub levels: Vec<LevelStyle>,
    /// Label color.
    #[cfg_attr(feature = "serde", serde(with = "hex"))]
    pub text_color: Color,
    /// Node outline width in world units.
    pub border_width: f64,
    /// Node corner radius in world units.
    pub corner_radius: f64,
    /// Empty space around the content in world units.
    pub margin: f64,
    /// Output pixels per world unit.
    pub scale: f64,
    /// Largest allowed width or height of the output, in pixels.
    pub max_dimension: u32,
}

const SLATE_800: Color = Color::from_rgb8(0x2d, 0x37, 0x48);
const SLATE_700: Color = Color::from_rgb8(0x4a, 0x55, 0x68);
const SLATE_600: Color = Color::from_rgb8(0x71, 0x80, 0x96);
const SLATE_400: Color = Color::from_rgb8(0xa0, 0xae, 0xc0);

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0xf8, 0xfa, 0xfc),
            edge_color: Color::from_rgb8(0xcb, 0xd5, 0xe0),
            edge_width: 2.0,
            levels: vec![
                LevelStyle::new(SLATE_800, SLATE_700),
                LevelStyle::new(SLATE_700, SLATE_600),
                LevelStyle::new(SLATE_600, SLATE_400),
            ],
            text_color: Color::WHITE,
            border_width: 2.0,
            corner_radius: 12.0,
            margin: 40.0,
            scale: 1.0,
            max_dimension: 8192,
        }
    }
}

impl ExportConfig {
    /// Style for nodes at `level`.
    #[must_use]
    pub fn level_style(&self, level: u32) -> LevelStyle {
        let fallback = LevelStyle::new(SLATE_600, SLATE_400);
        usize::try_from(level)
            .ok()
            .and_then(|i| self.levels.get(i))
            .or(self.levels.last())
            .copied()
            .unwrap_or(fallback)
    }
}

/// Formats a color as `#rrggbb`, or `#rrggbbaa` when not opaque.
#[must_use]
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Parses `#rgb`, `#rrggbb`, or `#rrggbbaa`.
#[must_use]
pub fn parse_hex(text: &str) -> Option<Color> {
    let digits = text.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    match digits.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(digits.get(i..=i)?, 16).ok().map(|v| v * 17);
            Some(Color::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// Splits a color into an SVG paint string and an opacity.
pub(crate) fn color_to_svg(color: Color) -> (String, f32) {
    let rgba = color.to_rgba8();
    let a = f32::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

#[cfg(feature = "serde")]
mod hex {
    use peniko::Color;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_hex(&text).ok_or_else(|| D::Error::custom(format!("invalid color {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_opaque_and_translucent() {
        assert_eq!(to_hex(Color::from_rgb8(0xf8, 0xfa, 0xfc)), "#f8fafc");
        let c = parse_hex("#11223380").unwrap();
        assert_eq!(to_hex(c), "#11223380");
        assert_eq!(parse_hex("#fff"), Some(Color::WHITE));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for bad in ["", "fff", "#ff", "#gggggg", "#12345", "#ééé"] {
            assert_eq!(parse_hex(bad), None, "{bad}");
        }
    }

    #[test]
    fn deep_levels_reuse_last_style() {
        let config = ExportConfig::default();
        assert_eq!(config.level_style(0).fill, SLATE_800);
        assert_eq!(config.level_style(7), config.level_style(2));
        let empty = ExportConfig {
            levels: Vec::new(),
            ..ExportConfig::default()
        };
        assert_eq!(empty.level_style(0).fill, SLATE_600);
    }
}
