// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy word wrapping and box fitting.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use kurbo::Size;

use crate::FontSpec;

/// Marker appended to the last kept line when a label needs more lines than allowed.
pub const ELLIPSIS: char = '…';

/// Width oracle for a run of text in a given font.
///
/// Implementations must be deterministic: the same text and font always
/// yield the same width. Widths are in pixels.
pub trait TextMeasure {
    /// Returns the advance width of `text` set on one line in `font`.
    fn text_width(&self, text: &str, font: &FontSpec) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).text_width(text, font)
    }
}

/// Heuristic measurer: every character advances by `em_ratio` × font size.
///
/// Bold fonts advance slightly further. With the default ratio a 14px font
/// averages 7px per character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AverageAdvance {
    /// Average advance as a fraction of the font size.
    pub em_ratio: f64,
    /// Multiplier applied to bold (weight >= 600) fonts.
    pub bold_factor: f64,
}

impl Default for AverageAdvance {
    fn default() -> Self {
        Self {
            em_ratio: 0.5,
            bold_factor: 1.05,
        }
    }
}

impl TextMeasure for AverageAdvance {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let chars = text.chars().count() as f64;
        let weight = if font.is_bold() { self.bold_factor } else { 1.0 };
        chars * font.size * self.em_ratio * weight
    }
}

/// Limits and paddings used when fitting a label into a node box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasureConfig {
    /// Maximum width of one wrapped line.
    pub max_width: f64,
    /// Maximum number of lines kept; the rest is truncated.
    pub max_lines: usize,
    /// Height of one line.
    pub line_height: f64,
    /// Total horizontal padding (left + right).
    pub padding_x: f64,
    /// Total vertical padding (top + bottom).
    pub padding_y: f64,
    /// Width reserved for the expand/collapse affordance.
    pub toggle_width: f64,
    /// Lower clamp for the box width.
    pub min_box_width: f64,
    /// Upper clamp for the box width.
    pub max_box_width: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            max_width: 220.0,
            max_lines: 3,
            line_height: 22.0,
            padding_x: 32.0,
            padding_y: 32.0,
            toggle_width: 24.0,
            min_box_width: 180.0,
            max_box_width: 320.0,
        }
    }
}

impl MeasureConfig {
    /// Checks that every dimension is usable.
    pub fn validate(&self) -> Result<(), MeasureConfigError> {
        let dims = [
            ("max_width", self.max_width),
            ("line_height", self.line_height),
            ("padding_x", self.padding_x),
            ("padding_y", self.padding_y),
            ("toggle_width", self.toggle_width),
            ("min_box_width", self.min_box_width),
            ("max_box_width", self.max_box_width),
        ];
        for (field, value) in dims {
            if !value.is_finite() || value < 0.0 {
                return Err(MeasureConfigError::InvalidDimension { field, value });
            }
        }
        if self.max_lines == 0 {
            return Err(MeasureConfigError::ZeroMaxLines);
        }
        if self.min_box_width > self.max_box_width {
            return Err(MeasureConfigError::BoxWidthRange {
                min: self.min_box_width,
                max: self.max_box_width,
            });
        }
        Ok(())
    }
}

/// Invalid [`MeasureConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeasureConfigError {
    /// A length is negative, NaN or infinite.
    #[error("`{field}` must be finite and non-negative, got {value}")]
    InvalidDimension {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
    },
    /// At least one line must be kept.
    #[error("`max_lines` must be at least 1")]
    ZeroMaxLines,
    /// The box width clamp is inverted.
    #[error("`min_box_width` ({min}) exceeds `max_box_width` ({max})")]
    BoxWidthRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
}

/// Wrapped lines and the box that holds them.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Wrapped lines, at most [`MeasureConfig::max_lines`] of them.
    pub lines: Vec<String>,
    /// Fitted box width, clamped to the configured range.
    pub box_width: f64,
    /// `lines.len() * line_height + padding_y`.
    pub box_height: f64,
    /// Whether words were dropped to respect the line cap.
    pub truncated: bool,
}

impl Measurement {
    /// Returns the box as a [`Size`].
    #[must_use]
    pub fn box_size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }
}

/// Wraps `text` greedily and fits a box around it.
///
/// Words are separated by whitespace. A word joins the current line unless the
/// joined line would be wider than `config.max_width`; then the line closes and
/// the word starts the next one. A word wider than the limit sits alone on its
/// own line and is never split.
///
/// When more than `config.max_lines` lines result, the extra lines are dropped
/// and the last kept line ends with [`ELLIPSIS`], shedding trailing words if
/// needed to stay within `max_width`.
pub fn measure<M: TextMeasure + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    config: &MeasureConfig,
    reserve_toggle: bool,
) -> Measurement {
    let width_of = |s: &str| sanitize(measurer.text_width(s, font));

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if width_of(&candidate) > config.max_width {
            lines.push(mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    let max_lines = config.max_lines.max(1);
    let truncated = lines.len() > max_lines;
    if truncated {
        lines.truncate(max_lines);
        if let Some(last) = lines.pop() {
            lines.push(with_ellipsis(last, config.max_width, &width_of));
        }
    }

    let widest = lines.iter().map(|l| width_of(l)).fold(0.0, f64::max);
    let toggle = if reserve_toggle {
        config.toggle_width
    } else {
        0.0
    };
    let box_width = (widest + config.padding_x + toggle)
        .max(config.min_box_width)
        .min(config.max_box_width);
    let box_height = lines.len() as f64 * config.line_height + config.padding_y;

    Measurement {
        lines,
        box_width,
        box_height,
        truncated,
    }
}

fn with_ellipsis(mut line: String, max_width: f64, width_of: &impl Fn(&str) -> f64) -> String {
    loop {
        let marked = format!("{line}{ELLIPSIS}");
        if width_of(&marked) <= max_width {
            return marked;
        }
        match line.rfind(' ') {
            Some(cut) => line.truncate(cut),
            None => return marked,
        }
    }
}

fn sanitize(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}
