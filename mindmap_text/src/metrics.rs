// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph-advance measurement from font bytes.

use alloc::vec::Vec;

use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::{FontRef, MetadataProvider};

use crate::{FontSpec, TextMeasure};

/// Font data could not be used for measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// The bytes are not a font, or `index` is past the end of a collection.
    #[error("font data at index {index} could not be parsed")]
    Parse {
        /// Requested face index.
        index: u32,
    },
}

/// Measures text by summing nominal glyph advances from a font file.
///
/// There is no shaping: each character maps through the font's `cmap` and
/// contributes its horizontal advance at the requested size. Characters the
/// font lacks advance by 0.6 em. Variation axes stay at their defaults, so
/// [`FontSpec::weight`] does not change the result.
#[derive(Clone)]
pub struct FontMetricsMeasurer {
    data: Vec<u8>,
    index: u32,
}

impl core::fmt::Debug for FontMetricsMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontMetricsMeasurer")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontMetricsMeasurer {
    /// Wraps font bytes, checking that face `index` parses.
    pub fn new(data: impl Into<Vec<u8>>, index: u32) -> Result<Self, FontError> {
        let data = data.into();
        FontRef::from_index(&data, index).map_err(|_| FontError::Parse { index })?;
        Ok(Self { data, index })
    }

    /// Returns the raw font bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the face index inside the font data.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl TextMeasure for FontMetricsMeasurer {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "font sizes comfortably fit in f32"
    )]
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let px = font.size as f32;
        let fallback = px * 0.6;
        let Ok(font_ref) = FontRef::from_index(&self.data, self.index) else {
            return f64::from(fallback) * text.chars().count() as f64;
        };
        let charmap = font_ref.charmap();
        let metrics = GlyphMetrics::new(&font_ref, Size::new(px), LocationRef::default());
        let width: f32 = text
            .chars()
            .map(|ch| {
                charmap
                    .map(ch)
                    .and_then(|gid| metrics.advance_width(gid))
                    .unwrap_or(fallback)
            })
            .sum();
        f64::from(width)
    }
}
