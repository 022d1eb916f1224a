// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindmap Text: measuring and wrapping node labels into fitted boxes.
//!
//! Every node of a mind map is drawn as a box holding up to a few lines of
//! wrapped text. This crate answers one question for the layout engine: given
//! a label, a font, and the wrapping limits, which lines does the label break
//! into, and how large is the box that holds them?
//!
//! The crate does **not** shape text or rasterize glyphs. Width queries go
//! through the [`TextMeasure`] trait so the backend can be swapped:
//! - [`AverageAdvance`] estimates widths from a per-em average advance and
//!   needs no font data. It is deterministic and is what tests use.
//! - `FontMetricsMeasurer` (behind the `font` feature) sums real horizontal
//!   advances from font bytes using Skrifa.
//!
//! ## Minimal example
//!
//! ```rust
//! use mindmap_text::{AverageAdvance, FontSpec, MeasureConfig, measure};
//!
//! let config = MeasureConfig::default();
//! let font = FontSpec::new(14.0, 500);
//! let m = measure(
//!     &AverageAdvance::default(),
//!     "A very long sentence that must wrap across several lines to fit",
//!     &font,
//!     &config,
//!     false,
//! );
//! assert!(m.lines.len() >= 2);
//! assert!(m.box_width <= config.max_box_width);
//! ```
//!
//! ## Font tiers
//!
//! Mind maps render the root larger and bolder than deep descendants.
//! [`FontTiers`] maps a node depth to a [`FontSpec`]; depths past the last
//! tier reuse the last one.
//!
//! This crate is `no_std` + `alloc`.

#![no_std]

extern crate alloc;

mod font;
mod measure;
#[cfg(feature = "font")]
mod metrics;

pub use font::{FontSpec, FontTiers};
pub use measure::{
    AverageAdvance, ELLIPSIS, MeasureConfig, MeasureConfigError, Measurement, TextMeasure, measure,
};
#[cfg(feature = "font")]
pub use metrics::{FontError, FontMetricsMeasurer};
