// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement with real glyph advances.

use mindmap_text::{FontMetricsMeasurer, FontSpec, MeasureConfig, TextMeasure, measure};

const MONO: &[u8] = include_bytes!("../../assets/fonts/dejavu_sans_mono/DejaVuSansMono.ttf");

/// Every DejaVu Sans Mono glyph advances by 1233 of 2048 units per em.
fn advance(px: f64) -> f64 {
    px * 1233.0 / 2048.0
}

fn mono() -> FontMetricsMeasurer {
    FontMetricsMeasurer::new(MONO, 0).unwrap()
}

#[test]
fn widths_follow_glyph_advances() {
    let measurer = mono();
    let font = FontSpec::new(20.0, 400);
    assert!((measurer.text_width("Hello", &font) - 5.0 * advance(20.0)).abs() < 1e-3);
    assert!((measurer.text_width("a b", &font) - 3.0 * advance(20.0)).abs() < 1e-3);
    assert_eq!(measurer.text_width("", &font), 0.0);
}

#[test]
fn widths_scale_with_font_size() {
    let measurer = mono();
    let small = measurer.text_width("Mind map", &FontSpec::new(10.0, 400));
    let large = measurer.text_width("Mind map", &FontSpec::new(30.0, 400));
    assert!((large - 3.0 * small).abs() < 1e-3);
}

#[test]
fn weight_does_not_change_width() {
    let measurer = mono();
    let regular = measurer.text_width("Weight", &FontSpec::new(16.0, 400));
    let bold = measurer.text_width("Weight", &FontSpec::new(16.0, 700));
    assert_eq!(regular, bold);
}

#[test]
fn wrapping_uses_font_advances() {
    let measurer = mono();
    let config = MeasureConfig::default();
    // 14 columns fit in 220px at 20px, 19 do not.
    let m = measure(
        &measurer,
        "aaaa bbbb cccc dddd eeee",
        &FontSpec::new(20.0, 400),
        &config,
        false,
    );
    assert_eq!(m.lines, ["aaaa bbbb cccc", "dddd eeee"]);
    assert!(!m.truncated);
    let expected = 14.0 * advance(20.0) + config.padding_x;
    assert!((m.box_width - expected).abs() < 1e-3);
    assert_eq!(m.box_height, 2.0 * config.line_height + config.padding_y);
}

#[test]
fn data_and_index_are_kept() {
    let measurer = mono();
    assert_eq!(measurer.data().len(), MONO.len());
    assert_eq!(measurer.index(), 0);
}
