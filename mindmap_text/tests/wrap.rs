// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping behavior of `mindmap_text::measure` with the heuristic measurer.

use mindmap_text::{AverageAdvance, FontSpec, FontTiers, MeasureConfig, measure};
use proptest::prelude::*;

const LONG: &str = "A very long sentence that must wrap across several lines to fit";

#[test]
fn long_sentence_wraps_and_grows_box() {
    let config = MeasureConfig::default();
    // 14px at 0.5 em averages 7px per character.
    let font = FontSpec::new(14.0, 500);
    let measurer = AverageAdvance::default();

    let short = measure(&measurer, "Fit", &font, &config, false);
    let long = measure(&measurer, LONG, &font, &config, false);

    assert_eq!(short.lines.len(), 1);
    assert!(long.lines.len() >= 2, "got {:?}", long.lines);
    assert!(long.box_height > short.box_height);
    for line in &long.lines {
        assert!(line.chars().count() * 7 <= 220, "line too wide: {line:?}");
    }
}

#[test]
fn tiers_change_wrapping() {
    let config = MeasureConfig::default();
    let tiers = FontTiers::default();
    let measurer = AverageAdvance::default();

    let root = measure(&measurer, LONG, &tiers.for_level(0), &config, true);
    let leaf = measure(&measurer, LONG, &tiers.for_level(3), &config, false);
    assert!(root.lines.len() >= leaf.lines.len());
}

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,12}", 0..30)
}

proptest! {
    #[test]
    fn box_height_tracks_line_count(ws in words(), reserve in any::<bool>()) {
        let config = MeasureConfig::default();
        let text = ws.join(" ");
        let m = measure(&AverageAdvance::default(), &text, &FontSpec::default(), &config, reserve);

        prop_assert!(!m.lines.is_empty());
        prop_assert!(m.lines.len() <= config.max_lines);
        prop_assert_eq!(
            m.box_height,
            m.lines.len() as f64 * config.line_height + config.padding_y
        );
        prop_assert!(m.box_width >= config.min_box_width);
        prop_assert!(m.box_width <= config.max_box_width);
    }

    #[test]
    fn untruncated_wrapping_keeps_every_word(ws in words()) {
        let config = MeasureConfig { max_lines: usize::MAX, ..MeasureConfig::default() };
        let text = ws.join(" ");
        let m = measure(&AverageAdvance::default(), &text, &FontSpec::default(), &config, false);

        prop_assert!(!m.truncated);
        let rejoined: Vec<&str> = m.lines.iter().flat_map(|l| l.split_whitespace()).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        prop_assert_eq!(rejoined, original);
    }
}
