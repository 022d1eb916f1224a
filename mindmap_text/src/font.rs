// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

/// Size and weight of the font a label is measured and drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSpec {
    /// Font size in pixels.
    pub size: f64,
    /// CSS-style numeric weight (400 regular, 700 bold).
    pub weight: u16,
}

impl FontSpec {
    /// Creates a font spec from a pixel size and numeric weight.
    #[must_use]
    pub const fn new(size: f64, weight: u16) -> Self {
        Self { size, weight }
    }

    /// Returns `true` for semibold and heavier weights.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(13.0, 500)
    }
}

/// Depth-keyed font scale.
///
/// Index `n` holds the font for nodes at depth `n`; deeper nodes use the last
/// entry. The default scale is 18px/600 for the root, 16px/600 for its
/// children, 14px/500 for grandchildren and 13px/500 below that.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FontTiers {
    tiers: Vec<FontSpec>,
}

impl FontTiers {
    /// Creates a scale from explicit tiers, root first.
    ///
    /// An empty list behaves like a single [`FontSpec::default`] tier.
    #[must_use]
    pub fn new(tiers: Vec<FontSpec>) -> Self {
        Self { tiers }
    }

    /// Returns the font for a node at `level` (root = 0).
    #[must_use]
    pub fn for_level(&self, level: u32) -> FontSpec {
        let idx = usize::try_from(level).unwrap_or(usize::MAX);
        self.tiers
            .get(idx)
            .or_else(|| self.tiers.last())
            .copied()
            .unwrap_or_default()
    }

    /// Returns the configured tiers, root first.
    #[must_use]
    pub fn tiers(&self) -> &[FontSpec] {
        &self.tiers
    }
}

impl Default for FontTiers {
    fn default() -> Self {
        Self::new(vec![
            FontSpec::new(18.0, 600),
            FontSpec::new(16.0, 600),
            FontSpec::new(14.0, 500),
            FontSpec::new(13.0, 500),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_levels_reuse_last_tier() {
        let tiers = FontTiers::default();
        assert_eq!(tiers.for_level(0), FontSpec::new(18.0, 600));
        assert_eq!(tiers.for_level(2), FontSpec::new(14.0, 500));
        assert_eq!(tiers.for_level(3), tiers.for_level(40));
    }

    #[test]
    fn empty_scale_falls_back_to_default_font() {
        let tiers = FontTiers::new(Vec::new());
        assert_eq!(tiers.for_level(0), FontSpec::default());
    }

    #[test]
    fn root_tier_is_bold() {
        let tiers = FontTiers::default();
        assert!(tiers.for_level(0).is_bold());
        assert!(!tiers.for_level(5).is_bold());
    }
}
