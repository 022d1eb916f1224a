// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregate configuration.

use mindmap_export::ExportConfig;
use mindmap_layout::LayoutConfig;
use mindmap_link::LinkConfig;
use mindmap_text::{FontTiers, MeasureConfig};
use mindmap_tree::{ExpansionState, MeasuredTree, NormalizeConfig};
use mindmap_view::ViewConfig;

use crate::MindMapError;
use crate::animation::Easing;

/// Timing of relayout transitions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Length of a transition in milliseconds. Zero snaps.
    pub duration_ms: f64,
    /// Progress curve.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 400.0,
            easing: Easing::EaseInOut,
        }
    }
}

/// Which nodes start out expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialExpansion {
    /// Only the root; its children are visible.
    #[default]
    Root,
    /// Nothing; only the root is visible.
    Collapsed,
    /// Every node with children.
    All,
    /// Nodes above this level, so levels `0..=n` are visible.
    Depth(u32),
}

impl InitialExpansion {
    pub(crate) fn state(self, tree: &MeasuredTree) -> ExpansionState {
        match self {
            Self::Root => ExpansionState::with_root_expanded(tree),
            Self::Collapsed => ExpansionState::new(),
            Self::All => {
                let mut state = ExpansionState::new();
                state.expand_all(tree);
                state
            }
            Self::Depth(n) => {
                let mut state = ExpansionState::new();
                state.expand_to_depth(tree, n);
                state
            }
        }
    }
}

/// Everything a [`MindMap`](crate::MindMap) can be tuned with.
///
/// Every field has a working default, so a JSON document only needs the
/// values it changes:
///
/// ```rust
/// use mindmap::{InitialExpansion, MindMapConfig};
///
/// let config = MindMapConfig::from_json_str(
///     r#"{"view":{"max_scale":4.0},"initial_expansion":{"depth":2}}"#,
/// )
/// .unwrap();
/// assert_eq!(config.view.max_scale, 4.0);
/// assert_eq!(config.initial_expansion, InitialExpansion::Depth(2));
/// assert_eq!(config.layout.level_gap, 280.0);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MindMapConfig {
    /// Label wrapping and box padding.
    pub measure: MeasureConfig,
    /// Fonts by level.
    pub fonts: FontTiers,
    /// Node placement.
    pub layout: LayoutConfig,
    /// Connector geometry.
    pub link: LinkConfig,
    /// Zoom limits and history.
    pub view: ViewConfig,
    /// Relayout transitions.
    pub animation: AnimationConfig,
    /// Image export styling.
    pub export: ExportConfig,
    /// Expansion right after a tree is loaded.
    pub initial_expansion: InitialExpansion,
    /// How far, in view pixels, a pointer may travel between press and
    /// release and still count as a click.
    pub click_tolerance: f64,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            measure: MeasureConfig::default(),
            fonts: FontTiers::default(),
            layout: LayoutConfig::default(),
            link: LinkConfig::default(),
            view: ViewConfig::default(),
            animation: AnimationConfig::default(),
            export: ExportConfig::default(),
            initial_expansion: InitialExpansion::default(),
            click_tolerance: 4.0,
        }
    }
}

impl MindMapConfig {
    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, MindMapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), MindMapError> {
        self.measure.validate()?;
        self.layout.validate()?;
        self.link.validate()?;
        self.view.validate()?;
        let d = self.animation.duration_ms;
        if !d.is_finite() || d < 0.0 {
            return Err(MindMapError::AnimationDuration(d));
        }
        if !self.click_tolerance.is_finite() || self.click_tolerance < 0.0 {
            return Err(MindMapError::ClickTolerance(self.click_tolerance));
        }
        Ok(())
    }

    pub(crate) fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            measure: self.measure,
            fonts: self.fonts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        MindMapConfig::default().validate().unwrap();
    }

    #[test]
    fn nested_errors_surface() {
        let mut config = MindMapConfig::default();
        config.view.min_scale = 5.0;
        assert!(matches!(config.validate(), Err(MindMapError::View(_))));

        let mut config = MindMapConfig::default();
        config.animation.duration_ms = -1.0;
        assert!(matches!(
            config.validate(),
            Err(MindMapError::AnimationDuration(_))
        ));
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(
            MindMapConfig::from_json_str("{"),
            Err(MindMapError::Config(_))
        ));
    }
}
