// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging around the collision-resolution budget.

use mindmap_layout::{LayoutConfig, TreeLayout};
use mindmap_text::AverageAdvance;
use mindmap_tree::{ExpansionState, NormalizeConfig, RawNode, normalize};
use tracing_test::traced_test;

fn crowded() -> (mindmap_tree::MeasuredTree, Vec<mindmap_tree::NodeIndex>) {
    let raw = RawNode::new("root", "Root").with_children(
        (0..12).map(|i| RawNode::new(format!("c{i}"), "a label long enough to wrap over several lines")),
    );
    let tree = normalize(&raw, &NormalizeConfig::default(), &AverageAdvance::default());
    let mut state = ExpansionState::new();
    state.expand_all(&tree);
    let visible = state.visible_nodes(&tree);
    (tree, visible)
}

#[traced_test]
#[test]
fn hitting_the_iteration_cap_warns_and_still_separates() {
    let (tree, visible) = crowded();
    let layout = TreeLayout::new(LayoutConfig {
        max_iterations: 1,
        damping: 0.1,
        ..LayoutConfig::default()
    })
    .unwrap();
    let result = layout.layout(&tree, &visible);

    assert!(!result.diagnostics().converged);
    assert!(logs_contain("collision resolution did not converge"));

    let nodes = result.nodes();
    for pair in nodes[1..].windows(2) {
        assert!(
            pair[1].rect().y0 - pair[0].rect().y1 >= LayoutConfig::default().min_gap - 1e-6,
            "the sweep leaves no overlap behind"
        );
    }
}

#[traced_test]
#[test]
fn default_budget_converges_quietly() {
    let (tree, visible) = crowded();
    let result = TreeLayout::default().layout(&tree, &visible);
    assert!(result.diagnostics().converged);
    assert!(!logs_contain("did not converge"));
}
