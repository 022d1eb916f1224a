// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of the interactive map.

use kurbo::{Point, Size, Vec2};
use mindmap::{
    AnimationConfig, ImageFormat, InitialExpansion, MindMap, MindMapConfig, MindMapError,
};
use mindmap_text::{AverageAdvance, FontMetricsMeasurer};
use mindmap_tree::{RawNode, ToggleOutcome};

const VIEW: Size = Size::new(1200.0, 800.0);

fn sample() -> RawNode {
    RawNode::new("root", "Product launch").with_children([
        RawNode::new("research", "Market research").with_children([
            RawNode::new("interviews", "Customer interviews"),
            RawNode::new("survey", "Pricing survey"),
        ]),
        RawNode::new("build", "Build").with_children([
            RawNode::new("api", "Public API"),
            RawNode::new("docs", "Documentation"),
        ]),
        RawNode::new("ship", "Ship it"),
    ])
}

fn map_with(config: MindMapConfig) -> MindMap<AverageAdvance> {
    let mut map = MindMap::new(&sample(), config, AverageAdvance::default()).unwrap();
    map.render(VIEW, true);
    map
}

fn map() -> MindMap<AverageAdvance> {
    map_with(MindMapConfig::default())
}

fn snapping() -> MindMapConfig {
    MindMapConfig {
        animation: AnimationConfig {
            duration_ms: 0.0,
            ..AnimationConfig::default()
        },
        ..MindMapConfig::default()
    }
}

fn screen_center_of(map: &mut MindMap<AverageAdvance>, id: &str) -> Point {
    let frame = map.render(VIEW, false);
    let rect = frame.node(id).unwrap().rect;
    frame.transform.world_to_view(rect.center())
}

#[test]
fn toggling_root_reveals_children_in_order() {
    let raw = RawNode::new("root", "Root")
        .with_children([RawNode::new("a", "A"), RawNode::new("b", "B")]);
    let config = MindMapConfig {
        initial_expansion: InitialExpansion::Collapsed,
        ..snapping()
    };
    let mut map = MindMap::new(&raw, config, AverageAdvance::default()).unwrap();
    assert_eq!(map.visible_ids(), ["root"]);

    assert_eq!(map.toggle_node("root"), ToggleOutcome::Expanded);
    assert_eq!(map.visible_ids(), ["root", "a", "b"]);
    let frame = map.render(VIEW, false);
    let (a, b) = (frame.node("a").unwrap().rect, frame.node("b").unwrap().rect);
    assert!(a.center().y < b.center().y);
    assert!(!a.overlaps(b));
}

#[test]
fn collapse_and_reexpand_restores_remembered_children() {
    let mut map = map_with(snapping());
    map.expand_all();
    let everything = map.visible_ids().len();

    map.toggle_node("root");
    assert_eq!(map.visible_ids(), ["root"]);
    map.toggle_node("root");
    assert_eq!(map.visible_ids().len(), everything);

    map.collapse_to_root();
    map.toggle_node("root");
    map.toggle_node("root");
    assert_eq!(map.visible_ids(), ["root", "research", "build", "ship"]);
}

#[test]
fn first_render_fits_content_and_sets_history_base() {
    let mut map = map();
    let frame = map.render(VIEW, true);
    let on_screen = frame.transform.to_affine().transform_rect_bbox(frame.content_bounds);
    assert!(on_screen.x0 >= 0.0 && on_screen.x1 <= VIEW.width);
    assert!(on_screen.y0 >= 0.0 && on_screen.y1 <= VIEW.height);
    let controls = frame.controls.unwrap();
    assert!(!controls.can_undo);
    assert!(!controls.can_redo);
}

#[test]
fn zoom_buttons_are_undoable() {
    let mut map = map();
    let base = map.viewport().transform();
    assert!(map.zoom_in());
    let zoomed = map.viewport().transform();
    assert!(zoomed.scale > base.scale);

    assert!(map.undo());
    assert_eq!(map.viewport().transform(), base);
    assert!(map.redo());
    assert_eq!(map.viewport().transform(), zoomed);

    map.reset_view();
    let controls = map.render(VIEW, true).controls.unwrap();
    assert_eq!(controls.zoom_percent, 100);
    assert!(controls.can_undo);
}

#[test]
fn click_on_node_toggles_and_drag_on_canvas_pans() {
    let mut map = map_with(snapping());
    let research = screen_center_of(&mut map, "research");

    map.pointer_down(research);
    let click = map.pointer_up(research + Vec2::new(2.0, 1.0)).unwrap();
    assert_eq!(click.id, "research");
    assert_eq!(click.outcome, ToggleOutcome::Expanded);
    assert!(map.visible_ids().contains(&"interviews"));

    let before = map.viewport().transform();
    let empty = Point::new(5.0, 5.0);
    map.pointer_down(empty);
    map.pointer_move(empty + Vec2::new(100.0, 40.0));
    assert!(map.pointer_up(empty + Vec2::new(100.0, 40.0)).is_none());
    let after = map.viewport().transform();
    assert!((after.pan - before.pan - Vec2::new(100.0, 40.0)).hypot() < 1e-9);

    assert!(map.undo());
    assert_eq!(map.viewport().transform(), before);
}

#[test]
fn pressing_a_node_and_dragging_away_is_not_a_click() {
    let mut map = map_with(snapping());
    let ship = screen_center_of(&mut map, "ship");
    let before = map.viewport().transform();
    map.pointer_down(ship);
    map.pointer_move(ship + Vec2::new(30.0, 0.0));
    assert!(map.pointer_up(ship + Vec2::new(30.0, 0.0)).is_none());
    assert_eq!(map.viewport().transform(), before);
}

#[test]
fn hover_follows_the_pointer() {
    let mut map = map();
    let build = screen_center_of(&mut map, "build");
    map.pointer_move(build);
    assert_eq!(map.hovered(), Some("build"));
    assert!(map.render(VIEW, false).node("build").unwrap().hovered);
    map.pointer_leave();
    assert_eq!(map.hovered(), None);
}

#[test]
fn leaf_click_reports_without_relayout() {
    let mut map = map();
    let click = map.click_node("ship").unwrap();
    assert_eq!(click.outcome, ToggleOutcome::Unchanged);
    assert!(!map.is_animating());
    assert!(map.click_node("interviews").is_none(), "hidden node");
    assert!(map.click_node("missing").is_none());
}

#[test]
fn expanding_animates_from_parent_and_settles() {
    let mut map = map();
    let parent = map.layout().get(map.tree().find("research").unwrap()).unwrap().center;

    map.click_node("research").unwrap();
    assert!(map.is_animating());
    map.tick(1_000.0);
    let start = map.render(VIEW, false);
    let child = start.node("interviews").unwrap();
    assert!((child.rect.center() - parent).hypot() < 1e-9);
    assert_eq!(child.opacity, 0.0);

    assert!(map.tick(1_200.0));
    let mid = map.render(VIEW, false);
    let child = mid.node("interviews").unwrap();
    assert!(child.opacity > 0.0 && child.opacity < 1.0);
    assert!(mid.animating);

    assert!(!map.tick(1_400.0));
    let end = map.render(VIEW, false);
    let settled = map.layout().get(map.tree().find("interviews").unwrap()).unwrap();
    assert!((end.node("interviews").unwrap().rect.center() - settled.center).hypot() < 1e-9);
    assert_eq!(end.edges.len(), end.nodes.len() - 1);
}

#[test]
fn collapsing_mid_flight_restarts_from_current_positions() {
    let mut map = map();
    map.click_node("build").unwrap();
    map.tick(0.0);
    map.tick(200.0);
    let mid = map.render(VIEW, false).node("api").unwrap().rect.center();

    map.click_node("build").unwrap();
    map.tick(250.0);
    let restarted = map.render(VIEW, false).node("api").unwrap().rect.center();
    assert_eq!(restarted, mid);

    map.tick(650.0);
    assert!(!map.is_animating());
    assert!(map.render(VIEW, false).node("api").is_none());
}

#[test]
fn search_marks_visible_matches_only() {
    let mut map = map();
    map.expand_all();
    assert_eq!(map.search("  SURVEY "), 1);
    map.collapse_to_root();
    assert_eq!(map.search_matches("survey"), Vec::<String>::new());
    assert_eq!(map.search_matches("U"), ["root", "build"]);

    map.search("ship");
    let frame = map.render(VIEW, false);
    assert_eq!(frame.search.as_deref(), Some("ship"));
    assert!(frame.node("ship").unwrap().matched);
    assert!(frame.node("build").is_none());
    assert_eq!(map.visible_ids().len(), 4);

    map.clear_search();
    let frame = map.render(VIEW, false);
    assert!(frame.search.is_none());
    assert_eq!(frame.nodes.len(), 4);
}

#[test]
fn search_draws_only_matching_nodes() {
    let raw = RawNode::new("root", "Orchard")
        .with_children([RawNode::new("a", "Apple"), RawNode::new("b", "Banana")]);
    let mut map = MindMap::new(&raw, snapping(), AverageAdvance::default()).unwrap();
    map.render(VIEW, true);

    assert_eq!(map.search("apple"), 1);
    let frame = map.render(VIEW, false);
    let ids: Vec<&str> = frame.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["a"]);
    assert!(frame.edges.is_empty(), "the root is not drawn");
    assert_eq!(map.visible_ids(), ["root", "a", "b"]);

    let banana = frame.transform.world_to_view(
        map.layout().get(map.tree().find("b").unwrap()).unwrap().center,
    );
    map.pointer_move(banana);
    assert_eq!(map.hovered(), None, "hidden nodes cannot be hovered");

    assert_eq!(map.search("a"), 3);
    let frame = map.render(VIEW, false);
    assert_eq!(frame.nodes.len(), 3);
    assert_eq!(frame.edges.len(), 2);
}

#[test]
fn export_covers_layout_regardless_of_view() {
    let mut map = map();
    map.zoom_in();
    map.zoom_in();
    let png = map.export_image(ImageFormat::Png).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
    let svg = String::from_utf8(map.export_image(ImageFormat::Svg).unwrap()).unwrap();
    for id in ["Product launch", "Market research", "Build", "Ship it"] {
        assert!(svg.contains(id), "{id}");
    }
}

#[test]
fn export_font_adds_png_labels() {
    let mut map = map();
    let plain = map.export_image(ImageFormat::Png).unwrap();
    let font = FontMetricsMeasurer::new(
        include_bytes!("../../assets/fonts/dejavu_sans_mono/DejaVuSansMono.ttf").as_slice(),
        0,
    )
    .unwrap();
    map.set_export_font(Some(font));
    let labelled = map.export_image(ImageFormat::Png).unwrap();
    assert_eq!(&labelled[..4], b"\x89PNG");
    assert_ne!(plain, labelled);

    map.set_export_font(None);
    assert_eq!(map.export_image(ImageFormat::Png).unwrap(), plain);
}

#[test]
fn center_on_node_keeps_scale() {
    let mut map = map();
    let scale = map.viewport().scale();
    assert!(map.center_on_node("ship"));
    let center = screen_center_of(&mut map, "ship");
    assert!((center - Point::new(VIEW.width / 2.0, VIEW.height / 2.0)).hypot() < 1e-6);
    assert_eq!(map.viewport().scale(), scale);
    assert!(!map.center_on_node("interviews"));
}

#[test]
fn wheel_zoom_stays_in_range() {
    let mut map = map();
    for _ in 0..50 {
        map.wheel(-400.0, Some(Point::new(600.0, 400.0)));
    }
    assert_eq!(map.viewport().scale(), 3.0);
    for _ in 0..50 {
        map.wheel(400.0, None);
    }
    assert_eq!(map.viewport().scale(), 0.2);
}

#[test]
fn set_tree_keeps_expansion_of_surviving_ids() {
    let mut map = map_with(snapping());
    map.toggle_node("build");
    let updated = RawNode::new("root", "Product launch").with_children([
        RawNode::new("build", "Build")
            .with_children([RawNode::new("api", "Public API"), RawNode::new("sdk", "SDK")]),
        RawNode::new("support", "Support"),
    ]);
    map.set_tree(&updated);
    assert_eq!(map.visible_ids(), ["root", "build", "api", "sdk", "support"]);
    assert!(!map.is_animating());
}

#[test]
fn set_tree_during_a_drag_ends_the_pan() {
    let mut map = map_with(snapping());
    let empty = Point::new(5.0, 5.0);
    map.pointer_down(empty);
    map.pointer_move(empty + Vec2::new(60.0, 0.0));
    assert!(map.viewport().is_panning());

    map.set_tree(&sample());
    assert!(!map.viewport().is_panning());
    assert!(map.pointer_up(empty + Vec2::new(80.0, 0.0)).is_none());
}

#[test]
fn view_transform_survives_json() {
    let mut map = map();
    map.zoom_in();
    let transform = map.viewport().transform();
    let json = serde_json::to_string(&transform).unwrap();
    let back: mindmap_view::ViewTransform = serde_json::from_str(&json).unwrap();
    assert_eq!(back, transform);
}

#[test]
fn close_stops_everything() {
    let mut map = map();
    map.click_node("research").unwrap();
    map.pointer_down(Point::new(1.0, 1.0));
    map.close();

    assert!(!map.is_animating());
    assert!(!map.viewport().is_panning());
    assert!(!map.zoom_in());
    assert!(map.click_node("build").is_none());
    assert_eq!(map.toggle_node("build"), ToggleOutcome::Unchanged);
    assert!(!map.tick(10_000.0));
    assert!(matches!(
        map.export_image(ImageFormat::Png),
        Err(MindMapError::Closed)
    ));
}

#[test]
fn invalid_configuration_fails_construction() {
    let mut config = MindMapConfig::default();
    config.layout.damping = 2.0;
    let err = MindMap::new(&sample(), config, AverageAdvance::default()).unwrap_err();
    assert!(matches!(err, MindMapError::Layout(_)));

    let err = MindMap::from_json("{not json", MindMapConfig::default(), AverageAdvance::default())
        .unwrap_err();
    assert!(matches!(err, MindMapError::Tree(_)));
}
