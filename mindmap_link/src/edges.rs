// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connectors for a whole layout, plus pointer hit testing.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, ParamCurveExtrema, ParamCurveNearest, Point, Rect};
use mindmap_layout::LayoutResult;
use mindmap_tree::NodeIndex;
use tracing::warn;

use crate::{CurveSpec, LinkConfig, build_curve};

/// A connector between a visible parent and a visible child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Parent node.
    pub source: NodeIndex,
    /// Child node.
    pub target: NodeIndex,
    /// Curve geometry in world coordinates.
    pub curve: CurveSpec,
}

impl Edge {
    /// The visible path.
    #[must_use]
    pub fn path(&self) -> BezPath {
        self.curve.to_path()
    }

    /// The pointer-hit path.
    ///
    /// It has the same geometry as [`Edge::path`] and is meant to be stroked
    /// with [`LinkConfig::hit_width`] and no paint.
    #[must_use]
    pub fn hit_path(&self) -> BezPath {
        self.curve.to_path()
    }

    /// Distance from `pt` to the curve's centerline.
    #[must_use]
    pub fn distance_to(&self, pt: Point) -> f64 {
        self.curve.to_cubic().nearest(pt, 1e-3).distance_sq.sqrt()
    }

    /// Tight bounds of the curve.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.curve.to_cubic().bounding_box()
    }
}

/// Every connector of one layout.
#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
    edges: Vec<Edge>,
    hit_width: f64,
}

impl EdgeSet {
    /// Builds one connector per layout edge.
    ///
    /// Edges whose endpoints are missing from `layout` or whose geometry is
    /// not finite are skipped.
    #[must_use]
    pub fn build(layout: &LayoutResult, config: &LinkConfig) -> Self {
        let orientation = layout.orientation();
        let edges = layout
            .edges()
            .iter()
            .filter_map(|e| {
                let (parent, child) = (layout.get(e.parent)?, layout.get(e.child)?);
                let curve = build_curve(parent.rect(), child.rect(), orientation, config);
                if curve.is_none() {
                    warn!(
                        source = %parent.id,
                        target = %child.id,
                        "skipping edge with non-finite geometry"
                    );
                }
                Some(Edge {
                    source: e.parent,
                    target: e.child,
                    curve: curve?,
                })
            })
            .collect();
        Self {
            edges,
            hit_width: config.hit_width,
        }
    }

    /// The connectors, in layout order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if there are no connectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Connector whose hit stroke covers `pt`, growing the stroke by
    /// `tolerance` on each side. The nearest one wins.
    #[must_use]
    pub fn edge_at(&self, pt: Point, tolerance: f64) -> Option<&Edge> {
        let limit = self.hit_width / 2.0 + tolerance;
        let mut best: Option<(&Edge, f64)> = None;
        for edge in &self.edges {
            if !edge.bounds().inflate(limit, limit).contains(pt) {
                continue;
            }
            let dist = edge.distance_to(pt);
            if dist <= limit && best.is_none_or(|(_, d)| dist < d) {
                best = Some((edge, dist));
            }
        }
        best.map(|(edge, _)| edge)
    }

    /// The connector into `target`, if it is drawn.
    #[must_use]
    pub fn edge_into(&self, target: NodeIndex) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == target)
    }

    /// Union of all connector bounds, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.edges.iter().map(Edge::bounds).reduce(|a, b| a.union(b))
    }
}
