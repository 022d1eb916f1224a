// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input generators shared by the benchmarks.

use mindmap_tree::RawNode;

/// Small deterministic generator so runs are comparable.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    /// Seeds the generator.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next value in `0..upper_exclusive`.
    pub fn below(&mut self, upper_exclusive: usize) -> usize {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        if upper_exclusive == 0 {
            0
        } else {
            ((self.0 >> 32) as usize) % upper_exclusive
        }
    }
}

const WORDS: &[&str] = &[
    "plan", "research", "customer", "pricing", "launch", "roadmap", "risk", "hiring", "budget",
    "marketing", "support", "metrics", "design", "review", "partners",
];

/// A tree of exactly `nodes` nodes where every parent has at most
/// `max_fanout` children. Labels are two to eight words long.
pub fn random_tree(nodes: usize, max_fanout: usize, seed: u64) -> RawNode {
    let mut rng = Lcg::new(seed);
    let label = |rng: &mut Lcg| {
        let words = 2 + rng.below(7);
        (0..words)
            .map(|_| WORDS[rng.below(WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ")
    };

    // Parent of each node, assigned breadth-first.
    let mut parents: Vec<Option<usize>> = vec![None];
    let mut open = 0;
    while parents.len() < nodes.max(1) {
        let fanout = 1 + rng.below(max_fanout.max(1));
        for _ in 0..fanout {
            if parents.len() == nodes {
                break;
            }
            parents.push(Some(open));
        }
        open += 1;
    }

    let mut built: Vec<Option<RawNode>> = (0..parents.len())
        .map(|i| Some(RawNode::new(format!("n{i}"), label(&mut rng))))
        .collect();
    for i in (1..parents.len()).rev() {
        let (Some(parent), Some(child)) = (parents[i], built[i].take()) else {
            continue;
        };
        if let Some(node) = built[parent].as_mut() {
            node.children.insert(0, child);
        }
    }
    built[0].take().unwrap_or_else(|| RawNode::new("n0", "root"))
}
