// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mindmap_benches::random_tree;
use mindmap_layout::{LayoutConfig, TreeLayout};
use mindmap_link::{EdgeSet, LinkConfig};
use mindmap_text::AverageAdvance;
use mindmap_tree::{ExpansionState, NormalizeConfig, normalize};

const SIZES: [usize; 4] = [30, 120, 500, 2_000];

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let config = NormalizeConfig::default();
    let measurer = AverageAdvance::default();
    for nodes in SIZES {
        let raw = random_tree(nodes, 5, 0x5eed);
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &raw, |b, raw| {
            b.iter(|| black_box(normalize(raw, &config, &measurer)));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/all_expanded");
    let engine = TreeLayout::new(LayoutConfig::default()).unwrap();
    for nodes in SIZES {
        let tree = normalize(
            &random_tree(nodes, 5, 0x5eed),
            &NormalizeConfig::default(),
            &AverageAdvance::default(),
        );
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        let visible = state.visible_nodes(&tree);
        group.throughput(Throughput::Elements(nodes as u64));

        group.bench_with_input(BenchmarkId::new("tidy", nodes), &visible, |b, visible| {
            b.iter(|| black_box(engine.layout(&tree, visible)));
        });

        let result = engine.layout(&tree, &visible);
        group.bench_with_input(BenchmarkId::new("edges", nodes), &result, |b, result| {
            b.iter(|| black_box(EdgeSet::build(result, &LinkConfig::default())));
        });
    }
    group.finish();
}

fn bench_skewed(c: &mut Criterion) {
    // Wide fan-out with long labels stresses collision resolution.
    let mut group = c.benchmark_group("layout/wide");
    let engine = TreeLayout::new(LayoutConfig::default()).unwrap();
    for fanout in [8_usize, 32] {
        let tree = normalize(
            &random_tree(400, fanout, 7),
            &NormalizeConfig::default(),
            &AverageAdvance::default(),
        );
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        let visible = state.visible_nodes(&tree);
        group.bench_with_input(BenchmarkId::from_parameter(fanout), &visible, |b, visible| {
            b.iter(|| black_box(engine.layout(&tree, visible)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_layout, bench_skewed);
criterion_main!(benches);
