// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use mindmap::{MindMap, MindMapConfig};
use mindmap_benches::random_tree;
use mindmap_text::AverageAdvance;

const VIEW: Size = Size::new(1280.0, 800.0);

fn fresh_map() -> MindMap<AverageAdvance> {
    let mut map = MindMap::new(
        &random_tree(120, 4, 42),
        MindMapConfig::default(),
        AverageAdvance::default(),
    )
    .unwrap();
    map.render(VIEW, true);
    map
}

fn bench_toggle(c: &mut Criterion) {
    c.bench_function("mindmap/toggle_root_child", |b| {
        b.iter_batched(
            fresh_map,
            |mut map| {
                black_box(map.toggle_node("n1"));
                map
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_animated_frame(c: &mut Criterion) {
    c.bench_function("mindmap/animated_frame", |b| {
        b.iter_batched(
            || {
                let mut map = fresh_map();
                map.expand_all();
                map.tick(0.0);
                map
            },
            |mut map| {
                map.tick(200.0);
                black_box(map.render(VIEW, false));
                map
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_settled_frame(c: &mut Criterion) {
    let mut map = fresh_map();
    map.expand_all();
    map.tick(0.0);
    map.tick(1_000.0);
    c.bench_function("mindmap/settled_frame", |b| {
        b.iter(|| black_box(map.render(VIEW, false)));
    });
}

criterion_group!(benches, bench_toggle, bench_animated_frame, bench_settled_frame);
criterion_main!(benches);
