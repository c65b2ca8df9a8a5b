//! Layout benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use layout::{Container, LayoutEngine, Rect, Size, ViewId, ViewTree};

/// A column of `rows` rows, each with a label, a stretchy spacer and a button.
fn build_list(rows: usize) -> (ViewTree, ViewId) {
    let mut tree = ViewTree::new();
    let column = tree.create_view(Container::Vertical);
    tree.set_root(column);
    tree.constraints_mut(column)
        .unwrap()
        .set_v_spacing(4.0)
        .unwrap();

    for i in 0..rows {
        let row = tree.create_view(Container::Horizontal);
        tree.append_child(column, row).unwrap();
        tree.constraints_mut(row)
            .unwrap()
            .set_h_spacing(8.0)
            .unwrap()
            .set_margin(2.0)
            .unwrap()
            .set_h_stretch_weight(1.0)
            .unwrap();

        let label = tree.create_leaf(Size::new(60.0 + (i % 7) as f32 * 10.0, 18.0));
        let spacer = tree.create_leaf(Size::ZERO);
        let button = tree.create_leaf(Size::new(48.0, 24.0));
        tree.constraints_mut(spacer).unwrap().with_pure_stretch();
        tree.constraints_mut(button)
            .unwrap()
            .set_min_width(40.0)
            .unwrap();
        tree.append_child(row, label).unwrap();
        tree.append_child(row, spacer).unwrap();
        tree.append_child(row, button).unwrap();
    }

    (tree, column)
}

fn bench_layout(c: &mut Criterion) {
    let engine = LayoutEngine::new();
    let mut group = c.benchmark_group("layout");

    for rows in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("measure", rows), &rows, |b, &rows| {
            let (tree, root) = build_list(rows);
            b.iter(|| black_box(engine.measure(&tree, root, Size::UNBOUNDED).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("arrange", rows), &rows, |b, &rows| {
            let (mut tree, root) = build_list(rows);
            b.iter(|| {
                engine
                    .arrange(&mut tree, root, Rect::new(0.0, 0.0, 480.0, 20000.0))
                    .unwrap();
                black_box(tree.get(root).map(|v| v.frame))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
