//! Scorer and filter micro-benchmarks.
//!
//! Run with: `cargo bench`
//! Save baseline: `cargo bench -- --save-baseline main`
//! Compare: `cargo bench -- --baseline main`

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use fzsel::{Mode, filter, score};

fn bench_score(c: &mut Criterion) {
    c.bench_function("score_dna", |b| {
        b.iter(|| score(black_box("TACGGGCCCGCTA"), black_box("TAGCCCTA")))
    });

    c.bench_function("score_path", |b| {
        b.iter(|| {
            score(
                black_box("src/finder/session_state_manager.rs"),
                black_box("fsess"),
            )
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    // Synthetic path-like labels, the common host workload.
    let labels: Vec<String> = (0..10_000)
        .map(|i| format!("src/module_{}/file_{}.rs", i % 100, i))
        .collect();

    let mut group = c.benchmark_group("filter");
    group.bench_function("10k_labels_short_query", |b| {
        b.iter(|| filter(black_box("mod"), Mode::Smart, &labels))
    });
    group.bench_function("10k_labels_sparse_query", |b| {
        b.iter(|| filter(black_box("sm7fr"), Mode::Smart, &labels))
    });
    group.bench_function("10k_labels_empty_query", |b| {
        b.iter(|| filter(black_box(""), Mode::Smart, &labels))
    });
    group.finish();
}

criterion_group!(benches, bench_score, bench_filter);
criterion_main!(benches);
