//! Benchmarks for canceller construction and cancellation propagation.

use cancelflow::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn canceller_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    c.bench_function("construct_and_cancel_child", |b| {
        b.iter(|| {
            let _guard = runtime.enter();
            let (canceller, cancel) = Canceller::root().with_cancel();
            cancel.cancel();
            black_box(canceller)
        })
    });

    c.bench_function("cancel_wave_chain_of_8", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let (mut node, first) = Canceller::root().with_cancel();
                for _ in 0..7 {
                    let (child, _handle) = node.with_cancel();
                    node = child;
                }
                first.cancel();
                black_box(node.cancelled().await)
            })
        })
    });
}

criterion_group!(benches, canceller_benchmark);
criterion_main!(benches);
