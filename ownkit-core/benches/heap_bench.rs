#[macro_use]
extern crate criterion;

use criterion::Criterion;

use ownkit_core::alloc::{BucketHeap, SearchPolicy};

fn bench_heap_allocate_free(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_heap_churn");

    for policy in [SearchPolicy::LinearScan, SearchPolicy::FreeStack] {
        for block_count in [16, 256, 4096] {
            group.throughput(criterion::Throughput::Elements(block_count as u64));
            group.bench_function(format!("{}_{}", policy, block_count), |b| {
                let mut heap = BucketHeap::with_policy(block_count, 64, policy).unwrap();
                let mut handles = Vec::with_capacity(block_count);
                b.iter(|| {
                    while let Ok(handle) = heap.allocate(64) {
                        handles.push(handle);
                    }
                    for handle in handles.drain(..) {
                        heap.free(handle);
                    }
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_heap_allocate_free);
criterion_main!(benches);
