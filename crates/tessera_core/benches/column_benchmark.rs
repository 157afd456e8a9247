//! # Component Column Benchmark
//!
//! Raw column throughput: amortized push, swap-remove and migration
//! between two columns.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tessera_core::{ComponentArray, ComponentOps};

const ELEMENT_COUNT: usize = 100_000;

#[derive(Clone, Copy)]
struct Transform {
    position: [f32; 3],
    rotation: [f32; 4],
}

fn filled(count: usize) -> ComponentArray {
    let mut column = ComponentArray::new(ComponentOps::of::<Transform>());
    for n in 0..count {
        let t = n as f32;
        let _ = column.push(Transform {
            position: [t, t, t],
            rotation: [0.0, 0.0, 0.0, 1.0],
        });
    }
    column
}

fn bench_push(c: &mut Criterion) {
    c.bench_function("column_push_100k", |b| {
        b.iter(|| black_box(filled(ELEMENT_COUNT).len()));
    });
}

fn bench_erase(c: &mut Criterion) {
    c.bench_function("column_erase_front_100k", |b| {
        b.iter_batched(
            || filled(ELEMENT_COUNT),
            |mut column| {
                while !column.is_empty() {
                    let _ = column.erase(0);
                }
                column
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_transfer(c: &mut Criterion) {
    c.bench_function("column_transfer_100k", |b| {
        b.iter_batched(
            || (filled(ELEMENT_COUNT), ComponentArray::new(ComponentOps::of::<Transform>())),
            |(mut source, mut target)| {
                while !source.is_empty() {
                    let _ = source.transfer_index_to_end_of(0, &mut target);
                }
                target
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_iterate(c: &mut Criterion) {
    let column = filled(ELEMENT_COUNT);
    c.bench_function("column_iterate_100k", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            if let Ok(slice) = column.as_slice::<Transform>() {
                for transform in slice {
                    sum += transform.position[0] * transform.rotation[3];
                }
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_push, bench_erase, bench_transfer, bench_iterate);
criterion_main!(benches);
