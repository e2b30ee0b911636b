// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for element-wise arithmetic and broadcasting.

use std::hint::black_box;

use atomic_tensor::{ops, Tensor};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64 * 0.01 + 1.0).collect()
}

fn bench_same_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("same_shape");

    for n in [16, 64, 256] {
        group.throughput(Throughput::Elements((n * n) as u64));
        let a = Tensor::new([n, n], ramp(n * n)).unwrap();
        let b = Tensor::new([n, n], ramp(n * n)).unwrap();

        group.bench_with_input(BenchmarkId::new("add", n), &n, |bench, _| {
            bench.iter(|| black_box(ops::add(&a, &b).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("div", n), &n, |bench, _| {
            bench.iter(|| black_box(ops::div(&a, &b).unwrap()));
        });
    }

    group.finish();
}

fn bench_broadcast_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_ops");

    for n in [16, 64, 256] {
        group.throughput(Throughput::Elements((n * n) as u64));
        let m = Tensor::new([n, n], ramp(n * n)).unwrap();
        let row = Tensor::new([n], ramp(n)).unwrap();
        let col = Tensor::new([n, 1], ramp(n)).unwrap();

        // Row broadcast cycles the source buffer; column broadcast goes
        // through indexed reads.
        group.bench_with_input(BenchmarkId::new("add_row", n), &n, |bench, _| {
            bench.iter(|| black_box(ops::add(&m, &row).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("add_col", n), &n, |bench, _| {
            bench.iter(|| black_box(ops::add(&m, &col).unwrap()));
        });
    }

    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");

    for n in [16, 64] {
        group.throughput(Throughput::Elements((n * n * n) as u64));
        let t = Tensor::new([n, 1], ramp(n)).unwrap();

        group.bench_with_input(BenchmarkId::new("to_tensor", n), &n, |bench, &n| {
            bench.iter(|| {
                let b = t.broadcast([n, n, n]).unwrap();
                black_box(b.to_tensor().unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_same_shape, bench_broadcast_ops, bench_materialize);
criterion_main!(benches);
