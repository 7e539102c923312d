//! Criterion benchmarks for whole-buffer compress/decompress.
//!
//! Run with:
//!   cargo bench --bench throughput

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shufflock::{compress, decompress, max_overhead_for, Compressor, Context};

fn synthetic(nbytes: usize) -> Vec<u8> {
    let mut buf = vec![0u8; nbytes];
    for (i, b) in buf.iter_mut().enumerate() {
        *b = ((i * 37 + i / 8) % 256) as u8;
    }
    buf
}

fn bench_compress_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_decompress");

    for &nbytes in &[65_536usize, 1_048_576, 8 * 1_048_576] {
        let src = synthetic(nbytes);

        for &compressor in &[Compressor::BloscLz, Compressor::Lz4, Compressor::Zlib] {
            let ctx = Context::new(compressor, 5, 8, true).unwrap();
            let mut dest = vec![0u8; nbytes + max_overhead_for(nbytes)];

            group.throughput(Throughput::Bytes(nbytes as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("compress/{}", compressor.name()), nbytes),
                &src,
                |b, src| {
                    b.iter(|| compress(&ctx, src, &mut dest).unwrap());
                },
            );

            let cbytes = compress(&ctx, &src, &mut dest).unwrap();
            let compressed = dest[..cbytes].to_vec();
            let mut out = vec![0u8; nbytes];

            group.throughput(Throughput::Bytes(nbytes as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("decompress/{}", compressor.name()), nbytes),
                &compressed,
                |b, compressed| {
                    b.iter(|| decompress(compressed, &mut out, 1).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_scaling");
    let nbytes = 32 * 1_048_576;
    let src = synthetic(nbytes);

    for &numthreads in &[1usize, 2, 4, 8] {
        let ctx = Context::new(Compressor::BloscLz, 5, 8, true)
            .unwrap()
            .with_numthreads(numthreads);
        let mut dest = vec![0u8; nbytes + max_overhead_for(nbytes)];

        group.throughput(Throughput::Bytes(nbytes as u64));
        group.bench_with_input(
            BenchmarkId::new("compress", numthreads),
            &src,
            |b, src| {
                b.iter(|| compress(&ctx, src, &mut dest).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compress_decompress, bench_thread_scaling);
criterion_main!(benches);
