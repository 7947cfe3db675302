//! Frame codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recordlog_bench::utils::random_data;
use recordlog_codec::{decode_header, encode_frame, put_varint, read_varint};

/// Benchmark varint encoding across prefix widths.
fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    for value in [0i64, -1, 300, 1 << 20, i64::MAX, i64::MIN].iter() {
        group.bench_with_input(BenchmarkId::new("encode", value), value, |b, &value| {
            let mut buf = Vec::with_capacity(16);
            b.iter(|| {
                buf.clear();
                black_box(put_varint(&mut buf, black_box(value)));
            });
        });

        let mut encoded = Vec::new();
        put_varint(&mut encoded, *value);
        group.bench_with_input(BenchmarkId::new("decode", value), &encoded, |b, encoded| {
            b.iter(|| {
                let result = read_varint(black_box(encoded)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark whole-frame encoding.
fn bench_encode_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");

    for size in [0, 64, 1024, 64 * 1024].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data = random_data(size);
            b.iter(|| {
                let frame = encode_frame(black_box(&data));
                black_box(frame);
            });
        });
    }

    group.finish();
}

/// Benchmark header decoding.
fn bench_decode_header(c: &mut Criterion) {
    let frame = encode_frame(&random_data(64 * 1024));

    c.bench_function("decode_header", |b| {
        b.iter(|| {
            let header = decode_header(black_box(&frame)).unwrap();
            black_box(header);
        });
    });
}

criterion_group!(benches, bench_varint, bench_encode_frame, bench_decode_header);
criterion_main!(benches);
