//! Criterion benchmarks for the rovlink codec.
//!
//! Run with: cargo bench

use bytemuck::{Pod, Zeroable};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rovlink::{frame_size, packet_set, MemoryPool, Packet, PacketSet, Parser, Serializer};

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Imu {
    gyro: [f32; 3],
    accel: [f32; 3],
    mag: [f32; 3],
}

impl Packet for Imu {
    const CMD: u16 = 0x0501;
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Odometry {
    x: f64,
    y: f64,
    heading: f32,
}

impl Packet for Odometry {
    const CMD: u16 = 0x0502;
}

packet_set! {
    struct BenchLink {
        Imu,
        Odometry,
    }
}

type BenchParser = Parser<BenchLink, { BenchLink::POOL_SIZE }, { BenchLink::RING_SIZE }>;

fn imu_sample() -> Imu {
    Imu {
        gyro: [0.01, -0.02, 0.03],
        accel: [0.0, 0.0, 9.81],
        mag: [22.0, 5.0, -43.0],
    }
}

fn bench_serialize(c: &mut Criterion) {
    let mut serializer = Serializer::<BenchLink>::new();
    let mut buf = [0u8; frame_size::<Imu>()];
    let imu = imu_sample();

    let mut group = c.benchmark_group("serialize");
    group.throughput(Throughput::Bytes(frame_size::<Imu>() as u64));
    group.bench_function("imu_frame", |b| {
        b.iter(|| {
            let written = serializer
                .serialize(black_box(&mut buf), black_box(&imu))
                .unwrap();
            black_box(written);
        });
    });
    group.finish();
}

fn bench_parse_clean_stream(c: &mut Criterion) {
    let mut serializer = Serializer::<BenchLink>::new();
    let mut frame = [0u8; frame_size::<Imu>()];
    serializer.serialize(&mut frame, &imu_sample()).unwrap();

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("clean_frame", |b| {
        let mut parser = BenchParser::new(MemoryPool::new());
        b.iter(|| {
            parser.push(black_box(&frame)).unwrap();
            black_box(parser.read::<Imu>());
        });
    });
    group.finish();
}

fn bench_parse_noisy_stream(c: &mut Criterion) {
    let mut serializer = Serializer::<BenchLink>::new();
    let mut frame = [0u8; frame_size::<Imu>()];
    serializer.serialize(&mut frame, &imu_sample()).unwrap();

    // 16 bytes of SOF-free junk ahead of every frame.
    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x55u8; 16]);
    stream.extend_from_slice(&frame);

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("noisy_frame", |b| {
        let mut parser = BenchParser::new(MemoryPool::new());
        b.iter(|| {
            parser.push(black_box(&stream)).unwrap();
            black_box(parser.read::<Imu>());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_serialize,
    bench_parse_clean_stream,
    bench_parse_noisy_stream
);
criterion_main!(benches);
