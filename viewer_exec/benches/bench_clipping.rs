//! # Clipping and Aggregation Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use nalgebra::Point3;
use std::f64::consts::TAU;
use viewer_lib::{
    plot::{clip_polyline, ProjectionMode, ViewCamera},
    scan::{DecodedPacket, RevolutionAggregator},
    transform::RigidTransform,
};

fn clipping_benchmark(c: &mut Criterion) {
    // ---- Ring around the camera, partly behind it ----

    let camera = ViewCamera::new(
        ProjectionMode::Perspective,
        Point3::new(-5.0, 0.0, 2.0),
        Point3::origin(),
    )
    .with_range(0.1, 100.0);
    let size = [20.0, 14.0];
    let transform = camera.projection(size[0] / size[1]) * camera.transformation();

    let ring: Vec<Point3<f64>> = (0..=720)
        .map(|i| {
            let a = i as f64 * TAU / 720.0;
            Point3::new(30.0 * a.cos(), 30.0 * a.sin(), 0.0)
        })
        .collect();

    c.bench_function("clip_polyline::ring", |b| {
        b.iter(|| clip_polyline(&ring, &transform, size))
    });
}

fn aggregation_benchmark(c: &mut Criterion) {
    // ---- One revolution worth of packets ----

    let num_packets = 580;
    let packets: Vec<DecodedPacket> = (0..num_packets)
        .map(|i| {
            let start = i as f64 * TAU / num_packets as f64;
            DecodedPacket {
                points: vec![Point3::new(start.cos(), start.sin(), 0.0); 384],
                intensities: vec![0; 384],
                start_angle_rad: start,
                end_angle_rad: start + 0.5 * TAU / num_packets as f64,
            }
        })
        .collect();

    let mut aggregator = RevolutionAggregator::new(1);

    c.bench_function("RevolutionAggregator::push::revolution", |b| {
        b.iter(|| {
            for packet in packets.iter() {
                aggregator.push(packet, RigidTransform::identity());
            }
        })
    });
}

criterion_group!(benches, clipping_benchmark, aggregation_benchmark);
criterion_main!(benches);
