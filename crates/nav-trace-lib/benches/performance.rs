//! Performance benchmarks for nav-trace-lib
//!
//! Run with: cargo bench --package nav-trace-lib
//!
//! Covers the two hot paths: the polyline codec and end-to-end format
//! dispatch over synthesized inputs.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nav_trace_lib::{Coordinates, ParseService, polyline};

/// Generate a smooth synthetic track with the given number of points.
fn generate_track(num_points: usize) -> Vec<(f64, f64)> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = 51.5 + t * 0.5 + (t * 50.0).sin() * 0.001;
            let lon = -0.1 + t * 0.5 + (t * 30.0).cos() * 0.001;
            (lat, lon)
        })
        .collect()
}

/// Synthesize a positioning log with one incoming record per point.
fn generate_ttp(num_points: usize) -> String {
    let mut out = String::from("BEGIN:ApplicationVersion=TomTom Positioning 0.7\n");
    for (i, (lat, lon)) in generate_track(num_points).into_iter().enumerate() {
        out.push_str(&format!(
            "{}.0,245,0,{lon},0,{lat},0,0,0,90.0,0,13.5\n",
            i + 1
        ));
    }
    out
}

/// Synthesize a logcat dump with one map-matcher line per point.
fn generate_logcat(num_points: usize) -> String {
    generate_track(num_points)
        .into_iter()
        .map(|(lat, lon)| {
            format!(
                "05-06 10:15:30.123 1234 5678 I MapMatcher: MatchLocation result: lat: {lat}, lon: {lon}, on road: true"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_polyline_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyline");

    for num_points in [1_000usize, 50_000] {
        let track: Vec<Coordinates> = generate_track(num_points)
            .into_iter()
            .map(|(lat, lon)| Coordinates::new(lat, lon).unwrap())
            .collect();
        let encoded = polyline::encode(&track, 5).unwrap();

        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::new("encode", num_points),
            &track,
            |b, track| {
                b.iter(|| polyline::encode(track, 5).unwrap());
            },
        );
        group.bench_with_input(
            BenchmarkId::new("decode", num_points),
            &encoded,
            |b, encoded| {
                b.iter(|| polyline::decode(encoded, 5).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.sample_size(20);

    let ttp = generate_ttp(10_000);
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("ttp_10k", |b| {
        b.iter(|| {
            let mut service = ParseService::new();
            service.parse(&ttp).unwrap();
        });
    });

    let logcat = generate_logcat(10_000);
    group.bench_function("logcat_10k", |b| {
        b.iter(|| {
            let mut service = ParseService::new();
            service.parse(&logcat).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_polyline_codec, bench_dispatch);

criterion_main!(benches);
