//! Benchmarks for geodesic interpolation and route parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use routeplay_geo::{central_angle, parse_route, points_between, Coordinate};

fn create_route_kml(waypoints: usize) -> String {
    let body: Vec<String> = (0..waypoints)
        .map(|i| {
            // Walk north-west out of Rochester, MN
            let lon = -92.4659 - i as f64 * 0.001;
            let lat = 44.0216 + i as f64 * 0.0007;
            format!("{lon},{lat},0")
        })
        .collect();
    format!("<kml><coordinates>{}</coordinates></kml>", body.join(" "))
}

fn bench_central_angle(c: &mut Criterion) {
    let from = Coordinate::new(-92.1, 44.0);
    let to = Coordinate::new(-92.11, 44.01);

    c.bench_function("central_angle", |b| {
        b.iter(|| central_angle(black_box(&from), black_box(&to)))
    });
}

fn bench_points_between(c: &mut Criterion) {
    let mut group = c.benchmark_group("points_between");
    let from = Coordinate::new(-92.1, 44.0);
    let to = Coordinate::new(-92.11, 44.01);

    for steps in [10i64, 100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("slerp", steps), steps, |b, &steps| {
            b.iter(|| points_between(black_box(&from), black_box(&to), steps))
        });
    }

    group.finish();
}

fn bench_parse_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_route");

    for size in [10, 100, 1000].iter() {
        let kml = create_route_kml(*size);
        group.bench_with_input(BenchmarkId::new("waypoints", size), size, |b, _| {
            b.iter(|| parse_route(black_box(&kml)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_central_angle, bench_points_between, bench_parse_route);
criterion_main!(benches);
