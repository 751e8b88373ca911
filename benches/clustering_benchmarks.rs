use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geocluster::compute::geohash::covering_geohashes;
use geocluster::view::{ViewportRequest, viewport_clusters};
use geocluster::{
    BoundingBox, Config, GeoPoint, NearbyQuery, build_index, cluster_points, decode, encode,
    filter_by_viewport, nearby,
};

const SPORTS: [&str; 4] = ["Cricket", "Football", "Badminton", "Tennis"];

fn players(n: usize) -> Vec<GeoPoint> {
    (0..n)
        .map(|i| {
            let lat = 8.0 + ((i * 7919) % 2800) as f64 * 0.01;
            let lng = 68.0 + ((i * 104729) % 2900) as f64 * 0.01;
            GeoPoint::new(i.to_string(), lat, lng, SPORTS[i % SPORTS.len()])
        })
        .collect()
}

fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("geohash_codec");

    for precision in [5, 8, 12] {
        group.bench_with_input(BenchmarkId::new("encode", precision), &precision, |b, &p| {
            b.iter(|| encode(black_box(19.076), black_box(72.877), p).unwrap())
        });
    }

    group.bench_function("decode_p12", |b| {
        b.iter(|| decode(black_box("te7ud2emv0ju")).unwrap())
    });

    let mumbai = BoundingBox::new(18.9, 19.3, 72.7, 73.1);
    for precision in [4, 5, 6] {
        group.bench_with_input(BenchmarkId::new("covering", precision), &precision, |b, &p| {
            b.iter(|| covering_geohashes(black_box(&mumbai), p).unwrap())
        });
    }

    group.finish();
}

fn benchmark_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    for size in [1_000, 10_000, 100_000] {
        let points = players(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("cluster_z11", size), &points, |b, pts| {
            b.iter(|| cluster_points(black_box(pts), 11, 100).unwrap())
        });

        let india = BoundingBox::new(6.0, 36.0, 68.0, 98.0);
        group.bench_with_input(BenchmarkId::new("filter_z5", size), &points, |b, pts| {
            b.iter(|| filter_by_viewport(black_box(pts), &india, 2).unwrap())
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let points = players(50_000);
    let config = Config::default();

    let request = ViewportRequest::new(BoundingBox::new(18.0, 20.0, 72.0, 74.0)).with_zoom(11);
    group.bench_function("viewport_clusters", |b| {
        b.iter(|| viewport_clusters(black_box(&points), &request, &config).unwrap())
    });

    let query = NearbyQuery::new(19.076, 72.877);
    group.bench_function("nearby_50km", |b| {
        b.iter(|| nearby(black_box(&points), &query).unwrap())
    });

    group.sample_size(10);
    group.bench_function("build_index", |b| {
        b.iter(|| build_index(black_box(&points), config.index_zoom_range()).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_codec,
    benchmark_clustering,
    benchmark_pipeline
);

criterion_main!(benches);
