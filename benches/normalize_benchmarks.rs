//! Benchmarks for frame normalization and yaw classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_capture::{
    filters::create_filter,
    frame::{PixelFormat, RawFrame, Rotation},
    normalizer::FrameNormalizer,
    orientation::Orientation,
    pose_classifier::PoseClassifier,
    replay::synthetic_image,
};

fn benchmark_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_640x480");
    let normalizer = FrameNormalizer::default();
    let image = synthetic_image(640, 480);

    for rotation in [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
        let frame = RawFrame::from_rgba(0, image.clone(), rotation);
        group.bench_with_input(BenchmarkId::new("rgba", rotation.degrees()), &frame, |b, frame| {
            b.iter(|| black_box(normalizer.normalize(black_box(frame))));
        });
    }

    let nv21 = RawFrame::new(0, 640, 480, PixelFormat::Nv21, Rotation::Deg270, vec![128; 640 * 480 * 3 / 2]);
    group.bench_function("nv21_270", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&nv21))));
    });

    group.finish();
}

fn benchmark_classifier(c: &mut Criterion) {
    let classifier = PoseClassifier::default();
    let yaws: Vec<f64> = (0..100).map(|i| f64::from(i) - 50.0).collect();

    c.bench_function("classify_sequence_100", |b| {
        b.iter(|| {
            for &yaw in &yaws {
                for target in Orientation::ALL {
                    black_box(classifier.classify(target, black_box(yaw)));
                }
            }
        });
    });
}

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("yaw_filters");
    let yaws: Vec<f64> = (0..100).map(|i| 15.0 * (f64::from(i) * 0.1).cos()).collect();

    for name in ["none", "moving_average:5", "median:5", "exponential:0.5", "hampel:7:3"] {
        let Ok(mut filter) = create_filter(name) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("sequence_100", name), &yaws, |b, data| {
            b.iter(|| {
                filter.reset();
                for &yaw in data {
                    black_box(filter.apply(black_box(yaw)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_normalize, benchmark_classifier, benchmark_filters);
criterion_main!(benches);
