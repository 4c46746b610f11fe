//! Benchmark preprocessing and polar scan matching.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::f32::consts::TAU;
use std::hint::black_box;

use gati_odometry::core::frames::to_matcher_frame;
use gati_odometry::harness::SyntheticRoom;
use gati_odometry::{
    LaserScan, MatcherConfig, MatcherTuning, PolarScanMatcher, Pose2D, PreprocessorConfig,
    ScanPreprocessor, ScanRecord,
};

/// Full-circle scan metadata with `num_beams` beams.
fn template(num_beams: usize) -> LaserScan {
    let increment = TAU / num_beams as f32;
    LaserScan::new(
        0.0,
        TAU - increment,
        increment,
        0.15,
        12.0,
        vec![0.0; num_beams],
    )
}

struct Fixture {
    config: MatcherConfig,
    preprocessor: ScanPreprocessor,
    reference: ScanRecord,
    current: ScanRecord,
    current_scan: LaserScan,
}

fn setup(num_beams: usize, motion: &Pose2D) -> Fixture {
    let room = SyntheticRoom::furnished();
    let template = template(num_beams);
    let first = room.scan_from(&Pose2D::identity(), &template);
    let current_scan = room.scan_from(motion, &template);

    let config = MatcherConfig::derive(&first, &MatcherTuning::default()).unwrap();
    let mut preprocessor = ScanPreprocessor::new(PreprocessorConfig::default(), num_beams);
    let mut reference = ScanRecord::new(num_beams);
    let mut current = ScanRecord::new(num_beams);
    preprocessor
        .process(&config, &first.ranges, &mut reference)
        .unwrap();
    preprocessor
        .process(&config, &current_scan.ranges, &mut current)
        .unwrap();

    Fixture {
        config,
        preprocessor,
        reference,
        current,
        current_scan,
    }
}

fn bench_preprocessing(c: &mut Criterion) {
    let mut fixture = setup(360, &Pose2D::identity());
    let mut record = ScanRecord::new(360);

    c.bench_function("preprocess_360_beams", |b| {
        b.iter(|| {
            fixture
                .preprocessor
                .process(
                    &fixture.config,
                    black_box(&fixture.current_scan.ranges),
                    &mut record,
                )
                .unwrap();
            black_box(&record);
        })
    });
}

fn bench_match(c: &mut Criterion) {
    let motion = Pose2D::new(0.1, 0.05, 0.05);
    let predicted = to_matcher_frame(&motion);
    let mut fixture = setup(360, &motion);
    let mut matcher = PolarScanMatcher::new(fixture.config.clone());

    c.bench_function("polar_match_360_beams", |b| {
        b.iter(|| {
            fixture.current.set_offset(predicted);
            let result = matcher.match_scans(black_box(&fixture.reference), &mut fixture.current);
            black_box(result)
        })
    });
}

fn bench_match_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar_match_resolution");
    let motion = Pose2D::new(0.1, 0.05, 0.05);
    let predicted = to_matcher_frame(&motion);

    for num_beams in [180, 360, 720].iter() {
        let mut fixture = setup(*num_beams, &motion);
        let mut matcher = PolarScanMatcher::new(fixture.config.clone());

        group.bench_with_input(
            BenchmarkId::from_parameter(num_beams),
            num_beams,
            |b, _| {
                b.iter(|| {
                    fixture.current.set_offset(predicted);
                    let result =
                        matcher.match_scans(black_box(&fixture.reference), &mut fixture.current);
                    black_box(result)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_preprocessing,
    bench_match,
    bench_match_resolutions
);
criterion_main!(benches);
