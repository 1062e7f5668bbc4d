//! # Rating Engine Benchmarks
//!
//! Measures one full rating pass over the base roster and the pure scoring
//! path on its own.

use criterion::{Criterion, criterion_group, criterion_main};
use mm_monitor::domain::services::grade_classifier::GradeClassifier;
use mm_monitor::domain::services::metric_generator::StdRandomSource;
use mm_monitor::domain::services::rating_engine::RatingEngine;
use mm_monitor::domain::services::red_flags::RedFlagDetector;
use mm_monitor::domain::value_objects::timestamp::Timestamp;
use mm_monitor::infrastructure::roster::base_roster;
use std::hint::black_box;

fn bench_rate_all(c: &mut Criterion) {
    let roster = base_roster();
    let mut engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(11)));

    c.bench_function("rating_engine_rate_all_base_roster", |b| {
        b.iter(|| black_box(engine.rate_all(black_box(&roster))));
    });
}

fn bench_assess(c: &mut Criterion) {
    let roster = base_roster();
    let mut engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(11)));
    let samples: Vec<_> = roster.iter().map(|b| engine.sample(b)).collect();
    let at = Timestamp::now();

    c.bench_function("rating_engine_assess_base_roster", |b| {
        b.iter(|| {
            for (baseline, sample) in roster.iter().zip(&samples) {
                black_box(engine.assess(baseline, sample, at));
            }
        });
    });
}

fn bench_classify(c: &mut Criterion) {
    let roster = base_roster();
    let mut engine = RatingEngine::new(2025, Box::new(StdRandomSource::seeded(11)));
    let rated = engine.rate_all(&roster);

    c.bench_function("grade_classifier_classify", |b| {
        b.iter(|| {
            for maker in &rated {
                let flags = RedFlagDetector::detect(maker.metrics());
                black_box(GradeClassifier::classify(maker.pillar_scores(), &flags));
            }
        });
    });
}

criterion_group!(benches, bench_rate_all, bench_assess, bench_classify);
criterion_main!(benches);
