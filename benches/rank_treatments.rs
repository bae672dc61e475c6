use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crop_disease_advisor::classification::{rank_predictions, ClassNames};
use crop_disease_advisor::recommendation::rank_treatments;
use crop_disease_advisor::{Budget, FarmingType, Preferences, TreatmentRecord};

/// Catalog-sized candidate list with a spread of costs, priorities and organic flags
fn candidates(n: usize) -> Vec<TreatmentRecord> {
    (0..n)
        .map(|i| {
            TreatmentRecord::new(i as i64, format!("treatment-{i}"), 40.0 + (i % 60) as f64)
                .organic(i % 3 == 0)
                .cost(300.0 + (i * 97 % 2800) as f64)
                .priority((i % 5) as i64 + 1)
        })
        .collect()
}

fn bench_rank_treatments(c: &mut Criterion) {
    let treatments = candidates(50);
    let preferences = Preferences::new(FarmingType::Organic, Budget::Low);

    c.bench_function("rank_treatments_50", |b| {
        b.iter(|| rank_treatments(black_box(treatments.clone()), black_box(preferences)));
    });
}

fn bench_rank_predictions(c: &mut Criterion) {
    let names = ClassNames::fallback();
    let probs: Vec<f32> = (0..names.len()).map(|i| (i as f32 + 1.0) / 66.0).collect();

    c.bench_function("rank_predictions_11_classes", |b| {
        b.iter(|| rank_predictions(black_box(&probs), &names, 0.6));
    });
}

criterion_group!(benches, bench_rank_treatments, bench_rank_predictions);
criterion_main!(benches);
