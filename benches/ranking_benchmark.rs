use criterion::{black_box, criterion_group, criterion_main, Criterion};
use natega_engine::{
    normalize,
    query::QueryPlan,
    ranking::{Ranker, TieredRanker},
    StudentRecord,
};

const FIRST_NAMES: &[&str] = &["أحمد", "مُحَمَّد", "فاطمة", "هدى", "إيمان", "سامي", "مصطفى"];

fn create_test_candidates(count: usize) -> Vec<StudentRecord> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let second = FIRST_NAMES[(i / FIRST_NAMES.len()) % FIRST_NAMES.len()];
            StudentRecord::new(i.to_string(), format!("{} {} علي", first, second), 300.0)
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_vocalized_name", |b| {
        b.iter(|| black_box(normalize(black_box("عَبْدُ الرَّحْمَنِ مُصْطَفَى أَحْمَـــد"))))
    });
}

fn bench_tiered_ranking(c: &mut Criterion) {
    let ranker = TieredRanker::new();
    let plan = QueryPlan::parse(Some("احمد")).unwrap();

    let candidates_50 = create_test_candidates(50);
    let candidates_1000 = create_test_candidates(1000);

    c.bench_function("tiered_rank_50", |b| {
        b.iter(|| black_box(ranker.rank(&plan, candidates_50.clone())))
    });

    c.bench_function("tiered_rank_1000", |b| {
        b.iter(|| black_box(ranker.rank(&plan, candidates_1000.clone())))
    });
}

criterion_group!(benches, bench_normalize, bench_tiered_ranking);
criterion_main!(benches);
