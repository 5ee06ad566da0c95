use criterion::{black_box, criterion_group, criterion_main, Criterion};
use natega_engine::{MemoryStore, SearchEngine, SqliteStore, StudentRecord, StudentStore};
use std::sync::Arc;

const NAMES: &[&str] = &["أحمد", "محمد", "فاطمة", "هدى", "إيمان", "سامي", "مصطفى", "علي", "حسن", "منى"];

fn dataset(size: usize) -> Vec<StudentRecord> {
    (0..size)
        .map(|i| {
            let a = NAMES[i % NAMES.len()];
            let b = NAMES[(i / NAMES.len()) % NAMES.len()];
            let c = NAMES[(i / (NAMES.len() * NAMES.len())) % NAMES.len()];
            StudentRecord::new(i.to_string(), format!("{} {} {}", a, b, c), 250.0)
        })
        .collect()
}

async fn setup(store: Arc<dyn StudentStore>) -> SearchEngine {
    store.replace_all(dataset(10_000)).await.unwrap();
    SearchEngine::new(store)
}

fn bench_search(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let memory = runtime.block_on(setup(Arc::new(MemoryStore::new())));
    let sqlite = runtime.block_on(async {
        setup(Arc::new(SqliteStore::new(":memory:").await.unwrap())).await
    });

    for (label, engine) in [("memory", &memory), ("sqlite", &sqlite)] {
        c.bench_function(&format!("{label}_search_two_terms"), |b| {
            b.to_async(&runtime)
                .iter(|| async { black_box(engine.search(Some("احمد علي")).await.unwrap()) });
        });

        c.bench_function(&format!("{label}_search_miss"), |b| {
            b.to_async(&runtime)
                .iter(|| async { black_box(engine.search(Some("زكريا")).await.unwrap()) });
        });
    }
}

fn bench_replace_all(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::new();

    c.bench_function("memory_replace_all_10k", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(store.replace_all(dataset(10_000)).await.unwrap()) });
    });
}

criterion_group!(benches, bench_search, bench_replace_all);
criterion_main!(benches);
