//! Benchmarks for the scorers
//!
//! Run with: cargo bench --package scoring
//!
//! Uses a synthetic catalog so the numbers don't depend on a local data dump.

use catalog::{CatalogIndex, Item, Observation};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scoring::{ColdStartScorer, FusionScorer, InteractionMatrix, PatternSimilarityScorer, TagSimilarityScorer};

const GENRES: [&str; 10] = [
    "Action", "Adventure", "Comedy", "Crime", "Drama", "Horror", "Romance", "Sci-Fi", "Thriller",
    "War",
];
const ITEMS: u32 = 2_000;
const REQUESTERS: u32 = 600;

/// Deterministic catalog: every item gets 1-3 genres, every requester ~40 ratings
fn synthetic_catalog() -> CatalogIndex {
    let mut index = CatalogIndex::new();
    for id in 1..=ITEMS {
        let n = id as usize;
        let labels = [GENRES[n % 10], GENRES[(n / 10) % 10], GENRES[(n / 100) % 10]];
        let take = 1 + n % 3;
        index.insert_item(Item::new(id, format!("Item {}", id)).with_categories(labels.into_iter().take(take)));
    }
    for requester in 1..=REQUESTERS {
        for k in 0..40u32 {
            let item = (requester * 37 + k * 53) % ITEMS + 1;
            let rating = 1.0 + ((requester + k) % 5) as f32;
            index.insert_observation(Observation::new(requester, item, rating));
        }
    }
    index
}

fn bench_content(c: &mut Criterion) {
    let index = synthetic_catalog();
    let scorer = TagSimilarityScorer::new();

    c.bench_function("content_score", |b| {
        b.iter(|| black_box(scorer.score(&index, black_box(1), black_box(10))))
    });
}

fn bench_collaborative(c: &mut Criterion) {
    let index = synthetic_catalog();
    let scorer = PatternSimilarityScorer::new();

    c.bench_function("build_interaction_matrix", |b| {
        b.iter(|| black_box(InteractionMatrix::from_observations(index.observations())))
    });

    c.bench_function("collaborative_score", |b| {
        b.iter(|| black_box(scorer.score(&index, black_box(1), black_box(10))))
    });
}

fn bench_hybrid(c: &mut Criterion) {
    let index = synthetic_catalog();
    let scorer = FusionScorer::default();

    c.bench_function("hybrid_score", |b| {
        b.iter(|| black_box(scorer.score(&index, Some(1), Some(1), black_box(10))))
    });
}

fn bench_cold_start(c: &mut Criterion) {
    let index = synthetic_catalog();
    let scorer = ColdStartScorer::new();

    c.bench_function("cold_start_score", |b| {
        b.iter(|| black_box(scorer.score(&index, &["comedy", "drama"], black_box(10))))
    });
}

criterion_group!(
    benches,
    bench_content,
    bench_collaborative,
    bench_hybrid,
    bench_cold_start
);
criterion_main!(benches);
