//! End-to-end scorer behavior on small hand-built catalogs

use catalog::{CatalogIndex, Item, ItemId, Observation};
use scoring::{
    Algorithm, ColdStartScorer, FusionScorer, PatternSimilarityScorer, ScoringError,
    TagSimilarityScorer,
};

fn genre_catalog() -> CatalogIndex {
    let mut index = CatalogIndex::new();
    index.insert_item(Item::new(1, "A").with_categories(["Action", "Comedy"]));
    index.insert_item(Item::new(2, "B").with_categories(["Action"]));
    index.insert_item(Item::new(3, "C").with_categories(["Comedy", "Drama"]));
    index
}

fn rating_catalog() -> CatalogIndex {
    let mut index = CatalogIndex::new();
    for id in 1..=3 {
        index.insert_item(Item::new(id, format!("m{}", id)).with_categories(["Drama"]));
    }
    index.insert_observation(Observation::new(1, 1, 5.0));
    index.insert_observation(Observation::new(1, 2, 4.0));
    index.insert_observation(Observation::new(2, 1, 5.0));
    index.insert_observation(Observation::new(2, 2, 5.0));
    index.insert_observation(Observation::new(2, 3, 4.0));
    index
}

#[test]
fn test_tag_similarity_scenario() {
    let index = genre_catalog();
    let recs = TagSimilarityScorer::new().score(&index, 1, 2);

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].item.id, 2);
    assert!((recs[0].score - 0.5).abs() < 1e-12);
    assert_eq!(recs[1].item.id, 3);
    assert!((recs[1].score - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(recs[1].rationale, "Shares genres: Comedy");
}

#[test]
fn test_pattern_similarity_scenario() {
    let index = rating_catalog();
    let recs = PatternSimilarityScorer::new().score(&index, 1, 5);

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].item.id, 3);
    assert_eq!(recs[0].score, 1.0);
    assert_eq!(recs[0].algorithm, Algorithm::Collaborative);
    assert!(recs.iter().all(|r| r.item.id != 1 && r.item.id != 2));
}

#[test]
fn test_hybrid_without_inputs_is_rejected() {
    let index = rating_catalog();
    let result = FusionScorer::default().score(&index, None, None, 5);
    assert!(matches!(result, Err(ScoringError::InvalidRequest(_))));
}

#[test]
fn test_cold_start_scenario() {
    let mut index = CatalogIndex::new();
    index.insert_item(Item::new(10, "Both").with_categories(["Comedy", "Action"]));
    index.insert_item(Item::new(11, "Half").with_categories(["Comedy", "Drama"]));
    index.insert_item(Item::new(12, "Neither").with_categories(["Horror"]));

    let ranked = ColdStartScorer::new().rank(&index, &["comedy", "action"], 10);
    let pairs: Vec<(ItemId, f64)> = ranked.iter().map(|s| (s.item_id, s.score)).collect();
    assert_eq!(pairs, vec![(10, 1.0), (11, 0.5)]);

    let items = ColdStartScorer::new().score(&index, &["comedy", "action"], 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 10);
}

#[test]
fn test_no_signal_is_empty_not_error() {
    let index = rating_catalog();

    assert!(TagSimilarityScorer::new().score(&index, 404, 5).is_empty());
    assert!(PatternSimilarityScorer::new().score(&index, 404, 5).is_empty());
    assert!(FusionScorer::default().score(&index, Some(404), Some(404), 5).unwrap().is_empty());
}

#[test]
fn test_hybrid_seed_only_matches_content_ranking() {
    let index = genre_catalog();
    let content = TagSimilarityScorer::new().score(&index, 1, 5);
    let hybrid = FusionScorer::default().score(&index, Some(1), None, 5).unwrap();

    assert_eq!(content.len(), hybrid.len());
    for (c, h) in content.iter().zip(&hybrid) {
        assert_eq!(c.item.id, h.item.id);
        assert!((h.score - 0.6 * c.score).abs() < 1e-12);
        assert_eq!(c.rationale, h.rationale);
    }
}

#[test]
fn test_hybrid_never_returns_seed() {
    let mut index = genre_catalog();
    // Requester 2 loves the seed, requester 1 has rated something else
    index.insert_observation(Observation::new(1, 2, 5.0));
    index.insert_observation(Observation::new(2, 2, 5.0));
    index.insert_observation(Observation::new(2, 1, 5.0));

    let recs = FusionScorer::default().score(&index, Some(1), Some(1), 5).unwrap();
    assert!(recs.iter().all(|r| r.item.id != 1));
}

#[test]
fn test_repeated_calls_are_identical() {
    let index = rating_catalog();
    let fusion = FusionScorer::default();

    let first = fusion.score(&index, Some(1), Some(1), 10).unwrap();
    let second = fusion.score(&index, Some(1), Some(1), 10).unwrap();
    assert_eq!(first, second);

    let first = PatternSimilarityScorer::new().score(&index, 1, 10);
    let second = PatternSimilarityScorer::new().score(&index, 1, 10);
    assert_eq!(first, second);
}
