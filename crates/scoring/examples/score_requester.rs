//! Example: Score recommendations for one requester
//!
//! Run with: cargo run --package scoring --example score_requester
//!
//! This example shows how to:
//! 1. Load the cleaned catalog exports
//! 2. Run the content, collaborative and hybrid scorers
//! 3. Compare the lists they produce

use catalog::{CatalogIndex, CatalogStore};
use scoring::{FusionScorer, PatternSimilarityScorer, TagSimilarityScorer};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Marquee Scoring Example ===\n");

    println!("Loading catalog...");
    let start = Instant::now();
    let index = CatalogIndex::load_from_files(
        Path::new("cleaned_data"),
        "movies_cleaned.csv",
        "ratings_cleaned.csv",
    )?;
    println!("Loaded catalog in {:?}\n", start.elapsed());

    let requester_id = 1;
    let history = index.get_observations_for_requester(requester_id);
    let Some(seed) = history
        .iter()
        .max_by(|a, b| a.rating.total_cmp(&b.rating))
        .and_then(|obs| index.get_item(obs.item_id))
    else {
        anyhow::bail!("requester {} has no rated items", requester_id);
    };
    println!("Target requester: {} ({} ratings)", requester_id, history.len());
    println!("Seed item: {} [{}]\n", seed.title, seed.id);

    let start = Instant::now();
    let content = TagSimilarityScorer::new().score(&index, seed.id, 10);
    let content_time = start.elapsed();

    let start = Instant::now();
    let collaborative = PatternSimilarityScorer::new().score(&index, requester_id, 10);
    let collaborative_time = start.elapsed();

    let start = Instant::now();
    let hybrid = FusionScorer::default().score(&index, Some(seed.id), Some(requester_id), 10)?;
    let hybrid_time = start.elapsed();

    for (label, recs) in [("Content", &content), ("Collaborative", &collaborative), ("Hybrid", &hybrid)] {
        println!("Top 5 {} recommendations:", label);
        for (i, rec) in recs.iter().take(5).enumerate() {
            println!("  {}. {} (Score: {:.3})", i + 1, rec.item.title, rec.score);
            println!("     - {}", rec.rationale);
        }
        println!();
    }

    let content_ids: HashSet<_> = content.iter().map(|r| r.item.id).collect();
    let collaborative_ids: HashSet<_> = collaborative.iter().map(|r| r.item.id).collect();

    println!("=== Summary ===");
    println!("Content time: {:?}", content_time);
    println!("Collaborative time: {:?}", collaborative_time);
    println!("Hybrid time: {:?}", hybrid_time);
    println!(
        "Overlap between scorers: {} items",
        content_ids.intersection(&collaborative_ids).count()
    );

    Ok(())
}
