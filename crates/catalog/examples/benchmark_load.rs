use catalog::{CatalogIndex, compute_statistics};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("cleaned_data");

    println!("Loading catalog...\n");

    let start = Instant::now();
    let index = CatalogIndex::load_from_files(data_dir, "movies_cleaned.csv", "ratings_cleaned.csv")?;
    let elapsed = start.elapsed();

    let (items, requesters, observations) = index.counts();
    let stats = compute_statistics(&index);

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Items: {}", items);
    println!("Requesters: {}", requesters);
    println!("Observations: {}", observations);
    println!("Mean rating: {:.2}", stats.average_rating);
    println!("\nPerformance: {:.0} observations/second",
             observations as f64 / elapsed.as_secs_f64());
    Ok(())
}
