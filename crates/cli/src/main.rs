use anyhow::{anyhow, Context, Result};
use catalog::{CatalogStatistics, Item, ItemId, RequesterId, RequesterProfile};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{
    EngineConfig, RecommendationEngine, RecommendationRequest, RecommendationService,
};
use rand::Rng;
use scoring::Recommendation;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Marquee - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Movie recommendations from genre overlap and rating patterns", long_about = None)]
struct Cli {
    /// Directory holding the cleaned catalog exports (overrides MARQUEE_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Movies that share genres with a given movie
    Similar {
        #[arg(long)]
        item_id: ItemId,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Movies liked by users who rate like this one
    Recommend {
        #[arg(long)]
        user_id: RequesterId,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Blend of genre overlap and rating patterns
    Hybrid {
        #[arg(long)]
        item_id: Option<ItemId>,

        #[arg(long)]
        user_id: Option<RequesterId>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Movies for a new user from a list of preferred genres
    ColdStart {
        /// Comma-separated genres, e.g. "comedy,action"
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a rating (in memory) and show the refreshed recommendations
    Rate {
        #[arg(long)]
        user_id: RequesterId,

        #[arg(long)]
        item_id: ItemId,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: f32,
    },

    /// Show a user's rating profile
    Profile {
        #[arg(long)]
        user_id: RequesterId,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring match
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List every genre in the catalog
    Genres,

    /// Catalog-wide statistics
    Stats,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env().context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load the catalog (this may take a moment)
    let data_dir = config.data_dir.clone();
    info!("Loading catalog from {}", data_dir.display());
    let start = Instant::now();
    let engine = RecommendationEngine::load(config)
        .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;
    if !cli.json {
        println!(
            "{} Loaded catalog from {} in {:?}",
            "✓".green(),
            data_dir.display(),
            start.elapsed()
        );
    }

    let json = cli.json;
    match cli.command {
        Commands::Similar { item_id, limit } => {
            let n = engine.config().result_count(limit);
            let recs = engine.score_by_tag_similarity(item_id, n)?;
            emit(json, &recs, |recs| print_recommendations("Similar Movies", recs))?;
        }
        Commands::Recommend { user_id, limit } => {
            let n = engine.config().result_count(limit);
            let recs = engine.score_by_pattern_similarity(user_id, n)?;
            emit(json, &recs, |recs| print_recommendations("Recommended For You", recs))?;
        }
        Commands::Hybrid {
            item_id,
            user_id,
            limit,
        } => {
            let n = engine.config().result_count(limit);
            let recs = engine.score_hybrid(item_id, user_id, n)?;
            emit(json, &recs, |recs| print_recommendations("Hybrid Recommendations", recs))?;
        }
        Commands::ColdStart { genres, limit } => {
            let n = engine.config().result_count(limit);
            let items = engine.score_cold_start(genres.as_slice(), n)?;
            emit(json, &items, |items| print_items("Picks For Your Genres", items))?;
        }
        Commands::Rate {
            user_id,
            item_id,
            rating,
        } => handle_rate(&engine, json, user_id, item_id, rating)?,
        Commands::Profile { user_id } => {
            let profile = engine.requester_profile(user_id)?;
            emit(json, &profile, print_profile)?;
        }
        Commands::Search { title, limit } => {
            let items = engine.search(&title, limit)?;
            emit(json, &items, |items| {
                print_items(&format!("Search results for '{}'", title), items)
            })?;
        }
        Commands::Genres => {
            let genres = engine.categories()?;
            emit(json, &genres, |genres| {
                println!("{}", "Genres:".bold().blue());
                for genre in genres {
                    println!("  {} {}", "•".green(), genre);
                }
            })?;
        }
        Commands::Stats => {
            let stats = engine.statistics()?;
            emit(json, &stats, print_statistics)?;
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Print `value` as JSON, or hand it to the text formatter
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

/// Handle the 'rate' command
fn handle_rate(
    engine: &RecommendationEngine,
    json: bool,
    user_id: RequesterId,
    item_id: ItemId,
    rating: f32,
) -> Result<()> {
    let observation = engine.record_observation(user_id, item_id, rating)?;
    let n = engine.config().result_count(None);
    let recs = engine.score_by_pattern_similarity(user_id, n)?;

    if json {
        let output = serde_json::json!({
            "observation": observation,
            "recommendations": recs,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let title = engine
        .get_item(item_id)?
        .map(|item| item.title)
        .unwrap_or_else(|| item_id.to_string());
    println!(
        "{} User {} rated {} with {:.1}",
        "✓".green(),
        user_id,
        title.bold(),
        rating
    );
    print_recommendations("Updated Recommendations", &recs);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: RecommendationEngine,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    let profile_ids: Vec<RequesterId> = {
        let catalog = engine.catalog();
        let snapshot = catalog.snapshot()?;
        let mut ids: Vec<RequesterId> = snapshot.observations().iter().map(|o| o.requester_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let item_ids: Vec<ItemId> = {
        let catalog = engine.catalog();
        let snapshot = catalog.snapshot()?;
        let ids: Vec<ItemId> = snapshot.items().map(|item| item.id).collect();
        ids
    };
    if profile_ids.is_empty() || item_ids.is_empty() {
        return Err(anyhow!("Catalog has no ratings to benchmark against"));
    }

    // Random mix of the three scored request kinds
    let workload = {
        let mut rng = rand::rng();
        let workload: Vec<RecommendationRequest> = (0..requests)
            .map(|i| {
                let requester_id = profile_ids[rng.random_range(0..profile_ids.len())];
                let item_id = item_ids[rng.random_range(0..item_ids.len())];
                match i % 3 {
                    0 => RecommendationRequest::Similar { item_id, limit: None },
                    1 => RecommendationRequest::ForRequester { requester_id, limit: None },
                    _ => RecommendationRequest::Hybrid {
                        item_id: Some(item_id),
                        requester_id: Some(requester_id),
                        limit: None,
                    },
                }
            })
            .collect();
        workload
    };

    let service = RecommendationService::new(engine);
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    info!(
        "Running {} requests with {} in flight",
        requests,
        concurrent.max(1)
    );

    // Use tokio::spawn to make concurrent requests
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for request in workload {
        let service = service.clone();
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            service.handle(request).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();
    info!("Benchmark finished in {:?}", total_time);

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p).round() as usize];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn genre_list(item: &Item) -> String {
    item.categories
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn year_label(item: &Item) -> String {
    item.year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "????".to_string())
}

fn print_recommendations(header: &str, recommendations: &[Recommendation]) {
    println!("{}", format!("{}:", header).bold().blue());
    if recommendations.is_empty() {
        println!("  {}", "No recommendations found".yellow());
        return;
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {:.3} ({})",
            (i + 1).to_string().green(),
            rec.item.title,
            year_label(&rec.item),
            genre_list(&rec.item),
            rec.score,
            rec.algorithm
        );
        println!("   {}", rec.rationale.dimmed());
    }
}

fn print_items(header: &str, items: &[Item]) {
    println!("{}", format!("{}:", header).bold().blue());
    if items.is_empty() {
        println!("  {}", "No movies found".yellow());
        return;
    }
    for item in items {
        println!(
            "{}: {} ({}) [{}]",
            item.id.to_string().green(),
            item.title,
            year_label(item),
            genre_list(item)
        );
    }
}

fn print_profile(profile: &RequesterProfile) {
    println!("{}", format!("User ID: {}", profile.requester_id).bold().blue());
    println!("{}Number of ratings: {}", "• ".cyan(), profile.total_ratings);
    println!("{}Average rating: {:.2}", "• ".cyan(), profile.average_rating);
    println!(
        "{}Favorite genres: {}",
        "• ".green(),
        profile.favorite_categories.join(", ")
    );
    println!(
        "{}Disliked genres: {}",
        "• ".red(),
        profile.disliked_categories.join(", ")
    );
    println!("Genre preferences:");
    for (genre, avg) in &profile.category_preferences {
        println!("  - {}: {:.2}", genre, avg);
    }
}

fn print_statistics(stats: &CatalogStatistics) {
    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Movies: {}", "• ".green(), stats.total_items);
    println!("{}Users: {}", "• ".green(), stats.total_requesters);
    println!("{}Ratings: {}", "• ".green(), stats.total_observations);
    println!("{}Average rating: {:.2}", "• ".green(), stats.average_rating);
    println!("Popular genres:");
    for (genre, count) in &stats.popular_categories {
        println!("  - {}: {} movies", genre, count);
    }
}
