//! Load a small catalog from CSV files and score against it

use engine::{EngineConfig, RecommendationEngine, RecommendationRequest, RecommendationService};
use scoring::Algorithm;
use std::fs;
use std::path::PathBuf;

const MOVIES: &str = "\
movie_id,title,genres,rating
1,Toy Story (1995),Animation|Children's|Comedy,8.3
2,Jumanji (1995),Adventure|Children's|Fantasy,7.0
3,\"Grumpier Old Men, The (1995)\",Comedy|Romance,6.7
4,Heat (1995),Action|Crime|Thriller,8.3
5,Babe (1995),Children's|Comedy|Drama,6.8
";

const RATINGS: &str = "\
user_id,movie_id,rating,timestamp
1,1,5,978300760
1,3,4,978302109
2,1,5,978298413
2,3,5,978299000
2,5,4,978299200
3,4,5,978300000
3,2,2,978300100
";

fn write_fixture(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("marquee_engine_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("movies.csv"), MOVIES).unwrap();
    fs::write(dir.join("ratings.csv"), RATINGS).unwrap();
    dir
}

fn config_for(dir: PathBuf) -> EngineConfig {
    EngineConfig {
        data_dir: dir,
        items_file: "movies.csv".to_string(),
        observations_file: "ratings.csv".to_string(),
        ..EngineConfig::default()
    }
}

#[test]
fn test_load_and_score_every_algorithm() {
    let dir = write_fixture("all");
    let engine = RecommendationEngine::load(config_for(dir.clone())).unwrap();

    let title = engine.get_item(3).unwrap().map(|item| item.title);
    assert_eq!(title.as_deref(), Some("Grumpier Old Men, The (1995)"));

    let similar = engine.score_by_tag_similarity(1, 3).unwrap();
    assert!(!similar.is_empty());
    assert!(similar.iter().all(|r| r.item.id != 1));
    // Babe shares Children's and Comedy with Toy Story
    assert_eq!(similar[0].item.id, 5);

    let collaborative = engine.score_by_pattern_similarity(1, 5).unwrap();
    let ids: Vec<u32> = collaborative.iter().map(|r| r.item.id).collect();
    assert_eq!(ids, vec![5]);
    assert_eq!(collaborative[0].algorithm, Algorithm::Collaborative);

    let hybrid = engine.score_hybrid(Some(1), Some(1), 5).unwrap();
    assert_eq!(hybrid[0].item.id, 5);
    assert!(hybrid.iter().all(|r| r.score <= 1.0));

    let cold = engine.score_cold_start(&["thriller"], 5).unwrap();
    assert_eq!(cold.len(), 1);
    assert_eq!(cold[0].title, "Heat (1995)");

    fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_service_over_loaded_catalog() {
    let dir = write_fixture("service");
    let engine = RecommendationEngine::load(config_for(dir.clone())).unwrap();
    let service = RecommendationService::new(engine);

    service.record_observation(4, 4, 5.0).await.unwrap();
    let response = service
        .handle(RecommendationRequest::ForRequester { requester_id: 4, limit: None })
        .await
        .unwrap();
    assert!(response.is_empty());

    let json = serde_json::to_string(&RecommendationRequest::Hybrid {
        item_id: Some(1),
        requester_id: Some(4),
        limit: Some(3),
    })
    .unwrap();
    let request: RecommendationRequest = serde_json::from_str(&json).unwrap();
    let response = service.handle(request).await.unwrap();
    assert!(!response.is_empty());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_files_fail_to_load() {
    let config = config_for(std::env::temp_dir().join("marquee_engine_does_not_exist"));
    let err = RecommendationEngine::load(config).unwrap_err();
    assert!(matches!(err, engine::EngineError::Catalog(_)));
}
