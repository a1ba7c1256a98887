use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Prefix for every engine environment variable, e.g. `MARQUEE_CONTENT_WEIGHT`
pub const ENV_PREFIX: &str = "MARQUEE_";

/// Engine configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weight of the content signal in hybrid scoring
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,

    /// Weight of the collaborative signal in hybrid scoring
    #[serde(default = "default_collaborative_weight")]
    pub collaborative_weight: f64,

    /// Result count used when a request doesn't name one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on any requested result count
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Nearest requesters consulted by collaborative scoring
    #[serde(default = "default_neighbor_count")]
    pub neighbor_count: usize,

    /// Minimum neighbor rating that counts as a "like"
    #[serde(default = "default_like_threshold")]
    pub like_threshold: f32,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_items_file")]
    pub items_file: String,

    #[serde(default = "default_observations_file")]
    pub observations_file: String,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_content_weight() -> f64 {
    scoring::DEFAULT_CONTENT_WEIGHT
}

fn default_collaborative_weight() -> f64 {
    scoring::DEFAULT_COLLABORATIVE_WEIGHT
}

fn default_recommendations() -> usize {
    10
}

fn default_max_recommendations() -> usize {
    50
}

fn default_neighbor_count() -> usize {
    10
}

fn default_like_threshold() -> f32 {
    4.0
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("cleaned_data")
}

fn default_items_file() -> String {
    "movies_cleaned.csv".to_string()
}

fn default_observations_file() -> String {
    "ratings_cleaned.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_weight: default_content_weight(),
            collaborative_weight: default_collaborative_weight(),
            default_recommendations: default_recommendations(),
            max_recommendations: default_max_recommendations(),
            neighbor_count: default_neighbor_count(),
            like_threshold: default_like_threshold(),
            data_dir: default_data_dir(),
            items_file: default_items_file(),
            observations_file: default_observations_file(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `MARQUEE_*` environment variables, reading a
    /// `.env` file first if one exists
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<EngineConfig>()
            .map_err(|e| EngineError::InvalidConfig(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from explicit `(KEY, value)` pairs, keys carrying the
    /// `MARQUEE_` prefix
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, EngineConfig>(pairs)
            .map_err(|e| EngineError::InvalidConfig(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("content_weight", self.content_weight),
            ("collaborative_weight", self.collaborative_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if self.max_recommendations == 0 {
            return Err(EngineError::InvalidConfig(
                "max_recommendations must be at least 1".to_string(),
            ));
        }
        if self.default_recommendations == 0 || self.default_recommendations > self.max_recommendations {
            return Err(EngineError::InvalidConfig(format!(
                "default_recommendations must be between 1 and {}, got {}",
                self.max_recommendations, self.default_recommendations
            )));
        }
        if self.neighbor_count == 0 {
            return Err(EngineError::InvalidConfig(
                "neighbor_count must be at least 1".to_string(),
            ));
        }
        if !catalog::is_valid_rating(self.like_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "like_threshold must be on the rating scale, got {}",
                self.like_threshold
            )));
        }
        Ok(())
    }

    /// Cap a requested result count at `max_recommendations`, falling back
    /// to the default when none was given
    pub fn result_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_recommendations)
            .min(self.max_recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = EngineConfig::from_pairs(Vec::new()).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.content_weight, 0.6);
        assert_eq!(config.collaborative_weight, 0.4);
        assert_eq!(config.data_dir, PathBuf::from("cleaned_data"));
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = EngineConfig::from_pairs(pairs(&[
            ("MARQUEE_CONTENT_WEIGHT", "0.8"),
            ("MARQUEE_NEIGHBOR_COUNT", "25"),
            ("MARQUEE_DATA_DIR", "/srv/movies"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.content_weight, 0.8);
        assert_eq!(config.neighbor_count, 25);
        assert_eq!(config.data_dir, PathBuf::from("/srv/movies"));
        assert_eq!(config.collaborative_weight, 0.4);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = EngineConfig::from_pairs(pairs(&[("MARQUEE_CONTENT_WEIGHT", "-1")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = EngineConfig::from_pairs(pairs(&[("MARQUEE_NEIGHBOR_COUNT", "abc")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = EngineConfig::from_pairs(pairs(&[("MARQUEE_DEFAULT_RECOMMENDATIONS", "100")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_result_count_is_capped() {
        let config = EngineConfig::default();
        assert_eq!(config.result_count(None), 10);
        assert_eq!(config.result_count(Some(0)), 0);
        assert_eq!(config.result_count(Some(500)), 50);
        assert_eq!(config.result_count(Some(7)), 7);
    }
}
