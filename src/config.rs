//! Configuration management for the Cinematch engine
//!
//! Provides strongly-typed configuration with validation, environment variable parsing,
//! and sensible defaults. A `.env` file is honored when present.
//!
//! # Example
//! ```no_run
//! use cinematch::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Snapshot: {}", config.snapshot.path.display());
//! ```

use crate::error::{Error, Result};
use crate::recommendation::{RatingScales, ScoringWeights};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,
    /// Where the catalog and profile snapshot is loaded from
    pub snapshot: SnapshotConfig,
    /// Recommendation engine configuration
    pub recommendation: RecommendationConfig,
    /// Port of the Prometheus exporter (only used with the `prometheus` feature)
    pub metrics_port: u16,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

/// Snapshot provider configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// JSON file holding movies, series, people and users
    pub path: PathBuf,
}

/// Recommendation engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// Content scoring weights
    pub weights: ScoringWeights,
    /// Rating scale upper bound per media type
    pub rating_scales: RatingScales,
    /// Maximum content-based results
    pub content_limit: usize,
    /// Content scores must exceed this to be kept
    pub content_min_score: f64,
    /// Maximum neighbors for collaborative filtering
    pub neighbor_limit: usize,
    /// Neighbors must exceed this Jaccard similarity
    pub min_similarity: f64,
    /// Collaborative results per media type before merging
    pub collaborative_per_type: usize,
    /// Maximum hybrid results
    pub hybrid_limit: usize,
    /// Weight applied to content-based scores when blending
    pub hybrid_content_weight: f64,
    /// Weight applied to collaborative scores when blending
    pub hybrid_collaborative_weight: f64,
    /// Trending results per media type
    pub trending_per_type: usize,
    /// By-genre results per media type
    pub genre_per_type: usize,
    /// Mood results per media type
    pub mood_per_type: usize,
    /// Requests slower than this are logged at warn level
    pub slow_threshold_ms: u64,
    /// Default number of records per user in a digest
    pub digest_limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            rating_scales: RatingScales::default(),
            content_limit: 20,
            content_min_score: 0.3,
            neighbor_limit: 5,
            min_similarity: 0.1,
            collaborative_per_type: 10,
            hybrid_limit: 15,
            hybrid_content_weight: 0.7,
            hybrid_collaborative_weight: 0.3,
            trending_per_type: 10,
            genre_per_type: 15,
            mood_per_type: 10,
            slow_threshold_ms: 200,
            digest_limit: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            api: ApiConfig::from_env()?,
            snapshot: SnapshotConfig::from_env()?,
            recommendation: RecommendationConfig::from_env()?,
            metrics_port: get_env_or("METRICS_PORT", "9000").parse().unwrap_or(9000),
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api.host.is_empty() {
            return Err(Error::InvalidConfig {
                key: "API_HOST",
                message: "API host cannot be empty".into(),
            });
        }

        self.recommendation.validate()
    }

    /// Log configuration summary
    fn log_summary(&self) {
        let rec = &self.recommendation;
        info!("Configuration loaded:");
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
        info!("    Request timeout: {:?}", self.api.request_timeout);
        info!("  Snapshot:");
        info!("    Path: {}", self.snapshot.path.display());
        info!("  Recommendation:");
        info!(
            "    Limits: content={} hybrid={} collaborative/type={}",
            rec.content_limit, rec.hybrid_limit, rec.collaborative_per_type
        );
        info!(
            "    Rating scales: movie={} series={}",
            rec.rating_scales.movie, rec.rating_scales.series
        );
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            port: get_env_or("API_PORT", "8080").parse().unwrap_or(8080),
            host: get_env_or("API_HOST", "0.0.0.0"),
            request_timeout: Duration::from_secs(
                get_env_or("API_REQUEST_TIMEOUT_SECS", "30")
                    .parse()
                    .unwrap_or(30),
            ),
            cors_enabled: get_env_or("API_CORS_ENABLED", "true")
                .parse()
                .unwrap_or(true),
            cors_origins: get_env_or("API_CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

impl SnapshotConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            path: PathBuf::from(get_env_or("SNAPSHOT_PATH", "data/snapshot.json")),
        })
    }
}

impl RecommendationConfig {
    fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            weights: d.weights,
            rating_scales: RatingScales {
                movie: get_env_parsed_or("REC_MOVIE_RATING_SCALE", d.rating_scales.movie),
                series: get_env_parsed_or("REC_SERIES_RATING_SCALE", d.rating_scales.series),
            },
            content_limit: get_env_parsed_or("REC_CONTENT_LIMIT", d.content_limit),
            content_min_score: get_env_parsed_or("REC_CONTENT_MIN_SCORE", d.content_min_score),
            neighbor_limit: get_env_parsed_or("REC_NEIGHBOR_LIMIT", d.neighbor_limit),
            min_similarity: get_env_parsed_or("REC_MIN_SIMILARITY", d.min_similarity),
            collaborative_per_type: get_env_parsed_or(
                "REC_COLLAB_PER_TYPE",
                d.collaborative_per_type,
            ),
            hybrid_limit: get_env_parsed_or("REC_HYBRID_LIMIT", d.hybrid_limit),
            hybrid_content_weight: get_env_parsed_or(
                "REC_HYBRID_CONTENT_WEIGHT",
                d.hybrid_content_weight,
            ),
            hybrid_collaborative_weight: get_env_parsed_or(
                "REC_HYBRID_COLLAB_WEIGHT",
                d.hybrid_collaborative_weight,
            ),
            trending_per_type: get_env_parsed_or("REC_TRENDING_PER_TYPE", d.trending_per_type),
            genre_per_type: get_env_parsed_or("REC_GENRE_PER_TYPE", d.genre_per_type),
            mood_per_type: get_env_parsed_or("REC_MOOD_PER_TYPE", d.mood_per_type),
            slow_threshold_ms: get_env_parsed_or("REC_SLOW_THRESHOLD_MS", d.slow_threshold_ms),
            digest_limit: get_env_parsed_or("REC_DIGEST_LIMIT", d.digest_limit),
        })
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        for (key, scale) in [
            ("REC_MOVIE_RATING_SCALE", self.rating_scales.movie),
            ("REC_SERIES_RATING_SCALE", self.rating_scales.series),
        ] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("rating scale must be positive, got {}", scale).into(),
                });
            }
        }

        for (key, limit) in [
            ("REC_CONTENT_LIMIT", self.content_limit),
            ("REC_NEIGHBOR_LIMIT", self.neighbor_limit),
            ("REC_COLLAB_PER_TYPE", self.collaborative_per_type),
            ("REC_HYBRID_LIMIT", self.hybrid_limit),
            ("REC_TRENDING_PER_TYPE", self.trending_per_type),
            ("REC_GENRE_PER_TYPE", self.genre_per_type),
            ("REC_MOOD_PER_TYPE", self.mood_per_type),
            ("REC_DIGEST_LIMIT", self.digest_limit),
        ] {
            if limit == 0 {
                return Err(Error::InvalidConfig {
                    key,
                    message: "limit must be greater than zero".into(),
                });
            }
        }

        for (key, weight) in [
            ("REC_HYBRID_CONTENT_WEIGHT", self.hybrid_content_weight),
            ("REC_HYBRID_COLLAB_WEIGHT", self.hybrid_collaborative_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("weight must be within [0, 1], got {}", weight).into(),
                });
            }
        }

        for (key, threshold) in [
            ("REC_CONTENT_MIN_SCORE", self.content_min_score),
            ("REC_MIN_SIMILARITY", self.min_similarity),
        ] {
            if !threshold.is_finite() {
                return Err(Error::InvalidConfig {
                    key,
                    message: "threshold must be a finite number".into(),
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset or unparseable
fn get_env_parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RecommendationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.content_limit, 20);
        assert_eq!(config.hybrid_limit, 15);
        assert_eq!(config.rating_scales.movie, 5.0);
        assert_eq!(config.rating_scales.series, 10.0);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let config = RecommendationConfig {
            rating_scales: RatingScales {
                movie: 0.0,
                series: 10.0,
            },
            ..Default::default()
        };
        match config.validate() {
            Err(Error::InvalidConfig { key, .. }) => assert_eq!(key, "REC_MOVIE_RATING_SCALE"),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_limit_and_bad_weight() {
        let zero_limit = RecommendationConfig {
            hybrid_limit: 0,
            ..Default::default()
        };
        assert!(zero_limit.validate().is_err());

        let bad_weight = RecommendationConfig {
            hybrid_collaborative_weight: 1.5,
            ..Default::default()
        };
        assert!(bad_weight.validate().is_err());
    }

    #[test]
    fn test_get_env_parsed_or_falls_back() {
        std::env::set_var("CINEMATCH_TEST_PARSED_OK", "42");
        std::env::set_var("CINEMATCH_TEST_PARSED_BAD", "forty-two");
        assert_eq!(get_env_parsed_or("CINEMATCH_TEST_PARSED_OK", 7usize), 42);
        assert_eq!(get_env_parsed_or("CINEMATCH_TEST_PARSED_BAD", 7usize), 7);
        assert_eq!(get_env_parsed_or("CINEMATCH_TEST_PARSED_UNSET", 0.3f64), 0.3);
    }
}
