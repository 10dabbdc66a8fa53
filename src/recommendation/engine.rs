//! Recommendation Engine
//!
//! Content-based scoring of catalog items against a user's preference profile,
//! the human-readable reasons attached to each suggestion, and the
//! [`RecommendationEngine`] facade that snapshots the providers and dispatches
//! to every recommendation strategy.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::collaborative::collaborative;
use super::context::{mood_recommendations, select_strategy, ContextStrategy};
use super::digest::{build_digest, UserDigest};
use super::features::{genre_overlap, item_genres, overlap_ratio};
use super::hybrid::blend;
use super::metrics::{record_returned, PerformanceTimer};
use super::popular::{by_genre, trending};
use super::preferences::{extract_preferences, PreferenceProfile};
use crate::catalog::{
    Catalog, CatalogItem, CatalogProvider, MediaType, ProfileProvider, SnapshotStore, UserProfile,
};
use crate::config::RecommendationConfig;
use crate::error::Result;

/// A ranked suggestion handed to the delivery layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub score: f64,
    pub reason: String,
    pub poster_url: Option<String>,
}

impl RecommendationRecord {
    pub fn from_item(
        media_type: MediaType,
        item: &CatalogItem,
        score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            media_type,
            score,
            reason: reason.into(),
            poster_url: item.poster_url.clone(),
        }
    }
}

/// Strategy that produced a list, used for logging, metrics and API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ContentBased,
    Trending,
    Genre,
    Hybrid,
    Smart,
    Collaborative,
    Digest,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ContentBased => "content_based",
            Strategy::Trending => "trending",
            Strategy::Genre => "genre",
            Strategy::Hybrid => "hybrid",
            Strategy::Smart => "smart",
            Strategy::Collaborative => "collaborative",
            Strategy::Digest => "digest",
        }
    }
}

/// Content scoring weights (can be tuned)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub genre: f64,
    pub director: f64,
    pub actor: f64,
    pub rating: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            genre: 0.4,
            director: 0.3,
            actor: 0.2,
            rating: 0.1,
        }
    }
}

/// Upper bound of the rating scale per media type.
///
/// Movies are rated out of 5 and series out of 10 in the catalog; the two
/// scales are kept separate rather than unified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScales {
    pub movie: f64,
    pub series: f64,
}

impl Default for RatingScales {
    fn default() -> Self {
        Self {
            movie: 5.0,
            series: 10.0,
        }
    }
}

impl RatingScales {
    pub fn for_type(&self, media_type: MediaType) -> f64 {
        match media_type {
            MediaType::Movie => self.movie,
            MediaType::Series => self.series,
        }
    }
}

/// Sort records by score descending. Ties keep their input order.
pub fn rank(records: &mut [RecommendationRecord]) {
    records.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

// ---- Scoring helpers (pure functions) ----

/// Weighted match between one item and a preference profile.
///
/// Not clamped; with ratings inside their scale the result stays within [0, 1].
pub fn score_item(
    item: &CatalogItem,
    media_type: MediaType,
    prefs: &PreferenceProfile,
    weights: &ScoringWeights,
    scales: &RatingScales,
) -> f64 {
    let genre = genre_overlap(item, &prefs.genres);
    let director = overlap_ratio(&item.director_ids, &prefs.directors);
    let actor = overlap_ratio(&item.actor_ids, &prefs.actors);
    let rating_bonus = item.rating / scales.for_type(media_type);

    weights.genre * genre
        + weights.director * director
        + weights.actor * actor
        + weights.rating * rating_bonus
}

/// Explain why an item matches the profile
pub fn generate_reason(item: &CatalogItem, prefs: &PreferenceProfile, catalog: &Catalog) -> String {
    let mut clauses = Vec::new();

    let mut seen = HashSet::new();
    let genres: Vec<&str> = item_genres(item)
        .into_iter()
        .filter(|g| prefs.genres.contains(*g) && seen.insert(*g))
        .collect();
    if !genres.is_empty() {
        clauses.push(format!("You like {}", genres.join(", ")));
    }

    let actors = matching_names(&item.actor_ids, &prefs.actors, catalog);
    if !actors.is_empty() {
        clauses.push(format!("Stars {} from your favorites", actors.join(", ")));
    }

    let directors = matching_names(&item.director_ids, &prefs.directors, catalog);
    if !directors.is_empty() {
        clauses.push(format!("Directed by {} from your favorites", directors.join(", ")));
    }

    if clauses.is_empty() {
        "Based on your preferences".to_string()
    } else {
        clauses.join(" and ")
    }
}

fn matching_names<'a>(
    ids: &'a [String],
    preferred: &HashSet<String>,
    catalog: &'a Catalog,
) -> Vec<&'a str> {
    ids.iter()
        .filter(|id| preferred.contains(*id))
        .map(|id| catalog.person_name(id))
        .collect()
}

/// Personalized candidates: every unconsumed item scoring above the threshold, best first
pub fn content_based(
    user: &UserProfile,
    catalog: &Catalog,
    config: &RecommendationConfig,
) -> Vec<RecommendationRecord> {
    let prefs = extract_preferences(user, catalog);

    let mut scored: Vec<RecommendationRecord> = MediaType::ALL
        .iter()
        .flat_map(|&media_type| {
            let consumed = user.consumed(media_type);
            catalog
                .items(media_type)
                .par_iter()
                .filter(|item| !consumed.contains(item.id.as_str()))
                .filter_map(|item| {
                    let score = score_item(
                        item,
                        media_type,
                        &prefs,
                        &config.weights,
                        &config.rating_scales,
                    );
                    (score > config.content_min_score).then(|| {
                        let reason = generate_reason(item, &prefs, catalog);
                        RecommendationRecord::from_item(media_type, item, score, reason)
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();

    rank(&mut scored);
    scored.truncate(config.content_limit);
    scored
}

/// Main recommendation engine
///
/// Holds the two providers and the tuning parameters. Every call takes a fresh
/// snapshot of the providers, so the engine is cheap to clone and safe to share
/// across tasks.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogProvider>,
    profiles: Arc<dyn ProfileProvider>,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogProvider>, profiles: Arc<dyn ProfileProvider>) -> Self {
        Self::with_config(catalog, profiles, RecommendationConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn CatalogProvider>,
        profiles: Arc<dyn ProfileProvider>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            catalog,
            profiles,
            config,
        }
    }

    /// Engine serving both catalog and profiles from one snapshot store
    pub fn from_store(store: SnapshotStore, config: RecommendationConfig) -> Self {
        let store = Arc::new(store);
        Self::with_config(store.clone(), store, config)
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Materialize the current catalog
    pub fn catalog_snapshot(&self) -> Catalog {
        Catalog::from_provider(self.catalog.as_ref())
    }

    pub fn user_profiles(&self) -> Vec<UserProfile> {
        self.profiles.list_all_user_profiles()
    }

    fn profile(&self, user_id: &str) -> Option<UserProfile> {
        let profile = self.profiles.get_user_profile(user_id);
        if profile.is_none() {
            debug!("No profile for user {}, returning no recommendations", user_id);
        }
        profile
    }

    fn finish(
        &self,
        strategy: Strategy,
        user_id: Option<&str>,
        records: Vec<RecommendationRecord>,
    ) -> Vec<RecommendationRecord> {
        record_returned(strategy, records.len());
        debug!(
            "Generated {} {} recommendations for user {}",
            records.len(),
            strategy.as_str(),
            user_id.unwrap_or("-")
        );
        records
    }

    /// Content-based recommendations for a user
    pub fn recommend_for_user(&self, user_id: &str) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::ContentBased, self.config.slow_threshold_ms);
        let Some(user) = self.profile(user_id) else {
            return Vec::new();
        };
        let catalog = self.catalog_snapshot();
        let records = content_based(&user, &catalog, &self.config);
        self.finish(Strategy::ContentBased, Some(user_id), records)
    }

    /// Most popular items of each type, ordered by rating
    pub fn trending(&self) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::Trending, self.config.slow_threshold_ms);
        let catalog = self.catalog_snapshot();
        let records = trending(&catalog, self.config.trending_per_type);
        self.finish(Strategy::Trending, None, records)
    }

    /// Best rated items carrying `genre` as an exact genre token
    pub fn by_genre(&self, genre: &str) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::Genre, self.config.slow_threshold_ms);
        let catalog = self.catalog_snapshot();
        let records = by_genre(&catalog, genre, self.config.genre_per_type);
        self.finish(Strategy::Genre, None, records)
    }

    /// Content-based and collaborative lists blended into one ranking
    pub fn hybrid_for_user(&self, user_id: &str) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::Hybrid, self.config.slow_threshold_ms);
        let Some(user) = self.profile(user_id) else {
            return Vec::new();
        };
        let catalog = self.catalog_snapshot();
        let users = self.user_profiles();
        let records = self.hybrid_with(&user, &catalog, &users);
        self.finish(Strategy::Hybrid, Some(user_id), records)
    }

    /// Hybrid ranking over an already materialized snapshot
    pub(crate) fn hybrid_with(
        &self,
        user: &UserProfile,
        catalog: &Catalog,
        users: &[UserProfile],
    ) -> Vec<RecommendationRecord> {
        let content = content_based(user, catalog, &self.config);
        let community = collaborative(user, catalog, users, &self.config);
        blend(
            content,
            community,
            self.config.hybrid_content_weight,
            self.config.hybrid_collaborative_weight,
            self.config.hybrid_limit,
        )
    }

    /// Time-of-day aware recommendations
    pub fn smart_for_user(&self, user_id: &str, hour: u32) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::Smart, self.config.slow_threshold_ms);
        let Some(user) = self.profile(user_id) else {
            return Vec::new();
        };
        let catalog = self.catalog_snapshot();
        let records = match select_strategy(hour) {
            ContextStrategy::Personalized => content_based(&user, &catalog, &self.config),
            ContextStrategy::Mood(mood) => {
                debug!("Hour {} selects {} mood for user {}", hour, mood.as_str(), user_id);
                mood_recommendations(mood, &user, &catalog, self.config.mood_per_type)
            }
        };
        self.finish(Strategy::Smart, Some(user_id), records)
    }

    /// Favorites of similar users, ranked by votes
    pub fn collaborative_for_user(&self, user_id: &str) -> Vec<RecommendationRecord> {
        let _timer = PerformanceTimer::new(Strategy::Collaborative, self.config.slow_threshold_ms);
        let Some(user) = self.profile(user_id) else {
            return Vec::new();
        };
        let catalog = self.catalog_snapshot();
        let users = self.user_profiles();
        let records = collaborative(&user, &catalog, &users, &self.config);
        self.finish(Strategy::Collaborative, Some(user_id), records)
    }

    /// Strategy the smart recommender picks at `hour`
    pub fn mood_for_hour(&self, hour: u32) -> ContextStrategy {
        select_strategy(hour)
    }

    /// Hybrid suggestions for every known user, at most `limit` each
    pub async fn digest(&self, limit: usize) -> Result<Vec<UserDigest>> {
        build_digest(self, limit).await
    }
}
