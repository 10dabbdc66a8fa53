//! Recommendation Digest
//!
//! Computes hybrid recommendations for every known user in one pass, for a
//! delivery layer that pushes suggestions out. Nothing is stored; each call
//! reflects the providers' current state.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use super::engine::{RecommendationEngine, RecommendationRecord, Strategy};
use super::metrics::{record_returned, PerformanceTimer};
use crate::error::{Error, Result};

/// Suggestions for one user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDigest {
    pub user_id: String,
    pub recommendations: Vec<RecommendationRecord>,
}

/// Build the digest for all users, at most `limit` records each.
///
/// Scoring is CPU bound, so it runs on rayon inside a blocking task and never
/// stalls the async runtime. Users without any recommendation are omitted.
#[instrument(skip(engine))]
pub async fn build_digest(engine: &RecommendationEngine, limit: usize) -> Result<Vec<UserDigest>> {
    let engine = engine.clone();

    let digests = tokio::task::spawn_blocking(move || {
        let _timer = PerformanceTimer::new(Strategy::Digest, engine.config().slow_threshold_ms);
        let catalog = engine.catalog_snapshot();
        let users = engine.user_profiles();

        let mut digests: Vec<UserDigest> = users
            .par_iter()
            .filter_map(|user| {
                let mut recommendations = engine.hybrid_with(user, &catalog, &users);
                recommendations.truncate(limit);
                (!recommendations.is_empty()).then(|| UserDigest {
                    user_id: user.id.clone(),
                    recommendations,
                })
            })
            .collect();

        digests.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        digests
    })
    .await
    .map_err(Error::internal)?;

    let total: usize = digests.iter().map(|d| d.recommendations.len()).sum();
    record_returned(Strategy::Digest, total);
    info!(
        "Built digest for {} users ({} recommendations)",
        digests.len(),
        total
    );

    Ok(digests)
}
