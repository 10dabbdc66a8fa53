//! Hybrid Blending
//!
//! Merges a content-based and a collaborative list for the same user into one
//! ranking. Items present in both lists accumulate both weighted scores.

use std::collections::HashMap;

use super::engine::{rank, RecommendationRecord};
use crate::catalog::MediaType;

const CONTENT_PREFIX: &str = "Content-based: ";
const COMMUNITY_PREFIX: &str = "Community-based: ";

/// Blend two ranked lists.
///
/// Content scores are multiplied by `content_weight` and collaborative scores by
/// `collaborative_weight`. Collaborative scores are taken as given, no
/// normalization is applied.
pub fn blend(
    content: Vec<RecommendationRecord>,
    collaborative: Vec<RecommendationRecord>,
    content_weight: f64,
    collaborative_weight: f64,
    limit: usize,
) -> Vec<RecommendationRecord> {
    let mut merged: Vec<RecommendationRecord> = Vec::with_capacity(content.len() + collaborative.len());
    let mut index: HashMap<(MediaType, String), usize> = HashMap::new();

    for mut record in content {
        record.score *= content_weight;
        record.reason = format!("{CONTENT_PREFIX}{}", record.reason);
        index.insert((record.media_type, record.id.clone()), merged.len());
        merged.push(record);
    }

    for mut record in collaborative {
        let key = (record.media_type, record.id.clone());
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.score += record.score * collaborative_weight;
                existing.reason = format!("{} + {COMMUNITY_PREFIX}{}", existing.reason, record.reason);
            }
            None => {
                record.score *= collaborative_weight;
                record.reason = format!("{COMMUNITY_PREFIX}{}", record.reason);
                index.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    rank(&mut merged);
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, media_type: MediaType, score: f64, reason: &str) -> RecommendationRecord {
        RecommendationRecord {
            id: id.into(),
            title: id.into(),
            media_type,
            score,
            reason: reason.into(),
            poster_url: None,
        }
    }

    #[test]
    fn test_blend_combines_shared_items() {
        let content = vec![record("m1", MediaType::Movie, 0.8, "You like Drama")];
        let community = vec![record("m1", MediaType::Movie, 0.5, "Recommended by 2 similar users")];

        let merged = blend(content, community, 0.7, 0.3, 15);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].score - 0.71).abs() < 1e-9);
        assert!(merged[0].reason.contains("Content-based"));
        assert!(merged[0].reason.contains("Community-based"));
    }

    #[test]
    fn test_blend_keeps_disjoint_items_with_prefixes() {
        let content = vec![record("m1", MediaType::Movie, 0.6, "You like Drama")];
        let community = vec![record("s1", MediaType::Series, 2.0, "Recommended by 2 similar users")];

        let merged = blend(content, community, 0.7, 0.3, 15);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "s1");
        assert!((merged[0].score - 0.6).abs() < 1e-9);
        assert_eq!(merged[0].reason, "Community-based: Recommended by 2 similar users");
        assert_eq!(merged[1].reason, "Content-based: You like Drama");
    }

    #[test]
    fn test_blend_keys_on_type_and_id() {
        let content = vec![record("1", MediaType::Movie, 1.0, "a")];
        let community = vec![record("1", MediaType::Series, 1.0, "b")];
        assert_eq!(blend(content, community, 0.7, 0.3, 15).len(), 2);
    }

    #[test]
    fn test_blend_caps_and_sorts() {
        let content: Vec<RecommendationRecord> = (0..20)
            .map(|i| record(&format!("m{i}"), MediaType::Movie, i as f64 / 20.0, "x"))
            .collect();
        let merged = blend(content, Vec::new(), 0.7, 0.3, 15);
        assert_eq!(merged.len(), 15);
        assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
