//! Collaborative Filtering
//!
//! Neighbor users vote for their favorites; items the target user has not
//! consumed are ranked by vote count.

use std::collections::HashMap;
use tracing::debug;

use super::engine::{rank, RecommendationRecord};
use super::similarity::find_similar_users;
use crate::catalog::{Catalog, MediaType, UserProfile};
use crate::config::RecommendationConfig;

/// Votes per unconsumed item, counted over the favorites of the given neighbors
pub fn count_votes<'a>(
    target: &UserProfile,
    neighbors: impl IntoIterator<Item = &'a UserProfile>,
    media_type: MediaType,
) -> HashMap<&'a str, usize> {
    let consumed = target.consumed(media_type);
    let mut votes: HashMap<&'a str, usize> = HashMap::new();

    for neighbor in neighbors {
        for item_id in neighbor.favorites(media_type) {
            if !consumed.contains(item_id.as_str()) {
                *votes.entry(item_id.as_str()).or_insert(0) += 1;
            }
        }
    }

    votes
}

/// Favorites of the most similar users, scored by number of votes.
///
/// Each media type contributes at most `collaborative_per_type` records before
/// the merged list is ranked again.
pub fn collaborative(
    target: &UserProfile,
    catalog: &Catalog,
    users: &[UserProfile],
    config: &RecommendationConfig,
) -> Vec<RecommendationRecord> {
    let neighbors = find_similar_users(target, users, config.min_similarity, config.neighbor_limit);
    if neighbors.is_empty() {
        debug!("No similar users found for {}", target.id);
        return Vec::new();
    }

    let mut merged = Vec::new();
    for media_type in MediaType::ALL {
        let votes = count_votes(target, neighbors.iter().map(|n| n.profile), media_type);

        let mut records: Vec<RecommendationRecord> = votes
            .into_iter()
            .filter_map(|(item_id, count)| {
                let item = catalog.get(media_type, item_id)?;
                Some(RecommendationRecord::from_item(
                    media_type,
                    item,
                    count as f64,
                    format!("Recommended by {} similar users", count),
                ))
            })
            .collect();

        rank(&mut records);
        records.truncate(config.collaborative_per_type);
        merged.extend(records);
    }

    rank(&mut merged);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: id.into(),
            genre: None,
            rating: 3.0,
            review_count: 0,
            actor_ids: vec![],
            director_ids: vec![],
            poster_url: None,
        }
    }

    fn user(id: &str, watched: &[&str], favorites: &[&str]) -> UserProfile {
        let mut u = UserProfile::new(id);
        u.watched_movies = watched.iter().map(|s| s.to_string()).collect();
        u.favorite_movies = favorites.iter().map(|s| s.to_string()).collect();
        u
    }

    #[test]
    fn test_count_votes_skips_consumed() {
        let target = user("t", &["m1"], &[]);
        let a = user("a", &[], &["m1", "m2"]);
        let b = user("b", &[], &["m2", "m3"]);

        let votes = count_votes(&target, [&a, &b], MediaType::Movie);
        assert_eq!(votes.get("m2"), Some(&2));
        assert_eq!(votes.get("m3"), Some(&1));
        assert!(!votes.contains_key("m1"));
    }

    #[test]
    fn test_collaborative_ranks_by_votes() {
        let catalog = Catalog::new(
            vec![item("m1"), item("m2"), item("m3"), item("m4")],
            vec![],
        );
        let target = user("t", &["m1"], &[]);
        let users = vec![
            target.clone(),
            user("a", &[], &["m1", "m2", "m3"]),
            user("b", &[], &["m1", "m2"]),
        ];

        let records = collaborative(&target, &catalog, &users, &RecommendationConfig::default());
        assert_eq!(records[0].id, "m2");
        assert_eq!(records[0].score, 2.0);
        assert_eq!(records[0].reason, "Recommended by 2 similar users");
        assert_eq!(records[1].id, "m3");
        assert!(records.iter().all(|r| r.id != "m1"));
    }

    #[test]
    fn test_collaborative_caps_each_type() {
        let movies: Vec<CatalogItem> = (0..20).map(|i| item(&format!("m{i}"))).collect();
        let catalog = Catalog::new(movies, vec![]);
        let watched: Vec<String> = (0..5).map(|i| format!("m{i}")).collect();
        let favorites: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
        let watched_refs: Vec<&str> = watched.iter().map(String::as_str).collect();
        let favorite_refs: Vec<&str> = favorites.iter().map(String::as_str).collect();

        let target = user("t", &watched_refs, &[]);
        let neighbor = user("n", &[], &favorite_refs);

        let records = collaborative(
            &target,
            &catalog,
            &[target.clone(), neighbor],
            &RecommendationConfig::default(),
        );
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| !watched.contains(&r.id)));
    }

    #[test]
    fn test_shared_id_across_types_makes_neighbors() {
        let catalog = Catalog::new(vec![item("1"), item("2")], vec![item("1")]);
        let target = user("a", &["1"], &[]);
        let mut neighbor = user("b", &[], &["2"]);
        neighbor.watched_series.insert("1".into());

        let records = collaborative(
            &target,
            &catalog,
            &[target.clone(), neighbor],
            &RecommendationConfig::default(),
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
        assert_eq!(records[0].media_type, MediaType::Movie);
        assert_eq!(records[0].score, 1.0);
    }

    #[test]
    fn test_collaborative_without_neighbors_is_empty() {
        let catalog = Catalog::new(vec![item("m1")], vec![]);
        let target = user("t", &["m1"], &[]);
        let records = collaborative(
            &target,
            &catalog,
            &[target.clone()],
            &RecommendationConfig::default(),
        );
        assert!(records.is_empty());
    }
}
