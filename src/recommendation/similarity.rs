//! User Similarity
//!
//! Jaccard similarity between the consumption sets of two users, used to pick
//! the nearest neighbors for collaborative filtering.

use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use crate::catalog::UserProfile;

/// A neighbor of the target user
#[derive(Debug, Clone, Copy)]
pub struct SimilarUser<'a> {
    pub profile: &'a UserProfile,
    pub similarity: f64,
}

/// |A ∩ B| / |A ∪ B|, zero when both sets are empty
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Similarity of two users over the pooled ids of everything they consumed
pub fn user_similarity(a: &UserProfile, b: &UserProfile) -> f64 {
    jaccard(&a.all_consumed(), &b.all_consumed())
}

/// Up to `limit` other users whose similarity exceeds `min_similarity`, most similar first
pub fn find_similar_users<'a>(
    target: &UserProfile,
    users: &'a [UserProfile],
    min_similarity: f64,
    limit: usize,
) -> Vec<SimilarUser<'a>> {
    let target_items = target.all_consumed();

    let mut neighbors: Vec<SimilarUser<'a>> = users
        .par_iter()
        .filter(|other| other.id != target.id)
        .filter_map(|other| {
            let similarity = jaccard(&target_items, &other.all_consumed());
            (similarity > min_similarity).then_some(SimilarUser {
                profile: other,
                similarity,
            })
        })
        .collect();

    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    neighbors.truncate(limit);
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, movies: &[&str], series: &[&str]) -> UserProfile {
        let mut u = UserProfile::new(id);
        u.watched_movies = movies.iter().map(|s| s.to_string()).collect();
        u.favorite_series = series.iter().map(|s| s.to_string()).collect();
        u
    }

    fn set(items: &[&'static str]) -> HashSet<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_jaccard_basic() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), 1.0 / 3.0);
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_jaccard_symmetric_and_reflexive() {
        let a = set(&["x", "y", "z"]);
        let b = set(&["y", "q"]);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_user_similarity_spans_media_types() {
        let a = user("a", &["m1"], &["s1"]);
        let b = user("b", &["m1"], &["s2"]);
        assert!((user_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ids_are_pooled_across_media_types() {
        let a = user("a", &["42"], &[]);
        let b = user("b", &[], &["42"]);
        assert_eq!(user_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_find_similar_users_filters_and_sorts() {
        let target = user("t", &["m1", "m2", "m3", "m4"], &[]);
        let users = vec![
            target.clone(),
            user("close", &["m1", "m2", "m3"], &[]),
            user("medium", &["m1", "m2", "m9"], &[]),
            user("far", &["m1", "m7", "m8", "m9", "m10", "m11", "m12", "m13", "m14", "m15"], &[]),
            user("none", &["x"], &[]),
        ];

        let neighbors = find_similar_users(&target, &users, 0.1, 5);
        let ids: Vec<&str> = neighbors.iter().map(|n| n.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["close", "medium"]);
        assert!(neighbors[0].similarity >= neighbors[1].similarity);
    }

    #[test]
    fn test_find_similar_users_caps_neighbors() {
        let target = user("t", &["m1"], &[]);
        let users: Vec<UserProfile> = (0..10).map(|i| user(&format!("u{i}"), &["m1"], &[])).collect();
        assert_eq!(find_similar_users(&target, &users, 0.1, 5).len(), 5);
    }
}
