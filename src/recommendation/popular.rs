//! Non-personalized rankings: trending and by-genre

use std::cmp::Ordering;

use super::engine::{rank, RecommendationRecord};
use super::features::{has_genre, popularity};
use crate::catalog::{Catalog, CatalogItem, MediaType};

fn sort_desc_by<F>(items: &mut [&CatalogItem], key: F)
where
    F: Fn(&CatalogItem) -> f64,
{
    items.sort_by(|a, b| key(*b).partial_cmp(&key(*a)).unwrap_or(Ordering::Equal));
}

/// Top `per_type` items of each type by popularity, returned ordered by rating.
///
/// Popularity only selects the candidates; the final order uses the raw rating.
pub fn trending(catalog: &Catalog, per_type: usize) -> Vec<RecommendationRecord> {
    let mut merged = Vec::new();

    for media_type in MediaType::ALL {
        let mut items: Vec<&CatalogItem> = catalog.items(media_type).iter().collect();
        sort_desc_by(&mut items, popularity);

        merged.extend(items.into_iter().take(per_type).map(|item| {
            let reason = format!("Trending now with a {:.1} rating", item.rating);
            RecommendationRecord::from_item(media_type, item, item.rating, reason)
        }));
    }

    rank(&mut merged);
    merged
}

/// Best rated items whose genre tokens include `genre` exactly
pub fn by_genre(catalog: &Catalog, genre: &str, per_type: usize) -> Vec<RecommendationRecord> {
    let reason = format!("Recommended for {} fans", genre);
    let mut merged = Vec::new();

    for media_type in MediaType::ALL {
        let mut items: Vec<&CatalogItem> = catalog
            .items(media_type)
            .iter()
            .filter(|item| has_genre(item, genre))
            .collect();
        sort_desc_by(&mut items, |item| item.rating);

        merged.extend(
            items
                .into_iter()
                .take(per_type)
                .map(|item| RecommendationRecord::from_item(media_type, item, item.rating, reason.as_str())),
        );
    }

    rank(&mut merged);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, genre: &str, rating: f64, review_count: u64) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: id.into(),
            genre: Some(genre.into()),
            rating,
            review_count,
            actor_ids: vec![],
            director_ids: vec![],
            poster_url: None,
        }
    }

    #[test]
    fn test_trending_orders_by_rating_not_popularity() {
        let catalog = Catalog::new(
            vec![item("m1", "Drama", 4.5, 100), item("m2", "Drama", 4.0, 1000)],
            vec![],
        );
        let records = trending(&catalog, 10);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(records[0].reason, "Trending now with a 4.5 rating");
    }

    #[test]
    fn test_trending_selects_by_popularity() {
        // m-hidden has the best rating but no reviews, so it never makes the cut
        let mut movies = vec![item("m-hidden", "Drama", 5.0, 0)];
        movies.extend((0..10).map(|i| item(&format!("m{i}"), "Drama", 3.0, 50)));
        let catalog = Catalog::new(movies, vec![item("s1", "Drama", 7.0, 5)]);

        let records = trending(&catalog, 10);
        assert_eq!(records.len(), 11);
        assert!(records.iter().all(|r| r.id != "m-hidden"));
        assert_eq!(records[0].id, "s1");
    }

    #[test]
    fn test_by_genre_exact_token() {
        let catalog = Catalog::new(
            vec![
                item("m1", "Horror, Thriller", 3.5, 1),
                item("m2", "Psychological", 5.0, 1),
                item("m3", "Horror", 4.0, 1),
            ],
            vec![item("s1", "Comedy, Horror", 6.0, 1)],
        );
        let records = by_genre(&catalog, "Horror", 15);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "m3", "m1"]);
        assert!(records.iter().all(|r| r.reason == "Recommended for Horror fans"));
    }

    #[test]
    fn test_by_genre_caps_each_type() {
        let movies: Vec<CatalogItem> = (0..20)
            .map(|i| item(&format!("m{i}"), "Crime", i as f64 / 4.0, 1))
            .collect();
        let catalog = Catalog::new(movies, vec![]);
        let records = by_genre(&catalog, "Crime", 15);
        assert_eq!(records.len(), 15);
        assert_eq!(records[0].id, "m19");
    }

    #[test]
    fn test_by_genre_unknown_genre_is_empty() {
        let catalog = Catalog::new(vec![item("m1", "Drama", 3.0, 1)], vec![]);
        assert!(by_genre(&catalog, "Western", 15).is_empty());
    }
}
