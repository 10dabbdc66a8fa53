//! Catalog Item Features
//!
//! Extracts the matchable features of a catalog item: genre tokens parsed
//! from the comma separated genre field, overlap ratios against a preference
//! set, and the popularity measure used by the trending ranking.

use std::collections::HashSet;

use crate::catalog::CatalogItem;

/// Split a genre field on commas, dropping surrounding whitespace and empty tokens.
///
/// Order and duplicates are preserved: `"Drama, Drama"` yields two tokens.
pub fn genre_tokens(genre: &str) -> Vec<&str> {
    genre
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Genre tokens of an item; a missing genre field yields no tokens
pub fn item_genres(item: &CatalogItem) -> Vec<&str> {
    item.genre.as_deref().map(genre_tokens).unwrap_or_default()
}

/// True if the item's genre field contains `genre` as an exact token
pub fn has_genre(item: &CatalogItem, genre: &str) -> bool {
    item_genres(item).iter().any(|token| *token == genre)
}

/// True if any of the item's genre tokens appears in `genres`
pub fn has_any_genre(item: &CatalogItem, genres: &[&str]) -> bool {
    item_genres(item).iter().any(|token| genres.contains(token))
}

/// Fraction of `values` present in `preferred`, with the denominator floored at one
pub fn overlap_ratio(values: &[String], preferred: &HashSet<String>) -> f64 {
    let matches = values.iter().filter(|v| preferred.contains(*v)).count();
    matches as f64 / values.len().max(1) as f64
}

/// Fraction of the item's genre tokens found in the preferred set; zero without tokens
pub fn genre_overlap(item: &CatalogItem, preferred: &HashSet<String>) -> f64 {
    let tokens = item_genres(item);
    if tokens.is_empty() {
        return 0.0;
    }
    let matches = tokens.iter().filter(|t| preferred.contains(**t)).count();
    matches as f64 / tokens.len() as f64
}

/// Popularity used to pick trending items: `rating * ln(review_count + 1)`
pub fn popularity(item: &CatalogItem) -> f64 {
    item.rating * ((item.review_count as f64) + 1.0).ln()
}
