//! Context-Aware Strategy Selection
//!
//! Picks a recommendation strategy from the hour of the day:
//!
//! | Hours          | Strategy                          |
//! |----------------|-----------------------------------|
//! | 06:00 - 11:59  | light mood                        |
//! | 12:00 - 17:59  | personalized (content-based)      |
//! | 18:00 - 21:59  | evening mood                      |
//! | otherwise      | night mood                        |

use serde::Serialize;
use std::cmp::Ordering;

use super::engine::{rank, RecommendationRecord};
use super::features::has_any_genre;
use crate::catalog::{Catalog, MediaType, UserProfile};

/// Genre-driven mood used outside the personalized afternoon window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Light,
    Evening,
    Night,
}

impl Mood {
    pub fn genres(&self) -> &'static [&'static str] {
        match self {
            Mood::Light => &["Comedy", "Animation", "Family", "Romance"],
            Mood::Evening => &["Drama", "Action", "Adventure", "Crime"],
            Mood::Night => &["Thriller", "Horror", "Mystery", "Science Fiction"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mood::Light => "Light and cheerful picks to start your day",
            Mood::Evening => "Gripping stories for your evening",
            Mood::Night => "Suspenseful picks for late night viewing",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Light => "light",
            Mood::Evening => "evening",
            Mood::Night => "night",
        }
    }
}

/// Strategy chosen for a given hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStrategy {
    Mood(Mood),
    Personalized,
}

/// Bucket an hour of the day. Hours outside 0-23 fall into the night bucket.
pub fn select_strategy(hour: u32) -> ContextStrategy {
    match hour {
        6..=11 => ContextStrategy::Mood(Mood::Light),
        12..=17 => ContextStrategy::Personalized,
        18..=21 => ContextStrategy::Mood(Mood::Evening),
        _ => ContextStrategy::Mood(Mood::Night),
    }
}

/// Best rated unconsumed items matching the mood's genres, capped per media type
pub fn mood_recommendations(
    mood: Mood,
    user: &UserProfile,
    catalog: &Catalog,
    per_type: usize,
) -> Vec<RecommendationRecord> {
    let genres = mood.genres();
    let mut merged = Vec::new();

    for media_type in MediaType::ALL {
        let consumed = user.consumed(media_type);
        let mut matching: Vec<_> = catalog
            .items(media_type)
            .iter()
            .filter(|item| !consumed.contains(item.id.as_str()))
            .filter(|item| has_any_genre(item, genres))
            .collect();

        matching.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        merged.extend(matching.into_iter().take(per_type).map(|item| {
            RecommendationRecord::from_item(media_type, item, item.rating, mood.description())
        }));
    }

    rank(&mut merged);
    merged
}
