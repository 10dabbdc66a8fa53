//! User Preference Profiles
//!
//! Derives a user's preferred genres, actors and directors from their history.
//! Profiles are computed fresh for every request and never stored.
//!
//! - Genres come from favorites and watched items of both media types. Both
//!   sources land in one unweighted set.
//! - Actors and directors come from favorites only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::features::item_genres;
use crate::catalog::{Catalog, MediaType, UserProfile};

/// Preference profile derived from a user's history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub genres: HashSet<String>,
    pub actors: HashSet<String>,
    pub directors: HashSet<String>,
}

impl PreferenceProfile {
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.actors.is_empty() && self.directors.is_empty()
    }
}

/// Build the preference profile of `user`, resolving item ids against `catalog`.
///
/// Ids missing from the catalog are skipped.
pub fn extract_preferences(user: &UserProfile, catalog: &Catalog) -> PreferenceProfile {
    let mut prefs = PreferenceProfile::default();

    for media_type in MediaType::ALL {
        let favorites = user
            .favorites(media_type)
            .iter()
            .filter_map(|id| catalog.get(media_type, id));

        for item in favorites {
            prefs
                .genres
                .extend(item_genres(item).into_iter().map(str::to_string));
            prefs.actors.extend(item.actor_ids.iter().cloned());
            prefs.directors.extend(item.director_ids.iter().cloned());
        }

        let watched = user
            .watched(media_type)
            .iter()
            .filter_map(|id| catalog.get(media_type, id));

        for item in watched {
            prefs
                .genres
                .extend(item_genres(item).into_iter().map(str::to_string));
        }
    }

    prefs
}
