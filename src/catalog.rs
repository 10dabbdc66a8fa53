//! Catalog and user profile data
//!
//! The engine never owns catalog or profile state. It reads both through the
//! [`CatalogProvider`] and [`ProfileProvider`] traits and materializes a fresh,
//! immutable [`Catalog`] per request.
//!
//! [`SnapshotStore`] is the bundled provider: a JSON document holding movies,
//! series, the people directory and every user profile.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, instrument};

/// Kind of catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie or series as exposed by the catalog provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Comma separated genre names, kept exactly as the provider stores them
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub actor_ids: Vec<String>,
    #[serde(default)]
    pub director_ids: Vec<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Actor or director entry of the people directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
}

/// A user's consumption history, referencing catalog items by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub favorite_movies: HashSet<String>,
    #[serde(default)]
    pub favorite_series: HashSet<String>,
    #[serde(default)]
    pub watched_movies: HashSet<String>,
    #[serde(default)]
    pub watched_series: HashSet<String>,
    #[serde(default)]
    pub watchlist_movies: HashSet<String>,
    #[serde(default)]
    pub watchlist_series: HashSet<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn favorites(&self, media_type: MediaType) -> &HashSet<String> {
        match media_type {
            MediaType::Movie => &self.favorite_movies,
            MediaType::Series => &self.favorite_series,
        }
    }

    pub fn watched(&self, media_type: MediaType) -> &HashSet<String> {
        match media_type {
            MediaType::Movie => &self.watched_movies,
            MediaType::Series => &self.watched_series,
        }
    }

    pub fn watchlist(&self, media_type: MediaType) -> &HashSet<String> {
        match media_type {
            MediaType::Movie => &self.watchlist_movies,
            MediaType::Series => &self.watchlist_series,
        }
    }

    /// Favorites, watched and watchlist for one media type
    pub fn consumed(&self, media_type: MediaType) -> HashSet<&str> {
        self.favorites(media_type)
            .iter()
            .chain(self.watched(media_type))
            .chain(self.watchlist(media_type))
            .map(String::as_str)
            .collect()
    }

    pub fn has_consumed(&self, media_type: MediaType, item_id: &str) -> bool {
        self.favorites(media_type).contains(item_id)
            || self.watched(media_type).contains(item_id)
            || self.watchlist(media_type).contains(item_id)
    }

    /// Ids of every consumed item, movies and series pooled into one set
    pub fn all_consumed(&self) -> HashSet<&str> {
        MediaType::ALL
            .iter()
            .flat_map(|&t| self.consumed(t))
            .collect()
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Read-only source of catalog data
pub trait CatalogProvider: Send + Sync {
    fn list_all_movies(&self) -> Vec<CatalogItem>;

    fn list_all_series(&self) -> Vec<CatalogItem>;

    /// Display names for actor and director identifiers
    fn list_people(&self) -> Vec<Person> {
        Vec::new()
    }
}

/// Read-only source of user profiles
pub trait ProfileProvider: Send + Sync {
    fn get_user_profile(&self, user_id: &str) -> Option<UserProfile>;

    fn list_all_user_profiles(&self) -> Vec<UserProfile>;
}

// ============================================================================
// Per-request catalog view
// ============================================================================

/// Immutable catalog view used for one recommendation computation
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<CatalogItem>,
    series: Vec<CatalogItem>,
    movie_index: HashMap<String, usize>,
    series_index: HashMap<String, usize>,
    people: HashMap<String, String>,
}

impl Catalog {
    pub fn new(movies: Vec<CatalogItem>, series: Vec<CatalogItem>) -> Self {
        let movie_index = index_by_id(&movies);
        let series_index = index_by_id(&series);
        Self {
            movies,
            series,
            movie_index,
            series_index,
            people: HashMap::new(),
        }
    }

    pub fn with_people(mut self, people: impl IntoIterator<Item = Person>) -> Self {
        self.people = people.into_iter().map(|p| (p.id, p.name)).collect();
        self
    }

    /// Materialize a catalog from a provider
    pub fn from_provider(provider: &dyn CatalogProvider) -> Self {
        Self::new(provider.list_all_movies(), provider.list_all_series())
            .with_people(provider.list_people())
    }

    pub fn items(&self, media_type: MediaType) -> &[CatalogItem] {
        match media_type {
            MediaType::Movie => &self.movies,
            MediaType::Series => &self.series,
        }
    }

    pub fn get(&self, media_type: MediaType, id: &str) -> Option<&CatalogItem> {
        let (items, index) = match media_type {
            MediaType::Movie => (&self.movies, &self.movie_index),
            MediaType::Series => (&self.series, &self.series_index),
        };
        index.get(id).map(|&i| &items[i])
    }

    /// Display name for a person id, falling back to the id itself
    pub fn person_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.people.get(id).map(String::as_str).unwrap_or(id)
    }
}

fn index_by_id(items: &[CatalogItem]) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect()
}

// ============================================================================
// Snapshot store
// ============================================================================

/// Serialized form of the whole provider state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub movies: Vec<CatalogItem>,
    #[serde(default)]
    pub series: Vec<CatalogItem>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

/// Catalog and profile provider backed by an in-memory snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Snapshot,
    users_by_id: HashMap<String, usize>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        let users_by_id = snapshot
            .users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.id.clone(), i))
            .collect();
        Self {
            snapshot,
            users_by_id,
        }
    }

    /// Load a snapshot from a JSON file
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Snapshot {
            path: path.to_path_buf(),
            message: e.to_string().into(),
            source: Some(e),
        })?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|source| Error::SnapshotFormat {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded snapshot: {} movies, {} series, {} people, {} users",
            snapshot.movies.len(),
            snapshot.series.len(),
            snapshot.people.len(),
            snapshot.users.len()
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl CatalogProvider for SnapshotStore {
    fn list_all_movies(&self) -> Vec<CatalogItem> {
        self.snapshot.movies.clone()
    }

    fn list_all_series(&self) -> Vec<CatalogItem> {
        self.snapshot.series.clone()
    }

    fn list_people(&self) -> Vec<Person> {
        self.snapshot.people.clone()
    }
}

impl ProfileProvider for SnapshotStore {
    fn get_user_profile(&self, user_id: &str) -> Option<UserProfile> {
        self.users_by_id
            .get(user_id)
            .map(|&i| self.snapshot.users[i].clone())
    }

    fn list_all_user_profiles(&self) -> Vec<UserProfile> {
        self.snapshot.users.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn movie(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: format!("Movie {id}"),
            genre: Some("Drama".to_string()),
            rating: 4.0,
            review_count: 10,
            actor_ids: vec![],
            director_ids: vec![],
            poster_url: None,
        }
    }

    #[test]
    fn test_consumed_is_union_of_all_lists() {
        let mut user = UserProfile::new("u1");
        user.favorite_movies.insert("m1".into());
        user.watched_movies.insert("m2".into());
        user.watchlist_movies.insert("m3".into());
        user.watched_series.insert("s1".into());

        let consumed = user.consumed(MediaType::Movie);
        assert_eq!(consumed.len(), 3);
        assert!(user.has_consumed(MediaType::Movie, "m3"));
        assert!(!user.has_consumed(MediaType::Movie, "s1"));
        assert!(user.has_consumed(MediaType::Series, "s1"));
        assert_eq!(user.all_consumed().len(), 4);
    }

    #[test]
    fn test_all_consumed_pools_ids_across_types() {
        let mut user = UserProfile::new("u1");
        user.watched_movies.insert("1".into());
        user.favorite_series.insert("1".into());
        user.watchlist_series.insert("2".into());

        let all = user.all_consumed();
        assert_eq!(all.len(), 2);
        assert!(all.contains("1") && all.contains("2"));
    }

    #[test]
    fn test_catalog_lookup_by_type() {
        let catalog = Catalog::new(vec![movie("1"), movie("2")], vec![]);
        assert!(catalog.get(MediaType::Movie, "2").is_some());
        assert!(catalog.get(MediaType::Series, "2").is_none());
        assert_eq!(catalog.items(MediaType::Movie).len(), 2);
        assert!(catalog.items(MediaType::Series).is_empty());
    }

    #[test]
    fn test_person_name_falls_back_to_id() {
        let catalog = Catalog::default().with_people(vec![Person {
            id: "a1".into(),
            name: "Tilda Swinton".into(),
        }]);
        assert_eq!(catalog.person_name("a1"), "Tilda Swinton");
        assert_eq!(catalog.person_name("a2"), "a2");
    }

    #[test]
    fn test_snapshot_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "movies": [{{"id": "m1", "title": "Alien", "genre": "Horror, Science Fiction",
                             "rating": 4.5, "reviewCount": 120, "directorIds": ["d1"]}}],
                "users": [{{"id": "u1", "favoriteMovies": ["m1"]}}]
            }}"#
        )
        .unwrap();

        let store = SnapshotStore::load(file.path()).unwrap();
        assert_eq!(store.list_all_movies().len(), 1);
        assert!(store.list_all_series().is_empty());
        assert_eq!(store.list_all_movies()[0].director_ids, vec!["d1"]);

        let user = store.get_user_profile("u1").unwrap();
        assert!(user.favorite_movies.contains("m1"));
        assert!(user.watched_series.is_empty());
        assert!(store.get_user_profile("nobody").is_none());
    }

    #[test]
    fn test_snapshot_load_missing_file() {
        let err = SnapshotStore::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "SNAPSHOT_ERROR");
    }

    #[test]
    fn test_snapshot_load_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = SnapshotStore::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::SnapshotFormat { .. }));
    }

    #[test]
    fn test_provider_returns_independent_copies() {
        let store = SnapshotStore::new(Snapshot {
            movies: vec![movie("m1")],
            ..Default::default()
        });
        let mut movies = store.list_all_movies();
        movies.clear();
        assert_eq!(store.list_all_movies().len(), 1);
    }
}
