//! Cinematch library crate
//!
//! Re-exports core modules for integration tests and external use.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod recommendation;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogItem, CatalogProvider, MediaType, Person, ProfileProvider, Snapshot,
    SnapshotStore, UserProfile,
};
pub use config::{Config, RecommendationConfig};
pub use error::{Error, Result};
pub use recommendation::*;
