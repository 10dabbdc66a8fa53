//! Recommendation Module
//!
//! Ranked movie and series suggestions computed on demand from a read-only
//! snapshot of the catalog and user profiles.
//!
//! ## Architecture
//!
//! 1. **Preferences** - Genres, actors and directors a user gravitates to
//! 2. **Features** - Genre tokens, overlap ratios and popularity of catalog items
//! 3. **Engine** - Content scoring, reasons, and the strategy facade
//! 4. **Similarity / Collaborative** - Jaccard neighbors and their favorites
//! 5. **Hybrid** - Weighted merge of content and community lists
//! 6. **Context** - Time-of-day strategy selection
//! 7. **Popular** - Trending and by-genre rankings
//!
//! ## Content Scoring
//!
//! - Genre overlap (40%)
//! - Director overlap (30%)
//! - Actor overlap (20%)
//! - Rating bonus (10%), rating over the media type's scale

pub mod collaborative;
pub mod context;
pub mod digest;
pub mod engine;
pub mod features;
pub mod hybrid;
pub mod metrics;
pub mod popular;
pub mod preferences;
pub mod similarity;

// Re-export the types that are actually used externally
pub use context::{ContextStrategy, Mood};
pub use digest::{build_digest, UserDigest};
pub use engine::{
    RatingScales, RecommendationEngine, RecommendationRecord, ScoringWeights, Strategy,
};
pub use preferences::PreferenceProfile;
