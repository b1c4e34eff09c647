//! Similarity matching for activity-partner demands.
//!
//! A drafted [`Demand`] is scored against existing demands field by field
//! (activity type, time, location, head count, description). Scores are
//! combined into a 0..=100 similarity, and the demands that clear a
//! threshold are returned best first.

pub mod error;
pub mod keywords;
pub mod publish;
pub mod schema;
pub mod scoring;
pub mod text;
pub mod time;

pub use error::ConfigError;
pub use publish::{route_new_demand, PublishDecision};
pub use schema::{Demand, DemandId, HeadCount, Match};
pub use scoring::{
    calculate_similarity, find_similar_demands, MatchRules, ScoreBreakdown, SimilarityLevel,
    DEFAULT_MIN_SIMILARITY,
};
