// ---------------------------------------------------------------------------
// feedrec-engine — personalized recommendation scoring
// ---------------------------------------------------------------------------
//
// Ranks candidate feed entries for a user from three preference signals:
// favorites, deep-read requests, and passive read history, with
// exponential recency decay and sample-gated negative suppression.
//
// Pure and synchronous: the caller loads all per-user data, builds a
// `RecommendationContext`, and consumes the `RecommendationResponse`.
// Sorting, pagination, and rendering stay on the caller's side, so this
// crate can be shared by a web layer, batch jobs, or CLI tooling.
// ---------------------------------------------------------------------------

pub mod decay;
pub mod engine;
pub mod error;
pub mod tag_preference;
pub mod tags;
pub mod types;

pub use engine::{build_default_engine, RecommendationEngine, RecommendationStrategy};
pub use error::EngineError;
pub use tag_preference::{TagPreferenceOptions, TagPreferenceStrategy};
pub use types::{
	Entry, MetaValue, RecommendationContext, RecommendationResponse, RecommendationScore,
	SignalMap, StrategyScore,
};
