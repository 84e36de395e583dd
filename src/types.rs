// ---------------------------------------------------------------------------
// Core data model for the recommendation engine
// ---------------------------------------------------------------------------
//
// Value objects shared between the engine and its strategies: candidate
// entries, per-user signal maps, per-strategy and aggregated scores, and
// the immutable context snapshot a strategy reads from.
//
// Everything here is created fresh per recommendation request and never
// mutated after construction.
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry ID -> optional ISO-8601 timestamp of when the signal occurred.
/// Used for favorites, passive reads, and deep-read requests alike.
pub type SignalMap = HashMap<String, Option<String>>;

/// A candidate document the engine may recommend.
///
/// The engine only looks at `id` and the two tag lists. `updated_at` is
/// carried for the caller's own tie-breaking and stays opaque here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
	pub id: String,
	#[serde(rename = "topTags", default)]
	pub top_tags: Vec<String>,
	#[serde(rename = "detailTags", default)]
	pub detail_tags: Vec<String>,
	#[serde(rename = "updatedAt", default)]
	pub updated_at: Option<String>,
}

/// Open metadata value. Kept to a small closed union since the only
/// consumers are diagnostics and explainability output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	TextList(Vec<String>),
}

/// Context block passed to recommendation strategies.
///
/// `*_meta` carries the entry objects for the IDs present in the matching
/// `*_map`, so a strategy gets both tag content and recency in one pass
/// of each list without a side lookup table.
#[derive(Debug, Clone, Default)]
pub struct RecommendationContext {
	pub candidate_entries: Vec<Entry>,
	pub favorites_meta: Vec<Entry>,
	pub favorites_map: SignalMap,
	pub read_meta: Vec<Entry>,
	pub read_map: SignalMap,
	pub deep_read_meta: Vec<Entry>,
	pub deep_read_map: SignalMap,
	pub extra: HashMap<String, MetaValue>,
}

impl RecommendationContext {
	/// Context with only a candidate pool; signal fields start empty.
	pub fn new(candidate_entries: Vec<Entry>) -> Self {
		Self {
			candidate_entries,
			..Self::default()
		}
	}
}

/// Per-strategy score for a single entry. Strategies never emit a
/// non-positive `value`; such entries are simply omitted from the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyScore {
	pub value: f64,
	#[serde(rename = "matchedTags", default)]
	pub matched_tags: Vec<String>,
	#[serde(default)]
	pub metadata: HashMap<String, MetaValue>,
}

/// Aggregated score information returned to callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationScore {
	pub score: f64,
	#[serde(rename = "matchedTags", default)]
	pub matched_tags: Vec<String>,
	/// Strategy name -> that strategy's contribution to `score`.
	#[serde(default)]
	pub breakdown: HashMap<String, f64>,
	/// Strategy name -> that strategy's explainability metadata.
	#[serde(default)]
	pub metadata: HashMap<String, HashMap<String, MetaValue>>,
}

/// Container for engine output. Entries absent from `scores` are
/// implicitly "not recommended"; fallback ordering is the caller's call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
	pub scores: HashMap<String, RecommendationScore>,
	/// Strategy name -> diagnostic snapshot, for operator tooling only.
	#[serde(default)]
	pub profiles: HashMap<String, serde_json::Value>,
	#[serde(rename = "generatedAt")]
	pub generated_at: DateTime<Utc>,
}
