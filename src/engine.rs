// ---------------------------------------------------------------------------
// Recommendation Engine — multi-strategy score aggregation
// ---------------------------------------------------------------------------
//
// The engine runs every registered strategy over one immutable context,
// sums per-entry contributions, merges explanatory tag lists, and collects
// per-strategy diagnostic profiles. Sorting and pagination of the result
// belong to the caller.
//
// Pure and synchronous: each call folds into its own local accumulator,
// so independent contexts can be scored in parallel with no coordination.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use chrono::Utc;

use crate::error::EngineError;
use crate::tag_preference::{TagPreferenceOptions, TagPreferenceStrategy};
use crate::tags::merge_ranked_tags;
use crate::types::{RecommendationContext, RecommendationResponse, RecommendationScore, StrategyScore};

/// Cap on the merged explanatory tag list of an aggregated score.
pub const MERGED_TAG_LIMIT: usize = 12;

/// Interface for plug-and-play recommendation strategies.
///
/// `score` takes `&mut self` so a strategy can record the diagnostic
/// snapshot it later exposes through `profile`. Strategy configuration
/// itself stays read-only after construction.
pub trait RecommendationStrategy {
	fn name(&self) -> &str;

	/// Return per-entry strategy scores. Entries with a non-positive
	/// score must be omitted from the map.
	fn score(
		&mut self,
		context: &RecommendationContext,
	) -> Result<HashMap<String, StrategyScore>, EngineError>;

	/// Optional strategy-specific diagnostics (e.g. tag weight tables).
	fn profile(&self) -> Option<serde_json::Value> {
		None
	}
}

/// Aggregates multiple strategies and returns sortable scores.
pub struct RecommendationEngine {
	strategies: Vec<Box<dyn RecommendationStrategy>>,
}

impl RecommendationEngine {
	/// Create an engine from an ordered, non-empty strategy list.
	pub fn new(strategies: Vec<Box<dyn RecommendationStrategy>>) -> Result<Self, EngineError> {
		if strategies.is_empty() {
			return Err(EngineError::Configuration(
				"at least one recommendation strategy is required".into(),
			));
		}
		Ok(Self { strategies })
	}

	/// Run every strategy in registration order and aggregate the results.
	///
	/// Strategy errors propagate; callers wanting per-strategy isolation
	/// wrap each strategy themselves.
	pub fn recommend(
		&mut self,
		context: &RecommendationContext,
	) -> Result<RecommendationResponse, EngineError> {
		let mut aggregated: HashMap<String, RecommendationScore> = HashMap::new();

		for strategy in &mut self.strategies {
			let partial = strategy.score(context)?;
			tracing::debug!(
				strategy = strategy.name(),
				scored = partial.len(),
				"strategy scored candidates"
			);

			for (entry_id, strategy_score) in partial {
				if strategy_score.value <= 0.0 {
					continue;
				}
				let current = aggregated.entry(entry_id).or_default();
				current.score += strategy_score.value;
				*current
					.breakdown
					.entry(strategy.name().to_string())
					.or_insert(0.0) += strategy_score.value;
				current.matched_tags = merge_ranked_tags(
					&current.matched_tags,
					&strategy_score.matched_tags,
					MERGED_TAG_LIMIT,
				);
				if !strategy_score.metadata.is_empty() {
					current
						.metadata
						.insert(strategy.name().to_string(), strategy_score.metadata);
				}
			}
		}

		let mut profiles = HashMap::new();
		for strategy in &self.strategies {
			if let Some(profile) = strategy.profile() {
				profiles.insert(strategy.name().to_string(), profile);
			}
		}

		Ok(RecommendationResponse {
			scores: aggregated,
			profiles,
			generated_at: Utc::now(),
		})
	}
}

/// Factory for the default engine: a single tag-preference strategy with
/// stock tunables.
pub fn build_default_engine() -> Result<RecommendationEngine, EngineError> {
	RecommendationEngine::new(vec![Box::new(TagPreferenceStrategy::new(
		TagPreferenceOptions::default(),
	))])
}
