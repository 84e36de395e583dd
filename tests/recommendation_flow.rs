// ---------------------------------------------------------------------------
// End-to-end recommendation flow tests
// ---------------------------------------------------------------------------
//
// Exercises the engine and the tag-preference strategy together the way a
// caller would: build a context, recommend, then sort and inspect the
// response.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use feedrec_engine::engine::MERGED_TAG_LIMIT;
use feedrec_engine::{
	Entry, EngineError, RecommendationContext, RecommendationEngine, RecommendationStrategy,
	SignalMap, StrategyScore, TagPreferenceOptions, TagPreferenceStrategy,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixed_now() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn entry(id: &str, top: &[&str], detail: &[&str]) -> Entry {
	Entry {
		id: id.to_string(),
		top_tags: top.iter().map(|s| s.to_string()).collect(),
		detail_tags: detail.iter().map(|s| s.to_string()).collect(),
		updated_at: None,
	}
}

fn days_ago(days: i64) -> Option<String> {
	Some((fixed_now() - Duration::days(days)).to_rfc3339())
}

fn signal_map(entries: &[(&str, Option<String>)]) -> SignalMap {
	entries
		.iter()
		.map(|(id, ts)| (id.to_string(), ts.clone()))
		.collect()
}

fn tag_preference_engine(options: TagPreferenceOptions) -> RecommendationEngine {
	let strategy = TagPreferenceStrategy::new(TagPreferenceOptions {
		now: Some(fixed_now()),
		..options
	});
	RecommendationEngine::new(vec![Box::new(strategy)]).unwrap()
}

/// Scores every candidate at a constant value under one synthetic tag.
struct ConstantStrategy {
	name: String,
	value: f64,
}

impl RecommendationStrategy for ConstantStrategy {
	fn name(&self) -> &str {
		&self.name
	}

	fn score(
		&mut self,
		context: &RecommendationContext,
	) -> Result<HashMap<String, StrategyScore>, EngineError> {
		Ok(context
			.candidate_entries
			.iter()
			.filter(|e| !e.id.is_empty())
			.map(|e| {
				(
					e.id.clone(),
					StrategyScore {
						value: self.value,
						matched_tags: vec![format!("{}:match", self.name)],
						metadata: HashMap::new(),
					},
				)
			})
			.collect())
	}
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn favorite_scenario_orders_detail_above_top_and_drops_unrelated() {
	let mut engine = tag_preference_engine(TagPreferenceOptions::default());
	let ctx = RecommendationContext {
		candidate_entries: vec![
			entry("a", &["llm"], &[]),
			entry("b", &[], &["diffusion"]),
			entry("c", &[], &["other"]),
		],
		favorites_meta: vec![entry("f", &["llm"], &["diffusion"])],
		favorites_map: signal_map(&[("f", days_ago(0))]),
		..RecommendationContext::default()
	};

	let response = engine.recommend(&ctx).unwrap();
	assert!(response.scores.contains_key("a"));
	assert!(response.scores.contains_key("b"));
	assert!(!response.scores.contains_key("c"));
	assert!(response.scores["b"].score > response.scores["a"].score);

	// Sort the way the caller would and check the ranking end to end.
	let mut ranked: Vec<_> = response.scores.iter().collect();
	ranked.sort_by(|x, y| {
		y.1.score
			.partial_cmp(&x.1.score)
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	assert_eq!(ranked[0].0, "b");
	assert_eq!(ranked[1].0, "a");
}

#[test]
fn recent_corroborated_reads_suppress_an_older_favorite() {
	let mut engine = tag_preference_engine(TagPreferenceOptions {
		min_negative_samples: 2,
		..TagPreferenceOptions::default()
	});
	let ctx = RecommendationContext {
		candidate_entries: vec![entry("cand", &[], &["vision"])],
		favorites_meta: vec![entry("fav", &[], &["vision"])],
		favorites_map: signal_map(&[("fav", days_ago(10))]),
		read_meta: vec![
			entry("r1", &[], &["vision"]),
			entry("r2", &[], &["vision"]),
		],
		read_map: signal_map(&[("r1", days_ago(1)), ("r2", days_ago(2))]),
		..RecommendationContext::default()
	};

	let response = engine.recommend(&ctx).unwrap();
	assert!(response.scores.is_empty());
	// Caller falls back to chronological order; the profile still explains why.
	let profile = &response.profiles["tag_preference"];
	assert_eq!(profile["top_tags"], json!([]));
}

#[test]
fn breakdown_tracks_each_strategy_contribution() {
	let tag_strategy = TagPreferenceStrategy::new(TagPreferenceOptions {
		now: Some(fixed_now()),
		..TagPreferenceOptions::default()
	});
	let constant = ConstantStrategy {
		name: "constant".into(),
		value: 0.25,
	};
	let mut engine =
		RecommendationEngine::new(vec![Box::new(tag_strategy), Box::new(constant)]).unwrap();

	let ctx = RecommendationContext {
		candidate_entries: vec![entry("a", &["llm"], &[]), entry("c", &[], &["other"])],
		favorites_meta: vec![entry("f", &["llm"], &[])],
		favorites_map: signal_map(&[("f", days_ago(0))]),
		..RecommendationContext::default()
	};

	let response = engine.recommend(&ctx).unwrap();

	// "a" gets contributions from both strategies, summed.
	let a = &response.scores["a"];
	let tag_part = a.breakdown["tag_preference"];
	let const_part = a.breakdown["constant"];
	assert!(tag_part > 0.0);
	assert!((const_part - 0.25).abs() < 1e-9);
	assert!((a.score - (tag_part + const_part)).abs() < 1e-9);

	// "c" is only picked up by the constant strategy.
	let c = &response.scores["c"];
	assert!(!c.breakdown.contains_key("tag_preference"));
	assert!((c.score - 0.25).abs() < 1e-9);

	// Tag lists merged across strategies, in discovery order.
	assert_eq!(a.matched_tags, vec!["llm", "constant:match"]);

	// Only the tag strategy exposes a profile.
	assert!(response.profiles.contains_key("tag_preference"));
	assert!(!response.profiles.contains_key("constant"));
}

#[test]
fn merged_tag_list_stays_within_cap_across_strategies() {
	// One favorite with many fresh detail tags, all matched by the
	// candidate, plus a second strategy appending one more tag.
	let tags: Vec<String> = (0..15).map(|i| format!("topic{i:02}")).collect();
	let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();

	let tag_strategy = TagPreferenceStrategy::new(TagPreferenceOptions {
		now: Some(fixed_now()),
		..TagPreferenceOptions::default()
	});
	let constant = ConstantStrategy {
		name: "constant".into(),
		value: 0.1,
	};
	let mut engine =
		RecommendationEngine::new(vec![Box::new(tag_strategy), Box::new(constant)]).unwrap();

	let ctx = RecommendationContext {
		candidate_entries: vec![entry("cand", &[], &tag_refs)],
		favorites_meta: vec![entry("f", &[], &tag_refs)],
		favorites_map: signal_map(&[("f", days_ago(0))]),
		..RecommendationContext::default()
	};

	let response = engine.recommend(&ctx).unwrap();
	let merged = &response.scores["cand"].matched_tags;
	assert_eq!(merged.len(), MERGED_TAG_LIMIT);
	let unique: std::collections::HashSet<_> = merged.iter().collect();
	assert_eq!(unique.len(), merged.len());
}

#[test]
fn response_serializes_for_transport() {
	let mut engine = tag_preference_engine(TagPreferenceOptions::default());
	let ctx = RecommendationContext {
		candidate_entries: vec![entry("a", &["llm"], &[])],
		favorites_meta: vec![entry("f", &["llm"], &[])],
		favorites_map: signal_map(&[("f", days_ago(0))]),
		..RecommendationContext::default()
	};

	let response = engine.recommend(&ctx).unwrap();
	let serialized = serde_json::to_value(&response).unwrap();
	assert!(serialized["scores"]["a"]["score"].as_f64().unwrap() > 0.0);
	assert_eq!(
		serialized["scores"]["a"]["matchedTags"],
		json!(["llm"])
	);
	assert!(serialized["generatedAt"].is_string());
}
