// ---------------------------------------------------------------------------
// Tag Preference Strategy — net tag-weight scoring with recency decay
// ---------------------------------------------------------------------------
//
// Builds a per-user tag profile from three signal sources:
//
// 1. Favorites — baseline positive signal, decayed by recency.
// 2. Deep reads — full-summary requests, a stronger positive signal
//    stacked on top of the tag multipliers.
// 3. Passive reads — negative signal, but only for entries that were
//    never favorited, and only once a tag has been seen in enough
//    distinct reads to be trusted.
//
// Candidates are scored by weighted overlap with the net profile and
// damped so users with huge diffuse profiles do not dominate users with
// a few sharp preferences.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::decay::recency_weight;
use crate::engine::RecommendationStrategy;
use crate::error::EngineError;
use crate::tags::{extract_entry_tags, normalize_tag};
use crate::types::{Entry, MetaValue, RecommendationContext, SignalMap, StrategyScore};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables for [`TagPreferenceStrategy`]. Typically set once at startup.
pub struct TagPreferenceOptions {
	/// Anchor for recency decay; `None` means the construction instant.
	pub now: Option<DateTime<Utc>>,
	/// Days for a signal's decaying part to halve. Clamped to >= 1.
	pub recency_half_life_days: i64,
	/// Weight of a matched coarse category tag.
	pub top_tag_multiplier: f64,
	/// Weight of a matched fine-grained tag. Defaults above the top
	/// multiplier: specific interests beat broad ones.
	pub detail_tag_multiplier: f64,
	/// Extra multiplier stacked onto deep-read signals.
	pub deep_read_multiplier: f64,
	/// Distinct read-but-not-favorited entries a tag needs before it may
	/// act as a negative signal. Clamped to >= 1.
	pub min_negative_samples: usize,
}

impl Default for TagPreferenceOptions {
	fn default() -> Self {
		Self {
			now: None,
			recency_half_life_days: 21,
			top_tag_multiplier: 1.0,
			detail_tag_multiplier: 1.5,
			deep_read_multiplier: 2.5,
			min_negative_samples: 200,
		}
	}
}

// ---------------------------------------------------------------------------
// TagPreferenceStrategy
// ---------------------------------------------------------------------------

/// Ranks entries by overlap with the user's net tag-preference profile.
pub struct TagPreferenceStrategy {
	now: DateTime<Utc>,
	recency_half_life_days: i64,
	top_tag_multiplier: f64,
	detail_tag_multiplier: f64,
	deep_read_multiplier: f64,
	min_negative_samples: usize,
	profile: Option<serde_json::Value>,
}

impl TagPreferenceStrategy {
	pub fn new(options: TagPreferenceOptions) -> Self {
		Self {
			now: options.now.unwrap_or_else(Utc::now),
			recency_half_life_days: options.recency_half_life_days.max(1),
			top_tag_multiplier: options.top_tag_multiplier,
			detail_tag_multiplier: options.detail_tag_multiplier,
			deep_read_multiplier: options.deep_read_multiplier,
			min_negative_samples: options.min_negative_samples.max(1),
			profile: None,
		}
	}

	// -- Weight tables ----------------------------------------------------------

	/// Accumulate recency-decayed tag weights over a signal source.
	/// `signal_multiplier` is 1.0 for favorites and the deep-read
	/// multiplier for deep reads.
	fn build_tag_weights(
		&self,
		entries: &[Entry],
		signal_map: &SignalMap,
		signal_multiplier: f64,
	) -> HashMap<String, f64> {
		let mut weights: HashMap<String, f64> = HashMap::new();

		for meta in entries {
			if meta.id.is_empty() {
				continue;
			}
			let timestamp = signal_map.get(&meta.id).and_then(|t| t.as_deref());
			let recency = recency_weight(timestamp, self.now, self.recency_half_life_days);

			for tag in &meta.top_tags {
				if let Some(normalized) = normalize_tag(tag) {
					*weights.entry(normalized).or_insert(0.0) +=
						recency * self.top_tag_multiplier * signal_multiplier;
				}
			}
			for tag in &meta.detail_tags {
				if let Some(normalized) = normalize_tag(tag) {
					*weights.entry(normalized).or_insert(0.0) +=
						recency * self.detail_tag_multiplier * signal_multiplier;
				}
			}
		}

		weights
	}

	/// Accumulate negative tag weights from read-but-not-favorited
	/// entries, then keep only tags corroborated by at least
	/// `min_negative_samples` distinct entries. A single unlucky read
	/// never poisons a tag's reputation.
	fn build_negative_tag_weights(
		&self,
		read_meta: &[Entry],
		read_map: &SignalMap,
		favorites_map: &SignalMap,
	) -> HashMap<String, f64> {
		let mut totals: HashMap<String, f64> = HashMap::new();
		let mut sample_counts: HashMap<String, usize> = HashMap::new();

		for meta in read_meta {
			if meta.id.is_empty() {
				continue;
			}
			// Favorited-and-read is purely positive, never negative.
			if favorites_map.contains_key(&meta.id) {
				continue;
			}
			let timestamp = read_map.get(&meta.id).and_then(|t| t.as_deref());
			let recency = recency_weight(timestamp, self.now, self.recency_half_life_days);

			let mut contributed: HashSet<String> = HashSet::new();
			for tag in &meta.top_tags {
				if let Some(normalized) = normalize_tag(tag) {
					*totals.entry(normalized.clone()).or_insert(0.0) +=
						recency * self.top_tag_multiplier;
					contributed.insert(normalized);
				}
			}
			for tag in &meta.detail_tags {
				if let Some(normalized) = normalize_tag(tag) {
					*totals.entry(normalized.clone()).or_insert(0.0) +=
						recency * self.detail_tag_multiplier;
					contributed.insert(normalized);
				}
			}

			for tag in contributed {
				*sample_counts.entry(tag).or_insert(0) += 1;
			}
		}

		totals
			.into_iter()
			.filter(|(tag, _)| {
				sample_counts.get(tag).copied().unwrap_or(0) >= self.min_negative_samples
			})
			.collect()
	}

	fn record_profile(
		&mut self,
		top_tags: Vec<String>,
		positive: &HashMap<String, f64>,
		deep: &HashMap<String, f64>,
		negative: &HashMap<String, f64>,
		net: &HashMap<String, f64>,
	) {
		self.profile = Some(json!({
			"top_tags": top_tags,
			"favorites_tag_weights": positive,
			"deep_read_tag_weights": deep,
			"negative_tag_weights": negative,
			"net_tag_weights": net,
		}));
	}
}

impl RecommendationStrategy for TagPreferenceStrategy {
	fn name(&self) -> &str {
		"tag_preference"
	}

	fn score(
		&mut self,
		context: &RecommendationContext,
	) -> Result<HashMap<String, StrategyScore>, EngineError> {
		let positive = self.build_tag_weights(&context.favorites_meta, &context.favorites_map, 1.0);
		let deep = self.build_tag_weights(
			&context.deep_read_meta,
			&context.deep_read_map,
			self.deep_read_multiplier,
		);
		let negative = self.build_negative_tag_weights(
			&context.read_meta,
			&context.read_map,
			&context.favorites_map,
		);

		// Net weight per tag over the union of all three tables.
		let mut keys: HashSet<&String> = positive.keys().collect();
		keys.extend(deep.keys());
		keys.extend(negative.keys());
		let mut net: HashMap<String, f64> = HashMap::with_capacity(keys.len());
		for tag in keys {
			let value = positive.get(tag).copied().unwrap_or(0.0)
				+ deep.get(tag).copied().unwrap_or(0.0)
				- negative.get(tag).copied().unwrap_or(0.0);
			net.insert(tag.clone(), value);
		}

		let total_positive: f64 = net.values().filter(|w| **w > 0.0).sum();
		if total_positive <= 0.0 {
			tracing::debug!("no positive net tag weights, nothing to recommend");
			self.record_profile(Vec::new(), &positive, &deep, &negative, &net);
			return Ok(HashMap::new());
		}

		let mut ordered: Vec<(&String, &f64)> =
			net.iter().filter(|(_, w)| **w > 0.0).collect();
		ordered.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
		let top_tags: Vec<String> = ordered.iter().take(8).map(|(t, _)| (*t).clone()).collect();
		self.record_profile(top_tags, &positive, &deep, &negative, &net);

		// Dampen users with huge diffuse profiles.
		let k = 1.0 / (total_positive + 1.5).log2();

		let mut scores: HashMap<String, StrategyScore> = HashMap::new();
		for entry in &context.candidate_entries {
			if entry.id.is_empty() {
				continue;
			}
			let entry_tags = extract_entry_tags(entry);
			if entry_tags.is_empty() {
				continue;
			}

			let mut raw_score = 0.0;
			let mut matched: Vec<(String, f64)> = Vec::new();
			for (tag, is_top) in entry_tags {
				let weight = match net.get(&tag) {
					Some(weight) => *weight,
					None => continue,
				};
				let boosted = weight
					* if is_top {
						self.top_tag_multiplier
					} else {
						self.detail_tag_multiplier
					};
				raw_score += boosted;
				if boosted > 0.0 {
					matched.push((tag, boosted));
				}
			}

			if raw_score <= 0.0 {
				continue;
			}

			matched.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
			let matched_tags: Vec<String> = matched.into_iter().map(|(tag, _)| tag).collect();

			let mut metadata = HashMap::new();
			metadata.insert("raw_score".to_string(), MetaValue::Float(raw_score));
			metadata.insert(
				"matched_count".to_string(),
				MetaValue::Int(matched_tags.len() as i64),
			);

			scores.insert(
				entry.id.clone(),
				StrategyScore {
					value: raw_score * k,
					matched_tags,
					metadata,
				},
			);
		}

		Ok(scores)
	}

	fn profile(&self) -> Option<serde_json::Value> {
		self.profile.clone()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
