// ---------------------------------------------------------------------------
// Tag helpers — normalization, extraction, ranked merge
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::types::Entry;

/// Normalize a tag for use as a weight-table key: trim + lowercase.
/// Empty or whitespace-only tags are discarded.
pub fn normalize_tag(tag: &str) -> Option<String> {
	let clean = tag.trim().to_lowercase();
	if clean.is_empty() {
		None
	} else {
		Some(clean)
	}
}

/// Deduplicate an entry's tags into `(tag, is_top)` pairs.
///
/// Top tags are inserted first, so a tag appearing in both lists counts
/// as a top tag.
pub fn extract_entry_tags(entry: &Entry) -> Vec<(String, bool)> {
	let mut tags = Vec::new();
	let mut seen: HashSet<String> = HashSet::new();

	for tag in &entry.top_tags {
		if let Some(normalized) = normalize_tag(tag) {
			if seen.insert(normalized.clone()) {
				tags.push((normalized, true));
			}
		}
	}

	for tag in &entry.detail_tags {
		if let Some(normalized) = normalize_tag(tag) {
			if seen.insert(normalized.clone()) {
				tags.push((normalized, false));
			}
		}
	}

	tags
}

/// Merge `new` tags into `existing`, preserving discovery order,
/// skipping duplicates, and never growing past `limit`.
pub fn merge_ranked_tags(existing: &[String], new: &[String], limit: usize) -> Vec<String> {
	let mut combined: Vec<String> = existing.to_vec();
	let mut seen: HashSet<String> = combined.iter().cloned().collect();

	for tag in new {
		if combined.len() >= limit {
			break;
		}
		if seen.insert(tag.clone()) {
			combined.push(tag.clone());
		}
	}

	combined
}
