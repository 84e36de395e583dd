// ---------------------------------------------------------------------------
// Recency decay — pure weight functions for preference signals
// ---------------------------------------------------------------------------
//
// Signals fade with an exponential half-life but never vanish: the weight
// floors at 0.5, so an arbitrarily old favorite still counts half as much
// as a brand-new one. No side effects.
// ---------------------------------------------------------------------------

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse an ISO-8601 timestamp string into UTC.
///
/// Accepts RFC 3339 (`Z` or explicit offset), a naive datetime assumed
/// UTC, or a bare `YYYY-MM-DD` date at midnight UTC (read stamps are
/// sometimes date-only). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return None;
	}

	if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
		return Some(ts.with_timezone(&Utc));
	}

	if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
		return Some(Utc.from_utc_datetime(&naive));
	}

	if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
		return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
	}

	None
}

/// Compute the recency weight of a signal timestamp.
///
/// Missing or unparsable timestamps are neutral (1.0, no decay).
/// Otherwise `exp(-ln 2 * delta_days / half_life) + 0.5`, where
/// `delta_days` is clamped to zero for future timestamps. The result
/// lives in `(0.5, 1.5]` and approaches 0.5 as the signal ages.
pub fn recency_weight(timestamp: Option<&str>, now: DateTime<Utc>, half_life_days: i64) -> f64 {
	let raw = match timestamp {
		Some(raw) => raw,
		None => return 1.0,
	};
	let ts = match parse_timestamp(raw) {
		Some(ts) => ts,
		None => return 1.0,
	};

	let delta_days = (now - ts).num_days().max(0) as f64;
	let half_life = half_life_days.max(1) as f64;
	(-std::f64::consts::LN_2 * delta_days / half_life).exp() + 0.5
}
