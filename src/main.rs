// ---------------------------------------------------------------------------
// feedrec-debug — operator diagnostic CLI for the recommendation engine
// ---------------------------------------------------------------------------
//
// Loads a user-data JSON file and an entry-metadata JSON file, rebuilds
// the context the web layer would build (candidates exclude anything
// already read or favorited), runs the engine, and prints the ranked
// results plus the strategy's tag-weight profile.
// ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use feedrec_engine::{
	Entry, EngineError, RecommendationContext, RecommendationEngine, SignalMap,
	TagPreferenceOptions, TagPreferenceStrategy,
};

#[derive(Parser)]
#[command(
	name = "feedrec-debug",
	about = "Inspect per-user recommendation scores and tag-weight profiles"
)]
struct Args {
	/// User-data JSON: {"favorites": {id: ts|null}, "read": {...}, "deepRead": {...}}
	#[arg(long)]
	user: PathBuf,
	/// Entry metadata JSON: array of {id, topTags, detailTags, updatedAt}
	#[arg(long)]
	entries: PathBuf,
	/// How many ranked entries to print
	#[arg(long, default_value_t = 20)]
	limit: usize,
	#[arg(long)]
	min_negative_samples: Option<usize>,
	#[arg(long)]
	half_life_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct UserData {
	#[serde(default)]
	favorites: SignalMap,
	#[serde(default)]
	read: SignalMap,
	#[serde(rename = "deepRead", default)]
	deep_read: SignalMap,
}

fn load_user_data(path: &Path) -> Result<UserData, EngineError> {
	let raw = std::fs::read_to_string(path)?;
	serde_json::from_str(&raw).map_err(|e| EngineError::Serialization(e.to_string()))
}

fn load_entries(path: &Path) -> Result<Vec<Entry>, EngineError> {
	let raw = std::fs::read_to_string(path)?;
	serde_json::from_str(&raw).map_err(|e| EngineError::Serialization(e.to_string()))
}

fn build_context(user: &UserData, all_entries: Vec<Entry>) -> RecommendationContext {
	let read_ids: HashSet<&String> = user.read.keys().collect();
	let favorite_ids: HashSet<&String> = user.favorites.keys().collect();

	let favorites_meta: Vec<Entry> = all_entries
		.iter()
		.filter(|e| favorite_ids.contains(&e.id))
		.cloned()
		.collect();
	let read_meta: Vec<Entry> = all_entries
		.iter()
		.filter(|e| read_ids.contains(&e.id))
		.cloned()
		.collect();
	let deep_read_meta: Vec<Entry> = all_entries
		.iter()
		.filter(|e| user.deep_read.contains_key(&e.id))
		.cloned()
		.collect();
	let candidate_entries: Vec<Entry> = all_entries
		.into_iter()
		.filter(|e| !read_ids.contains(&e.id) && !favorite_ids.contains(&e.id))
		.collect();

	RecommendationContext {
		candidate_entries,
		favorites_meta,
		favorites_map: user.favorites.clone(),
		read_meta,
		read_map: user.read.clone(),
		deep_read_meta,
		deep_read_map: user.deep_read.clone(),
		..RecommendationContext::default()
	}
}

fn run(args: &Args) -> Result<(), EngineError> {
	let user = load_user_data(&args.user)?;
	let all_entries = load_entries(&args.entries)?;
	tracing::info!(
		favorites = user.favorites.len(),
		read = user.read.len(),
		deep_read = user.deep_read.len(),
		entries = all_entries.len(),
		"loaded input files"
	);

	let context = build_context(&user, all_entries);
	println!(
		"candidates: {} (favorites {}, read {}, deep reads {})",
		context.candidate_entries.len(),
		context.favorites_meta.len(),
		context.read_meta.len(),
		context.deep_read_meta.len(),
	);

	let mut options = TagPreferenceOptions::default();
	if let Some(samples) = args.min_negative_samples {
		options.min_negative_samples = samples;
	}
	if let Some(days) = args.half_life_days {
		options.recency_half_life_days = days;
	}
	let strategy = TagPreferenceStrategy::new(options);
	let mut engine = RecommendationEngine::new(vec![Box::new(strategy)])?;

	let response = engine.recommend(&context)?;

	let mut ranked: Vec<_> = response.scores.iter().collect();
	ranked.sort_by(|a, b| {
		b.1.score
			.partial_cmp(&a.1.score)
			.unwrap_or(std::cmp::Ordering::Equal)
	});

	println!("\nranked entries ({} scored):", ranked.len());
	for (rank, (entry_id, score)) in ranked.iter().take(args.limit).enumerate() {
		println!(
			"{:3}. {:20} score={:.4} tags=[{}]",
			rank + 1,
			entry_id,
			score.score,
			score.matched_tags.join(", "),
		);
	}
	if ranked.is_empty() {
		println!("  (none — caller would fall back to chronological order)");
	}

	for (name, profile) in &response.profiles {
		let pretty = serde_json::to_string_pretty(profile)
			.map_err(|e| EngineError::Serialization(e.to_string()))?;
		println!("\nprofile for {name}:\n{pretty}");
	}

	Ok(())
}

fn main() {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let args = Args::parse();
	if let Err(e) = run(&args) {
		tracing::error!("{} ({})", e, e.code());
		std::process::exit(1);
	}
}
