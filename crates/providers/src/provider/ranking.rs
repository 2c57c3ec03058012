//! Provider-agnostic relevance ranking of search results.
//!
//! Each entry is scored on three components, all in `[0, 1]`:
//!
//! * query similarity: share of the query's words found in `author title`
//! * play relevance: `ln(plays + 1) / ln(max_plays + 1)`
//! * favorite relevance: `ln(favorites + 1) / ln(max_favorites + 1)`
//!
//! Entries without a play count get the sum of known plays divided by the
//! total number of entries. The components are blended with
//! [`RelevanceWeights`] and entries are stably sorted by the blend, highest
//! first. Scores and raw counters are dropped from the output.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::media::{MediaEntry, ResultRecord};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]|_").unwrap());

/// Weights of the composite relevance. The blend is normalized by the sum
/// of the weights, so the composite stays within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceWeights {
    pub query_similarity: f64,
    pub plays: f64,
    pub favorites: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            query_similarity: 0.6,
            plays: 0.25,
            favorites: 0.15,
        }
    }
}

impl RelevanceWeights {
    /// Monotonic blend of the three components. Negative weights count as 0.
    pub fn combine(&self, query_similarity: f64, play: f64, favorite: f64) -> f64 {
        let wq = self.query_similarity.max(0.0);
        let wp = self.plays.max(0.0);
        let wf = self.favorites.max(0.0);
        let total = wq + wp + wf;
        if !(total > 0.0 && total.is_finite()) {
            return 0.0;
        }
        (wq * query_similarity + wp * play + wf * favorite) / total
    }
}

#[derive(Debug)]
struct ScoredEntry {
    entry: MediaEntry,
    query_similarity: f64,
    play_relevance: f64,
    favorite_relevance: f64,
    relevance: f64,
}

/// Replaces everything that is not a word character or whitespace with a
/// space, lower-cases, and splits on whitespace. Consecutive separators
/// yield empty words.
pub fn separated_words(text: &str) -> Vec<String> {
    NON_WORD
        .replace_all(text, " ")
        .to_lowercase()
        .split(char::is_whitespace)
        .map(str::to_string)
        .collect()
}

/// Share of `query_words` present in `words`, counted over distinct query
/// words and divided by the full query length.
pub fn query_similarity(query_words: &[String], words: &[String]) -> f64 {
    if query_words.is_empty() {
        return 0.0;
    }
    let words: FxHashSet<&str> = words.iter().map(String::as_str).collect();
    let mut seen = FxHashSet::default();
    let matched = query_words
        .iter()
        .filter(|word| seen.insert(word.as_str()) && words.contains(word.as_str()))
        .count();
    matched as f64 / query_words.len() as f64
}

fn log_ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let ratio = (value + 1.0).ln() / (max + 1.0).ln();
    if ratio.is_finite() { ratio } else { 0.0 }
}

fn counter(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn score_entries(
    entries: Vec<MediaEntry>,
    query: &str,
    weights: &RelevanceWeights,
) -> Vec<ScoredEntry> {
    if entries.is_empty() {
        return Vec::new();
    }

    let query_words = separated_words(query);
    let total = entries.len() as f64;
    let known_plays: f64 = entries.iter().filter_map(|e| counter(e.plays)).sum();
    let avg_plays = known_plays / total;

    let counters: Vec<(f64, f64)> = entries
        .iter()
        .map(|e| {
            (
                counter(e.plays).unwrap_or(avg_plays),
                counter(e.favorites).unwrap_or(0.0),
            )
        })
        .collect();
    let max_plays = counters.iter().map(|c| c.0).fold(0.0, f64::max);
    let max_favorites = counters.iter().map(|c| c.1).fold(0.0, f64::max);

    entries
        .into_iter()
        .zip(counters)
        .map(|(entry, (plays, favorites))| {
            let record = &entry.record;
            let words = separated_words(&format!("{} {}", record.author, record.title));
            let query_similarity = query_similarity(&query_words, &words);
            let play_relevance = log_ratio(plays, max_plays);
            let favorite_relevance = log_ratio(favorites, max_favorites);
            let relevance = weights.combine(query_similarity, play_relevance, favorite_relevance);
            ScoredEntry {
                entry,
                query_similarity,
                play_relevance,
                favorite_relevance,
                relevance,
            }
        })
        .collect()
}

/// Ranks `entries` against `query`, highest relevance first. Ties keep their
/// input order.
pub fn rank(
    entries: Vec<MediaEntry>,
    query: &str,
    weights: &RelevanceWeights,
) -> Vec<ResultRecord> {
    let mut scored = score_entries(entries, query, weights);
    for s in &scored {
        trace!(
            media_id = %s.entry.record.media_id,
            query_similarity = s.query_similarity,
            play_relevance = s.play_relevance,
            favorite_relevance = s.favorite_relevance,
            relevance = s.relevance,
            "scored"
        );
    }
    scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    scored
        .into_iter()
        .map(|scored| scored.entry.into_record())
        .collect()
}
