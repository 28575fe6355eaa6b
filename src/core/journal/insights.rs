//! Mood trend and theme summaries derived from stored entries.

use super::journal_models::JournalEntry;
use crate::core::ai::SentimentLabel;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of themes shown on the insights page.
pub const TOP_THEME_COUNT: usize = 5;

/// One point on the mood chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPoint {
    pub created_at: DateTime<Utc>,
    /// 0 (very negative) to 10 (very positive)
    pub mood_score: u8,
    pub sentiment_label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeCount {
    pub theme: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub mood_chart: Vec<MoodPoint>,
    pub top_themes: Vec<ThemeCount>,
}

impl Insights {
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        Self {
            mood_chart: mood_chart(entries),
            top_themes: top_themes(entries, TOP_THEME_COUNT),
        }
    }
}

/// Map a sentiment score in [-1, 1] onto the 0-10 mood scale.
pub fn mood_score(score: f64) -> u8 {
    ((score.clamp(-1.0, 1.0) + 1.0) * 5.0).round() as u8
}

/// Mood points in chronological order.
pub fn mood_chart(entries: &[JournalEntry]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = entries
        .iter()
        .map(|entry| MoodPoint {
            created_at: entry.created_at,
            mood_score: mood_score(entry.analysis.sentiment.score),
            sentiment_label: entry.analysis.sentiment.label,
        })
        .collect();
    points.sort_by_key(|p| p.created_at);
    points
}

/// Most frequent themes, highest count first. Ties keep first-seen order.
pub fn top_themes(entries: &[JournalEntry], limit: usize) -> Vec<ThemeCount> {
    let mut counts: Vec<ThemeCount> = Vec::new();

    for theme in entries.iter().flat_map(|e| e.analysis.themes.iter()) {
        match counts.iter_mut().find(|c| &c.theme == theme) {
            Some(existing) => existing.count += 1,
            None => counts.push(ThemeCount {
                theme: theme.clone(),
                count: 1,
            }),
        }
    }

    // Stable sort keeps insertion order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
