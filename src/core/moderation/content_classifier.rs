// Topic/safety classifier - local, deterministic policy engine.
//
// Evaluation order (first match wins):
// 1. Length floor
// 2. Harmful patterns
// 3. Off-topic patterns
// 4. Keyword heuristic for long, keyword-free text
// 5. Appropriate

use super::moderation_models::{ModerationCategory, ModerationVerdict};
use super::moderation_rules::{
    trim_entry, PatternRule, HARMFUL_RULES, IMPERATIVE_OPENER, JOURNALING_KEYWORDS,
    OFF_TOPIC_RULES, SENTENCE_BREAK, WH_QUESTION,
};

/// Entries shorter than this (trimmed, in characters) are rejected.
const MIN_ENTRY_LENGTH: usize = 10;

/// Keyword-free entries longer than this get the heuristic check.
const HEURISTIC_MIN_LENGTH: usize = 30;

/// Keyword-free requests with at most this many sentences are rejected.
const MAX_REQUEST_SENTENCES: usize = 2;

pub const TOO_SHORT_MESSAGE: &str =
    "Entry is too short. Please share your thoughts in more detail.";

pub const HARMFUL_MESSAGE: &str = "This content appears to contain harmful or dangerous requests. \
Lumina Journal is designed for personal reflection and emotional wellbeing only. \
If you are experiencing thoughts of harming yourself or others, please reach out to a \
mental health professional or crisis helpline.";

pub const OFF_TOPIC_MESSAGE: &str = "This appears to be a request for general assistance. \
Lumina Journal is for personal reflection and emotional processing.";

pub const FACTUAL_QUESTION_MESSAGE: &str = "This looks like a factual question rather than \
personal reflection. Lumina Journal is for writing about your thoughts, feelings, and experiences.";

pub const REQUEST_MESSAGE: &str = "This looks like a request rather than a journal entry. \
Try writing about your thoughts, feelings, or experiences.";

/// Classify an entry. Pure: the same input always yields the same verdict.
pub fn moderate_content(content: &str) -> ModerationVerdict {
    let trimmed = trim_entry(content);
    let length = trimmed.chars().count();

    tracing::debug!(preview = %preview(trimmed), "Moderating content");

    if length < MIN_ENTRY_LENGTH {
        return ModerationVerdict::rejected(ModerationCategory::Spam, TOO_SHORT_MESSAGE);
    }

    if let Some(index) = first_match(&HARMFUL_RULES, content) {
        tracing::debug!(rule = index, "Blocked by harmful pattern");
        return ModerationVerdict::rejected(ModerationCategory::Harmful, HARMFUL_MESSAGE);
    }

    if let Some(index) = first_match(&OFF_TOPIC_RULES, trimmed) {
        tracing::debug!(rule = index, "Blocked by off-topic pattern");
        return ModerationVerdict::rejected(ModerationCategory::OffTopic, OFF_TOPIC_MESSAGE);
    }

    if !has_journaling_keywords(content) && length > HEURISTIC_MIN_LENGTH {
        if WH_QUESTION.is_match(trimmed) {
            return ModerationVerdict::rejected(
                ModerationCategory::OffTopic,
                FACTUAL_QUESTION_MESSAGE,
            );
        }

        if sentence_count(trimmed) <= MAX_REQUEST_SENTENCES && IMPERATIVE_OPENER.is_match(trimmed)
        {
            return ModerationVerdict::rejected(ModerationCategory::OffTopic, REQUEST_MESSAGE);
        }
    }

    ModerationVerdict::appropriate()
}

/// Index of the first rule that fires, if any.
fn first_match(rules: &[PatternRule], text: &str) -> Option<usize> {
    rules.iter().position(|rule| rule.matches(text))
}

fn has_journaling_keywords(content: &str) -> bool {
    let lower = content.to_lowercase();
    JOURNALING_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// Non-blank pieces between sentence terminators.
fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
