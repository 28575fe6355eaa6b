// Spam detector - cheap, local rejection of degenerate input.
//
// Runs before any other layer. No allocation-heavy analysis, no network.

use super::moderation_rules::trim_entry;
use regex::Regex;
use std::sync::LazyLock;

/// Number of identical consecutive characters that marks text as spam.
const MAX_REPEATED_CHARS: usize = 11;

/// Texts longer than this that are entirely upper-case count as shouting.
const SHOUTING_MIN_LENGTH: usize = 20;

/// Placeholder and test strings people type to "try out" the journal.
static TEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(test|testing|asdf|qwer|hello|hi)\s*$",
        r"(?i)^[a-z]\s*$",
        r"^[0-9]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("spam test pattern must compile"))
    .collect()
});

/// Returns `true` when the text is very likely spam or a test entry.
pub fn is_likely_spam(content: &str) -> bool {
    let trimmed = trim_entry(content);

    if has_repeated_run(trimmed, MAX_REPEATED_CHARS) {
        return true;
    }

    if trimmed.chars().count() > SHOUTING_MIN_LENGTH && trimmed == trimmed.to_uppercase() {
        return true;
    }

    TEST_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Whether any single character repeats at least `run` times in a row.
///
/// Line terminators never count towards a run.
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut count = 0;

    for ch in text.chars() {
        if is_line_terminator(ch) {
            previous = None;
            count = 0;
            continue;
        }

        if previous == Some(ch) {
            count += 1;
        } else {
            previous = Some(ch);
            count = 1;
        }

        if count >= run {
            return true;
        }
    }

    false
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
