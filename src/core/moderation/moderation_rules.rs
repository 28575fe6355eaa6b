// Rule tables for the local content classifier.
//
// Rules are plain data: each table is evaluated top-to-bottom and the first
// matching rule wins. Adding a rule never touches the evaluation code.

use regex::Regex;
use std::sync::LazyLock;

/// A trigger pattern plus an optional exclusion.
///
/// The exclusion behaves like a negative lookahead placed right after the
/// trigger: the rule does not fire when the exclusion matches the text that
/// follows the trigger. Triggers that end in whitespace may give back any of
/// that trailing whitespace (except the first character) before the
/// exclusion is tried, the same way a backtracking `\s+(?!...)` would.
pub struct PatternRule {
    pub trigger: Regex,
    pub exclusion: Option<Regex>,
}

impl PatternRule {
    fn new(trigger: &str) -> Self {
        Self {
            trigger: compile(trigger),
            exclusion: None,
        }
    }

    fn unless(trigger: &str, exclusion: &str) -> Self {
        Self {
            trigger: compile(trigger),
            exclusion: Some(compile(exclusion)),
        }
    }

    /// Whether the rule fires for `text`.
    pub fn matches(&self, text: &str) -> bool {
        let Some(found) = self.trigger.find(text) else {
            return false;
        };

        let Some(exclusion) = &self.exclusion else {
            return true;
        };

        continuation_points(text, found.start(), found.end())
            .any(|at| !exclusion.is_match(&text[at..]))
    }
}

/// Byte offsets where text following a match may start.
///
/// Always yields the match end. If the match ends in a run of whitespace,
/// also yields every earlier boundary inside that run, keeping at least one
/// whitespace character inside the match.
fn continuation_points(text: &str, start: usize, end: usize) -> impl Iterator<Item = usize> + '_ {
    let matched = &text[start..end];
    let trailing: Vec<usize> = matched
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_whitespace())
        .map(|(idx, _)| start + idx)
        .collect();

    // `trailing` is in reverse order; its last element is the first whitespace char.
    let keep_first = trailing.len().saturating_sub(1);
    std::iter::once(end).chain(trailing.into_iter().take(keep_first))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("moderation pattern must compile")
}

/// Dangerous, violent, self-harm and illegal-activity patterns.
///
/// Tested against the raw (untrimmed) entry text.
pub static HARMFUL_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        // Violence & weapons
        PatternRule::new(r"\b(make|build|create|want|get)\s+(a\s+)?(bomb|explosive|weapon)"),
        PatternRule::new(r"\b(bomb|explosive|weapon|grenade|missile)\b"),
        PatternRule::new(r"\bhow\s+to\s+(kill|murder|hurt|harm)"),
        // Self-harm
        PatternRule::new(r"\b(want|going|plan)\s+to\s+(kill|hurt|harm)\s+(myself|me)\b"),
        // Illegal activities
        PatternRule::new(r"\bhow\s+to\s+(hack|steal|rob|fraud|scam|break into)"),
        PatternRule::new(r"\b(buy|sell|get|obtain)\s+(illegal\s+)?(drugs|cocaine|heroin|meth|fentanyl)"),
        // Explicit abuse
        PatternRule::new(r"\b(abuse|molest|assault|rape|trafficking)\b"),
    ]
});

/// Requests for general assistance rather than reflection.
///
/// Tested against the trimmed entry text.
pub static OFF_TOPIC_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        // Technical requests
        PatternRule::new(r"^(write|create|generate|make)\s+(code|program|script|function|api)"),
        // Addressed requests: "write me a python script"
        PatternRule::new(
            r"^(write|create|generate|make)\s+(me|us)\s+((a|an|the|some)\s+)?(\w+\s+)?(code|program|script|function|api)",
        ),
        PatternRule::new(r"^(help me|can you)\s+(code|program|debug|fix)"),
        // Questions directed at the assistant
        PatternRule::new(r"^(are|is|do|did|can|could|would|will)\s+you\b"),
        PatternRule::new(r"^(what|how|why|when|where)\s+(are|is|do|did|can|would|will)\s+you\b"),
        // Questions about facts, people, places
        PatternRule::unless(
            r"^(what|where|when|who|how)\s+(is|are|was|were|did|does|do)\s+",
            r"^(i|me|my|we|our)",
        ),
        PatternRule::unless(r"^(where|what|who)\s+", r"^(am i|are my|is my)"),
        // General assistant requests
        PatternRule::unless(r"^(tell me about|explain)\s+", r"^(my|how i|why i|what i)"),
        PatternRule::new(r"^(calculate|solve|compute|find out|look up)"),
        // Recipes, unless tied to coping
        PatternRule::unless(r"^(recipe|how to (cook|bake|make))\s+", r"^.*?(feel|cope|deal|manage)"),
        // Commands
        PatternRule::new(r"^(search|find|show me|give me|list|compare)"),
    ]
});

/// Vocabulary that signals self-reflective writing.
///
/// Matched as lower-case substrings of the entry, so short tokens such as
/// `"i"` match inside longer words.
pub const JOURNALING_KEYWORDS: &[&str] = &[
    "feel", "feeling", "felt", "emotion", "thought", "thinking",
    "today", "yesterday", "lately", "recently",
    "i", "me", "my", "myself",
    "grateful", "happy", "sad", "angry", "anxious", "worried",
    "hope", "wish", "want", "need",
    "relationship", "work", "family", "friend",
    "struggle", "challenge", "success", "achievement",
    "reflect", "realize", "understand", "learn",
];

/// Strip surrounding whitespace, including a byte order mark.
pub fn trim_entry(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Factual questions that carry no journaling vocabulary.
pub static WH_QUESTION: LazyLock<Regex> = LazyLock::new(|| compile(r"^(what|where|when|who|how|why)\s+"));

/// Imperative openers for short, keyword-free requests.
pub static IMPERATIVE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(write|create|make|generate|tell|explain|calculate|search|find|show|give|list)")
});

/// Sentence terminators used to count sentences.
pub static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| compile(r"[.!?]+"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(HARMFUL_RULES.len(), 7);
        assert_eq!(OFF_TOPIC_RULES.len(), 11);
    }

    #[test]
    fn test_exclusion_suppresses_rule() {
        let rule = PatternRule::unless(r"^(tell me about|explain)\s+", r"^(my|how i|why i|what i)");
        assert!(rule.matches("Tell me about the Roman empire"));
        assert!(!rule.matches("Tell me about my week, diary"));
    }

    #[test]
    fn test_exclusion_with_extra_whitespace_still_fires() {
        // A backtracking `\s+(?!my)` can stop before the second space, so
        // the text after it starts with a space and the exclusion fails.
        let rule = PatternRule::unless(r"^(tell me about|explain)\s+", r"^(my|how i|why i|what i)");
        assert!(rule.matches("explain  my feelings"));
    }

    #[test]
    fn test_exclusion_is_a_prefix_not_a_word() {
        let rule = PatternRule::unless(
            r"^(what|where|when|who|how)\s+(is|are|was|were|did|does|do)\s+",
            r"^(i|me|my|we|our)",
        );
        // "important" starts with "i"
        assert!(!rule.matches("What is important to me"));
        assert!(rule.matches("What is the tallest mountain"));
    }

    #[test]
    fn test_recipe_exclusion_scans_rest_of_line() {
        let rule = OFF_TOPIC_RULES.get(9).unwrap();
        assert!(rule.matches("recipe for banana bread please"));
        assert!(!rule.matches("how to cook when I feel this tired"));
    }

    #[test]
    fn test_trim_entry_strips_byte_order_mark() {
        assert_eq!(trim_entry("\u{feff} Dear diary \n"), "Dear diary");
        assert_eq!(trim_entry("\u{feff}"), "");
    }

    #[test]
    fn test_code_request_needs_indirect_object_for_qualifiers() {
        let direct = &OFF_TOPIC_RULES[0];
        let addressed = &OFF_TOPIC_RULES[1];

        assert!(direct.matches("write code that sorts a list"));
        assert!(addressed.matches("write me a python script"));
        assert!(addressed.matches("Make us some api"));

        for text in [
            "Create a new program for my morning routine",
            "Write the script for my sister's wedding speech",
            "Make a quick function call to grandma tonight",
        ] {
            assert!(!direct.matches(text), "{}", text);
            assert!(!addressed.matches(text), "{}", text);
        }
    }
}
