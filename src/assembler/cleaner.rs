//! Output cleaner (§4.5.1) and language-compliance check (§4.5.2) applied
//! to neural-generated section bodies before they replace the template
//! path.

/// Line prefixes that mark a line as a leaked template instruction rather
/// than generated prose.
const INSTRUCTION_PREFIXES: &[&str] = &["- Use", "- Ensure", "Requirements:", "Language:", "Generate only"];

/// Minimum length a cleaned body must retain to be considered usable.
const MIN_CLEANED_LENGTH: usize = 10;

/// Filters `text` line-by-line against [`INSTRUCTION_PREFIXES`]. Returns
/// an empty string (signaling "fall back to the template path") if the
/// result is too short or still contains an instruction marker.
#[must_use]
pub fn clean(text: &str) -> String {
    let cleaned: String = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !INSTRUCTION_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        })
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = cleaned.trim();

    if trimmed.len() < MIN_CLEANED_LENGTH
        || INSTRUCTION_PREFIXES.iter().any(|p| trimmed.contains(p))
    {
        return String::new();
    }
    trimmed.to_string()
}

/// Common English function words used to estimate whether text generated
/// for a non-English target language actually complied.
const COMMON_ENGLISH_TOKENS: &[&str] = &[
    "the", "and", "of", "to", "in", "is", "for", "with", "on", "this", "that", "are", "was",
];

/// Heuristic threshold: a body is considered non-compliant once more than
/// this fraction of its words are common English function words.
const ENGLISH_TOKEN_THRESHOLD: f64 = 0.15;

/// Returns whether `text` looks like English prose by a common-token
/// frequency heuristic, used to detect a neural model ignoring the
/// requested non-English target language.
#[must_use]
pub fn looks_like_english(text: &str) -> bool {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return false;
    }
    let english_count = words
        .iter()
        .filter(|w| COMMON_ENGLISH_TOKENS.contains(&w.as_str()))
        .count();
    (english_count as f64 / words.len() as f64) > ENGLISH_TOKEN_THRESHOLD
}

/// Fixed character budget applied to source text before it is resent to
/// the neural adapter for a retranslation pass, resolving Open Question
/// OQ-3 (unbounded retranslation prompt growth).
pub const LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS: usize = 2_000;

/// Truncates `text` to [`LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS`] on a char
/// boundary, for safe inclusion in a retranslation prompt.
#[must_use]
pub fn truncate_for_retranslation(text: &str) -> &str {
    if text.len() <= LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS {
        return text;
    }
    let mut end = LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_instruction_lines() {
        let input = "Real content here.\n- Use a formal tone\nMore real content.";
        let cleaned = clean(input);
        assert!(!cleaned.contains("- Use"));
        assert!(cleaned.contains("Real content"));
    }

    #[test]
    fn returns_empty_when_too_short() {
        assert_eq!(clean("short"), "");
    }

    #[test]
    fn returns_empty_when_markers_remain_throughout() {
        assert_eq!(clean("Requirements: be formal and concise"), "");
    }

    #[test]
    fn detects_english_heavy_text() {
        assert!(looks_like_english(
            "This is the plan for the migration of the database to the cloud."
        ));
    }

    #[test]
    fn does_not_flag_non_english_text() {
        assert!(!looks_like_english("Ceci est un plan de migration vers le nuage."));
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = "é".repeat(LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS);
        let truncated = truncate_for_retranslation(&text);
        assert!(truncated.len() <= LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS);
    }
}
