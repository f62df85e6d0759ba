//! The intermediate representation every format binder consumes.

use super::Credential;
use std::collections::BTreeMap;

/// One titled section of a document body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    /// Localized section title.
    pub title: String,
    /// Section body; may be multi-paragraph (paragraphs separated by
    /// `\n\n`).
    pub body: String,
}

impl Section {
    /// Constructs a new section.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// The common representation produced by the content assembler and
/// consumed by exactly one format binder.
///
/// Invariant: credentials appear embedded inside at least one section's
/// body OR inside `metadata`, according to `embed_strategy` — never
/// absent. `credentials_pre_embedded` centralizes that decision (see
/// SPEC_FULL.md §9's re-architecture note on the source's double-embedding
/// bug): binders must honor it rather than deciding independently.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentStructure {
    /// Document title.
    pub title: String,
    /// Ordered sections.
    pub sections: Vec<Section>,
    /// Generated credentials for this file, 1 ≤ len ≤
    /// `max_credentials_per_file`.
    pub credentials: Vec<Credential>,
    /// Free-form metadata (topic, language, format, generated-at, company,
    /// …).
    pub metadata: BTreeMap<String, String>,
    /// ISO-like language code.
    pub language: String,
    /// Concrete format identifier this structure was built for.
    pub format_type: String,
    /// Set by the assembler when it has already embedded credentials into
    /// a section body; binders that would otherwise embed natively must
    /// skip doing so when this is `true`.
    pub credentials_pre_embedded: bool,
}

impl ContentStructure {
    /// Returns the section whose name best matches a
    /// "configuration/technical/implementation/security/setup" heuristic,
    /// falling back to the first section. Returns `None` if there are no
    /// sections.
    #[must_use]
    pub fn preferred_embed_section(&self) -> Option<usize> {
        const PREFERRED_KEYWORDS: &[&str] = &[
            "configuration",
            "technical",
            "implementation",
            "security",
            "setup",
        ];
        if self.sections.is_empty() {
            return None;
        }
        self.sections
            .iter()
            .position(|s| {
                let lower = s.title.to_lowercase();
                PREFERRED_KEYWORDS.iter().any(|kw| lower.contains(kw))
            })
            .or(Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentStructure {
        ContentStructure {
            title: "Title".to_string(),
            sections: vec![
                Section::new("Overview", "body"),
                Section::new("Security Notes", "body"),
            ],
            credentials: vec![Credential::new("api_key", "abc", "API Key")],
            metadata: BTreeMap::new(),
            language: "en".to_string(),
            format_type: "eml".to_string(),
            credentials_pre_embedded: false,
        }
    }

    #[test]
    fn prefers_keyword_matching_section() {
        let cs = sample();
        assert_eq!(cs.preferred_embed_section(), Some(1));
    }

    #[test]
    fn falls_back_to_first_section() {
        let mut cs = sample();
        cs.sections[1].title = "Appendix".to_string();
        assert_eq!(cs.preferred_embed_section(), Some(0));
    }

    #[test]
    fn none_when_no_sections() {
        let mut cs = sample();
        cs.sections.clear();
        assert_eq!(cs.preferred_embed_section(), None);
    }
}
