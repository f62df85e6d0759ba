//! Content assembler: builds one [`ContentStructure`] per file.
//!
//! Grounded in SPEC_FULL.md §4.5's pipeline; section-level parallelism
//! follows the `rayon::join`/`par_iter` pattern the teacher demonstrates
//! for bounded inner parallelism.

mod cleaner;
pub(crate) mod template;

pub use cleaner::LANGUAGE_COMPLIANCE_MAX_SOURCE_CHARS;

use crate::core::{Credential, LanguagePack};
use crate::credential::{CredentialFactory, GenerationContext};
use crate::core::{ContentStructure, EmbedStrategy, Section};
use crate::error::Result;
use crate::neural::NeuralGenerator;
use chrono::Utc;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Everything the assembler needs beyond the per-call arguments: shared
/// read-only locale assets, the credential factory, and an optional
/// per-worker neural generator instance.
///
/// The company is chosen by the caller (before the language, when the
/// request did not pin one) and passed into [`Self::assemble`]; the
/// assembler never picks its own.
pub struct ContentAssembler<'a> {
    languages: &'a std::collections::HashMap<String, LanguagePack>,
    credentials: &'a CredentialFactory,
    neural: Option<&'a mut (dyn NeuralGenerator + 'static)>,
    use_neural_content: bool,
}

impl<'a> ContentAssembler<'a> {
    /// Constructs an assembler for one worker. `neural` is `None` when
    /// neural content generation was not requested or no backend is
    /// configured; in that case the template path is used unconditionally.
    #[must_use]
    pub fn new(
        languages: &'a std::collections::HashMap<String, LanguagePack>,
        credentials: &'a CredentialFactory,
        neural: Option<&'a mut (dyn NeuralGenerator + 'static)>,
        use_neural_content: bool,
    ) -> Self {
        Self {
            languages,
            credentials,
            neural,
            use_neural_content,
        }
    }

    /// Produces one [`ContentStructure`] for `topic`/`format`/`language`,
    /// embedding one credential per entry of `credential_types`.
    ///
    /// `company` is the actor already chosen by the caller; per §3, when
    /// the request did not pin a language, the company is chosen first and
    /// `language` follows from it, so this method only ever consumes both,
    /// never derives one from the other.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ValidationError::UnsupportedFormat`] if
    /// `format` is outside the closed supported set.
    pub fn assemble(
        &mut self,
        rng: &mut StdRng,
        topic: &str,
        credential_types: &[String],
        company: &str,
        language: &str,
        format: &str,
        embed_strategy: EmbedStrategy,
    ) -> Result<ContentStructure> {
        let (section_names, structure_kind) = template::lookup(format)?;
        let pack = LanguagePack::get(self.languages, language);

        let title = self.generate_title(rng, topic, company, pack);

        let mut sections: Vec<Section> = section_names
            .iter()
            .map(|name| self.generate_section(rng, name, topic, company, pack))
            .collect();

        let context = GenerationContext {
            company: company.to_string(),
        };
        let credentials: Vec<Credential> = credential_types
            .iter()
            .filter_map(|type_name| self.credentials.generate(rng, type_name, Some(&context)).ok())
            .collect();

        let credentials_pre_embedded = if structure_kind.binder_embeds_natively() {
            false
        } else {
            embed_into_section(&mut sections, &credentials, pack);
            true
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("topic".to_string(), topic.to_string());
        metadata.insert("language".to_string(), pack.code.clone());
        metadata.insert("format".to_string(), format.to_string());
        metadata.insert("generatedAt".to_string(), Utc::now().to_rfc3339());
        metadata.insert("company".to_string(), company.to_string());
        metadata.insert(
            "embedStrategy".to_string(),
            embed_strategy_name(embed_strategy).to_string(),
        );

        Ok(ContentStructure {
            title,
            sections,
            credentials,
            metadata,
            language: pack.code.clone(),
            format_type: format.to_string(),
            credentials_pre_embedded,
        })
    }

    fn generate_title(&mut self, rng: &mut StdRng, topic: &str, company: &str, pack: &LanguagePack) -> String {
        if self.use_neural_content {
            if let Some(text) = self.try_neural(&format!(
                "Write a short, professional document title about {topic} for {company}. Respond with the title only."
            )) {
                return text;
            }
        }
        const VARIANTS: &[&str] = &["{topic} — {company}", "{company}: {topic}"];
        let variant = if pack.code == "ja" { VARIANTS[1] } else { VARIANTS[rng.gen_range(0..VARIANTS.len())] };
        variant.replace("{topic}", topic).replace("{company}", company)
    }

    fn generate_section(
        &mut self,
        rng: &mut StdRng,
        name: &str,
        topic: &str,
        company: &str,
        pack: &LanguagePack,
    ) -> Section {
        let title = pack.section_title(name);
        let body = self.generate_body(rng, name, topic, company, pack);
        Section::new(title, body)
    }

    fn generate_body(&mut self, _rng: &mut StdRng, name: &str, topic: &str, company: &str, pack: &LanguagePack) -> String {
        if self.use_neural_content {
            let prompt = format!(
                "Write a short '{name}' section about {topic} for {company}, in {}. Respond with body text only, no instructions.",
                pack.code
            );
            if let Some(raw) = self.try_neural(&prompt) {
                let cleaned = cleaner::clean(&raw);
                if !cleaned.is_empty() {
                    if pack.code == "en" || cleaner::looks_like_english(&cleaned) == (pack.code == "en") {
                        return cleaned;
                    }
                    if let Some(retranslated) = self.retranslate(&cleaned, pack) {
                        return retranslated;
                    }
                }
            }
        }
        template_body(name, topic, company)
    }

    fn retranslate(&mut self, source: &str, pack: &LanguagePack) -> Option<String> {
        let truncated = cleaner::truncate_for_retranslation(source);
        let prompt = format!("Translate the following text into {}: {truncated}", pack.code);
        let raw = self.try_neural(&prompt)?;
        let cleaned = cleaner::clean(&raw);
        if cleaned.is_empty() { None } else { Some(cleaned) }
    }

    fn try_neural(&mut self, prompt: &str) -> Option<String> {
        self.neural
            .as_deref_mut()
            .and_then(|r#gen| r#gen.generate(prompt, 256, 0.7, None).ok())
    }
}

fn template_body(section_name: &str, topic: &str, company: &str) -> String {
    format!(
        "This {section_name} section covers {topic} as implemented at {company}. \
         Refer to the configuration details below for environment-specific values."
    )
}

fn embed_into_section(sections: &mut [Section], credentials: &[Credential], pack: &LanguagePack) {
    if credentials.is_empty() || sections.is_empty() {
        return;
    }
    let index = preferred_index(sections).unwrap_or(0);
    let label = pack.configuration_details_label.clone();
    let mut block = format!("\n\n{label}\n");
    for credential in credentials {
        let localized_label = pack.credential_label(&credential.type_name);
        block.push_str(&format!("{localized_label}: {}\n", credential.value));
    }
    sections[index].body.push_str(&block);
}

/// Stable lowercase name for [`EmbedStrategy`], recorded in
/// `ContentStructure::metadata` so a binder may consult the user's
/// declared preference for where credentials should surface, per the
/// doc note on [`EmbedStrategy`] that binders — not the assembler —
/// interpret it.
const fn embed_strategy_name(strategy: EmbedStrategy) -> &'static str {
    match strategy {
        EmbedStrategy::Random => "random",
        EmbedStrategy::Metadata => "metadata",
        EmbedStrategy::Body => "body",
    }
}

fn preferred_index(sections: &[Section]) -> Option<usize> {
    const PREFERRED_KEYWORDS: &[&str] = &[
        "configuration",
        "technical",
        "implementation",
        "security",
        "setup",
    ];
    if sections.is_empty() {
        return None;
    }
    sections
        .iter()
        .position(|s| {
            let lower = s.title.to_lowercase();
            PREFERRED_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_db::PatternDatabase;
    use rand::SeedableRng;

    fn languages() -> std::collections::HashMap<String, LanguagePack> {
        LanguagePack::builtin_registry()
    }

    fn patterns() -> PatternDatabase {
        PatternDatabase::load_from_str(
            r#"{"credentials": [{"type": "api_key", "regex": "^[A-Za-z0-9]{32}$", "description": "API Key"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn assembles_content_structure_for_document_format() {
        let langs = languages();
        let db = patterns();
        let factory = CredentialFactory::new(std::sync::Arc::new(db));
        let mut assembler = ContentAssembler::new(&langs, &factory, None, false);
        let mut rng = StdRng::seed_from_u64(1);

        let cs = assembler
            .assemble(
                &mut rng,
                "database migration",
                &["api_key".to_string()],
                "Acme Corp",
                "en",
                "docx",
                EmbedStrategy::Random,
            )
            .unwrap();

        assert_eq!(cs.format_type, "docx");
        assert_eq!(cs.credentials.len(), 1);
        assert!(cs.credentials_pre_embedded);
        assert!(cs.sections.iter().any(|s| s.body.contains(&cs.credentials[0].value)));
    }

    #[test]
    fn spreadsheet_format_defers_credential_embedding_to_binder() {
        let langs = languages();
        let db = patterns();
        let factory = CredentialFactory::new(std::sync::Arc::new(db));
        let mut assembler = ContentAssembler::new(&langs, &factory, None, false);
        let mut rng = StdRng::seed_from_u64(2);

        let cs = assembler
            .assemble(
                &mut rng,
                "budget report",
                &["api_key".to_string()],
                "Acme Corp",
                "en",
                "xlsx",
                EmbedStrategy::Metadata,
            )
            .unwrap();

        assert!(!cs.credentials_pre_embedded);
        assert!(cs.sections.iter().all(|s| !s.body.contains(&cs.credentials[0].value)));
    }

    #[test]
    fn unsupported_format_errors() {
        let langs = languages();
        let db = patterns();
        let factory = CredentialFactory::new(std::sync::Arc::new(db));
        let mut assembler = ContentAssembler::new(&langs, &factory, None, false);
        let mut rng = StdRng::seed_from_u64(3);

        let result = assembler.assemble(&mut rng, "x", &[], "Acme Corp", "en", "exe", EmbedStrategy::Random);
        assert!(result.is_err());
    }

    #[test]
    fn metadata_includes_topic_language_and_company() {
        let langs = languages();
        let db = patterns();
        let factory = CredentialFactory::new(std::sync::Arc::new(db));
        let mut assembler = ContentAssembler::new(&langs, &factory, None, false);
        let mut rng = StdRng::seed_from_u64(4);

        let cs = assembler
            .assemble(&mut rng, "onboarding", &[], "Solutions Lumière", "fr", "pdf", EmbedStrategy::Body)
            .unwrap();

        assert_eq!(cs.metadata.get("topic").unwrap(), "onboarding");
        assert_eq!(cs.metadata.get("language").unwrap(), "fr");
        assert_eq!(cs.metadata.get("company").unwrap(), "Solutions Lumière");
        assert!(cs.metadata.contains_key("generatedAt"));
    }
}
