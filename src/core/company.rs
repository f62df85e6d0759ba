//! Static company → (language, country, region) lookup used to pick a
//! realistic named actor consistent with the chosen language.

use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashMap;

/// Locale metadata for one company.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompanyInfo {
    /// ISO-like language code.
    pub language: String,
    /// Country name.
    pub country: String,
    /// Region name.
    pub region: String,
}

/// A (company name → locale) map loaded from a static JSON asset.
///
/// Multiple sibling sections may be merged with [`CompanyBinding::merge`];
/// duplicate keys: last one wins, matching §6's documented merge rule.
#[derive(Debug, Clone, Default)]
pub struct CompanyBinding {
    entries: HashMap<String, CompanyInfo>,
}

impl CompanyBinding {
    /// Builds a binding from a plain map, as parsed from JSON.
    #[must_use]
    pub fn from_map(entries: HashMap<String, CompanyInfo>) -> Self {
        Self { entries }
    }

    /// Returns the crate's built-in default binding, covering every
    /// language in the supported set (§3) with at least one company.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        let defaults: &[(&str, &str, &str, &str)] = &[
            ("Acme Corp", "en", "United States", "North America"),
            ("Nordwind GmbH", "de", "Germany", "Europe"),
            ("Solutions Lumière", "fr", "France", "Europe"),
            ("Soluciones Ibérica", "es", "Spain", "Europe"),
            ("Azienda Adriatica", "it", "Italy", "Europe"),
            ("Grupo Atlântico", "pt", "Portugal", "Europe"),
            ("Noord Systemen", "nl", "Netherlands", "Europe"),
            ("Anadolu Teknoloji", "tr", "Turkey", "Europe"),
            ("Huaxia Tech", "zh", "China", "Asia"),
            ("Sakura Systems", "ja", "Japan", "Asia"),
        ];
        for (company, lang, country, region) in defaults {
            entries.insert(
                (*company).to_string(),
                CompanyInfo {
                    language: (*lang).to_string(),
                    country: (*country).to_string(),
                    region: (*region).to_string(),
                },
            );
        }
        Self { entries }
    }

    /// Merges `other` into `self`; on key collision `other`'s entry wins.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Returns every company bound to `language`, or an empty slice-like
    /// vector if none match (callers fall back to English).
    #[must_use]
    pub fn companies_for_language(&self, language: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, info)| info.language == language)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns locale info for a named company.
    #[must_use]
    pub fn info(&self, company: &str) -> Option<&CompanyInfo> {
        self.entries.get(company)
    }

    /// Picks one company uniformly at random from the full set, used when
    /// the caller has not pinned a language: the company is chosen first,
    /// and its bound language follows from it.
    #[must_use]
    pub fn random_company(&self, rng: &mut impl Rng) -> Option<(&str, &CompanyInfo)> {
        self.entries.iter().map(|(name, info)| (name.as_str(), info)).choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builtin_covers_every_supported_language() {
        let binding = CompanyBinding::builtin();
        for lang in ["en", "fr", "es", "de", "it", "pt", "nl", "tr", "zh", "ja"] {
            assert!(
                !binding.companies_for_language(lang).is_empty(),
                "missing company for language {lang}"
            );
        }
    }

    #[test]
    fn merge_lets_later_entry_win() {
        let mut first = CompanyBinding::from_map(HashMap::from([(
            "Acme".to_string(),
            CompanyInfo {
                language: "en".to_string(),
                country: "US".to_string(),
                region: "NA".to_string(),
            },
        )]));
        let second = CompanyBinding::from_map(HashMap::from([(
            "Acme".to_string(),
            CompanyInfo {
                language: "fr".to_string(),
                country: "FR".to_string(),
                region: "EU".to_string(),
            },
        )]));
        first.merge(second);
        assert_eq!(first.info("Acme").unwrap().language, "fr");
    }

    #[test]
    fn unknown_company_returns_none() {
        let binding = CompanyBinding::builtin();
        assert!(binding.info("Nonexistent Inc").is_none());
    }

    #[test]
    fn random_company_returns_an_entry_present_in_the_binding() {
        let binding = CompanyBinding::builtin();
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        let (name, info) = binding.random_company(&mut rng).unwrap();
        assert_eq!(binding.info(name), Some(info));
    }

    #[test]
    fn random_company_on_an_empty_binding_returns_none() {
        let binding = CompanyBinding::from_map(HashMap::new());
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!(binding.random_company(&mut rng).is_none());
    }
}
