//! Per-language constants used by the content assembler: section titles,
//! credential labels, greeting/closing/body templates, and filename
//! qualifier strings.

use std::collections::HashMap;

/// One language's constant set. Every field has an English fallback
/// applied by [`LanguagePack::get`] when the requested code is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePack {
    /// ISO-like language code.
    pub code: String,
    /// Localized section-name labels keyed by the canonical English
    /// section name (e.g. `"Overview"` → `"Aperçu"`).
    pub section_titles: HashMap<String, String>,
    /// Localized credential-type labels keyed by credential type
    /// identifier, falling back to a title-cased type name when absent.
    pub credential_labels: HashMap<String, String>,
    /// Greeting line template, `{name}` placeholder for the recipient.
    pub greeting: String,
    /// Closing/signature line template.
    pub closing: String,
    /// Localized label for the embedded "Configuration Details" block.
    pub configuration_details_label: String,
    /// Short qualifier inserted into generated filenames (e.g. `"doc"`,
    /// `"document_fr"`).
    pub filename_qualifier: String,
}

impl LanguagePack {
    fn english() -> Self {
        Self {
            code: "en".to_string(),
            section_titles: HashMap::new(),
            credential_labels: HashMap::new(),
            greeting: "Hello {name},".to_string(),
            closing: "Best regards,\n{company}".to_string(),
            configuration_details_label: "Configuration Details".to_string(),
            filename_qualifier: "doc".to_string(),
        }
    }

    /// Returns the built-in pack registry covering every language in the
    /// supported set (§3), each seeded with at least a localized
    /// greeting/closing/configuration-details label and filename
    /// qualifier.
    #[must_use]
    pub fn builtin_registry() -> HashMap<String, Self> {
        let mut registry = HashMap::new();
        registry.insert("en".to_string(), Self::english());

        registry.insert(
            "fr".to_string(),
            Self {
                code: "fr".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Aperçu".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "Clé API".to_string(),
                )]),
                greeting: "Bonjour {name},".to_string(),
                closing: "Cordialement,\n{company}".to_string(),
                configuration_details_label: "Détails de configuration".to_string(),
                filename_qualifier: "document_fr".to_string(),
            },
        );
        registry.insert(
            "de".to_string(),
            Self {
                code: "de".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Übersicht".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "API-Schlüssel".to_string(),
                )]),
                greeting: "Hallo {name},".to_string(),
                closing: "Mit freundlichen Grüßen,\n{company}".to_string(),
                configuration_details_label: "Konfigurationsdetails".to_string(),
                filename_qualifier: "dokument_de".to_string(),
            },
        );
        registry.insert(
            "es".to_string(),
            Self {
                code: "es".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Resumen".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "Clave de API".to_string(),
                )]),
                greeting: "Hola {name},".to_string(),
                closing: "Saludos cordiales,\n{company}".to_string(),
                configuration_details_label: "Detalles de configuración".to_string(),
                filename_qualifier: "documento_es".to_string(),
            },
        );
        registry.insert(
            "it".to_string(),
            Self {
                code: "it".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Panoramica".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "Chiave API".to_string(),
                )]),
                greeting: "Ciao {name},".to_string(),
                closing: "Cordiali saluti,\n{company}".to_string(),
                configuration_details_label: "Dettagli di configurazione".to_string(),
                filename_qualifier: "documento_it".to_string(),
            },
        );
        registry.insert(
            "pt".to_string(),
            Self {
                code: "pt".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Visão geral".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "Chave de API".to_string(),
                )]),
                greeting: "Olá {name},".to_string(),
                closing: "Atenciosamente,\n{company}".to_string(),
                configuration_details_label: "Detalhes de configuração".to_string(),
                filename_qualifier: "documento_pt".to_string(),
            },
        );
        registry.insert(
            "nl".to_string(),
            Self {
                code: "nl".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Overzicht".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "API-sleutel".to_string(),
                )]),
                greeting: "Hallo {name},".to_string(),
                closing: "Met vriendelijke groet,\n{company}".to_string(),
                configuration_details_label: "Configuratiedetails".to_string(),
                filename_qualifier: "document_nl".to_string(),
            },
        );
        registry.insert(
            "tr".to_string(),
            Self {
                code: "tr".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "Genel Bakış".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "API Anahtarı".to_string(),
                )]),
                greeting: "Merhaba {name},".to_string(),
                closing: "Saygılarımla,\n{company}".to_string(),
                configuration_details_label: "Yapılandırma Ayrıntıları".to_string(),
                filename_qualifier: "belge_tr".to_string(),
            },
        );
        registry.insert(
            "zh".to_string(),
            Self {
                code: "zh".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "概述".to_string())]),
                credential_labels: HashMap::from([("api_key".to_string(), "API 密钥".to_string())]),
                greeting: "您好 {name},".to_string(),
                closing: "此致,\n{company}".to_string(),
                configuration_details_label: "配置详情".to_string(),
                filename_qualifier: "wendang_zh".to_string(),
            },
        );
        registry.insert(
            "ja".to_string(),
            Self {
                code: "ja".to_string(),
                section_titles: HashMap::from([("Overview".to_string(), "概要".to_string())]),
                credential_labels: HashMap::from([(
                    "api_key".to_string(),
                    "APIキー".to_string(),
                )]),
                greeting: "{name}様、".to_string(),
                closing: "よろしくお願いいたします。\n{company}".to_string(),
                configuration_details_label: "構成の詳細".to_string(),
                filename_qualifier: "bunsho_ja".to_string(),
            },
        );

        registry
    }

    /// Looks up `code` in `registry`, falling back to English when
    /// absent, per §3's "absent language codes fall back to English".
    #[must_use]
    pub fn get<'a>(registry: &'a HashMap<String, Self>, code: &str) -> &'a Self {
        registry
            .get(code)
            .or_else(|| registry.get("en"))
            .expect("builtin registry always carries an 'en' entry")
    }

    /// Returns the localized title for `section_name`, falling back to
    /// the English name unchanged when no localization is registered.
    #[must_use]
    pub fn section_title(&self, section_name: &str) -> String {
        self.section_titles
            .get(section_name)
            .cloned()
            .unwrap_or_else(|| section_name.to_string())
    }

    /// Returns the localized credential label for `type_name`, falling
    /// back to a title-cased rendering of the type identifier.
    #[must_use]
    pub fn credential_label(&self, type_name: &str) -> String {
        self.credential_labels
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| title_case(type_name))
    }
}

fn title_case(type_name: &str) -> String {
    type_name
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_every_supported_language() {
        let registry = LanguagePack::builtin_registry();
        for code in ["en", "fr", "es", "de", "it", "pt", "nl", "tr", "zh", "ja"] {
            assert!(registry.contains_key(code), "missing pack for {code}");
        }
    }

    #[test]
    fn absent_code_falls_back_to_english() {
        let registry = LanguagePack::builtin_registry();
        let pack = LanguagePack::get(&registry, "xx");
        assert_eq!(pack.code, "en");
    }

    #[test]
    fn unregistered_credential_label_falls_back_to_title_case() {
        let pack = LanguagePack::english();
        assert_eq!(pack.credential_label("aws_access_key"), "Aws Access Key");
    }

    #[test]
    fn registered_label_overrides_fallback() {
        let registry = LanguagePack::builtin_registry();
        let fr = LanguagePack::get(&registry, "fr");
        assert_eq!(fr.credential_label("api_key"), "Clé API");
    }

    #[test]
    fn unregistered_section_title_passes_through() {
        let pack = LanguagePack::english();
        assert_eq!(pack.section_title("Appendix"), "Appendix");
    }
}
