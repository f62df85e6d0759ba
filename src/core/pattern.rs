//! A single row of the pattern database.

/// One credential type's regex/description/generator-hint triple.
///
/// Grounded in `credentials[]` entries of the pattern-database JSON
/// contract (§6) and the Python original's `RegexDatabase.patterns` map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PatternEntry {
    /// Unique credential-type identifier.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Regular expression the generated value must satisfy. Anchored
    /// `^…$` is recommended but not enforced.
    pub regex: String,
    /// Human-readable description.
    pub description: String,
    /// Advisory generator hint; ignored by the credential factory's
    /// dispatch router, which routes purely by `type_name`.
    #[serde(default = "default_generator_hint")]
    pub generator: String,
    /// Example values, for documentation only — never used for
    /// validation.
    #[serde(default)]
    pub examples: Vec<String>,
}

fn default_generator_hint() -> String {
    "random_string(32, \"A-Za-z0-9\")".to_string()
}

impl PatternEntry {
    /// Constructs a new entry with the default generator hint and no
    /// examples.
    #[must_use]
    pub fn new(type_name: impl Into<String>, regex: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            regex: regex.into(),
            description: description.into(),
            generator: default_generator_hint(),
            examples: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let entry = PatternEntry::new("api_key", "^[A-Za-z0-9]{32}$", "Generic API key");
        let json = serde_json::to_string(&entry).unwrap();
        let back: PatternEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn defaults_generator_hint_when_absent() {
        let json = r#"{"type":"x","regex":"^x$","description":"d"}"#;
        let entry: PatternEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.generator, default_generator_hint());
        assert!(entry.examples.is_empty());
    }
}
