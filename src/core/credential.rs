//! A single produced credential instance.

/// A generated, pattern-conformant decoy credential.
///
/// Invariant: `value` matches the regex declared by the pattern-database
/// entry for `type_name`, and is unique within the process lifetime across
/// the whole run (enforced by [`crate::credential::CredentialFactory`]).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Credential {
    /// Credential type identifier (matches a `PatternEntry::type_name`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// The generated value.
    pub value: String,
    /// Localized display label (e.g. "API Key" / "Clé API").
    pub label: String,
}

impl Credential {
    /// Constructs a new credential instance.
    #[must_use]
    pub fn new(type_name: impl Into<String>, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
            label: label.into(),
        }
    }
}
