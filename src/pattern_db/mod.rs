//! Pattern database: the JSON regex catalog driving credential generation
//! and validation.
//!
//! Ported from `examples/original_source/credentialforge/db/regex_db.py`'s
//! `RegexDatabase`, with the trait-based load/validate shape of
//! `examples/zircote-rlm-rs/src/storage/traits.rs`. See SPEC_FULL.md §4.3
//! and Open Question OQ-2 for the `validate` prefix-match fidelity note.

use crate::core::PatternEntry;
use crate::error::{DatabaseError, Result};
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;

#[derive(serde::Serialize, serde::Deserialize)]
struct DbFile {
    credentials: Vec<PatternEntry>,
}

/// In-memory, immutable-after-load pattern catalog.
///
/// Grounded on `RegexDatabase`: `patterns` keyed by type, with a compiled
/// [`regex::Regex`] cached alongside each entry so `validate` never
/// recompiles on the hot path.
#[derive(Debug, Clone, Default)]
pub struct PatternDatabase {
    entries: BTreeMap<String, PatternEntry>,
    compiled: BTreeMap<String, regex::Regex>,
}

impl PatternDatabase {
    /// Constructs an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a JSON pattern-database file.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] if the file cannot be read, does not
    /// parse as JSON, is missing the `credentials` key, or any entry is
    /// missing a required field, has an uncompilable regex, or duplicates
    /// a `type`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DatabaseError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DatabaseError::Io(e)
            }
        })?;
        Self::load_from_str(&text)
    }

    /// Parses a database from an in-memory JSON string (used by `load`
    /// and directly by tests).
    pub fn load_from_str(text: &str) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(text).map_err(DatabaseError::InvalidJson)?;
        let credentials = raw
            .get("credentials")
            .ok_or(DatabaseError::MissingCredentialsKey)?;
        let entries: Vec<PatternEntry> =
            serde_json::from_value(credentials.clone()).map_err(DatabaseError::InvalidJson)?;

        let mut db = Self::new();
        for entry in entries {
            db.insert_validated(entry)?;
        }
        Ok(db)
    }

    fn insert_validated(&mut self, entry: PatternEntry) -> Result<()> {
        if entry.type_name.trim().is_empty() {
            return Err(DatabaseError::MissingField {
                type_name: entry.type_name.clone(),
                field: "type",
            }
            .into());
        }
        if entry.regex.trim().is_empty() {
            return Err(DatabaseError::MissingField {
                type_name: entry.type_name.clone(),
                field: "regex",
            }
            .into());
        }
        if entry.description.trim().is_empty() {
            return Err(DatabaseError::MissingField {
                type_name: entry.type_name.clone(),
                field: "description",
            }
            .into());
        }
        if self.entries.contains_key(&entry.type_name) {
            return Err(DatabaseError::DuplicateType {
                type_name: entry.type_name,
            }
            .into());
        }
        let compiled = regex::Regex::new(&entry.regex).map_err(|source| DatabaseError::InvalidRegex {
            type_name: entry.type_name.clone(),
            source,
        })?;
        self.compiled.insert(entry.type_name.clone(), compiled);
        self.entries.insert(entry.type_name.clone(), entry);
        Ok(())
    }

    /// Adds a new credential type in-memory. Does not persist; callers
    /// must [`PatternDatabase::save`] explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] if any required field is empty, the
    /// regex does not compile, or `type_name` already exists.
    pub fn add(
        &mut self,
        type_name: impl Into<String>,
        regex: impl Into<String>,
        description: impl Into<String>,
        generator: Option<String>,
        examples: Vec<String>,
    ) -> Result<()> {
        let mut entry = PatternEntry::new(type_name, regex, description);
        if let Some(g) = generator {
            entry.generator = g;
        }
        entry.examples = examples;
        self.insert_validated(entry)
    }

    /// Removes a credential type.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::TypeNotFound`] if `type_name` is absent.
    pub fn remove(&mut self, type_name: &str) -> Result<()> {
        if self.entries.remove(type_name).is_none() {
            return Err(DatabaseError::TypeNotFound {
                type_name: type_name.to_string(),
            }
            .into());
        }
        self.compiled.remove(type_name);
        Ok(())
    }

    /// Looks up the full entry for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::TypeNotFound`] if absent.
    pub fn lookup(&self, type_name: &str) -> Result<&PatternEntry> {
        self.entries
            .get(type_name)
            .ok_or_else(|| {
                DatabaseError::TypeNotFound {
                    type_name: type_name.to_string(),
                }
                .into()
            })
    }

    /// Returns whether `type_name` exists.
    #[must_use]
    pub fn has(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Validates `value` against the regex declared for `type_name`.
    ///
    /// Uses a **prefix match** (`Regex::find` anchored at the start of the
    /// haystack), matching the Python original's `re.match` semantics
    /// exactly — not a full-string match. See SPEC_FULL.md Open Question
    /// OQ-2. Well-formed entries use `^…$` anchors, making the
    /// distinction immaterial in practice.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::TypeNotFound`] if `type_name` is absent.
    pub fn validate(&self, value: &str, type_name: &str) -> Result<bool> {
        let compiled = self.compiled.get(type_name).ok_or_else(|| {
            DatabaseError::TypeNotFound {
                type_name: type_name.to_string(),
            }
        })?;
        Ok(match compiled.find(value) {
            Some(m) => m.start() == 0,
            None => false,
        })
    }

    /// Lists every registered credential type.
    #[must_use]
    pub fn list_types(&self) -> Vec<&PatternEntry> {
        self.entries.values().collect()
    }

    /// Case-insensitive substring search over type identifier or
    /// description, matching `RegexDatabase.search_credential_types`.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.entries
            .values()
            .filter(|e| {
                e.type_name.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
            })
            .map(|e| e.type_name.as_str())
            .collect()
    }

    /// Returns summary statistics, matching
    /// `RegexDatabase.get_statistics`.
    #[must_use]
    pub fn statistics(&self) -> DatabaseStatistics {
        DatabaseStatistics {
            total_types: self.entries.len(),
            types: self.entries.keys().cloned().collect(),
        }
    }

    /// Serializes the database to `path` as JSON, matching
    /// `RegexDatabase.save`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] on I/O or serialization failure.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DatabaseError::Io)?;
        }
        let file = DbFile {
            credentials: self.entries.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(DatabaseError::InvalidJson)?;
        std::fs::write(path, json).map_err(DatabaseError::Io)?;
        Ok(())
    }

    /// Exports the database to `path` in the requested `format`
    /// (`json`, `csv`, or `yaml`), supplementing the distilled spec's
    /// JSON-only contract per `RegexDatabase.export_to_file`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::ExportFailed`] for an unsupported format
    /// or on I/O/serialization failure.
    pub fn export(&self, path: &Path, format: &str) -> Result<()> {
        match format.to_lowercase().as_str() {
            "json" => self.save(path),
            "csv" => self.export_csv(path),
            "yaml" => self.export_yaml(path),
            other => Err(DatabaseError::ExportFailed(format!("unsupported export format: {other}")).into()),
        }
    }

    fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| DatabaseError::ExportFailed(e.to_string()))?;
        writer
            .write_record(["Type", "Regex", "Description", "Generator"])
            .map_err(|e| DatabaseError::ExportFailed(e.to_string()))?;
        for entry in self.entries.values() {
            writer
                .write_record([&entry.type_name, &entry.regex, &entry.description, &entry.generator])
                .map_err(|e| DatabaseError::ExportFailed(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| DatabaseError::ExportFailed(e.to_string()))?;
        Ok(())
    }

    fn export_yaml(&self, path: &Path) -> Result<()> {
        let file = DbFile {
            credentials: self.entries.values().cloned().collect(),
        };
        let yaml =
            serde_yaml::to_string(&file).map_err(|e| DatabaseError::ExportFailed(e.to_string()))?;
        let mut f = std::fs::File::create(path).map_err(DatabaseError::Io)?;
        f.write_all(yaml.as_bytes()).map_err(DatabaseError::Io)?;
        Ok(())
    }
}

/// Summary statistics for a loaded database.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStatistics {
    /// Number of registered credential types.
    pub total_types: usize,
    /// Every registered type identifier.
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{"credentials": [
            {"type": "api_key", "regex": "^[A-Za-z0-9]{32}$", "description": "Generic API key"},
            {"type": "jwt_token", "regex": "^[^.]+\\.[^.]+\\.[^.]+$", "description": "JWT"}
        ]}"#
    }

    #[test]
    fn loads_valid_database() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        assert!(db.has("api_key"));
        assert!(db.has("jwt_token"));
        assert_eq!(db.list_types().len(), 2);
    }

    #[test]
    fn rejects_missing_credentials_key() {
        let err = PatternDatabase::load_from_str(r#"{"foo": []}"#);
        assert!(matches!(
            err,
            Err(crate::error::Error::Database(DatabaseError::MissingCredentialsKey))
        ));
    }

    #[test]
    fn rejects_duplicate_type() {
        let json = r#"{"credentials": [
            {"type": "x", "regex": "^a$", "description": "d"},
            {"type": "x", "regex": "^b$", "description": "d2"}
        ]}"#;
        let err = PatternDatabase::load_from_str(json);
        assert!(matches!(
            err,
            Err(crate::error::Error::Database(DatabaseError::DuplicateType { .. }))
        ));
    }

    #[test]
    fn rejects_uncompilable_regex() {
        let json = r#"{"credentials": [{"type": "x", "regex": "(unclosed", "description": "d"}]}"#;
        let err = PatternDatabase::load_from_str(json);
        assert!(matches!(
            err,
            Err(crate::error::Error::Database(DatabaseError::InvalidRegex { .. }))
        ));
    }

    #[test]
    fn validate_uses_prefix_match_like_python_re_match() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        // no end anchor variant to demonstrate prefix semantics
        let mut db2 = db.clone();
        db2.add("prefix_only", "^AB", "prefix-only pattern", None, vec![])
            .unwrap();
        assert!(db2.validate("ABCDEF", "prefix_only").unwrap());
        assert!(!db2.validate("XABCDEF", "prefix_only").unwrap());
    }

    #[test]
    fn unknown_type_has_is_false_and_lookup_errs() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        assert!(!db.has("nope"));
        assert!(db.lookup("nope").is_err());
        assert!(db.validate("x", "nope").is_err());
    }

    #[test]
    fn search_matches_type_and_description_case_insensitively() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        assert_eq!(db.search("API").len(), 1);
        assert_eq!(db.search("jwt").len(), 1);
        assert!(db.search("nonexistent").is_empty());
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        let tmp = tempfile::NamedTempFile::new().unwrap();
        db.save(tmp.path()).unwrap();
        let reloaded = PatternDatabase::load(tmp.path()).unwrap();
        assert_eq!(db.list_types().len(), reloaded.list_types().len());
        for entry in db.list_types() {
            let other = reloaded.lookup(&entry.type_name).unwrap();
            assert_eq!(entry.regex, other.regex);
            assert_eq!(entry.description, other.description);
        }
    }

    #[test]
    fn export_csv_and_yaml_write_nonempty_files() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        let csv_tmp = tempfile::NamedTempFile::new().unwrap();
        db.export(csv_tmp.path(), "csv").unwrap();
        assert!(std::fs::metadata(csv_tmp.path()).unwrap().len() > 0);

        let yaml_tmp = tempfile::NamedTempFile::new().unwrap();
        db.export(yaml_tmp.path(), "yaml").unwrap();
        assert!(std::fs::metadata(yaml_tmp.path()).unwrap().len() > 0);
    }

    #[test]
    fn export_rejects_unsupported_format() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(db.export(tmp.path(), "xml").is_err());
    }

    #[test]
    fn add_and_remove_round_trip() {
        let mut db = PatternDatabase::new();
        db.add("new_type", "^[0-9]{4}$", "four digits", None, vec![])
            .unwrap();
        assert!(db.has("new_type"));
        db.remove("new_type").unwrap();
        assert!(!db.has("new_type"));
        assert!(db.remove("new_type").is_err());
    }

    #[test]
    fn statistics_reports_counts() {
        let db = PatternDatabase::load_from_str(sample_json()).unwrap();
        let stats = db.statistics();
        assert_eq!(stats.total_types, 2);
    }
}
