//! Error taxonomy for credentialforge.
//!
//! Errors are grouped into the behavioral categories from the specification:
//! validation, database, generation, synthesis, LLM, and configuration
//! failures. Only [`ValidationError`] and [`DatabaseError`] are allowed to
//! escape [`crate::orchestrator::Orchestrator::run`]; every other category is
//! recorded per-file in `RunResult::errors` instead of propagating.

use std::path::PathBuf;

/// Convenience alias for crate-wide fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error, one variant per behavioral category from the
/// specification's error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request inconsistent with schema, unknown credential type,
    /// unsupported format, or out-of-range numeric bounds.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed pattern database or I/O failure loading it.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Per-file failure in the assembler or credential factory.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Binder failure (library missing, write failure).
    #[error(transparent)]
    Synthesizer(#[from] SynthesizerError),

    /// Neural model load/decode/timeout failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Environment/network misconfiguration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Generic I/O failure not otherwise categorized.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-validation failures. Always fatal to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A credential type referenced by the request has no entry in the
    /// pattern database.
    #[error("unknown credential type: {type_name}")]
    UnknownCredentialType {
        /// The offending type identifier.
        type_name: String,
    },

    /// A requested output format is outside the closed supported set.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// The offending format identifier.
        format: String,
    },

    /// A numeric field fell outside its documented range.
    #[error("{field} out of range: {detail}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable detail.
        detail: String,
    },

    /// The request failed a structural check not covered above.
    #[error("invalid request: {0}")]
    Malformed(String),

    /// The output directory could not be used.
    #[error("output directory not writable: {path}")]
    OutputDirNotWritable {
        /// Path that failed the writability check.
        path: PathBuf,
    },
}

/// Pattern-database load/validate failures. Always fatal to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The database file does not exist or could not be read.
    #[error("database file not found: {path}")]
    NotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// The file did not parse as JSON.
    #[error("invalid JSON in database file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON was well-formed but missing the `credentials` key.
    #[error("invalid database format: missing 'credentials' key")]
    MissingCredentialsKey,

    /// An entry was missing a required field.
    #[error("missing required field '{field}' for credential type '{type_name}'")]
    MissingField {
        /// Credential type identifier the entry belongs to.
        type_name: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// An entry's regex did not compile.
    #[error("invalid regex pattern for {type_name}: {source}")]
    InvalidRegex {
        /// Credential type identifier the entry belongs to.
        type_name: String,
        /// Underlying regex compile error.
        #[source]
        source: regex::Error,
    },

    /// Two entries declared the same `type`.
    #[error("duplicate credential type: {type_name}")]
    DuplicateType {
        /// The duplicated type identifier.
        type_name: String,
    },

    /// The requested credential type does not exist in the database.
    #[error("credential type not found: {type_name}")]
    TypeNotFound {
        /// The missing type identifier.
        type_name: String,
    },

    /// Generic I/O failure while loading or saving.
    #[error("database I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Export to a non-JSON format failed.
    #[error("export failed: {0}")]
    ExportFailed(String),
}

/// Per-file content-generation failures. Recorded in `RunResult::errors`;
/// the run continues.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The credential factory could not produce a fresh unique value after
    /// the bounded number of collision retries.
    #[error("could not generate a unique value for '{type_name}' after {attempts} attempts")]
    UniquenessExhausted {
        /// Credential type identifier.
        type_name: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// A generated value failed post-generation validation against its
    /// declared regex.
    #[error("generated value for '{type_name}' failed pattern validation")]
    FailedValidation {
        /// Credential type identifier.
        type_name: String,
    },

    /// The content assembler could not build a `ContentStructure`.
    #[error("content assembly failed: {0}")]
    AssemblyFailed(String),

    /// A job timed out before completing.
    #[error("job timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Binder (format serializer) failures. Recorded in `RunResult::errors`;
/// the run continues. A binder may choose to write a `.txt` fallback
/// instead of returning this error.
#[derive(Debug, thiserror::Error)]
pub enum SynthesizerError {
    /// No binder is registered for the requested format.
    #[error("no binder registered for format: {format}")]
    UnsupportedFormat {
        /// The offending format identifier.
        format: String,
    },

    /// The binder failed while writing the output file.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// Path the binder attempted to write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The binder's underlying container/document library reported a
    /// failure (malformed structure, encoding failure, etc.).
    #[error("synthesis failed for {format}: {detail}")]
    EncodingFailed {
        /// Format identifier being synthesized.
        format: String,
        /// Human-readable detail.
        detail: String,
    },
}

/// Neural generator adapter failures. Never fatal; callers fall back to the
/// template path.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No neural backend is configured or compiled in.
    #[error("neural generator unavailable")]
    Unavailable,

    /// The backend's request timed out.
    #[error("neural generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The backend returned an error.
    #[error("neural generation failed: {0}")]
    BackendFailure(String),
}

/// Environment/network misconfiguration surfaced by network-facing
/// collaborators (e.g. the optional neural backend).
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A required environment variable held an unparsable value.
    #[error("invalid value for {var}: {detail}")]
    InvalidEnvVar {
        /// Variable name.
        var: &'static str,
        /// Human-readable detail.
        detail: String,
    },

    /// The configured endpoint could not be reached.
    #[error("endpoint unreachable: {0}")]
    EndpointUnreachable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_top_level() {
        let e: Error = ValidationError::UnknownCredentialType {
            type_name: "foo".to_string(),
        }
        .into();
        assert!(matches!(e, Error::Validation(_)));
        assert!(e.to_string().contains("foo"));
    }

    #[test]
    fn database_error_converts_into_top_level() {
        let e: Error = DatabaseError::DuplicateType {
            type_name: "api_key".to_string(),
        }
        .into();
        assert!(matches!(e, Error::Database(_)));
    }

    #[test]
    fn generation_error_messages_are_descriptive() {
        let e = GenerationError::UniquenessExhausted {
            type_name: "password".to_string(),
            attempts: 10,
        };
        assert!(e.to_string().contains("password"));
        assert!(e.to_string().contains("10"));
    }

    #[test]
    fn io_error_converts_into_top_level() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
