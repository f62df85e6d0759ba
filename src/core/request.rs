//! The user's intent: a [`Request`] for a batch of synthetic documents.

use std::path::PathBuf;

/// Declarative policy for where credentials appear in a produced file.
///
/// Binders interpret this; the content assembler only records the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedStrategy {
    /// Embed credentials in a randomly chosen location (body or metadata,
    /// binder's choice).
    #[default]
    Random,
    /// Embed credentials in the format's metadata region (email headers,
    /// document properties, a dedicated workbook sheet, …).
    Metadata,
    /// Embed credentials directly in a section body.
    Body,
}

/// A batch generation request: the sole input to
/// [`crate::orchestrator::Orchestrator::run`].
///
/// # Examples
///
/// ```
/// use credentialforge::core::Request;
///
/// let req = Request::builder("out".into())
///     .num_files(2)
///     .formats(vec!["eml".to_string()])
///     .credential_types(vec!["aws_access_key".to_string()])
///     .topics(vec!["database migration".to_string()])
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(req.num_files, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    /// Directory artifacts are written to.
    pub output_dir: PathBuf,
    /// Number of files to produce; ≥ 1.
    pub num_files: usize,
    /// Jobs per batch before the orchestrator re-evaluates memory pressure.
    pub batch_size: usize,
    /// Requested output formats; each must be in the closed supported set.
    pub formats: Vec<String>,
    /// Requested credential type identifiers; each must resolve in the
    /// pattern database.
    pub credential_types: Vec<String>,
    /// Ordered list of free-text topic strings.
    pub topics: Vec<String>,
    /// Candidate languages; `None` means "choose per file from the
    /// selected company".
    pub languages: Option<Vec<String>>,
    /// Where credentials are embedded.
    pub embed_strategy: EmbedStrategy,
    /// Optional seed for reproducible runs.
    pub seed: Option<u64>,
    /// Minimum credentials per file; 1 ≤ min ≤ max.
    pub min_credentials_per_file: usize,
    /// Maximum credentials per file; max ≤ `credential_types.len()`.
    pub max_credentials_per_file: usize,
    /// Whether to attempt neural content generation.
    pub use_neural_content: bool,
    /// Whether to attempt neural credential generation.
    pub use_neural_credentials: bool,
    /// Soft memory ceiling hint for the memory governor.
    pub memory_limit_gib: Option<f64>,
    /// Override for the computed worker count.
    pub max_workers: Option<usize>,
    /// Whether to prefer process isolation for heavy neural backends.
    pub use_process_isolation: bool,
}

impl Request {
    /// Starts building a request targeting `output_dir`.
    #[must_use]
    pub fn builder(output_dir: PathBuf) -> RequestBuilder {
        RequestBuilder::new(output_dir)
    }
}

/// Builder for [`Request`], validating invariants from §3 at `build()` time.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    output_dir: PathBuf,
    num_files: usize,
    batch_size: usize,
    formats: Vec<String>,
    credential_types: Vec<String>,
    topics: Vec<String>,
    languages: Option<Vec<String>>,
    embed_strategy: EmbedStrategy,
    seed: Option<u64>,
    min_credentials_per_file: usize,
    max_credentials_per_file: usize,
    use_neural_content: bool,
    use_neural_credentials: bool,
    memory_limit_gib: Option<f64>,
    max_workers: Option<usize>,
    use_process_isolation: bool,
}

impl RequestBuilder {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            num_files: 1,
            batch_size: 50,
            formats: Vec::new(),
            credential_types: Vec::new(),
            topics: Vec::new(),
            languages: None,
            embed_strategy: EmbedStrategy::default(),
            seed: None,
            min_credentials_per_file: 1,
            max_credentials_per_file: 1,
            use_neural_content: false,
            use_neural_credentials: false,
            memory_limit_gib: None,
            max_workers: None,
            use_process_isolation: false,
        }
    }

    /// Sets the number of files to produce.
    #[must_use]
    pub const fn num_files(mut self, n: usize) -> Self {
        self.num_files = n;
        self
    }

    /// Sets the requested batch size.
    #[must_use]
    pub const fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Sets the requested output formats.
    #[must_use]
    pub fn formats(mut self, formats: Vec<String>) -> Self {
        self.formats = formats;
        self
    }

    /// Sets the requested credential types.
    #[must_use]
    pub fn credential_types(mut self, types: Vec<String>) -> Self {
        self.credential_types = types;
        self
    }

    /// Sets the ordered topic list.
    #[must_use]
    pub fn topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Sets the candidate language set.
    #[must_use]
    pub fn languages(mut self, languages: Vec<String>) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Sets the embed strategy.
    #[must_use]
    pub const fn embed_strategy(mut self, strategy: EmbedStrategy) -> Self {
        self.embed_strategy = strategy;
        self
    }

    /// Sets the reproducibility seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the minimum and maximum credentials per file.
    #[must_use]
    pub const fn credentials_per_file(mut self, min: usize, max: usize) -> Self {
        self.min_credentials_per_file = min;
        self.max_credentials_per_file = max;
        self
    }

    /// Enables neural content generation.
    #[must_use]
    pub const fn use_neural_content(mut self, enabled: bool) -> Self {
        self.use_neural_content = enabled;
        self
    }

    /// Enables neural credential generation.
    #[must_use]
    pub const fn use_neural_credentials(mut self, enabled: bool) -> Self {
        self.use_neural_credentials = enabled;
        self
    }

    /// Sets the memory-limit hint in GiB.
    #[must_use]
    pub const fn memory_limit_gib(mut self, gib: f64) -> Self {
        self.memory_limit_gib = Some(gib);
        self
    }

    /// Overrides the computed worker count.
    #[must_use]
    pub const fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    /// Requests process isolation when eligible (see Request contract).
    #[must_use]
    pub const fn use_process_isolation(mut self, enabled: bool) -> Self {
        self.use_process_isolation = enabled;
        self
    }

    /// Validates invariants and constructs the [`Request`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ValidationError`] if `formats`,
    /// `credential_types`, or `topics` are empty, or if numeric bounds are
    /// out of range.
    pub fn build(self) -> crate::error::Result<Request> {
        use crate::error::ValidationError;

        if self.num_files == 0 {
            return Err(ValidationError::OutOfRange {
                field: "num_files",
                detail: "must be >= 1".to_string(),
            }
            .into());
        }
        if self.batch_size == 0 {
            return Err(ValidationError::OutOfRange {
                field: "batch_size",
                detail: "must be >= 1".to_string(),
            }
            .into());
        }
        if self.formats.is_empty() {
            return Err(ValidationError::Malformed("formats must be non-empty".to_string()).into());
        }
        if self.credential_types.is_empty() {
            return Err(ValidationError::Malformed(
                "credential_types must be non-empty".to_string(),
            )
            .into());
        }
        if self.topics.is_empty() {
            return Err(ValidationError::Malformed("topics must be non-empty".to_string()).into());
        }
        if self.min_credentials_per_file == 0
            || self.min_credentials_per_file > self.max_credentials_per_file
            || self.max_credentials_per_file > self.credential_types.len()
        {
            return Err(ValidationError::OutOfRange {
                field: "min_credentials_per_file/max_credentials_per_file",
                detail: format!(
                    "require 1 <= min ({}) <= max ({}) <= credential_types.len() ({})",
                    self.min_credentials_per_file,
                    self.max_credentials_per_file,
                    self.credential_types.len()
                ),
            }
            .into());
        }

        Ok(Request {
            output_dir: self.output_dir,
            num_files: self.num_files,
            batch_size: self.batch_size,
            formats: self.formats,
            credential_types: self.credential_types,
            topics: self.topics,
            languages: self.languages,
            embed_strategy: self.embed_strategy,
            seed: self.seed,
            min_credentials_per_file: self.min_credentials_per_file,
            max_credentials_per_file: self.max_credentials_per_file,
            use_neural_content: self.use_neural_content,
            use_neural_credentials: self.use_neural_credentials,
            memory_limit_gib: self.memory_limit_gib,
            max_workers: self.max_workers,
            use_process_isolation: self.use_process_isolation,
        })
    }
}
