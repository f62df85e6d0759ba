//! Orchestrator: validates a [`Request`], partitions it into batches,
//! dispatches them to the worker pool, and merges results into a
//! [`RunResult`].
//!
//! Grounded in SPEC_FULL.md §4.1, with the batch/memory-governor loop
//! algorithm ported from `examples/original_source/credentialforge/
//! agents/orchestrator.py`'s `_generate_files`, and the `StdRng`-per-file
//! derivation and `rayon::ThreadPool` dispatch from §4.1's Rust notes.

use crate::assembler::ContentAssembler;
use crate::binder;
use crate::core::{CompanyBinding, Credential, LanguagePack, Request};
use crate::credential::CredentialFactory;
use crate::error::{Result, ValidationError};
use crate::memory_governor::{self, MemoryGovernor, Pressure};
use crate::neural::{self, NeuralGenerator};
use crate::pattern_db::PatternDatabase;
use crate::worker::{GeneratedFile, Job, JobError, JobOutcome, JobRunner, WorkerPool};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default per-job timeout, per §5's "Cancellation and timeouts".
const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(300);

/// Threshold above which the orchestrator auto-shrinks an oversized
/// requested batch size, per §4.1 step 3.
const LARGE_RUN_FILE_THRESHOLD: usize = 1000;

/// One produced artifact's identity and location, as surfaced to the
/// caller of [`Orchestrator::run`].
#[derive(Debug, Clone)]
pub struct ProducedFile {
    /// Position of this file within the request.
    pub file_index: usize,
    /// Path to the written artifact.
    pub path: PathBuf,
    /// Format identifier used.
    pub format: String,
    /// Credentials embedded in (or attached to) this file.
    pub credentials: Vec<Credential>,
}

/// One per-job failure record, per §7's "every per-job failure becomes a
/// `{fileIndex, category, message}` record".
#[derive(Debug, Clone)]
pub struct RunError {
    /// Position of the failed file within the request.
    pub file_index: usize,
    /// Human-readable cause.
    pub message: String,
}

/// Aggregate counters for one run, per §4.1 step 5/§6's summary fields.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Total files successfully produced.
    pub total_files: usize,
    /// Total credentials embedded or attached across all files.
    pub total_credentials: usize,
    /// Successful file count keyed by format identifier.
    pub files_by_format: BTreeMap<String, usize>,
    /// Credential count keyed by credential type.
    pub credentials_by_type: BTreeMap<String, usize>,
    /// Total elapsed wall-clock time for the run.
    pub elapsed: Duration,
    /// Number of memory-governor cleanups performed.
    pub memory_cleanups: u64,
    /// Number of batches dispatched to the worker pool in parallel.
    pub parallel_batches: u64,
    /// Number of batches run on the sequential fallback path.
    pub sequential_batches: u64,
}

/// The result of one [`Orchestrator::run`] call. Never represents an
/// orchestrator-wide failure — those are returned as `Err` from `run`
/// itself, per §4.1's contract.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Successfully produced files, in completion order (not file-index
    /// order), per §5's ordering guarantees.
    pub files: Vec<ProducedFile>,
    /// Per-file failures.
    pub errors: Vec<RunError>,
    /// Aggregate counters.
    pub stats: RunStats,
}

/// Coordinates the whole generation pipeline for one [`Request`].
///
/// Holds the read-only shared assets (pattern database, company
/// bindings, language packs) that every worker thread reads without
/// locking, per §5's shared-resource policy.
pub struct Orchestrator {
    patterns: Arc<PatternDatabase>,
    companies: Arc<CompanyBinding>,
    languages: Arc<std::collections::HashMap<String, LanguagePack>>,
    neural_endpoint: Option<String>,
    neural_api_key: Option<String>,
    neural_model: Option<String>,
}

impl Orchestrator {
    /// Constructs an orchestrator backed by `patterns`, with the
    /// built-in company bindings and language packs.
    #[must_use]
    pub fn new(patterns: PatternDatabase) -> Self {
        Self {
            patterns: Arc::new(patterns),
            companies: Arc::new(CompanyBinding::builtin()),
            languages: Arc::new(LanguagePack::builtin_registry()),
            neural_endpoint: None,
            neural_api_key: None,
            neural_model: None,
        }
    }

    /// Overrides the company/language bindings, e.g. after merging
    /// additional locale assets per §6's merge rule.
    #[must_use]
    pub fn with_companies(mut self, companies: CompanyBinding) -> Self {
        self.companies = Arc::new(companies);
        self
    }

    /// Configures the optional remote neural backend used when a
    /// request asks for neural content or credentials, per §4.7. `model`
    /// overrides [`neural::RemoteGenerator`]'s built-in default model
    /// when given.
    #[must_use]
    pub fn with_neural_endpoint(mut self, endpoint: impl Into<String>, api_key: impl Into<String>, model: Option<String>) -> Self {
        self.neural_endpoint = Some(endpoint.into());
        self.neural_api_key = Some(api_key.into());
        self.neural_model = model;
        self
    }

    /// Runs `req` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ValidationError`] if `req` references an
    /// unknown credential type, or [`crate::error::ValidationError::OutputDirNotWritable`]
    /// if `req.output_dir` cannot be created. Per-file failures are
    /// recorded in `RunResult::errors` instead of propagating, per §7.
    pub fn run(&self, req: &Request) -> Result<RunResult> {
        let start = Instant::now();
        self.validate(req)?;
        std::fs::create_dir_all(&req.output_dir).map_err(|_| ValidationError::OutputDirNotWritable {
            path: req.output_dir.clone(),
        })?;

        let num_workers = self.worker_count(req);
        let mut batch_size = self.initial_batch_size(req);

        let credentials = Arc::new(CredentialFactory::new(Arc::clone(&self.patterns)));
        let runner: Arc<dyn JobRunner> = Arc::new(FileJobRunner {
            languages: Arc::clone(&self.languages),
            credentials: Arc::clone(&credentials),
            out_dir: req.output_dir.clone(),
            use_neural_content: req.use_neural_content,
            neural_endpoint: self.neural_endpoint.clone(),
            neural_api_key: self.neural_api_key.clone(),
            neural_model: self.neural_model.clone(),
        });

        let pool = WorkerPool::new(num_workers)?;
        let mut governor = MemoryGovernor::new(req.memory_limit_gib);

        let mut files = Vec::new();
        let mut errors = Vec::new();
        let mut stats = RunStats::default();
        let mut pool_poisoned = false;

        let mut file_index = 0usize;
        while file_index < req.num_files {
            let pressure = governor.sample();
            if pressure == Pressure::High {
                let shrunk = MemoryGovernor::advise_batch_size(pressure, batch_size);
                tracing::warn!(target: "orchestrator.memory", from = batch_size, to = shrunk, "batch_size_shrunk_under_pressure");
                batch_size = shrunk;
                governor.record_cleanup();
            }

            let this_batch = batch_size.min(req.num_files - file_index);
            let jobs: Vec<Job> = (0..this_batch)
                .map(|offset| self.build_job(req, file_index + offset))
                .collect();

            tracing::debug!(target: "orchestrator.batch", file_index, batch_size = this_batch, sequential = pool_poisoned, "batch_started");

            let outcomes = if pool_poisoned {
                stats.sequential_batches += 1;
                WorkerPool::run_batch_sequential(&jobs, DEFAULT_JOB_TIMEOUT, &runner)
            } else {
                stats.parallel_batches += 1;
                pool.run_batch(&jobs, DEFAULT_JOB_TIMEOUT, Arc::clone(&runner))
            };

            if outcomes.is_empty() && this_batch > 0 {
                tracing::warn!(target: "orchestrator.batch", "worker_pool_poisoned_falling_back_to_sequential");
                pool_poisoned = true;
            }

            let mut batch_failures = 0usize;
            for outcome in outcomes {
                if let JobOutcome::Failure(ref job_error) = outcome {
                    tracing::warn!(target: "orchestrator.job", file_index = job_error.file_index, error = %job_error.error, "job_failed");
                    batch_failures += 1;
                }
                record_outcome(outcome, &mut files, &mut errors, &mut stats);
            }

            tracing::debug!(target: "orchestrator.batch", file_index, failures = batch_failures, "batch_completed");

            file_index += this_batch;
            if governor.batch_completed() {
                governor.record_cleanup();
            }
        }

        stats.memory_cleanups = governor.cleanups_performed();
        stats.elapsed = start.elapsed();
        stats.total_files = files.len();

        tracing::info!(target: "orchestrator.run", total_files = stats.total_files, errors = errors.len(), elapsed_ms = stats.elapsed.as_millis() as u64, "run_completed");

        Ok(RunResult { files, errors, stats })
    }

    fn validate(&self, req: &Request) -> Result<()> {
        for format in &req.formats {
            binder::create_binder(format).map(|_| ())?;
        }
        for type_name in &req.credential_types {
            self.patterns.lookup(type_name).map_err(|_| ValidationError::UnknownCredentialType {
                type_name: type_name.clone(),
            })?;
        }
        Ok(())
    }

    fn worker_count(&self, req: &Request) -> usize {
        if let Some(n) = req.max_workers {
            return n.max(1);
        }
        let cores = std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(4);
        let memory_gib = req.memory_limit_gib.unwrap_or_else(memory_governor::total_memory_gib);
        let by_cpu = ((cores as f64) * 0.8).floor().max(1.0) as usize;
        let by_memory = (memory_gib / 1.2).floor().max(1.0) as usize;
        by_cpu.min(by_memory).min(12).max(1)
    }

    fn initial_batch_size(&self, req: &Request) -> usize {
        let mut size = req.batch_size;
        if req.num_files > LARGE_RUN_FILE_THRESHOLD && size > 50 {
            size = (req.num_files / 20).clamp(2, 50);
        }
        size.max(1)
    }

    fn build_job(&self, req: &Request, file_index: usize) -> Job {
        let mut rng = StdRng::seed_from_u64(derive_seed(req.seed, file_index));

        let format = req
            .formats
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "eml".to_string());
        let topic = req
            .topics
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "general documentation".to_string());

        let (company, language) = self.choose_company_and_language(req, &mut rng);

        let count = rng.gen_range(req.min_credentials_per_file..=req.max_credentials_per_file.max(req.min_credentials_per_file));
        let mut pool = req.credential_types.clone();
        pool.shuffle(&mut rng);
        let credential_types: Vec<String> = pool.into_iter().take(count.min(req.credential_types.len())).collect();

        Job {
            file_index,
            format,
            topic,
            credential_types,
            company,
            language,
            embed_strategy: req.embed_strategy,
            rng_seed: derive_seed(req.seed, file_index),
        }
    }

    /// Chooses the company and its bound language for one file, per §3's
    /// "`languages: null` means choose per file based on the selected
    /// company": when the request pins a language set, a language is
    /// drawn first and a matching company follows; otherwise a company is
    /// drawn from the full set first and its bound language follows.
    fn choose_company_and_language(&self, req: &Request, rng: &mut StdRng) -> (String, String) {
        if let Some(langs) = req.languages.as_ref() {
            let language = langs.choose(rng).cloned().unwrap_or_else(|| "en".to_string());
            let company = self
                .companies
                .companies_for_language(&language)
                .choose(rng)
                .copied()
                .unwrap_or("Acme Corp")
                .to_string();
            (company, language)
        } else {
            match self.companies.random_company(rng) {
                Some((name, info)) => (name.to_string(), info.language.clone()),
                None => ("Acme Corp".to_string(), "en".to_string()),
            }
        }
    }
}

/// Derives a per-file RNG seed from the optional request seed and the
/// file index, via a splitmix-style hash mix, per §4.1's Rust notes:
/// "a splitmix-style mix of `(seed, file_index)` via a hasher".
fn derive_seed(seed: Option<u64>, file_index: usize) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.unwrap_or(0).hash(&mut hasher);
    file_index.hash(&mut hasher);
    hasher.finish()
}

fn record_outcome(outcome: JobOutcome, files: &mut Vec<ProducedFile>, errors: &mut Vec<RunError>, stats: &mut RunStats) {
    match outcome {
        JobOutcome::Success(GeneratedFile { file_index, path, format, credentials }) => {
            *stats.files_by_format.entry(format.clone()).or_insert(0) += 1;
            stats.total_credentials += credentials.len();
            for credential in &credentials {
                *stats.credentials_by_type.entry(credential.type_name.clone()).or_insert(0) += 1;
            }
            files.push(ProducedFile { file_index, path, format, credentials });
        }
        JobOutcome::Failure(JobError { file_index, error }) => {
            errors.push(RunError { file_index, message: error.to_string() });
        }
    }
}

/// Executes one [`Job`] end to end: assembles a `ContentStructure`, then
/// hands it to the matching format binder.
///
/// Each worker thread lazily creates its own [`NeuralGenerator`]
/// instance on first use (cached thread-locally), per §4.2's "each
/// worker re-uses long-lived state … its own neural-generator instance".
struct FileJobRunner {
    languages: Arc<std::collections::HashMap<String, LanguagePack>>,
    credentials: Arc<CredentialFactory>,
    out_dir: PathBuf,
    use_neural_content: bool,
    neural_endpoint: Option<String>,
    neural_api_key: Option<String>,
    neural_model: Option<String>,
}

std::thread_local! {
    static THREAD_NEURAL: std::cell::RefCell<Option<Box<dyn NeuralGenerator>>> = const { std::cell::RefCell::new(None) };
}

impl JobRunner for FileJobRunner {
    fn run(&self, job: &Job) -> Result<crate::worker::GeneratedFile> {
        let mut rng = StdRng::seed_from_u64(job.rng_seed);

        let cs = THREAD_NEURAL.with(|cell| -> Result<crate::core::ContentStructure> {
            let mut slot = cell.borrow_mut();
            if slot.is_none() {
                *slot = Some(neural::create_generator(
                    self.neural_endpoint.as_deref(),
                    self.neural_api_key.as_deref(),
                    self.neural_model.as_deref(),
                ));
            }
            let neural_gen = slot.as_deref_mut();
            let mut assembler = ContentAssembler::new(&self.languages, &self.credentials, neural_gen, self.use_neural_content);
            assembler.assemble(
                &mut rng,
                &job.topic,
                &job.credential_types,
                &job.company,
                &job.language,
                &job.format,
                job.embed_strategy,
            )
        })?;

        let binder = binder::create_binder(&job.format)?;
        let path = binder.synthesize(&cs, &self.out_dir)?;

        Ok(crate::worker::GeneratedFile {
            file_index: job.file_index,
            path,
            format: job.format.clone(),
            credentials: cs.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EmbedStrategy;

    fn patterns() -> PatternDatabase {
        PatternDatabase::load_from_str(
            r#"{"credentials": [{"type": "api_key", "regex": "^[A-Za-z0-9]{32}$", "description": "API Key"}]}"#,
        )
        .unwrap()
    }

    fn sample_request(dir: &std::path::Path) -> Request {
        Request::builder(dir.to_path_buf())
            .num_files(3)
            .batch_size(2)
            .formats(vec!["eml".to_string()])
            .credential_types(vec!["api_key".to_string()])
            .topics(vec!["database migration".to_string()])
            .seed(7)
            .build()
            .unwrap()
    }

    #[test]
    fn run_produces_one_file_per_requested_count() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(patterns());
        let result = orchestrator.run(&sample_request(dir.path())).unwrap();
        assert_eq!(result.files.len() + result.errors.len(), 3);
        assert_eq!(result.stats.total_files, result.files.len());
    }

    #[test]
    fn unknown_credential_type_is_rejected_before_any_work_starts() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(patterns());
        let req = Request::builder(dir.path().to_path_buf())
            .num_files(1)
            .formats(vec!["eml".to_string()])
            .credential_types(vec!["nonexistent".to_string()])
            .topics(vec!["t".to_string()])
            .build()
            .unwrap();
        assert!(orchestrator.run(&req).is_err());
    }

    #[test]
    fn unsupported_format_is_rejected_before_any_work_starts() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(patterns());
        let req = Request::builder(dir.path().to_path_buf())
            .num_files(1)
            .formats(vec!["exe".to_string()])
            .credential_types(vec!["api_key".to_string()])
            .topics(vec!["t".to_string()])
            .build()
            .unwrap();
        assert!(orchestrator.run(&req).is_err());
    }

    #[test]
    fn derive_seed_is_stable_for_the_same_inputs() {
        assert_eq!(derive_seed(Some(1), 0), derive_seed(Some(1), 0));
        assert_ne!(derive_seed(Some(1), 0), derive_seed(Some(1), 1));
    }

    #[test]
    fn single_file_request_uses_exactly_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(patterns());
        let req = Request::builder(dir.path().to_path_buf())
            .num_files(1)
            .batch_size(50)
            .formats(vec!["eml".to_string()])
            .credential_types(vec!["api_key".to_string()])
            .topics(vec!["t".to_string()])
            .embed_strategy(EmbedStrategy::Body)
            .build()
            .unwrap();
        let result = orchestrator.run(&req).unwrap();
        assert_eq!(result.stats.parallel_batches + result.stats.sequential_batches, 1);
    }
}
