//! Worker pool: executes independent file-generation jobs with bounded
//! parallelism and a per-job timeout.
//!
//! Grounded in SPEC_FULL.md §4.2/§5. The pool itself is a
//! `rayon::ThreadPool`, matching the rayon-based concurrency pattern in
//! `examples/zircote-rlm-rs/src/chunking/parallel.rs`; per-job
//! cancellation is layered on top via a detached `std::thread` and an
//! `mpsc` channel read with `recv_timeout`, per §4.2's Rust notes.

use crate::core::{Credential, EmbedStrategy};
use crate::error::{GenerationError, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

/// One independent file-generation unit of work.
///
/// `file_index` is the user-visible identity from the request; it is
/// preserved even though completion order (and therefore the order of
/// [`JobOutcome`]s) is not guaranteed to match it, per §5's ordering
/// guarantees.
#[derive(Debug, Clone)]
pub struct Job {
    /// Position of this file within the overall request.
    pub file_index: usize,
    /// Output format identifier.
    pub format: String,
    /// Free-text topic for this file.
    pub topic: String,
    /// Credential types sampled for this file.
    pub credential_types: Vec<String>,
    /// Chosen company, picked before (and driving) the language when the
    /// request did not pin one, per §3's "choose per file based on the
    /// selected company".
    pub company: String,
    /// Chosen language code.
    pub language: String,
    /// Declared embed-location preference.
    pub embed_strategy: EmbedStrategy,
    /// Per-file RNG seed, derived deterministically from `(seed,
    /// file_index)` so reruns with the same request reproduce the same
    /// output regardless of scheduling order.
    pub rng_seed: u64,
}

/// One successfully produced artifact.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Identity of the job that produced this file.
    pub file_index: usize,
    /// Path to the written artifact.
    pub path: PathBuf,
    /// Format identifier used.
    pub format: String,
    /// Credentials embedded in (or attached to) this file.
    pub credentials: Vec<Credential>,
}

/// A per-job failure, always recorded rather than propagated past the
/// pool boundary, per §7's propagation policy.
#[derive(Debug)]
pub struct JobError {
    /// Identity of the failed job.
    pub file_index: usize,
    /// Underlying cause.
    pub error: crate::error::Error,
}

/// Outcome of one job, returned in completion order (not file-index
/// order) by [`WorkerPool::run_batch`].
#[derive(Debug)]
pub enum JobOutcome {
    /// The job produced a file.
    Success(GeneratedFile),
    /// The job failed or timed out.
    Failure(JobError),
}

/// Executes one [`Job`] to completion. Implementations must not share
/// mutable state across calls except through types that are internally
/// synchronized (e.g. `Arc<Mutex<_>>`), matching §4.2's concurrency
/// invariant that workers communicate only through the orchestrator's
/// aggregation channel.
pub trait JobRunner: Send + Sync {
    /// Runs `job`, producing a [`GeneratedFile`] or a crate [`Error`].
    ///
    /// [`Error`]: crate::error::Error
    fn run(&self, job: &Job) -> Result<GeneratedFile>;
}

/// A bounded-parallelism executor for a batch of [`Job`]s.
///
/// Concurrently *running* jobs are capped at the pool's thread count by
/// rayon's own scheduler, which keeps outstanding work within the `2·W`
/// backpressure bound from §5 without a separate semaphore.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Builds a pool with `num_threads` workers.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `rayon::ThreadPool` cannot be
    /// built (this should not happen for any `num_threads >= 1`).
    pub fn new(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .build()
            .map_err(|e| GenerationError::AssemblyFailed(format!("failed to build worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Runs every job in `jobs` through `runner`, each bounded by
    /// `timeout`. Returns one [`JobOutcome`] per job, in completion
    /// order.
    ///
    /// A job whose result arrives after `timeout` is recorded as a
    /// [`JobError`] with [`GenerationError::Timeout`]; the spawned
    /// worker thread is not joined, so its eventual (discarded) result
    /// never blocks the batch, matching §5's "individual completions
    /// after cancellation are discarded".
    pub fn run_batch(&self, jobs: &[Job], timeout: Duration, runner: Arc<dyn JobRunner>) -> Vec<JobOutcome> {
        self.pool.install(|| {
            jobs.par_iter()
                .map(|job| Self::run_one_with_timeout(job.clone(), timeout, Arc::clone(&runner)))
                .collect()
        })
    }

    /// Fallback path for when the rayon pool itself has failed (poisoned
    /// by a panic in a prior batch): runs every job sequentially on the
    /// calling thread, per §4.1's "fall back to a sequential path on
    /// repeated pool failures" requirement.
    pub fn run_batch_sequential(jobs: &[Job], timeout: Duration, runner: &Arc<dyn JobRunner>) -> Vec<JobOutcome> {
        jobs.iter()
            .map(|job| Self::run_one_with_timeout(job.clone(), timeout, Arc::clone(runner)))
            .collect()
    }

    fn run_one_with_timeout(job: Job, timeout: Duration, runner: Arc<dyn JobRunner>) -> JobOutcome {
        let (tx, rx) = mpsc::channel();
        let file_index = job.file_index;
        std::thread::spawn(move || {
            let result = runner.run(&job);
            let _ = tx.send(result);
        });
        match rx.recv_timeout(timeout) {
            Ok(Ok(file)) => JobOutcome::Success(file),
            Ok(Err(error)) => JobOutcome::Failure(JobError { file_index, error }),
            Err(_) => {
                tracing::warn!(target: "worker.pool", file_index, timeout_ms = timeout.as_millis() as u64, "job_timed_out");
                JobOutcome::Failure(JobError {
                    file_index,
                    error: GenerationError::Timeout(timeout).into(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Instant {
        path: PathBuf,
    }

    impl JobRunner for Instant {
        fn run(&self, job: &Job) -> Result<GeneratedFile> {
            Ok(GeneratedFile {
                file_index: job.file_index,
                path: self.path.clone(),
                format: job.format.clone(),
                credentials: Vec::new(),
            })
        }
    }

    struct Slow;

    impl JobRunner for Slow {
        fn run(&self, job: &Job) -> Result<GeneratedFile> {
            std::thread::sleep(Duration::from_millis(200));
            Ok(GeneratedFile {
                file_index: job.file_index,
                path: PathBuf::from("never"),
                format: job.format.clone(),
                credentials: Vec::new(),
            })
        }
    }

    fn sample_jobs(n: usize) -> Vec<Job> {
        (0..n)
            .map(|i| Job {
                file_index: i,
                format: "eml".to_string(),
                topic: "t".to_string(),
                credential_types: vec!["api_key".to_string()],
                company: "Acme Corp".to_string(),
                language: "en".to_string(),
                embed_strategy: EmbedStrategy::Random,
                rng_seed: i as u64,
            })
            .collect()
    }

    #[test]
    fn runs_every_job_and_preserves_file_index_identity() {
        let pool = WorkerPool::new(2).unwrap();
        let runner: Arc<dyn JobRunner> = Arc::new(Instant { path: PathBuf::from("out.eml") });
        let outcomes = pool.run_batch(&sample_jobs(5), Duration::from_secs(5), runner);
        assert_eq!(outcomes.len(), 5);
        let mut indices: Vec<usize> = outcomes
            .iter()
            .map(|o| match o {
                JobOutcome::Success(f) => f.file_index,
                JobOutcome::Failure(e) => e.file_index,
            })
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn a_job_exceeding_its_timeout_is_recorded_as_a_failure() {
        let pool = WorkerPool::new(2).unwrap();
        let runner: Arc<dyn JobRunner> = Arc::new(Slow);
        let outcomes = pool.run_batch(&sample_jobs(1), Duration::from_millis(10), runner);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], JobOutcome::Failure(_)));
    }

    #[test]
    fn sequential_fallback_runs_every_job_on_the_calling_thread() {
        let runner: Arc<dyn JobRunner> = Arc::new(Instant { path: PathBuf::from("out.eml") });
        let outcomes = WorkerPool::run_batch_sequential(&sample_jobs(3), Duration::from_secs(5), &runner);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| matches!(o, JobOutcome::Success(_))));
    }
}
