//! Adaptive batch-size governor, sampling resident memory before each
//! batch and shrinking the next batch when pressure is high.
//!
//! Grounded in SPEC_FULL.md §5's "Memory governor" paragraph and, for the
//! RSS-sampling mechanism itself, `examples/other_examples/manifests/
//! SigmundGranaas-petty/Cargo.toml`'s `memory-stats` usage.

use std::collections::VecDeque;
use sysinfo::System;

/// Bounds how many usage samples [`MemoryGovernor`] retains for
/// diagnostics, per §5.
const HISTORY_LIMIT: usize = 100;

/// Unconditional cleanup cadence when no pressure is observed, per §5's
/// default `cleanupInterval`.
const DEFAULT_CLEANUP_INTERVAL: u32 = 5;

/// Floor a shrinking batch size never drops below, per §5.
const MIN_BATCH_SIZE: usize = 2;

/// Fraction of total memory at or above which [`MemoryGovernor::sample`]
/// reports high pressure, per §5's "exceeds 95%".
const HIGH_PRESSURE_RATIO: f64 = 0.95;

/// Reads the platform's total physical memory, in GiB, via
/// [`sysinfo::System`]. Used by the orchestrator's worker-count heuristic
/// so its memory-based cap shares the same notion of "available memory"
/// as [`MemoryGovernor`]'s own ceiling fallback, rather than each
/// defaulting independently.
#[must_use]
pub fn total_memory_gib() -> f64 {
    let mut system = System::new();
    system.refresh_memory();
    system.total_memory() as f64 / (1024.0 * 1024.0 * 1024.0)
}

/// One resident-memory observation, retained for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct MemorySample {
    /// Physical resident set size in bytes, if the platform call
    /// succeeded.
    pub physical_bytes: Option<u64>,
    /// Fraction of a configured or assumed ceiling in use, if
    /// computable.
    pub usage_ratio: Option<f64>,
}

/// Whether a sample indicates the run should shrink its next batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pressure {
    /// Usage is comfortably below the ceiling.
    Normal,
    /// Usage is at or above the ceiling; the caller should shrink the
    /// next batch and trigger a cleanup.
    High,
    /// The platform sampling call failed; never treated as high
    /// pressure, per §5's Rust notes.
    Unknown,
}

/// Tracks resident-memory pressure across a run and advises batch-size
/// adjustments, mirroring `OrchestratorAgent._check_memory_usage`/
/// `_cleanup_memory` from the Python original.
pub struct MemoryGovernor {
    limit_bytes: Option<u64>,
    total_bytes: u64,
    cleanup_interval: u32,
    batches_since_cleanup: u32,
    history: VecDeque<MemorySample>,
    cleanups_performed: u64,
}

impl MemoryGovernor {
    /// Constructs a governor. `limit_gib`, when set, is the configured
    /// soft ceiling (`Request::memory_limit_gib`); when absent the
    /// governor falls back to the platform's total memory as the ceiling,
    /// read once at construction time via [`sysinfo::System`].
    #[must_use]
    pub fn new(limit_gib: Option<f64>) -> Self {
        Self {
            limit_bytes: limit_gib.map(|gib| (gib * 1024.0 * 1024.0 * 1024.0) as u64),
            total_bytes: (total_memory_gib() * 1024.0 * 1024.0 * 1024.0) as u64,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            batches_since_cleanup: 0,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            cleanups_performed: 0,
        }
    }

    /// Overrides the unconditional-cleanup cadence.
    #[must_use]
    pub fn cleanup_interval(mut self, interval: u32) -> Self {
        self.cleanup_interval = interval.max(1);
        self
    }

    /// Samples resident memory, records it to the bounded history, and
    /// reports current pressure.
    pub fn sample(&mut self) -> Pressure {
        let usage = memory_stats::memory_stats();
        let sample = match usage {
            Some(stats) => {
                let physical = stats.physical_mem as u64;
                let ceiling = self.limit_bytes.or(Some(self.total_bytes).filter(|&t| t > 0));
                let ratio = ceiling.map(|limit| physical as f64 / limit as f64);
                MemorySample {
                    physical_bytes: Some(physical),
                    usage_ratio: ratio,
                }
            }
            None => MemorySample {
                physical_bytes: None,
                usage_ratio: None,
            },
        };

        if self.history.len() >= HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(sample);

        match sample.usage_ratio {
            Some(ratio) if ratio >= HIGH_PRESSURE_RATIO => Pressure::High,
            Some(_) => Pressure::Normal,
            None => Pressure::Unknown,
        }
    }

    /// Advises the next batch size given the current one and the most
    /// recent sample's pressure. Returns the unchanged size under
    /// `Normal`/`Unknown` pressure, and a halved size (never below
    /// [`MIN_BATCH_SIZE`]) under `High` pressure.
    #[must_use]
    pub fn advise_batch_size(pressure: Pressure, current: usize) -> usize {
        if pressure == Pressure::High {
            (current / 2).max(MIN_BATCH_SIZE)
        } else {
            current
        }
    }

    /// Records that one batch has completed, returning whether an
    /// unconditional cleanup is now due (every `cleanup_interval`
    /// batches, per §5), and resetting the counter if so.
    pub fn batch_completed(&mut self) -> bool {
        self.batches_since_cleanup += 1;
        if self.batches_since_cleanup >= self.cleanup_interval {
            self.batches_since_cleanup = 0;
            true
        } else {
            false
        }
    }

    /// Records that a cleanup ran (forced by pressure or by cadence).
    pub fn record_cleanup(&mut self) {
        self.cleanups_performed += 1;
    }

    /// Total cleanups performed so far.
    #[must_use]
    pub const fn cleanups_performed(&self) -> u64 {
        self.cleanups_performed
    }

    /// Bounded diagnostic history of usage samples, oldest first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<MemorySample> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advise_halves_under_high_pressure_never_below_floor() {
        assert_eq!(MemoryGovernor::advise_batch_size(Pressure::High, 10), 5);
        assert_eq!(MemoryGovernor::advise_batch_size(Pressure::High, 3), 2);
        assert_eq!(MemoryGovernor::advise_batch_size(Pressure::High, 2), 2);
    }

    #[test]
    fn advise_leaves_batch_size_unchanged_under_normal_or_unknown_pressure() {
        assert_eq!(MemoryGovernor::advise_batch_size(Pressure::Normal, 10), 10);
        assert_eq!(MemoryGovernor::advise_batch_size(Pressure::Unknown, 10), 10);
    }

    #[test]
    fn sample_without_a_configured_limit_never_reports_high_pressure() {
        let mut governor = MemoryGovernor::new(None);
        let pressure = governor.sample();
        assert_ne!(pressure, Pressure::High);
        assert_eq!(governor.history().len(), 1);
    }

    #[test]
    fn forced_ceiling_reports_high_pressure() {
        // A zero-GiB limit guarantees usage_ratio saturates above the
        // threshold on any platform where sampling succeeds.
        let mut governor = MemoryGovernor::new(Some(0.0));
        let pressure = governor.sample();
        assert!(matches!(pressure, Pressure::High | Pressure::Unknown));
    }

    #[test]
    fn history_is_bounded_to_the_documented_limit() {
        let mut governor = MemoryGovernor::new(None);
        for _ in 0..(HISTORY_LIMIT + 10) {
            governor.sample();
        }
        assert_eq!(governor.history().len(), HISTORY_LIMIT);
    }

    #[test]
    fn batch_completed_signals_cleanup_on_the_configured_cadence() {
        let mut governor = MemoryGovernor::new(None).cleanup_interval(3);
        assert!(!governor.batch_completed());
        assert!(!governor.batch_completed());
        assert!(governor.batch_completed());
        assert!(!governor.batch_completed());
    }
}
