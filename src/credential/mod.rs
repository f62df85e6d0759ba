//! The credential factory: generates decoy credential values that satisfy
//! the pattern database's declared regex for each requested type.
//!
//! Grounded in
//! `examples/original_source/credentialforge/generators/credential_generator.py`'s
//! `CredentialGenerator`. The ~70-arm static dispatch table lives in
//! [`generators`]; the regex-driven fallback for types outside that table
//! lives in [`pattern_fallback`].

mod generators;
mod pattern_fallback;

use crate::core::Credential;
use crate::error::{GenerationError, Result};
use crate::pattern_db::PatternDatabase;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Maximum same-process collision-retry attempts before reseeding, per
/// `CredentialGenerator.generate_credential`'s `max_attempts = 10`.
const MAX_COLLISION_ATTEMPTS: u32 = 10;

/// Context available to generators that vary output by surrounding
/// content (currently only the realistic JWT generator's issuer/audience
/// domain).
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Company name the produced document is attributed to, used to
    /// derive a plausible issuer/audience domain.
    pub company: String,
}

/// Running generation counters, matching
/// `CredentialGenerator.get_generation_stats`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GenerationStats {
    /// Total successful generations.
    pub total_generated: u64,
    /// Count of collisions that required a retry.
    pub collisions: u64,
    /// Count of retries that required reseeding the RNG.
    pub reseeds: u64,
}

/// Produces pattern-conformant, process-unique decoy credentials.
///
/// Uniqueness is enforced process-wide (not just within one file), mirroring
/// the Python original's single shared `generated_credentials` set.
///
/// Holds its pattern database behind an `Arc` rather than a borrow so one
/// factory instance can be shared (via `Arc<CredentialFactory>`) across
/// the worker pool's detached per-job threads, per §4.2/§5's
/// "process-wide, protected by a mutex" uniqueness-set policy.
pub struct CredentialFactory {
    patterns: Arc<PatternDatabase>,
    generated: Mutex<HashSet<String>>,
    stats: Mutex<GenerationStats>,
}

impl CredentialFactory {
    /// Constructs a factory backed by `patterns`.
    #[must_use]
    pub fn new(patterns: Arc<PatternDatabase>) -> Self {
        Self {
            patterns,
            generated: Mutex::new(HashSet::new()),
            stats: Mutex::new(GenerationStats::default()),
        }
    }

    /// Generates one credential of `type_name`.
    ///
    /// Tries up to [`MAX_COLLISION_ATTEMPTS`] times against the process-wide
    /// uniqueness set; on exhaustion, reseeds `rng` from a microsecond-
    /// precision clock sample and makes one final attempt, matching
    /// `generate_credential`'s reseed-and-retry-once behavior. Never
    /// appends a disambiguating suffix, since that would break the
    /// declared regex.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UniquenessExhausted`] if the final
    /// reseeded attempt still collides, or if `type_name` has no pattern
    /// database entry or a value could not be validated against it.
    pub fn generate(
        &self,
        rng: &mut StdRng,
        type_name: &str,
        context: Option<&GenerationContext>,
    ) -> Result<Credential> {
        let entry = self.patterns.lookup(type_name)?;
        let label = entry.description.clone();

        for _ in 0..MAX_COLLISION_ATTEMPTS {
            let value = self.generate_fast_or_fallback(rng, type_name, &entry.regex, context)?;
            if self.try_claim(&value) {
                self.record_success();
                return Ok(Credential::new(type_name, value, label));
            }
            self.record_collision();
        }

        let reseed = micros_seed();
        *rng = StdRng::seed_from_u64(reseed);
        self.record_reseed();
        let value = self.generate_fast_or_fallback(rng, type_name, &entry.regex, context)?;
        if self.try_claim(&value) {
            self.record_success();
            return Ok(Credential::new(type_name, value, label));
        }

        Err(GenerationError::UniquenessExhausted {
            type_name: type_name.to_string(),
            attempts: MAX_COLLISION_ATTEMPTS + 1,
        }
        .into())
    }

    /// Generates `count` credentials for each entry of `type_names`,
    /// skipping (not aborting on) per-item failures, matching
    /// `generate_batch`'s nested-loop, best-effort semantics: one list per
    /// type, each up to `count` entries long.
    pub fn generate_batch(
        &self,
        rng: &mut StdRng,
        type_names: &[String],
        count: usize,
        context: Option<&GenerationContext>,
    ) -> std::collections::HashMap<String, Vec<Credential>> {
        let mut out = std::collections::HashMap::with_capacity(type_names.len());
        for type_name in type_names {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                if let Ok(credential) = self.generate(rng, type_name, context) {
                    values.push(credential);
                }
            }
            out.insert(type_name.clone(), values);
        }
        out
    }

    /// Re-validates a previously generated value against its declared
    /// regex, matching `validate_credential`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DatabaseError::TypeNotFound`] if
    /// `type_name` is unregistered.
    pub fn validate(&self, value: &str, type_name: &str) -> Result<bool> {
        self.patterns.validate(value, type_name)
    }

    /// Returns a snapshot of running generation counters.
    #[must_use]
    pub fn stats(&self) -> GenerationStats {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Clears the process-wide uniqueness set, matching
    /// `clear_generated_credentials`. Does not reset [`GenerationStats`].
    pub fn clear_generated(&self) {
        self.generated.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }

    fn generate_fast_or_fallback(
        &self,
        rng: &mut StdRng,
        type_name: &str,
        regex: &str,
        context: Option<&GenerationContext>,
    ) -> Result<String> {
        let value = generators::generate_fast(rng, type_name, context)
            .unwrap_or_else(|| pattern_fallback::generate_from_pattern(rng, regex));
        if !self.patterns.validate(&value, type_name)? {
            return Err(GenerationError::FailedValidation {
                type_name: type_name.to_string(),
            }
            .into());
        }
        Ok(value)
    }

    fn try_claim(&self, value: &str) -> bool {
        self.generated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(value.to_string())
    }

    fn record_success(&self) {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).total_generated += 1;
    }

    fn record_collision(&self) {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).collisions += 1;
    }

    fn record_reseed(&self) {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).reseeds += 1;
    }
}

fn micros_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

use rand::SeedableRng;
