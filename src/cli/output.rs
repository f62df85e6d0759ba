//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use crate::orchestrator::RunResult;
use crate::pattern_db::DatabaseStatistics;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string, defaulting to text on an unrecognized
    /// value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a [`RunResult`] summary, per §6/§7's "user-visible failure"
/// reporting contract.
#[must_use]
pub fn format_run_result(result: &RunResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_run_result_text(result),
        OutputFormat::Json => format_json(&RunResultJson::from(result)),
    }
}

fn format_run_result_text(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated {} file(s), {} error(s)", result.files.len(), result.errors.len());
    let _ = writeln!(out, "Total credentials embedded: {}", result.stats.total_credentials);
    let _ = writeln!(out, "Elapsed: {:.2}s", result.stats.elapsed.as_secs_f64());
    if !result.stats.files_by_format.is_empty() {
        out.push_str("By format:\n");
        for (format, count) in &result.stats.files_by_format {
            let _ = writeln!(out, "  {format}: {count}");
        }
    }
    if !result.stats.credentials_by_type.is_empty() {
        out.push_str("By credential type:\n");
        for (type_name, count) in &result.stats.credentials_by_type {
            let _ = writeln!(out, "  {type_name}: {count}");
        }
    }
    for error in &result.errors {
        let _ = writeln!(out, "  error[file {}]: {}", error.file_index, error.message);
    }
    out
}

#[derive(Serialize)]
struct RunResultJson<'a> {
    files_generated: usize,
    total_errors: usize,
    total_credentials: usize,
    elapsed_secs: f64,
    files_by_format: &'a std::collections::BTreeMap<String, usize>,
    credentials_by_type: &'a std::collections::BTreeMap<String, usize>,
    errors: Vec<RunErrorJson<'a>>,
}

#[derive(Serialize)]
struct RunErrorJson<'a> {
    file_index: usize,
    message: &'a str,
}

impl<'a> From<&'a RunResult> for RunResultJson<'a> {
    fn from(result: &'a RunResult) -> Self {
        Self {
            files_generated: result.files.len(),
            total_errors: result.errors.len(),
            total_credentials: result.stats.total_credentials,
            elapsed_secs: result.stats.elapsed.as_secs_f64(),
            files_by_format: &result.stats.files_by_format,
            credentials_by_type: &result.stats.credentials_by_type,
            errors: result
                .errors
                .iter()
                .map(|e| RunErrorJson { file_index: e.file_index, message: &e.message })
                .collect(),
        }
    }
}

/// Formats a validation result: whether every credential-like match in
/// `file` conforms to its declared pattern.
#[must_use]
pub fn format_validation(matches: &[(String, String, bool)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            if matches.is_empty() {
                return "No known credential patterns matched.\n".to_string();
            }
            for (type_name, value, valid) in matches {
                let _ = writeln!(out, "{}: {} [{}]", type_name, value, if *valid { "valid" } else { "INVALID" });
            }
            out
        }
        OutputFormat::Json => format_json(matches),
    }
}

/// Formats the pattern database's type listing.
#[must_use]
pub fn format_db_list(stats: &DatabaseStatistics, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "{} credential type(s):", stats.total_types);
            for type_name in &stats.types {
                let _ = writeln!(out, "  {type_name}");
            }
            out
        }
        OutputFormat::Json => format_json(stats),
    }
}

/// Formats a database search result.
#[must_use]
pub fn format_db_search(matches: &[&str], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if matches.is_empty() {
                return "No matching credential types.\n".to_string();
            }
            let mut out = String::new();
            for type_name in matches {
                let _ = writeln!(out, "  {type_name}");
            }
            out
        }
        OutputFormat::Json => format_json(matches),
    }
}

/// Formats a crate-level error for CLI display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&ErrorJson { error: error.to_string() }),
    }
}

#[derive(Serialize)]
struct ErrorJson {
    error: String,
}

fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ProducedFile, RunError, RunStats};

    fn sample_result() -> RunResult {
        RunResult {
            files: vec![ProducedFile {
                file_index: 0,
                path: "out.eml".into(),
                format: "eml".to_string(),
                credentials: vec![],
            }],
            errors: vec![RunError { file_index: 1, message: "boom".to_string() }],
            stats: RunStats {
                total_files: 1,
                total_credentials: 2,
                files_by_format: std::collections::BTreeMap::from([("eml".to_string(), 1)]),
                credentials_by_type: std::collections::BTreeMap::new(),
                elapsed: std::time::Duration::from_secs(1),
                memory_cleanups: 0,
                parallel_batches: 1,
                sequential_batches: 0,
            },
        }
    }

    #[test]
    fn text_output_reports_file_and_error_counts() {
        let text = format_run_result(&sample_result(), OutputFormat::Text);
        assert!(text.contains("Generated 1 file(s), 1 error(s)"));
    }

    #[test]
    fn json_output_is_valid_json() {
        let json = format_run_result(&sample_result(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["files_generated"], 1);
    }

    #[test]
    fn parse_defaults_to_text_for_unknown_format() {
        assert_eq!(OutputFormat::parse("weird"), OutputFormat::Text);
    }
}
