//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::EmbedStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// credentialforge: synthetic business-document generator that embeds
/// regex-conformant decoy credentials for DLP and detector benchmarking.
#[derive(Parser, Debug)]
#[command(name = "credentialforge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug-level) logging to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a batch of synthetic documents.
    Generate {
        /// Directory written artifacts are placed in.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of files to produce.
        #[arg(long, default_value = "1")]
        num_files: usize,

        /// Comma-separated list of output formats.
        #[arg(long, value_delimiter = ',')]
        formats: Vec<String>,

        /// Comma-separated list of credential type identifiers.
        #[arg(long, value_delimiter = ',')]
        credential_types: Vec<String>,

        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,

        /// Comma-separated list of free-text topics.
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,

        /// Comma-separated list of candidate language codes.
        #[arg(long, value_delimiter = ',')]
        language: Vec<String>,

        /// Where credentials are embedded: random, metadata, or body.
        #[arg(long, default_value = "random")]
        embed_strategy: String,

        /// Jobs per batch before re-evaluating memory pressure.
        #[arg(long, default_value = "50")]
        batch_size: usize,

        /// Seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Neural content-generation model endpoint name (advisory; the
        /// `neural` feature must be compiled in for it to take effect).
        #[arg(long)]
        llm_model: Option<String>,

        /// Minimum credentials per file.
        #[arg(long, default_value = "1")]
        min_credentials_per_file: usize,

        /// Maximum credentials per file.
        #[arg(long, default_value = "1")]
        max_credentials_per_file: usize,

        /// Override the computed worker count.
        #[arg(long)]
        max_workers: Option<usize>,

        /// Soft resident-memory ceiling hint, in GiB.
        #[arg(long)]
        memory_limit_gib: Option<f64>,

        /// Prefer process isolation for heavy neural backends (recorded
        /// only; see SPEC_FULL.md Open Question OQ-1).
        #[arg(long)]
        process_isolation: bool,

        /// Attempt neural content generation.
        #[arg(long)]
        neural_content: bool,

        /// Attempt neural credential generation.
        #[arg(long)]
        neural_credentials: bool,
    },

    /// Validate a previously generated file's embedded credentials
    /// against the pattern database.
    Validate {
        /// Path to the file to validate.
        #[arg(long)]
        file: PathBuf,

        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,
    },

    /// Manage the pattern database.
    #[command(subcommand)]
    Db(DbCommands),
}

/// Pattern-database subcommands.
#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Add a credential type to the database.
    Add {
        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,

        /// Unique type identifier.
        #[arg(long)]
        r#type: String,

        /// Anchored regex pattern.
        #[arg(long)]
        regex: String,

        /// Human-readable description.
        #[arg(long)]
        description: String,

        /// Advisory generator hint.
        #[arg(long)]
        generator: Option<String>,

        /// Comma-separated example values.
        #[arg(long, value_delimiter = ',')]
        examples: Vec<String>,
    },

    /// List every registered credential type.
    List {
        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,
    },

    /// Search credential types by substring match.
    Search {
        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,

        /// Query substring, matched case-insensitively against type or
        /// description.
        #[arg(long)]
        query: String,
    },

    /// Export the database to a file in an alternate format.
    Export {
        /// Path to the pattern database JSON file.
        #[arg(long)]
        regex_db: PathBuf,

        /// Destination path.
        #[arg(long)]
        output: PathBuf,

        /// Export format: json, csv, or yaml.
        #[arg(long, default_value = "json")]
        format: String,
    },
}

/// Parses a CLI-supplied embed-strategy string, defaulting to `Random`
/// on an unrecognized value rather than failing the command.
#[must_use]
pub fn parse_embed_strategy(s: &str) -> EmbedStrategy {
    match s.to_lowercase().as_str() {
        "metadata" => EmbedStrategy::Metadata,
        "body" => EmbedStrategy::Body,
        _ => EmbedStrategy::Random,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_embed_strategy_recognizes_each_variant() {
        assert_eq!(parse_embed_strategy("metadata"), EmbedStrategy::Metadata);
        assert_eq!(parse_embed_strategy("body"), EmbedStrategy::Body);
        assert_eq!(parse_embed_strategy("random"), EmbedStrategy::Random);
        assert_eq!(parse_embed_strategy("nonsense"), EmbedStrategy::Random);
    }
}
