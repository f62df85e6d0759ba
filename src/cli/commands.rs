//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_db_list, format_db_search, format_run_result, format_validation,
};
use crate::cli::parser::{Cli, Commands, DbCommands, parse_embed_strategy};
use crate::config;
use crate::core::Request;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::pattern_db::PatternDatabase;
use std::path::Path;

/// Executes the CLI command.
///
/// Returns the formatted output and whether the caller should treat the
/// run as a failure despite no hard error, per §7's "exit code reflects
/// whether any job completed" rule: a `generate` run that validated
/// successfully but produced zero files sets this `true`.
///
/// # Errors
///
/// Returns an error if the command fails outright (a
/// [`crate::error::ValidationError`] or
/// [`crate::error::DatabaseError`], per §7's propagation policy).
pub fn execute(cli: &Cli) -> Result<(String, bool)> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Generate {
            output_dir,
            num_files,
            formats,
            credential_types,
            regex_db,
            topics,
            language,
            embed_strategy,
            batch_size,
            seed,
            llm_model,
            min_credentials_per_file,
            max_credentials_per_file,
            max_workers,
            memory_limit_gib,
            process_isolation,
            neural_content,
            neural_credentials,
        } => cmd_generate(
            output_dir.as_ref(),
            *num_files,
            formats,
            credential_types,
            regex_db,
            topics,
            language,
            embed_strategy,
            *batch_size,
            *seed,
            *min_credentials_per_file,
            *max_credentials_per_file,
            *max_workers,
            *memory_limit_gib,
            *process_isolation,
            *neural_content,
            *neural_credentials,
            llm_model.clone(),
            format,
        ),
        Commands::Validate { file, regex_db } => cmd_validate(file, regex_db, format).map(|s| (s, false)),
        Commands::Db(db_command) => execute_db(db_command, format).map(|s| (s, false)),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    output_dir: Option<&std::path::PathBuf>,
    num_files: usize,
    formats: &[String],
    credential_types: &[String],
    regex_db: &Path,
    topics: &[String],
    language: &[String],
    embed_strategy: &str,
    batch_size: usize,
    seed: Option<u64>,
    min_credentials_per_file: usize,
    max_credentials_per_file: usize,
    max_workers: Option<usize>,
    memory_limit_gib: Option<f64>,
    use_process_isolation: bool,
    use_neural_content: bool,
    use_neural_credentials: bool,
    llm_model: Option<String>,
    format: OutputFormat,
) -> Result<(String, bool)> {
    let patterns = PatternDatabase::load(regex_db)?;
    let resolved_output_dir = config::output_dir(output_dir);

    let mut builder = Request::builder(resolved_output_dir)
        .num_files(num_files)
        .batch_size(batch_size)
        .formats(formats.to_vec())
        .credential_types(credential_types.to_vec())
        .topics(topics.to_vec())
        .embed_strategy(parse_embed_strategy(embed_strategy))
        .credentials_per_file(min_credentials_per_file, max_credentials_per_file)
        .use_neural_content(use_neural_content)
        .use_neural_credentials(use_neural_credentials)
        .use_process_isolation(use_process_isolation);

    if !language.is_empty() {
        builder = builder.languages(language.to_vec());
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    if let Some(n) = max_workers {
        builder = builder.max_workers(n);
    }
    if let Some(gib) = memory_limit_gib {
        builder = builder.memory_limit_gib(gib);
    }

    let request = builder.build()?;
    let mut orchestrator = Orchestrator::new(patterns);
    if use_neural_content || use_neural_credentials {
        if let Some(creds) = config::neural_credentials() {
            orchestrator = orchestrator.with_neural_endpoint(creds.endpoint, creds.api_key, llm_model);
        }
    }
    let result = orchestrator.run(&request)?;
    let failed = result.files.is_empty() && request.num_files > 0;
    Ok((format_run_result(&result, format), failed))
}

fn cmd_validate(file: &Path, regex_db: &Path, format: OutputFormat) -> Result<String> {
    let patterns = PatternDatabase::load(regex_db)?;
    let content = std::fs::read_to_string(file).unwrap_or_else(|_| {
        String::from_utf8_lossy(&std::fs::read(file).unwrap_or_default()).into_owned()
    });

    let mut matches = Vec::new();
    for entry in patterns.list_types() {
        if let Ok(re) = regex::Regex::new(&entry.regex) {
            for candidate in re.find_iter(&content) {
                let valid = patterns.validate(candidate.as_str(), &entry.type_name).unwrap_or(false);
                matches.push((entry.type_name.clone(), candidate.as_str().to_string(), valid));
            }
        }
    }

    Ok(format_validation(&matches, format))
}

fn execute_db(command: &DbCommands, format: OutputFormat) -> Result<String> {
    match command {
        DbCommands::Add { regex_db, r#type, regex, description, generator, examples } => {
            cmd_db_add(regex_db, r#type, regex, description, generator.clone(), examples.clone())
        }
        DbCommands::List { regex_db } => cmd_db_list(regex_db, format),
        DbCommands::Search { regex_db, query } => cmd_db_search(regex_db, query, format),
        DbCommands::Export { regex_db, output, format: export_format } => {
            cmd_db_export(regex_db, output, export_format)
        }
    }
}

fn cmd_db_add(
    regex_db: &Path,
    type_name: &str,
    regex: &str,
    description: &str,
    generator: Option<String>,
    examples: Vec<String>,
) -> Result<String> {
    let mut db = load_or_new(regex_db)?;
    db.add(type_name, regex, description, generator, examples)?;
    db.save(regex_db)?;
    Ok(format!("Added credential type '{type_name}'\n"))
}

fn cmd_db_list(regex_db: &Path, format: OutputFormat) -> Result<String> {
    let db = PatternDatabase::load(regex_db)?;
    Ok(format_db_list(&db.statistics(), format))
}

fn cmd_db_search(regex_db: &Path, query: &str, format: OutputFormat) -> Result<String> {
    let db = PatternDatabase::load(regex_db)?;
    Ok(format_db_search(&db.search(query), format))
}

fn cmd_db_export(regex_db: &Path, output: &Path, format: &str) -> Result<String> {
    let db = PatternDatabase::load(regex_db)?;
    db.export(output, format)?;
    Ok(format!("Exported database to {}\n", output.display()))
}

fn load_or_new(regex_db: &Path) -> Result<PatternDatabase> {
    if regex_db.exists() {
        PatternDatabase::load(regex_db)
    } else {
        Ok(PatternDatabase::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db_path(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("patterns.json");
        std::fs::write(
            &path,
            r#"{"credentials": [{"type": "api_key", "regex": "^[A-Za-z0-9]{32}$", "description": "API Key"}]}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn generate_writes_requested_number_of_files() {
        let dir = tempfile::tempdir().unwrap();
        let regex_db = sample_db_path(dir.path());
        let out_dir = dir.path().join("out");
        let (output, failed) = cmd_generate(
            Some(&out_dir),
            2,
            &["eml".to_string()],
            &["api_key".to_string()],
            &regex_db,
            &["database migration".to_string()],
            &[],
            "random",
            10,
            Some(1),
            1,
            1,
            None,
            None,
            false,
            false,
            false,
            None,
            OutputFormat::Text,
        )
        .unwrap();
        assert!(output.contains("Generated"));
        assert!(!failed);
    }

    #[test]
    fn db_add_then_list_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let regex_db = dir.path().join("patterns.json");
        cmd_db_add(&regex_db, "custom", "^[0-9]{6}$", "six digits", None, vec![]).unwrap();
        let listing = cmd_db_list(&regex_db, OutputFormat::Text).unwrap();
        assert!(listing.contains("custom"));
    }

    #[test]
    fn validate_flags_a_conformant_embedded_credential() {
        let dir = tempfile::tempdir().unwrap();
        let regex_db = sample_db_path(dir.path());
        let file = dir.path().join("doc.txt");
        std::fs::write(&file, "API key: ABCDEFGHIJ0123456789ABCDEFGHIJ01").unwrap();
        let output = cmd_validate(&file, &regex_db, OutputFormat::Text).unwrap();
        assert!(output.contains("valid"));
    }
}
