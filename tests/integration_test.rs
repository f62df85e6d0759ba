//! End-to-end CLI tests for credentialforge.
//!
//! Drives the compiled binary directly via `assert_cmd`, exercising the
//! same surface a real caller scripts against: generate, validate, and
//! the pattern-database subcommands.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cf() -> Command {
    Command::cargo_bin("credentialforge").expect("binary should build")
}

fn write_sample_db(path: &std::path::Path) {
    fs::write(
        path,
        r#"{"credentials": [
            {"type": "api_key", "regex": "^[A-Za-z0-9]{32}$", "description": "Generic API key"},
            {"type": "aws_access_key_id", "regex": "^AKIA[0-9A-Z]{16}$", "description": "AWS access key id"}
        ]}"#,
    )
    .expect("write sample db");
}

#[test]
fn generate_writes_requested_files_and_reports_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);
    let out_dir = dir.path().join("out");

    cf()
        .arg("generate")
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--num-files")
        .arg("3")
        .arg("--formats")
        .arg("eml")
        .arg("--credential-types")
        .arg("api_key")
        .arg("--regex-db")
        .arg(&regex_db)
        .arg("--topics")
        .arg("quarterly invoice")
        .arg("--seed")
        .arg("42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 file(s)"));

    let written: Vec<_> = fs::read_dir(&out_dir).expect("out dir exists").collect();
    assert_eq!(written.len(), 3);
}

#[test]
fn generate_rejects_unknown_credential_type_with_nonzero_exit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);

    cf()
        .arg("generate")
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--num-files")
        .arg("1")
        .arg("--formats")
        .arg("eml")
        .arg("--credential-types")
        .arg("does_not_exist")
        .arg("--regex-db")
        .arg(&regex_db)
        .arg("--topics")
        .arg("anything")
        .assert()
        .failure();
}

#[test]
fn generate_json_output_round_trips_through_serde() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);

    let output = cf()
        .arg("--format")
        .arg("json")
        .arg("generate")
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--num-files")
        .arg("1")
        .arg("--formats")
        .arg("eml")
        .arg("--credential-types")
        .arg("api_key")
        .arg("--regex-db")
        .arg(&regex_db)
        .arg("--topics")
        .arg("onboarding packet")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(parsed["files_generated"], 1);
}

#[test]
fn validate_flags_an_embedded_conformant_credential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);
    let doc = dir.path().join("doc.txt");
    fs::write(&doc, "x-api-key: ABCDEFGHIJ0123456789ABCDEFGHIJ01\n").expect("write doc");

    cf()
        .arg("validate")
        .arg("--file")
        .arg(&doc)
        .arg("--regex-db")
        .arg(&regex_db)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn db_add_list_search_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");

    cf()
        .args([
            "db",
            "add",
            "--regex-db",
            regex_db.to_str().unwrap(),
            "--type",
            "internal_ticket_id",
            "--regex",
            "^TICK-[0-9]{6}$",
            "--description",
            "Internal ticketing system identifier",
        ])
        .assert()
        .success();

    cf()
        .args(["db", "list", "--regex-db", regex_db.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("internal_ticket_id"));

    cf()
        .args(["db", "search", "--regex-db", regex_db.to_str().unwrap(), "--query", "ticket"])
        .assert()
        .success()
        .stdout(predicate::str::contains("internal_ticket_id"));
}

#[test]
fn db_export_writes_csv_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);
    let export_path = dir.path().join("patterns.csv");

    cf()
        .args([
            "db",
            "export",
            "--regex-db",
            regex_db.to_str().unwrap(),
            "--output",
            export_path.to_str().unwrap(),
            "--format",
            "csv",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&export_path).expect("csv written");
    assert!(contents.contains("aws_access_key_id"));
}

#[test]
fn generate_is_reproducible_under_a_fixed_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let regex_db = dir.path().join("patterns.json");
    write_sample_db(&regex_db);

    let run = |out_dir: &std::path::Path| {
        cf()
            .arg("generate")
            .arg("--output-dir")
            .arg(out_dir)
            .arg("--num-files")
            .arg("2")
            .arg("--formats")
            .arg("eml")
            .arg("--credential-types")
            .arg("api_key,aws_access_key_id")
            .arg("--regex-db")
            .arg(&regex_db)
            .arg("--topics")
            .arg("incident report")
            .arg("--seed")
            .arg("7")
            .assert()
            .success();
        let mut names: Vec<_> = fs::read_dir(out_dir)
            .expect("out dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        names.sort();
        names
    };

    let first = run(&dir.path().join("a"));
    let second = run(&dir.path().join("b"));
    assert_eq!(first, second);
}
