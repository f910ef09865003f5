use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "Invoice #: INV-2024-001\n\
                       Widget   2   $10.00   $20.00\n\
                       Total: $20.00";

fn docsift(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

/// Temp dir holding an empty config file and a sample invoice.
fn workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    let input = dir.path().join("Invoice 42.txt");
    fs::write(&input, INVOICE).unwrap();
    (dir, config, input)
}

fn only_file_in(dir: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one artifact, found {:?}", entries);
    entries.into_iter().next().unwrap()
}

#[test]
fn test_extract_prints_json() {
    let (_dir, config, input) = workspace();

    let output = docsift(&config).arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["structuredData"]["invoiceNumber"], "INV-2024-001");
    assert_eq!(json["structuredData"]["total"], "20.00");
    assert_eq!(json["entities"][0]["type"], "invoiceNumber");
    assert_eq!(json["tables"][0]["rows"][0][0], "Widget");
    assert_eq!(json["rawText"], INVOICE);
}

#[test]
fn test_extract_writes_output_file() {
    let (dir, config, input) = workspace();
    let out = dir.path().join("result.json");

    docsift(&config)
        .args(["extract", "--pretty", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(json["structuredData"]["invoiceNumber"], "INV-2024-001");
}

#[test]
fn test_extract_missing_input_fails() {
    let (dir, config, _input) = workspace();

    docsift(&config)
        .arg("extract")
        .arg(dir.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("document not found"));
}

#[test]
fn test_export_delimited_artifact() {
    let (dir, config, input) = workspace();
    let out_dir = dir.path().join("exports");

    docsift(&config)
        .args(["export", "-f", "delimited", "-d"])
        .arg(&out_dir)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("export written to"));

    let artifact = only_file_in(&out_dir);
    let name = artifact.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("invoice_42_"));
    assert!(name.ends_with(".csv"));

    let content = fs::read_to_string(&artifact).unwrap();
    assert!(content.starts_with("# DOCSIFT EXTRACTION DATA\n"));
    assert!(content.contains("# Filename: Invoice 42.txt\n"));
    assert!(content.contains("\"invoiceNumber\",\"INV-2024-001\""));
}

#[test]
fn test_export_spreadsheet_by_default() {
    let (dir, config, input) = workspace();
    let out_dir = dir.path().join("xlsx");

    docsift(&config)
        .args(["export", "-d"])
        .arg(&out_dir)
        .arg(&input)
        .assert()
        .success();

    let artifact = only_file_in(&out_dir);
    assert_eq!(artifact.extension().unwrap(), "xlsx");
    assert!(fs::read(&artifact).unwrap().starts_with(b"PK"));
}

#[test]
fn test_export_edited_payload_as_text() {
    let (dir, config, input) = workspace();
    let out_dir = dir.path().join("text");
    let payload = dir.path().join("payload.json");
    fs::write(
        &payload,
        r#"{
            "rawText": "Corrected text",
            "structuredData": {"total": "99.00"},
            "metadata": {"isEdited": true, "editedAt": "2024-03-01T10:00:00Z"}
        }"#,
    )
    .unwrap();

    docsift(&config)
        .args(["export", "-f", "plain-text", "-d"])
        .arg(&out_dir)
        .arg("--payload")
        .arg(&payload)
        .arg(&input)
        .assert()
        .success();

    let content = fs::read_to_string(only_file_in(&out_dir)).unwrap();
    assert!(content.contains("Status: EDITED BY USER\n"));
    assert!(content.contains("Edited At: 2024-03-01T10:00:00.000Z\n"));
    assert!(content.contains("Corrected text\n\n"));
    assert!(content.contains("TOTAL                : 99.00\n"));
    assert!(!content.contains("INV-2024-001"));
}

#[test]
fn test_export_uses_configured_format_and_directory() {
    let (dir, config, input) = workspace();
    let out_dir = dir.path().join("configured");

    docsift(&config)
        .args(["config", "set", "export.default_format", "plain-text"])
        .assert()
        .success();
    docsift(&config)
        .args(["config", "set", "export.output_dir"])
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    docsift(&config).arg("export").arg(&input).assert().success();

    assert_eq!(only_file_in(&out_dir).extension().unwrap(), "txt");
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");

    docsift(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(config.exists());

    docsift(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    docsift(&config)
        .args(["config", "get", "extraction.row_alignment"])
        .assert()
        .success()
        .stdout("\"ragged\"\n");

    docsift(&config)
        .args(["config", "set", "extraction.row_alignment", "pad"])
        .assert()
        .success();

    docsift(&config)
        .args(["config", "get", "extraction.row_alignment"])
        .assert()
        .success()
        .stdout("\"pad\"\n");

    docsift(&config)
        .args(["config", "get", "source.max_file_size"])
        .assert()
        .success()
        .stdout("10485760\n");
}

#[test]
fn test_config_rejects_unknown_keys_and_bad_values() {
    let (_dir, config, _input) = workspace();

    docsift(&config)
        .args(["config", "set", "export.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    docsift(&config)
        .args(["config", "set", "export.default_format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_path_reports_status() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.json");

    docsift(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"))
        .stdout(predicate::str::contains("docsift config init"));
}
