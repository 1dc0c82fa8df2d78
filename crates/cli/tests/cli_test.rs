//! # Command-Line Tests
//!
//! Runs the `pdfqa` binary for the commands that do not need the answer service.

use assert_cmd::Command;
use pdfqa_test_utils::helpers::PdfFixture;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SERVICE_VARS: [&str; 5] = [
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_DEPLOYMENT",
    "AZURE_OPENAI_API_VERSION",
    "AZURE_OPENAI_TIMEOUT_SECS",
];

fn pdfqa(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pdfqa").unwrap();
    cmd.current_dir(dir.path());
    for var in SERVICE_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_tables_lists_detected_tables() {
    let dir = TempDir::new().unwrap();
    let pdf_data = PdfFixture::new()
        .table_page(&[&["Region", "Units"], &["North", "120"]])
        .build().unwrap();
    fs::write(dir.path().join("report.pdf"), pdf_data).unwrap();

    pdfqa(&dir)
        .args(["tables", "report.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 table(s):"))
        .stdout(predicate::str::contains("columns: Region, Units"))
        .stdout(predicate::str::contains("North"));
}

#[test]
fn test_tables_as_json() {
    let dir = TempDir::new().unwrap();
    let pdf_data = PdfFixture::new()
        .table_page(&[&["A", "B"], &["1", "2"]])
        .build().unwrap();
    fs::write(dir.path().join("grid.pdf"), pdf_data).unwrap();

    let output = pdfqa(&dir)
        .args(["tables", "grid.pdf", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let tables: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tables[0]["columns"], serde_json::json!(["A", "B"]));
    assert_eq!(tables[0]["rows"][0]["A"], "1");
    assert_eq!(tables[0]["rows"][0]["B"], "2");
}

#[test]
fn test_tables_reports_when_none_found() {
    let dir = TempDir::new().unwrap();
    let pdf_data = PdfFixture::new().text_page(&["Just prose."]).build().unwrap();
    fs::write(dir.path().join("prose.pdf"), pdf_data).unwrap();

    pdfqa(&dir)
        .args(["tables", "prose.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tables found in the document"));
}

#[test]
fn test_non_pdf_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    pdfqa(&dir)
        .args(["text", "notes.txt", "--question", "What?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only PDF files are supported"));
}

#[test]
fn test_malformed_pdf_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.pdf"), "not really a pdf").unwrap();

    pdfqa(&dir)
        .args(["tables", "broken.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse PDF content"));
}

#[test]
fn test_missing_configuration_is_reported() {
    let dir = TempDir::new().unwrap();
    let pdf_data = PdfFixture::new().text_page(&["Content"]).build().unwrap();
    fs::write(dir.path().join("doc.pdf"), pdf_data).unwrap();

    pdfqa(&dir)
        .args(["text", "doc.pdf", "--question", "What?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AZURE_OPENAI_ENDPOINT"));
}
