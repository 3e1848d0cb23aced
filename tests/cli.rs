mod support;

use crate::support::llm_case_eval;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_cli_help() {
    llm_case_eval().arg("--help").assert().success();
}

#[test]
fn test_cli_version() {
    llm_case_eval()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("llm-case-eval"));
}

#[test]
fn test_run_requires_input_and_models() {
    llm_case_eval().arg("run").assert().failure();

    llm_case_eval()
        .args(["run", "--input", "cases.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--model"));
}

#[test]
fn test_run_nonexistent_input_file() {
    let dir = tempdir().unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args([
            "run",
            "--input",
            "missing.csv",
            "--model",
            "llama3",
            "--judge-model",
            "llama3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open test case file"));
}

#[test]
fn test_run_rejects_csv_without_required_columns() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.csv"), "foo,bar\n1,2\n").unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args([
            "run",
            "--input",
            "bad.csv",
            "--model",
            "llama3",
            "--judge-model",
            "llama3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column"));
}

#[test]
fn test_run_rejects_empty_model_before_any_network_use() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("cases.csv"),
        "input,expected_output\nq,a\n",
    )
    .unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args([
            "run",
            "--input",
            "cases.csv",
            "--model",
            "",
            "--judge-model",
            "llama3",
            // Nothing listens here; the precondition must fail first.
            "--base-url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no evaluation model selected"));
}

#[test]
fn test_models_unreachable_backend() {
    let dir = tempdir().unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args(["models", "--base-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list models"));
}

#[test]
fn test_show_prints_case_table() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "id,input,expected_output,generated_output,judgment,judgment_score,error\n\
         case-1,q,a,gen,solid,8.5,\n\
         case-2,q2,a2,,,,backend unreachable\n",
    )
    .unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args(["show", "--input", "results.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("case-1"))
        .stdout(predicate::str::contains("8.5"))
        .stdout(predicate::str::contains("error: backend unreachable"));
}

#[test]
fn test_show_nonexistent_file() {
    let dir = tempdir().unwrap();

    llm_case_eval()
        .current_dir(dir.path())
        .args(["show", "--input", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open results file"));
}
