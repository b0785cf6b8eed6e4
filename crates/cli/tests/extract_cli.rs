use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn repochunk() -> Command {
    Command::cargo_bin("repochunk").expect("binary")
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/a.ts"),
        "function foo(){}\nfunction bar(){ foo(); }\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Demo\n").unwrap();
    temp
}

fn records(stdout: &[u8]) -> Vec<Value> {
    let body: Value = serde_json::from_slice(stdout).expect("valid json");
    body.as_array().expect("array").clone()
}

fn chunks(records: &[Value]) -> Vec<&Value> {
    records.iter().filter(|r| r["record"] == "chunk").collect()
}

#[test]
fn extract_prints_chunk_records() {
    let repo = setup_repo();
    let output = repochunk()
        .arg("--quiet")
        .arg("extract")
        .arg(repo.path())
        .output()
        .expect("command run");
    assert!(output.status.success());

    let records = records(&output.stdout);
    let chunks = chunks(&records);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["type"], "function_declaration");
    assert_eq!(chunks[0]["filePath"], "src/a.ts");
    assert_eq!(chunks[0]["startLine"], 1);
    assert_eq!(chunks[0]["relationships"]["calledBy"][0], "function_declaration@2-2");
    assert_eq!(chunks[1]["calls"][0], "foo");
    assert!(chunks[0]["fileContext"]["imports"].is_array());
}

#[test]
fn extract_writes_output_and_report() {
    let repo = setup_repo();
    let out = repo.path().join("chunks.json");
    let report = repo.path().join("report.md");

    repochunk()
        .args(["--quiet", "extract"])
        .arg(repo.path())
        .arg("--output")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .args(["--context", "off", "--pretty"])
        .assert()
        .success();

    let records = records(&fs::read(&out).unwrap());
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["record"] == "chunk"));

    let md = fs::read_to_string(&report).unwrap();
    assert!(md.contains("# Repochunk extraction report"));
    assert!(md.contains("`1` chunked"));
}

#[test]
fn extract_reads_repochunk_toml() {
    let repo = setup_repo();
    fs::write(
        repo.path().join("repochunk.toml"),
        "[chunker]\ncontext_chunks = \"off\"\nchunk_kinds = [\"class_declaration\"]\n",
    )
    .unwrap();

    let output = repochunk()
        .args(["--quiet", "extract"])
        .arg(repo.path())
        .output()
        .expect("command run");
    assert!(output.status.success());
    assert!(records(&output.stdout).is_empty());
}

#[test]
fn strict_mode_fails_on_bad_files() {
    let repo = setup_repo();
    fs::write(repo.path().join("src/bad.js"), [0xff, 0xfe, 0x00]).unwrap();

    repochunk()
        .args(["--quiet", "extract"])
        .arg(repo.path())
        .assert()
        .success();

    repochunk()
        .args(["--quiet", "extract"])
        .arg(repo.path())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to chunk"));
}

#[test]
fn file_command_chunks_single_file() {
    let repo = setup_repo();
    let output = repochunk()
        .current_dir(repo.path())
        .args(["--quiet", "file", "src/a.ts", "--context", "chunks-only"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let records = records(&output.stdout);
    assert_eq!(chunks(&records).len(), 2);
    assert_eq!(records[0]["filePath"], "src/a.ts");
}

#[test]
fn file_command_rejects_unsupported_extension() {
    let repo = setup_repo();
    repochunk()
        .args(["--quiet", "file"])
        .arg(repo.path().join("README.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported language"));
}

#[test]
fn missing_root_fails() {
    let temp = tempdir().unwrap();
    repochunk()
        .args(["--quiet", "extract"])
        .arg(Path::new(temp.path()).join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project path"));
}

#[test]
fn config_command_prints_defaults() {
    let output = repochunk().arg("config").output().expect("command run");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("[chunker]"));
    assert!(text.contains("link_scope = \"file\""));
}
