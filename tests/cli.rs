//! End-to-end checks against the compiled binary.
//!
//! Nothing here installs packages: each test either fails during
//! validation, fails on a missing tool, or uses the dry-run
//! commands (`plan`, `channels`).

use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bert-env-setup"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn run_in(dir: &TempDir, args: &[&str]) -> Output {
    bin()
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("Failed to run binary")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// =============================================================================
// Validation: exit 1 before any external command
// =============================================================================

#[test]
fn test_invalid_device_exits_1_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--device", "tpu"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("--device"), "stderr: {}", stderr(&out));
    // No venv directory was created
    assert!(!dir.path().join("venv").exists());
}

#[test]
fn test_invalid_env_kind_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["install", "--env", "poetry"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("venv, conda"));
}

#[test]
fn test_unsupported_cuda_code_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--device", "gpu", "--cuda", "118"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("102, 111, 113"));
}

#[test]
fn test_unknown_flag_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--accelerator", "gpu"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_options_before_subcommand_exit_1() {
    let dir = TempDir::new().unwrap();

    let out = run_in(&dir, &["--device", "tpu", "plan"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let out = run_in(&dir, &["--device", "gpu", "--cuda", "113", "install"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("venv").exists());
}

#[test]
fn test_help_exits_0() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--device"));
}

// =============================================================================
// Missing tool
// =============================================================================

#[test]
fn test_missing_conda_exits_1_with_hint() {
    let dir      = TempDir::new().unwrap();
    let empty    = TempDir::new().unwrap();
    let out = bin()
        .current_dir(dir.path())
        .env("PATH", empty.path())
        .args(["--env", "conda"])
        .output()
        .expect("Failed to run binary");

    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("conda was not found"), "stderr: {err}");
    assert!(err.contains("miniconda"), "stderr: {err}");
}

// =============================================================================
// Dry-run commands
// =============================================================================

#[test]
fn test_channels_json_lists_table() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["channels", "--json"]);
    assert_eq!(out.status.code(), Some(0));

    let rows: Value = serde_json::from_slice(&out.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let cu111 = rows.iter().find(|r| r["code"] == "111").unwrap();
    assert_eq!(cu111["channel"], "cu111");
    assert_eq!(cu111["label"],   "CUDA 11.1");
    assert_eq!(cu111["default"], true);
}

#[test]
fn test_plan_json_for_conda_gpu() {
    let dir = TempDir::new().unwrap();
    let out = run_in(
        &dir,
        &["plan", "--json", "--env", "conda", "--device", "gpu", "--cuda", "102", "--name", "clf"],
    );
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let plan: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(plan["options"]["env_name"], "clf");

    let commands = plan["commands"].as_array().unwrap();
    let create   = &commands[0];
    assert_eq!(create["program"], "conda");
    assert!(create["args"].as_array().unwrap().iter().any(|a| a == "python=3.8"));

    let torch = commands
        .iter()
        .find(|c| c["args"].as_array().unwrap().iter().any(|a| a == "torch==1.10.1+cu102"))
        .expect("torch install command");
    assert!(torch["args"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a == "https://download.pytorch.org/whl/cu102"));

    // Planning spawns nothing and creates nothing
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_plan_text_numbers_commands() {
    let dir    = TempDir::new().unwrap();
    let out    = run_in(&dir, &["plan"]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert_eq!(out.status.code(), Some(0));
    assert!(stdout.contains("Plan: venv environment, CPU build"));
    assert!(stdout.contains("  1. "));
    assert!(stdout.contains("-r requirements.txt"));
}

#[test]
fn test_plan_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["plan", "--device", "gpu", "--cuda", "abc"]);
    assert_eq!(out.status.code(), Some(1));
}
