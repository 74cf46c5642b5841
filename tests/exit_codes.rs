//! Tests for process exit codes of the binary.

use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_mongo_pipeline"))
        .args(args)
        .output()
        .expect("Failed to run binary")
}

#[test]
fn test_version_and_help_exit_zero() {
    assert_eq!(run(&["--version"]).status.code(), Some(0));
    assert_eq!(run(&["--help"]).status.code(), Some(0));
    assert_eq!(run(&["extract-batch", "--help"]).status.code(), Some(0));
}

#[test]
fn test_help_goes_to_stdout_and_usage_errors_to_stderr() {
    let help = run(&["--help"]);
    let stdout = String::from_utf8_lossy(&help.stdout);
    assert!(stdout.contains("extract-batch"));
    assert!(help.stderr.is_empty());

    let version = run(&["--version"]);
    assert!(String::from_utf8_lossy(&version.stdout).contains(env!("CARGO_PKG_VERSION")));

    let usage = run(&["ping"]);
    assert_eq!(usage.status.code(), Some(1));
    assert!(usage.stdout.is_empty());
    assert!(String::from_utf8_lossy(&usage.stderr).contains("--conn-uri"));
}

#[test]
fn test_missing_subcommand_exits_one() {
    assert_eq!(run(&[]).status.code(), Some(1));
}

#[test]
fn test_missing_required_flag_exits_one() {
    let output = run(&["extract", "-c", "mongodb://localhost", "--collection", "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_invalid_option_value_exits_one_before_connecting() {
    let output = run(&[
        "extract-batch",
        "-c",
        "mongodb://127.0.0.1:1",
        "-d",
        "db",
        "-a",
        "app",
        "--collection",
        "people",
        "-n",
        "0",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("worker count"), "stderr: {stderr}");
}

#[test]
fn test_invalid_query_exits_one() {
    let output = run(&[
        "extract",
        "-c",
        "mongodb://127.0.0.1:1",
        "-d",
        "db",
        "-a",
        "app",
        "--collection",
        "people",
        "-q",
        "{not json",
    ]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_ping_with_invalid_uri_exits_one() {
    let output = run(&["ping", "-c", "definitely-not-a-uri"]);
    assert_eq!(output.status.code(), Some(1));
}
