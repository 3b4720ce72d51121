//! CLI integration tests for riffscope
//!
//! Runs the riffscope binary against generated files and checks its output.

use std::process::Command;
use tempfile::NamedTempFile;

#[path = "common/mod.rs"]
mod common;

use common::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Run riffscope and return its output
fn run_riffscope(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_riffscope"))
        .args(args)
        .output()
        .expect("Failed to execute riffscope")
}

/// Get stdout as string
fn stdout_string(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr_string(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// A WAV file with 32 samples named "test"
fn create_test_wav() -> NamedTempFile {
    temp_file_with(&create_wav_bytes(32, "test"))
}

fn path_str(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("Temp path is not UTF-8")
}

// ============================================================================
// Version and Help Tests
// ============================================================================

#[test]
fn test_cli_version() {
    let output = run_riffscope(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    assert!(stdout_string(&output).contains("riffscope"));
}

#[test]
fn test_cli_help() {
    let output = run_riffscope(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = stdout_string(&output);
    assert!(stdout.contains("Usage"), "Help should show usage information");
    for command in ["tree", "stream", "extract"] {
        assert!(stdout.contains(command), "Help should mention {}", command);
    }
}

#[test]
fn test_cli_requires_subcommand() {
    let output = run_riffscope(&[]);
    assert!(!output.status.success());
}

// ============================================================================
// Tree Command Tests
// ============================================================================

#[test]
fn test_cli_tree_text() {
    let wav = create_test_wav();
    let output = run_riffscope(&["tree", path_str(&wav)]);

    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let stdout = stdout_string(&output);
    assert!(stdout.contains("RIFF [WAVE]"));
    assert!(stdout.contains("fmt  (16 bytes)"));
    assert!(stdout.contains("data (64 bytes)"));
    assert!(stdout.contains("LIST [INFO]"));
    assert!(stdout.contains("INAM (4 bytes)"));
    assert!(stdout.contains("5 chunk(s)"));
}

#[test]
fn test_cli_tree_json() {
    let wav = create_test_wav();
    let output = run_riffscope(&["tree", path_str(&wav), "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let value: serde_json::Value =
        serde_json::from_str(&stdout_string(&output)).expect("Output should be JSON");
    assert_eq!(value[0]["tag"], "RIFF");
    assert_eq!(value[0]["list_type"], "WAVE");
    assert_eq!(value[0]["children"][1]["size"], 64);
}

#[test]
fn test_cli_tree_compact_json_with_logging() {
    let wav = create_test_wav();
    let output = run_riffscope(&["--debug", "tree", path_str(&wav), "--json", "--compact"]);

    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    // Logs go to stderr, so stdout stays a single JSON line
    let stdout = stdout_string(&output);
    assert_eq!(stdout.trim().lines().count(), 1);
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn test_cli_tree_missing_file() {
    let output = run_riffscope(&["tree", "/nonexistent/riffscope/missing.wav"]);

    assert!(!output.status.success());
    assert!(stderr_string(&output).contains("Failed to open"));
}

#[test]
fn test_cli_tree_garbage_file() {
    let garbage = temp_file_with(b"RIFF\xff\xff\xff\xffWAVE");
    let output = run_riffscope(&["tree", path_str(&garbage)]);

    assert!(!output.status.success());
    assert!(stderr_string(&output).contains("No readable chunks"));
}

// ============================================================================
// Stream Command Tests
// ============================================================================

#[test]
fn test_cli_stream() {
    let mut bytes = be_chunk(b"HEAD", b"abcd");
    bytes.extend(be_chunk(b"BODY", &[0u8; 10]));
    let file = temp_file_with(&bytes);

    let output = run_riffscope(&["stream", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let stdout = stdout_string(&output);
    assert!(stdout.contains("HEAD (4 bytes)"));
    assert!(stdout.contains("BODY (10 bytes)"));
}

#[test]
fn test_cli_stream_truncated() {
    let mut bytes = be_chunk(b"HEAD", b"abcd");
    bytes.extend_from_slice(b"BO");
    let file = temp_file_with(&bytes);

    let output = run_riffscope(&["stream", path_str(&file)]);
    assert!(!output.status.success());
    assert!(stderr_string(&output).contains("Truncated"));
}

// ============================================================================
// Extract Command Tests
// ============================================================================

#[test]
fn test_cli_extract_data() {
    let wav = create_test_wav();
    let out = NamedTempFile::new().expect("Failed to create temp file");

    let output = run_riffscope(&[
        "extract",
        path_str(&wav),
        "--path",
        "WAVE/data",
        "--output",
        path_str(&out),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));

    let written = std::fs::read(out.path()).expect("Failed to read output");
    assert_eq!(written, pcm_samples(32));
}

#[test]
fn test_cli_extract_nested_short_tag() {
    let wav = create_test_wav();
    let out = NamedTempFile::new().expect("Failed to create temp file");

    let output = run_riffscope(&[
        "extract",
        path_str(&wav),
        "--path",
        "RIFF/INFO/INAM",
        "--output",
        path_str(&out),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));
    assert_eq!(std::fs::read(out.path()).unwrap(), b"test");

    let output = run_riffscope(&[
        "extract",
        path_str(&wav),
        "--path",
        "WAVE/fmt",
        "--output",
        path_str(&out),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_string(&output));
    assert_eq!(std::fs::read(out.path()).unwrap(), pcm_format(1, 8000));
}

#[test]
fn test_cli_extract_unknown_path() {
    let wav = create_test_wav();
    let out = NamedTempFile::new().expect("Failed to create temp file");

    let output = run_riffscope(&[
        "extract",
        path_str(&wav),
        "--path",
        "WAVE/LIST/nope",
        "--output",
        path_str(&out),
    ]);
    assert!(!output.status.success());
    assert!(stderr_string(&output).contains("No chunk at path"));
}
