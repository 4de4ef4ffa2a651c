//! Assertions over strongbox process output.

use std::process::Output;

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    text(&output.stdout)
}

/// Stdout without its trailing newline; commands print one value per line.
pub fn stdout_line(output: &Output) -> String {
    stdout(output).trim_end_matches('\n').to_string()
}

/// Stdout parsed as JSON, for `--json` commands.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let out = stdout(output);
    serde_json::from_str(&out).unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, out))
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "strongbox exited with {}:\n{}",
        output.status,
        text(&output.stderr)
    );
}

pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "strongbox succeeded unexpectedly:\n{}",
        stdout(output)
    );
}

pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(out.contains(expected), "stdout missing {:?}:\n{}", expected, out);
}

/// Assert a secret never reaches stdout.
pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    let out = stdout(output);
    assert!(!out.contains(excluded), "stdout leaked {:?}:\n{}", excluded, out);
}

pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = text(&output.stderr);
    assert!(err.contains(expected), "stderr missing {:?}:\n{}", expected, err);
}
