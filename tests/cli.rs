use std::path::Path;
use std::process::{Command, Output};

fn promise_me(args: &[&Path], rust_log: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_promise-me"));
    cmd.args(args);
    match rust_log {
        Some(filter) => cmd.env("RUST_LOG", filter),
        None => cmd.env_remove("RUST_LOG"),
    };
    cmd.output().expect("run promise-me")
}

fn fixture(path: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

#[test]
fn test_converts_a_file() {
    let output = promise_me(&[&fixture("before/bars.js")], None);
    let expected = std::fs::read_to_string(fixture("after/bars.js")).unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stderr), "");
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

#[test]
fn test_parse_error_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.js");
    std::fs::write(&path, "a(function (err, value) {\n").unwrap();

    let output = promise_me(&[&path], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_missing_file_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = promise_me(&[&dir.path().join("nope.js")], None);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read"), "stderr: {}", stderr);
}

#[test]
fn test_debug_log_goes_to_stderr() {
    let output = promise_me(&[&fixture("before/bars.js")], Some("promise_me=debug"));
    let expected = std::fs::read_to_string(fixture("after/bars.js")).unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rewrote node-style callback"), "stderr: {}", stderr);
    assert!(stderr.contains("not flattening"), "stderr: {}", stderr);
}
