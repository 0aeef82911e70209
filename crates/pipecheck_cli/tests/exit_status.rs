//! Process exit status of the `pipecheck` binary.
//!
//! Each run uses an empty temporary working directory so no stray
//! `pipecheck.toml` is picked up.

use std::process::{Command, Output};

fn pipecheck(args: &[&str]) -> Output {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let binary = env!("CARGO_BIN_EXE_pipecheck");
    Command::new(binary)
        .args(args)
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run pipecheck")
}

#[test]
fn delay_design_exits_success() {
    let output = pipecheck(&["--design", "delay"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6, "got: {stdout}");
    assert!(stdout.starts_with("Module1.i_a_b=0 Module1.m0.o_a_b=1\n"));
}

#[test]
fn passthrough_design_exits_violation() {
    let output = pipecheck(&["--design", "passthrough"]);
    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "Module1.m0.o_a_b should be the old value of Module1.i_a_b\n"
    );
}

#[test]
fn missing_signal_path_exits_fatal() {
    let output = pipecheck(&["--probe", "TOP.x"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("fatal:"), "got: {stderr}");
    assert!(
        stderr.contains("no handle found for 'TOP.x'"),
        "got: {stderr}"
    );
}

#[test]
fn inverted_reset_window_exits_fatal() {
    let output = pipecheck(&["--reset-start", "9", "--reset-end", "3"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("reset.start (9) must be below reset.end (3)"),
        "got: {stderr}"
    );
}
