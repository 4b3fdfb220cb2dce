// tests/system_executor.rs

mod common;
use crate::common::{args, init_tracing, TestResult};

use std::io::ErrorKind;
use std::process::Command;

use lvs::exec::{Cause, CommandExecutor, FailureKind, Invocation, SubprocessFailure, SystemExecutor};

const MISSING_BINARY: &str = "lvs-test-no-such-binary-7f3a";

#[test]
fn run_returns_merged_output_in_arrival_order() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();

    let output = exec.run(&args(&[
        "sh",
        "-c",
        "printf one; printf two >&2; printf three",
    ]))?;

    assert_eq!(output, b"onetwothree");
    Ok(())
}

#[test]
fn arguments_are_passed_without_shell_interpretation() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();

    let output = exec.run(&args(&["printf", "%s|", "a b", "*", "$HOME"]))?;

    assert_eq!(output, b"a b|*|$HOME|");
    Ok(())
}

#[test]
fn execute_succeeds_for_clean_exit() {
    init_tracing();
    let exec = SystemExecutor::new();

    exec.execute("true", &[]).expect("`true` should succeed");
}

#[test]
fn missing_binary_reports_spawn_failure_with_os_error_text() {
    init_tracing();
    let exec = SystemExecutor::new();
    let expected = Command::new(MISSING_BINARY)
        .spawn()
        .expect_err("binary should not exist")
        .to_string();

    let err = exec.execute(MISSING_BINARY, &[]).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Spawn);
    assert_eq!(err.program(), MISSING_BINARY);
    assert!(err.to_string().contains(&expected), "message: {err}");

    let err = exec.run(&args(&[MISSING_BINARY, "-n"])).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Spawn);
    assert!(err.to_string().contains(&expected), "message: {err}");

    let err = exec.execute_with_stdin(b"data", MISSING_BINARY, &[]).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Spawn);
    assert!(err.to_string().contains(&expected), "message: {err}");
}

#[test]
fn run_false_fails_with_message_and_no_output() {
    init_tracing();
    let exec = SystemExecutor::new();

    let err = exec.run(&args(&["false"])).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Wait);
    assert_eq!(err.exit_code(), Some(1));
    assert!(matches!(err.cause(), Cause::Exit(status) if !status.success()));
    assert!(err.output().is_empty());
    let message = err.to_string();
    assert!(!message.is_empty());
    assert!(message.contains(" output: "), "message: {message}");
}

#[test]
fn execute_failure_embeds_exit_status_and_output() {
    init_tracing();
    let exec = SystemExecutor::new();

    let err = exec
        .execute("sh", &args(&["-c", "echo partial; echo boom >&2; exit 3"]))
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Wait);
    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(err.output_lossy(), "partial\nboom\n");

    let message = err.to_string();
    assert!(message.contains('3'), "message: {message}");
    assert!(message.ends_with(": partial\nboom\n"), "message: {message}");
}

#[test]
fn run_with_empty_argv_is_rejected_without_spawning() {
    init_tracing();
    let exec = SystemExecutor::new();

    let err = exec.run(&[]).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Spawn);
    let source = std::error::Error::source(&err)
        .and_then(|s| s.downcast_ref::<std::io::Error>())
        .expect("io error source");
    assert_eq!(source.kind(), ErrorKind::InvalidInput);
}

#[test]
fn stdin_payload_reaches_the_process() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();
    let dir = tempfile::tempdir()?;
    let sink = dir.path().join("sink");
    let sink_arg = sink.to_string_lossy().into_owned();

    exec.execute_with_stdin(
        b"-A -t 10.0.0.1:80 -s wlc\n",
        "sh",
        &args(&["-c", "cat > \"$1\"", "sh", &sink_arg]),
    )?;

    assert_eq!(std::fs::read(&sink)?, b"-A -t 10.0.0.1:80 -s wlc\n");
    Ok(())
}

#[test]
fn empty_stdin_payload_closes_input_immediately() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();
    let dir = tempfile::tempdir()?;
    let sink = dir.path().join("sink");
    let sink_arg = sink.to_string_lossy().into_owned();

    exec.execute_with_stdin(b"", "sh", &args(&["-c", "cat > \"$1\"", "sh", &sink_arg]))?;

    assert!(std::fs::read(&sink)?.is_empty());
    Ok(())
}

#[test]
fn payload_larger_than_pipe_buffer_is_delivered_intact() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();
    let dir = tempfile::tempdir()?;
    let sink = dir.path().join("sink");
    let sink_arg = sink.to_string_lossy().into_owned();
    let payload: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    exec.execute_with_stdin(&payload, "sh", &args(&["-c", "cat > \"$1\"", "sh", &sink_arg]))?;

    assert_eq!(std::fs::read(&sink)?, payload);
    Ok(())
}

#[test]
fn process_echoing_large_stdin_does_not_deadlock() -> TestResult {
    init_tracing();
    let exec = SystemExecutor::new();
    let payload = vec![b'x'; 1024 * 1024];

    // `cat` writes everything back to the merged output pipe while we are
    // still writing its stdin.
    exec.execute_with_stdin(&payload, "cat", &[])?;
    Ok(())
}

#[test]
fn stdin_process_exit_status_is_reported_with_output() {
    init_tracing();
    let exec = SystemExecutor::new();

    let err = exec
        .execute_with_stdin(
            b"ignored",
            "sh",
            &args(&["-c", "cat >/dev/null; echo bad line >&2; exit 4"]),
        )
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Wait);
    assert_eq!(err.exit_code(), Some(4));
    assert_eq!(err.output_lossy(), "bad line\n");
}

#[test]
fn process_that_never_reads_stdin_yields_write_failure() {
    init_tracing();
    let exec = SystemExecutor::new();
    let payload = vec![0u8; 8 * 1024 * 1024];

    let err: SubprocessFailure = exec.execute_with_stdin(&payload, "true", &[]).unwrap_err();

    match err.kind() {
        FailureKind::Write { written, total } => {
            assert_eq!(total, payload.len());
            assert!(written < total);
        }
        other => panic!("expected write failure, got {other:?}: {err}"),
    }
    assert!(!err.to_string().is_empty());
}

#[test]
fn invocation_keeps_arguments_verbatim() {
    let argv = args(&["-A", "-t", "10.0.0.1:80", "-s", "wlc"]);
    let invocation = Invocation::new("ipvsadm", &argv);

    assert_eq!(invocation.program(), "ipvsadm");
    assert_eq!(invocation.args(), argv.as_slice());
    assert_eq!(invocation.to_string(), "ipvsadm -A -t 10.0.0.1:80 -s wlc");
}
