//! Integration tests for the process launcher
//!
//! These fork and exec real binaries (`echo`, `cat`, `true`, `sleep`) and
//! assert on observable effects: redirected file contents, registry state
//! and reaping behavior. Announcements are switched off to keep test output
//! clean.

use std::fs;

use nix::sys::wait::waitpid;

use minish::launcher::launch;
use minish::{parse, JobTable, Limits};

fn parsed(line: &str) -> minish::Command {
    parse(line, &Limits::default()).expect("test line should parse")
}

#[test]
fn test_foreground_command_runs_to_completion() {
    let jobs = JobTable::new();
    launch(parsed("true"), &jobs, false).expect("launch true");
    assert!(jobs.is_empty());
}

#[test]
fn test_stdout_redirect_creates_and_fills_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.txt");

    let jobs = JobTable::new();
    let line = format!("echo hello >{}", out.display());
    launch(parsed(&line), &jobs, false).expect("launch echo");

    let content = fs::read_to_string(&out).expect("redirected output");
    assert_eq!(content, "hello\n");
}

#[test]
fn test_stdout_redirect_truncates_an_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.txt");
    fs::write(&out, "previous contents, much longer than the new ones").expect("seed file");

    let jobs = JobTable::new();
    let line = format!("echo new >{}", out.display());
    launch(parsed(&line), &jobs, false).expect("launch echo");

    assert_eq!(fs::read_to_string(&out).expect("output"), "new\n");
}

#[test]
fn test_stdin_redirect_feeds_the_child() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "line one\nline two\n").expect("seed input");

    let jobs = JobTable::new();
    let line = format!("cat <{} >{}", input.display(), output.display());
    launch(parsed(&line), &jobs, false).expect("launch cat");

    assert_eq!(
        fs::read_to_string(&output).expect("copied output"),
        "line one\nline two\n"
    );
}

#[test]
fn test_missing_input_file_is_not_created() {
    // The input redirect opens read-only without O_CREAT; the child fails
    // and must not leave an empty file behind.
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("absent.txt");
    let output = dir.path().join("out.txt");

    let jobs = JobTable::new();
    let line = format!("cat <{} >{}", input.display(), output.display());
    launch(parsed(&line), &jobs, false).expect("launch itself succeeds");

    assert!(!input.exists());
}

#[test]
fn test_unknown_program_does_not_kill_the_shell_side() {
    let jobs = JobTable::new();
    // The child prints `command not found...` and exits 1; the launcher
    // itself reports success for the launch.
    launch(parsed("definitely-not-a-real-program-xyz"), &jobs, false)
        .expect("fork/exec path is not an error for the caller");
    assert!(jobs.is_empty());
}

#[test]
fn test_background_command_is_registered_and_reapable() {
    let jobs = JobTable::new();
    launch(parsed("sleep 0 &"), &jobs, false).expect("launch sleep");

    let snapshot = jobs.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "sleep");
    let pid = snapshot[0].pid;

    // Stand in for the signal dispatcher: reap the child, then retire the
    // registry record.
    waitpid(pid, None).expect("reap background child");
    assert!(jobs.remove(pid));
    assert!(!jobs.remove(pid));
}
