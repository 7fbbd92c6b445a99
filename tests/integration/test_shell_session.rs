//! End-to-end tests against the built shell binary
//!
//! Drives `minish` as a subprocess over piped stdio: built-ins, command
//! execution, and signal behavior. stdin is a pipe here, so the shell skips
//! the terminal foreground-group handover and runs normally.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

fn spawn_shell() -> Child {
    Command::new(env!("CARGO_BIN_EXE_minish"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn minish")
}

fn write_line(child: &mut Child, line: &str) {
    let stdin = child.stdin.as_mut().expect("piped stdin");
    stdin.write_all(line.as_bytes()).expect("write line");
    stdin.write_all(b"\n").expect("write newline");
    stdin.flush().expect("flush");
}

#[test]
fn test_exit_builtin_shuts_down_cleanly() {
    let mut shell = spawn_shell();
    write_line(&mut shell, "exit");

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
}

#[test]
fn test_eof_shuts_down_cleanly() {
    let mut shell = spawn_shell();
    drop(shell.stdin.take());

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
}

#[test]
fn test_command_output_reaches_stdout() {
    let mut shell = spawn_shell();
    write_line(&mut shell, "echo round-trip");
    write_line(&mut shell, "exit");

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("round-trip"));
}

#[test]
fn test_parse_error_is_reported_and_shell_survives() {
    let mut shell = spawn_shell();
    write_line(&mut shell, "echo >");
    write_line(&mut shell, "echo still-here");
    write_line(&mut shell, "exit");

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing path after '>' operator"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("still-here"));
}

#[test]
fn test_jobs_builtin_lists_background_job() {
    let mut shell = spawn_shell();
    // The background child inherits the stdout pipe, so keep it short: the
    // output read below only finishes once every writer is gone.
    write_line(&mut shell, "sleep 1 &");
    // Let the launcher register the job before asking for the listing.
    thread::sleep(Duration::from_millis(300));
    write_line(&mut shell, "jobs");
    write_line(&mut shell, "exit");

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("] sleep"));
}

#[test]
fn test_interrupt_does_not_terminate_the_shell() {
    let mut shell = spawn_shell();
    // Give the shell time to install its signal mask and start the actors.
    thread::sleep(Duration::from_millis(300));

    kill(Pid::from_raw(shell.id() as i32), Signal::SIGINT).expect("send SIGINT");
    thread::sleep(Duration::from_millis(300));

    assert!(
        shell.try_wait().expect("try_wait").is_none(),
        "shell must survive an interrupt at the prompt"
    );

    write_line(&mut shell, "exit");
    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
}

#[test]
fn test_cd_errors_keep_the_shell_alive() {
    let mut shell = spawn_shell();
    write_line(&mut shell, "cd");
    write_line(&mut shell, "cd /definitely/not/here");
    write_line(&mut shell, "echo survived");
    write_line(&mut shell, "exit");

    let output = shell.wait_with_output().expect("wait");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cd: one argument required"));
    assert!(stderr.contains("No such directory"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("survived"));
}
