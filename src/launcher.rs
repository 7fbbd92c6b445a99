//! Process launching
//!
//! Owns fork/exec discipline: descriptor redirection, per-child signal
//! masks, process-group assignment for detached jobs, and the choice
//! between waiting synchronously and registering a background job.
//!
//! The child path never returns to shell logic: on any failure it prints a
//! diagnostic and exits non-zero itself.

use std::ffi::CString;
use std::io::{self, Write};
use std::process;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::signal::{SigSet, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{dup2_stdin, dup2_stdout, execvp, fork, setpgid, ForkResult, Pid};

use crate::error::{Error, Result};
use crate::jobs::JobTable;
use crate::parser::Command;

/// Launch one command: fork, set the child up, and either wait for it
/// (foreground) or register it in `jobs` and announce it (background).
///
/// Creates exactly one child process per call. A fork failure is an error
/// for this command; the caller decides whether it is fatal to the shell
/// (see [`Error::is_resource_exhaustion`]).
pub fn launch(cmd: Command, jobs: &JobTable, announce: bool) -> Result<()> {
    let program = match cmd.program() {
        Some(p) => p.to_string(),
        // Callers filter empty commands out; tolerate them as a no-op.
        None => return Ok(()),
    };

    match unsafe { fork() } {
        Ok(ForkResult::Child) => exec_child(&cmd),
        Ok(ForkResult::Parent { child }) => {
            // Parent threads never handle signals directly; re-assert the
            // full mask in the launching thread.
            if let Err(errno) = SigSet::all().thread_block() {
                warn!("failed to re-block signals after fork: {}", errno);
            }

            if cmd.background {
                jobs.insert(&program, child);
                debug!(pid = child.as_raw(), program = %program, "detached to background");
                if announce {
                    println!("[{}] {}", child, program);
                    let _ = io::stdout().flush();
                }
                Ok(())
            } else {
                debug!(pid = child.as_raw(), program = %program, "waiting in foreground");
                wait_foreground(child)
            }
        }
        Err(errno) => Err(Error::SpawnFailed { program, errno }),
    }
}

/// Child side of the fork. Diverges: either the process image is replaced
/// or the child exits non-zero.
fn exec_child(cmd: &Command) -> ! {
    // Undo the shell's block-everything mask. SIGTSTP stays blocked; a
    // background child also keeps SIGINT blocked so a foreground interrupt
    // cannot kill it.
    let mut unblock = SigSet::all();
    unblock.remove(Signal::SIGTSTP);
    if cmd.background {
        unblock.remove(Signal::SIGINT);
    }
    if let Err(errno) = unblock.thread_unblock() {
        eprintln!("sigmask: {}", errno.desc());
        process::exit(1);
    }

    if let Some(path) = &cmd.stdout_redirect {
        let flags = OFlag::O_CREAT | OFlag::O_TRUNC | OFlag::O_WRONLY;
        match open(path.as_path(), flags, Mode::S_IRUSR | Mode::S_IWUSR) {
            Ok(fd) => {
                if let Err(errno) = dup2_stdout(&fd) {
                    eprintln!("dup2: {}", errno.desc());
                    process::exit(1);
                }
            }
            Err(errno) => {
                eprintln!("{}: {}", path.display(), errno.desc());
                process::exit(1);
            }
        }
    }

    if let Some(path) = &cmd.stdin_redirect {
        // Read-only, no O_CREAT: a missing input file is a hard error.
        match open(path.as_path(), OFlag::O_RDONLY, Mode::empty()) {
            Ok(fd) => {
                if let Err(errno) = dup2_stdin(&fd) {
                    eprintln!("dup2: {}", errno.desc());
                    process::exit(1);
                }
            }
            Err(errno) => {
                eprintln!("{}: {}", path.display(), errno.desc());
                process::exit(1);
            }
        }
    }

    if cmd.background {
        // Lead a fresh process group, detached from the terminal's
        // foreground group: a stray terminal read then stops the job with
        // SIGTTIN instead of stealing the shell's input.
        if let Err(errno) = setpgid(Pid::from_raw(0), Pid::from_raw(0)) {
            eprintln!("setpgid: {}", errno.desc());
            process::exit(1);
        }
    }

    let argv: Vec<CString> = match cmd
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(argv) => argv,
        Err(_) => {
            eprintln!("{}: invalid argument", cmd.argv[0]);
            process::exit(1);
        }
    };

    // PATH is searched automatically; execvp only returns on failure.
    if let Err(errno) = execvp(&argv[0], &argv) {
        if errno == Errno::ENOENT {
            eprintln!("{}: command not found...", cmd.argv[0]);
        } else {
            eprintln!("{}: {}", cmd.argv[0], errno.desc());
        }
    }
    process::exit(1);
}

fn wait_foreground(child: Pid) -> Result<()> {
    match waitpid(child, None) {
        Ok(status) => {
            if matches!(status, WaitStatus::Signaled(..)) {
                // Separate the next prompt from a signal-killed child.
                println!();
                let _ = io::stdout().flush();
            }
            Ok(())
        }
        // Someone (the dispatcher) reaped it first; tolerated.
        Err(Errno::ECHILD) => Ok(()),
        Err(errno) => Err(Error::WaitFailed {
            pid: child.as_raw(),
            errno,
        }),
    }
}
