//! Signal dispatch
//!
//! The one actor in the process that ever observes a signal. Every thread
//! (this one included) runs with all signals blocked; the dispatcher loops
//! on a synchronous signal wait, so delivery is a return value rather than
//! an interruption. Interactive signals redraw the prompt, SIGCHLD reaps
//! and reports background jobs, and a private SIGUSR1 wakes the loop during
//! teardown.
//!
//! This actor never blocks on anything except the next signal, and print
//! failures are logged and looped past, never escalated.

use std::io::{self, Write};
use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::{SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::handoff::Handoff;
use crate::jobs::JobTable;
use crate::state::ExitFlag;

/// The dedicated signal-handling actor.
pub struct Dispatcher {
    handoff: Arc<Handoff>,
    jobs: Arc<JobTable>,
    exit: Arc<ExitFlag>,
    prompt: String,
    announce: bool,
}

impl Dispatcher {
    pub fn new(
        handoff: Arc<Handoff>,
        jobs: Arc<JobTable>,
        exit: Arc<ExitFlag>,
        prompt: String,
        announce: bool,
    ) -> Self {
        Self {
            handoff,
            jobs,
            exit,
            prompt,
            announce,
        }
    }

    /// Loop until teardown: wait for the next signal, handle it, repeat.
    pub fn run(self) {
        debug!("signal dispatcher running");
        let sigs = SigSet::all();
        loop {
            let sig = match sigs.wait() {
                Ok(sig) => sig,
                Err(errno) => {
                    warn!("sigwait failed: {}", errno);
                    continue;
                }
            };

            match sig {
                Signal::SIGINT | Signal::SIGTSTP => self.on_interrupt(),
                Signal::SIGCHLD => self.on_child_change(),
                Signal::SIGUSR1 => {
                    // Private teardown wake; spurious ones are ignored.
                    if self.exit.is_set() {
                        debug!("signal dispatcher stopping");
                        return;
                    }
                }
                other => {
                    debug!("ignoring signal {:?}", other);
                }
            }
        }
    }

    /// Ctrl+C / Ctrl+Z at the terminal. Evaluated, and printed, under the
    /// handoff lock so the redraw cannot race a completing command.
    fn on_interrupt(&self) {
        self.handoff.with_busy(|busy| {
            let mut out = io::stdout();
            let res = if busy {
                writeln!(out)
            } else {
                write!(out, "\n{}", self.prompt)
            };
            if let Err(err) = res.and_then(|_| out.flush()) {
                warn!("prompt redraw failed: {}", err);
            }
        });
    }

    /// SIGCHLD: one non-blocking reap per notification. Only pids found in
    /// the registry produce a status line; the foreground child is waited
    /// on by the exec actor and never registered.
    fn on_child_change(&self) {
        let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;
        let status = match waitpid(Pid::from_raw(-1), Some(flags)) {
            Ok(WaitStatus::StillAlive) => return,
            Ok(status) => status,
            Err(Errno::ECHILD) => return,
            Err(errno) => {
                warn!("waitpid failed: {}", errno);
                return;
            }
        };

        let pid = match status.pid() {
            Some(pid) => pid,
            None => return,
        };
        if !self.jobs.remove(pid) {
            return;
        }

        if self.announce {
            let mut out = io::stdout();
            let res = write!(out, "\n[{}]+ {}\n", pid, format_status(&status));
            if let Err(err) = res.and_then(|_| out.flush()) {
                warn!("status line failed: {}", err);
                return;
            }
            // Redraw only when no foreground command owns the terminal.
            self.handoff.with_busy(|busy| {
                if !busy {
                    let res = write!(out, "{}", self.prompt);
                    if let Err(err) = res.and_then(|_| out.flush()) {
                        warn!("prompt redraw failed: {}", err);
                    }
                }
            });
        }
    }
}

/// Human-readable word for a reaped child's status: `Done` for a clean
/// exit, `Exit <code>` otherwise, `Killed` for a signal death.
pub fn format_status(status: &WaitStatus) -> String {
    match status {
        WaitStatus::Exited(_, 0) => "Done".to_string(),
        WaitStatus::Exited(_, code) => format!("Exit {}", code),
        WaitStatus::Signaled(..) => "Killed".to_string(),
        WaitStatus::Stopped(..) => "Stopped".to_string(),
        _ => "Terminated".to_string(),
    }
}
