//! The shell's three actors and their wiring
//!
//! Exactly three long-lived threads: the line actor (reads, tokenizes,
//! intercepts built-ins, publishes), the exec actor (consumes, launches),
//! and the signal dispatcher. All waits are blocking; shutdown is
//! cooperative through the exit flag, a `Terminate` publication to the
//! handoff monitor, and a SIGUSR1 wake for the dispatcher.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use nix::sys::signal::{kill, SigSet, Signal};
use nix::unistd::getpid;

use crate::builtins;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handoff::Handoff;
use crate::jobs::JobTable;
use crate::launcher;
use crate::parser;
use crate::signals::Dispatcher;
use crate::state::ExitFlag;

/// Owns the shared state and runs the actor threads to completion.
pub struct Shell {
    config: Arc<Config>,
    handoff: Arc<Handoff>,
    jobs: Arc<JobTable>,
    exit: Arc<ExitFlag>,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            handoff: Arc::new(Handoff::new()),
            jobs: Arc::new(JobTable::new()),
            exit: Arc::new(ExitFlag::new()),
        }
    }

    /// Block every signal, start the three actors, and wait for an orderly
    /// shutdown. Returns once all three threads have been joined.
    pub fn run(self) -> Result<()> {
        // The mask is installed before any thread exists, so every actor
        // inherits it and only the dispatcher ever consumes a signal.
        SigSet::all()
            .thread_block()
            .map_err(|errno| Error::SignalSetupFailed {
                reason: errno.desc().to_string(),
            })?;

        let dispatcher = Dispatcher::new(
            self.handoff.clone(),
            self.jobs.clone(),
            self.exit.clone(),
            self.config.prompt.clone(),
            self.config.announce_jobs,
        );
        let signals = spawn_actor("signals", move || dispatcher.run())?;

        let line = {
            let config = self.config.clone();
            let handoff = self.handoff.clone();
            let jobs = self.jobs.clone();
            let exit = self.exit.clone();
            spawn_actor("line", move || line_loop(&config, &handoff, &jobs, &exit))?
        };

        let exec = {
            let handoff = self.handoff.clone();
            let jobs = self.jobs.clone();
            let exit = self.exit.clone();
            let announce = self.config.announce_jobs;
            spawn_actor("exec", move || exec_loop(&handoff, &jobs, &exit, announce))?
        };

        join_actor("line", line)?;
        join_actor("exec", exec)?;

        // Both workers are down and the exit flag is set; wake the
        // dispatcher so it can observe that and return.
        kill(getpid(), Signal::SIGUSR1)?;
        join_actor("signals", signals)?;

        debug!("shell shut down cleanly");
        Ok(())
    }
}

fn spawn_actor(
    name: &str,
    body: impl FnOnce() + Send + 'static,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|err| Error::ThreadSpawnFailed {
            name: name.to_string(),
            reason: err.to_string(),
        })
}

fn join_actor(name: &str, handle: thread::JoinHandle<()>) -> Result<()> {
    handle.join().map_err(|_| Error::ThreadPanicked {
        name: name.to_string(),
    })
}

fn print_prompt(prompt: &str) {
    print!("{}", prompt);
    let _ = io::stdout().flush();
}

/// Line actor: prompt, read, tokenize, intercept built-ins, publish.
fn line_loop(config: &Config, handoff: &Handoff, jobs: &JobTable, exit: &ExitFlag) {
    debug!("line actor running");
    let limits = config.limits();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print_prompt(&config.prompt);

        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                // EOF: step past the prompt and wind down.
                println!();
                break;
            }
            Ok(_) => {}
            Err(err) => {
                // A failing input stream is fatal to the whole shell.
                eprintln!("minish: read error: {}", err);
                error!("stdin read failed: {}", err);
                break;
            }
        }

        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let cmd = match parser::parse(trimmed, &limits) {
            Ok(cmd) => cmd,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };
        if cmd.is_empty() {
            continue;
        }

        // Built-ins run in the line actor and never touch the monitor.
        match cmd.program() {
            Some("exit") => break,
            Some("jobs") => {
                jobs.for_each(|job| println!("[{}] {}", job.pid, job.name));
                continue;
            }
            Some("cd") => {
                if let Err(err) = builtins::change_dir(&cmd.argv[1..]) {
                    eprintln!("{}", err);
                }
                continue;
            }
            _ => {}
        }

        handoff.publish(cmd);
        handoff.await_consumption();
        if exit.is_set() {
            break;
        }
    }

    exit.set();
    handoff.shutdown();
    debug!("line actor stopped");
}

/// Exec actor: consume published commands and launch them, one at a time.
fn exec_loop(handoff: &Handoff, jobs: &JobTable, exit: &ExitFlag, announce: bool) {
    debug!("exec actor running");
    while let Some(cmd) = handoff.await_command() {
        if exit.is_set() {
            handoff.mark_consumed();
            break;
        }

        if let Err(err) = launcher::launch(cmd, jobs, announce) {
            eprintln!("minish: {}", err);
            if err.is_resource_exhaustion() {
                error!("launch failed from resource exhaustion, shutting down");
                exit.set();
            }
        }

        handoff.mark_consumed();
        if exit.is_set() {
            break;
        }
    }
    debug!("exec actor stopped");
}
