//! Single-slot rendezvous between the line actor and the exec actor
//!
//! The shell is single-command-in-flight by design: the line actor publishes
//! one parsed [`Command`] and blocks until the exec actor has finished with
//! it. The slot has three states (empty, filled, terminate) and ownership
//! of the command moves with the state transition; neither actor ever holds
//! a reference past the handoff.
//!
//! The slot counts as busy from `publish` until `mark_consumed`. That same
//! predicate, read under the same mutex, is what the signal dispatcher uses
//! to decide between printing a bare newline and redrawing the prompt.

use std::sync::{Condvar, Mutex, PoisonError};

use crate::parser::Command;

#[derive(Debug)]
enum Slot {
    /// Nothing in flight; the producer may publish
    Empty,
    /// A command was published and is being (or about to be) executed.
    /// `None` once the consumer has taken the command but not yet finished.
    Filled(Option<Command>),
    /// Process-wide shutdown requested
    Terminate,
}

/// The rendezvous monitor shared by exactly two actors.
#[derive(Debug)]
pub struct Handoff {
    slot: Mutex<Slot>,
    cond: Condvar,
}

impl Handoff {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            cond: Condvar::new(),
        }
    }

    /// Publish a command for the exec actor. Blocks while a previous command
    /// is still in flight; after shutdown the command is silently dropped.
    pub fn publish(&self, cmd: Command) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match &*slot {
                Slot::Empty => {
                    *slot = Slot::Filled(Some(cmd));
                    self.cond.notify_all();
                    return;
                }
                Slot::Terminate => return,
                Slot::Filled(_) => {
                    slot = self
                        .cond
                        .wait(slot)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Producer side: block until the published command has been consumed
    /// (or shutdown was requested).
    pub fn await_consumption(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        while matches!(*slot, Slot::Filled(_)) {
            slot = self
                .cond
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Consumer side: block until a command is available. Returns `None`
    /// when shutdown was requested instead. The slot stays busy until
    /// [`mark_consumed`](Self::mark_consumed).
    pub fn await_command(&self) -> Option<Command> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match &mut *slot {
                Slot::Filled(cmd @ Some(_)) => return cmd.take(),
                Slot::Terminate => return None,
                // Empty, or a command already taken in a previous call that
                // was not yet marked consumed: keep waiting.
                _ => {
                    slot = self
                        .cond
                        .wait(slot)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Consumer side: execution finished, hand the slot back to the
    /// producer.
    pub fn mark_consumed(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Slot::Filled(_)) {
            *slot = Slot::Empty;
            self.cond.notify_all();
        }
    }

    /// Request process-wide shutdown: both waiters wake, `await_command`
    /// returns `None` from now on. Any in-slot command is discarded.
    pub fn shutdown(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Slot::Terminate;
        self.cond.notify_all();
    }

    /// Run `f` with the busy predicate, under the slot mutex. The dispatcher
    /// performs its prompt redraw inside `f` so the output cannot race a
    /// concurrent completion.
    pub fn with_busy<R>(&self, f: impl FnOnce(bool) -> R) -> R {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(matches!(*slot, Slot::Filled(_)))
    }

    /// Snapshot of the busy predicate.
    pub fn is_busy(&self) -> bool {
        self.with_busy(|busy| busy)
    }
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}
