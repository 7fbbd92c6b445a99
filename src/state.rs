//! Shared shutdown state
//!
//! A process-wide latch set by whichever actor decides the shell must
//! terminate (`exit` built-in, stdin failure, fatal launch error) and read
//! by all three long-lived actors. Guarded by its own mutex; once observed
//! true it is never observed false again within a run.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct ExitFlag {
    inner: Mutex<bool>,
}

impl ExitFlag {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(false),
        }
    }

    /// Latch the flag. Idempotent.
    pub fn set(&self) {
        let mut flag = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !*flag {
            debug!("exit flag set");
        }
        *flag = true;
    }

    pub fn is_set(&self) -> bool {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
