//! Background job registry
//!
//! A thread-safe table of the background processes the shell has detached
//! and not yet seen terminate. The launcher inserts, the signal dispatcher
//! removes on reap, and the `jobs` built-in enumerates. One mutex guards
//! every operation; each call is individually atomic and no cross-call
//! atomicity is promised.

use std::sync::{Mutex, PoisonError};

use nix::unistd::Pid;

/// One tracked background process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    /// Program name at launch time
    pub name: String,
}

/// The synchronized collection of currently-known background jobs.
#[derive(Debug, Default)]
pub struct JobTable {
    inner: Mutex<Vec<Job>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Track a freshly detached background process.
    pub fn insert(&self, name: &str, pid: Pid) {
        let mut jobs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(pid = pid.as_raw(), name, "registering background job");
        jobs.push(Job {
            pid,
            name: name.to_string(),
        });
    }

    /// Remove the job with this pid. Returns whether a matching record
    /// existed; the dispatcher uses this to tell tracked background jobs
    /// apart from children the shell never registered.
    pub fn remove(&self, pid: Pid) -> bool {
        let mut jobs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = jobs.len();
        jobs.retain(|job| job.pid != pid);
        let removed = jobs.len() != before;
        if removed {
            debug!(pid = pid.as_raw(), "background job reaped");
        }
        removed
    }

    /// Read-only enumeration under the lock; used by the `jobs` built-in.
    pub fn for_each(&self, mut f: impl FnMut(&Job)) {
        let jobs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for job in jobs.iter() {
            f(job);
        }
    }

    /// Owned copy of the current records.
    pub fn snapshot(&self) -> Vec<Job> {
        let jobs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.clone()
    }

    pub fn len(&self) -> usize {
        let jobs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
