//! Interpreter State
//!
//! `Context` is the long-lived shell state: the variable store and the table
//! of background jobs. `RunContext` is the short-lived I/O routing for one
//! program launch, carrying the pipe ends a pipeline stage should use instead
//! of the shell's own stdin/stdout.

use std::io::{self, PipeReader, PipeWriter};
use std::process::{Child, Stdio};

use crate::interpreter::vars::VarStore;

/// A background child we have not yet waited on.
#[derive(Debug)]
pub struct Job {
    pub pid: u32,
    pub child: Child,
}

/// Shell-wide interpreter state.
#[derive(Debug)]
pub struct Context {
    pub vars: VarStore,
    jobs: Vec<Job>,
}

impl Context {
    /// Fresh context with variables seeded from the host environment.
    pub fn new() -> Self {
        Self {
            vars: VarStore::from_host_env(),
            jobs: Vec::new(),
        }
    }

    /// Context with an explicit variable store, for tests and embedding.
    pub fn with_vars(vars: VarStore) -> Self {
        Self {
            vars,
            jobs: Vec::new(),
        }
    }

    /// Register a background child.
    pub fn add_job(&mut self, child: Child) {
        let pid = child.id();
        self.jobs.push(Job { pid, child });
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Collect any background children that have already exited, without
    /// blocking. Called between statements so finished jobs do not linger
    /// as zombies.
    pub fn reap_finished(&mut self) {
        self.jobs.retain_mut(|job| match job.child.try_wait() {
            Ok(Some(_)) => false,
            Ok(None) => true,
            // The child is gone; nothing left to reap.
            Err(_) => false,
        });
    }

    /// Block until every background job has exited.
    pub fn wait_for_jobs(&mut self) -> io::Result<()> {
        for mut job in self.jobs.drain(..) {
            job.child.wait()?;
        }
        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // Do not leave orphaned children behind when the shell goes away.
        let _ = self.wait_for_jobs();
    }
}

/// I/O routing for one program launch. `None` means inherit the shell's own
/// stream. Pipe ends are cloned per spawn; the originals close when the
/// `RunContext` is dropped, which is what lets pipeline readers see EOF.
#[derive(Debug, Default)]
pub struct RunContext {
    pub stdin: Option<PipeReader>,
    pub stdout: Option<PipeWriter>,
}

impl RunContext {
    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn stdin_stdio(&self) -> io::Result<Stdio> {
        match &self.stdin {
            Some(reader) => Ok(Stdio::from(reader.try_clone()?)),
            None => Ok(Stdio::inherit()),
        }
    }

    pub fn stdout_stdio(&self) -> io::Result<Stdio> {
        match &self.stdout {
            Some(writer) => Ok(Stdio::from(writer.try_clone()?)),
            None => Ok(Stdio::inherit()),
        }
    }
}
