//! Shell Facade
//!
//! `Shell` ties the parser and interpreter together behind a small API:
//! feed it source text, get back a status. State (variables, background
//! jobs) persists across `eval` calls, which is what makes the REPL work.

use crate::ast::Script;
use crate::interpreter::{run_script, Context, ExecError, RunContext, VarStore};
use crate::parser::{parse, ParseException};

/// Result of evaluating one piece of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The script ran to completion with this status.
    Completed(i32),
    /// The script called `exit`; the shell should terminate with this status.
    Exit(i32),
}

impl EvalOutcome {
    pub fn status(self) -> i32 {
        match self {
            EvalOutcome::Completed(status) | EvalOutcome::Exit(status) => status,
        }
    }
}

pub struct Shell {
    pub context: Context,
}

impl Shell {
    /// Shell with variables seeded from the host environment.
    pub fn new() -> Self {
        Self {
            context: Context::new(),
        }
    }

    pub fn with_vars(vars: VarStore) -> Self {
        Self {
            context: Context::with_vars(vars),
        }
    }

    /// Parse and run one piece of source text.
    pub fn eval(&mut self, source: &str) -> Result<EvalOutcome, ParseException> {
        let script = parse(source)?;
        Ok(self.run(&script))
    }

    /// Run an already-parsed script.
    pub fn run(&mut self, script: &Script) -> EvalOutcome {
        match run_script(&mut self.context, &RunContext::inherit(), script) {
            Ok(status) => EvalOutcome::Completed(status),
            Err(ExecError::Exit(code)) => EvalOutcome::Exit(code),
            Err(err) => {
                eprintln!("lsh: {}", err);
                EvalOutcome::Completed(1)
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
