//! Interpreter Errors

use thiserror::Error;

/// Errors raised while executing a script.
///
/// `Exit` is not a failure: it carries the `exit` builtin's status up through
/// every enclosing construct so the shell can terminate. Everything else
/// aborts the current statement only.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("exit {0}")]
    Exit(i32),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
