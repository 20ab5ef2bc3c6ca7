//! Program Execution
//!
//! Launching and waiting for program trees: single commands, pipelines, and
//! the `&&` / `||` combinators. The launch/wait split exists so a pipeline
//! can start every stage before waiting on any of them, and so background
//! statements can keep the children instead of waiting.

use std::io;
use std::process::{Child, Command, ExitStatus};

use crate::ast::Program;
use crate::interpreter::builtins::{is_builtin, run_builtin};
use crate::interpreter::errors::ExecError;
use crate::interpreter::types::{Context, RunContext};
use crate::interpreter::word_expansion::expand_words;
use crate::interpreter::run_script;

/// The result of launching a program tree.
///
/// `children` are the spawned processes not yet waited on. `completed` is set
/// when the status source ran in the shell process (a builtin, a group, a
/// short-circuited combinator); otherwise the last child carries the status.
#[derive(Debug)]
pub struct LaunchedProgram {
    pub children: Vec<Child>,
    pub completed: Option<i32>,
}

impl LaunchedProgram {
    fn completed(status: i32) -> Self {
        Self {
            children: Vec::new(),
            completed: Some(status),
        }
    }

    fn running(child: Child) -> Self {
        Self {
            children: vec![child],
            completed: None,
        }
    }
}

/// Launch a program tree and wait for its status.
pub fn run_program(
    ctx: &mut Context,
    rctx: &RunContext,
    program: &Program,
) -> Result<i32, ExecError> {
    let launched = launch_program(ctx, rctx, program)?;
    wait_launched(launched)
}

/// Launch a program tree without waiting on spawned children.
pub fn launch_program(
    ctx: &mut Context,
    rctx: &RunContext,
    program: &Program,
) -> Result<LaunchedProgram, ExecError> {
    match program {
        Program::Command(words) => {
            let argv = expand_words(&ctx.vars, words);
            if argv.is_empty() {
                // Everything expanded away; nothing to run.
                return Ok(LaunchedProgram::completed(0));
            }
            if is_builtin(&argv[0]) {
                let status = run_builtin(ctx, rctx, &argv)?;
                return Ok(LaunchedProgram::completed(status));
            }
            spawn_command(ctx, rctx, &argv)
        }

        Program::Pipe(lhs, rhs) => launch_pipe(ctx, rctx, lhs, rhs),

        Program::And(lhs, rhs) => {
            let status = run_program(ctx, rctx, lhs)?;
            if status == 0 {
                launch_program(ctx, rctx, rhs)
            } else {
                Ok(LaunchedProgram::completed(status))
            }
        }

        Program::Or(lhs, rhs) => {
            let status = run_program(ctx, rctx, lhs)?;
            if status != 0 {
                launch_program(ctx, rctx, rhs)
            } else {
                Ok(LaunchedProgram::completed(status))
            }
        }

        Program::Group(script) => {
            let status = run_script(ctx, rctx, script)?;
            Ok(LaunchedProgram::completed(status))
        }
    }
}

/// Launch `lhs | rhs`. Both sides start before either is waited on; the
/// parent's copies of the pipe ends close when the per-side `RunContext`s
/// drop, so the reader sees EOF once the writer side exits.
fn launch_pipe(
    ctx: &mut Context,
    rctx: &RunContext,
    lhs: &Program,
    rhs: &Program,
) -> Result<LaunchedProgram, ExecError> {
    let (reader, writer) = io::pipe()?;

    let left_rctx = RunContext {
        stdin: rctx.stdin.as_ref().map(|r| r.try_clone()).transpose()?,
        stdout: Some(writer),
    };
    let left = launch_program(ctx, &left_rctx, lhs)?;
    drop(left_rctx);

    let right_rctx = RunContext {
        stdin: Some(reader),
        stdout: rctx.stdout.as_ref().map(|w| w.try_clone()).transpose()?,
    };
    let right = launch_program(ctx, &right_rctx, rhs)?;
    drop(right_rctx);

    // The pipeline's status is the right side's; left children are kept only
    // so they get reaped.
    let mut children = left.children;
    children.extend(right.children);
    Ok(LaunchedProgram {
        children,
        completed: right.completed,
    })
}

/// Wait on every child and produce the program's status.
pub fn wait_launched(launched: LaunchedProgram) -> Result<i32, ExecError> {
    let carrier = launched.completed.is_none();
    let last = launched.children.len().saturating_sub(1);
    let mut status = launched.completed.unwrap_or(0);
    for (i, mut child) in launched.children.into_iter().enumerate() {
        let exit = child.wait()?;
        if carrier && i == last {
            status = exit_code(exit);
        }
    }
    Ok(status)
}

fn spawn_command(
    ctx: &Context,
    rctx: &RunContext,
    argv: &[String],
) -> Result<LaunchedProgram, ExecError> {
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command.stdin(rctx.stdin_stdio()?);
    command.stdout(rctx.stdout_stdio()?);

    // Children see the shell's variable store as their environment.
    command.env_clear();
    for (name, value) in ctx.vars.iter() {
        command.env(name, value);
    }

    match command.spawn() {
        Ok(child) => Ok(LaunchedProgram::running(child)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("lsh: {}: command not found", argv[0]);
            Ok(LaunchedProgram::completed(127))
        }
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            eprintln!("lsh: {}: permission denied", argv[0]);
            Ok(LaunchedProgram::completed(126))
        }
        Err(err) => Err(err.into()),
    }
}

/// Map an OS exit status to a shell status: the exit code, or 128 plus the
/// signal number for a killed child.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
