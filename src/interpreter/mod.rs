//! Script Interpreter
//!
//! Executes parsed scripts against a `Context`. Statements run top to bottom;
//! a statement that fails with a runtime error is reported and the script
//! continues, with the exception of `exit`, which unwinds everything.

pub mod builtins;
pub mod control_flow;
pub mod errors;
pub mod execution;
pub mod types;
pub mod vars;
pub mod word_expansion;

pub use errors::ExecError;
pub use types::{Context, Job, RunContext};
pub use vars::VarStore;

use crate::ast::{Program, Script, Statement, StatementKind, VarAssign};
use crate::interpreter::word_expansion::expand_to_value;

/// Run a script, returning the status of the last statement executed
/// (0 for an empty script).
pub fn run_script(ctx: &mut Context, rctx: &RunContext, script: &Script) -> Result<i32, ExecError> {
    let mut status = 0;
    for statement in &script.statements {
        // Pick up any background jobs that finished since the last statement.
        ctx.reap_finished();
        status = match run_statement(ctx, rctx, statement) {
            Ok(status) => status,
            Err(ExecError::Exit(code)) => return Err(ExecError::Exit(code)),
            Err(err) => {
                eprintln!("lsh: {}", err);
                1
            }
        };
    }
    Ok(status)
}

fn run_statement(
    ctx: &mut Context,
    rctx: &RunContext,
    statement: &Statement,
) -> Result<i32, ExecError> {
    if statement.background {
        if let StatementKind::Command(program) = &statement.kind {
            return run_background(ctx, rctx, program);
        }
        // The grammar only allows `&` after a command statement; a flag on
        // anything else means the parser and this dispatch have drifted.
        // Run the statement in the foreground rather than skipping it.
        debug_assert!(false, "background flag on a non-command statement");
    }
    match &statement.kind {
        StatementKind::Command(program) => execution::run_program(ctx, rctx, program),
        StatementKind::Conditional(cond) => control_flow::run_conditional(ctx, rctx, cond),
        StatementKind::ForLoop(for_loop) => control_flow::run_for_loop(ctx, rctx, for_loop),
        StatementKind::Assign(assign) => run_var_assign(ctx, assign),
    }
}

/// Launch a background program and register its children as jobs. The
/// statement's own status is 0: the shell does not know yet how the job
/// will fare.
fn run_background(
    ctx: &mut Context,
    rctx: &RunContext,
    program: &Program,
) -> Result<i32, ExecError> {
    let launched = execution::launch_program(ctx, rctx, program)?;
    for child in launched.children {
        ctx.add_job(child);
    }
    Ok(0)
}

fn run_var_assign(ctx: &mut Context, assign: &VarAssign) -> Result<i32, ExecError> {
    let value = expand_to_value(&ctx.vars, &assign.value);
    ctx.vars.set(&assign.name, &value);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::time::{Duration, Instant};

    fn ctx() -> Context {
        let mut vars = VarStore::new();
        vars.set("PATH", "/usr/bin:/bin");
        Context::with_vars(vars)
    }

    fn eval(ctx: &mut Context, source: &str) -> Result<i32, ExecError> {
        let script = parse(source).unwrap();
        run_script(ctx, &RunContext::inherit(), &script)
    }

    #[test]
    fn test_script_status_is_last_statement() {
        let mut ctx = ctx();
        assert_eq!(eval(&mut ctx, "false; true").unwrap(), 0);
        assert_eq!(eval(&mut ctx, "true; false").unwrap(), 1);
        assert_eq!(eval(&mut ctx, "").unwrap(), 0);
    }

    #[test]
    fn test_assignment_and_reference() {
        let mut ctx = ctx();
        eval(&mut ctx, "x=hello; y=$x").unwrap();
        assert_eq!(ctx.vars.get("x"), Some("hello"));
        assert_eq!(ctx.vars.get("y"), Some("hello"));
    }

    #[test]
    fn test_assignment_of_unset_variable_is_empty() {
        let mut ctx = ctx();
        eval(&mut ctx, "x=$never_set").unwrap();
        assert_eq!(ctx.vars.get("x"), Some(""));
    }

    #[test]
    fn test_exit_unwinds_nested_constructs() {
        let mut ctx = ctx();
        match eval(&mut ctx, "for v in a b; do exit 3; done; x=after") {
            Err(ExecError::Exit(3)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // Nothing after exit runs.
        assert_eq!(ctx.vars.get("x"), None);
    }

    #[test]
    fn test_group_statement() {
        let mut ctx = ctx();
        assert_eq!(eval(&mut ctx, "(x=1; false)").unwrap(), 1);
        assert_eq!(ctx.vars.get("x"), Some("1"));
        // A group makes an assignment legal in program position.
        assert_eq!(eval(&mut ctx, "true && (y=2)").unwrap(), 0);
        assert_eq!(ctx.vars.get("y"), Some("2"));
    }

    #[test]
    fn test_background_returns_before_child_exits() {
        let mut ctx = ctx();
        let start = Instant::now();
        assert_eq!(eval(&mut ctx, "sleep 1 &").unwrap(), 0);
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(ctx.job_count(), 1);
        ctx.wait_for_jobs().unwrap();
    }

    #[test]
    fn test_background_pipeline_returns_before_children_exit() {
        let mut ctx = ctx();
        let start = Instant::now();
        assert_eq!(eval(&mut ctx, "sleep 1 | cat &").unwrap(), 0);
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(ctx.job_count(), 2);
        ctx.wait_for_jobs().unwrap();
    }

    #[test]
    fn test_wait_builtin_blocks_until_jobs_finish() {
        let mut ctx = ctx();
        let start = Instant::now();
        eval(&mut ctx, "sleep 0.3 &\nwait").unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(ctx.job_count(), 0);
    }
}
