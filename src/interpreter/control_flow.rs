//! Control Flow
//!
//! Conditionals and for-loops. Both are thin drivers over `run_script`: a
//! predicate is just a script whose status selects a branch, and a loop body
//! is a script run once per value.

use crate::ast::{Conditional, ForLoop};
use crate::interpreter::errors::ExecError;
use crate::interpreter::run_script;
use crate::interpreter::types::{Context, RunContext};
use crate::interpreter::word_expansion::expand_words;

/// Run an if/elif/else chain. Returns the selected body's status; when no
/// branch matches and there is no else, the last predicate's status stands.
pub fn run_conditional(
    ctx: &mut Context,
    rctx: &RunContext,
    cond: &Conditional,
) -> Result<i32, ExecError> {
    let mut status = 0;
    for branch in &cond.branches {
        status = run_script(ctx, rctx, &branch.predicate)?;
        if status == 0 {
            return run_script(ctx, rctx, &branch.body);
        }
    }
    match &cond.else_block {
        Some(else_block) => run_script(ctx, rctx, else_block),
        None => Ok(status),
    }
}

/// Run a for-loop. Values are expanded once, before the first iteration, so
/// a body that reassigns a value variable does not change the iteration set.
/// The `parallel` keyword is accepted but iterations run sequentially.
pub fn run_for_loop(
    ctx: &mut Context,
    rctx: &RunContext,
    for_loop: &ForLoop,
) -> Result<i32, ExecError> {
    let values = expand_words(&ctx.vars, &for_loop.values);
    let mut status = 0;
    for value in values {
        ctx.vars.set(&for_loop.variable, &value);
        status = run_script(ctx, rctx, &for_loop.body)?;
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::vars::VarStore;
    use crate::parser::parse;

    fn ctx() -> Context {
        let mut vars = VarStore::new();
        vars.set("PATH", "/usr/bin:/bin");
        Context::with_vars(vars)
    }

    fn eval(ctx: &mut Context, source: &str) -> i32 {
        let script = parse(source).unwrap();
        run_script(ctx, &RunContext::inherit(), &script).unwrap()
    }

    #[test]
    fn test_if_takes_then_branch() {
        let mut ctx = ctx();
        assert_eq!(eval(&mut ctx, "if true; then x=then; else x=else; fi"), 0);
        assert_eq!(ctx.vars.get("x"), Some("then"));
    }

    #[test]
    fn test_if_takes_else_branch() {
        let mut ctx = ctx();
        eval(&mut ctx, "if false; then x=then; else x=else; fi");
        assert_eq!(ctx.vars.get("x"), Some("else"));
    }

    #[test]
    fn test_elif_chain() {
        let mut ctx = ctx();
        eval(&mut ctx, "if false; then x=a; elif true; then x=b; else x=c; fi");
        assert_eq!(ctx.vars.get("x"), Some("b"));
    }

    #[test]
    fn test_no_match_without_else_keeps_predicate_status() {
        let mut ctx = ctx();
        assert_eq!(eval(&mut ctx, "if false; then x=a; fi"), 1);
        assert_eq!(ctx.vars.get("x"), None);
    }

    #[test]
    fn test_for_loop_iterates_values() {
        let mut ctx = ctx();
        eval(&mut ctx, "for v in a b c; do last=$v; done");
        assert_eq!(ctx.vars.get("last"), Some("c"));
        assert_eq!(ctx.vars.get("v"), Some("c"));
    }

    #[test]
    fn test_for_loop_expands_values_once() {
        let mut ctx = ctx();
        ctx.vars.set("items", "1 2 3");
        eval(&mut ctx, "for v in $items; do items=replaced; last=$v; done");
        assert_eq!(ctx.vars.get("last"), Some("3"));
    }

    #[test]
    fn test_for_loop_over_nothing_is_ok() {
        let mut ctx = ctx();
        assert_eq!(eval(&mut ctx, "for v in $unset; do x=ran; done"), 0);
        assert_eq!(ctx.vars.get("x"), None);
    }
}
