//! Shell Builtins
//!
//! Commands that must run inside the shell process because they mutate shell
//! state: `exit`, `cd`, `pwd`, `wait`. Builtins execute in the parent even
//! when they appear inside a pipeline; only their output is routed through
//! the pipeline's pipe ends.

use std::io::{self, Write};

use crate::interpreter::errors::ExecError;
use crate::interpreter::types::{Context, RunContext};

pub fn is_builtin(name: &str) -> bool {
    matches!(name, "exit" | "cd" | "pwd" | "wait")
}

/// Run a builtin. `argv[0]` is the builtin name.
pub fn run_builtin(
    ctx: &mut Context,
    rctx: &RunContext,
    argv: &[String],
) -> Result<i32, ExecError> {
    match argv[0].as_str() {
        "exit" => builtin_exit(&argv[1..]),
        "cd" => Ok(builtin_cd(ctx, &argv[1..])),
        "pwd" => builtin_pwd(ctx, rctx),
        "wait" => builtin_wait(ctx),
        name => {
            // Unreachable while is_builtin and this match agree.
            eprintln!("lsh: {}: not a builtin", name);
            Ok(1)
        }
    }
}

fn builtin_exit(args: &[String]) -> Result<i32, ExecError> {
    let status = match args.first() {
        None => 0,
        Some(arg) => match arg.parse::<i32>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("lsh: exit: {}: numeric argument required", arg);
                2
            }
        },
    };
    Err(ExecError::Exit(status))
}

fn builtin_cd(ctx: &mut Context, args: &[String]) -> i32 {
    if args.len() > 1 {
        eprintln!("lsh: cd: too many arguments");
        return 1;
    }
    let target = match args.first() {
        Some(dir) => dir.clone(),
        None => match ctx.vars.get("HOME") {
            Some(home) => home.to_string(),
            None => {
                eprintln!("lsh: cd: HOME not set");
                return 1;
            }
        },
    };

    if let Err(err) = std::env::set_current_dir(&target) {
        eprintln!("lsh: cd: {}: {}", target, err);
        return 1;
    }
    // Record the canonical location, not the argument as typed.
    if let Ok(cwd) = std::env::current_dir() {
        ctx.vars.set("PWD", &cwd.to_string_lossy());
    }
    0
}

fn builtin_pwd(ctx: &Context, rctx: &RunContext) -> Result<i32, ExecError> {
    let cwd = match ctx.vars.get("PWD") {
        Some(pwd) => pwd.to_string(),
        None => std::env::current_dir()?.to_string_lossy().into_owned(),
    };
    write_line(rctx, &cwd)?;
    Ok(0)
}

fn builtin_wait(ctx: &mut Context) -> Result<i32, ExecError> {
    ctx.wait_for_jobs()?;
    Ok(0)
}

fn write_line(rctx: &RunContext, text: &str) -> io::Result<()> {
    match &rctx.stdout {
        Some(writer) => {
            let mut out = writer.try_clone()?;
            writeln!(out, "{}", text)
        }
        None => writeln!(io::stdout(), "{}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::vars::VarStore;
    use serial_test::serial;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("exit"));
        assert!(is_builtin("cd"));
        assert!(is_builtin("pwd"));
        assert!(is_builtin("wait"));
        assert!(!is_builtin("echo"));
    }

    #[test]
    fn test_exit_default_status() {
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();
        match run_builtin(&mut ctx, &rctx, &argv(&["exit"])) {
            Err(ExecError::Exit(0)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_exit_with_status() {
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();
        match run_builtin(&mut ctx, &rctx, &argv(&["exit", "42"])) {
            Err(ExecError::Exit(42)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_cd_changes_directory_and_pwd() {
        let original = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();

        let path = dir.path().to_string_lossy().into_owned();
        let rc = run_builtin(&mut ctx, &rctx, &argv(&["cd", &path])).unwrap();
        assert_eq!(rc, 0);
        let pwd = ctx.vars.get("PWD").unwrap().to_string();
        assert_eq!(
            std::fs::canonicalize(&pwd).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );

        std::env::set_current_dir(original).unwrap();
    }

    #[test]
    #[serial]
    fn test_cd_missing_directory_fails() {
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();
        let rc = run_builtin(&mut ctx, &rctx, &argv(&["cd", "/no/such/dir/anywhere"])).unwrap();
        assert_eq!(rc, 1);
    }

    #[test]
    fn test_cd_without_home_fails() {
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();
        let rc = run_builtin(&mut ctx, &rctx, &argv(&["cd"])).unwrap();
        assert_eq!(rc, 1);
    }

    #[test]
    fn test_wait_with_no_jobs() {
        let mut ctx = Context::with_vars(VarStore::new());
        let rctx = RunContext::inherit();
        let rc = run_builtin(&mut ctx, &rctx, &argv(&["wait"])).unwrap();
        assert_eq!(rc, 0);
    }
}
