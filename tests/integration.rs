//! End-to-end tests that drive the built `lsh` binary.

use std::io::Write;
use std::process::{Command, Stdio};

fn lsh() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lsh"))
}

/// Run `lsh -c <script>` and capture the result.
fn run_script(script: &str) -> std::process::Output {
    lsh()
        .arg("-c")
        .arg(script)
        .output()
        .expect("failed to run lsh")
}

fn stdout_of(script: &str) -> String {
    let output = run_script(script);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn runs_a_simple_command() {
    let output = run_script("echo hello");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
}

#[test]
fn expands_variables() {
    assert_eq!(stdout_of("x=5; echo $x"), "5\n");
    assert_eq!(stdout_of("x=5; echo ${x} $x"), "5 5\n");
}

#[test]
fn splits_spaced_variable_values() {
    // A value with spaces contributes one argument per field.
    let output = lsh()
        .arg("-c")
        .arg("echo $SPACED | wc -w")
        .env("SPACED", "a b c")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3");
}

#[test]
fn unset_variable_expands_to_nothing() {
    assert_eq!(stdout_of("echo a $missing b"), "a b\n");
}

#[test]
fn and_skips_rhs_on_failure() {
    let output = run_script("false && echo no");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn or_skips_rhs_on_success() {
    let output = run_script("true || echo no");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn or_runs_rhs_on_failure() {
    assert_eq!(stdout_of("false || echo rescued"), "rescued\n");
}

#[test]
fn pipeline_moves_data() {
    assert_eq!(stdout_of("echo hello | cat"), "hello\n");
}

#[test]
fn pipeline_status_is_last_stage() {
    assert!(run_script("false | true").status.success());
    assert!(!run_script("true | false").status.success());
}

#[test]
fn group_feeds_pipeline() {
    assert_eq!(stdout_of("(echo a; echo b) | wc -l"), "2\n");
}

#[test]
fn for_loop_iterates() {
    assert_eq!(stdout_of("for x in 1 2 3; do echo $x; done"), "1\n2\n3\n");
}

#[test]
fn conditional_picks_branch() {
    assert_eq!(
        stdout_of("if false; then echo t; elif true; then echo e; else echo l; fi"),
        "e\n"
    );
}

#[test]
fn exit_sets_process_status() {
    let output = run_script("exit 42");
    assert_eq!(output.status.code(), Some(42));
}

#[test]
fn exit_stops_the_script() {
    let output = run_script("echo before; exit 3; echo after");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "before\n");
}

#[test]
fn last_statement_status_is_process_status() {
    assert_eq!(run_script("true; false").status.code(), Some(1));
    assert_eq!(run_script("false; true").status.code(), Some(0));
}

#[test]
fn command_not_found_is_127() {
    let output = run_script("no-such-command-here");
    assert_eq!(output.status.code(), Some(127));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("command not found"));
}

#[test]
fn parse_error_exits_2() {
    let output = run_script("if true; then");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parse error"));
}

#[test]
fn comments_are_ignored() {
    assert_eq!(stdout_of("# nothing here\necho ok # trailing"), "ok\n");
}

#[test]
fn wait_blocks_until_background_jobs_finish() {
    let output = run_script("sleep 0.2 &\nwait\necho done");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "done\n");
}

#[test]
fn reads_script_from_stdin() {
    let mut child = lsh()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn lsh");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo from-stdin\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "from-stdin\n");
}

#[test]
fn reads_script_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.lsh");
    std::fs::write(&path, "x=filetest\necho $x\n").unwrap();
    let output = lsh().arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "filetest\n");
}

#[test]
fn print_ast_only_skips_execution() {
    let output = lsh()
        .arg("--print-ast-only")
        .arg("-c")
        .arg("echo $HOME | wc")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("script:"));
    assert!(stdout.contains("pipe | programs:"));
    assert!(stdout.contains("program: echo $HOME"));
    // Nothing was executed, so wc printed no counts.
    assert!(!stdout.contains(" 0 "));
}

#[test]
fn print_ast_then_runs() {
    let output = lsh()
        .arg("--print-ast")
        .arg("-c")
        .arg("echo ran")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("script:"));
    assert!(stdout.contains("ran\n"));
}
