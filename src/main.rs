//! lsh binary entry point
//!
//! Three ways in: `-c 'script'`, a script file argument, or stdin. When
//! stdin is a terminal and nothing else was given, an interactive prompt
//! starts instead.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lsh::ast::printer::print_script;
use lsh::parser::parse;
use lsh::shell::{EvalOutcome, Shell};

#[derive(Parser, Debug)]
#[command(name = "lsh", version, about = "A line-oriented shell interpreter")]
struct Cli {
    /// Run this script text and exit
    #[arg(short = 'c', value_name = "SCRIPT", conflicts_with = "file")]
    command: Option<String>,

    /// Print the parsed AST before executing
    #[arg(long)]
    print_ast: bool,

    /// Print the parsed AST and exit without executing
    #[arg(long)]
    print_ast_only: bool,

    /// Script file to run; reads stdin when omitted
    file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let status = match run(cli) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("lsh: {}", err);
            1
        }
    };
    process::exit(status);
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let source = if let Some(script) = &cli.command {
        Some(script.clone())
    } else if let Some(path) = &cli.file {
        Some(std::fs::read_to_string(path)?)
    } else if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Some(buf)
    };

    match source {
        Some(source) => run_batch(&cli, &source),
        None => run_interactive(&cli),
    }
}

/// Run a whole script from `-c`, a file, or piped stdin.
fn run_batch(cli: &Cli, source: &str) -> Result<i32, Box<dyn std::error::Error>> {
    let script = match parse(source) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("lsh: {}", err);
            return Ok(2);
        }
    };

    if cli.print_ast || cli.print_ast_only {
        print_script(&mut io::stdout(), &script, 0)?;
        if cli.print_ast_only {
            return Ok(0);
        }
    }

    let mut shell = Shell::new();
    Ok(shell.run(&script).status())
}

/// Read-eval-print loop for a terminal session.
fn run_interactive(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let mut editor = DefaultEditor::new()?;
    let mut shell = Shell::new();
    let mut last_status = 0;

    loop {
        match editor.readline("$ ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);

                let script = match parse(&line) {
                    Ok(script) => script,
                    Err(err) => {
                        eprintln!("lsh: {}", err);
                        last_status = 2;
                        continue;
                    }
                };
                if cli.print_ast || cli.print_ast_only {
                    print_script(&mut io::stdout(), &script, 0)?;
                    if cli.print_ast_only {
                        continue;
                    }
                }

                match shell.run(&script) {
                    EvalOutcome::Completed(status) => last_status = status,
                    EvalOutcome::Exit(status) => return Ok(status),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // ^C abandons the current line, not the shell.
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(last_status)
}
