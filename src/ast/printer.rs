//! AST Printer
//!
//! Indented textual dump of a parsed script, driven by the `--print-ast` and
//! `--print-ast-only` flags. The format is meant for eyeballing the tree, not
//! for machine consumption.

use std::io::{self, Write};

use crate::ast::types::{Conditional, ForLoop, Program, Script, Statement, StatementKind, VarAssign, Word};

fn indent(out: &mut dyn Write, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        write!(out, "  ")?;
    }
    Ok(())
}

fn write_words(out: &mut dyn Write, words: &[Word]) -> io::Result<()> {
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{}", word)?;
    }
    Ok(())
}

pub fn print_program(out: &mut dyn Write, program: &Program, depth: usize) -> io::Result<()> {
    match program {
        Program::Command(words) => {
            indent(out, depth)?;
            write!(out, "program: ")?;
            write_words(out, words)?;
            writeln!(out)
        }
        Program::Pipe(lhs, rhs) => print_pair(out, "pipe | programs:", lhs, rhs, depth),
        Program::And(lhs, rhs) => print_pair(out, "and && programs:", lhs, rhs, depth),
        Program::Or(lhs, rhs) => print_pair(out, "or || programs:", lhs, rhs, depth),
        Program::Group(script) => print_script(out, script, depth),
    }
}

fn print_pair(
    out: &mut dyn Write,
    label: &str,
    lhs: &Program,
    rhs: &Program,
    depth: usize,
) -> io::Result<()> {
    indent(out, depth)?;
    writeln!(out, "{}", label)?;
    print_program(out, lhs, depth + 1)?;
    print_program(out, rhs, depth + 1)
}

pub fn print_conditional(out: &mut dyn Write, cond: &Conditional, depth: usize) -> io::Result<()> {
    for (i, branch) in cond.branches.iter().enumerate() {
        indent(out, depth)?;
        writeln!(out, "{}if:", if i > 0 { "el" } else { "" })?;
        print_script(out, &branch.predicate, depth + 1)?;
        indent(out, depth)?;
        writeln!(out, "then:")?;
        print_script(out, &branch.body, depth + 1)?;
    }
    if let Some(else_block) = &cond.else_block {
        indent(out, depth)?;
        writeln!(out, "else:")?;
        print_script(out, else_block, depth + 1)?;
    }
    Ok(())
}

pub fn print_for_loop(out: &mut dyn Write, for_loop: &ForLoop, depth: usize) -> io::Result<()> {
    indent(out, depth)?;
    write!(out, "for {} in ", for_loop.variable)?;
    write_words(out, &for_loop.values)?;
    writeln!(out, "; {}do", if for_loop.parallel { "parallel " } else { "" })?;
    print_script(out, &for_loop.body, depth + 1)
}

pub fn print_var_assign(out: &mut dyn Write, assign: &VarAssign, depth: usize) -> io::Result<()> {
    indent(out, depth)?;
    write!(out, "var_assign: {} = ", assign.name)?;
    write_words(out, &assign.value)?;
    writeln!(out)
}

pub fn print_statement(out: &mut dyn Write, statement: &Statement, depth: usize) -> io::Result<()> {
    match &statement.kind {
        StatementKind::Command(program) => print_program(out, program, depth)?,
        StatementKind::Conditional(cond) => print_conditional(out, cond, depth)?,
        StatementKind::ForLoop(for_loop) => print_for_loop(out, for_loop, depth)?,
        StatementKind::Assign(assign) => print_var_assign(out, assign, depth)?,
    }
    if statement.background {
        indent(out, depth)?;
        writeln!(out, "(background)")?;
    }
    Ok(())
}

pub fn print_script(out: &mut dyn Write, script: &Script, depth: usize) -> io::Result<()> {
    indent(out, depth)?;
    writeln!(out, "script:")?;
    for statement in &script.statements {
        print_statement(out, statement, depth + 1)?;
    }
    Ok(())
}
