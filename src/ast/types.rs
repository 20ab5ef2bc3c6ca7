//! Abstract Syntax Tree Types
//!
//! This module defines the AST for lsh scripts. The design follows the
//! source grammar (pipelines, boolean combinators, conditionals, for-loops,
//! variable assignment) while being Rust-idiomatic: every "exactly one of
//! these fields is set" shape in the grammar is a closed enum here, so an
//! invalid node is unrepresentable.

use std::fmt;

// =============================================================================
// WORDS
// =============================================================================

/// A single word of a command: either literal text or a variable reference
/// (`$NAME` / `${NAME}` in source form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    Literal(String),
    Var(String),
}

impl Word {
    pub fn literal(text: impl Into<String>) -> Self {
        Word::Literal(text.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Word::Var(name.into())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Literal(text) => write!(f, "{}", text),
            Word::Var(name) => write!(f, "${}", name),
        }
    }
}

// =============================================================================
// PROGRAMS
// =============================================================================

/// A program node: one external command, a binary composition of two
/// sub-programs, or a nested script wrapped so a compound script can appear
/// wherever a program is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    /// Leaf: the unexpanded argv of one command, `words[0]` naming it.
    Command(Vec<Word>),
    /// `lhs | rhs` — lhs stdout feeds rhs stdin, both run concurrently.
    Pipe(Box<Program>, Box<Program>),
    /// `lhs && rhs` — rhs runs only if lhs succeeded.
    And(Box<Program>, Box<Program>),
    /// `lhs || rhs` — rhs runs only if lhs failed.
    Or(Box<Program>, Box<Program>),
    /// `( script )` — a nested script in program position.
    Group(Script),
}

// =============================================================================
// STATEMENTS & SCRIPTS
// =============================================================================

/// One executable unit of a script.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Run without waiting (`... &`).
    pub background: bool,
}

impl Statement {
    pub fn foreground(kind: StatementKind) -> Self {
        Self { kind, background: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Command(Program),
    Conditional(Conditional),
    ForLoop(ForLoop),
    Assign(VarAssign),
}

/// An ordered sequence of statements, executed top to bottom. The script's
/// result is the result of the last statement executed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub statements: Vec<Statement>,
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

/// An if/elif chain plus optional else block. Branches are tried in order;
/// the first predicate script returning status 0 selects its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub branches: Vec<CondBranch>,
    pub else_block: Option<Script>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondBranch {
    pub predicate: Script,
    pub body: Script,
}

/// `for NAME in words; do body done`. The iterable words are expanded once,
/// before the first iteration. The `parallel` flag is accepted by the grammar
/// and shown by the printer but iterations always run sequentially.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: String,
    pub values: Vec<Word>,
    pub body: Script,
    pub parallel: bool,
}

/// `NAME=words`. Expansion of the value words yields the assigned text; only
/// the first resulting token is used (an empty expansion assigns "").
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssign {
    pub name: String,
    pub value: Vec<Word>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_display() {
        assert_eq!(Word::literal("echo").to_string(), "echo");
        assert_eq!(Word::var("HOME").to_string(), "$HOME");
    }

    #[test]
    fn test_statement_foreground() {
        let stmt = Statement::foreground(StatementKind::Command(Program::Command(vec![
            Word::literal("true"),
        ])));
        assert!(!stmt.background);
    }
}
