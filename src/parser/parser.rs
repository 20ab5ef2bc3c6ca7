//! Recursive Descent Parser
//!
//! Consumes the token stream produced by the lexer and builds the AST.
//!
//! Precedence, loosest to tightest:
//! - statement separators (`;`, newline)
//! - `&&` / `||` (left-associative, equal precedence)
//! - `|` (left-associative)
//! - grouping `( ... )`
//!
//! Reserved words (`if`, `then`, `elif`, `else`, `fi`, `for`, `in`, `do`,
//! `done`, `parallel`) are only special in the positions the grammar expects
//! them; elsewhere they are ordinary words.

use crate::ast::{
    CondBranch, Conditional, ForLoop, Program, Script, Statement, StatementKind, VarAssign, Word,
};
use crate::parser::lexer::{Lexer, Token, TokenType};
use crate::parser::types::{is_valid_identifier, ParseException, MAX_PARSER_DEPTH};

/// Parse a complete source text into a script.
pub fn parse(input: &str) -> Result<Script, ParseException> {
    let tokens = Lexer::new(input)?.tokenize()?;
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Script, ParseException> {
        let script = self.parse_script(&[])?;
        if !self.check(TokenType::Eof) {
            return Err(self.error_here(format!(
                "unexpected '{}'",
                self.peek().value
            )));
        }
        Ok(script)
    }

    // =========================================================================
    // TOKEN HELPERS
    // =========================================================================

    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, so pos stays in bounds.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn is_separator(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::Semicolon | TokenType::Newline
        )
    }

    /// True if the current token is the given reserved word.
    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().token_type == TokenType::Word && self.peek().value == keyword
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token, ParseException> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected '{}', found '{}'",
                token_type.as_str(),
                self.describe_current()
            )))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseException> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!(
                "expected '{}', found '{}'",
                keyword,
                self.describe_current()
            )))
        }
    }

    fn describe_current(&self) -> String {
        let token = self.peek();
        match token.token_type {
            TokenType::Word | TokenType::Assignment => token.value.clone(),
            TokenType::Var => format!("${}", token.value),
            other => other.as_str().to_string(),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseException {
        let token = self.peek();
        ParseException::new(message, token.line, token.column)
    }

    // =========================================================================
    // GRAMMAR
    // =========================================================================

    /// Parse statements until EOF, `)`, or one of the given reserved words in
    /// statement position. The stopping token is left unconsumed.
    fn parse_script(&mut self, terminators: &[&str]) -> Result<Script, ParseException> {
        self.depth += 1;
        if self.depth > MAX_PARSER_DEPTH {
            return Err(self.error_here(format!(
                "nesting exceeds maximum depth of {}",
                MAX_PARSER_DEPTH
            )));
        }

        let mut statements = Vec::new();
        loop {
            while self.is_separator() {
                self.advance();
            }
            if self.check(TokenType::Eof) || self.check(TokenType::RParen) {
                break;
            }
            if terminators.iter().any(|kw| self.at_keyword(kw)) {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        self.depth -= 1;
        Ok(Script { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseException> {
        if self.check(TokenType::Assignment) {
            let assign = self.parse_assignment()?;
            self.reject_background("an assignment")?;
            return Ok(Statement::foreground(StatementKind::Assign(assign)));
        }
        if self.at_keyword("if") {
            let cond = self.parse_conditional()?;
            self.reject_background("a conditional")?;
            return Ok(Statement::foreground(StatementKind::Conditional(cond)));
        }
        if self.at_keyword("for") {
            let for_loop = self.parse_for_loop()?;
            self.reject_background("a for loop")?;
            return Ok(Statement::foreground(StatementKind::ForLoop(for_loop)));
        }

        let program = self.parse_and_or()?;
        let background = if self.check(TokenType::Amp) {
            if !can_background(&program) {
                return Err(self.error_here("'&' cannot follow '&&', '||', or a group"));
            }
            self.advance();
            true
        } else {
            false
        };
        Ok(Statement {
            kind: StatementKind::Command(program),
            background,
        })
    }

    /// `&` only backgrounds commands and pipelines.
    fn reject_background(&self, what: &str) -> Result<(), ParseException> {
        if self.check(TokenType::Amp) {
            Err(self.error_here(format!("'&' cannot follow {}", what)))
        } else {
            Ok(())
        }
    }

    fn parse_and_or(&mut self) -> Result<Program, ParseException> {
        let mut left = self.parse_pipeline()?;
        loop {
            let and = match self.peek().token_type {
                TokenType::AndAnd => true,
                TokenType::OrOr => false,
                _ => break,
            };
            self.advance();
            // Allow a line break after the operator.
            while self.check(TokenType::Newline) {
                self.advance();
            }
            let right = self.parse_pipeline()?;
            left = if and {
                Program::And(Box::new(left), Box::new(right))
            } else {
                Program::Or(Box::new(left), Box::new(right))
            };
        }
        Ok(left)
    }

    fn parse_pipeline(&mut self) -> Result<Program, ParseException> {
        let mut left = self.parse_unit()?;
        while self.check(TokenType::Pipe) {
            self.advance();
            while self.check(TokenType::Newline) {
                self.advance();
            }
            let right = self.parse_unit()?;
            left = Program::Pipe(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// One pipeline element: a parenthesized script or a bare command.
    fn parse_unit(&mut self) -> Result<Program, ParseException> {
        if self.check(TokenType::LParen) {
            self.advance();
            let script = self.parse_script(&[])?;
            self.expect(TokenType::RParen)?;
            return Ok(Program::Group(script));
        }
        self.parse_command()
    }

    fn parse_command(&mut self) -> Result<Program, ParseException> {
        let words = self.collect_words();
        if words.is_empty() {
            return Err(self.error_here(format!(
                "expected a command, found '{}'",
                self.describe_current()
            )));
        }
        Ok(Program::Command(words))
    }

    /// Collect consecutive word-like tokens. An assignment word outside
    /// statement-initial position is just a literal word.
    fn collect_words(&mut self) -> Vec<Word> {
        let mut words = Vec::new();
        loop {
            match self.peek().token_type {
                TokenType::Word | TokenType::Assignment => {
                    words.push(Word::literal(self.advance().value));
                }
                TokenType::Var => {
                    words.push(Word::var(self.advance().value));
                }
                _ => break,
            }
        }
        words
    }

    fn parse_conditional(&mut self) -> Result<Conditional, ParseException> {
        self.expect_keyword("if")?;

        let mut branches = Vec::new();
        loop {
            let predicate = self.parse_script(&["then"])?;
            self.expect_keyword("then")?;
            let body = self.parse_script(&["elif", "else", "fi"])?;
            branches.push(CondBranch { predicate, body });
            if self.at_keyword("elif") {
                self.advance();
            } else {
                break;
            }
        }

        let else_block = if self.at_keyword("else") {
            self.advance();
            Some(self.parse_script(&["fi"])?)
        } else {
            None
        };
        self.expect_keyword("fi")?;

        Ok(Conditional {
            branches,
            else_block,
        })
    }

    fn parse_for_loop(&mut self) -> Result<ForLoop, ParseException> {
        self.expect_keyword("for")?;

        let name_token = self.expect(TokenType::Word)?;
        if !is_valid_identifier(&name_token.value) {
            return Err(ParseException::new(
                format!("invalid loop variable name '{}'", name_token.value),
                name_token.line,
                name_token.column,
            ));
        }
        let variable = name_token.value;

        self.expect_keyword("in")?;
        let values = self.collect_words();

        while self.is_separator() {
            self.advance();
        }
        let parallel = if self.at_keyword("parallel") {
            self.advance();
            true
        } else {
            false
        };
        self.expect_keyword("do")?;
        let body = self.parse_script(&["done"])?;
        self.expect_keyword("done")?;

        Ok(ForLoop {
            variable,
            values,
            body,
            parallel,
        })
    }

    /// `NAME=value more words`: the assignment token carries `NAME=` plus the
    /// first chunk of the value; any following word tokens extend the value.
    fn parse_assignment(&mut self) -> Result<VarAssign, ParseException> {
        let token = self.expect(TokenType::Assignment)?;
        // The lexer only emits Assignment for `NAME=...` with a valid NAME.
        let eq = token.value.find('=').unwrap_or(token.value.len());
        let name = token.value[..eq].to_string();
        let rest = &token.value[eq + 1..];

        let mut value = Vec::new();
        if !rest.is_empty() {
            value.push(Word::literal(rest));
        }
        value.extend(self.collect_words());

        Ok(VarAssign { name, value })
    }
}

/// A statement may only go to the background if every part of it can launch
/// without waiting: plain commands and pipelines of them. `&&`/`||` and
/// groups run their pieces synchronously in the interpreter.
fn can_background(program: &Program) -> bool {
    match program {
        Program::Command(_) => true,
        Program::Pipe(lhs, rhs) => can_background(lhs) && can_background(rhs),
        Program::And(_, _) | Program::Or(_, _) | Program::Group(_) => false,
    }
}
