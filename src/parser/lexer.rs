//! Lexer for lsh Scripts
//!
//! The lexer tokenizes input into a stream of tokens that the parser
//! consumes. It handles:
//! - Operators and separators (`; & && | || ( )`, newline)
//! - Words and `$NAME` / `${NAME}` variable references
//! - `NAME=value` assignment words
//! - `#` comments
//!
//! There is no quoting or escaping: the source grammar does not have any.
//! Reserved words (`if`, `for`, `done`, ...) are plain words at this level;
//! the parser gives them meaning in command position only.

use crate::parser::types::{ParseException, MAX_INPUT_SIZE};

/// Token types for the lsh lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Eof,

    // Separators
    Newline,
    Semicolon,
    Amp, // &

    // Operators
    Pipe,   // |
    AndAnd, // &&
    OrOr,   // ||

    // Grouping
    LParen, // (
    RParen, // )

    // Words
    Word,
    Var,        // $NAME or ${NAME}
    Assignment, // NAME=value
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eof => "EOF",
            Self::Newline => "NEWLINE",
            Self::Semicolon => ";",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Word => "WORD",
            Self::Var => "VAR",
            Self::Assignment => "ASSIGNMENT",
        }
    }
}

/// A token produced by the lexer.
///
/// `value` holds the word text for `Word`, the variable name (without `$`)
/// for `Var`, and the full `NAME=value` text for `Assignment`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            value: value.into(),
            line,
            column,
        }
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

/// Characters that terminate a word.
fn is_word_break(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | '&' | '|' | '(' | ')' | '$')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Lexer {
    pub fn new(input: &str) -> Result<Self, ParseException> {
        if input.len() > MAX_INPUT_SIZE {
            return Err(ParseException::new(
                format!("input exceeds maximum size of {} bytes", MAX_INPUT_SIZE),
                1,
                1,
            ));
        }
        Ok(Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        })
    }

    /// Tokenize the whole input, ending with an Eof token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseException> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token_type == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_blanks_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c == '#' {
                // Comment runs to end of line; the newline itself is a token.
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c != '\n' && c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseException> {
        self.skip_blanks_and_comments();

        let line = self.line;
        let column = self.column;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::new(TokenType::Eof, "", line, column)),
        };

        match c {
            '\n' => {
                self.advance();
                Ok(Token::new(TokenType::Newline, "\n", line, column))
            }
            ';' => {
                self.advance();
                Ok(Token::new(TokenType::Semicolon, ";", line, column))
            }
            '&' => {
                self.advance();
                if self.peek() == Some('&') {
                    self.advance();
                    Ok(Token::new(TokenType::AndAnd, "&&", line, column))
                } else {
                    Ok(Token::new(TokenType::Amp, "&", line, column))
                }
            }
            '|' => {
                self.advance();
                if self.peek() == Some('|') {
                    self.advance();
                    Ok(Token::new(TokenType::OrOr, "||", line, column))
                } else {
                    Ok(Token::new(TokenType::Pipe, "|", line, column))
                }
            }
            '(' => {
                self.advance();
                Ok(Token::new(TokenType::LParen, "(", line, column))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenType::RParen, ")", line, column))
            }
            '$' => self.read_var(line, column),
            _ => Ok(self.read_word(line, column)),
        }
    }

    /// Read `$NAME` or `${NAME}`. A `$` not followed by a name is a parse
    /// error; the grammar has no other use for the character.
    fn read_var(&mut self, line: usize, column: usize) -> Result<Token, ParseException> {
        self.advance(); // consume '$'

        let braced = self.peek() == Some('{');
        if braced {
            self.advance();
        }

        if !self.peek().map(is_ident_start).unwrap_or(false) {
            return Err(ParseException::new(
                "expected variable name after '$'",
                line,
                column,
            ));
        }

        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if braced {
            if self.peek() != Some('}') {
                return Err(ParseException::new(
                    format!("unterminated '${{{}'", name),
                    line,
                    column,
                ));
            }
            self.advance();
        }

        Ok(Token::new(TokenType::Var, name, line, column))
    }

    /// Read a plain word, classifying `NAME=...` as an assignment word.
    fn read_word(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_word_break(c) {
                break;
            }
            text.push(c);
            self.advance();
        }

        if is_assignment_word(&text) {
            Token::new(TokenType::Assignment, text, line, column)
        } else {
            Token::new(TokenType::Word, text, line, column)
        }
    }
}

/// True if `text` starts with `NAME=` where NAME is a valid identifier.
fn is_assignment_word(text: &str) -> bool {
    match text.find('=') {
        Some(pos) if pos > 0 => {
            let name = &text[..pos];
            name.starts_with(is_ident_start) && name.chars().all(is_ident_char)
        }
        _ => false,
    }
}
