//! Parser module
//!
//! Lexer, recursive descent parser, and shared parser types.

pub mod lexer;
pub mod parser;
pub mod types;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{parse, Parser};
pub use types::{is_valid_identifier, ParseException, MAX_INPUT_SIZE, MAX_PARSER_DEPTH};
