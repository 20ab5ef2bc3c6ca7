//! AST module
//!
//! Node types for parsed scripts plus the textual tree printer.

pub mod printer;
pub mod types;

pub use types::*;
