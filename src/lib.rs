//! lsh: a line-oriented shell interpreter
//!
//! Parses a small shell grammar (commands, pipelines, `&&`/`||`, groups,
//! conditionals, for-loops, variable assignment, background jobs) and runs
//! it against real OS processes.

pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod shell;

pub use parser::{parse, ParseException};
pub use shell::{EvalOutcome, Shell};
