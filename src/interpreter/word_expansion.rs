//! Word Expansion
//!
//! Turns AST words into the argv strings handed to the OS. Expansion is a
//! two-step process: realize each word against the variable store, then split
//! the realized text on whitespace. A variable whose value contains spaces
//! therefore contributes multiple argv entries, and an unset variable
//! contributes none.

use crate::ast::Word;
use crate::interpreter::vars::VarStore;

/// Expand a word list into argv strings.
pub fn expand_words(store: &VarStore, words: &[Word]) -> Vec<String> {
    let mut argv = Vec::new();
    for word in words {
        let text = realize(store, word);
        argv.extend(text.split_whitespace().map(str::to_string));
    }
    argv
}

/// Expand a word list the way assignment values are consumed: the first
/// resulting field, or the empty string if expansion yields nothing.
pub fn expand_to_value(store: &VarStore, words: &[Word]) -> String {
    expand_words(store, words).into_iter().next().unwrap_or_default()
}

fn realize(store: &VarStore, word: &Word) -> String {
    match word {
        Word::Literal(text) => text.clone(),
        Word::Var(name) => store.get(name).unwrap_or("").to_string(),
    }
}
