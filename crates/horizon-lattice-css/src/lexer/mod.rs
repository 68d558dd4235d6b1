//! Lexical analysis.
//!
//! Turns stylesheet text into a flat [`Token`] vector. Lexical problems are
//! reported and skipped; tokenization only fails when blocks nest deeper than
//! the configured limit.

mod token;
mod tokenizer;

pub use token::{Token, TokenKind};
pub use tokenizer::tokenize;
