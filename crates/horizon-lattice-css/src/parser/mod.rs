//! Syntax analysis.
//!
//! A recursive-descent parser over the lexer's tokens. The resulting
//! [`SyntaxTree`] references tokens by index and keeps tokens skipped during
//! error recovery in [`NodeKind::Error`] nodes.

mod grammar;
mod tree;

pub use grammar::parse_tokens;
pub use tree::{NodeKind, SyntaxElement, SyntaxNode, SyntaxTree};
