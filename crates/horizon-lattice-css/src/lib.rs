//! CSS frontend for Horizon Lattice.
//!
//! Turns stylesheet text into an immutable document model for component
//! styling:
//!
//! - **Lexing**: `cssparser`-based tokenization into a flat token stream
//! - **Parsing**: recursive descent into a concrete syntax tree with error recovery
//! - **Building**: namespace, font-face and rule collections with resolved
//!   selector namespaces and normalised values
//! - **Problems**: every recoverable error is reported to a caller-owned sink
//!   with a stable code, and parsing continues
//!
//! # Example
//!
//! ```
//! use horizon_lattice_css::prelude::*;
//!
//! let source = SourceText::new(
//!     "app.css",
//!     "@namespace s \"library://ns.adobe.com/flex/spark\";\n\
//!      s|Button { color: #ff0000; }",
//! );
//! let mut problems: Vec<Problem> = Vec::new();
//! let document = CssDocument::parse(&source, &mut problems).unwrap();
//!
//! assert!(problems.is_empty());
//! let rule = &document.rules()[0];
//! assert_eq!(rule.selectors[0].to_string(), "s|Button");
//! assert_eq!(
//!     rule.declaration("color").and_then(|d| d.value.as_color()),
//!     Some(Color::rgb(255, 0, 0))
//! );
//! ```

pub mod builder;
pub mod lexer;
pub mod logging;
pub mod model;
pub mod options;
pub mod parser;
pub mod problems;
pub mod source;

mod error;
mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{parse_css, parse_css_with_options};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::model::{
        Color, Combinator, CssDocument, Declaration, ElementSelector, FontFace, FontSource,
        MediaFeature, MediaQuery, NamespaceDefinition, Rule, Selector, SelectorCondition,
        SelectorPart, Value,
    };
    pub use crate::options::ParseOptions;
    pub use crate::problems::{Problem, ProblemKind, ProblemSink, Severity};
    pub use crate::source::{CharStream, Position, SourceText, Span};
    pub use crate::{parse_css, parse_css_with_options};
}
