//! Style rules and property declarations.

use std::fmt;

use super::{MediaQuery, Selector, Value};
use crate::source::Span;

/// A property declaration (`name: value !important`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name as written.
    pub name: String,
    /// The parsed value.
    pub value: Value,
    /// Whether `!important` was given.
    pub important: bool,
    /// Location of the declaration.
    pub span: Span,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            important: false,
            span: Span::default(),
        }
    }

    /// Whether this declares `name`. See [`same_property`].
    pub fn is(&self, name: &str) -> bool {
        same_property(&self.name, name)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// Compare property names, treating `fontFamily` and `font-family` as the
/// same name.
pub fn same_property(a: &str, b: &str) -> bool {
    let fold = |s: &str| {
        s.chars()
            .filter(|&c| c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect::<Vec<_>>()
    };
    fold(a) == fold(b)
}

/// A style rule: selectors, declarations and the media queries of the
/// enclosing `@media` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The selector group (never empty for parsed rules).
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Media queries of the enclosing `@media`; empty outside one.
    pub media: Vec<MediaQuery>,
    /// Location of the rule.
    pub span: Span,
}

impl Rule {
    /// Create a rule outside any `@media` block.
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
            media: vec![],
            span: Span::default(),
        }
    }

    /// The last declaration of `name`, which is the one that applies.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().rev().find(|d| d.is(name))
    }

    /// Media queries of the enclosing `@media` block.
    pub fn media(&self) -> &[MediaQuery] {
        &self.media
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.media.is_empty() {
            f.write_str("@media ")?;
            for (i, query) in self.media.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{query}")?;
            }
            f.write_str(" { ")?;
        }

        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        f.write_str(" {")?;
        for declaration in &self.declarations {
            write!(f, " {declaration};")?;
        }
        f.write_str(" }")?;

        if !self.media.is_empty() {
            f.write_str(" }")?;
        }
        Ok(())
    }
}
