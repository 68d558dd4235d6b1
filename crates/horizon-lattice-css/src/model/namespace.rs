//! `@namespace` declarations.

use std::fmt;

use crate::source::Span;

/// A namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDefinition {
    /// The prefix, or `None` for the default namespace.
    pub prefix: Option<String>,
    /// The namespace URI with quotes or `url()` removed.
    pub uri: String,
    /// Location of the whole `@namespace` rule.
    pub span: Span,
}

impl NamespaceDefinition {
    /// Create a namespace declaration.
    pub fn new(prefix: Option<String>, uri: impl Into<String>, span: Span) -> Self {
        Self {
            prefix,
            uri: uri.into(),
            span,
        }
    }

    /// The key used by the document's prefix lookup: the prefix, or `""` for
    /// the default namespace.
    pub fn lookup_key(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    /// Whether this declares the default namespace.
    pub fn is_default(&self) -> bool {
        self.prefix.is_none()
    }
}

impl fmt::Display for NamespaceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "@namespace {prefix} \"{}\";", self.uri),
            None => write!(f, "@namespace \"{}\";", self.uri),
        }
    }
}
