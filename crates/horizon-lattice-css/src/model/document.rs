//! The immutable stylesheet document.

use std::collections::HashMap;
use std::fmt;

use super::{FontFace, NamespaceDefinition, Rule};
use crate::source::Span;

/// A parsed stylesheet.
///
/// Built once by the parse entry point and read-only afterwards. All
/// collections keep source order.
///
/// # Example
///
/// ```
/// use horizon_lattice_css::prelude::*;
///
/// let source = SourceText::new("app.css", "@namespace s \"library://spark\"; s|Button { color: #f00; }");
/// let mut problems: Vec<Problem> = Vec::new();
/// let document = CssDocument::parse(&source, &mut problems).unwrap();
///
/// assert!(problems.is_empty());
/// assert_eq!(document.namespace_by_prefix("s").map(|ns| ns.uri.as_str()), Some("library://spark"));
/// assert_eq!(document.rules().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CssDocument {
    source_name: String,
    span: Span,
    namespaces: Vec<NamespaceDefinition>,
    font_faces: Vec<FontFace>,
    rules: Vec<Rule>,
    namespace_lookup: HashMap<String, usize>,
}

impl CssDocument {
    /// Assemble a document. The first declaration of each prefix wins the
    /// lookup.
    pub(crate) fn new(
        source_name: impl Into<String>,
        span: Span,
        namespaces: Vec<NamespaceDefinition>,
        font_faces: Vec<FontFace>,
        rules: Vec<Rule>,
    ) -> Self {
        let mut namespace_lookup = HashMap::with_capacity(namespaces.len());
        for (index, namespace) in namespaces.iter().enumerate() {
            namespace_lookup
                .entry(namespace.lookup_key().to_string())
                .or_insert(index);
        }

        Self {
            source_name: source_name.into(),
            span,
            namespaces,
            font_faces,
            rules,
            namespace_lookup,
        }
    }

    /// The name of the source this document was parsed from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The span of the whole input.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Style rules in source order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Namespace declarations in source order, duplicates excluded.
    pub fn namespaces(&self) -> &[NamespaceDefinition] {
        &self.namespaces
    }

    /// Font faces in source order.
    pub fn font_faces(&self) -> &[FontFace] {
        &self.font_faces
    }

    /// Look up a namespace by prefix; `""` finds the default namespace.
    pub fn namespace_by_prefix(&self, prefix: &str) -> Option<&NamespaceDefinition> {
        self.namespace_lookup
            .get(prefix)
            .and_then(|&index| self.namespaces.get(index))
    }

    /// The default namespace, if declared.
    pub fn default_namespace(&self) -> Option<&NamespaceDefinition> {
        self.namespace_by_prefix("")
    }

    /// Namespaces, then font faces, then rules; each block and each entry
    /// separated by a newline. Intended for golden-file tests.
    pub fn render_debug(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CssDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lines(f, &self.namespaces)?;
        f.write_str("\n")?;
        write_lines(f, &self.font_faces)?;
        f.write_str("\n")?;
        write_lines(f, &self.rules)
    }
}

fn write_lines<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
