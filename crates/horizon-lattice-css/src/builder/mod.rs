//! Model building.
//!
//! Walks the syntax tree in document order and produces the [`CssDocument`].
//! Semantic checks happen here: duplicate namespace prefixes, duplicate
//! font-face descriptors, misplaced at-rules, invalid colors and unknown
//! selector prefixes are reported to the sink while the walk continues.

mod selectors;
mod values;

use std::collections::HashMap;

use crate::lexer::{Token, TokenKind};
use crate::logging::targets;
use crate::model::{
    CssDocument, Declaration, FontFace, MediaFeature, MediaQualifier, MediaQuery,
    NamespaceDefinition, Rule,
};
use crate::options::ParseOptions;
use crate::parser::{NodeKind, SyntaxNode, SyntaxTree};
use crate::problems::{Problem, ProblemKind, ProblemSink, TracingSink};
use crate::source::Span;

/// Build the document for a parsed stylesheet.
///
/// `tokens` must be the vector `tree` was parsed from.
pub fn build_document(
    source_name: &str,
    tokens: &[Token],
    tree: &SyntaxTree,
    options: &ParseOptions,
    sink: &mut dyn ProblemSink,
) -> CssDocument {
    let builder = Builder {
        tokens,
        source_name,
        options,
        sink: TracingSink::new(sink, targets::BUILDER),
        namespaces: vec![],
        namespace_lookup: HashMap::new(),
        font_faces: vec![],
        rules: vec![],
    };
    builder.walk(tree.root())
}

struct Builder<'a, 's> {
    tokens: &'a [Token],
    source_name: &'a str,
    options: &'a ParseOptions,
    sink: TracingSink<'s>,
    namespaces: Vec<NamespaceDefinition>,
    /// Prefix (`""` for default) → index into `namespaces`, for namespaces
    /// declared so far.
    namespace_lookup: HashMap<String, usize>,
    font_faces: Vec<FontFace>,
    rules: Vec<Rule>,
}

impl<'a> Builder<'a, '_> {
    fn walk(mut self, root: &SyntaxNode) -> CssDocument {
        for statement in root.nodes() {
            match statement.kind {
                NodeKind::NamespaceRule => self.namespace_rule(statement),
                NodeKind::FontFaceRule => self.font_face_rule(statement),
                NodeKind::MediaRule => self.media_rule(statement),
                NodeKind::Rule => {
                    if let Some(rule) = self.rule(statement, &[]) {
                        self.rules.push(rule);
                    }
                }
                NodeKind::UnknownAtRule => self.invalid_at_rule(statement),
                _ => {}
            }
        }

        tracing::debug!(
            target: targets::BUILDER,
            "Built {}: {} namespaces, {} font faces, {} rules ({} problems)",
            self.source_name,
            self.namespaces.len(),
            self.font_faces.len(),
            self.rules.len(),
            self.sink.count()
        );

        CssDocument::new(
            self.source_name,
            root.span(self.tokens),
            self.namespaces,
            self.font_faces,
            self.rules,
        )
    }

    // === Helpers ===

    fn token(&self, index: usize) -> Option<&'a Token> {
        self.tokens.get(index)
    }

    fn kind(&self, index: usize) -> Option<&'a TokenKind> {
        self.token(index).map(|t| &t.kind)
    }

    /// The identifier payload of a token.
    fn ident(&self, index: usize) -> Option<&'a str> {
        match self.kind(index)? {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn report(&mut self, kind: ProblemKind, span: Span, params: &[(&str, &str)]) {
        let mut problem = Problem::new(kind, self.source_name, span);
        for (name, value) in params {
            problem = problem.with_param(*name, *value);
        }
        self.sink.append(problem);
    }

    // === Statements ===

    fn namespace_rule(&mut self, node: &SyntaxNode) {
        let prefix = node
            .child(NodeKind::NamespacePrefix)
            .and_then(|p| p.tokens().next())
            .and_then(|index| self.ident(index))
            .map(String::from);

        let uri = node.tokens().find_map(|index| match self.kind(index)? {
            TokenKind::String(uri) | TokenKind::Url(uri) => Some(uri.clone()),
            _ => None,
        });
        let Some(uri) = uri else {
            return;
        };

        let span = node.span(self.tokens);
        let key = prefix.clone().unwrap_or_default();

        if self.namespace_lookup.contains_key(&key) {
            self.report(ProblemKind::DuplicateNamespace, span, &[("prefix", key.as_str())]);
            return;
        }

        tracing::trace!(target: targets::BUILDER, "Namespace '{}' -> {}", key, uri);
        self.namespace_lookup.insert(key, self.namespaces.len());
        self.namespaces.push(NamespaceDefinition::new(prefix, uri, span));
    }

    fn font_face_rule(&mut self, node: &SyntaxNode) {
        let mut descriptors: Vec<Declaration> = vec![];

        if let Some(block) = node.child(NodeKind::DeclarationBlock) {
            for declaration in self.declarations(block) {
                match descriptors.iter().position(|d| d.is(&declaration.name)) {
                    Some(existing) => {
                        self.report(
                            ProblemKind::DuplicateDescriptor,
                            declaration.span,
                            &[("property", declaration.name.as_str())],
                        );
                        // Last value wins; the descriptor keeps its first position.
                        descriptors[existing] = declaration;
                    }
                    None => descriptors.push(declaration),
                }
            }
        }

        self.font_faces.push(FontFace::new(descriptors, node.span(self.tokens)));
    }

    fn media_rule(&mut self, node: &SyntaxNode) {
        let media = node
            .child(NodeKind::MediaQueryList)
            .map(|list| {
                list.nodes()
                    .filter(|q| q.kind == NodeKind::MediaQuery)
                    .map(|q| self.media_query(q))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        for statement in node.nodes() {
            match statement.kind {
                NodeKind::Rule => {
                    if let Some(rule) = self.rule(statement, &media) {
                        self.rules.push(rule);
                    }
                }
                NodeKind::UnknownAtRule => self.invalid_at_rule(statement),
                _ => {}
            }
        }
    }

    fn invalid_at_rule(&mut self, node: &SyntaxNode) {
        let name = match self.kind(node.first_token) {
            Some(TokenKind::AtKeyword(name)) => name.as_str(),
            _ => "",
        };
        self.report(
            ProblemKind::InvalidAtRule,
            node.span(self.tokens),
            &[("name", name)],
        );
    }

    // === Media queries ===

    fn media_query(&mut self, node: &SyntaxNode) -> MediaQuery {
        let words: Vec<&str> = node
            .tokens()
            .filter_map(|index| self.ident(index))
            .filter(|word| !word.eq_ignore_ascii_case("and"))
            .collect();

        let (qualifier, media_type) = match words.as_slice() {
            [qualifier, media_type, ..] => (
                if qualifier.eq_ignore_ascii_case("not") {
                    Some(MediaQualifier::Not)
                } else {
                    Some(MediaQualifier::Only)
                },
                Some(media_type.to_string()),
            ),
            [media_type] => (None, Some(media_type.to_string())),
            [] => (None, None),
        };

        let features = node
            .nodes()
            .filter(|n| n.kind == NodeKind::MediaFeature)
            .filter_map(|feature| {
                let name = feature.tokens().find_map(|index| self.ident(index))?;
                let value = feature
                    .child(NodeKind::Value)
                    .and_then(|value| self.value(value));
                Some(MediaFeature::new(name, value))
            })
            .collect();

        MediaQuery {
            qualifier,
            media_type,
            features,
        }
    }

    // === Rules ===

    fn rule(&mut self, node: &SyntaxNode, media: &[MediaQuery]) -> Option<Rule> {
        let selectors = self.selector_list(node.child(NodeKind::SelectorList)?);
        if selectors.is_empty() {
            return None;
        }

        let declarations = node
            .child(NodeKind::DeclarationBlock)
            .map(|block| self.declarations(block))
            .unwrap_or_default();

        Some(Rule {
            selectors,
            declarations,
            media: media.to_vec(),
            span: node.span(self.tokens),
        })
    }

    fn declarations(&mut self, block: &SyntaxNode) -> Vec<Declaration> {
        block
            .nodes()
            .filter(|n| n.kind == NodeKind::Declaration)
            .filter_map(|n| self.declaration(n))
            .collect()
    }

    fn declaration(&mut self, node: &SyntaxNode) -> Option<Declaration> {
        let name = self.ident(node.first_token)?;
        let value = self.value(node.child(NodeKind::Value)?)?;
        let important = node
            .tokens()
            .any(|index| matches!(self.kind(index), Some(TokenKind::Important)));

        Some(Declaration {
            name: name.to_string(),
            value,
            important,
            span: node.span(self.tokens),
        })
    }
}
