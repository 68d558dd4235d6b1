//! Concrete syntax tree.
//!
//! Nodes reference tokens by index into the token vector produced by the
//! lexer, so the tree is only meaningful together with that vector. Every
//! node records the first and last token it covers for span recovery.

use std::fmt::Write as _;

use crate::lexer::Token;
use crate::source::Span;

/// One grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The whole input.
    Stylesheet,
    /// `@namespace prefix? uri;`
    NamespaceRule,
    /// The prefix identifier of a `@namespace` rule or a selector.
    NamespacePrefix,
    /// `@font-face { ... }`
    FontFaceRule,
    /// `@media queries { rules }`
    MediaRule,
    /// Comma-separated media queries.
    MediaQueryList,
    /// `only screen and (feature)`
    MediaQuery,
    /// `(name: value)`
    MediaFeature,
    /// Any other at-rule, kept as raw tokens.
    UnknownAtRule,
    /// `selectors { declarations }`
    Rule,
    /// Comma-separated selectors.
    SelectorList,
    /// Compound selectors joined by combinators.
    Selector,
    /// One compound selector (`s|Button.primary:hover`).
    SimpleSelector,
    /// Element name or `*`.
    ElementName,
    /// `#id`
    IdSelector,
    /// `.class`
    ClassSelector,
    /// `[name op value]`
    AttributeSelector,
    /// `:name`, `::name` or `:name(args)`
    PseudoSelector,
    /// Whitespace, `>`, `+` or `~` between compound selectors.
    Combinator,
    /// `{ declarations }`
    DeclarationBlock,
    /// `name: value !important`
    Declaration,
    /// Terms separated by operator tokens.
    Value,
    /// A single literal token.
    Term,
    /// `name(args)`
    FunctionCall,
    /// `name=value` inside function arguments.
    NamedArgument,
    /// Tokens skipped during error recovery.
    Error,
}

/// A child of a syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxElement {
    /// A nested production.
    Node(SyntaxNode),
    /// A token, by index.
    Token(usize),
}

impl SyntaxElement {
    fn first_token(&self) -> usize {
        match self {
            SyntaxElement::Node(node) => node.first_token,
            SyntaxElement::Token(index) => *index,
        }
    }

    fn last_token(&self) -> usize {
        match self {
            SyntaxElement::Node(node) => node.last_token,
            SyntaxElement::Token(index) => *index,
        }
    }
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    /// The production.
    pub kind: NodeKind,
    /// Index of the first token covered.
    pub first_token: usize,
    /// Index of the last token covered (inclusive).
    pub last_token: usize,
    /// Child nodes and tokens in source order.
    pub children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    /// Create a node; its token range comes from its children, or is the
    /// single token `at` when it has none.
    pub fn new(kind: NodeKind, children: Vec<SyntaxElement>, at: usize) -> Self {
        let first_token = children.first().map_or(at, SyntaxElement::first_token);
        let last_token = children.last().map_or(at, SyntaxElement::last_token);
        Self {
            kind,
            first_token,
            last_token,
            children,
        }
    }

    /// Child nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        })
    }

    /// Child token indices.
    pub fn tokens(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Token(index) => Some(*index),
            SyntaxElement::Node(_) => None,
        })
    }

    /// The first child node of the given kind.
    pub fn child(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.nodes().find(|node| node.kind == kind)
    }

    /// The source span from the first to the last covered token.
    pub fn span(&self, tokens: &[Token]) -> Span {
        let start = tokens.get(self.first_token).map(|t| t.span);
        let end = tokens.get(self.last_token).map(|t| t.span);
        match (start, end) {
            (Some(start), Some(end)) => start.to(end),
            (Some(span), None) | (None, Some(span)) => span,
            (None, None) => Span::default(),
        }
    }
}

/// The syntax tree of one stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub(crate) fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    /// The [`NodeKind::Stylesheet`] node.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// An indented outline of the tree, one node or token per line.
    pub fn dump(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        dump_node(&self.root, tokens, 0, &mut out);
        out
    }
}

fn dump_node(node: &SyntaxNode, tokens: &[Token], depth: usize, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{:?}", "", node.kind, indent = depth * 2);
    for child in &node.children {
        match child {
            SyntaxElement::Node(inner) => dump_node(inner, tokens, depth + 1, out),
            SyntaxElement::Token(index) => {
                let text = tokens.get(*index).map_or("", |t| t.text.as_str());
                let _ = writeln!(out, "{:indent$}{:?}", "", text, indent = (depth + 1) * 2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::source::Position;

    fn token(text: &str, column: u32) -> Token {
        let width = text.chars().count() as u32;
        Token::new(
            TokenKind::Ident(text.into()),
            text,
            Span::new(Position::new(1, column), Position::new(1, column + width)),
        )
    }

    #[test]
    fn range_comes_from_children() {
        let inner = SyntaxNode::new(NodeKind::Term, vec![SyntaxElement::Token(2)], 0);
        let node = SyntaxNode::new(
            NodeKind::Value,
            vec![SyntaxElement::Token(1), SyntaxElement::Node(inner)],
            0,
        );
        assert_eq!(node.first_token, 1);
        assert_eq!(node.last_token, 2);
    }

    #[test]
    fn empty_node_sits_at_position() {
        let node = SyntaxNode::new(NodeKind::Error, vec![], 4);
        assert_eq!((node.first_token, node.last_token), (4, 4));
    }

    #[test]
    fn span_covers_tokens() {
        let tokens = vec![token("a", 1), token("bc", 3)];
        let node = SyntaxNode::new(
            NodeKind::Value,
            vec![SyntaxElement::Token(0), SyntaxElement::Token(1)],
            0,
        );
        let span = node.span(&tokens);
        assert_eq!(span.start, Position::new(1, 1));
        assert_eq!(span.end, Position::new(1, 5));
    }
}
