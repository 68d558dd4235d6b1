//! Recursive-descent parser for the stylesheet dialect.
//!
//! The parser never fails as a whole. Errors inside a declaration skip to the
//! next `;` or `}`; errors inside a rule skip past the `}` that closes it;
//! errors inside an at-rule skip to its `;` or past its block. Each skip
//! reports exactly one problem, and skipped tokens are kept in
//! [`NodeKind::Error`] nodes so the tree still covers them.

use super::tree::{NodeKind, SyntaxElement, SyntaxNode, SyntaxTree};
use crate::lexer::{Token, TokenKind};
use crate::logging::targets;
use crate::problems::{Problem, ProblemKind, ProblemSink, TracingSink};
use crate::source::Span;

/// Build the syntax tree for `tokens`, reporting syntax problems to `sink`.
pub fn parse_tokens(source_name: &str, tokens: &[Token], sink: &mut dyn ProblemSink) -> SyntaxTree {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_name,
        sink: TracingSink::new(sink, targets::PARSER),
    };

    let root = parser.stylesheet();

    tracing::debug!(
        target: targets::PARSER,
        "Parsed {} top-level statements from {} ({} problems)",
        root.children.len(),
        source_name,
        parser.sink.count()
    );

    SyntaxTree::new(root)
}

/// A problem found while parsing, reported once by whoever recovers from it.
#[derive(Debug)]
struct SyntaxError {
    kind: ProblemKind,
    span: Span,
    params: Vec<(&'static str, String)>,
}

impl SyntaxError {
    fn new(kind: ProblemKind, span: Span) -> Self {
        Self {
            kind,
            span,
            params: vec![],
        }
    }

    fn with_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }
}

type Parsed<T> = std::result::Result<T, SyntaxError>;

static EOF_KIND: TokenKind = TokenKind::Eof;

struct Parser<'a, 's> {
    tokens: &'a [Token],
    pos: usize,
    source_name: &'a str,
    sink: TracingSink<'s>,
}

fn node(kind: NodeKind, children: Vec<SyntaxElement>, at: usize) -> SyntaxNode {
    SyntaxNode::new(kind, children, at)
}

fn leaf(kind: NodeKind, index: usize) -> SyntaxElement {
    SyntaxElement::Node(SyntaxNode::new(
        kind,
        vec![SyntaxElement::Token(index)],
        index,
    ))
}

fn starts_simple_selector(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Asterisk
            | TokenKind::Pipe
            | TokenKind::Hash { .. }
            | TokenKind::Dot
            | TokenKind::LeftBracket
            | TokenKind::Colon
    )
}

fn starts_term(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number(_)
            | TokenKind::Percentage(_)
            | TokenKind::Dimension { .. }
            | TokenKind::String(_)
            | TokenKind::Ident(_)
            | TokenKind::Hash { .. }
            | TokenKind::Url(_)
            | TokenKind::Function(_)
    )
}

fn is_attribute_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equals
            | TokenKind::IncludeMatch
            | TokenKind::DashMatch
            | TokenKind::PrefixMatch
            | TokenKind::SuffixMatch
            | TokenKind::SubstringMatch
    )
}

impl Parser<'_, '_> {
    // === Token navigation ===

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).or(self.tokens.last())
    }

    fn peek(&self) -> &TokenKind {
        self.current().map_or(&EOF_KIND, |t| &t.kind)
    }

    /// The raw token `offset` positions ahead, whitespace included.
    fn peek_raw(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    /// The next non-whitespace token after the current one.
    fn peek_next_significant(&self) -> Option<&TokenKind> {
        self.tokens
            .get(self.pos + 1..)?
            .iter()
            .find(|t| !t.is_whitespace())
            .map(|t| &t.kind)
    }

    fn current_span(&self) -> Span {
        self.current().map(|t| t.span).unwrap_or_default()
    }

    fn span_of(&self, index: usize) -> Span {
        self.tokens.get(index).map(|t| t.span).unwrap_or_default()
    }

    fn text_of(&self, index: usize) -> &str {
        self.tokens.get(index).map_or("", |t| t.text.as_str())
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    /// Consume the current token and return its index. Never moves past EOF.
    fn bump(&mut self) -> usize {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        if !self.at_eof() {
            self.pos += 1;
        }
        index
    }

    /// Skip whitespace, returning the index of the first whitespace token.
    fn skip_ws(&mut self) -> Option<usize> {
        let mut first = None;
        while matches!(self.peek(), TokenKind::Whitespace) {
            let index = self.bump();
            first.get_or_insert(index);
        }
        first
    }

    // === Problems ===

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = self
            .current()
            .map_or_else(|| "end of input".to_string(), Token::describe);
        SyntaxError::new(ProblemKind::UnexpectedToken, self.current_span())
            .with_param("expected", expected)
            .with_param("found", found)
    }

    fn malformed_selector(&self, reason: impl Into<String>) -> SyntaxError {
        SyntaxError::new(ProblemKind::MalformedSelector, self.current_span())
            .with_param("reason", reason)
    }

    fn malformed_media(&self, reason: impl Into<String>) -> SyntaxError {
        SyntaxError::new(ProblemKind::MalformedMediaQuery, self.current_span())
            .with_param("reason", reason)
    }

    fn found(&self) -> String {
        self.current()
            .map_or_else(|| "end of input".to_string(), Token::describe)
    }

    fn report(&mut self, error: SyntaxError) {
        let mut problem = Problem::new(error.kind, self.source_name, error.span);
        for (name, value) in error.params {
            problem = problem.with_param(name, value);
        }
        self.sink.append(problem);
    }

    // === Recovery ===

    /// Skip to the next `;` (consumed) or `}` (left in place) outside nested
    /// blocks.
    fn recover_declaration(&mut self) -> SyntaxNode {
        let at = self.pos;
        let mut skipped = vec![];
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            let stop_after = depth == 0 && matches!(kind, TokenKind::Semicolon);
            let stop_before =
                matches!(kind, TokenKind::Eof) || (depth == 0 && matches!(kind, TokenKind::RightBrace));
            let opens = kind.opens_block();
            let closes = matches!(
                kind,
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket
            );

            if stop_before {
                break;
            }
            skipped.push(SyntaxElement::Token(self.bump()));
            if stop_after {
                break;
            }
            if opens {
                depth += 1;
            } else if closes {
                depth = depth.saturating_sub(1);
            }
        }
        node(NodeKind::Error, skipped, at)
    }

    /// Skip past the `}` that brings brace depth back to zero.
    ///
    /// Returns `true` when that `}` was met before any `{`, i.e. it closes the
    /// enclosing block rather than the broken rule.
    fn recover_rule(&mut self) -> (SyntaxNode, bool) {
        let at = self.pos;
        let mut skipped = vec![];
        let mut depth = 0usize;
        let mut closed_enclosing = false;
        while !self.at_eof() {
            let opens = matches!(self.peek(), TokenKind::LeftBrace);
            let closes = matches!(self.peek(), TokenKind::RightBrace);
            skipped.push(SyntaxElement::Token(self.bump()));
            if opens {
                depth += 1;
            } else if closes {
                if depth <= 1 {
                    closed_enclosing = depth == 0;
                    break;
                }
                depth -= 1;
            }
        }
        (node(NodeKind::Error, skipped, at), closed_enclosing)
    }

    /// Skip the rest of an at-rule: through its `;` or its `{}` block. Stops
    /// before a `}` that would close an enclosing block.
    fn skip_statement(&mut self) -> Vec<SyntaxElement> {
        let mut skipped = vec![];
        let mut depth = 0usize;
        while !self.at_eof() {
            let semicolon = matches!(self.peek(), TokenKind::Semicolon);
            let opens = matches!(self.peek(), TokenKind::LeftBrace);
            let closes = matches!(self.peek(), TokenKind::RightBrace);

            if depth == 0 && closes {
                break;
            }
            skipped.push(SyntaxElement::Token(self.bump()));
            if depth == 0 && semicolon {
                break;
            }
            if opens {
                depth += 1;
            } else if closes {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        skipped
    }

    // === Statements ===

    fn stylesheet(&mut self) -> SyntaxNode {
        let mut children = vec![];
        loop {
            self.skip_ws();
            if self.at_eof() {
                break;
            }

            let statement = if let TokenKind::AtKeyword(name) = self.peek() {
                let name = name.to_ascii_lowercase();
                self.at_rule(&name, true)
            } else if matches!(self.peek(), TokenKind::RightBrace | TokenKind::Semicolon) {
                self.stray_token("rule or at-rule")
            } else {
                self.rule().0
            };
            children.push(SyntaxElement::Node(statement));
        }
        node(NodeKind::Stylesheet, children, self.pos)
    }

    fn stray_token(&mut self, expected: &str) -> SyntaxNode {
        let error = self.unexpected(expected);
        self.report(error);
        let index = self.bump();
        node(NodeKind::Error, vec![SyntaxElement::Token(index)], index)
    }

    fn at_rule(&mut self, name: &str, top_level: bool) -> SyntaxNode {
        let at = self.pos;
        let parsed = match name {
            "namespace" if top_level => self.namespace_rule(),
            "font-face" if top_level => self.font_face_rule(),
            "media" if top_level => self.media_rule(),
            _ => Ok(self.unknown_at_rule()),
        };

        parsed.unwrap_or_else(|error| {
            self.report(error);
            let skipped = self.skip_statement();
            node(NodeKind::Error, skipped, at)
        })
    }

    fn unknown_at_rule(&mut self) -> SyntaxNode {
        let at = self.bump();
        let mut children = vec![SyntaxElement::Token(at)];
        children.extend(self.skip_statement());
        node(NodeKind::UnknownAtRule, children, at)
    }

    fn namespace_rule(&mut self) -> Parsed<SyntaxNode> {
        let at = self.bump();
        let mut children = vec![SyntaxElement::Token(at)];
        self.skip_ws();

        if matches!(self.peek(), TokenKind::Ident(_)) {
            let prefix = self.bump();
            children.push(leaf(NodeKind::NamespacePrefix, prefix));
            self.skip_ws();
        }

        if !matches!(self.peek(), TokenKind::String(_) | TokenKind::Url(_)) {
            return Err(self.unexpected("namespace URI"));
        }
        let uri = self.bump();
        children.push(SyntaxElement::Token(uri));
        self.skip_ws();

        if matches!(self.peek(), TokenKind::Semicolon) {
            children.push(SyntaxElement::Token(self.bump()));
        } else {
            let end = self.span_of(uri).end;
            self.report(SyntaxError::new(
                ProblemKind::MissingSemicolon,
                Span::point(end),
            ));
        }

        Ok(node(NodeKind::NamespaceRule, children, at))
    }

    fn font_face_rule(&mut self) -> Parsed<SyntaxNode> {
        let at = self.bump();
        self.skip_ws();
        if !matches!(self.peek(), TokenKind::LeftBrace) {
            return Err(self.unexpected("'{'"));
        }
        let block = self.declaration_block();
        Ok(node(
            NodeKind::FontFaceRule,
            vec![SyntaxElement::Token(at), SyntaxElement::Node(block)],
            at,
        ))
    }

    fn media_rule(&mut self) -> Parsed<SyntaxNode> {
        let at = self.bump();
        self.skip_ws();
        let queries = self.media_query_list()?;

        let open = self.bump();
        let mut children = vec![
            SyntaxElement::Token(at),
            SyntaxElement::Node(queries),
            SyntaxElement::Token(open),
        ];

        loop {
            self.skip_ws();
            if matches!(self.peek(), TokenKind::RightBrace) {
                children.push(SyntaxElement::Token(self.bump()));
                break;
            }
            if self.at_eof() {
                self.report(SyntaxError::new(
                    ProblemKind::MissingCloseBrace,
                    self.current_span(),
                ));
                break;
            }

            if let TokenKind::AtKeyword(name) = self.peek() {
                let name = name.to_ascii_lowercase();
                children.push(SyntaxElement::Node(self.at_rule(&name, false)));
            } else if matches!(self.peek(), TokenKind::Semicolon) {
                children.push(SyntaxElement::Node(self.stray_token("rule")));
            } else {
                let (statement, closed_block) = self.rule();
                children.push(SyntaxElement::Node(statement));
                // Recovery swallowed this block's `}`.
                if closed_block {
                    break;
                }
            }
        }

        Ok(node(NodeKind::MediaRule, children, at))
    }

    // === Media queries ===

    /// Parse queries up to (not including) the `{` of the media block.
    fn media_query_list(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![];

        if matches!(self.peek(), TokenKind::LeftBrace) {
            return Ok(node(NodeKind::MediaQueryList, children, at));
        }

        loop {
            self.skip_ws();
            children.push(SyntaxElement::Node(self.media_query()?));
            if matches!(self.peek(), TokenKind::Comma) {
                children.push(SyntaxElement::Token(self.bump()));
            } else if matches!(self.peek(), TokenKind::LeftBrace) {
                break;
            } else {
                let found = self.found();
                return Err(self.malformed_media(format!("expected ',' or '{{' but found {found}")));
            }
        }

        Ok(node(NodeKind::MediaQueryList, children, at))
    }

    fn media_query(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![];
        let mut saw_qualifier = false;
        let mut saw_type = false;
        let mut saw_feature = false;
        let mut need_feature = false;

        loop {
            self.skip_ws();
            let (is_and, is_qualifier) = match self.peek() {
                TokenKind::Ident(word) => (
                    word.eq_ignore_ascii_case("and"),
                    word.eq_ignore_ascii_case("only") || word.eq_ignore_ascii_case("not"),
                ),
                _ => (false, false),
            };
            let is_ident = matches!(self.peek(), TokenKind::Ident(_));
            let at_start = !saw_qualifier && !saw_type && !saw_feature;

            if is_and && (saw_type || saw_feature) && !need_feature {
                children.push(SyntaxElement::Token(self.bump()));
                need_feature = true;
            } else if is_ident && !is_and && !saw_type && !saw_feature {
                let followed_by_ident = matches!(self.peek_next_significant(), Some(TokenKind::Ident(_)));
                children.push(SyntaxElement::Token(self.bump()));
                if is_qualifier && !saw_qualifier && followed_by_ident {
                    saw_qualifier = true;
                } else {
                    saw_type = true;
                }
            } else if matches!(self.peek(), TokenKind::LeftParen) && (need_feature || at_start) {
                children.push(SyntaxElement::Node(self.media_feature()?));
                saw_feature = true;
                need_feature = false;
            } else if matches!(self.peek(), TokenKind::Comma | TokenKind::LeftBrace)
                && !need_feature
                && (saw_type || saw_feature)
            {
                break;
            } else {
                let found = self.found();
                return Err(self.malformed_media(format!("unexpected {found}")));
            }
        }

        Ok(node(NodeKind::MediaQuery, children, at))
    }

    fn media_feature(&mut self) -> Parsed<SyntaxNode> {
        let open = self.bump();
        let mut children = vec![SyntaxElement::Token(open)];
        self.skip_ws();

        if !matches!(self.peek(), TokenKind::Ident(_)) {
            let found = self.found();
            return Err(self.malformed_media(format!("expected feature name but found {found}")));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.skip_ws();

        if matches!(self.peek(), TokenKind::Colon) {
            children.push(SyntaxElement::Token(self.bump()));
            self.skip_ws();
            children.push(SyntaxElement::Node(self.value(false)?));
            self.skip_ws();
        }

        if !matches!(self.peek(), TokenKind::RightParen) {
            let found = self.found();
            return Err(self.malformed_media(format!("expected ')' but found {found}")));
        }
        children.push(SyntaxElement::Token(self.bump()));

        Ok(node(NodeKind::MediaFeature, children, open))
    }

    // === Rules and selectors ===

    /// Parse a rule, recovering from errors in its selectors.
    ///
    /// The flag is set when recovery consumed the `}` of the enclosing block.
    fn rule(&mut self) -> (SyntaxNode, bool) {
        match self.rule_inner() {
            Ok(rule) => (rule, false),
            Err(error) => {
                self.report(error);
                self.recover_rule()
            }
        }
    }

    fn rule_inner(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let selectors = self.selector_list()?;
        let block = self.declaration_block();
        Ok(node(
            NodeKind::Rule,
            vec![SyntaxElement::Node(selectors), SyntaxElement::Node(block)],
            at,
        ))
    }

    /// Parse selectors up to (not including) the `{` of the rule.
    fn selector_list(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![];
        loop {
            children.push(SyntaxElement::Node(self.selector()?));
            if matches!(self.peek(), TokenKind::Comma) {
                children.push(SyntaxElement::Token(self.bump()));
                self.skip_ws();
            } else if matches!(self.peek(), TokenKind::LeftBrace) {
                break;
            } else {
                let found = self.found();
                return Err(self.malformed_selector(format!("unexpected {found}")));
            }
        }
        Ok(node(NodeKind::SelectorList, children, at))
    }

    fn selector(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![SyntaxElement::Node(self.simple_selector()?)];

        loop {
            let whitespace = self.skip_ws();
            let explicit = matches!(
                self.peek(),
                TokenKind::Greater | TokenKind::Plus | TokenKind::Tilde
            );

            if explicit {
                let combinator = self.bump();
                children.push(leaf(NodeKind::Combinator, combinator));
                self.skip_ws();
            } else if starts_simple_selector(self.peek()) {
                match whitespace {
                    Some(space) => children.push(leaf(NodeKind::Combinator, space)),
                    None => {
                        let found = self.found();
                        return Err(self.malformed_selector(format!("unexpected {found}")));
                    }
                }
            } else {
                break;
            }

            children.push(SyntaxElement::Node(self.simple_selector()?));
        }

        Ok(node(NodeKind::Selector, children, at))
    }

    fn simple_selector(&mut self) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![];

        let names_element = |kind: &TokenKind| matches!(kind, TokenKind::Ident(_) | TokenKind::Asterisk);

        // `ns|`, `*|` or a bare `|` for "no namespace".
        let prefix = if matches!(self.peek(), TokenKind::Pipe) {
            let pipe = self.bump();
            Some(node(NodeKind::NamespacePrefix, vec![SyntaxElement::Token(pipe)], pipe))
        } else if names_element(self.peek()) && matches!(self.peek_raw(1), Some(TokenKind::Pipe)) {
            let prefix = self.bump();
            let pipe = self.bump();
            Some(node(
                NodeKind::NamespacePrefix,
                vec![SyntaxElement::Token(prefix), SyntaxElement::Token(pipe)],
                prefix,
            ))
        } else {
            None
        };

        if let Some(prefix) = prefix {
            children.push(SyntaxElement::Node(prefix));
            if !names_element(self.peek()) {
                return Err(self.malformed_selector("expected element name after '|'"));
            }
        }

        if names_element(self.peek()) {
            let name = self.bump();
            children.push(leaf(NodeKind::ElementName, name));
        }

        loop {
            match self.peek() {
                TokenKind::Hash { is_id: true, .. } => {
                    let id = self.bump();
                    children.push(leaf(NodeKind::IdSelector, id));
                }
                TokenKind::Hash { is_id: false, .. } => {
                    let text = self.current().map(|t| t.text.clone()).unwrap_or_default();
                    return Err(self.malformed_selector(format!("'{text}' is not a valid id")));
                }
                TokenKind::Dot => {
                    let dot = self.bump();
                    if !matches!(self.peek(), TokenKind::Ident(_)) {
                        return Err(self.malformed_selector("expected class name after '.'"));
                    }
                    let name = self.bump();
                    children.push(SyntaxElement::Node(node(
                        NodeKind::ClassSelector,
                        vec![SyntaxElement::Token(dot), SyntaxElement::Token(name)],
                        dot,
                    )));
                }
                TokenKind::LeftBracket => {
                    children.push(SyntaxElement::Node(self.attribute_selector()?));
                }
                TokenKind::Colon => {
                    children.push(SyntaxElement::Node(self.pseudo_selector()?));
                }
                _ => break,
            }
        }

        if children.is_empty() {
            let found = self.found();
            return Err(self.malformed_selector(format!("expected selector but found {found}")));
        }

        Ok(node(NodeKind::SimpleSelector, children, at))
    }

    fn attribute_selector(&mut self) -> Parsed<SyntaxNode> {
        let open = self.bump();
        let mut children = vec![SyntaxElement::Token(open)];
        self.skip_ws();

        if !matches!(self.peek(), TokenKind::Ident(_)) {
            return Err(self.malformed_selector("expected attribute name"));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.skip_ws();

        if is_attribute_operator(self.peek()) {
            children.push(SyntaxElement::Token(self.bump()));
            self.skip_ws();
            if !matches!(self.peek(), TokenKind::Ident(_) | TokenKind::String(_)) {
                return Err(self.malformed_selector("expected attribute value"));
            }
            children.push(SyntaxElement::Token(self.bump()));
            self.skip_ws();
        }

        if !matches!(self.peek(), TokenKind::RightBracket) {
            return Err(self.malformed_selector("expected ']'"));
        }
        children.push(SyntaxElement::Token(self.bump()));

        Ok(node(NodeKind::AttributeSelector, children, open))
    }

    fn pseudo_selector(&mut self) -> Parsed<SyntaxNode> {
        let colon = self.bump();
        let mut children = vec![SyntaxElement::Token(colon)];

        if matches!(self.peek(), TokenKind::Colon) {
            children.push(SyntaxElement::Token(self.bump()));
        }

        match self.peek() {
            TokenKind::Ident(_) => children.push(SyntaxElement::Token(self.bump())),
            TokenKind::Function(_) => {
                children.push(SyntaxElement::Token(self.bump()));
                let mut depth = 0usize;
                loop {
                    if self.at_eof() {
                        return Err(self.malformed_selector("unterminated pseudo-class argument"));
                    }
                    let opens = self.peek().opens_block();
                    let closes = matches!(self.peek(), TokenKind::RightParen);
                    children.push(SyntaxElement::Token(self.bump()));
                    if opens {
                        depth += 1;
                    } else if closes {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                }
            }
            _ => return Err(self.malformed_selector("expected pseudo-class name after ':'")),
        }

        Ok(node(NodeKind::PseudoSelector, children, colon))
    }

    // === Declarations ===

    /// Parse `{ declarations }`. The current token must be `{`.
    fn declaration_block(&mut self) -> SyntaxNode {
        let open = self.bump();
        let mut children = vec![SyntaxElement::Token(open)];

        loop {
            self.skip_ws();
            if matches!(self.peek(), TokenKind::RightBrace) {
                children.push(SyntaxElement::Token(self.bump()));
                break;
            }
            if self.at_eof() {
                self.report(SyntaxError::new(
                    ProblemKind::MissingCloseBrace,
                    self.current_span(),
                ));
                break;
            }
            if matches!(self.peek(), TokenKind::Semicolon) {
                children.push(SyntaxElement::Token(self.bump()));
                continue;
            }

            match self.declaration() {
                Ok(declaration) => children.push(SyntaxElement::Node(declaration)),
                Err(error) => {
                    self.report(error);
                    children.push(SyntaxElement::Node(self.recover_declaration()));
                }
            }
        }

        node(NodeKind::DeclarationBlock, children, open)
    }

    fn declaration(&mut self) -> Parsed<SyntaxNode> {
        if !matches!(self.peek(), TokenKind::Ident(_)) {
            return Err(self.unexpected("property name"));
        }
        let name = self.bump();
        let mut children = vec![SyntaxElement::Token(name)];
        self.skip_ws();

        if !matches!(self.peek(), TokenKind::Colon) {
            return Err(self.unexpected("':'"));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.skip_ws();

        if matches!(
            self.peek(),
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof | TokenKind::Important
        ) {
            return Err(
                SyntaxError::new(ProblemKind::MissingPropertyValue, self.span_of(name))
                    .with_param("property", self.text_of(name)),
            );
        }

        children.push(SyntaxElement::Node(self.value(false)?));
        self.skip_ws();

        if matches!(self.peek(), TokenKind::Important) {
            children.push(SyntaxElement::Token(self.bump()));
            self.skip_ws();
        }

        if matches!(self.peek(), TokenKind::Semicolon) {
            children.push(SyntaxElement::Token(self.bump()));
        } else if !matches!(self.peek(), TokenKind::RightBrace | TokenKind::Eof) {
            return Err(SyntaxError::new(
                ProblemKind::MissingSemicolon,
                self.current_span(),
            ));
        }

        Ok(node(NodeKind::Declaration, children, name))
    }

    // === Values ===

    /// `term (operator term)*`. Whitespace operators are kept as tokens only
    /// when another term follows.
    fn value(&mut self, allow_named: bool) -> Parsed<SyntaxNode> {
        let at = self.pos;
        let mut children = vec![];

        loop {
            children.push(SyntaxElement::Node(self.term(allow_named)?));
            let whitespace = self.skip_ws();

            if matches!(self.peek(), TokenKind::Comma | TokenKind::Slash) {
                children.push(SyntaxElement::Token(self.bump()));
                self.skip_ws();
            } else if starts_term(self.peek()) {
                if let Some(space) = whitespace {
                    children.push(SyntaxElement::Token(space));
                }
            } else {
                break;
            }
        }

        Ok(node(NodeKind::Value, children, at))
    }

    fn term(&mut self, allow_named: bool) -> Parsed<SyntaxNode> {
        if allow_named
            && matches!(self.peek(), TokenKind::Ident(_))
            && matches!(self.peek_next_significant(), Some(TokenKind::Equals))
        {
            return self.named_argument();
        }

        if matches!(self.peek(), TokenKind::Function(_)) {
            return self.function_call();
        }

        if starts_term(self.peek()) {
            let index = self.bump();
            return Ok(node(
                NodeKind::Term,
                vec![SyntaxElement::Token(index)],
                index,
            ));
        }

        Err(self.unexpected("value"))
    }

    fn named_argument(&mut self) -> Parsed<SyntaxNode> {
        let name = self.bump();
        self.skip_ws();
        let equals = self.bump();
        self.skip_ws();
        let value = self.term(false)?;
        Ok(node(
            NodeKind::NamedArgument,
            vec![
                SyntaxElement::Token(name),
                SyntaxElement::Token(equals),
                SyntaxElement::Node(value),
            ],
            name,
        ))
    }

    fn function_call(&mut self) -> Parsed<SyntaxNode> {
        let function = self.bump();
        let mut children = vec![SyntaxElement::Token(function)];
        self.skip_ws();

        if !matches!(self.peek(), TokenKind::RightParen) {
            children.push(SyntaxElement::Node(self.value(true)?));
            self.skip_ws();
        }

        if !matches!(self.peek(), TokenKind::RightParen) {
            return Err(self.unexpected("')'"));
        }
        children.push(SyntaxElement::Token(self.bump()));

        Ok(node(NodeKind::FunctionCall, children, function))
    }
}
