//! Tokenization on top of the `cssparser` tokenizer.
//!
//! `cssparser` hands out blocks (`{...}`, `(...)`, `[...]`, functions) as
//! single tokens whose contents must be read through a nested parser. The
//! grammar here wants a flat stream with explicit delimiters, so every block
//! is walked recursively and emitted as open token, contents, close token.
//! The close token is only emitted when the closing character is really in
//! the source; blocks cut off by end of input stay open.

use cssparser::{
    ParseError as CssParseError, Parser, ParserInput, SourceLocation, SourcePosition,
    Token as CssToken,
};

use super::{Token, TokenKind};
use crate::logging::targets;
use crate::options::ParseOptions;
use crate::problems::{Problem, ProblemKind, ProblemSink, TracingSink};
use crate::source::{Position, Span};
use crate::{Error, Result};

/// Tokenize `text`, reporting lexical problems to `sink`.
///
/// The returned vector always ends with a [`TokenKind::Eof`] token. Comments
/// are dropped. The only failure is nesting deeper than
/// [`ParseOptions::max_nesting_depth`].
pub fn tokenize(
    source_name: &str,
    text: &str,
    options: &ParseOptions,
    sink: &mut dyn ProblemSink,
) -> Result<Vec<Token>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);

    let mut lexer = Lexer {
        text,
        source_name,
        sink: TracingSink::new(sink, targets::LEXER),
        tokens: vec![],
        depth: 0,
        max_depth: options.max_nesting_depth,
        last_end: parser.position(),
        fatal: None,
    };

    lexer.lex_sequence(&mut parser);

    if let Some(error) = lexer.fatal {
        tracing::debug!(target: targets::LEXER, "Tokenization aborted: {}", error);
        return Err(error);
    }

    let end = to_position(parser.current_source_location());
    lexer.tokens.push(Token::new(TokenKind::Eof, "", Span::point(end)));

    tracing::debug!(
        target: targets::LEXER,
        "Tokenized {} into {} tokens ({} problems)",
        source_name,
        lexer.tokens.len(),
        lexer.sink.count()
    );

    Ok(lexer.tokens)
}

struct Lexer<'a, 's> {
    text: &'a str,
    source_name: &'a str,
    sink: TracingSink<'s>,
    tokens: Vec<Token>,
    depth: usize,
    max_depth: usize,
    /// End of the most recently consumed token.
    last_end: SourcePosition,
    fatal: Option<Error>,
}

impl Lexer<'_, '_> {
    /// Consume tokens until the current (possibly nested) parser is exhausted.
    fn lex_sequence<'i>(&mut self, parser: &mut Parser<'i, '_>) {
        loop {
            if self.fatal.is_some() {
                return;
            }

            let start = parser.position();
            let start_location = parser.current_source_location();
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => return,
            };

            self.lex_token(parser, token, start, start_location);
            self.last_end = parser.position();
        }
    }

    fn lex_token<'i>(
        &mut self,
        parser: &mut Parser<'i, '_>,
        token: CssToken<'i>,
        start: SourcePosition,
        start_location: SourceLocation,
    ) {
        let text = parser.slice_from(start);
        let span = Span::new(
            to_position(start_location),
            to_position(parser.current_source_location()),
        );

        let kind = match token {
            CssToken::WhiteSpace(_) => TokenKind::Whitespace,
            CssToken::Comment(_) => {
                if !is_terminated_comment(text) {
                    self.report(ProblemKind::UnterminatedComment, span);
                }
                return;
            }
            CssToken::CDO | CssToken::CDC => return,

            CssToken::Ident(name) => TokenKind::Ident(name.to_string()),
            CssToken::AtKeyword(name) => TokenKind::AtKeyword(name.to_string()),
            CssToken::Hash(value) => TokenKind::Hash {
                value: value.to_string(),
                is_id: false,
            },
            CssToken::IDHash(value) => TokenKind::Hash {
                value: value.to_string(),
                is_id: true,
            },
            CssToken::QuotedString(value) => {
                if !is_terminated_string(text) {
                    self.report(ProblemKind::UnterminatedString, span);
                }
                TokenKind::String(value.to_string())
            }
            CssToken::BadString(value) => {
                self.report(ProblemKind::UnterminatedString, span);
                TokenKind::String(value.to_string())
            }
            CssToken::UnquotedUrl(value) => TokenKind::Url(value.to_string()),
            CssToken::BadUrl(value) => {
                let problem = self
                    .problem(ProblemKind::BadUrl, span)
                    .with_param("url", value.to_string());
                self.sink.append(problem);
                TokenKind::Url(value.to_string())
            }

            CssToken::Number { value, .. } => TokenKind::Number(finite(value)),
            CssToken::Percentage { unit_value, .. } => {
                // Re-read the written magnitude; `unit_value * 100` drifts.
                let written = text
                    .strip_suffix('%')
                    .and_then(|n| n.parse::<f32>().ok())
                    .unwrap_or(unit_value * 100.0);
                TokenKind::Percentage(finite(written))
            }
            CssToken::Dimension { value, unit, .. } => TokenKind::Dimension {
                value: finite(value),
                unit: unit.to_string(),
            },

            CssToken::Colon => TokenKind::Colon,
            CssToken::Semicolon => TokenKind::Semicolon,
            CssToken::Comma => TokenKind::Comma,
            CssToken::IncludeMatch => TokenKind::IncludeMatch,
            CssToken::DashMatch => TokenKind::DashMatch,
            CssToken::PrefixMatch => TokenKind::PrefixMatch,
            CssToken::SuffixMatch => TokenKind::SuffixMatch,
            CssToken::SubstringMatch => TokenKind::SubstringMatch,
            CssToken::CloseParenthesis => TokenKind::RightParen,
            CssToken::CloseSquareBracket => TokenKind::RightBracket,
            CssToken::CloseCurlyBracket => TokenKind::RightBrace,

            CssToken::Delim(c) => match c {
                '.' => TokenKind::Dot,
                '=' => TokenKind::Equals,
                '>' => TokenKind::Greater,
                '+' => TokenKind::Plus,
                '~' => TokenKind::Tilde,
                '*' => TokenKind::Asterisk,
                '|' => TokenKind::Pipe,
                '/' => TokenKind::Slash,
                '!' => {
                    if parser
                        .try_parse(|p| p.expect_ident_matching("important"))
                        .is_ok()
                    {
                        let text = parser.slice_from(start);
                        let span = Span::new(
                            to_position(start_location),
                            to_position(parser.current_source_location()),
                        );
                        self.tokens.push(Token::new(TokenKind::Important, text, span));
                    } else {
                        self.unexpected_character(c, span);
                    }
                    return;
                }
                '\\' => {
                    self.report(ProblemKind::BadEscape, span);
                    return;
                }
                _ => {
                    self.unexpected_character(c, span);
                    return;
                }
            },

            CssToken::Function(name) => {
                let is_url = name.eq_ignore_ascii_case("url");
                let first = self.tokens.len();
                self.tokens
                    .push(Token::new(TokenKind::Function(name.to_string()), text, span));
                self.lex_block(parser, TokenKind::RightParen, ")", start_location);
                if is_url {
                    self.fold_quoted_url(parser, first, start);
                }
                return;
            }
            CssToken::ParenthesisBlock => {
                self.tokens.push(Token::new(TokenKind::LeftParen, text, span));
                self.lex_block(parser, TokenKind::RightParen, ")", start_location);
                return;
            }
            CssToken::SquareBracketBlock => {
                self.tokens.push(Token::new(TokenKind::LeftBracket, text, span));
                self.lex_block(parser, TokenKind::RightBracket, "]", start_location);
                return;
            }
            CssToken::CurlyBracketBlock => {
                self.tokens.push(Token::new(TokenKind::LeftBrace, text, span));
                self.lex_block(parser, TokenKind::RightBrace, "}", start_location);
                return;
            }
        };

        self.tokens.push(Token::new(kind, text, span));
    }

    /// Lex the contents of the block just opened, then its closer if present.
    fn lex_block<'i>(
        &mut self,
        parser: &mut Parser<'i, '_>,
        close: TokenKind,
        close_text: &str,
        open_location: SourceLocation,
    ) {
        if self.depth >= self.max_depth {
            self.fatal = Some(Error::nesting_too_deep(
                self.max_depth,
                to_position(open_location),
            ));
            return;
        }

        self.last_end = parser.position();
        self.depth += 1;
        let _ = parser.parse_nested_block(|inner| {
            self.lex_sequence(inner);
            Ok::<(), CssParseError<'i, ()>>(())
        });
        self.depth -= 1;

        if self.fatal.is_some() {
            return;
        }

        // Whatever sits between the last inner token and the current position
        // is the closing delimiter, if the source has one.
        let after = parser.position();
        let tail = self
            .text
            .get(self.last_end.byte_index()..after.byte_index())
            .unwrap_or_default();
        if tail == close_text {
            let end = to_position(parser.current_source_location());
            let start = Position::new(end.line, end.column.saturating_sub(1).max(1));
            self.tokens
                .push(Token::new(close, close_text, Span::new(start, end)));
        }
    }

    /// Replace `url(` + string + `)` with a single URL token.
    fn fold_quoted_url(&mut self, parser: &Parser<'_, '_>, first: usize, start: SourcePosition) {
        let Some(tail) = self.tokens.get(first + 1..) else {
            return;
        };
        let mut significant = tail.iter().filter(|t| !t.is_whitespace());
        let url = match (significant.next(), significant.next(), significant.next()) {
            (
                Some(Token {
                    kind: TokenKind::String(value),
                    ..
                }),
                Some(Token {
                    kind: TokenKind::RightParen,
                    ..
                }),
                None,
            ) => value.clone(),
            _ => return,
        };

        let start_position = self.tokens[first].span.start;
        let end_position = self
            .tokens
            .last()
            .map(|t| t.span.end)
            .unwrap_or(start_position);
        self.tokens.truncate(first);
        self.tokens.push(Token::new(
            TokenKind::Url(url),
            parser.slice_from(start),
            Span::new(start_position, end_position),
        ));
    }

    fn unexpected_character(&mut self, c: char, span: Span) {
        let problem = self
            .problem(ProblemKind::UnexpectedCharacter, span)
            .with_param("character", c.to_string());
        self.sink.append(problem);
    }

    fn problem(&self, kind: ProblemKind, span: Span) -> Problem {
        Problem::new(kind, self.source_name, span)
    }

    fn report(&mut self, kind: ProblemKind, span: Span) {
        let problem = self.problem(kind, span);
        self.sink.append(problem);
    }
}

/// `cssparser` lines are 0-based, columns 1-based.
fn to_position(location: SourceLocation) -> Position {
    Position::new(location.line + 1, location.column)
}

/// Out-of-range literals saturate instead of becoming infinite.
fn finite(value: f32) -> f32 {
    value.clamp(f32::MIN, f32::MAX)
}

fn is_terminated_comment(text: &str) -> bool {
    text.len() >= 4 && text.ends_with("*/")
}

/// A quoted string is terminated when it ends with its opening quote and that
/// quote is not escaped.
fn is_terminated_string(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let body = chars.as_str();
    let Some(inner) = body.strip_suffix(quote) else {
        return false;
    };
    let trailing_backslashes = inner.chars().rev().take_while(|&c| c == '\\').count();
    trailing_backslashes % 2 == 0
}
