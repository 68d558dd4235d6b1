//! Token definitions.

use std::fmt;

use crate::source::Span;

/// The kind of a token, with its decoded payload.
///
/// String payloads are escape-decoded; [`Token::text`] keeps the source text
/// as written.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A run of whitespace.
    Whitespace,
    /// An identifier (`Button`, `color`, `sans-serif`).
    Ident(String),
    /// A function opener (`rgb(`); the payload is the name.
    Function(String),
    /// An at-keyword (`@media`); the payload excludes the `@`.
    AtKeyword(String),
    /// A hash (`#ff0000`, `#submit`); the payload excludes the `#`.
    Hash {
        /// The name after `#`.
        value: String,
        /// Whether the name is a valid identifier (usable as an id selector).
        is_id: bool,
    },
    /// A quoted string; the payload excludes the quotes.
    String(String),
    /// A URL from `url(x)` or `url("x")`; the payload is the address.
    Url(String),
    /// A plain number.
    Number(f32),
    /// A percentage; the payload is the number as written (`50%` → 50).
    Percentage(f32),
    /// A number with a unit.
    Dimension {
        /// The numeric part.
        value: f32,
        /// The unit as written.
        unit: String,
    },
    /// `!important`.
    Important,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `~=`
    IncludeMatch,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `>`
    Greater,
    /// `+`
    Plus,
    /// `~`
    Tilde,
    /// `*`
    Asterisk,
    /// `|`
    Pipe,
    /// `/`
    Slash,
    /// End of input. Always the last token.
    Eof,
}

impl TokenKind {
    /// A short human-readable name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Function(_) => "function",
            TokenKind::AtKeyword(_) => "at-keyword",
            TokenKind::Hash { .. } => "hash",
            TokenKind::String(_) => "string",
            TokenKind::Url(_) => "url",
            TokenKind::Number(_) => "number",
            TokenKind::Percentage(_) => "percentage",
            TokenKind::Dimension { .. } => "dimension",
            TokenKind::Important => "'!important'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Equals => "'='",
            TokenKind::IncludeMatch => "'~='",
            TokenKind::DashMatch => "'|='",
            TokenKind::PrefixMatch => "'^='",
            TokenKind::SuffixMatch => "'$='",
            TokenKind::SubstringMatch => "'*='",
            TokenKind::Greater => "'>'",
            TokenKind::Plus => "'+'",
            TokenKind::Tilde => "'~'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Pipe => "'|'",
            TokenKind::Slash => "'/'",
            TokenKind::Eof => "end of input",
        }
    }

    /// Whether this kind opens a block that the lexer flattened.
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftBrace
                | TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::Function(_)
        )
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Kind and decoded payload.
    pub kind: TokenKind,
    /// The source text of the token.
    pub text: String,
    /// Location of the token.
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Whether this is a whitespace token.
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    /// Whether this is the end-of-input token.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Describe the token for a `found` diagnostic parameter.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
            kind => format!("{} '{}'", kind.describe(), self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
