//! Problem kinds, codes and description templates.

use std::fmt;

/// How serious a problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Worth reporting; the stylesheet is still well formed.
    Warning,
    /// The input is invalid at this location.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The pipeline stage a problem kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemClass {
    /// Found while tokenizing.
    Lexical,
    /// Found while building the syntax tree.
    Syntactic,
    /// Found while building the model.
    Semantic,
    /// The pipeline itself failed.
    Internal,
}

/// Every problem the CSS frontend can report.
///
/// Codes are stable and part of the diagnostic wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    // === Lexical ===
    /// A character that cannot start any token.
    UnexpectedCharacter,
    /// A string missing its closing quote.
    UnterminatedString,
    /// A comment missing its closing `*/`.
    UnterminatedComment,
    /// A backslash that does not start a valid escape.
    BadEscape,
    /// A malformed `url(...)`.
    BadUrl,

    // === Syntactic ===
    /// A token the grammar does not allow here.
    UnexpectedToken,
    /// A statement missing its terminating `;`.
    MissingSemicolon,
    /// A block missing its closing `}`.
    MissingCloseBrace,
    /// A selector that cannot be parsed.
    MalformedSelector,
    /// A declaration with a name and colon but no value.
    MissingPropertyValue,
    /// A media query that cannot be parsed.
    MalformedMediaQuery,

    // === Semantic ===
    /// A second `@namespace` for a prefix already declared.
    DuplicateNamespace,
    /// A `@font-face` descriptor declared twice.
    DuplicateDescriptor,
    /// An at-rule that is not allowed where it appears.
    InvalidAtRule,
    /// A hash value that is not a valid hex color.
    InvalidColor,
    /// A selector prefix with no matching `@namespace`.
    UnknownNamespace,

    // === Internal ===
    /// Blocks nested beyond the configured limit.
    NestingTooDeep,
    /// The pipeline failed unexpectedly.
    UnexpectedException,
}

impl ProblemKind {
    /// All kinds, in code order.
    pub const ALL: [ProblemKind; 18] = [
        ProblemKind::UnexpectedCharacter,
        ProblemKind::UnterminatedString,
        ProblemKind::UnterminatedComment,
        ProblemKind::BadEscape,
        ProblemKind::BadUrl,
        ProblemKind::UnexpectedToken,
        ProblemKind::MissingSemicolon,
        ProblemKind::MissingCloseBrace,
        ProblemKind::MalformedSelector,
        ProblemKind::MissingPropertyValue,
        ProblemKind::MalformedMediaQuery,
        ProblemKind::DuplicateNamespace,
        ProblemKind::DuplicateDescriptor,
        ProblemKind::InvalidAtRule,
        ProblemKind::InvalidColor,
        ProblemKind::UnknownNamespace,
        ProblemKind::NestingTooDeep,
        ProblemKind::UnexpectedException,
    ];

    /// The stable numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ProblemKind::UnexpectedCharacter => 1001,
            ProblemKind::UnterminatedString => 1002,
            ProblemKind::UnterminatedComment => 1003,
            ProblemKind::BadEscape => 1004,
            ProblemKind::BadUrl => 1005,
            ProblemKind::UnexpectedToken => 1010,
            ProblemKind::MissingSemicolon => 1011,
            ProblemKind::MissingCloseBrace => 1012,
            ProblemKind::MalformedSelector => 1013,
            ProblemKind::MissingPropertyValue => 1014,
            ProblemKind::MalformedMediaQuery => 1015,
            ProblemKind::DuplicateNamespace => 1440,
            ProblemKind::DuplicateDescriptor => 1441,
            ProblemKind::InvalidAtRule => 1442,
            ProblemKind::InvalidColor => 1443,
            ProblemKind::UnknownNamespace => 1446,
            ProblemKind::NestingTooDeep => 1490,
            ProblemKind::UnexpectedException => 1499,
        }
    }

    /// The kebab-case name (e.g. `duplicate-namespace`).
    pub fn name(&self) -> &'static str {
        match self {
            ProblemKind::UnexpectedCharacter => "unexpected-character",
            ProblemKind::UnterminatedString => "unterminated-string",
            ProblemKind::UnterminatedComment => "unterminated-comment",
            ProblemKind::BadEscape => "bad-escape",
            ProblemKind::BadUrl => "bad-url",
            ProblemKind::UnexpectedToken => "unexpected-token",
            ProblemKind::MissingSemicolon => "missing-semicolon",
            ProblemKind::MissingCloseBrace => "missing-close-brace",
            ProblemKind::MalformedSelector => "malformed-selector",
            ProblemKind::MissingPropertyValue => "missing-property-value",
            ProblemKind::MalformedMediaQuery => "malformed-media-query",
            ProblemKind::DuplicateNamespace => "duplicate-namespace",
            ProblemKind::DuplicateDescriptor => "duplicate-descriptor",
            ProblemKind::InvalidAtRule => "invalid-at-rule",
            ProblemKind::InvalidColor => "invalid-color",
            ProblemKind::UnknownNamespace => "unknown-namespace",
            ProblemKind::NestingTooDeep => "nesting-too-deep",
            ProblemKind::UnexpectedException => "unexpected-exception",
        }
    }

    /// The description template. `${name}` markers refer to problem params.
    pub fn description(&self) -> &'static str {
        match self {
            ProblemKind::UnexpectedCharacter => "Unexpected character '${character}'.",
            ProblemKind::UnterminatedString => "String is not terminated.",
            ProblemKind::UnterminatedComment => "Comment is not terminated.",
            ProblemKind::BadEscape => "Invalid escape sequence.",
            ProblemKind::BadUrl => "Malformed url '${url}'.",
            ProblemKind::UnexpectedToken => "Expected ${expected} but found ${found}.",
            ProblemKind::MissingSemicolon => "Missing ';' at end of statement.",
            ProblemKind::MissingCloseBrace => "Missing '}' before end of input.",
            ProblemKind::MalformedSelector => "Malformed selector: ${reason}.",
            ProblemKind::MissingPropertyValue => "Property '${property}' has no value.",
            ProblemKind::MalformedMediaQuery => "Malformed media query: ${reason}.",
            ProblemKind::DuplicateNamespace => {
                "Namespace prefix '${prefix}' is already declared."
            }
            ProblemKind::DuplicateDescriptor => {
                "Descriptor '${property}' is declared more than once; the last value is used."
            }
            ProblemKind::InvalidAtRule => "At-rule '@${name}' is not allowed here.",
            ProblemKind::InvalidColor => "'${color}' is not a valid color.",
            ProblemKind::UnknownNamespace => "Unknown namespace prefix '${prefix}'.",
            ProblemKind::NestingTooDeep => "Blocks are nested deeper than ${limit} levels.",
            ProblemKind::UnexpectedException => "Unexpected failure: ${message}.",
        }
    }

    /// Warning or error.
    pub fn severity(&self) -> Severity {
        match self {
            ProblemKind::DuplicateDescriptor => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The stage this kind is reported from.
    pub fn class(&self) -> ProblemClass {
        match self.code() {
            1001..=1009 => ProblemClass::Lexical,
            1010..=1099 => ProblemClass::Syntactic,
            1400..=1489 => ProblemClass::Semantic,
            _ => ProblemClass::Internal,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<u32> = ProblemKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ProblemKind::ALL.len());
    }

    #[test]
    fn code_ranges_match_classes() {
        assert_eq!(ProblemKind::BadEscape.class(), ProblemClass::Lexical);
        assert_eq!(ProblemKind::MissingSemicolon.class(), ProblemClass::Syntactic);
        assert_eq!(ProblemKind::UnknownNamespace.class(), ProblemClass::Semantic);
        assert_eq!(ProblemKind::UnexpectedException.class(), ProblemClass::Internal);
    }

    #[test]
    fn duplicate_descriptor_is_only_warning() {
        let warnings: Vec<_> = ProblemKind::ALL
            .iter()
            .filter(|k| k.severity() == Severity::Warning)
            .collect();
        assert_eq!(warnings, vec![&ProblemKind::DuplicateDescriptor]);
    }
}
