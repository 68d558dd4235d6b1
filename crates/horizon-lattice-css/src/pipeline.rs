//! Parse entry point: tokens, then syntax tree, then document.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::builder::build_document;
use crate::lexer::tokenize;
use crate::logging::{span_names, targets};
use crate::model::CssDocument;
use crate::options::ParseOptions;
use crate::parser::parse_tokens;
use crate::problems::{Problem, ProblemKind, ProblemSink, TracingSink};
use crate::source::{CharStream, Position, Span};
use crate::{Error, Result};

/// Parse a stylesheet with default options.
///
/// Problems are appended to `sink` in the order they are found. Returns
/// `None` only when the input could not be processed at all; the sink then
/// holds a problem explaining why.
pub fn parse_css<S: CharStream + ?Sized>(
    source: &S,
    sink: &mut dyn ProblemSink,
) -> Option<CssDocument> {
    parse_css_with_options(source, &ParseOptions::default(), sink)
}

/// Parse a stylesheet.
///
/// Never panics: a panic inside the pipeline is reported as
/// [`ProblemKind::UnexpectedException`] and yields `None`.
pub fn parse_css_with_options<S: CharStream + ?Sized>(
    source: &S,
    options: &ParseOptions,
    sink: &mut dyn ProblemSink,
) -> Option<CssDocument> {
    let source_name = source.source_name();
    let span = tracing::debug_span!(target: targets::PIPELINE, span_names::PARSE, source = source_name);
    let _enter = span.enter();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run(source_name, source.text(), options, &mut *sink)
    }));

    let mut sink = TracingSink::new(sink, targets::PIPELINE);
    let problem = match outcome {
        Ok(Ok(document)) => return Some(document),
        Ok(Err(Error::NestingTooDeep { limit, position })) => {
            tracing::warn!(target: targets::PIPELINE, "Parse of {} aborted: nesting limit {} exceeded at {}", source_name, limit, position);
            Problem::new(ProblemKind::NestingTooDeep, source_name, Span::point(position))
                .with_param("limit", limit.to_string())
        }
        Ok(Err(error)) => {
            tracing::warn!(target: targets::PIPELINE, "Parse of {} failed: {}", source_name, error);
            unexpected(source_name, error.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(target: targets::PIPELINE, "Parse of {} panicked: {}", source_name, message);
            unexpected(source_name, message)
        }
    };

    sink.append(problem);
    None
}

fn run(
    source_name: &str,
    text: &str,
    options: &ParseOptions,
    sink: &mut dyn ProblemSink,
) -> Result<CssDocument> {
    let tokens = tokenize(source_name, text, options, sink)?;
    let tree = parse_tokens(source_name, &tokens, sink);
    Ok(build_document(source_name, &tokens, &tree, options, sink))
}

fn unexpected(source_name: &str, message: String) -> Problem {
    Problem::new(
        ProblemKind::UnexpectedException,
        source_name,
        Span::point(Position::new(1, 1)),
    )
    .with_param("message", message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl CssDocument {
    /// Parse a stylesheet with default options. See [`parse_css`].
    pub fn parse<S: CharStream + ?Sized>(
        source: &S,
        sink: &mut dyn ProblemSink,
    ) -> Option<CssDocument> {
        parse_css(source, sink)
    }

    /// Parse a stylesheet. See [`parse_css_with_options`].
    pub fn parse_with_options<S: CharStream + ?Sized>(
        source: &S,
        options: &ParseOptions,
        sink: &mut dyn ProblemSink,
    ) -> Option<CssDocument> {
        parse_css_with_options(source, options, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceText;

    struct Exploding;

    impl CharStream for Exploding {
        fn source_name(&self) -> &str {
            "exploding.css"
        }

        fn text(&self) -> &str {
            panic!("stream failed")
        }
    }

    #[test]
    fn parses_in_stage_order() {
        let source = SourceText::new("a.css", "Foo { a: ; } #123 {} @import x;");
        let mut problems: Vec<Problem> = vec![];
        let document = parse_css(&source, &mut problems).unwrap();
        let kinds: Vec<_> = problems.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProblemKind::MissingPropertyValue,
                ProblemKind::MalformedSelector,
                ProblemKind::InvalidAtRule,
            ]
        );
        assert_eq!(document.rules().len(), 1);
    }

    #[test]
    fn nesting_too_deep_returns_none() {
        let source = SourceText::new("deep.css", "Foo { a: f(g(h(1))); }");
        let options = ParseOptions::default().with_max_nesting_depth(3);
        let mut problems: Vec<Problem> = vec![];
        assert!(parse_css_with_options(&source, &options, &mut problems).is_none());
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::NestingTooDeep);
        assert_eq!(problems[0].param("limit"), Some("3"));
    }

    #[test]
    fn panic_becomes_problem() {
        let mut problems: Vec<Problem> = vec![];
        assert!(parse_css(&Exploding, &mut problems).is_none());
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::UnexpectedException);
        assert_eq!(problems[0].source_name, "exploding.css");
        assert_eq!(problems[0].param("message"), Some("stream failed"));
    }

    #[test]
    fn document_parse_matches_free_function() {
        let source = SourceText::new("a.css", "@namespace s \"x\"; s|A { b: c }");
        let mut first: Vec<Problem> = vec![];
        let mut second: Vec<Problem> = vec![];
        assert_eq!(
            CssDocument::parse(&source, &mut first),
            parse_css(&source, &mut second)
        );
        assert_eq!(first, second);
    }
}
