//! The append-only problem collector shared by every stage.

use super::Problem;

/// Receives problems in the order they are discovered.
///
/// Implementations must not reorder, drop or deduplicate problems, and must
/// not panic.
pub trait ProblemSink {
    /// Record one problem.
    fn append(&mut self, problem: Problem);
}

impl ProblemSink for Vec<Problem> {
    fn append(&mut self, problem: Problem) {
        self.push(problem);
    }
}

impl<S: ProblemSink + ?Sized> ProblemSink for &mut S {
    fn append(&mut self, problem: Problem) {
        (**self).append(problem);
    }
}

/// Forwards problems to an inner sink and logs each one.
///
/// Every stage reports through this wrapper so problems show up in traces
/// under the stage's target.
pub(crate) struct TracingSink<'s> {
    inner: &'s mut dyn ProblemSink,
    target: &'static str,
    count: usize,
}

impl<'s> TracingSink<'s> {
    pub(crate) fn new(inner: &'s mut dyn ProblemSink, target: &'static str) -> Self {
        Self {
            inner,
            target,
            count: 0,
        }
    }

    /// Number of problems forwarded so far.
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl ProblemSink for TracingSink<'_> {
    fn append(&mut self, problem: Problem) {
        // `target:` must be a constant, so dispatch on the stage instead.
        match self.target {
            crate::logging::targets::LEXER => {
                tracing::trace!(target: crate::logging::targets::LEXER, "{}", problem)
            }
            crate::logging::targets::PARSER => {
                tracing::trace!(target: crate::logging::targets::PARSER, "{}", problem)
            }
            crate::logging::targets::BUILDER => {
                tracing::trace!(target: crate::logging::targets::BUILDER, "{}", problem)
            }
            _ => tracing::trace!(target: crate::logging::targets::PIPELINE, "{}", problem),
        }
        self.count += 1;
        self.inner.append(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::ProblemKind;
    use crate::source::Span;

    #[test]
    fn vec_sink_preserves_order_and_duplicates() {
        let mut problems: Vec<Problem> = vec![];
        let first = Problem::new(ProblemKind::BadEscape, "a.css", Span::default());
        let second = Problem::new(ProblemKind::MissingSemicolon, "a.css", Span::default());

        // `Vec::append` shadows the trait method.
        ProblemSink::append(&mut problems, first.clone());
        ProblemSink::append(&mut problems, second.clone());
        ProblemSink::append(&mut problems, first.clone());

        assert_eq!(problems, vec![first.clone(), second, first]);
    }

    #[test]
    fn tracing_sink_forwards_and_counts() {
        let mut problems: Vec<Problem> = vec![];
        {
            let mut sink = TracingSink::new(&mut problems, crate::logging::targets::PARSER);
            sink.append(Problem::new(ProblemKind::BadUrl, "a.css", Span::default()));
            assert_eq!(sink.count(), 1);
        }
        assert_eq!(problems.len(), 1);
    }
}
