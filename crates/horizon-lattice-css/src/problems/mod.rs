//! Structured problem reporting.
//!
//! Every stage of the pipeline reports recoverable errors as [`Problem`]
//! records appended to a caller-owned [`ProblemSink`]. Nothing reads the sink
//! until the parse returns.

mod kind;
mod problem;
mod sink;

pub use kind::{ProblemClass, ProblemKind, Severity};
pub use problem::Problem;
pub use sink::ProblemSink;

pub(crate) use sink::TracingSink;
