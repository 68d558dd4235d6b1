//! Tracing targets for the CSS frontend.
//!
//! The crate logs through `tracing` and never installs a subscriber. Filter a
//! single stage with a directive such as
//! `RUST_LOG=horizon_lattice_css::parser=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Source loading.
    pub const SOURCE: &str = "horizon_lattice_css::source";
    /// Tokenization.
    pub const LEXER: &str = "horizon_lattice_css::lexer";
    /// Syntax tree construction.
    pub const PARSER: &str = "horizon_lattice_css::parser";
    /// Model building.
    pub const BUILDER: &str = "horizon_lattice_css::builder";
    /// Parse entry point.
    pub const PIPELINE: &str = "horizon_lattice_css::pipeline";
}

/// Span names used for pipeline instrumentation.
pub mod span_names {
    /// One end-to-end parse.
    pub const PARSE: &str = "horizon_lattice_css::parse";
}
