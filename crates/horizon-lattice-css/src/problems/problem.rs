//! A single reported problem.

use std::collections::BTreeMap;
use std::fmt;

use super::{ProblemKind, Severity};
use crate::source::Span;

/// A problem found in a stylesheet.
///
/// The description template of [`kind`](Problem::kind) is kept separate from
/// the parameter values until [`message`](Problem::message) is called, so the
/// text can be localized downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// What went wrong.
    pub kind: ProblemKind,
    /// The name of the source the problem was found in.
    pub source_name: String,
    /// Location in the source.
    pub span: Span,
    /// Values for the `${placeholder}` markers of the description.
    pub params: BTreeMap<String, String>,
}

impl Problem {
    /// Create a problem without parameters.
    pub fn new(kind: ProblemKind, source_name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            source_name: source_name.into(),
            span,
            params: BTreeMap::new(),
        }
    }

    /// Attach a placeholder value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Look up a placeholder value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The stable error code.
    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    /// Warning or error.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// The uninterpolated description template.
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// Render the description with its parameters substituted.
    ///
    /// Placeholders with no value are left as written.
    pub fn message(&self) -> String {
        let template = self.description();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.params.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.source_name,
            self.span.start,
            self.severity(),
            self.code(),
            self.message()
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Problem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Problem", 7)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("kind", self.kind.name())?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("description", self.description())?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("source_name", &self.source_name)?;
        state.serialize_field("span", &self.span)?;
        state.end()
    }
}
