//! Media query conditions of `@media` blocks.

use std::fmt;

use super::Value;

/// `only` or `not` before a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaQualifier {
    /// `only`
    Only,
    /// `not`
    Not,
}

/// One media query (e.g., `only screen and (application-dpi: 240)`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaQuery {
    /// Leading `only` or `not`.
    pub qualifier: Option<MediaQualifier>,
    /// Media type (e.g., `screen`), as written.
    pub media_type: Option<String>,
    /// Features joined by `and`.
    pub features: Vec<MediaFeature>,
}

impl MediaQuery {
    /// Create a query for a media type.
    pub fn for_type(media_type: impl Into<String>) -> Self {
        Self {
            media_type: Some(media_type.into()),
            ..Default::default()
        }
    }

    /// Add a feature.
    pub fn with_feature(mut self, feature: MediaFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// The first feature with the given name (ASCII case-insensitive).
    pub fn feature(&self, name: &str) -> Option<&MediaFeature> {
        self.features
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        match self.qualifier {
            Some(MediaQualifier::Only) => f.write_str("only ")?,
            Some(MediaQualifier::Not) => f.write_str("not ")?,
            None => {}
        }
        if let Some(media_type) = &self.media_type {
            f.write_str(media_type)?;
            first = false;
        }
        for feature in &self.features {
            if !first {
                f.write_str(" and ")?;
            }
            write!(f, "{feature}")?;
            first = false;
        }
        Ok(())
    }
}

/// `(name)` or `(name: value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFeature {
    /// Feature name as written.
    pub name: String,
    /// Feature value, when present.
    pub value: Option<Value>,
}

impl MediaFeature {
    /// Create a feature.
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "({}: {value})", self.name),
            None => write!(f, "({})", self.name),
        }
    }
}
