//! `@font-face` declarations.

use std::fmt;

use super::{Declaration, Value};
use crate::source::Span;

/// Where a font face loads its glyphs from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// `url(...)`
    Url(String),
    /// `local(...)`, a font installed on the system.
    Local(String),
}

/// A font-face declaration: an ordered descriptor map.
///
/// Descriptor names are matched with camelCase and hyphenated spellings
/// treated alike, so `fontFamily` finds `font-family`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    /// Descriptors in source order, one per name.
    pub descriptors: Vec<Declaration>,
    /// Location of the `@font-face` rule.
    pub span: Span,
}

impl FontFace {
    /// Create a font face from its descriptors.
    pub fn new(descriptors: Vec<Declaration>, span: Span) -> Self {
        Self { descriptors, span }
    }

    /// The value of a descriptor.
    pub fn descriptor(&self, name: &str) -> Option<&Value> {
        self.descriptors
            .iter()
            .find(|d| d.is(name))
            .map(|d| &d.value)
    }

    /// The family name, from a string or identifier value.
    pub fn font_family(&self) -> Option<&str> {
        let value = self.descriptor("font-family")?;
        value.as_string().or_else(|| value.as_identifier())
    }

    /// The `src` entries in source order.
    ///
    /// Each comma-separated entry contributes its leading `url()` or
    /// `local()`; trailing hints such as `format("truetype")` are ignored.
    pub fn sources(&self) -> Vec<FontSource> {
        let Some(value) = self.descriptor("src") else {
            return vec![];
        };

        let entries = match value {
            Value::CommaList(entries) => entries.as_slice(),
            other => std::slice::from_ref(other),
        };

        entries
            .iter()
            .filter_map(|entry| match entry.items().first()? {
                Value::Url(url) => Some(FontSource::Url(url.clone())),
                Value::FunctionCall { name, arguments } if name.eq_ignore_ascii_case("local") => {
                    let argument = arguments.first()?;
                    let family = argument.as_string().or_else(|| argument.as_identifier())?;
                    Some(FontSource::Local(family.to_string()))
                }
                _ => None,
            })
            .collect()
    }

    /// `font-style`, defaulting to `normal`.
    pub fn font_style(&self) -> &str {
        self.descriptor("font-style")
            .and_then(Value::as_identifier)
            .unwrap_or("normal")
    }

    /// `font-weight`, which may be a keyword or a number.
    pub fn font_weight(&self) -> Option<&Value> {
        self.descriptor("font-weight")
    }

    /// `embed-as-cff`, defaulting to `true`.
    pub fn embed_as_cff(&self) -> bool {
        self.flag("embed-as-cff").unwrap_or(true)
    }

    /// `advanced-anti-aliasing`, defaulting to `true`.
    pub fn advanced_anti_aliasing(&self) -> bool {
        self.flag("advanced-anti-aliasing").unwrap_or(true)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        let word = self.descriptor(name)?.as_identifier()?;
        if word.eq_ignore_ascii_case("true") {
            Some(true)
        } else if word.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@font-face {")?;
        for descriptor in &self.descriptors {
            write!(f, " {descriptor};")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(descriptors: Vec<(&str, Value)>) -> FontFace {
        FontFace::new(
            descriptors
                .into_iter()
                .map(|(name, value)| Declaration::new(name, value))
                .collect(),
            Span::default(),
        )
    }

    #[test]
    fn descriptor_names_fold() {
        let face = face(vec![("fontFamily", Value::String("Open Sans".into()))]);
        assert_eq!(face.font_family(), Some("Open Sans"));
        assert!(face.descriptor("FONT-FAMILY").is_some());
    }

    #[test]
    fn sources_in_order() {
        let face = face(vec![(
            "src",
            Value::CommaList(vec![
                Value::FunctionCall {
                    name: "local".into(),
                    arguments: vec![Value::String("Open Sans".into())],
                },
                Value::SpaceList(vec![
                    Value::Url("fonts/open.ttf".into()),
                    Value::FunctionCall {
                        name: "format".into(),
                        arguments: vec![Value::String("truetype".into())],
                    },
                ]),
            ]),
        )]);
        assert_eq!(
            face.sources(),
            vec![
                FontSource::Local("Open Sans".into()),
                FontSource::Url("fonts/open.ttf".into()),
            ]
        );
    }

    #[test]
    fn defaults() {
        let face = face(vec![("src", Value::Url("a.ttf".into()))]);
        assert_eq!(face.font_style(), "normal");
        assert!(face.font_weight().is_none());
        assert!(face.embed_as_cff());
        assert!(face.advanced_anti_aliasing());
    }

    #[test]
    fn flags() {
        let face = face(vec![
            ("embedAsCFF", Value::identifier("false")),
            ("fontStyle", Value::identifier("italic")),
            ("fontWeight", Value::identifier("bold")),
        ]);
        assert!(!face.embed_as_cff());
        assert_eq!(face.font_style(), "italic");
        assert_eq!(
            face.font_weight().and_then(Value::as_identifier),
            Some("bold")
        );
    }

    #[test]
    fn display() {
        let face = face(vec![("src", Value::Url("f.ttf".into()))]);
        assert_eq!(face.to_string(), "@font-face { src: url(\"f.ttf\"); }");
    }
}
