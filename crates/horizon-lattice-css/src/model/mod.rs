//! The stylesheet document model.
//!
//! Plain data produced by the builder: namespaces, font faces and rules with
//! their selectors, declarations and values. Every type implements `Display`
//! as CSS text; [`CssDocument::render_debug`] concatenates them.

mod document;
mod font_face;
mod media;
mod namespace;
mod rule;
mod selector;
mod value;

pub use document::CssDocument;
pub use font_face::{FontFace, FontSource};
pub use media::{MediaFeature, MediaQualifier, MediaQuery};
pub use namespace::NamespaceDefinition;
pub use rule::{same_property, Declaration, Rule};
pub use selector::{
    AttributeOperator, Combinator, ElementSelector, Selector, SelectorCondition, SelectorPart,
};
pub use value::{Color, Value};
