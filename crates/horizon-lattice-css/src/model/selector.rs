//! Selector types.

use std::fmt;

use crate::source::Span;

/// A complex selector (e.g., `s|Button.primary:hover > Label`).
///
/// A selector consists of one or more compound parts connected by combinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Compound parts, left to right.
    pub parts: Vec<SelectorPart>,
    /// Combinators between parts (length = parts.len() - 1).
    pub combinators: Vec<Combinator>,
    /// Location in the source.
    pub span: Span,
}

impl Selector {
    /// Create a selector from a single part.
    pub fn simple(part: SelectorPart) -> Self {
        Self {
            parts: vec![part],
            combinators: vec![],
            span: Span::default(),
        }
    }

    /// Append a part joined by `combinator`.
    pub fn then(mut self, combinator: Combinator, part: SelectorPart) -> Self {
        if !self.parts.is_empty() {
            self.combinators.push(combinator);
        }
        self.parts.push(part);
        self
    }

    /// The rightmost (subject) part.
    pub fn subject(&self) -> Option<&SelectorPart> {
        self.parts.last()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if let Some(combinator) = i.checked_sub(1).and_then(|j| self.combinators.get(j)) {
                write!(f, "{combinator}")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A compound selector (e.g., `s|Button.primary:hover`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    /// The explicit namespace prefix as written; `*` for any namespace and
    /// empty for a bare `|` (no namespace).
    pub namespace_prefix: Option<String>,
    /// The resolved namespace URI of the element name.
    ///
    /// Absent for `*|` and `|`, for unknown prefixes, and for parts without an
    /// element name when no default namespace applies.
    pub namespace_uri: Option<String>,
    /// Element name or universal selector.
    pub element: Option<ElementSelector>,
    /// Id, class, attribute and pseudo conditions in source order.
    pub conditions: Vec<SelectorCondition>,
}

impl SelectorPart {
    /// Create an empty part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a type-only part.
    pub fn type_only(name: impl Into<String>) -> Self {
        Self {
            element: Some(ElementSelector::Type(name.into())),
            ..Default::default()
        }
    }

    /// Create a universal part.
    pub fn universal() -> Self {
        Self {
            element: Some(ElementSelector::Universal),
            ..Default::default()
        }
    }

    /// Set the namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = Some(prefix.into());
        self
    }

    /// Set the resolved namespace URI.
    pub fn with_namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(uri.into());
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: SelectorCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The element name, if this part names a type.
    pub fn element_name(&self) -> Option<&str> {
        match &self.element {
            Some(ElementSelector::Type(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Class names in source order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().filter_map(|c| match c {
            SelectorCondition::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.namespace_prefix {
            write!(f, "{prefix}|")?;
        }
        match &self.element {
            Some(ElementSelector::Universal) => f.write_str("*")?,
            Some(ElementSelector::Type(name)) => f.write_str(name)?,
            None => {}
        }
        for condition in &self.conditions {
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// Element selector - matches by type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementSelector {
    /// `*`
    Universal,
    /// A named type (e.g., `Button`).
    Type(String),
}

/// A condition on a compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorCondition {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `:name`, `::name` or `:name(argument)`.
    Pseudo {
        /// Name without colons.
        name: String,
        /// Raw argument text of a functional pseudo-class.
        argument: Option<String>,
        /// Written with `::`.
        element: bool,
    },
    /// `[name]` or `[name op value]`.
    Attribute {
        /// Attribute name.
        name: String,
        /// Operator and value, when present.
        matcher: Option<(AttributeOperator, String)>,
    },
}

impl fmt::Display for SelectorCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorCondition::Class(name) => write!(f, ".{name}"),
            SelectorCondition::Id(name) => write!(f, "#{name}"),
            SelectorCondition::Pseudo {
                name,
                argument,
                element,
            } => {
                f.write_str(if *element { "::" } else { ":" })?;
                f.write_str(name)?;
                if let Some(argument) = argument {
                    write!(f, "({argument})")?;
                }
                Ok(())
            }
            SelectorCondition::Attribute { name, matcher } => match matcher {
                Some((operator, value)) => write!(f, "[{name}{operator}\"{value}\"]"),
                None => write!(f, "[{name}]"),
            },
        }
    }
}

/// Attribute selector operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl fmt::Display for AttributeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        })
    }
}

/// Combinator between selector parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (space).
    Descendant,
    /// Child combinator (`>`).
    Child,
    /// Adjacent sibling (`+`).
    AdjacentSibling,
    /// General sibling (`~`).
    GeneralSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::AdjacentSibling => " + ",
            Combinator::GeneralSibling => " ~ ",
        })
    }
}
