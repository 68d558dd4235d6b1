//! Selector building and namespace qualification.

use super::Builder;
use crate::lexer::TokenKind;
use crate::model::{
    AttributeOperator, Combinator, ElementSelector, Selector, SelectorCondition, SelectorPart,
};
use crate::parser::{NodeKind, SyntaxNode};
use crate::problems::ProblemKind;

/// The prefix that matches elements in any namespace.
const ANY_NAMESPACE: &str = "*";

/// The prefix written as a bare `|`: elements in no namespace.
const NO_NAMESPACE: &str = "";

impl Builder<'_, '_> {
    pub(super) fn selector_list(&mut self, node: &SyntaxNode) -> Vec<Selector> {
        node.nodes()
            .filter(|n| n.kind == NodeKind::Selector)
            .filter_map(|n| self.selector(n))
            .collect()
    }

    fn selector(&mut self, node: &SyntaxNode) -> Option<Selector> {
        let mut parts = vec![];
        let mut combinators = vec![];

        for child in node.nodes() {
            match child.kind {
                NodeKind::SimpleSelector => parts.push(self.selector_part(child)),
                NodeKind::Combinator => combinators.push(match self.kind(child.first_token)? {
                    TokenKind::Greater => Combinator::Child,
                    TokenKind::Plus => Combinator::AdjacentSibling,
                    TokenKind::Tilde => Combinator::GeneralSibling,
                    _ => Combinator::Descendant,
                }),
                _ => {}
            }
        }

        if parts.is_empty() {
            return None;
        }

        Some(Selector {
            parts,
            combinators,
            span: node.span(self.tokens),
        })
    }

    fn selector_part(&mut self, node: &SyntaxNode) -> SelectorPart {
        let mut part = SelectorPart::new();

        for child in node.nodes() {
            let first = self.kind(child.first_token);
            match child.kind {
                NodeKind::NamespacePrefix => {
                    part.namespace_prefix = match first {
                        Some(TokenKind::Ident(prefix)) => Some(prefix.clone()),
                        Some(TokenKind::Asterisk) => Some(ANY_NAMESPACE.to_string()),
                        Some(TokenKind::Pipe) => Some(NO_NAMESPACE.to_string()),
                        _ => None,
                    };
                }
                NodeKind::ElementName => {
                    part.element = match first {
                        Some(TokenKind::Ident(name)) => Some(ElementSelector::Type(name.clone())),
                        Some(TokenKind::Asterisk) => Some(ElementSelector::Universal),
                        _ => None,
                    };
                }
                NodeKind::IdSelector => {
                    if let Some(TokenKind::Hash { value, .. }) = first {
                        part.conditions.push(SelectorCondition::Id(value.clone()));
                    }
                }
                NodeKind::ClassSelector => {
                    if let Some(name) = child.tokens().nth(1).and_then(|i| self.ident(i)) {
                        part.conditions
                            .push(SelectorCondition::Class(name.to_string()));
                    }
                }
                NodeKind::AttributeSelector => {
                    if let Some(condition) = self.attribute(child) {
                        part.conditions.push(condition);
                    }
                }
                NodeKind::PseudoSelector => {
                    if let Some(condition) = self.pseudo(child) {
                        part.conditions.push(condition);
                    }
                }
                _ => {}
            }
        }

        self.qualify(&mut part, node);
        part
    }

    /// Resolve the namespace of a part against the namespaces declared so far.
    fn qualify(&mut self, part: &mut SelectorPart, node: &SyntaxNode) {
        match part.namespace_prefix.as_deref() {
            Some(ANY_NAMESPACE | NO_NAMESPACE) => {}
            Some(prefix) => match self.namespace_uri(prefix) {
                Some(uri) => part.namespace_uri = Some(uri),
                None => {
                    let span = node
                        .child(NodeKind::NamespacePrefix)
                        .unwrap_or(node)
                        .span(self.tokens);
                    self.report(ProblemKind::UnknownNamespace, span, &[("prefix", prefix)]);
                }
            },
            None => {
                if part.element.is_some() && self.options.qualified_type_selectors {
                    part.namespace_uri = self.namespace_uri("");
                }
            }
        }
    }

    fn namespace_uri(&self, prefix: &str) -> Option<String> {
        self.namespace_lookup
            .get(prefix)
            .and_then(|&index| self.namespaces.get(index))
            .map(|ns| ns.uri.clone())
    }

    fn attribute(&self, node: &SyntaxNode) -> Option<SelectorCondition> {
        // [ name (op value)? ]
        let mut kinds = node.tokens().filter_map(|index| self.kind(index)).skip(1);

        let name = match kinds.next()? {
            TokenKind::Ident(name) => name.clone(),
            _ => return None,
        };

        let operator = match kinds.next()? {
            TokenKind::Equals => AttributeOperator::Equals,
            TokenKind::IncludeMatch => AttributeOperator::Includes,
            TokenKind::DashMatch => AttributeOperator::DashMatch,
            TokenKind::PrefixMatch => AttributeOperator::Prefix,
            TokenKind::SuffixMatch => AttributeOperator::Suffix,
            TokenKind::SubstringMatch => AttributeOperator::Substring,
            _ => {
                return Some(SelectorCondition::Attribute {
                    name,
                    matcher: None,
                });
            }
        };

        let value = match kinds.next()? {
            TokenKind::Ident(value) | TokenKind::String(value) => value.clone(),
            _ => return None,
        };

        Some(SelectorCondition::Attribute {
            name,
            matcher: Some((operator, value)),
        })
    }

    fn pseudo(&self, node: &SyntaxNode) -> Option<SelectorCondition> {
        // : :? (name | function args ')')
        let indices: Vec<usize> = node.tokens().collect();
        let element = matches!(
            indices.get(1).and_then(|&i| self.kind(i)),
            Some(TokenKind::Colon)
        );
        let name_at = if element { 2 } else { 1 };

        match self.kind(*indices.get(name_at)?)? {
            TokenKind::Ident(name) => Some(SelectorCondition::Pseudo {
                name: name.clone(),
                argument: None,
                element,
            }),
            TokenKind::Function(name) => {
                let inner = indices
                    .get(name_at + 1..indices.len().saturating_sub(1))
                    .unwrap_or(&[]);
                let argument: String = inner
                    .iter()
                    .filter_map(|&i| self.token(i))
                    .map(|t| t.text.as_str())
                    .collect();
                Some(SelectorCondition::Pseudo {
                    name: name.clone(),
                    argument: Some(argument.trim().to_string()),
                    element,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::build_document;
    use crate::lexer::tokenize;
    use crate::model::{CssDocument, Selector};
    use crate::options::ParseOptions;
    use crate::parser::parse_tokens;
    use crate::problems::{Problem, ProblemKind};

    use super::*;

    fn build_with(css: &str, options: &ParseOptions) -> (CssDocument, Vec<Problem>) {
        let mut problems = vec![];
        let tokens = tokenize("test.css", css, options, &mut problems).unwrap();
        let tree = parse_tokens("test.css", &tokens, &mut problems);
        let document = build_document("test.css", &tokens, &tree, options, &mut problems);
        (document, problems)
    }

    fn selectors(css: &str) -> (Vec<Selector>, Vec<Problem>) {
        let (doc, problems) = build_with(css, &ParseOptions::default());
        let selectors = doc
            .rules()
            .iter()
            .flat_map(|r| r.selectors.clone())
            .collect();
        (selectors, problems)
    }

    #[test]
    fn explicit_prefix_resolves() {
        let (sel, problems) = selectors("@namespace s \"spark\"; s|Button.primary { a: b }");
        assert!(problems.is_empty());
        let part = &sel[0].parts[0];
        assert_eq!(part.namespace_prefix.as_deref(), Some("s"));
        assert_eq!(part.namespace_uri.as_deref(), Some("spark"));
        assert_eq!(part.element_name(), Some("Button"));
        assert_eq!(part.classes().collect::<Vec<_>>(), vec!["primary"]);
    }

    #[test]
    fn default_namespace_qualifies_type_selectors_only() {
        let (sel, _) = selectors("@namespace \"d\"; Button .warning, * { a: b }");
        assert_eq!(sel[0].parts[0].namespace_uri.as_deref(), Some("d"));
        assert_eq!(sel[0].parts[1].namespace_uri, None);
        assert_eq!(sel[1].parts[0].namespace_uri.as_deref(), Some("d"));
    }

    #[test]
    fn qualification_can_be_disabled() {
        let (doc, _) = build_with(
            "@namespace \"d\"; Button { a: b }",
            &ParseOptions::unqualified(),
        );
        assert_eq!(doc.rules()[0].selectors[0].parts[0].namespace_uri, None);
    }

    #[test]
    fn namespace_must_be_declared_first() {
        let (sel, problems) = selectors("s|Button { a: b } @namespace s \"spark\";");
        assert_eq!(sel[0].parts[0].namespace_uri, None);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::UnknownNamespace);
    }

    #[test]
    fn any_namespace_is_never_reported() {
        let (sel, problems) = selectors("*|Button { a: b }");
        assert!(problems.is_empty());
        assert_eq!(sel[0].parts[0].namespace_prefix.as_deref(), Some("*"));
        assert_eq!(sel[0].parts[0].namespace_uri, None);
    }

    #[test]
    fn bare_pipe_means_no_namespace() {
        let (sel, problems) = selectors("@namespace \"d\"; |Button { a: b }");
        assert!(problems.is_empty(), "{problems:?}");
        let part = &sel[0].parts[0];
        assert_eq!(part.namespace_prefix.as_deref(), Some(""));
        assert_eq!(part.namespace_uri, None);
        assert_eq!(part.element_name(), Some("Button"));
        assert_eq!(sel[0].to_string(), "|Button");
    }

    #[test]
    fn combinators_and_conditions() {
        let (sel, problems) = selectors(
            "List > Item + Item ~ Label#title[state|=\"up\"]:hover::after, A:not(.b) { a: b }",
        );
        assert!(problems.is_empty(), "{problems:?}");
        assert_eq!(
            sel[0].combinators,
            vec![
                Combinator::Child,
                Combinator::AdjacentSibling,
                Combinator::GeneralSibling,
            ]
        );
        assert_eq!(
            sel[0].to_string(),
            "List > Item + Item ~ Label#title[state|=\"up\"]:hover::after"
        );
        assert_eq!(
            sel[1].parts[0].conditions,
            vec![SelectorCondition::Pseudo {
                name: "not".into(),
                argument: Some(".b".into()),
                element: false,
            }]
        );
    }
}
