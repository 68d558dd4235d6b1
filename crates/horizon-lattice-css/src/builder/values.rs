//! Value building.
//!
//! The parser leaves a value as a flat run of terms and operator tokens. The
//! builder groups it by binding strength: `/` binds tightest, then
//! whitespace, then `,`. `12px/1.5 Arial, sans-serif` becomes a comma list
//! whose first item is a space list starting with a slash list.

use super::Builder;
use crate::lexer::TokenKind;
use crate::model::{Color, Value};
use crate::parser::{NodeKind, SyntaxElement, SyntaxNode};
use crate::problems::ProblemKind;

/// Value operators, loosest binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Operator {
    Comma,
    Space,
    Slash,
}

impl Operator {
    fn list(self, items: Vec<Value>) -> Value {
        match self {
            Operator::Comma => Value::CommaList(items),
            Operator::Space => Value::SpaceList(items),
            Operator::Slash => Value::SlashList(items),
        }
    }
}

/// Group `items` joined by `operators` (one fewer than items) into nested
/// lists, splitting at the loosest operator first.
fn combine(items: Vec<Value>, operators: &[Operator]) -> Option<Value> {
    let Some(&loosest) = operators.iter().min() else {
        return items.into_iter().next();
    };

    let mut items = items.into_iter();
    let mut groups = vec![];
    let mut group = vec![items.next()?];
    let mut group_operators = vec![];

    for (&operator, item) in operators.iter().zip(items) {
        if operator == loosest {
            groups.push(combine(std::mem::take(&mut group), &group_operators)?);
            group_operators.clear();
        } else {
            group_operators.push(operator);
        }
        group.push(item);
    }
    groups.push(combine(group, &group_operators)?);

    Some(loosest.list(groups))
}

/// `rgb(r, g, b)` and `rgba(r, g, b, a)` with numeric arguments.
fn color_function(name: &str, arguments: &[Value]) -> Option<Color> {
    let channel = |value: &Value| match value.as_number()? {
        (n, None) => Some(n.round().clamp(0.0, 255.0) as u8),
        (n, Some("%")) => Some((n * 2.55).round().clamp(0.0, 255.0) as u8),
        _ => None,
    };

    if name.eq_ignore_ascii_case("rgb") {
        let [r, g, b] = arguments else {
            return None;
        };
        Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?))
    } else if name.eq_ignore_ascii_case("rgba") {
        let [r, g, b, a] = arguments else {
            return None;
        };
        let (alpha, None) = a.as_number()? else {
            return None;
        };
        let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Some(Color::rgba(channel(r)?, channel(g)?, channel(b)?, alpha))
    } else {
        None
    }
}

impl Builder<'_, '_> {
    /// Build a [`NodeKind::Value`] node.
    pub(super) fn value(&mut self, node: &SyntaxNode) -> Option<Value> {
        let mut items = vec![];
        let mut operators = vec![];
        let mut pending = None;

        for child in &node.children {
            match child {
                SyntaxElement::Token(index) => {
                    pending = match self.kind(*index) {
                        Some(TokenKind::Comma) => Some(Operator::Comma),
                        Some(TokenKind::Slash) => Some(Operator::Slash),
                        Some(TokenKind::Whitespace) => Some(Operator::Space),
                        _ => pending,
                    };
                }
                SyntaxElement::Node(term) => {
                    let Some(value) = self.term(term) else {
                        continue;
                    };
                    if !items.is_empty() {
                        // Terms written back to back (`1px"a"`) are a space list.
                        operators.push(pending.unwrap_or(Operator::Space));
                    }
                    pending = None;
                    items.push(value);
                }
            }
        }

        combine(items, &operators)
    }

    fn term(&mut self, node: &SyntaxNode) -> Option<Value> {
        match node.kind {
            NodeKind::Term => self.literal(node.first_token),
            NodeKind::FunctionCall => self.function_call(node),
            NodeKind::NamedArgument => {
                let name = self.ident(node.first_token)?;
                let value = self.term(node.nodes().next()?)?;
                Some(Value::Named {
                    name: name.to_string(),
                    value: Box::new(value),
                })
            }
            _ => None,
        }
    }

    fn literal(&mut self, index: usize) -> Option<Value> {
        let token = self.token(index)?;
        let value = match &token.kind {
            TokenKind::Number(n) => Value::number(*n),
            TokenKind::Percentage(n) => Value::dimension(*n, "%"),
            TokenKind::Dimension { value, unit } => Value::dimension(*value, unit.clone()),
            TokenKind::String(s) => Value::String(s.clone()),
            TokenKind::Ident(name) => Value::Identifier(name.clone()),
            TokenKind::Url(url) => Value::Url(url.clone()),
            TokenKind::Hash { value, .. } => match Color::from_hex(value) {
                Some(color) => Value::Color(color),
                None => {
                    self.report(
                        ProblemKind::InvalidColor,
                        token.span,
                        &[("color", token.text.as_str())],
                    );
                    Value::Identifier(token.text.clone())
                }
            },
            _ => return None,
        };
        Some(value)
    }

    fn function_call(&mut self, node: &SyntaxNode) -> Option<Value> {
        let name = match self.kind(node.first_token)? {
            TokenKind::Function(name) => name,
            _ => return None,
        };

        let arguments = match node.child(NodeKind::Value) {
            Some(value) => match self.value(value)? {
                Value::CommaList(items) => items,
                single => vec![single],
            },
            None => vec![],
        };

        if let Some(color) = color_function(name, &arguments) {
            return Some(Value::Color(color));
        }

        Some(Value::FunctionCall {
            name: name.clone(),
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_document;
    use crate::lexer::tokenize;
    use crate::options::ParseOptions;
    use crate::parser::parse_tokens;
    use crate::problems::Problem;

    fn value_of(css_value: &str) -> (Option<Value>, Vec<Problem>) {
        let css = format!("Foo {{ p: {css_value}; }}");
        let options = ParseOptions::default();
        let mut problems = vec![];
        let tokens = tokenize("test.css", &css, &options, &mut problems).unwrap();
        let tree = parse_tokens("test.css", &tokens, &mut problems);
        let doc = build_document("test.css", &tokens, &tree, &options, &mut problems);
        let value = doc
            .rules()
            .first()
            .and_then(|r| r.declaration("p"))
            .map(|d| d.value.clone());
        (value, problems)
    }

    fn id(name: &str) -> Value {
        Value::identifier(name)
    }

    #[test]
    fn operator_precedence() {
        let (value, _) = value_of("12px/1.5 Arial, sans-serif");
        assert_eq!(
            value,
            Some(Value::CommaList(vec![
                Value::SpaceList(vec![
                    Value::SlashList(vec![Value::dimension(12.0, "px"), Value::number(1.5)]),
                    id("Arial"),
                ]),
                id("sans-serif"),
            ]))
        );
    }

    #[test]
    fn single_term_is_not_a_list() {
        assert_eq!(value_of("red").0, Some(id("red")));
        assert_eq!(value_of("50%").0, Some(Value::dimension(50.0, "%")));
        assert_eq!(value_of("-2.5em").0, Some(Value::dimension(-2.5, "em")));
    }

    #[test]
    fn hex_colors_normalise() {
        assert_eq!(value_of("#f00").0, Some(Value::Color(Color::rgb(255, 0, 0))));
        assert_eq!(
            value_of("#FF000080").0,
            Some(Value::Color(Color::rgba(255, 0, 0, 128)))
        );
    }

    #[test]
    fn invalid_hex_is_reported_and_kept() {
        let (value, problems) = value_of("#abcd");
        assert_eq!(value, Some(id("#abcd")));
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::InvalidColor);
        assert_eq!(problems[0].param("color"), Some("#abcd"));
    }

    #[test]
    fn rgb_function_becomes_color() {
        assert_eq!(
            value_of("rgb(255, 128, 0)").0,
            Some(Value::Color(Color::rgb(255, 128, 0)))
        );
        assert_eq!(
            value_of("rgba(0, 0, 255, 0.5)").0,
            Some(Value::Color(Color::rgba(0, 0, 255, 128)))
        );
        assert!(matches!(
            value_of("rgb(a, b, c)").0,
            Some(Value::FunctionCall { .. })
        ));
    }

    #[test]
    fn function_arguments_and_named_values() {
        let (value, problems) = value_of("Embed(source=\"icon.png\", mimeType=\"image/png\")");
        assert!(problems.is_empty());
        let Some(Value::FunctionCall { name, arguments }) = value else {
            panic!("expected function call");
        };
        assert_eq!(name, "Embed");
        assert_eq!(arguments.len(), 2);
        assert_eq!(
            arguments[0],
            Value::Named {
                name: "source".into(),
                value: Box::new(Value::String("icon.png".into())),
            }
        );
    }

    #[test]
    fn display_reparses_to_same_value() {
        for text in [
            "12px/1.5 Arial, sans-serif",
            "url(\"a b.png\") no-repeat",
            "PropertyReference(\"x\")",
            "1 2 3, 4/5",
            "\"quoted \\\" string\"",
            "\"a\\d b\"",
            "\\31 a",
            "a\\ b",
            "1e39",
            "1\\65 3",
            "Embed(\\31 x=2)",
        ] {
            let (first, _) = value_of(text);
            let first = first.unwrap();
            let (second, _) = value_of(&first.to_string());
            assert_eq!(Some(first), second, "{text}");
        }
    }
}
