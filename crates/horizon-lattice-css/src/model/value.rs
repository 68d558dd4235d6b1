//! Property value expressions.

use std::fmt;

use cssparser::{serialize_identifier, serialize_name, serialize_string};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse the digits of a hex color (without `#`).
    ///
    /// Accepts `rgb`, `rrggbb` and `rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let short = |i: usize| {
            let digit = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
            Some(digit * 17)
        };

        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// A property value.
///
/// Lists keep the separator shape of the source: a comma list of space lists
/// of slash lists, from loosest to tightest binding. `Display` writes CSS
/// that parses back to the same value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A quoted string, unescaped.
    String(String),
    /// A number with an optional unit (`12`, `1.5em`, `50%`).
    Number {
        /// The numeric part.
        value: f32,
        /// The unit as written; `%` for percentages.
        unit: Option<String>,
    },
    /// A bare identifier (`red`, `bold`, `sans-serif`).
    Identifier(String),
    /// A hex color or `rgb()`/`rgba()` call.
    Color(Color),
    /// The address of a `url(...)`.
    Url(String),
    /// Any other function call.
    FunctionCall {
        /// Function name as written.
        name: String,
        /// Comma-separated arguments.
        arguments: Vec<Value>,
    },
    /// A `name=value` argument, as in `Embed(source="icon.png")`.
    Named {
        /// Argument name.
        name: String,
        /// Argument value.
        value: Box<Value>,
    },
    /// Values separated by commas.
    CommaList(Vec<Value>),
    /// Values separated by whitespace.
    SpaceList(Vec<Value>),
    /// Values separated by `/`.
    SlashList(Vec<Value>),
}

impl Value {
    /// Create a number without a unit.
    pub fn number(value: f32) -> Self {
        Value::Number { value, unit: None }
    }

    /// Create a number with a unit.
    pub fn dimension(value: f32, unit: impl Into<String>) -> Self {
        Value::Number {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Create an identifier.
    pub fn identifier(name: impl Into<String>) -> Self {
        Value::Identifier(name.into())
    }

    /// The identifier, if this is one.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Value::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The string contents, if this is a quoted string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The color, if this is one.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// The number and unit, if this is a number.
    pub fn as_number(&self) -> Option<(f32, Option<&str>)> {
        match self {
            Value::Number { value, unit } => Some((*value, unit.as_deref())),
            _ => None,
        }
    }

    /// The address, if this is a URL.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Value::Url(url) => Some(url.as_str()),
            _ => None,
        }
    }

    /// The items of a list value, or the value itself as a one-item slice.
    pub fn items(&self) -> &[Value] {
        match self {
            Value::CommaList(items) | Value::SpaceList(items) | Value::SlashList(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => serialize_string(s, f),
            Value::Number { value, unit } => {
                write!(f, "{value}")?;
                match unit.as_deref() {
                    Some("%") => f.write_str("%"),
                    Some(unit) => write_unit(f, unit),
                    None => Ok(()),
                }
            }
            Value::Identifier(name) => serialize_identifier(name, f),
            Value::Color(color) => write!(f, "{color}"),
            Value::Url(url) => {
                f.write_str("url(")?;
                serialize_string(url, f)?;
                f.write_str(")")
            }
            Value::FunctionCall { name, arguments } => {
                serialize_identifier(name, f)?;
                f.write_str("(")?;
                write_joined(f, arguments, ", ")?;
                f.write_str(")")
            }
            Value::Named { name, value } => {
                serialize_identifier(name, f)?;
                write!(f, "={value}")
            }
            Value::CommaList(items) => write_joined(f, items, ", "),
            Value::SpaceList(items) => write_joined(f, items, " "),
            Value::SlashList(items) => write_joined(f, items, "/"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A unit starting with `e` would read back as an exponent (`1e3`).
fn write_unit(f: &mut fmt::Formatter<'_>, unit: &str) -> fmt::Result {
    let mut chars = unit.chars();
    match (chars.next(), chars.next()) {
        (Some(e @ ('e' | 'E')), next)
            if next.is_none_or(|c| c.is_ascii_digit() || c == '+' || c == '-') =>
        {
            write!(f, "\\{:x} ", e as u32)?;
            serialize_name(&unit[1..], f)
        }
        _ => serialize_identifier(unit, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex("f00"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_hex("ff000080"),
            Some(Color::rgba(255, 0, 0, 0x80))
        );
        assert_eq!(Color::from_hex("ff00"), None);
        assert_eq!(Color::from_hex("ggg"), None);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::rgb(255, 0, 0).to_string(), "#ff0000");
        assert_eq!(Color::rgba(0, 0, 255, 0).to_string(), "#0000ff00");
    }

    #[test]
    fn list_display_keeps_separators() {
        let value = Value::CommaList(vec![
            Value::SpaceList(vec![
                Value::SlashList(vec![Value::dimension(12.0, "px"), Value::number(1.5)]),
                Value::identifier("Arial"),
            ]),
            Value::identifier("sans-serif"),
        ]);
        assert_eq!(value.to_string(), "12px/1.5 Arial, sans-serif");
    }

    #[test]
    fn string_display_escapes() {
        let value = Value::String("say \"hi\"\n".into());
        assert_eq!(value.to_string(), r#""say \"hi\"\a ""#);
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(Value::String("a\rb".into()).to_string(), r#""a\d b""#);
    }

    #[test]
    fn escaped_identifiers_and_units() {
        assert_eq!(Value::identifier("1a").to_string(), r"\31 a");
        assert_eq!(Value::identifier("a b").to_string(), r"a\ b");
        assert_eq!(Value::dimension(1.0, "e3").to_string(), r"1\65 3");
        assert_eq!(Value::dimension(1.0, "em").to_string(), "1em");
        assert_eq!(Value::dimension(50.0, "%").to_string(), "50%");
    }

    #[test]
    fn function_display() {
        let value = Value::FunctionCall {
            name: "Embed".into(),
            arguments: vec![Value::Named {
                name: "source".into(),
                value: Box::new(Value::String("icon.png".into())),
            }],
        };
        assert_eq!(value.to_string(), r#"Embed(source="icon.png")"#);
        assert_eq!(Value::Url("a.png".into()).to_string(), r#"url("a.png")"#);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::identifier("red").as_identifier(), Some("red"));
        assert_eq!(Value::dimension(2.0, "em").as_number(), Some((2.0, Some("em"))));
        assert_eq!(Value::identifier("red").as_string(), None);
        assert_eq!(Value::identifier("a").items().len(), 1);
    }
}
