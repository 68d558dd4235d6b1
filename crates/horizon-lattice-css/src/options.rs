//! Parse configuration.

/// Options controlling a stylesheet parse.
///
/// The defaults match what the compiler uses for application stylesheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest block nesting (`{`, `(`, `[`, functions) the lexer descends
    /// into. Anything deeper makes the parse unrecoverable.
    pub max_nesting_depth: usize,
    /// Whether unprefixed type selectors are qualified with the default
    /// namespace.
    pub qualified_type_selectors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            qualified_type_selectors: true,
        }
    }
}

impl ParseOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for untrusted input: a tight nesting limit.
    pub fn strict() -> Self {
        Self {
            max_nesting_depth: 16,
            ..Default::default()
        }
    }

    /// Options that leave unprefixed type selectors without a namespace.
    pub fn unqualified() -> Self {
        Self {
            qualified_type_selectors: false,
            ..Default::default()
        }
    }

    /// Set the nesting limit.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Enable or disable default-namespace qualification.
    pub fn with_qualified_type_selectors(mut self, qualified: bool) -> Self {
        self.qualified_type_selectors = qualified;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(ParseOptions::default().max_nesting_depth, 64);
        assert!(ParseOptions::default().qualified_type_selectors);
        assert_eq!(ParseOptions::strict().max_nesting_depth, 16);
        assert!(!ParseOptions::unqualified().qualified_type_selectors);
    }

    #[test]
    fn builder_methods() {
        let options = ParseOptions::new()
            .with_max_nesting_depth(3)
            .with_qualified_type_selectors(false);
        assert_eq!(options.max_nesting_depth, 3);
        assert!(!options.qualified_type_selectors);
    }
}
