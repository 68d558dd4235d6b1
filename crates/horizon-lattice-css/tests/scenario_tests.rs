//! End-to-end parses of small stylesheets.

use horizon_lattice_css::prelude::*;
use horizon_lattice_css::problems::ProblemClass;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn parse(css: &str) -> (Option<CssDocument>, Vec<Problem>) {
    init_logging();
    let source = SourceText::new("scenario.css", css);
    let mut problems: Vec<Problem> = Vec::new();
    let document = CssDocument::parse(&source, &mut problems);
    (document, problems)
}

#[test]
fn test_prefixed_type_selector_with_hex_color() {
    let (document, problems) =
        parse("@namespace s \"library://ns.adobe.com/flex/spark\"; s|Button { color: #ff0000; }");
    let document = document.unwrap();
    assert!(problems.is_empty(), "{problems:?}");

    assert_eq!(document.namespaces().len(), 1);
    let spark = document.namespace_by_prefix("s").unwrap();
    assert_eq!(spark.uri, "library://ns.adobe.com/flex/spark");
    assert!(document.font_faces().is_empty());

    assert_eq!(document.rules().len(), 1);
    let rule = &document.rules()[0];
    assert_eq!(rule.selectors.len(), 1);
    let part = &rule.selectors[0].parts[0];
    assert_eq!(part.namespace_prefix.as_deref(), Some("s"));
    assert_eq!(part.element_name(), Some("Button"));
    assert_eq!(
        part.namespace_uri.as_deref(),
        Some("library://ns.adobe.com/flex/spark")
    );

    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].name, "color");
    assert_eq!(
        rule.declarations[0].value,
        Value::Color(Color::rgb(255, 0, 0))
    );
}

#[test]
fn test_default_namespace_qualifies_selector_group() {
    let (document, problems) = parse("@namespace \"http://default\"; Button, Label { fontSize: 12; }");
    let document = document.unwrap();
    assert!(problems.is_empty(), "{problems:?}");

    assert_eq!(
        document.default_namespace().map(|ns| ns.uri.as_str()),
        Some("http://default")
    );

    let rule = &document.rules()[0];
    assert_eq!(rule.selectors.len(), 2);
    for (selector, name) in rule.selectors.iter().zip(["Button", "Label"]) {
        let part = &selector.parts[0];
        assert_eq!(part.element_name(), Some(name));
        assert_eq!(part.namespace_uri.as_deref(), Some("http://default"));
    }

    assert_eq!(
        rule.declaration("fontSize").map(|d| &d.value),
        Some(&Value::Number {
            value: 12.0,
            unit: None
        })
    );
}

#[test]
fn test_duplicate_namespace_keeps_first() {
    let css = "@namespace s \"a\"; @namespace s \"b\";";
    let (document, problems) = parse(css);
    let document = document.unwrap();

    assert_eq!(document.namespaces().len(), 1);
    assert_eq!(document.namespace_by_prefix("s").map(|ns| ns.uri.as_str()), Some("a"));

    assert_eq!(problems.len(), 1);
    let problem = &problems[0];
    assert_eq!(problem.kind, ProblemKind::DuplicateNamespace);
    assert_eq!(problem.kind.name(), "duplicate-namespace");
    assert_eq!(problem.code(), 1440);
    assert_eq!(problem.param("prefix"), Some("s"));

    // Cites the second declaration.
    let second = css.rfind("@namespace").unwrap() as u32 + 1;
    assert_eq!(problem.span.start, Position::new(1, second));
}

#[test]
fn test_unknown_namespace_prefix_is_kept() {
    let (document, problems) = parse("x|Foo { color: red }");
    let document = document.unwrap();

    assert_eq!(document.rules().len(), 1);
    let part = &document.rules()[0].selectors[0].parts[0];
    assert_eq!(part.namespace_prefix.as_deref(), Some("x"));
    assert_eq!(part.namespace_uri, None);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, ProblemKind::UnknownNamespace);
    assert_eq!(problems[0].kind.name(), "unknown-namespace");
    assert_eq!(problems[0].param("prefix"), Some("x"));
    assert_eq!(problems[0].message(), "Unknown namespace prefix 'x'.");
}

#[test]
fn test_font_face_and_rule() {
    let (document, problems) =
        parse("@font-face { src: url(\"f.ttf\"); fontFamily: \"F\" } Foo { color: red; }");
    let document = document.unwrap();
    assert!(problems.is_empty(), "{problems:?}");

    assert_eq!(document.font_faces().len(), 1);
    let face = &document.font_faces()[0];
    assert_eq!(face.descriptors.len(), 2);
    assert_eq!(face.sources(), vec![FontSource::Url("f.ttf".into())]);
    assert_eq!(face.font_family(), Some("F"));

    assert_eq!(document.rules().len(), 1);
}

#[test]
fn test_missing_value_recovers_at_close_brace() {
    let (document, problems) = parse("Foo { color: }");
    let document = document.unwrap();

    assert_eq!(document.rules().len(), 1);
    let rule = &document.rules()[0];
    assert_eq!(rule.selectors[0].to_string(), "Foo");
    assert!(rule.declaration("color").is_none());

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind.class(), ProblemClass::Syntactic);
    assert_eq!(problems[0].kind, ProblemKind::MissingPropertyValue);
}

#[test]
fn test_media_block_rules_carry_queries() {
    let (document, problems) = parse(
        "@media screen and (application-dpi: 240) { Button { fontSize: 18; } }\nButton { fontSize: 12; }",
    );
    let document = document.unwrap();
    assert!(problems.is_empty(), "{problems:?}");

    let rules = document.rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].media().len(), 1);
    assert_eq!(
        rules[0].media()[0].to_string(),
        "screen and (application-dpi: 240)"
    );
    assert!(rules[1].media().is_empty());
    assert_eq!(rules[1].span.start.line, 2);
}

#[test]
fn test_render_debug_golden() {
    let (document, problems) = parse(
        "@namespace s \"library://spark\";\n\
         @font-face { src: url(a.ttf); fontFamily: A; }\n\
         s|Button:over, .warning > Label { color: #f00; font: 12px/1.5 Arial, sans-serif !important; }\n\
         @media print { Label { icon: Embed(source=\"x.png\"); } }",
    );
    assert!(problems.is_empty(), "{problems:?}");
    assert_eq!(
        document.unwrap().render_debug(),
        "@namespace s \"library://spark\";\n\
         @font-face { src: url(\"a.ttf\"); fontFamily: A; }\n\
         s|Button:over, .warning > Label { color: #ff0000; font: 12px/1.5 Arial, sans-serif !important; }\n\
         @media print { Label { icon: Embed(source=\"x.png\"); } }"
    );
}

#[test]
fn test_problem_display_format() {
    let (_, problems) = parse("Foo {\n  color: #12;\n}");
    assert_eq!(problems.len(), 1);
    assert_eq!(
        problems[0].to_string(),
        "scenario.css:2:10: error[1443]: '#12' is not a valid color."
    );
    assert_eq!(problems[0].severity(), Severity::Error);
}
