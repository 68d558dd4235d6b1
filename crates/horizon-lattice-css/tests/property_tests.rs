//! Tests for properties that hold for every input, valid or not.

use horizon_lattice_css::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const MAX_INPUT_LEN: usize = 64 * 1024;

const SAMPLES: &[&str] = &[
    "",
    "Foo { color: red }",
    "@namespace s \"library://spark\"; s|Button { color: #ff0000; }",
    "@namespace \"d\"; @namespace \"e\"; Button { a: b }",
    "x|Foo { color: red }",
    "Foo { color: }",
    "Foo { color: #12; } Bar { a: b",
    "@font-face { src: url(a.ttf); src: url(b.ttf); } @media print { A { b: c } }",
    "@unknown foo; @media { } .a, , .b { c: d }",
    "Foo { a: \"unterminated\n b: c }",
    "/* never closed",
    "} } ; Foo { a: b }",
];

const FRAGMENTS: &[&str] = &[
    "@namespace", "@media", "@font-face", "@import", "s|", "*|", "Button", ".a", "#b", ":hover",
    "::after", "[x=\"y\"]", ">", "+", "~", ",", "{", "}", "(", ")", "[", "]", ";", ":", "color",
    "red", "12px", "1.5", "/", "\"str\"", "'s", "url(", "url(a.png)", "rgb(1,2,3)", "!important",
    "/*", "*/", "\\", "\n", " ", "\t", "#zz", "@", "=", "Embed(source=", "é", "\u{fffd}",
    "and", "only", "not", "screen", "(application-dpi: 240)", "|", "*", "@namespace s \"a\";",
];

/// A caught panic shows up as this problem instead of unwinding.
fn assert_no_internal_failure(problems: &[Problem], input: &str) {
    assert!(
        !problems
            .iter()
            .any(|p| p.kind == ProblemKind::UnexpectedException),
        "pipeline panicked on {input:?}: {problems:?}"
    );
}

fn parse(source_name: &str, css: &str) -> (Option<CssDocument>, Vec<Problem>) {
    let source = SourceText::new(source_name, css);
    let mut problems: Vec<Problem> = Vec::new();
    let document = parse_css(&source, &mut problems);
    (document, problems)
}

#[test]
fn test_parsing_is_pure() {
    for css in SAMPLES {
        let (first_doc, first_problems) = parse("pure.css", css);
        let (second_doc, second_problems) = parse("pure.css", css);
        assert_eq!(first_doc, second_doc, "{css:?}");
        assert_eq!(first_problems, second_problems, "{css:?}");
    }
}

#[test]
fn test_rules_follow_source_order() {
    let css = "A { n: 1 } @media print { B { n: 2 } C { n: 3 } } D { n: 4 } @font-face { src: url(x) } E { n: 5 }";
    let (document, problems) = parse("order.css", css);
    assert!(problems.is_empty(), "{problems:?}");

    let document = document.unwrap();
    let names: Vec<_> = document
        .rules()
        .iter()
        .map(|rule| rule.selectors[0].to_string())
        .collect();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);

    let starts: Vec<_> = document.rules().iter().map(|rule| rule.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn test_namespace_lookup_matches_declarations() {
    for css in SAMPLES {
        let (Some(document), _) = parse("lookup.css", css) else {
            continue;
        };
        for namespace in document.namespaces() {
            assert_eq!(
                document.namespace_by_prefix(namespace.lookup_key()),
                Some(namespace),
                "{css:?}"
            );
        }
        assert_eq!(document.default_namespace(), document.namespace_by_prefix(""));
    }
}

#[test]
fn test_invalid_suffix_keeps_prefix_problems() {
    let prefixes = [
        "Foo { a: b }",
        "x|Foo { color: red }",
        "@namespace s \"a\"; @namespace s \"b\";",
        "Foo { color: #12; }",
    ];
    let suffixes = ["} } ;", "Foo {", "@media {", "#### {", "a: b;", "\"open", "/* open", "url(", "{{{{"];

    for prefix in prefixes {
        let (_, before) = parse("suffix.css", prefix);
        for suffix in suffixes {
            let combined = format!("{prefix} {suffix}");
            let (_, after) = parse("suffix.css", &combined);
            for problem in &before {
                assert!(
                    after.contains(problem),
                    "{combined:?} lost {problem}; got {after:?}"
                );
            }
        }
    }
}

#[test]
fn test_deep_nesting_is_reported_not_fatal() {
    let css = format!("Foo {{ a: {}", "(".repeat(10_000));
    let (document, problems) = parse("deep.css", &css);
    assert!(document.is_none());
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, ProblemKind::NestingTooDeep);
    assert_eq!(problems[0].param("limit"), Some("64"));
}

#[test]
fn test_random_bytes_never_panic() {
    let mut rng = StdRng::seed_from_u64(0x0c55);

    for round in 0..48 {
        let len = rng.gen_range(0..=MAX_INPUT_LEN);
        let mut bytes = vec![0u8; len];
        rng.fill(&mut bytes[..]);

        let source = SourceText::from_bytes(format!("random-{round}.css"), &bytes);
        let mut problems: Vec<Problem> = Vec::new();
        let document = parse_css(&source, &mut problems);
        assert_no_internal_failure(&problems, &format!("random-{round}.css"));
        if document.is_none() {
            assert!(!problems.is_empty());
        }
    }
}

#[test]
fn test_random_fragments_never_panic() {
    let mut rng = StdRng::seed_from_u64(0xf4a9);

    for _ in 0..200 {
        let target = rng.gen_range(0..4096);
        let mut css = String::new();
        while css.len() < target {
            if let Some(fragment) = FRAGMENTS.choose(&mut rng) {
                css.push_str(fragment);
            }
            if rng.gen_bool(0.5) {
                css.push(' ');
            }
        }

        let (document, problems) = parse("fragments.css", &css);
        assert_no_internal_failure(&problems, &css);
        if let Some(document) = document {
            for namespace in document.namespaces() {
                assert_eq!(
                    document.namespace_by_prefix(namespace.lookup_key()),
                    Some(namespace)
                );
            }
        } else {
            assert!(!problems.is_empty(), "{css:?}");
        }
    }
}

#[test]
fn test_document_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CssDocument>();
}
