//! Tests for the JSON form of problems.

#![cfg(feature = "serde")]

use horizon_lattice_css::prelude::*;
use serde_json::json;

#[test]
fn test_problem_serializes_with_code_and_span() {
    let source = SourceText::new("wire.css", "x|Foo { color: red }");
    let mut problems: Vec<Problem> = Vec::new();
    CssDocument::parse(&source, &mut problems).unwrap();

    let value = serde_json::to_value(&problems).unwrap();
    assert_eq!(
        value,
        json!([{
            "code": 1446,
            "kind": "unknown-namespace",
            "severity": "error",
            "description": "Unknown namespace prefix '${prefix}'.",
            "params": { "prefix": "x" },
            "source_name": "wire.css",
            "span": {
                "start": { "line": 1, "column": 1 },
                "end": { "line": 1, "column": 3 }
            }
        }])
    );
}
