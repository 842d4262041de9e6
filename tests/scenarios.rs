//! End-to-end scenarios exercising the validator the way an editor host
//! would: a hand-built document tree, a JSON Schema document, and the
//! resulting diagnostics.
use schema_doc_validator::ast::{self, NodeRef, Span};
use schema_doc_validator::diagnostic::PlainTextDocument;
use schema_doc_validator::{Dialect, Options, Validator};
use serde_json::json;
use std::rc::Rc;

fn src(name: &str) -> Rc<str> {
    Rc::from(name)
}

fn string_node(text: &str, source: Rc<str>) -> NodeRef {
    ast::make_string(Span::new(0, text.len() + 2), text.to_string(), source)
}

fn number_node(value: f64, is_integer: bool, offset: usize, length: usize, source: Rc<str>) -> NodeRef {
    ast::make_number(Span::new(offset, length), value, is_integer, source)
}

fn property(name: &str, value: NodeRef, offset: usize, source: Rc<str>) -> NodeRef {
    let key = ast::make_string(Span::new(offset, name.len() + 2), name.to_string(), source.clone());
    ast::make_property(Span::new(offset, name.len() + 4), key, offset + name.len() + 2, Some(value), source)
}

#[test]
fn type_mismatch_reports_schema_title_as_diagnostic_source() {
    let schema = json!({"title": "Port", "type": "integer"});
    let node = string_node("eighty", src("doc.yaml"));
    let document = PlainTextDocument::new("\"eighty\"");
    let validator = Validator::new(Dialect::Draft7);

    let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "Incorrect type. Expected 'integer'.");
    assert_eq!(diagnostics[0].source, "yaml-schema: Port");
}

#[test]
fn one_of_picks_the_single_clean_alternative() {
    let schema = json!({"oneOf": [
        {"type": "string", "maxLength": 3},
        {"type": "string", "maxLength": 5},
    ]});
    let node = string_node("abcd", src("doc.yaml"));
    let document = PlainTextDocument::new("\"abcd\"");
    let validator = Validator::new(Dialect::Draft7);

    let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn one_of_reports_a_single_best_match_diagnostic_when_neither_matches() {
    let schema = json!({"oneOf": [
        {"type": "string", "maxLength": 3},
        {"type": "string", "maxLength": 5},
    ]});
    let node = string_node("abcdef", src("doc.yaml"));
    let document = PlainTextDocument::new("\"abcdef\"");
    let validator = Validator::new(Dialect::Draft7);

    let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn draft4_boolean_exclusive_minimum_differs_from_draft7_numeric_form() {
    let node = number_node(0.0, true, 0, 1, src("doc.yaml"));
    let document = PlainTextDocument::new("0");

    let draft4_schema = json!({"minimum": 0, "exclusiveMinimum": true});
    let draft4 = Validator::new(Dialect::Draft4).validate_document(&node, &document, &draft4_schema, &Options::default());
    assert_eq!(draft4.len(), 1);
    assert!(draft4[0].message.contains("below exclusive minimum of 0"));

    let draft7_numeric_schema = json!({"exclusiveMinimum": 0});
    let draft7_numeric =
        Validator::new(Dialect::Draft7).validate_document(&node, &document, &draft7_numeric_schema, &Options::default());
    assert_eq!(draft7_numeric.len(), 1);
    assert!(draft7_numeric[0].message.contains("below exclusive minimum of 0"));

    // Under draft-07, a boolean `exclusiveMinimum` is not a recognized
    // modifier: it's silently ignored and plain `minimum` applies instead.
    let draft7_boolean_schema = json!({"minimum": 0, "exclusiveMinimum": true});
    let draft7_boolean =
        Validator::new(Dialect::Draft7).validate_document(&node, &document, &draft7_boolean_schema, &Options::default());
    assert!(draft7_boolean.is_empty());
}

#[test]
fn draft2020_prefix_items_with_items_false_caps_the_tuple_length() {
    let schema = json!({"prefixItems": [{"type": "integer"}, {"type": "string"}], "items": false});
    let source = src("doc.yaml");
    let items = vec![
        number_node(1.0, true, 1, 1, source.clone()),
        string_node("x", source.clone()),
        ast::make_boolean(Span::new(8, 4), true, source.clone()),
    ];
    let arr = ast::make_array(Span::new(0, 12), items, source);
    let document = PlainTextDocument::new("[1, \"x\", true]");
    let validator = Validator::new(Dialect::Draft2020);

    let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("too many items, expected 2 or fewer"));
}

#[test]
fn unevaluated_properties_false_flags_exactly_the_property_outside_all_of_branches() {
    let schema = json!({
        "allOf": [
            {"properties": {"a": {}}},
            {"properties": {"b": {}}},
        ],
        "unevaluatedProperties": false,
    });
    let source = src("doc.yaml");
    let a = property("a", number_node(1.0, true, 0, 1, source.clone()), 1, source.clone());
    let b = property("b", number_node(2.0, true, 10, 1, source.clone()), 11, source.clone());
    let c = property("c", number_node(3.0, true, 20, 1, source.clone()), 21, source.clone());
    let obj = ast::make_object(Span::new(0, 30), vec![a, b, c], source);
    let document = PlainTextDocument::new("{a: 1, b: 2, c: 3}");
    let validator = Validator::new(Dialect::Draft2019);

    let diagnostics = validator.validate_document(&obj, &document, &schema, &Options::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "PropertyExpected");
}

#[test]
fn merge_key_value_is_treated_as_evaluated_at_the_outer_level() {
    let schema = json!({"required": ["a"], "unevaluatedProperties": false});
    let source = src("doc.yaml");
    let merged_a = property("a", number_node(1.0, true, 0, 1, source.clone()), 1, source.clone());
    let base = ast::make_object(Span::new(0, 6), vec![merged_a], source.clone());
    let merge_key = {
        let key = ast::make_string(Span::new(0, 2), "<<".into(), source.clone());
        ast::make_property(Span::new(0, 10), key, 2, Some(base), source.clone())
    };
    let obj = ast::make_object(Span::new(0, 12), vec![merge_key], source);
    let document = PlainTextDocument::new("{<<: *base}");
    let validator = Validator::new(Dialect::Draft2019);

    let diagnostics = validator.validate_document(&obj, &document, &schema, &Options::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn yaml_lint_disable_suppresses_the_type_mismatch_on_the_following_line() {
    let schema = json!({"type": "integer"});
    let source = src("doc.yaml");
    let text = "# yaml-lint-disable Incorrect type\nage: \"hello\"\n";
    let age_offset = text.find("\"hello\"").unwrap();
    let node = ast::make_string(Span::new(age_offset, 7), "hello".into(), source);
    let document = PlainTextDocument::new(text);
    let validator = Validator::new(Dialect::Draft7);

    let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
    assert!(diagnostics.is_empty());
}
