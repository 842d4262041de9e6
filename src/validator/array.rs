//! Array validation (spec §4.4): draft-04/07 tuple `items` +
//! `additionalItems`, the single-schema `items` form common to every
//! dialect, draft-2020's `prefixItems`, `contains`/`minContains`/
//! `maxContains`, `uniqueItems`, and size bounds.
use super::Validator;
use crate::ast::{node_id, NodeRef};
use crate::collector::SchemaCollector;
use crate::options::Options;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::{self, SchemaMeta};
use crate::value;
use serde_json::Value;

impl Validator {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn validate_array<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let items = node.array_items().unwrap_or(&[]);

        self.check_items(node, schema, items, result, collector, options, meta);
        self.check_contains(node, schema, items, result, collector, options, meta);
        self.check_size_bounds(node, schema, items, result, meta);
        self.check_unique_items(node, schema, items, result, meta);
    }

    #[allow(clippy::too_many_arguments)]
    fn check_items<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        items: &[NodeRef],
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if self.dialect().uses_prefix_items() {
            if let Some(prefix) = schema.get("prefixItems").and_then(Value::as_array) {
                let satisfies_tuple_length = items.len() >= prefix.len();
                for (index, (item, sub_schema)) in items.iter().zip(prefix.iter()).enumerate() {
                    let mut sub_result = ValidationResult::new();
                    self.validate_node(item, sub_schema, schema, &mut sub_result, collector, options, meta);
                    let clean = !sub_result.has_problems();
                    result.absorb(sub_result);
                    result.mark_item_evaluated(node_id(node), index);
                    result.properties_matches += 1;
                    if clean && satisfies_tuple_length {
                        result.properties_value_matches += 1;
                    }
                }
                match schema.get("items") {
                    Some(Value::Bool(false)) => {
                        if items.len() > prefix.len() {
                            result.push(
                                Problem::warning(
                                    node.clone(),
                                    ProblemKind::TooManyPrefixItems { limit: prefix.len() },
                                )
                                .with_source(meta.source_label(schema)),
                            );
                        }
                    }
                    Some(rest_schema) => {
                        for (index, item) in items.iter().enumerate().skip(prefix.len()) {
                            self.validate_node(item, rest_schema, schema, result, collector, options, meta);
                            result.mark_item_evaluated(node_id(node), index);
                        }
                    }
                    None => {}
                }
                return;
            }
        }

        match schema.get("items") {
            Some(Value::Array(tuple)) => {
                let satisfies_tuple_length = items.len() >= tuple.len();
                for (index, (item, sub_schema)) in items.iter().zip(tuple.iter()).enumerate() {
                    let mut sub_result = ValidationResult::new();
                    self.validate_node(item, sub_schema, schema, &mut sub_result, collector, options, meta);
                    let clean = !sub_result.has_problems();
                    result.absorb(sub_result);
                    result.mark_item_evaluated(node_id(node), index);
                    result.properties_matches += 1;
                    if clean && satisfies_tuple_length {
                        result.properties_value_matches += 1;
                    }
                }
                match schema.get("additionalItems") {
                    Some(Value::Bool(false)) => {
                        if items.len() > tuple.len() {
                            result.push(
                                Problem::warning(
                                    node.clone(),
                                    ProblemKind::AdditionalItemsNotAllowed {
                                        unexpected_count: items.len() - tuple.len(),
                                    },
                                )
                                .with_source(meta.source_label(schema)),
                            );
                        }
                    }
                    Some(sub_schema) if !matches!(sub_schema, Value::Bool(true)) => {
                        for (index, item) in items.iter().enumerate().skip(tuple.len()) {
                            self.validate_node(item, sub_schema, schema, result, collector, options, meta);
                            result.mark_item_evaluated(node_id(node), index);
                        }
                    }
                    _ => {}
                }
            }
            Some(sub_schema) => {
                for (index, item) in items.iter().enumerate() {
                    self.validate_node(item, sub_schema, schema, result, collector, options, meta);
                    result.mark_item_evaluated(node_id(node), index);
                }
            }
            None => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_contains<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        items: &[NodeRef],
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let contains_schema = match schema.get("contains") {
            Some(v) => v,
            None => return,
        };

        let mut matched_indices = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let mut sub_result = ValidationResult::new();
            let mut sub_collector = collector.new_sub();
            self.validate_node(item, contains_schema, schema, &mut sub_result, &mut sub_collector, options, meta);
            if !sub_result.has_problems() {
                matched_indices.push(index);
                collector.merge(sub_collector, false);
            }
        }

        let min_contains = schema::get_u64(schema, "minContains");
        let max_contains = schema::get_u64(schema, "maxContains");
        let supports_min_max = self.dialect().supports_unevaluated();

        if supports_min_max {
            for &index in &matched_indices {
                result.mark_item_evaluated(node_id(node), index);
            }
        }

        let matched = matched_indices.len();
        if supports_min_max && (min_contains.is_some() || max_contains.is_some()) {
            let min_limit = min_contains.unwrap_or(1);
            if (matched as u64) < min_limit {
                result.push(
                    Problem::warning(
                        node.clone(),
                        ProblemKind::MinContains {
                            limit: min_limit,
                            actual: matched,
                        },
                    )
                    .with_source(meta.source_label(schema)),
                );
            }
            if let Some(max_limit) = max_contains {
                if (matched as u64) > max_limit {
                    result.push(
                        Problem::warning(
                            node.clone(),
                            ProblemKind::MaxContains {
                                limit: max_limit,
                                actual: matched,
                            },
                        )
                        .with_source(meta.source_label(schema)),
                    );
                }
            }
        } else if matched == 0 {
            result.push(Problem::warning(node.clone(), ProblemKind::Contains).with_source(meta.source_label(schema)));
        }
    }

    fn check_size_bounds(
        &self,
        node: &NodeRef,
        schema: &Value,
        items: &[NodeRef],
        result: &mut ValidationResult,
        meta: &SchemaMeta,
    ) {
        let count = items.len() as u64;
        if let Some(limit) = schema::get_u64(schema, "minItems") {
            if count < limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MinItems { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
        if let Some(limit) = schema::get_u64(schema, "maxItems") {
            if count > limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MaxItems { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
    }

    fn check_unique_items(
        &self,
        node: &NodeRef,
        schema: &Value,
        items: &[NodeRef],
        result: &mut ValidationResult,
        meta: &SchemaMeta,
    ) {
        if schema::get_bool(schema, "uniqueItems") != Some(true) {
            return;
        }
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if value::node_deep_equal(&items[i], &items[j]) {
                    result.push(
                        Problem::warning(node.clone(), ProblemKind::UniqueItems).with_source(meta.source_label(schema)),
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Validator;
    use crate::ast::{make_array, make_number, make_string, Span};
    use crate::diagnostic::PlainTextDocument;
    use crate::dialect::Dialect;
    use crate::options::Options;
    use serde_json::json;
    use std::rc::Rc;

    fn source() -> Rc<str> {
        Rc::from("test.yaml")
    }

    #[test]
    fn tuple_items_validate_positionally_in_draft7() {
        let schema = json!({"items": [{"type": "integer"}, {"type": "string"}], "additionalItems": false});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let b = make_number(Span::new(3, 1), 2.0, true, src.clone());
        let arr = make_array(Span::new(0, 6), vec![a, b], src);
        let document = PlainTextDocument::new("[1, 2]");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Incorrect type. Expected 'string'.");
    }

    #[test]
    fn prefix_items_with_items_false_rejects_extra_entries_in_draft2020() {
        let schema = json!({"prefixItems": [{"type": "integer"}], "items": false});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let b = make_number(Span::new(3, 1), 2.0, true, src.clone());
        let arr = make_array(Span::new(0, 6), vec![a, b], src);
        let document = PlainTextDocument::new("[1, 2]");
        let validator = Validator::new(Dialect::Draft2020);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert!(diagnostics.iter().any(|d| d.code == "maxItems"));
    }

    #[test]
    fn min_contains_counts_matching_items_in_draft2019() {
        let schema = json!({"contains": {"type": "integer"}, "minContains": 2});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let arr = make_array(Span::new(0, 3), vec![a], src);
        let document = PlainTextDocument::new("[1]");
        let validator = Validator::new(Dialect::Draft2019);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "minContains");
    }

    #[test]
    fn one_of_prefers_the_tuple_with_more_cleanly_satisfied_positions() {
        let schema = json!({"oneOf": [
            {"items": [{"type": "integer"}, {"type": "integer"}, {"type": "integer"}], "additionalItems": false},
            {"items": [{"type": "integer"}], "additionalItems": false},
        ]});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let b = make_number(Span::new(3, 1), 2.0, true, src.clone());
        let c = make_string(Span::new(5, 3), "x".into(), src.clone());
        let arr = make_array(Span::new(0, 10), vec![a, b, c], src);
        let document = PlainTextDocument::new("[1, 2, \"x\"]");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Incorrect type. Expected 'integer'.");
    }

    #[test]
    fn unique_items_detects_duplicates() {
        let schema = json!({"uniqueItems": true});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let b = make_number(Span::new(3, 1), 1.0, true, src.clone());
        let arr = make_array(Span::new(0, 6), vec![a, b], src);
        let document = PlainTextDocument::new("[1, 1]");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
    }
}
