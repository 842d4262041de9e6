//! `unevaluatedProperties`/`unevaluatedItems` post-processing (spec §4.5,
//! draft-2019-09 and draft-2020-12 only). Runs after every other keyword on
//! a node has had a chance to mark its matched properties/items as
//! evaluated, so it only ever sees what genuinely slipped through `allOf`,
//! `anyOf`/`oneOf`, `if`/`then`/`else`, and the type-specific keywords.
use super::object::effective_properties;
use super::Validator;
use crate::ast::{node_id, NodeRef};
use crate::collector::SchemaCollector;
use crate::options::Options;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::SchemaMeta;
use serde_json::Value;

impl Validator {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn apply_unevaluated_properties<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let keyword = match schema.get("unevaluatedProperties") {
            Some(v) => v,
            None => return,
        };
        let leftover: Vec<_> = effective_properties(node)
            .into_iter()
            .filter(|p| !result.evaluated_properties.contains(&p.name))
            .collect();
        if leftover.is_empty() {
            return;
        }
        match keyword {
            Value::Bool(false) => {
                for p in leftover {
                    result.push(
                        Problem::warning(
                            p.property.clone(),
                            ProblemKind::PropertyNotAllowed { name: p.name.clone() },
                        )
                        .with_source(meta.source_label(schema)),
                    );
                }
            }
            Value::Bool(true) => {
                for p in leftover {
                    result.evaluated_properties.insert(p.name);
                }
            }
            sub_schema => {
                for p in leftover {
                    if let Some(value_node) = &p.value {
                        self.validate_node(value_node, sub_schema, schema, result, collector, options, meta);
                    }
                    result.evaluated_properties.insert(p.name);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn apply_unevaluated_items<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let keyword = match schema.get("unevaluatedItems") {
            Some(v) => v,
            None => return,
        };
        let items = node.array_items().unwrap_or(&[]);
        let evaluated = result.evaluated_items_for(node_id(node));
        let leftover: Vec<(usize, &NodeRef)> = items
            .iter()
            .enumerate()
            .filter(|(index, _)| !evaluated.contains(index))
            .collect();
        if leftover.is_empty() {
            return;
        }
        match keyword {
            Value::Bool(false) => {
                result.push(
                    Problem::warning(
                        node.clone(),
                        ProblemKind::AdditionalItemsNotAllowed {
                            unexpected_count: leftover.len(),
                        },
                    )
                    .with_source(meta.source_label(schema)),
                );
            }
            Value::Bool(true) => {
                for (index, _) in leftover {
                    result.mark_item_evaluated(node_id(node), index);
                }
            }
            sub_schema => {
                for (index, item) in leftover {
                    self.validate_node(item, sub_schema, schema, result, collector, options, meta);
                    result.mark_item_evaluated(node_id(node), index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Validator;
    use crate::ast::{make_boolean, make_number, make_object, make_property, make_string, Span};
    use crate::diagnostic::PlainTextDocument;
    use crate::dialect::Dialect;
    use crate::options::Options;
    use serde_json::json;
    use std::rc::Rc;

    fn source() -> Rc<str> {
        Rc::from("test.yaml")
    }

    #[test]
    fn unevaluated_properties_false_rejects_properties_outside_all_of_branches() {
        let schema = json!({
            "allOf": [{"properties": {"name": {"type": "string"}}}],
            "unevaluatedProperties": false,
        });
        let src = source();
        let name_key = make_string(Span::new(1, 4), "name".into(), src.clone());
        let name_value = make_string(Span::new(7, 1), "a".into(), src.clone());
        let name_prop = make_property(Span::new(1, 7), name_key, 5, Some(name_value), src.clone());
        let extra_key = make_string(Span::new(10, 5), "extra".into(), src.clone());
        let extra_value = make_boolean(Span::new(17, 4), true, src.clone());
        let extra_prop = make_property(Span::new(10, 11), extra_key, 15, Some(extra_value), src.clone());
        let obj = make_object(Span::new(0, 22), vec![name_prop, extra_prop], src);
        let document = PlainTextDocument::new("{name: a, extra: true}");
        let validator = Validator::new(Dialect::Draft2019);
        let diagnostics = validator.validate_document(&obj, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Property extra is not allowed.");
    }

    #[test]
    fn unevaluated_items_false_rejects_items_outside_prefix_items() {
        let schema = json!({"prefixItems": [{"type": "integer"}], "unevaluatedItems": false});
        let src = source();
        let a = make_number(Span::new(1, 1), 1.0, true, src.clone());
        let b = make_number(Span::new(3, 1), 2.0, true, src.clone());
        let arr = crate::ast::make_array(Span::new(0, 6), vec![a, b], src);
        let document = PlainTextDocument::new("[1, 2]");
        let validator = Validator::new(Dialect::Draft2020);
        let diagnostics = validator.validate_document(&arr, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
    }
}
