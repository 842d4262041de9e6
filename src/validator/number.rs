//! Number validation (spec §4.2): `multipleOf`, and the per-dialect
//! `minimum`/`maximum`/`exclusiveMinimum`/`exclusiveMaximum` semantics
//! (draft-04's boolean-paired exclusivity vs draft-07+'s numeric,
//! independent exclusive bounds).
use super::Validator;
use crate::ast::NodeRef;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::{self, SchemaMeta};
use serde_json::Value;

impl Validator {
    pub(super) fn validate_number(&self, node: &NodeRef, schema: &Value, result: &mut ValidationResult, meta: &SchemaMeta) {
        let value = match node.as_number() {
            Some((v, _)) => v,
            None => return,
        };

        if let Some(factor) = schema::get_f64(schema, "multipleOf") {
            if factor != 0.0 && crate::value::float_safe_remainder(value, factor).abs() > f64::EPSILON {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MultipleOf { factor })
                        .with_source(meta.source_label(schema)),
                );
            }
        }

        if self.dialect().uses_numeric_exclusive_bounds() {
            self.check_bounds_modern(node, schema, value, result, meta);
        } else {
            self.check_bounds_draft4(node, schema, value, result, meta);
        }
    }

    fn check_bounds_modern(&self, node: &NodeRef, schema: &Value, value: f64, result: &mut ValidationResult, meta: &SchemaMeta) {
        let (min, max) = get_number_limits(schema);
        if let Some((limit, exclusive)) = min {
            let violated = if exclusive { value <= limit } else { value < limit };
            if violated {
                let kind = if exclusive {
                    ProblemKind::ExclusiveMinimum { limit }
                } else {
                    ProblemKind::Minimum { limit }
                };
                result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
            }
        }
        if let Some((limit, exclusive)) = max {
            let violated = if exclusive { value >= limit } else { value > limit };
            if violated {
                let kind = if exclusive {
                    ProblemKind::ExclusiveMaximum { limit }
                } else {
                    ProblemKind::Maximum { limit }
                };
                result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
            }
        }
    }

    /// Draft-04: `exclusiveMinimum`/`exclusiveMaximum` are booleans that
    /// modify the meaning of `minimum`/`maximum` rather than standing alone.
    fn check_bounds_draft4(&self, node: &NodeRef, schema: &Value, value: f64, result: &mut ValidationResult, meta: &SchemaMeta) {
        if let Some(limit) = schema::get_f64(schema, "minimum") {
            let exclusive = schema::get_bool(schema, "exclusiveMinimum").unwrap_or(false);
            let violated = if exclusive { value <= limit } else { value < limit };
            if violated {
                let kind = if exclusive {
                    ProblemKind::ExclusiveMinimum { limit }
                } else {
                    ProblemKind::Minimum { limit }
                };
                result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
            }
        }
        if let Some(limit) = schema::get_f64(schema, "maximum") {
            let exclusive = schema::get_bool(schema, "exclusiveMaximum").unwrap_or(false);
            let violated = if exclusive { value >= limit } else { value > limit };
            if violated {
                let kind = if exclusive {
                    ProblemKind::ExclusiveMaximum { limit }
                } else {
                    ProblemKind::Maximum { limit }
                };
                result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
            }
        }
    }
}

/// Draft-07+ bound resolution: a numeric `exclusiveMinimum`/`exclusiveMaximum`
/// takes over from its inclusive counterpart entirely rather than being
/// checked alongside it. A boolean value (the draft-04 modifier form,
/// meaningless here) doesn't suppress anything.
fn get_number_limits(schema: &Value) -> (Option<(f64, bool)>, Option<(f64, bool)>) {
    let min = match schema::get_f64(schema, "exclusiveMinimum") {
        Some(limit) => Some((limit, true)),
        None => schema::get_f64(schema, "minimum").map(|limit| (limit, false)),
    };
    let max = match schema::get_f64(schema, "exclusiveMaximum") {
        Some(limit) => Some((limit, true)),
        None => schema::get_f64(schema, "maximum").map(|limit| (limit, false)),
    };
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::super::Validator;
    use crate::ast::{make_number, Span};
    use crate::diagnostic::PlainTextDocument;
    use crate::dialect::Dialect;
    use crate::options::Options;
    use serde_json::json;
    use std::rc::Rc;

    fn source() -> Rc<str> {
        Rc::from("test.yaml")
    }

    #[test]
    fn draft4_exclusive_minimum_is_a_boolean_modifier() {
        let schema = json!({"minimum": 0, "exclusiveMinimum": true});
        let node = make_number(Span::new(0, 1), 0.0, true, source());
        let document = PlainTextDocument::new("0");
        let validator = Validator::new(Dialect::Draft4);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "exclusiveMinimum");
    }

    #[test]
    fn draft7_exclusive_minimum_is_an_independent_numeric_bound() {
        let schema = json!({"exclusiveMinimum": 0});
        let node = make_number(Span::new(0, 1), 0.0, true, source());
        let document = PlainTextDocument::new("0");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "exclusiveMinimum");
    }

    #[test]
    fn draft7_numeric_exclusive_minimum_suppresses_the_inclusive_bound() {
        let schema = json!({"minimum": 5, "exclusiveMinimum": 3});
        let node = make_number(Span::new(0, 1), 4.0, true, source());
        let document = PlainTextDocument::new("4");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn multiple_of_respects_decimal_factors() {
        let schema = json!({"multipleOf": 0.1});
        let node = make_number(Span::new(0, 3), 0.3, false, source());
        let document = PlainTextDocument::new("0.3");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert!(diagnostics.is_empty());
    }
}
