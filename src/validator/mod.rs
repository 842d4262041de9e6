//! The base validator: traversal and generic (type-independent) keywords
//! (spec §4.1). Per-type leaf validation lives in the sibling modules;
//! draft-specific behavior is branched on `self.dialect` rather than
//! expressed through a trait hierarchy, per spec §9's "prefer a single
//! `Validator` struct carrying a dialect enum" design note.
mod array;
mod number;
mod object;
mod string;
mod unevaluated;

use crate::ast::{NodeId, NodeKind, NodeRef};
use crate::collector::{ApplicableSchema, SchemaCollector};
use crate::diagnostic::{to_diagnostic, Diagnostic, TextDocument};
use crate::dialect::Dialect;
use crate::glob;
use crate::options::Options;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::{self, SchemaMeta};
use crate::suppression;
use crate::value;
use serde_json::Value;

/// Walks a parsed document against a schema under a fixed dialect.
/// Stateless per call: all mutable bookkeeping lives on the
/// `ValidationResult`/`SchemaCollector` the caller threads through, so a
/// `Validator` is freely `Send`/reentrant across host threads (spec §5).
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    dialect: Dialect,
}

impl Validator {
    pub fn new(dialect: Dialect) -> Self {
        Validator { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Entry point: full pass with a no-op collector, converted into
    /// diagnostics and filtered through the suppression pass.
    pub fn validate_document(
        &self,
        root: &NodeRef,
        document: &dyn TextDocument,
        schema: &Value,
        options: &Options,
    ) -> Vec<Diagnostic> {
        let mut result = ValidationResult::new();
        let mut collector = SchemaCollector::no_op();
        let mut meta = SchemaMeta::new();
        self.validate_node(root, schema, schema, &mut result, &mut collector, options, &mut meta);
        let diagnostics: Vec<Diagnostic> = result
            .problems
            .iter()
            .map(|p| to_diagnostic(p, document, &meta, schema))
            .collect();
        suppression::filter_suppressed(diagnostics, document.get_text())
    }

    /// Entry point: full pass with a real, optionally-focused collector.
    pub fn matching_schemas<'s>(
        &self,
        root: &NodeRef,
        schema: &'s Value,
        options: &Options,
        focus_offset: Option<usize>,
        exclude: Option<NodeId>,
    ) -> Vec<ApplicableSchema<'s>> {
        let mut result = ValidationResult::new();
        let mut collector = SchemaCollector::focused(focus_offset, exclude);
        let mut meta = SchemaMeta::new();
        self.validate_node(root, schema, schema, &mut result, &mut collector, options, &mut meta);
        collector.into_records()
    }

    /// The mutually-recursive core (spec §2 "Control flow").
    pub(crate) fn validate_node<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        parent_schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let schema = value::normalize_schema(schema);

        if let Some(dialect) = schema::explicit_dialect(schema) {
            if dialect != self.dialect {
                Validator::new(dialect)
                    .validate_node(node, schema, parent_schema, result, collector, options, meta);
                return;
            }
        }

        meta.propagate(parent_schema, schema);

        match &node.kind {
            NodeKind::Object(_) => self.validate_object(node, schema, result, collector, options, meta),
            NodeKind::Array(_) => self.validate_array(node, schema, result, collector, options, meta),
            NodeKind::String(_) => self.validate_string(node, schema, result, meta),
            NodeKind::Number { .. } => self.validate_number(node, schema, result, meta),
            NodeKind::Boolean(_) | NodeKind::Null | NodeKind::Property { .. } => {}
        }

        self.validate_generic(node, schema, result, collector, options, meta);
        collector.add(node, schema, false);

        if self.dialect.supports_unevaluated() {
            match &node.kind {
                NodeKind::Array(_) => self.apply_unevaluated_items(node, schema, result, collector, options, meta),
                NodeKind::Object(_) => {
                    self.apply_unevaluated_properties(node, schema, result, collector, options, meta)
                }
                _ => {}
            }
        }
    }

    /// Keywords applicable regardless of node type (spec §4.1).
    fn validate_generic<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        self.check_type(node, schema, result, meta);
        self.check_const(node, schema, result, options, meta);
        self.check_enum(node, schema, result, options, meta);
        self.check_all_of(node, schema, result, collector, options, meta);
        self.check_any_of(node, schema, result, collector, options, meta);
        self.check_one_of(node, schema, result, collector, options, meta);
        self.check_not(node, schema, result, collector, options, meta);
        self.check_if_then_else(node, schema, result, collector, options, meta);
        self.check_deprecation(node, schema, result);
    }

    fn check_type(&self, node: &NodeRef, schema: &Value, result: &mut ValidationResult, meta: &SchemaMeta) {
        let type_value = match schema.get("type") {
            Some(v) => v,
            None => return,
        };
        let expected: Vec<String> = match type_value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
            _ => return,
        };
        if expected.iter().any(|t| node_matches_type(node, t)) {
            result.primary_value_matches += 1;
            return;
        }
        let rendered = if expected.len() == 1 && expected[0] == "object" {
            vec![schema::schema_type_name(schema)]
        } else {
            expected
        };
        let kind = match schema::get_str(schema, "errorMessage") {
            Some(message) => ProblemKind::ErrorMessageOverride(message.to_string()),
            None => ProblemKind::TypeMismatch { expected: rendered },
        };
        result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
    }

    fn check_const(
        &self,
        node: &NodeRef,
        schema: &Value,
        result: &mut ValidationResult,
        options: &Options,
        meta: &SchemaMeta,
    ) {
        let expected = match schema.get("const") {
            Some(v) => v,
            None => return,
        };
        if value::node_equals_value(node, expected) || (options.call_from_auto_complete && autocomplete_matches(node, expected)) {
            result.set_enum_match(vec![expected.clone()]);
            result.primary_value_matches += 1;
        } else {
            let kind = match schema::get_str(schema, "errorMessage") {
                Some(message) => ProblemKind::ErrorMessageOverride(message.to_string()),
                None => ProblemKind::ConstMismatch {
                    expected: expected.clone(),
                },
            };
            result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
        }
    }

    fn check_enum(
        &self,
        node: &NodeRef,
        schema: &Value,
        result: &mut ValidationResult,
        options: &Options,
        meta: &SchemaMeta,
    ) {
        let values = match schema.get("enum").and_then(Value::as_array) {
            Some(v) => v,
            None => return,
        };
        let matched = values
            .iter()
            .any(|v| value::node_equals_value(node, v) || (options.call_from_auto_complete && autocomplete_matches(node, v)));
        if matched {
            result.set_enum_match(values.clone());
            result.primary_value_matches += 1;
        } else {
            let kind = match schema::get_str(schema, "errorMessage") {
                Some(message) => ProblemKind::ErrorMessageOverride(message.to_string()),
                None => ProblemKind::EnumMismatch {
                    values: values.clone(),
                },
            };
            result.push(Problem::warning(node.clone(), kind).with_source(meta.source_label(schema)));
        }
    }

    fn check_all_of<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
            for member in members {
                self.validate_node(node, member, schema, result, collector, options, meta);
            }
        }
    }

    fn check_any_of<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if let Some(members) = schema.get("anyOf").and_then(Value::as_array) {
            self.validate_alternatives(node, schema, members, false, result, collector, options, meta);
        }
    }

    fn check_one_of<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if let Some(members) = schema.get("oneOf").and_then(Value::as_array) {
            self.validate_alternatives(node, schema, members, true, result, collector, options, meta);
        }
    }

    /// Shared `anyOf`/`oneOf` best-match arbitration (spec §4.1).
    #[allow(clippy::too_many_arguments)]
    fn validate_alternatives<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        alternatives: &'s [Value],
        max_one_match: bool,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if alternatives.is_empty() {
            return;
        }
        let mut best: Option<ValidationResult> = None;
        let mut best_collector: Option<SchemaCollector<'s>> = None;
        let mut clean_matches = 0usize;

        for alternative in alternatives {
            let mut sub_result = ValidationResult::new();
            let mut sub_collector = collector.new_sub();
            self.validate_node(node, alternative, schema, &mut sub_result, &mut sub_collector, options, meta);

            let is_clean = !sub_result.has_problems();
            let discounted_by_format =
                options.call_from_auto_complete && alternative.get("format").is_some();

            if is_clean {
                result.absorb_evaluated_only(&sub_result);
                if !discounted_by_format {
                    clean_matches += 1;
                }
            }

            best = Some(match best.take() {
                None => {
                    best_collector = Some(sub_collector);
                    sub_result
                }
                Some(current_best) => {
                    let candidate_is_object =
                        matches!(alternative.get("type"), Some(Value::String(t)) if t == "object");
                    let node_is_object = matches!(node.kind, NodeKind::Object(_));
                    let replace = if options.is_kubernetes {
                        is_better_kubernetes(&sub_result, &current_best)
                    } else {
                        is_better_generic(&sub_result, &current_best, max_one_match)
                            || (ties(&sub_result, &current_best) && candidate_is_object && node_is_object)
                    };
                    let combine = !options.is_kubernetes
                        && !max_one_match
                        && is_clean
                        && !current_best.has_problems();

                    if combine {
                        let mut merged = current_best;
                        merge_on_tie(&mut merged, sub_result);
                        if let Some(existing) = best_collector.take() {
                            let mut existing = existing;
                            existing.merge(sub_collector, false);
                            best_collector = Some(existing);
                        }
                        merged
                    } else if replace {
                        best_collector = Some(sub_collector);
                        sub_result
                    } else {
                        // sub_collector's records are dropped along with the
                        // losing alternative's problems.
                        current_best
                    }
                }
            });
        }

        if max_one_match && clean_matches > 1 {
            result.push(
                Problem::warning(node.clone(), ProblemKind::OneOfMultipleMatched)
                    .with_source(meta.source_label(schema)),
            );
        }
        if let Some(best) = best {
            result.absorb(best);
        }
        if let Some(best_collector) = best_collector {
            collector.merge(best_collector, false);
        }
    }

    fn check_not<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let not_schema = match schema.get("not") {
            Some(v) => v,
            None => return,
        };
        let mut sub_result = ValidationResult::new();
        let mut sub_collector = collector.new_sub();
        self.validate_node(node, not_schema, schema, &mut sub_result, &mut sub_collector, options, meta);
        if !sub_result.has_problems() {
            result.push(
                Problem::warning(node.clone(), ProblemKind::NotMatched).with_source(meta.source_label(schema)),
            );
        }
        collector.merge(sub_collector, true);
    }

    fn check_if_then_else<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let if_schema = match schema.get("if") {
            Some(v) => v,
            None => return,
        };
        if let Some(pattern) = if_schema.get("filePatternAssociation").and_then(Value::as_str) {
            if let Some(uri) = options.uri.as_deref() {
                if !glob::matches(pattern, uri) {
                    result.push(
                        Problem::warning(
                            node.clone(),
                            ProblemKind::FilePatternMismatch {
                                pattern: pattern.to_string(),
                            },
                        )
                        .with_source(meta.source_label(schema)),
                    );
                    return;
                }
            }
        }

        let mut if_result = ValidationResult::new();
        let mut if_collector = collector.new_sub();
        self.validate_node(node, if_schema, schema, &mut if_result, &mut if_collector, options, meta);
        collector.merge(if_collector, false);

        let condition_holds = !if_result.has_problems();
        if condition_holds {
            if let Some(then_schema) = schema.get("then") {
                let mut then_result = ValidationResult::new();
                let mut then_collector = collector.new_sub();
                self.validate_node(node, then_schema, schema, &mut then_result, &mut then_collector, options, meta);
                result.absorb(then_result);
                collector.merge(then_collector, false);
            }
        } else if let Some(else_schema) = schema.get("else") {
            let mut else_result = ValidationResult::new();
            let mut else_collector = collector.new_sub();
            self.validate_node(node, else_schema, schema, &mut else_result, &mut else_collector, options, meta);
            result.absorb(else_result);
            collector.merge(else_collector, false);
        }
    }

    fn check_deprecation(&self, node: &NodeRef, schema: &Value, result: &mut ValidationResult) {
        if let Some(message) = schema.get("deprecationMessage").and_then(Value::as_str) {
            let target = node.parent().unwrap_or_else(|| node.clone());
            result.push(Problem::warning(
                target,
                ProblemKind::Deprecated {
                    message: message.to_string(),
                },
            ));
        }
    }
}

fn node_matches_type(node: &NodeRef, ty: &str) -> bool {
    match ty {
        "integer" => matches!(node.kind, NodeKind::Number { is_integer: true, .. }),
        "number" => matches!(node.kind, NodeKind::Number { .. }),
        "string" => matches!(node.kind, NodeKind::String(_)),
        "boolean" => matches!(node.kind, NodeKind::Boolean(_)),
        "object" => matches!(node.kind, NodeKind::Object(_)),
        "array" => matches!(node.kind, NodeKind::Array(_)),
        "null" => node.is_null(),
        _ => false,
    }
}

/// Autocomplete-only enum/const relaxations (spec §4.1): an empty,
/// not-yet-typed node is always accepted, and a partially-typed string is
/// accepted as a prefix of the candidate.
fn autocomplete_matches(node: &NodeRef, candidate: &Value) -> bool {
    if node.is_null() && node.length() == 0 {
        return true;
    }
    if let (Some(typed), Value::String(full)) = (node.as_str(), candidate) {
        return full.starts_with(typed);
    }
    false
}

fn ties(a: &ValidationResult, b: &ValidationResult) -> bool {
    a.has_problems() == b.has_problems()
        && a.enum_value_match == b.enum_value_match
        && a.properties_value_matches == b.properties_value_matches
        && a.primary_value_matches == b.primary_value_matches
        && a.properties_matches == b.properties_matches
}

fn is_better_kubernetes(candidate: &ValidationResult, current: &ValidationResult) -> bool {
    let candidate_key = (
        candidate.properties_matches,
        candidate.enum_value_match,
        candidate.primary_value_matches,
        candidate.properties_value_matches,
        !candidate.has_problems(),
    );
    let current_key = (
        current.properties_matches,
        current.enum_value_match,
        current.primary_value_matches,
        current.properties_value_matches,
        !current.has_problems(),
    );
    candidate_key > current_key
}

fn is_better_generic(candidate: &ValidationResult, current: &ValidationResult, max_one_match: bool) -> bool {
    if !candidate.has_problems() && !current.has_problems() && !max_one_match {
        // both clean and no oneOf arbitration in effect: handled by the
        // `combine` path in `validate_alternatives`, never a replacement.
        return false;
    }
    let candidate_key = (
        !candidate.has_problems(),
        candidate.enum_value_match,
        candidate.properties_value_matches,
        candidate.primary_value_matches,
        candidate.properties_matches,
    );
    let current_key = (
        !current.has_problems(),
        current.enum_value_match,
        current.properties_value_matches,
        current.primary_value_matches,
        current.properties_matches,
    );
    candidate_key > current_key
}

/// On a tie, merge matching schemas (handled by the caller), enum values and
/// per-kind warnings at the same location (spec §4.1 "mergeWarningGeneric").
fn merge_on_tie(winner: &mut ValidationResult, other: ValidationResult) {
    if let Some(values) = &other.enum_values {
        winner.enum_values = Some(values.clone());
    }
    winner.enum_value_match = winner.enum_value_match || other.enum_value_match;
    winner.evaluated_properties.extend(other.evaluated_properties.iter().cloned());
    for (node, indices) in &other.evaluated_items {
        winner
            .evaluated_items
            .entry(*node)
            .or_default()
            .extend(indices.iter().copied());
    }
    for problem in other.problems {
        let already_present = winner.problems.iter().any(|p| p.same_location_and_kind(&problem));
        if !already_present {
            winner.problems.push(problem);
        } else {
            for existing in winner.problems.iter_mut() {
                if existing.same_location_and_kind(&problem) {
                    for source in &problem.sources {
                        if !existing.sources.contains(source) {
                            existing.sources.push(source.clone());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{make_number, make_object, make_property, make_string, Span};
    use crate::diagnostic::PlainTextDocument;
    use serde_json::json;
    use std::rc::Rc;

    fn source() -> Rc<str> {
        Rc::from("test.yaml")
    }

    #[test]
    fn type_mismatch_reports_schema_title_as_source() {
        // Schema: {"title":"Port","type":"integer"}. Doc: "eighty".
        let schema = json!({"title": "Port", "type": "integer"});
        let doc_text = "\"eighty\"";
        let node = make_string(Span::new(0, doc_text.len()), "eighty".into(), source());
        let document = PlainTextDocument::new(doc_text);
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Incorrect type. Expected 'integer'.");
        assert_eq!(diagnostics[0].source, "yaml-schema: Port");
    }

    #[test]
    fn one_of_picks_up_either_clean_branch() {
        let schema = json!({"oneOf": [
            {"type": "string", "maxLength": 3},
            {"type": "string", "maxLength": 5},
        ]});
        let text = "\"abcd\"";
        let node = make_string(Span::new(0, text.len()), "abcd".into(), source());
        let document = PlainTextDocument::new(text);
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn one_of_reports_best_match_diagnostic_when_nothing_matches() {
        let schema = json!({"oneOf": [
            {"type": "string", "maxLength": 3},
            {"type": "string", "maxLength": 5},
        ]});
        let text = "\"abcdef\"";
        let node = make_string(Span::new(0, text.len()), "abcdef".into(), source());
        let document = PlainTextDocument::new(text);
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn error_message_overrides_the_default_type_mismatch_text() {
        let schema = json!({"type": "integer", "errorMessage": "age must be a whole number"});
        let node = make_string(Span::new(0, 6), "eighty".into(), source());
        let document = PlainTextDocument::new("\"eighty\"");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "age must be a whole number");
        assert_eq!(diagnostics[0].code, "errorMessage");
    }

    #[test]
    fn not_matching_a_forbidden_schema_is_flagged() {
        let schema = json!({"not": {"type": "integer"}});
        let node = make_number(Span::new(0, 1), 1.0, true, source());
        let document = PlainTextDocument::new("1");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Matches a schema that is not allowed.");
    }

    #[test]
    fn deprecation_message_targets_the_parent_property_node() {
        let schema = json!({"properties": {"legacy": {"deprecationMessage": "use modern instead"}}});
        let key = make_string(Span::new(2, 6), "legacy".into(), source());
        let value = make_number(Span::new(10, 1), 1.0, true, source());
        let prop = make_property(Span::new(2, 9), key, 8, Some(value), source());
        let obj = make_object(Span::new(0, 12), vec![prop.clone()], source());
        let document = PlainTextDocument::new("{legacy: 1}");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&obj, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, document.position_at(prop.offset()));
    }
}
