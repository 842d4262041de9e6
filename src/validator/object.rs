//! Object validation (spec §4.3): merge-key flattening, `required`,
//! `properties`/`patternProperties`/`additionalProperties`, size bounds,
//! `dependencies`/`dependentRequired`/`dependentSchemas`, `propertyNames`.
use super::Validator;
use crate::ast::{NodeKind, NodeRef};
use crate::collector::SchemaCollector;
use crate::options::Options;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::{self, SchemaMeta};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

const MERGE_KEY: &str = "<<";

/// A property visible on `node` after flattening YAML merge keys. Explicit
/// keys shadow merged-in ones; among merge sources, the first listed wins.
pub(super) struct EffectiveProperty {
    pub name: String,
    pub key: NodeRef,
    pub value: Option<NodeRef>,
    /// The `property` node itself, for `propertyNotAllowed`/`missingRequired`
    /// diagnostics that should point at the whole `name: value` pair.
    pub property: NodeRef,
    /// Set for properties pulled in through a `<<` merge key rather than
    /// declared directly on `node`. Merge sources represent reused content
    /// the document author didn't type at this level, so they're exempted
    /// from `unevaluatedProperties` scrutiny (spec §4.3 scenario 6).
    pub from_merge: bool,
}

pub(super) fn effective_properties(node: &NodeRef) -> Vec<EffectiveProperty> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let props = match node.object_properties() {
        Some(p) => p,
        None => return out,
    };

    // Explicit (non-merge-key) properties take precedence, so collect them first.
    for p in props {
        if let NodeKind::Property { key, value, .. } = &p.kind {
            if let Some(name) = key.as_str() {
                if name != MERGE_KEY && seen.insert(name.to_string()) {
                    out.push(EffectiveProperty {
                        name: name.to_string(),
                        key: key.clone(),
                        value: value.clone(),
                        property: p.clone(),
                        from_merge: false,
                    });
                }
            }
        }
    }

    for p in props {
        if let NodeKind::Property { key, value, .. } = &p.kind {
            if key.as_str() == Some(MERGE_KEY) {
                if let Some(value) = value {
                    collect_merge_source(value, &mut seen, &mut out, p);
                }
            }
        }
    }

    out
}

fn collect_merge_source(
    value: &NodeRef,
    seen: &mut HashSet<String>,
    out: &mut Vec<EffectiveProperty>,
    merge_property: &NodeRef,
) {
    match &value.kind {
        NodeKind::Array(items) => {
            for item in items {
                collect_merge_source(item, seen, out, merge_property);
            }
        }
        NodeKind::Object(props) => {
            for p in props {
                if let NodeKind::Property { key, value, .. } = &p.kind {
                    if let Some(name) = key.as_str() {
                        if name != MERGE_KEY && seen.insert(name.to_string()) {
                            out.push(EffectiveProperty {
                                name: name.to_string(),
                                key: key.clone(),
                                value: value.clone(),
                                property: merge_property.clone(),
                                from_merge: true,
                            });
                        }
                    }
                }
            }
            for p in props {
                if let NodeKind::Property { key, value, .. } = &p.kind {
                    if key.as_str() == Some(MERGE_KEY) {
                        if let Some(value) = value {
                            collect_merge_source(value, seen, out, merge_property);
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

impl Validator {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn validate_object<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let properties = effective_properties(node);
        for p in properties.iter().filter(|p| p.from_merge) {
            result.evaluated_properties.insert(p.name.clone());
        }

        self.check_required(node, schema, &properties, result, meta);
        let (matched_by_name, matched_by_pattern) =
            self.check_properties_and_patterns(node, schema, &properties, result, collector, options, meta);
        self.check_additional_properties(
            node,
            schema,
            &properties,
            &matched_by_name,
            &matched_by_pattern,
            result,
            collector,
            options,
            meta,
        );
        self.check_size_bounds(node, schema, &properties, result, meta);
        self.check_dependencies(node, schema, &properties, result, collector, options, meta);
        self.check_dependent_required(node, schema, &properties, result, meta);
        self.check_dependent_schemas(node, schema, &properties, result, collector, options, meta);
        self.check_property_names(node, schema, &properties, result, collector, options, meta);
    }

    fn check_required(
        &self,
        node: &NodeRef,
        schema: &Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        meta: &SchemaMeta,
    ) {
        let required = match schema.get("required").and_then(Value::as_array) {
            Some(v) => v,
            None => return,
        };
        for name in required.iter().filter_map(Value::as_str) {
            if !properties.iter().any(|p| p.name == name) {
                result.push(
                    Problem::warning(
                        node.clone(),
                        ProblemKind::MissingRequiredProperty {
                            name: name.to_string(),
                        },
                    )
                    .with_source(meta.source_label(schema)),
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_properties_and_patterns<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) -> (HashSet<String>, HashSet<String>) {
        let mut matched_by_name = HashSet::new();
        let mut matched_by_pattern = HashSet::new();

        let declared = schema.get("properties").and_then(Value::as_object);
        let patterns = schema.get("patternProperties").and_then(Value::as_object);

        for p in properties {
            let value_node = match &p.value {
                Some(v) => v,
                None => continue,
            };

            if let Some(sub_schema) = declared.and_then(|d| d.get(&p.name)) {
                matched_by_name.insert(p.name.clone());
                result.evaluated_properties.insert(p.name.clone());
                result.properties_matches += 1;
                let mut sub_result = ValidationResult::new();
                self.validate_node(value_node, sub_schema, schema, &mut sub_result, collector, options, meta);
                if !sub_result.has_problems() {
                    result.properties_value_matches += 1;
                }
                result.absorb(sub_result);
            }

            if let Some(patterns) = patterns {
                for (pattern, sub_schema) in patterns {
                    if Regex::new(pattern).map(|re| re.is_match(&p.name)).unwrap_or(false) {
                        matched_by_pattern.insert(p.name.clone());
                        result.evaluated_properties.insert(p.name.clone());
                        result.properties_matches += 1;
                        let mut sub_result = ValidationResult::new();
                        self.validate_node(value_node, sub_schema, schema, &mut sub_result, collector, options, meta);
                        if !sub_result.has_problems() {
                            result.properties_value_matches += 1;
                        }
                        result.absorb(sub_result);
                    }
                }
            }
        }

        (matched_by_name, matched_by_pattern)
    }

    #[allow(clippy::too_many_arguments)]
    fn check_additional_properties<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        properties: &[EffectiveProperty],
        matched_by_name: &HashSet<String>,
        matched_by_pattern: &HashSet<String>,
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let additional = schema.get("additionalProperties");
        let leftover: Vec<&EffectiveProperty> = properties
            .iter()
            .filter(|p| !matched_by_name.contains(&p.name) && !matched_by_pattern.contains(&p.name))
            .collect();

        if leftover.is_empty() {
            return;
        }

        let seen: HashSet<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        let declared_names: Vec<String> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|d| {
                d.iter()
                    .filter(|(name, sub_schema)| {
                        !seen.contains(name.as_str())
                            && schema::get_bool(sub_schema, "doNotSuggest") != Some(true)
                            && sub_schema.get("deprecationMessage").is_none()
                    })
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();

        let reject = |result: &mut ValidationResult| {
            for p in &leftover {
                result.push(
                    Problem::warning(
                        p.property.clone(),
                        ProblemKind::PropertyNotAllowed {
                            name: p.name.clone(),
                        },
                    )
                    .with_source(meta.source_label(schema))
                    .with_suggested_properties(declared_names.clone()),
                );
            }
        };

        match additional {
            Some(Value::Bool(false)) => {
                reject(result);
                for p in &leftover {
                    result.evaluated_properties.insert(p.name.clone());
                }
            }
            Some(Value::Bool(true)) => {
                for p in &leftover {
                    result.evaluated_properties.insert(p.name.clone());
                }
            }
            Some(sub_schema) => {
                for p in &leftover {
                    if let Some(value_node) = &p.value {
                        self.validate_node(value_node, sub_schema, schema, result, collector, options, meta);
                    }
                    result.evaluated_properties.insert(p.name.clone());
                }
            }
            None if options.disable_additional_properties => {
                reject(result);
                for p in &leftover {
                    result.evaluated_properties.insert(p.name.clone());
                }
            }
            None => {}
        }
    }

    fn check_size_bounds(
        &self,
        node: &NodeRef,
        schema: &Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        meta: &SchemaMeta,
    ) {
        let count = properties.len() as u64;
        if let Some(limit) = schema::get_u64(schema, "minProperties") {
            if count < limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MinProperties { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
        if let Some(limit) = schema::get_u64(schema, "maxProperties") {
            if count > limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MaxProperties { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
    }

    /// Draft-04/07 `dependencies`: either an array of required property
    /// names, or a schema the whole object must additionally satisfy.
    #[allow(clippy::too_many_arguments)]
    fn check_dependencies<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let dependencies = match schema.get("dependencies").and_then(Value::as_object) {
            Some(d) => d,
            None => return,
        };
        for (depends_on, requirement) in dependencies {
            if !properties.iter().any(|p| &p.name == depends_on) {
                continue;
            }
            match requirement {
                Value::Array(names) => {
                    for required in names.iter().filter_map(Value::as_str) {
                        if !properties.iter().any(|p| p.name == required) {
                            result.push(
                                Problem::warning(
                                    node.clone(),
                                    ProblemKind::DependencyMissing {
                                        depends_on: depends_on.clone(),
                                        required: required.to_string(),
                                    },
                                )
                                .with_source(meta.source_label(schema)),
                            );
                        }
                    }
                }
                sub_schema => {
                    self.validate_node(node, sub_schema, schema, result, collector, options, meta);
                }
            }
        }
    }

    fn check_dependent_required(
        &self,
        node: &NodeRef,
        schema: &Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        meta: &SchemaMeta,
    ) {
        if !self.dialect().supports_unevaluated() {
            return;
        }
        let dependent = match schema.get("dependentRequired").and_then(Value::as_object) {
            Some(d) => d,
            None => return,
        };
        for (depends_on, names) in dependent {
            if !properties.iter().any(|p| &p.name == depends_on) {
                continue;
            }
            if let Some(names) = names.as_array() {
                for required in names.iter().filter_map(Value::as_str) {
                    if !properties.iter().any(|p| p.name == required) {
                        result.push(
                            Problem::warning(
                                node.clone(),
                                ProblemKind::DependencyMissing {
                                    depends_on: depends_on.clone(),
                                    required: required.to_string(),
                                },
                            )
                            .with_source(meta.source_label(schema)),
                        );
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_dependent_schemas<'s>(
        &self,
        node: &NodeRef,
        schema: &'s Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        if !self.dialect().supports_unevaluated() {
            return;
        }
        let dependent = match schema.get("dependentSchemas").and_then(Value::as_object) {
            Some(d) => d,
            None => return,
        };
        for (depends_on, sub_schema) in dependent {
            if properties.iter().any(|p| &p.name == depends_on) {
                self.validate_node(node, sub_schema, schema, result, collector, options, meta);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_property_names<'s>(
        &self,
        _node: &NodeRef,
        schema: &'s Value,
        properties: &[EffectiveProperty],
        result: &mut ValidationResult,
        _collector: &mut SchemaCollector<'s>,
        options: &Options,
        meta: &mut SchemaMeta,
    ) {
        let names_schema = match schema.get("propertyNames") {
            Some(v) => v,
            None => return,
        };
        // Key nodes aren't applicable-schema targets for completion/hover,
        // so this walk uses a throwaway collector.
        for p in properties {
            let mut discard = SchemaCollector::no_op();
            self.validate_node(&p.key, names_schema, schema, result, &mut discard, options, meta);
        }
    }
}
