//! Schema-side helpers: extension keyword accessors and the `url`/
//! `closestTitle` side table.
//!
//! Spec §9 flags that the source mutates `url`/`closestTitle` directly onto
//! schema objects during traversal. To keep schema documents immutable
//! (§5), this port keeps that bookkeeping in a side table keyed by schema
//! pointer identity instead, per the Open Question resolution recorded in
//! DESIGN.md.
use crate::dialect::Dialect;
use serde_json::Value;
use std::collections::HashMap;

pub type SchemaId = usize;

pub fn schema_id(schema: &Value) -> SchemaId {
    schema as *const Value as SchemaId
}

#[derive(Debug, Clone, Default)]
pub struct SchemaSource {
    pub url: Option<String>,
    pub closest_title: Option<String>,
}

/// Side table mapping schema identity to the source annotations that would,
/// in the original design, have been mutated onto the schema object itself.
#[derive(Debug, Default)]
pub struct SchemaMeta {
    sources: HashMap<SchemaId, SchemaSource>,
}

impl SchemaMeta {
    pub fn new() -> Self {
        SchemaMeta::default()
    }

    /// Propagate `url`/`closestTitle` from the parent schema's recorded
    /// source down to `schema`, unless `schema` declares its own `title`/
    /// `url`, mirroring spec §4.1's dispatch step.
    pub fn propagate(&mut self, parent: &Value, schema: &Value) {
        let parent_source = self.sources.get(&schema_id(parent)).cloned().unwrap_or_default();
        let url = get_str(schema, "url")
            .map(str::to_string)
            .or(parent_source.url);
        let closest_title = get_str(schema, "title")
            .map(str::to_string)
            .or(parent_source.closest_title);
        self.sources.insert(
            schema_id(schema),
            SchemaSource {
                url,
                closest_title,
            },
        );
    }

    pub fn source_for(&self, schema: &Value) -> SchemaSource {
        self.sources.get(&schema_id(schema)).cloned().unwrap_or_default()
    }

    /// Renders the `yaml-schema: <title or URI>` diagnostic source label.
    pub fn source_label(&self, schema: &Value) -> String {
        let source = self.source_for(schema);
        let label = source
            .closest_title
            .or(source.url)
            .unwrap_or_else(|| "unknown".to_string());
        format!("yaml-schema: {}", label)
    }
}

pub fn get_str<'a>(schema: &'a Value, key: &str) -> Option<&'a str> {
    schema.get(key).and_then(Value::as_str)
}

pub fn get_bool(schema: &Value, key: &str) -> Option<bool> {
    schema.get(key).and_then(Value::as_bool)
}

pub fn get_f64(schema: &Value, key: &str) -> Option<f64> {
    schema.get(key).and_then(Value::as_f64)
}

pub fn get_u64(schema: &Value, key: &str) -> Option<u64> {
    schema.get(key).and_then(Value::as_u64)
}

/// The explicit `_dialect` tag on a (possibly compound) schema document.
pub fn explicit_dialect(schema: &Value) -> Option<Dialect> {
    get_str(schema, "_dialect").and_then(Dialect::from_tag)
}

/// Human-facing schema type name for `typeMismatchWarning` messages. Objects
/// use their title when present, falling back to `"object"`.
pub fn schema_type_name(schema: &Value) -> String {
    get_str(schema, "title")
        .map(str::to_string)
        .unwrap_or_else(|| "object".to_string())
}

pub fn is_false_schema(schema: &Value) -> bool {
    matches!(schema, Value::Bool(false))
}

pub fn is_true_schema(schema: &Value) -> bool {
    matches!(schema, Value::Bool(true)) || matches!(schema, Value::Object(map) if map.is_empty())
}
