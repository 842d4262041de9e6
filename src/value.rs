//! Value-level utilities shared by several keyword validators: type-aware
//! deep equality between AST nodes and schema values, a float-safe
//! `multipleOf` remainder, and boolean-schema normalization.
use crate::ast::{Node, NodeKind};
use serde_json::Value;

lazy_static::lazy_static! {
    static ref TRUE_SCHEMA: Value = serde_json::json!({});
    static ref FALSE_SCHEMA: Value = serde_json::json!({"not": {}});
}

/// `true`/`false` schemas normalize to `{}` / `{"not": {}}` respectively, per
/// spec §3 ("A schema may also be the boolean `true` or `false`"). Returns a
/// `'static` reference for the boolean forms so normalization never has to
/// allocate a throwaway owned value that would outlive the call.
pub fn normalize_schema(schema: &Value) -> &Value {
    match schema {
        Value::Bool(true) => &TRUE_SCHEMA,
        Value::Bool(false) => &FALSE_SCHEMA,
        other => other,
    }
}

/// Render a node as a `serde_json::Value`, for embedding in messages (e.g.
/// the `enum` mismatch "Valid values: ..." list) and for `uniqueItems`/`enum`
/// comparisons against schema-side JSON values.
pub fn node_to_value(node: &Node) -> Value {
    match &node.kind {
        NodeKind::Object(props) => {
            let mut map = serde_json::Map::new();
            for p in props {
                if let NodeKind::Property { key, value, .. } = &p.kind {
                    if let Some(name) = key.as_str() {
                        map.insert(
                            name.to_string(),
                            value.as_ref().map(|v| node_to_value(v)).unwrap_or(Value::Null),
                        );
                    }
                }
            }
            Value::Object(map)
        }
        NodeKind::Array(items) => Value::Array(items.iter().map(|i| node_to_value(i)).collect()),
        NodeKind::String(s) => Value::String(s.clone()),
        NodeKind::Number { value, is_integer } => {
            if *is_integer {
                serde_json::json!(*value as i64)
            } else {
                serde_json::json!(*value)
            }
        }
        NodeKind::Boolean(b) => Value::Bool(*b),
        NodeKind::Null => Value::Null,
        NodeKind::Property { value, .. } => {
            value.as_ref().map(|v| node_to_value(v)).unwrap_or(Value::Null)
        }
    }
}

/// Deep equality between a node and a schema-side JSON value, tolerating
/// the node-type hint (an integer node equals the JSON integer `1`).
pub fn node_equals_value(node: &Node, value: &Value) -> bool {
    match (&node.kind, value) {
        (NodeKind::Null, Value::Null) => true,
        (NodeKind::Boolean(a), Value::Bool(b)) => a == b,
        (NodeKind::String(a), Value::String(b)) => a == b,
        (NodeKind::Number { value: a, .. }, Value::Number(b)) => {
            b.as_f64().map(|b| numbers_equal(*a, b)).unwrap_or(false)
        }
        (NodeKind::Array(items), Value::Array(values)) => {
            items.len() == values.len()
                && items
                    .iter()
                    .zip(values.iter())
                    .all(|(i, v)| node_equals_value(i, v))
        }
        (NodeKind::Object(props), Value::Object(map)) => {
            let seen: Vec<(&str, &Node)> = props
                .iter()
                .filter_map(|p| match &p.kind {
                    NodeKind::Property {
                        key,
                        value: Some(v),
                        ..
                    } => key.as_str().map(|k| (k, v.as_ref())),
                    _ => None,
                })
                .collect();
            seen.len() == map.len()
                && seen
                    .iter()
                    .all(|(k, v)| map.get(*k).map(|mv| node_equals_value(v, mv)).unwrap_or(false))
        }
        _ => false,
    }
}

/// Structural equality between two nodes (used by `uniqueItems`).
pub fn node_deep_equal(a: &Node, b: &Node) -> bool {
    node_equals_value(a, &node_to_value(b))
}

fn numbers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// `|x| mod |m|` computed via decimal shifting rather than plain `%`, so
/// that binary-float drift (e.g. `0.1 % 0.1 != 0`) doesn't produce spurious
/// `multipleOf` failures.
pub fn float_safe_remainder(x: f64, m: f64) -> f64 {
    if m == 0.0 {
        return f64::NAN;
    }
    let (x, m) = (x.abs(), m.abs());
    let shift = |n: f64| -> (i64, u32) {
        let s = format!("{}", n);
        match s.find('.') {
            Some(dot) => {
                let decimals = (s.len() - dot - 1) as u32;
                let scaled = s.replace('.', "").parse::<i64>().unwrap_or(0);
                (scaled, decimals)
            }
            None => (n as i64, 0),
        }
    };
    let (xi, xd) = shift(x);
    let (mi, md) = shift(m);
    let d = xd.max(md);
    let xi = xi * 10i64.pow(d - xd);
    let mi = mi * 10i64.pow(d - md);
    if mi == 0 {
        return f64::NAN;
    }
    (xi % mi) as f64 / 10f64.powi(d as i32)
}
