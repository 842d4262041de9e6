//! `SchemaCollector` — records which sub-schema applied to which node, for
//! downstream completion/hover (spec §3, §4.1).
use crate::ast::{node_id, NodeId, NodeRef};
use serde_json::Value;

/// A `{node, schema}` pair recorded during traversal. `inverted` is set when
/// the schema was visited under a `not` (it denotes a forbidden shape).
#[derive(Debug, Clone)]
pub struct ApplicableSchema<'s> {
    pub node: NodeRef,
    pub schema: &'s Value,
    pub inverted: bool,
}

/// Either a real, growing collector (optionally filtered to a focus offset)
/// or a no-op that discards everything. Both are driven through the same
/// interface so `validate_node` doesn't need to branch on which one it has.
pub enum SchemaCollector<'s> {
    NoOp,
    Collecting {
        records: Vec<ApplicableSchema<'s>>,
        focus_offset: Option<usize>,
        exclude: Option<NodeId>,
    },
}

impl<'s> SchemaCollector<'s> {
    pub fn no_op() -> Self {
        SchemaCollector::NoOp
    }

    pub fn focused(focus_offset: Option<usize>, exclude: Option<NodeId>) -> Self {
        SchemaCollector::Collecting {
            records: Vec::new(),
            focus_offset,
            exclude,
        }
    }

    fn should_include(node: &NodeRef, focus_offset: Option<usize>, exclude: Option<NodeId>) -> bool {
        if exclude == Some(node_id(node)) {
            return false;
        }
        match focus_offset {
            Some(offset) => node.span.contains_offset(offset),
            None => true,
        }
    }

    pub fn add(&mut self, node: &NodeRef, schema: &'s Value, inverted: bool) {
        if let SchemaCollector::Collecting {
            records,
            focus_offset,
            exclude,
        } = self
        {
            if Self::should_include(node, *focus_offset, *exclude) {
                records.push(ApplicableSchema {
                    node: node.clone(),
                    schema,
                    inverted,
                });
            }
        }
    }

    /// Fork a fresh sub-collector for an exploratory branch (`not`,
    /// `anyOf`/`oneOf` alternatives, `if`/`then`/`else`), sharing the same
    /// focus/exclude filter.
    pub fn new_sub(&self) -> Self {
        match self {
            SchemaCollector::NoOp => SchemaCollector::NoOp,
            SchemaCollector::Collecting {
                focus_offset,
                exclude,
                ..
            } => SchemaCollector::Collecting {
                records: Vec::new(),
                focus_offset: *focus_offset,
                exclude: *exclude,
            },
        }
    }

    /// Merge another collector's records in, optionally flipping their
    /// `inverted` flag (used when re-attaching a `not` sub-collector).
    pub fn merge(&mut self, other: SchemaCollector<'s>, flip_inverted: bool) {
        if let (
            SchemaCollector::Collecting { records, .. },
            SchemaCollector::Collecting {
                records: mut other_records,
                ..
            },
        ) = (&mut *self, other)
        {
            if flip_inverted {
                for r in &mut other_records {
                    r.inverted = !r.inverted;
                }
            }
            records.append(&mut other_records);
        }
    }

    pub fn into_records(self) -> Vec<ApplicableSchema<'s>> {
        match self {
            SchemaCollector::NoOp => Vec::new(),
            SchemaCollector::Collecting { records, .. } => records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{make_null, Span};
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn no_op_never_records() {
        let src: Rc<str> = Rc::from("t");
        let node = make_null(Span::new(0, 1), src);
        let schema = json!({});
        let mut collector = SchemaCollector::no_op();
        collector.add(&node, &schema, false);
        assert!(collector.into_records().is_empty());
    }

    #[test]
    fn focused_collector_filters_by_offset() {
        let src: Rc<str> = Rc::from("t");
        let inside = make_null(Span::new(0, 5), src.clone());
        let outside = make_null(Span::new(100, 5), src);
        let schema = json!({});
        let mut collector = SchemaCollector::focused(Some(2), None);
        collector.add(&inside, &schema, false);
        collector.add(&outside, &schema, false);
        let records = collector.into_records();
        assert_eq!(records.len(), 1);
        assert!(Rc::ptr_eq(&records[0].node, &inside));
    }

    #[test]
    fn excluded_node_is_never_recorded() {
        let src: Rc<str> = Rc::from("t");
        let node = make_null(Span::new(0, 5), src);
        let schema = json!({});
        let mut collector = SchemaCollector::focused(None, Some(node_id(&node)));
        collector.add(&node, &schema, false);
        assert!(collector.into_records().is_empty());
    }
}
