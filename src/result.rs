//! `ValidationResult` — the per-subtree problem accumulator (spec §3).
use crate::ast::NodeId;
use crate::problem::Problem;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Mutable, explicit out-parameter threaded through the recursive walk.
/// Forks for exploratory branches (`not`, `anyOf`/`oneOf` alternatives,
/// `if`) allocate a fresh `ValidationResult` and merge the winner back.
#[derive(Debug, Default, Clone)]
pub struct ValidationResult {
    pub problems: Vec<Problem>,
    pub properties_matches: usize,
    pub properties_value_matches: usize,
    pub primary_value_matches: usize,
    pub enum_value_match: bool,
    pub enum_values: Option<Vec<Value>>,
    pub evaluated_properties: HashSet<String>,
    pub evaluated_items: HashMap<NodeId, HashSet<usize>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult::default()
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn push(&mut self, problem: Problem) {
        self.problems.push(problem);
    }

    pub fn mark_item_evaluated(&mut self, array: NodeId, index: usize) {
        self.evaluated_items.entry(array).or_default().insert(index);
    }

    pub fn evaluated_items_for(&self, array: NodeId) -> HashSet<usize> {
        self.evaluated_items.get(&array).cloned().unwrap_or_default()
    }

    /// Additive merge used by `allOf` and `if`/`then`/`else`: every problem
    /// and every evaluated-property/item mark from `other` is folded into
    /// `self`. Nothing is ever removed (spec §3 invariant).
    pub fn absorb(&mut self, other: ValidationResult) {
        self.problems.extend(other.problems);
        self.evaluated_properties.extend(other.evaluated_properties);
        for (node, indices) in other.evaluated_items {
            self.evaluated_items.entry(node).or_default().extend(indices);
        }
    }

    /// Merge only the bookkeeping useful for `anyOf`/`oneOf` arbitration
    /// (not the problems) — used when absorbing a *non-winning* but
    /// still-clean alternative's evaluated sets into the parent, per spec
    /// §4.1 "Every alternative that validated cleanly contributes its
    /// evaluated-properties/items sets to the parent".
    pub fn absorb_evaluated_only(&mut self, other: &ValidationResult) {
        self.evaluated_properties
            .extend(other.evaluated_properties.iter().cloned());
        for (node, indices) in &other.evaluated_items {
            self.evaluated_items
                .entry(*node)
                .or_default()
                .extend(indices.iter().copied());
        }
    }

    pub fn set_enum_match(&mut self, values: Vec<Value>) {
        self.enum_value_match = true;
        self.enum_values = Some(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{make_string, Span};
    use crate::problem::ProblemKind;
    use std::rc::Rc;

    fn sample_problem() -> Problem {
        let src: Rc<str> = Rc::from("t");
        let node = make_string(Span::new(0, 1), "x".into(), src);
        Problem::warning(node, ProblemKind::UniqueItems)
    }

    #[test]
    fn absorb_is_additive_and_never_drops_problems() {
        let mut parent = ValidationResult::new();
        parent.push(sample_problem());
        let mut child = ValidationResult::new();
        child.push(sample_problem());
        parent.absorb(child);
        assert_eq!(parent.problems.len(), 2);
    }

    #[test]
    fn absorb_unions_evaluated_properties() {
        let mut parent = ValidationResult::new();
        parent.evaluated_properties.insert("a".to_string());
        let mut child = ValidationResult::new();
        child.evaluated_properties.insert("b".to_string());
        parent.absorb(child);
        assert!(parent.evaluated_properties.contains("a"));
        assert!(parent.evaluated_properties.contains("b"));
    }
}
