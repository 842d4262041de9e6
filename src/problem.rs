//! Problem kinds collected while walking a document (spec §7).
use crate::ast::NodeRef;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub enum ProblemKind {
    TypeMismatch {
        expected: Vec<String>,
    },
    EnumMismatch {
        values: Vec<Value>,
    },
    ConstMismatch {
        expected: Value,
    },
    Minimum {
        limit: f64,
    },
    Maximum {
        limit: f64,
    },
    ExclusiveMinimum {
        limit: f64,
    },
    ExclusiveMaximum {
        limit: f64,
    },
    MultipleOf {
        factor: f64,
    },
    MinLength {
        limit: u64,
    },
    MaxLength {
        limit: u64,
    },
    Pattern {
        pattern: String,
    },
    PatternErrorMessage(String),
    Format {
        format: String,
    },
    MinItems {
        limit: u64,
    },
    MaxItems {
        limit: u64,
    },
    AdditionalItemsNotAllowed {
        unexpected_count: usize,
    },
    TooManyPrefixItems {
        limit: usize,
    },
    MinProperties {
        limit: u64,
    },
    MaxProperties {
        limit: u64,
    },
    UniqueItems,
    Contains,
    MinContains {
        limit: u64,
        actual: usize,
    },
    MaxContains {
        limit: u64,
        actual: usize,
    },
    MissingRequiredProperty {
        name: String,
    },
    PropertyNotAllowed {
        name: String,
    },
    DependencyMissing {
        depends_on: String,
        required: String,
    },
    NotMatched,
    OneOfMultipleMatched,
    FilePatternMismatch {
        pattern: String,
    },
    Deprecated {
        message: String,
    },
    ErrorMessageOverride(String),
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemKind::TypeMismatch { expected } => {
                if expected.len() == 1 {
                    write!(f, "Incorrect type. Expected '{}'.", expected[0])
                } else {
                    write!(f, "Incorrect type. Expected one of {}.", expected.join(", "))
                }
            }
            ProblemKind::EnumMismatch { values } => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "Value is not accepted. Valid values: {}.", rendered.join(", "))
            }
            ProblemKind::ConstMismatch { expected } => {
                write!(f, "Value must be {}.", expected)
            }
            ProblemKind::Minimum { limit } => write!(f, "Value is below the minimum of {}.", limit),
            ProblemKind::Maximum { limit } => write!(f, "Value is above the maximum of {}.", limit),
            ProblemKind::ExclusiveMinimum { limit } => {
                write!(f, "Value is below exclusive minimum of {}.", limit)
            }
            ProblemKind::ExclusiveMaximum { limit } => {
                write!(f, "Value is above exclusive maximum of {}.", limit)
            }
            ProblemKind::MultipleOf { factor } => write!(f, "Value is not a multiple of {}.", factor),
            ProblemKind::MinLength { limit } => {
                write!(f, "String is shorter than the minimum length of {}.", limit)
            }
            ProblemKind::MaxLength { limit } => {
                write!(f, "String is longer than the maximum length of {}.", limit)
            }
            ProblemKind::Pattern { pattern } => write!(f, "String does not match the pattern '{}'.", pattern),
            ProblemKind::PatternErrorMessage(message) => write!(f, "{}", message),
            ProblemKind::Format { format } => write!(f, "String does not match format '{}'.", format),
            ProblemKind::MinItems { limit } => write!(f, "Array has too few items, expected {} or more.", limit),
            ProblemKind::MaxItems { limit } => write!(f, "Array has too many items, expected {} or fewer.", limit),
            ProblemKind::AdditionalItemsNotAllowed { unexpected_count } => write!(
                f,
                "Array has too many items ({} unexpected).",
                unexpected_count
            ),
            ProblemKind::TooManyPrefixItems { limit } => {
                write!(f, "Array has too many items, expected {} or fewer.", limit)
            }
            ProblemKind::MinProperties { limit } => {
                write!(f, "Object has fewer than {} properties.", limit)
            }
            ProblemKind::MaxProperties { limit } => {
                write!(f, "Object has more than {} properties.", limit)
            }
            ProblemKind::UniqueItems => write!(f, "Array has non-unique elements."),
            ProblemKind::Contains => write!(f, "Array does not contain a matching item."),
            ProblemKind::MinContains { limit, actual } => write!(
                f,
                "Array has too few items matching contains, expected {} but found {}.",
                limit, actual
            ),
            ProblemKind::MaxContains { limit, actual } => write!(
                f,
                "Array has too many items matching contains, expected at most {} but found {}.",
                limit, actual
            ),
            ProblemKind::MissingRequiredProperty { name } => {
                write!(f, "Missing property \"{}\".", name)
            }
            ProblemKind::PropertyNotAllowed { name } => {
                write!(f, "Property {} is not allowed.", name)
            }
            ProblemKind::DependencyMissing {
                depends_on,
                required,
            } => write!(
                f,
                "Property \"{}\" requires property \"{}\" to be present.",
                depends_on, required
            ),
            ProblemKind::NotMatched => write!(f, "Matches a schema that is not allowed."),
            ProblemKind::OneOfMultipleMatched => {
                write!(f, "Matches multiple schemas when only one must validate.")
            }
            ProblemKind::FilePatternMismatch { pattern } => write!(
                f,
                "This document does not match the expected file pattern '{}'.",
                pattern
            ),
            ProblemKind::Deprecated { message } => write!(f, "{}", message),
            ProblemKind::ErrorMessageOverride(message) => write!(f, "{}", message),
        }
    }
}

/// A single problem found on `node`, plus the bookkeeping needed to render a
/// diagnostic (spec §6 output contract).
#[derive(Debug, Clone)]
pub struct Problem {
    pub node: NodeRef,
    pub kind: ProblemKind,
    pub severity: Severity,
    pub sources: Vec<String>,
    pub suggested_properties: Option<Vec<String>>,
}

impl Problem {
    pub fn new(node: NodeRef, kind: ProblemKind, severity: Severity) -> Self {
        Problem {
            node,
            kind,
            severity,
            sources: Vec::new(),
            suggested_properties: None,
        }
    }

    pub fn warning(node: NodeRef, kind: ProblemKind) -> Self {
        Problem::new(node, kind, Severity::Warning)
    }

    pub fn error(node: NodeRef, kind: ProblemKind) -> Self {
        Problem::new(node, kind, Severity::Error)
    }

    pub fn with_source(mut self, source: String) -> Self {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
        self
    }

    pub fn with_suggested_properties(mut self, properties: Vec<String>) -> Self {
        self.suggested_properties = Some(properties);
        self
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Same node, same kind (by textual message) — used to dedupe merged
    /// warnings from alternative branches per spec §4.1's tie-merge rule.
    pub fn same_location_and_kind(&self, other: &Problem) -> bool {
        self.node.offset() == other.node.offset()
            && self.node.length() == other.node.length()
            && self.message() == other.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_single_type_message() {
        let kind = ProblemKind::TypeMismatch {
            expected: vec!["integer".to_string()],
        };
        assert_eq!(kind.to_string(), "Incorrect type. Expected 'integer'.");
    }

    #[test]
    fn exclusive_minimum_message_contains_expected_phrase() {
        let kind = ProblemKind::ExclusiveMinimum { limit: 0.0 };
        assert!(kind.to_string().contains("below exclusive minimum of 0"));
    }

    #[test]
    fn too_many_prefix_items_message_matches_scenario_phrase() {
        let kind = ProblemKind::TooManyPrefixItems { limit: 2 };
        assert!(kind.to_string().contains("too many items, expected 2 or fewer"));
    }
}
