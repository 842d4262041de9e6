//! String validation (spec §4.2): length bounds, `pattern`, `format`.
use super::Validator;
use crate::ast::NodeRef;
use crate::format;
use crate::problem::{Problem, ProblemKind};
use crate::result::ValidationResult;
use crate::schema::{self, SchemaMeta};
use regex::Regex;
use serde_json::Value;

impl Validator {
    pub(super) fn validate_string(&self, node: &NodeRef, schema: &Value, result: &mut ValidationResult, meta: &SchemaMeta) {
        let text = match node.as_str() {
            Some(s) => s,
            None => return,
        };
        let length = text.chars().count() as u64;

        if let Some(limit) = schema::get_u64(schema, "minLength") {
            if length < limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MinLength { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
        if let Some(limit) = schema::get_u64(schema, "maxLength") {
            if length > limit {
                result.push(
                    Problem::warning(node.clone(), ProblemKind::MaxLength { limit })
                        .with_source(meta.source_label(schema)),
                );
            }
        }
        if let Some(pattern) = schema::get_str(schema, "pattern") {
            let matches = Regex::new(pattern).map(|re| re.is_match(text)).unwrap_or(true);
            if !matches {
                let problem = match schema::get_str(schema, "patternErrorMessage") {
                    Some(message) => ProblemKind::PatternErrorMessage(message.to_string()),
                    None => ProblemKind::Pattern {
                        pattern: pattern.to_string(),
                    },
                };
                result.push(Problem::warning(node.clone(), problem).with_source(meta.source_label(schema)));
            }
        }
        if let Some(format_name) = schema::get_str(schema, "format") {
            if format::is_builtin(format_name) && !format::check(format_name, text) {
                result.push(
                    Problem::warning(
                        node.clone(),
                        ProblemKind::Format {
                            format: format_name.to_string(),
                        },
                    )
                    .with_source(meta.source_label(schema)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Validator;
    use crate::ast::{make_string, Span};
    use crate::diagnostic::PlainTextDocument;
    use crate::dialect::Dialect;
    use crate::options::Options;
    use serde_json::json;
    use std::rc::Rc;

    fn source() -> Rc<str> {
        Rc::from("test.yaml")
    }

    #[test]
    fn min_length_is_enforced() {
        let schema = json!({"minLength": 3});
        let node = make_string(Span::new(0, 2), "ab".into(), source());
        let document = PlainTextDocument::new("\"ab\"");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "minLength");
    }

    #[test]
    fn custom_pattern_error_message_replaces_default() {
        let schema = json!({"pattern": "^[a-z]+$", "patternErrorMessage": "lowercase letters only"});
        let node = make_string(Span::new(0, 3), "ABC".into(), source());
        let document = PlainTextDocument::new("\"ABC\"");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "lowercase letters only");
    }

    #[test]
    fn format_email_is_checked() {
        let schema = json!({"format": "email"});
        let node = make_string(Span::new(0, 11), "not-an-email".into(), source());
        let document = PlainTextDocument::new("\"not-an-email\"");
        let validator = Validator::new(Dialect::Draft7);
        let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "format");
    }
}
