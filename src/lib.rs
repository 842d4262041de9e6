//! A schema-aware validator for parsed JSON/YAML documents, built for
//! editor tooling: diagnostics, completion, and hover all walk the same
//! schema against the same parsed document.
//!
//! The validator is an interpreter, not a compiler: [`Validator::validate_document`]
//! and [`Validator::matching_schemas`] both walk the document's AST and the
//! raw schema [`serde_json::Value`] side by side, branching on the active
//! [`Dialect`] as they go. There is no separate compilation pass and no
//! schema cache — callers that validate the same schema repeatedly are
//! expected to reuse their own parsed `Value`.
//!
//! ```
//! use schema_doc_validator::{ast, diagnostic::PlainTextDocument, Dialect, Options, Validator};
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let schema = json!({"type": "integer", "minimum": 0});
//! let source: Rc<str> = Rc::from("example.yaml");
//! let node = ast::make_string(ast::Span::new(0, 2), "-1".into(), source);
//! let document = PlainTextDocument::new("-1");
//!
//! let validator = Validator::new(Dialect::Draft7);
//! let diagnostics = validator.validate_document(&node, &document, &schema, &Options::default());
//! assert_eq!(diagnostics.len(), 1);
//! ```
pub mod ast;
pub mod collector;
pub mod diagnostic;
pub mod dialect;
pub mod format;
pub mod glob;
pub mod options;
pub mod problem;
pub mod result;
pub mod schema;
pub mod suppression;
pub mod validator;
pub mod value;

pub use collector::ApplicableSchema;
pub use diagnostic::{Diagnostic, PlainTextDocument, TextDocument};
pub use dialect::Dialect;
pub use options::Options;
pub use problem::{Problem, ProblemKind, Severity};
pub use validator::Validator;
