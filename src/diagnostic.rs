//! Output diagnostic record (spec §6) and the text-document contract the
//! validator expects from its host (offset↔position mapping).
use crate::problem::{Problem, Severity as ProblemSeverity};
use crate::schema::SchemaMeta;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl From<ProblemSeverity> for Severity {
    fn from(value: ProblemSeverity) -> Self {
        match value {
            ProblemSeverity::Warning => Severity::Warning,
            ProblemSeverity::Error => Severity::Error,
        }
    }
}

/// A host-provided view over the source text: offset↔position mapping plus
/// raw text access (needed by the suppression filter).
pub trait TextDocument {
    fn get_text(&self) -> &str;
    fn position_at(&self, offset: usize) -> Position;
    fn offset_at(&self, position: Position) -> usize;
}

/// A small, line-scanning `TextDocument` implementation. Real hosts will
/// usually maintain an incrementally-updated line-offset table instead, but
/// this is a correct reference implementation and is what the test suite
/// exercises the validator against.
pub struct PlainTextDocument {
    text: String,
    line_starts: Vec<usize>,
}

impl PlainTextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        PlainTextDocument { text, line_starts }
    }
}

impl TextDocument for PlainTextDocument {
    fn get_text(&self) -> &str {
        &self.text
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let character = offset - self.line_starts[line];
        Position {
            line: line as u32,
            character: character as u32,
        }
    }

    fn offset_at(&self, position: Position) -> usize {
        let line = (position.line as usize).min(self.line_starts.len() - 1);
        self.line_starts[line] + position.character as usize
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub code: &'static str,
    pub source: String,
    pub schema_uris: Vec<String>,
    pub properties: Option<Vec<String>>,
}

pub fn problem_code(problem: &Problem) -> &'static str {
    use crate::problem::ProblemKind::*;
    match problem.kind {
        TypeMismatch { .. } => "typeMismatchWarning",
        EnumMismatch { .. } => "EnumValueMismatch",
        ConstMismatch { .. } => "ConstMismatch",
        Minimum { .. } => "minimum",
        Maximum { .. } => "maximum",
        ExclusiveMinimum { .. } => "exclusiveMinimum",
        ExclusiveMaximum { .. } => "exclusiveMaximum",
        MultipleOf { .. } => "multipleOf",
        MinLength { .. } => "minLength",
        MaxLength { .. } => "maxLength",
        Pattern { .. } | PatternErrorMessage(_) => "pattern",
        Format { .. } => "format",
        MinItems { .. } => "minItems",
        MaxItems { .. } => "maxItems",
        AdditionalItemsNotAllowed { .. } => "additionalItems",
        TooManyPrefixItems { .. } => "maxItems",
        MinProperties { .. } => "minProperties",
        MaxProperties { .. } => "maxProperties",
        UniqueItems => "uniqueItems",
        Contains => "contains",
        MinContains { .. } => "minContains",
        MaxContains { .. } => "maxContains",
        MissingRequiredProperty { .. } => "missingRequiredPropWarning",
        PropertyNotAllowed { .. } => "PropertyExpected",
        DependencyMissing { .. } => "dependencies",
        NotMatched => "not",
        OneOfMultipleMatched => "oneOf",
        FilePatternMismatch { .. } => "filePatternAssociation",
        Deprecated { .. } => "deprecationMessage",
        ErrorMessageOverride(_) => "errorMessage",
    }
}

/// Convert an internal `Problem` into the output `Diagnostic` record,
/// computing its range via the document's offset→position mapping and
/// attributing its schema source(s).
pub fn to_diagnostic(problem: &Problem, document: &dyn TextDocument, meta: &SchemaMeta, schema: &Value) -> Diagnostic {
    let start = document.position_at(problem.node.offset());
    let end = document.position_at(problem.node.offset() + problem.node.length());
    let mut sources = problem.sources.clone();
    if sources.is_empty() {
        sources.push(meta.source_label(schema));
    }
    Diagnostic {
        range: Range { start, end },
        message: problem.message(),
        severity: problem.severity.into(),
        code: problem_code(problem),
        source: sources.join(" | "),
        schema_uris: sources.clone(),
        properties: problem.suggested_properties.clone(),
    }
}
