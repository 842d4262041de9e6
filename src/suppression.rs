//! Error-suppression filter (spec §4.7): `# yaml-lint-disable [specifiers]`
//! on the line above a diagnostic drops it.
use crate::diagnostic::Diagnostic;
use regex::Regex;

lazy_static::lazy_static! {
    static ref DISABLE_RE: Regex =
        Regex::new(r"^\s*#\s*yaml-lint-disable\b(.*)$").expect("Is a valid regex");
}

/// Drop diagnostics suppressed by a `yaml-lint-disable` comment on the
/// preceding line. Diagnostics on line 0 are never suppressed (no previous
/// line exists).
pub fn filter_suppressed(diagnostics: Vec<Diagnostic>, text: &str) -> Vec<Diagnostic> {
    let lines: Vec<&str> = text.lines().collect();
    diagnostics
        .into_iter()
        .filter(|d| !is_suppressed(d, &lines))
        .collect()
}

fn is_suppressed(diagnostic: &Diagnostic, lines: &[&str]) -> bool {
    let line = diagnostic.range.start.line;
    if line == 0 {
        return false;
    }
    let previous = match lines.get((line - 1) as usize) {
        Some(l) => l,
        None => return false,
    };
    let captures = match DISABLE_RE.captures(previous) {
        Some(c) => c,
        None => return false,
    };
    let specifiers = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    if specifiers.is_empty() {
        return true;
    }
    let message = diagnostic.message.to_lowercase();
    specifiers
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .any(|specifier| message.contains(&specifier))
}
