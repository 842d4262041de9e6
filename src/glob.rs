//! Minimal glob matching for `filePatternAssociation` (spec §4.1).
//! Supports `*` (any run of characters) and `?` (single character); no
//! brace expansion or character classes — callers only ever match file
//! paths against simple suffix/prefix globs like `*.yaml`.
use regex::Regex;

pub fn matches(pattern: &str, candidate: &str) -> bool {
    let mut regex_source = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => regex_source.push_str(".*"),
            '?' => regex_source.push('.'),
            other => regex_source.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_source.push('$');
    Regex::new(&regex_source)
        .map(|re| re.is_match(candidate))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_any_suffix() {
        assert!(matches("*.yaml", "deployment.yaml"));
        assert!(!matches("*.yaml", "deployment.json"));
    }

    #[test]
    fn literal_pattern_requires_exact_match() {
        assert!(matches("values.yaml", "values.yaml"));
        assert!(!matches("values.yaml", "other/values.yaml"));
    }
}
