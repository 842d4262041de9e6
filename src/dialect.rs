//! Dialect identification and the validator factory (spec §4.6).
use std::fmt;

/// The JSON Schema draft being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Draft4,
    Draft7,
    Draft2019,
    Draft2020,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Draft7
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dialect::Draft4 => "draft-04",
            Dialect::Draft7 => "draft-07",
            Dialect::Draft2019 => "draft-2019-09",
            Dialect::Draft2020 => "draft-2020-12",
        };
        write!(f, "{}", s)
    }
}

impl Dialect {
    /// Parses the explicit `_dialect` tag. Unknown tags return `None` so the
    /// caller can fall back to the default (draft-07), matching spec §4.6.
    pub fn from_tag(tag: &str) -> Option<Dialect> {
        match tag {
            "draft-04" | "draft4" => Some(Dialect::Draft4),
            "draft-07" | "draft7" => Some(Dialect::Draft7),
            "draft-2019-09" | "2019-09" => Some(Dialect::Draft2019),
            "draft-2020-12" | "2020-12" => Some(Dialect::Draft2020),
            _ => None,
        }
    }

    /// Dialect dispatch with the documented default: unknown/absent tags
    /// resolve to draft-07.
    pub fn from_tag_or_default(tag: Option<&str>) -> Dialect {
        tag.and_then(Dialect::from_tag).unwrap_or_default()
    }

    pub fn supports_unevaluated(self) -> bool {
        matches!(self, Dialect::Draft2019 | Dialect::Draft2020)
    }

    pub fn uses_prefix_items(self) -> bool {
        matches!(self, Dialect::Draft2020)
    }

    pub fn uses_numeric_exclusive_bounds(self) -> bool {
        !matches!(self, Dialect::Draft4)
    }
}
