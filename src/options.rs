//! Per-top-level-call options, threaded unchanged through every recursive
//! call (spec §3 "Options").

/// Immutable knobs that change validator behavior without changing the
/// schema or document being validated.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Switches `anyOf`/`oneOf` arbitration to the Kubernetes/OpenAPI
    /// ordering (propertiesMatches-first) described in spec §4.1 and §9.
    pub is_kubernetes: bool,
    /// Treats an absent `additionalProperties` on an object schema as if it
    /// were `false`.
    pub disable_additional_properties: bool,
    /// Document URI, used to evaluate `filePatternAssociation` on `if`
    /// schemas.
    pub uri: Option<String>,
    /// Set while running for completion purposes: relaxes enum/const
    /// comparisons and discounts format-bearing `anyOf`/`oneOf` branches.
    pub call_from_auto_complete: bool,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    pub fn with_kubernetes(mut self, value: bool) -> Self {
        self.is_kubernetes = value;
        self
    }

    pub fn with_disable_additional_properties(mut self, value: bool) -> Self {
        self.disable_additional_properties = value;
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_auto_complete(mut self, value: bool) -> Self {
        self.call_from_auto_complete = value;
        self
    }
}
