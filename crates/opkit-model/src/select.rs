//! Select-expression grammar.
//!
//! A select expression chooses what part of a response becomes pipeline
//! output: a dotted member path (`Items`, `ZonalShift.Status`), `*` for the
//! entire response, or `^ParameterName` to echo an input parameter back.

use std::fmt;

use crate::error::ModelError;

/// A parsed select expression.
///
/// Parsing checks only the grammar; resolution against a concrete operation
/// schema (does the head member exist, does the echoed parameter exist)
/// happens at context-build time in `opkit-core`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    /// Extract the member at the given dotted path.
    Path(Vec<String>),
    /// Pass the entire response through.
    Entire,
    /// Echo the named input parameter back to the pipeline.
    InputEcho(String),
}

impl SelectExpr {
    /// Parse a raw select expression.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ModelError::MalformedSelect(raw.to_owned()));
        }
        if raw == "*" {
            return Ok(Self::Entire);
        }
        if let Some(param) = raw.strip_prefix('^') {
            if param.is_empty() || !is_identifier(param) {
                return Err(ModelError::MalformedSelect(raw.to_owned()));
            }
            return Ok(Self::InputEcho(param.to_owned()));
        }
        let segments: Vec<String> = raw.split('.').map(str::to_owned).collect();
        if segments.iter().any(|s| !is_identifier(s)) {
            return Err(ModelError::MalformedSelect(raw.to_owned()));
        }
        Ok(Self::Path(segments))
    }

    /// First path segment, if this is a path expression.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        match self {
            Self::Path(segments) => segments.first().map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for SelectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(segments) => f.write_str(&segments.join(".")),
            Self::Entire => f.write_str("*"),
            Self::InputEcho(param) => write!(f, "^{param}"),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
